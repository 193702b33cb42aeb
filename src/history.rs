// Per-device rolling utilization history (memory-resident, never evicted).

use std::collections::{HashMap, VecDeque};

/// Samples kept per device.
pub const DEFAULT_CAPACITY: usize = 60;

#[derive(Debug, Clone)]
pub struct HistoryStore {
    capacity: usize,
    series: HashMap<String, VecDeque<f64>>,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl HistoryStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            series: HashMap::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Creates a zero-filled series for `id` if none exists yet.
    pub fn ensure(&mut self, id: &str) -> &mut VecDeque<f64> {
        let capacity = self.capacity;
        self.series
            .entry(id.to_string())
            .or_insert_with(|| VecDeque::from(vec![0.0; capacity]))
    }

    /// Appends `value`, evicting the oldest sample once the series is over capacity.
    pub fn record(&mut self, id: &str, value: f64) {
        let capacity = self.capacity;
        let series = self.ensure(id);
        series.push_back(value);
        while series.len() > capacity {
            series.pop_front();
        }
    }

    /// Samples for `id`, oldest first; `None` if the device was never seen.
    pub fn get(&self, id: &str) -> Option<&VecDeque<f64>> {
        self.series.get(id)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
