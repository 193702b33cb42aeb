// Normalized device records, rebuilt from the raw document every cycle

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Cpu,
    Ram,
    Disk,
    Gpu,
    Network,
}

impl DeviceKind {
    /// Accent color used for the sidebar bar, usage readout and graph.
    pub fn accent(self) -> &'static str {
        match self {
            DeviceKind::Cpu => "#0078d4",
            DeviceKind::Ram => "#d233d2",
            DeviceKind::Disk => "#0f7b0f",
            DeviceKind::Gpu => "#d13438",
            DeviceKind::Network => "#dd3e78",
        }
    }
}

/// One (label, formatted value) pair of a device's stat grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stat {
    pub label: &'static str,
    pub value: String,
}

impl Stat {
    pub fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Device {
    /// `cpu`, `ram`, `net`, or positional `disk{i}` / `gpu{i}`.
    pub id: String,
    pub kind: DeviceKind,
    pub label: String,
    pub sub: String,
    /// Utilization percentage; 0 when the raw value is not a number. Not clamped.
    pub val: f64,
    pub stats: Vec<Stat>,
}
