// Shared test helpers
#![allow(dead_code)]

use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use sysdash::error::FetchError;
use sysdash::models::RawSnapshot;
use sysdash::render::Surface;
use sysdash::source::SnapshotSource;
use sysdash::viewer::ViewState;

pub fn snapshot(value: Value) -> RawSnapshot {
    RawSnapshot::from_value(value).expect("valid snapshot")
}

pub fn view_state() -> ViewState {
    ViewState::new(60, Surface::new(600, 240), 80)
}

pub fn full_document() -> Value {
    serde_json::json!({
        "cpu": { "usage": 45, "name": "Ryzen", "speed": 3.8, "procs": 300, "uptime": "1:02:03", "temp": 55 },
        "ram": { "usage": 40, "total": "32 GB", "used": "12.8 GB", "committed": "20 GB" },
        "disks": [
            { "name": "C:", "usage": 10, "read": "1MB/s", "write": "2MB/s", "resp": 1.5 },
            { "name": "D:", "usage": 0, "read": "0KB/s", "write": "0KB/s" }
        ],
        "network": { "usage": 3, "name": "Wi-Fi 6", "send": "12 Kbps", "recv": "80 Kbps" },
        "gpus": [
            { "usage": 20, "name": "RTX", "temp": 60, "driver": "551.86", "ram": "2/8 GB" }
        ]
    })
}

/// Source whose document can be swapped (or removed) while the viewer runs.
/// `None` makes `fetch` fail, as an unreachable endpoint would.
#[derive(Clone, Default)]
pub struct SharedSource {
    pub document: Arc<Mutex<Option<Value>>>,
    pub calls: Arc<AtomicUsize>,
}

impl SharedSource {
    pub fn with(document: Value) -> Self {
        let source = Self::default();
        source.set(Some(document));
        source
    }

    pub fn set(&self, document: Option<Value>) {
        *self.document.lock().unwrap() = document;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SnapshotSource for SharedSource {
    async fn fetch(&self) -> Result<RawSnapshot, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let document = self.document.lock().unwrap().clone();
        match document {
            Some(v) => RawSnapshot::from_value(v),
            None => Err(FetchError::Status(503)),
        }
    }
}
