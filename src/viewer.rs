// Viewer pipeline: fetch -> normalize -> history -> selection -> render.
// One task owns ViewState; the poll timer and client commands both feed it, so every
// frame is built from one complete device list and cycles never overlap.

use crate::history::HistoryStore;
use crate::models::{Device, RawSnapshot};
use crate::normalizer::normalize;
use crate::render::{Frame, Surface, detail, sidebar};
use crate::selection::SelectionState;
use crate::source::SnapshotSource;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::{Duration, interval};
use tracing::Instrument;

/// User interaction forwarded from view clients.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerCommand {
    /// Focus a device and run a fetch cycle right away.
    Select(String),
    /// Graph display size changed; re-render from the last device list.
    Resize { width: u32, height: u32 },
    /// Run a fetch cycle right away.
    Refresh,
}

/// All mutable viewer state. History and selection live for the whole process.
#[derive(Debug)]
pub struct ViewState {
    history: HistoryStore,
    selection: SelectionState,
    surface: Surface,
    devices: Vec<Device>,
    temp_alert: bool,
    temp_alert_celsius: i64,
    seq: u64,
}

impl ViewState {
    pub fn new(history_len: usize, surface: Surface, temp_alert_celsius: i64) -> Self {
        Self {
            history: HistoryStore::new(history_len),
            selection: SelectionState::default(),
            surface,
            devices: Vec::new(),
            temp_alert: false,
            temp_alert_celsius,
            seq: 0,
        }
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn temp_alert(&self) -> bool {
        self.temp_alert
    }

    pub fn select(&mut self, id: impl Into<String>) {
        self.selection.select(id);
    }

    pub fn set_display_size(&mut self, width: u32, height: u32) {
        self.surface.set_display_size(width, height);
    }

    /// One successful cycle: replace the device list, record a sample per device, render.
    pub fn apply_snapshot(&mut self, snapshot: &RawSnapshot) -> Frame {
        let normalized = normalize(snapshot, self.temp_alert_celsius);
        if let Some(alert) = normalized.temp_alert {
            self.temp_alert = alert;
        }
        for device in &normalized.devices {
            self.history.record(&device.id, device.val);
        }
        self.devices = normalized.devices;
        self.render()
    }

    /// Redraw from the current device list without recording history.
    pub fn render(&mut self) -> Frame {
        let focused = self.selection.resolve(&self.devices);
        let detail_view = focused.map(|device| {
            let samples: Vec<f64> = self
                .history
                .get(&device.id)
                .map(|s| s.iter().copied().collect())
                .unwrap_or_default();
            detail(device, &samples, &mut self.surface)
        });
        self.seq += 1;
        Frame {
            seq: self.seq,
            generated_at: chrono::Utc::now().timestamp_millis(),
            temp_alert: self.temp_alert,
            sidebar: sidebar(&self.devices, self.selection.selected()),
            detail: detail_view,
        }
    }
}

/// Channels and shutdown for the viewer task.
pub struct ViewerDeps {
    pub frames_tx: broadcast::Sender<Frame>,
    /// Latest frame, for clients that connect between ticks.
    pub latest_tx: watch::Sender<Option<Frame>>,
    pub commands_rx: mpsc::Receiver<ViewerCommand>,
    pub ws_view_connections: Arc<AtomicUsize>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

/// Viewer timing and logging config.
pub struct ViewerTaskConfig {
    pub poll_interval_ms: u64,
    pub stats_log_interval_secs: u64,
}

fn publish(
    frame: Frame,
    frames_tx: &broadcast::Sender<Frame>,
    latest_tx: &watch::Sender<Option<Frame>>,
) {
    latest_tx.send_replace(Some(frame.clone()));
    // No receivers just means no view client is connected.
    let _ = frames_tx.send(frame);
}

async fn run_cycle<S: SnapshotSource>(source: &S, state: &mut ViewState) -> Option<Frame> {
    match source.fetch().await {
        Ok(snapshot) => Some(state.apply_snapshot(&snapshot)),
        Err(e) => {
            tracing::debug!(error = %e, operation = "fetch_snapshot", "cycle skipped");
            None
        }
    }
}

pub fn spawn<S: SnapshotSource>(
    source: S,
    mut state: ViewState,
    deps: ViewerDeps,
    config: ViewerTaskConfig,
) -> tokio::task::JoinHandle<()> {
    let ViewerDeps {
        frames_tx,
        latest_tx,
        mut commands_rx,
        ws_view_connections,
        mut shutdown_rx,
    } = deps;
    let ViewerTaskConfig {
        poll_interval_ms,
        stats_log_interval_secs,
    } = config;

    let viewer_span = tracing::span!(tracing::Level::DEBUG, "viewer", poll_interval_ms);

    tokio::spawn(
        async move {
            let mut tick = interval(Duration::from_millis(poll_interval_ms));
            tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            let mut stats_log_tick = interval(Duration::from_secs(stats_log_interval_secs));
            stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // First stats tick fires immediately; nothing to report yet.
            stats_log_tick.tick().await;

            let mut cycles_rendered: u64 = 0;
            let mut cycles_skipped: u64 = 0;

            loop {
                let fetch = tokio::select! {
                    _ = tick.tick() => true,
                    command = commands_rx.recv() => match command {
                        Some(ViewerCommand::Select(id)) => {
                            tracing::debug!(device = %id, "selection changed");
                            state.select(id);
                            true
                        }
                        Some(ViewerCommand::Refresh) => true,
                        Some(ViewerCommand::Resize { width, height }) if width == 0 || height == 0 => {
                            tracing::debug!(width, height, "ignoring empty display size");
                            false
                        }
                        Some(ViewerCommand::Resize { width, height }) => {
                            state.set_display_size(width, height);
                            if !state.devices().is_empty() {
                                publish(state.render(), &frames_tx, &latest_tx);
                            }
                            false
                        }
                        None => {
                            tracing::debug!("Command channel closed");
                            break;
                        }
                    },
                    _ = &mut shutdown_rx => {
                        tracing::debug!("Viewer shutting down");
                        break;
                    }
                    _ = stats_log_tick.tick() => {
                        tracing::info!(
                            ws_view_clients =
                                ws_view_connections.load(std::sync::atomic::Ordering::Relaxed),
                            cycles_rendered,
                            cycles_skipped,
                            devices_tracked = state.history().len(),
                            "viewer stats"
                        );
                        false
                    }
                };
                if !fetch {
                    continue;
                }
                match run_cycle(&source, &mut state).await {
                    Some(frame) => {
                        cycles_rendered += 1;
                        publish(frame, &frames_tx, &latest_tx);
                    }
                    None => cycles_skipped += 1,
                }
            }
        }
        .instrument(viewer_span),
    )
}
