// WebSocket handler: rendered frames out, user interaction in

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use bytes::Bytes;
use serde::Deserialize;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::mpsc;
use tokio::time::{Duration, timeout};

use super::AppState;
use crate::render::Frame;
use crate::viewer::ViewerCommand;

pub(super) const WS_PING_INTERVAL: Duration = Duration::from_secs(30);
pub(super) const WS_SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Messages a view client sends, e.g. `{"type":"select","id":"disk0"}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    Select { id: String },
    Resize { width: u32, height: u32 },
    Refresh,
}

impl From<ClientMessage> for ViewerCommand {
    fn from(msg: ClientMessage) -> Self {
        match msg {
            ClientMessage::Select { id } => ViewerCommand::Select(id),
            ClientMessage::Resize { width, height } => ViewerCommand::Resize { width, height },
            ClientMessage::Refresh => ViewerCommand::Refresh,
        }
    }
}

/// Decrements ws_view connection count on drop (connect = +1, drop = -1).
struct WsViewGuard(Arc<AtomicUsize>);

impl Drop for WsViewGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, std::sync::atomic::Ordering::Relaxed);
    }
}

pub(super) async fn ws_view(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let rx = state.frames_tx.subscribe();
    let latest = state.latest_rx.borrow().clone();
    let commands_tx = state.commands_tx.clone();
    let conn_count = state.ws_view_connections.clone();
    ws.on_upgrade(move |socket| async move {
        if let Err(e) = stream_view(socket, rx, latest, commands_tx, conn_count).await {
            tracing::info!("View stream error: {}", e);
        }
    })
}

async fn send_frame(socket: &mut WebSocket, frame: &Frame) -> anyhow::Result<bool> {
    let json = serde_json::to_string(frame)?;
    let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Text(json.into()))).await;
    Ok(matches!(r, Ok(Ok(()))))
}

async fn stream_view(
    mut socket: WebSocket,
    mut rx: broadcast::Receiver<Frame>,
    latest: Option<Frame>,
    commands_tx: mpsc::Sender<ViewerCommand>,
    conn_count: Arc<AtomicUsize>,
) -> anyhow::Result<()> {
    conn_count.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
    let _guard = WsViewGuard(conn_count);
    tracing::info!("Client connected to view stream");

    if let Some(frame) = latest
        && !send_frame(&mut socket, &frame).await?
    {
        return Ok(());
    }

    let mut ping_interval = tokio::time::interval(WS_PING_INTERVAL);
    ping_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            result = rx.recv() => {
                let frame = match result {
                    Ok(f) => f,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "view client lagging; frames dropped");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };
                if !send_frame(&mut socket, &frame).await? {
                    break;
                }
            }
            incoming = socket.recv() => {
                let text = match incoming {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => continue,
                };
                match serde_json::from_str::<ClientMessage>(text.as_str()) {
                    Ok(msg) => {
                        if commands_tx.send(msg.into()).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => tracing::debug!(error = %e, "ignoring malformed view message"),
                }
            }
            _ = ping_interval.tick() => {
                let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Ping(Bytes::new()))).await;
                if r.is_err() || r.unwrap_or(Ok(())).is_err() {
                    break;
                }
            }
        }
    }
    Ok(())
}
