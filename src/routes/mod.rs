// HTTP + WebSocket routes

mod http;
mod ws;

use axum::{Router, routing::get};
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::{broadcast, mpsc, watch};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::config::AppConfig;
use crate::render::Frame;
use crate::viewer::ViewerCommand;

pub use ws::ClientMessage;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) frames_tx: broadcast::Sender<Frame>,
    pub(crate) latest_rx: watch::Receiver<Option<Frame>>,
    pub(crate) commands_tx: mpsc::Sender<ViewerCommand>,
    pub(crate) ws_view_connections: Arc<AtomicUsize>,
    pub(crate) config: AppConfig,
}

/// Viewer-side handles the routes need.
pub struct ViewerHandles {
    pub frames_tx: broadcast::Sender<Frame>,
    pub latest_rx: watch::Receiver<Option<Frame>>,
    pub commands_tx: mpsc::Sender<ViewerCommand>,
    pub ws_view_connections: Arc<AtomicUsize>,
}

pub fn app(viewer: ViewerHandles, config: AppConfig) -> Router {
    let static_dir = ServeDir::new(&config.server.static_dir);
    let stats_route = config.snapshot.route.clone();
    let state = AppState {
        frames_tx: viewer.frames_tx,
        latest_rx: viewer.latest_rx,
        commands_tx: viewer.commands_tx,
        ws_view_connections: viewer.ws_view_connections,
        config,
    };
    Router::new()
        .route("/version", get(http::version_handler)) // GET /version
        .route(&stats_route, get(http::stats_handler)) // GET /api/stats
        .route("/ws/view", get(ws::ws_view)) // WS /ws/view
        .fallback_service(static_dir) // GET / and static assets
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
