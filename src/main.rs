use anyhow::Result;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use sysdash::*;
use tokio::sync::{broadcast, mpsc, watch};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Capacity of the client -> viewer command queue.
const COMMAND_QUEUE_CAPACITY: usize = 32;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;
    let viewer_config = &app_config.viewer;

    let (frames_tx, _) = broadcast::channel::<render::Frame>(viewer_config.broadcast_capacity);
    let (latest_tx, latest_rx) = watch::channel(None);
    let (commands_tx, commands_rx) = mpsc::channel(COMMAND_QUEUE_CAPACITY);
    let ws_view_connections = Arc::new(AtomicUsize::new(0));
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let source = source::AnySource::from_url(
        &viewer_config.source_url,
        std::time::Duration::from_millis(viewer_config.request_timeout_ms),
    )
    .map_err(|e| anyhow::anyhow!("snapshot source: {}", e))?;

    let app = routes::app(
        routes::ViewerHandles {
            frames_tx: frames_tx.clone(),
            latest_rx,
            commands_tx,
            ws_view_connections: ws_view_connections.clone(),
        },
        app_config.clone(),
    );
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    let state = viewer::ViewState::new(
        viewer_config.history_len,
        render::Surface::new(viewer_config.graph_width, viewer_config.graph_height),
        viewer_config.temp_alert_celsius,
    );
    let viewer_handle = viewer::spawn(
        source,
        state,
        viewer::ViewerDeps {
            frames_tx,
            latest_tx,
            commands_rx,
            ws_view_connections,
            shutdown_rx,
        },
        viewer::ViewerTaskConfig {
            poll_interval_ms: viewer_config.poll_interval_ms,
            stats_log_interval_secs: viewer_config.stats_log_interval_secs,
        },
    );
    tracing::info!(source = %viewer_config.source_url, "Viewer polling snapshot source");

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = async {
            #[cfg(unix)]
            {
                let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                    Ok(s) => s,
                    Err(_) => {
                        let _ = tokio::signal::ctrl_c().await;
                        return;
                    }
                };
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            #[cfg(not(unix))]
            {
                let _ = tokio::signal::ctrl_c().await;
            }
        } => {
            tracing::info!("Received shutdown signal");
            let _ = shutdown_tx.send(());
            let _ = viewer_handle.await;
        }
    }

    Ok(())
}
