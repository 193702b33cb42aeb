// Snapshot sources against a local HTTP server and real files

use axum::Router;
use axum::extract::{RawQuery, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use sysdash::error::FetchError;
use sysdash::render::Surface;
use sysdash::source::{AnySource, FileSource, HttpSource, SnapshotSource};
use sysdash::viewer::{ViewState, ViewerDeps, ViewerTaskConfig, spawn};
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::time::{Duration, timeout};

const TIMEOUT: Duration = Duration::from_secs(2);

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Echoes the query string and cache header back inside a BOM-prefixed document.
async fn echo_handler(RawQuery(query): RawQuery, headers: HeaderMap) -> String {
    let cache_control = headers
        .get(header::CACHE_CONTROL)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let doc = json!({
        "cpu": { "usage": 7, "name": query.unwrap_or_default(), "uptime": cache_control }
    });
    format!("\u{feff}{doc}\n")
}

fn string_field(value: Option<Value>) -> String {
    value
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

#[tokio::test]
async fn http_fetch_sends_cache_busting_token() {
    let addr = serve(Router::new().route("/api/stats", get(echo_handler))).await;
    let source = HttpSource::new(format!("http://{addr}/api/stats"), TIMEOUT).unwrap();

    let cpu = source.fetch().await.unwrap().cpu.expect("cpu section");
    assert_eq!(cpu.usage, Some(json!(7)));
    let query = string_field(cpu.name);
    let token = query.strip_prefix("t=").expect("t= on the query");
    assert!(token.parse::<i64>().unwrap() > 0, "{query}");
    assert_eq!(string_field(cpu.uptime), "no-cache");
}

#[tokio::test]
async fn http_fetch_keeps_existing_query() {
    let addr = serve(Router::new().route("/api/stats", get(echo_handler))).await;
    let source = HttpSource::new(format!("http://{addr}/api/stats?v=2"), TIMEOUT).unwrap();

    let cpu = source.fetch().await.unwrap().cpu.expect("cpu section");
    assert!(string_field(cpu.name).starts_with("v=2&t="));
}

#[tokio::test]
async fn http_error_status_is_a_fetch_error() {
    let router = Router::new().route(
        "/api/stats",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "{}") }),
    );
    let addr = serve(router).await;
    let source = HttpSource::new(format!("http://{addr}/api/stats"), TIMEOUT).unwrap();
    assert!(matches!(
        source.fetch().await,
        Err(FetchError::Status(500))
    ));

    let missing = HttpSource::new(format!("http://{addr}/nope"), TIMEOUT).unwrap();
    assert!(matches!(
        missing.fetch().await,
        Err(FetchError::Status(404))
    ));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let source = HttpSource::new(format!("http://{addr}/api/stats"), TIMEOUT).unwrap();
    assert!(matches!(
        source.fetch().await,
        Err(FetchError::Transport(_))
    ));
}

#[tokio::test]
async fn hung_endpoint_times_out() {
    let router = Router::new().route(
        "/api/stats",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            "{}"
        }),
    );
    let addr = serve(router).await;
    let source =
        HttpSource::new(format!("http://{addr}/api/stats"), Duration::from_millis(100)).unwrap();
    let result = timeout(Duration::from_secs(5), source.fetch())
        .await
        .expect("request timeout bounds the fetch");
    assert!(matches!(result, Err(FetchError::Transport(e)) if e.is_timeout()));
}

#[tokio::test]
async fn file_source_reads_bom_prefixed_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("stats.json");
    std::fs::write(&path, "\u{feff}  {\"ram\":{\"usage\":30}}\r\n").unwrap();

    let raw = FileSource::new(&path).fetch().await.unwrap();
    assert_eq!(raw.ram.expect("ram section").usage, Some(json!(30)));

    let url = format!("file://{}", path.display());
    let raw = AnySource::from_url(&url, TIMEOUT).unwrap().fetch().await.unwrap();
    assert!(raw.ram.is_some());
}

#[tokio::test]
async fn file_source_errors() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("stats.json");
    assert!(matches!(
        FileSource::new(&path).fetch().await,
        Err(FetchError::Io(_))
    ));

    std::fs::write(&path, "\u{feff} \n").unwrap();
    assert!(matches!(
        FileSource::new(&path).fetch().await,
        Err(FetchError::Empty)
    ));
}

#[derive(Clone)]
struct Toggle {
    healthy: Arc<AtomicBool>,
    requests: Arc<AtomicUsize>,
}

async fn toggle_handler(State(toggle): State<Toggle>) -> Response {
    let healthy = toggle.healthy.load(Ordering::SeqCst);
    toggle.requests.fetch_add(1, Ordering::SeqCst);
    if healthy {
        json!({ "cpu": { "usage": 12 } }).to_string().into_response()
    } else {
        StatusCode::SERVICE_UNAVAILABLE.into_response()
    }
}

#[tokio::test]
async fn viewer_skips_cycles_while_endpoint_fails() {
    let toggle = Toggle {
        healthy: Arc::new(AtomicBool::new(false)),
        requests: Arc::new(AtomicUsize::new(0)),
    };
    let router = Router::new()
        .route("/api/stats", get(toggle_handler))
        .with_state(toggle.clone());
    let addr = serve(router).await;
    let source = HttpSource::new(format!("http://{addr}/api/stats"), TIMEOUT).unwrap();

    let (frames_tx, mut frames_rx) = broadcast::channel(8);
    let (latest_tx, latest_rx) = watch::channel(None);
    let (commands_tx, commands_rx) = mpsc::channel(8);
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let handle = spawn(
        source,
        ViewState::new(60, Surface::new(600, 240), 80),
        ViewerDeps {
            frames_tx,
            latest_tx,
            commands_rx,
            ws_view_connections: Arc::new(AtomicUsize::new(0)),
            shutdown_rx,
        },
        ViewerTaskConfig {
            poll_interval_ms: 3_600_000,
            stats_log_interval_secs: 3600,
        },
    );

    // First tick hits the failing endpoint.
    while toggle.requests.load(Ordering::SeqCst) < 1 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    commands_tx
        .send(sysdash::viewer::ViewerCommand::Refresh)
        .await
        .unwrap();
    while toggle.requests.load(Ordering::SeqCst) < 2 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(latest_rx.borrow().is_none());

    toggle.healthy.store(true, Ordering::SeqCst);
    commands_tx
        .send(sysdash::viewer::ViewerCommand::Refresh)
        .await
        .unwrap();
    let frame = timeout(Duration::from_secs(3), frames_rx.recv())
        .await
        .expect("frame within 3s")
        .expect("channel open");
    assert_eq!(frame.seq, 1);
    assert_eq!(frame.sidebar[0].id, "cpu");
    assert_eq!(frame.sidebar[0].usage_text, "12%");

    let _ = shutdown_tx.send(());
    handle.await.unwrap();
}
