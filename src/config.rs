use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub snapshot: SnapshotConfig,
    pub viewer: ViewerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    /// Directory served for `GET /` and static assets.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

fn default_static_dir() -> String {
    "public".into()
}

/// Backing file of the metrics document and the route it is served on.
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotConfig {
    #[serde(default = "default_snapshot_path")]
    pub path: String,
    #[serde(default = "default_snapshot_route")]
    pub route: String,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            path: default_snapshot_path(),
            route: default_snapshot_route(),
        }
    }
}

fn default_snapshot_path() -> String {
    "data/stats.json".into()
}

fn default_snapshot_route() -> String {
    "/api/stats".into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ViewerConfig {
    /// `http://` or `https://` URL of the snapshot endpoint, or `file://` path of the backing file.
    pub source_url: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Samples kept per device (graph width in points).
    #[serde(default = "default_history_len")]
    pub history_len: usize,
    #[serde(default = "default_temp_alert_celsius")]
    pub temp_alert_celsius: i64,
    #[serde(default = "default_graph_width")]
    pub graph_width: u32,
    #[serde(default = "default_graph_height")]
    pub graph_height: u32,
    /// Max number of frames kept in the broadcast channel for /ws/view (slow clients may lag).
    #[serde(default = "default_broadcast_capacity")]
    pub broadcast_capacity: usize,
    /// How often to log viewer stats (cycles rendered/skipped, view clients) at INFO level.
    #[serde(default = "default_stats_log_interval_secs")]
    pub stats_log_interval_secs: u64,
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_request_timeout_ms() -> u64 {
    5000
}

fn default_history_len() -> usize {
    crate::history::DEFAULT_CAPACITY
}

fn default_temp_alert_celsius() -> i64 {
    80
}

fn default_graph_width() -> u32 {
    600
}

fn default_graph_height() -> u32 {
    240
}

fn default_broadcast_capacity() -> usize {
    16
}

fn default_stats_log_interval_secs() -> u64 {
    60
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.snapshot.path.is_empty(),
            "snapshot.path must be non-empty"
        );
        anyhow::ensure!(
            self.snapshot.route.starts_with('/'),
            "snapshot.route must start with '/', got {:?}",
            self.snapshot.route
        );
        anyhow::ensure!(
            ["http://", "https://", "file://"]
                .iter()
                .any(|scheme| self.viewer.source_url.starts_with(scheme)),
            "viewer.source_url must start with http://, https:// or file://, got {:?}",
            self.viewer.source_url
        );
        anyhow::ensure!(
            self.viewer.poll_interval_ms > 0,
            "viewer.poll_interval_ms must be > 0, got {}",
            self.viewer.poll_interval_ms
        );
        anyhow::ensure!(
            self.viewer.request_timeout_ms > 0,
            "viewer.request_timeout_ms must be > 0, got {}",
            self.viewer.request_timeout_ms
        );
        anyhow::ensure!(
            self.viewer.history_len >= 2,
            "viewer.history_len must be >= 2, got {}",
            self.viewer.history_len
        );
        anyhow::ensure!(
            self.viewer.graph_width > 0 && self.viewer.graph_height > 0,
            "viewer.graph_width and viewer.graph_height must be > 0, got {}x{}",
            self.viewer.graph_width,
            self.viewer.graph_height
        );
        anyhow::ensure!(
            self.viewer.broadcast_capacity > 0,
            "viewer.broadcast_capacity must be > 0, got {}",
            self.viewer.broadcast_capacity
        );
        anyhow::ensure!(
            self.viewer.stats_log_interval_secs > 0,
            "viewer.stats_log_interval_secs must be > 0, got {}",
            self.viewer.stats_log_interval_secs
        );
        Ok(())
    }
}
