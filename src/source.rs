// Snapshot retrieval: HTTP endpoint (cache-busted) or the backing file directly.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::CACHE_CONTROL;
use tracing::instrument;

use crate::error::FetchError;
use crate::models::{RawSnapshot, parse_snapshot};

/// Where the viewer gets its document from. One call per cycle; any error skips the cycle.
pub trait SnapshotSource: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = Result<RawSnapshot, FetchError>> + Send;
}

pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// `url` with a `t=<epoch millis>` query parameter so no cache can answer.
    pub fn cache_busted_url(&self, token: i64) -> String {
        let sep = if self.url.contains('?') { '&' } else { '?' };
        format!("{}{}t={}", self.url, sep, token)
    }
}

impl SnapshotSource for HttpSource {
    #[instrument(skip(self), fields(source = "http", operation = "fetch_snapshot"))]
    async fn fetch(&self) -> Result<RawSnapshot, FetchError> {
        let url = self.cache_busted_url(chrono::Utc::now().timestamp_millis());
        let response = self
            .client
            .get(url)
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let body = response.bytes().await?;
        parse_snapshot(&body)
    }
}

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotSource for FileSource {
    #[instrument(skip(self), fields(source = "file", operation = "fetch_snapshot"))]
    async fn fetch(&self) -> Result<RawSnapshot, FetchError> {
        let body = tokio::fs::read(&self.path).await?;
        parse_snapshot(&body)
    }
}

/// Either source, picked from the configured URL scheme.
pub enum AnySource {
    Http(HttpSource),
    File(FileSource),
}

impl AnySource {
    pub fn from_url(url: &str, timeout: Duration) -> Result<Self, FetchError> {
        match url.strip_prefix("file://") {
            Some(path) => Ok(Self::File(FileSource::new(path))),
            None => Ok(Self::Http(HttpSource::new(url, timeout)?)),
        }
    }
}

impl SnapshotSource for AnySource {
    async fn fetch(&self) -> Result<RawSnapshot, FetchError> {
        match self {
            Self::Http(s) => s.fetch().await,
            Self::File(s) => s.fetch().await,
        }
    }
}
