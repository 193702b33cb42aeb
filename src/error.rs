// Fetch/parse boundary errors. The viewer maps every variant to "skip this cycle";
// the snapshot endpoint maps them to the default document.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("document is not valid UTF-8")]
    NotUtf8,
    #[error("document is empty")]
    Empty,
    #[error("malformed document: {0}")]
    Malformed(#[from] serde_json::Error),
}
