// GET handlers: version, metrics document

use axum::{extract::State, response::IntoResponse};

use super::AppState;
use crate::models::{default_document, parse_document};
use crate::version::{NAME, VERSION};

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/stats — the backing document as-is, or the default document when the file
/// is missing, unreadable, empty, or not JSON. Never answers with an error status.
pub(super) async fn stats_handler(State(state): State<AppState>) -> impl IntoResponse {
    let path = &state.config.snapshot.path;
    let document = match tokio::fs::read(path).await {
        Ok(bytes) => parse_document(&bytes).unwrap_or_else(|e| {
            tracing::warn!(error = %e, path = %path, "serving default snapshot");
            default_document()
        }),
        Err(e) => {
            tracing::warn!(error = %e, path = %path, "snapshot file unreadable, serving default");
            default_document()
        }
    };
    axum::Json(document)
}
