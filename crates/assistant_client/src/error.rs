//! Transport error types.

use thiserror::Error;

/// Failures the transport can report to the engine.
///
/// Every recovery decision (fall back, surface, keep local state) branches on
/// a `Result` carrying one of these; there is no exception-driven path.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection-level failure: refused, DNS, timeout, TLS.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("server returned status {code}")]
    Status { code: u16 },

    /// The response body failed mid-read.
    #[error("stream error: {0}")]
    Stream(String),

    /// The fallback reply body was not the expected JSON shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;
