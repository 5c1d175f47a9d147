//! Errors from the DevTools connection.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CdpError {
    /// The WebSocket handshake or target attach did not succeed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Nothing answered `/json/version` on the debugging endpoint.
    #[error("Chrome not available at {0}")]
    ChromeNotAvailable(String),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Error object returned by Chrome for a command.
    #[error("{message} (CDP code {code})")]
    Protocol { code: i64, message: String },

    #[error("Malformed CDP message: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Endpoint discovery or tab creation over HTTP.
    #[error("DevTools HTTP request failed: {0}")]
    Http(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// Script threw or returned an unexpected value.
    #[error("Script error: {0}")]
    JavaScript(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    /// The connection dropped while a command was pending.
    #[error("DevTools session closed")]
    SessionClosed,

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for CdpError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        CdpError::WebSocket(e.to_string())
    }
}

impl From<reqwest::Error> for CdpError {
    fn from(e: reqwest::Error) -> Self {
        CdpError::Http(e.to_string())
    }
}
