//! Window management type definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors related to window operations.
#[derive(Debug, Error)]
pub enum WindowError {
    /// No window tool is installed.
    #[error("Window tools unavailable: {0}")]
    Unavailable(String),

    /// Failed to list windows.
    #[error("Failed to list windows: {0}")]
    ListFailed(String),

    /// Failed to activate a window.
    #[error("Failed to focus window: {0}")]
    FocusFailed(String),

    /// Failed to read the active window.
    #[error("Failed to query active window: {0}")]
    ActiveFailed(String),
}

/// Information about a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowInfo {
    /// X window id.
    pub id: u64,
    /// Window title.
    pub title: String,
    /// Owning process id, 0 when unknown.
    pub pid: u32,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl WindowInfo {
    /// A window known only by id and title.
    pub fn titled(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            pid: 0,
            x: 0,
            y: 0,
            width: 0,
            height: 0,
        }
    }
}
