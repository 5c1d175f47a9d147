//! Native signing dialog detection protocol.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Dialog detection errors.
#[derive(Debug, Error)]
pub enum DialogError {
    /// The dialog did not show up in time.
    #[error("no window matching {patterns:?} appeared within {waited:?}{}", detail_suffix(.detail))]
    Timeout {
        patterns: Vec<String>,
        waited: Duration,
        detail: Option<String>,
    },

    /// Windows cannot be inspected on this host at all.
    #[error("window inspection unavailable: {0}")]
    Unavailable(String),
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_ref()
        .map(|d| format!(" (last probe error: {})", d))
        .unwrap_or_default()
}

/// A detected signing dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogHandle {
    /// Platform window id, when the watcher could see one.
    pub window_id: Option<u64>,
    /// Window title as reported by the window manager.
    pub title: String,
}

impl DialogHandle {
    pub fn new(window_id: Option<u64>, title: impl Into<String>) -> Self {
        Self {
            window_id,
            title: title.into(),
        }
    }

    /// A handle for a dialog assumed to be up without having been observed.
    pub fn assumed() -> Self {
        Self {
            window_id: None,
            title: String::new(),
        }
    }

    pub fn is_observed(&self) -> bool {
        self.window_id.is_some()
    }
}

/// What the watcher knows about OS input focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusState {
    /// The dialog is the active window.
    Focused,
    /// Another window is active.
    Elsewhere { title: String },
    /// Focus could not be determined.
    Unknown { reason: String },
}

/// What to do when the dialog is not known to hold focus before typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusPolicy {
    /// Refuse to type when another window is active; warn when unknown.
    #[default]
    Require,
    /// Log a warning and type anyway.
    Warn,
}

/// Waits for the native signing dialog and manages its focus.
#[async_trait]
pub trait DialogWatcher: Send + Sync {
    /// Block until the dialog is visible or `timeout` elapses.
    async fn wait_for_dialog(&self, timeout: Duration) -> Result<DialogHandle, DialogError>;

    /// Try to raise the dialog and report who holds focus afterwards.
    async fn focus(&self, dialog: &DialogHandle) -> FocusState;
}
