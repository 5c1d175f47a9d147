//! Portal navigation protocol.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Portal navigation errors.
#[derive(Debug, Error)]
pub enum NavigatorError {
    /// None of the control labels became clickable in time.
    #[error("control {labels:?} not found within {waited:?}")]
    ControlNotFound { labels: Vec<String>, waited: Duration },

    /// The portal page did not load.
    #[error("page load failed: {0}")]
    LoadFailed(String),

    /// The browser session itself failed.
    #[error("browser error: {0}")]
    Browser(String),
}

/// Drives a browser session through the portal's sign-in UI.
#[async_trait]
pub trait PortalNavigator: Send + Sync {
    /// Open `url` and wait for the page to load.
    async fn open_portal(&self, url: &str) -> Result<(), NavigatorError>;

    /// Click through to the "Sign in with EDS" control.
    ///
    /// Clicking it makes the portal ask NCALayer for a signature, which opens
    /// the native password dialog outside the browser.
    async fn request_signature(&self) -> Result<(), NavigatorError>;

    /// URL of the page the session is currently on.
    async fn current_url(&self) -> Result<String, NavigatorError>;

    /// Release the browser session.
    async fn shutdown(&self) -> Result<(), NavigatorError> {
        Ok(())
    }
}
