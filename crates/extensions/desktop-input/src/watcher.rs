//! Native signing dialog watchers.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use erap_core::{DialogError, DialogHandle, DialogWatcher, FocusState};
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::window::{title_matches, WindowController, WindowError, WindowInfo};

/// Window manager gets this long to apply an activation before focus is read.
const ACTIVATE_SETTLE: Duration = Duration::from_millis(150);

/// The window operations a dialog watcher needs.
#[async_trait]
pub trait WindowSource: Send + Sync {
    async fn find_windows(&self, patterns: &[String]) -> Result<Vec<WindowInfo>, WindowError>;
    async fn active_window(&self) -> Result<WindowInfo, WindowError>;
    async fn activate(&self, id: u64) -> Result<(), WindowError>;
}

#[async_trait]
impl WindowSource for WindowController {
    async fn find_windows(&self, patterns: &[String]) -> Result<Vec<WindowInfo>, WindowError> {
        WindowController::find_windows(self, patterns).await
    }

    async fn active_window(&self) -> Result<WindowInfo, WindowError> {
        WindowController::active_window(self).await
    }

    async fn activate(&self, id: u64) -> Result<(), WindowError> {
        WindowController::activate(self, id).await
    }
}

/// Polls the window list until a window title matches one of the patterns.
pub struct PollingDialogWatcher {
    source: Arc<dyn WindowSource>,
    patterns: Vec<String>,
    poll_interval: Duration,
}

impl PollingDialogWatcher {
    pub fn new(source: Arc<dyn WindowSource>, patterns: Vec<String>, poll_interval: Duration) -> Self {
        Self {
            source,
            patterns,
            poll_interval,
        }
    }
}

#[async_trait]
impl DialogWatcher for PollingDialogWatcher {
    async fn wait_for_dialog(&self, timeout: Duration) -> Result<DialogHandle, DialogError> {
        let started = Instant::now();
        let deadline = started + timeout;
        let mut last_error = None;
        let mut polls = 0u32;

        loop {
            polls += 1;
            match self.source.find_windows(&self.patterns).await {
                Ok(windows) => {
                    if let Some(window) = windows.into_iter().next() {
                        info!(
                            "Signing dialog '{}' (0x{:x}) found after {:?}",
                            window.title,
                            window.id,
                            started.elapsed()
                        );
                        return Ok(DialogHandle::new(Some(window.id), window.title));
                    }
                    debug!(polls, "No window matching {:?} yet", self.patterns);
                }
                Err(WindowError::Unavailable(reason)) => {
                    return Err(DialogError::Unavailable(reason));
                }
                Err(e) => {
                    debug!(polls, "Window probe failed: {}", e);
                    last_error = Some(e.to_string());
                }
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(DialogError::Timeout {
                    patterns: self.patterns.clone(),
                    waited: started.elapsed(),
                    detail: last_error,
                });
            }
            sleep(self.poll_interval.min(deadline - now)).await;
        }
    }

    async fn focus(&self, dialog: &DialogHandle) -> FocusState {
        let Some(id) = dialog.window_id else {
            return FocusState::Unknown {
                reason: "dialog window was not observed".to_string(),
            };
        };

        if let Err(e) = self.source.activate(id).await {
            warn!("Could not activate signing dialog: {}", e);
        }
        sleep(ACTIVATE_SETTLE).await;

        match self.source.active_window().await {
            Ok(active) if active.id == id => FocusState::Focused,
            // NCALayer may stack a second window over the one we found.
            Ok(active) if title_matches(&active.title, &self.patterns) => FocusState::Focused,
            Ok(active) => FocusState::Elsewhere {
                title: active.title,
            },
            Err(e) => FocusState::Unknown {
                reason: e.to_string(),
            },
        }
    }
}

/// Sleeps a fixed delay and assumes the dialog is up.
pub struct FixedDelayWatcher {
    delay: Duration,
}

impl FixedDelayWatcher {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl DialogWatcher for FixedDelayWatcher {
    async fn wait_for_dialog(&self, _timeout: Duration) -> Result<DialogHandle, DialogError> {
        debug!("Waiting {:?} for the signing dialog", self.delay);
        sleep(self.delay).await;
        Ok(DialogHandle::assumed())
    }

    async fn focus(&self, _dialog: &DialogHandle) -> FocusState {
        FocusState::Unknown {
            reason: "fixed-delay mode does not observe windows".to_string(),
        }
    }
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
