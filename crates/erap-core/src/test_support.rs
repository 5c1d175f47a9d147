//! In-memory fakes for the capability traits.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::dialog::{DialogError, DialogHandle, DialogWatcher, FocusState};
use crate::keystroke::{InjectError, Key, KeystrokeSink};
use crate::navigator::{NavigatorError, PortalNavigator};

/// Something a sink delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivered {
    Text(String),
    Key(Key),
}

pub type DeliveryLog = Arc<Mutex<Vec<(String, Delivered)>>>;

/// Sink that records what it was asked to deliver.
pub struct RecordingSink {
    name: String,
    log: DeliveryLog,
    fail_text: bool,
    /// Keys pressed successfully before every further key fails.
    keys_before_failure: Option<usize>,
    keys_pressed: AtomicUsize,
}

impl RecordingSink {
    pub fn new(name: &str, log: DeliveryLog) -> Self {
        Self {
            name: name.to_string(),
            log,
            fail_text: false,
            keys_before_failure: None,
            keys_pressed: AtomicUsize::new(0),
        }
    }

    /// A sink whose tool is missing.
    pub fn unavailable(name: &str, log: DeliveryLog) -> Self {
        Self {
            fail_text: true,
            keys_before_failure: Some(0),
            ..Self::new(name, log)
        }
    }

    /// Types text fine but cannot press keys.
    pub fn broken_keys(name: &str, log: DeliveryLog) -> Self {
        Self::keys_fail_after(name, log, 0)
    }

    /// Presses `count` keys, then fails on every key after that.
    pub fn keys_fail_after(name: &str, log: DeliveryLog, count: usize) -> Self {
        Self {
            keys_before_failure: Some(count),
            ..Self::new(name, log)
        }
    }
}

#[async_trait]
impl KeystrokeSink for RecordingSink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn type_text(&self, text: &str) -> Result<(), InjectError> {
        if self.fail_text {
            return Err(InjectError::Unavailable {
                tool: self.name.clone(),
                message: "not installed".to_string(),
            });
        }
        self.log
            .lock()
            .push((self.name.clone(), Delivered::Text(text.to_string())));
        Ok(())
    }

    async fn press_key(&self, key: Key) -> Result<(), InjectError> {
        let pressed = self.keys_pressed.load(Ordering::SeqCst);
        if self.keys_before_failure.is_some_and(|limit| pressed >= limit) {
            return Err(InjectError::NonZeroExit {
                tool: self.name.clone(),
                code: 1,
                stderr: "key failed".to_string(),
            });
        }
        self.keys_pressed.fetch_add(1, Ordering::SeqCst);
        self.log.lock().push((self.name.clone(), Delivered::Key(key)));
        Ok(())
    }
}

/// Navigator that replays scripted results.
pub struct ScriptedNavigator {
    pub control_present: bool,
    urls: Mutex<VecDeque<String>>,
    pub opened: Mutex<Vec<String>>,
    pub signature_requests: Mutex<u32>,
    pub shutdowns: Mutex<u32>,
}

impl ScriptedNavigator {
    /// `urls` are returned by successive `current_url` calls; the last repeats.
    pub fn new(control_present: bool, urls: &[&str]) -> Self {
        Self {
            control_present,
            urls: Mutex::new(urls.iter().map(|u| u.to_string()).collect()),
            opened: Mutex::new(Vec::new()),
            signature_requests: Mutex::new(0),
            shutdowns: Mutex::new(0),
        }
    }
}

#[async_trait]
impl PortalNavigator for ScriptedNavigator {
    async fn open_portal(&self, url: &str) -> Result<(), NavigatorError> {
        self.opened.lock().push(url.to_string());
        Ok(())
    }

    async fn request_signature(&self) -> Result<(), NavigatorError> {
        *self.signature_requests.lock() += 1;
        if self.control_present {
            Ok(())
        } else {
            Err(NavigatorError::ControlNotFound {
                labels: vec!["Выбрать сертификат".to_string()],
                waited: Duration::from_millis(50),
            })
        }
    }

    async fn current_url(&self) -> Result<String, NavigatorError> {
        let mut urls = self.urls.lock();
        if urls.len() > 1 {
            Ok(urls.pop_front().unwrap_or_default())
        } else {
            Ok(urls.front().cloned().unwrap_or_default())
        }
    }

    async fn shutdown(&self) -> Result<(), NavigatorError> {
        *self.shutdowns.lock() += 1;
        Ok(())
    }
}

/// Watcher whose dialog shows up after a delay, or never.
pub struct DelayedWatcher {
    appears_after: Option<Duration>,
    focus: FocusState,
}

impl DelayedWatcher {
    pub fn appearing_after(delay: Duration) -> Self {
        Self {
            appears_after: Some(delay),
            focus: FocusState::Focused,
        }
    }

    pub fn never() -> Self {
        Self {
            appears_after: None,
            focus: FocusState::Focused,
        }
    }

    pub fn with_focus(mut self, focus: FocusState) -> Self {
        self.focus = focus;
        self
    }
}

#[async_trait]
impl DialogWatcher for DelayedWatcher {
    async fn wait_for_dialog(&self, timeout: Duration) -> Result<DialogHandle, DialogError> {
        match self.appears_after {
            Some(delay) if delay <= timeout => {
                tokio::time::sleep(delay).await;
                Ok(DialogHandle::new(Some(0x3a00007), "NCALayer"))
            }
            _ => {
                tokio::time::sleep(timeout).await;
                Err(DialogError::Timeout {
                    patterns: vec!["NCALayer".to_string()],
                    waited: timeout,
                    detail: None,
                })
            }
        }
    }

    async fn focus(&self, _dialog: &DialogHandle) -> FocusState {
        self.focus.clone()
    }
}
