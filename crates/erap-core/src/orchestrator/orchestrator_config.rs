//! Orchestrator timing and policy settings.

use std::time::Duration;

use crate::dialog::FocusPolicy;
use crate::indicator::LoginIndicator;
use crate::keystroke::Key;

/// Settings for one [`super::LoginOrchestrator`].
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Portal login page.
    pub base_url: String,
    /// How long to wait for the native dialog.
    pub dialog_timeout: Duration,
    /// Pause between dialog detection and typing, to let it finish rendering.
    pub settle_delay: Duration,
    /// Focus check behaviour before the password is typed.
    pub focus_policy: FocusPolicy,
    /// Keys pressed in the certificate list dialog after the password.
    pub certificate_keys: Vec<Key>,
    /// Pause before the certificate keys, while the second dialog opens.
    pub certificate_delay: Duration,
    /// How long to wait for the post-login page.
    pub verify_timeout: Duration,
    pub verify_poll_interval: Duration,
    pub indicator: LoginIndicator,
    /// Close the browser when the attempt ends.
    pub shutdown_on_finish: bool,
}

impl OrchestratorConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            indicator: LoginIndicator::new(
                base_url.clone(),
                vec!["personal".to_string(), "cabinet".to_string(), "main".to_string()],
            ),
            base_url,
            dialog_timeout: Duration::from_secs(15),
            settle_delay: Duration::from_millis(800),
            focus_policy: FocusPolicy::Require,
            certificate_keys: vec![Key::Enter, Key::Tab, Key::Enter],
            certificate_delay: Duration::from_millis(2500),
            verify_timeout: Duration::from_secs(20),
            verify_poll_interval: Duration::from_secs(1),
            shutdown_on_finish: true,
        }
    }
}
