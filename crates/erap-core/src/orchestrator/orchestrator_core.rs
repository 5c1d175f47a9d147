//! LoginOrchestrator: state machine driving one login attempt.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::credential::Credential;
use crate::dialog::{DialogHandle, DialogWatcher, FocusPolicy, FocusState};
use crate::error::LoginError;
use crate::injector::RankedInjector;
use crate::navigator::PortalNavigator;
use crate::outcome::{LoginReport, SessionOutcome};
use crate::state::LoginState;

use super::OrchestratorConfig;

/// Runs login attempts against the portal.
///
/// Attempts on one orchestrator never overlap: `run` holds an async lock for
/// its whole duration, so concurrent callers queue up.
pub struct LoginOrchestrator {
    navigator: Arc<dyn PortalNavigator>,
    watcher: Arc<dyn DialogWatcher>,
    injector: RankedInjector,
    config: OrchestratorConfig,
    state: Mutex<LoginState>,
    history: Mutex<Vec<LoginState>>,
    run_lock: tokio::sync::Mutex<()>,
}

impl LoginOrchestrator {
    pub fn new(
        navigator: Arc<dyn PortalNavigator>,
        watcher: Arc<dyn DialogWatcher>,
        injector: RankedInjector,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            navigator,
            watcher,
            injector,
            config,
            state: Mutex::new(LoginState::Idle),
            history: Mutex::new(Vec::new()),
            run_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Current state of the running (or last) attempt.
    pub fn state(&self) -> LoginState {
        *self.state.lock()
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Run one login attempt to completion.
    pub async fn run(&self, credential: &Credential) -> LoginReport {
        let _guard = self.run_lock.lock().await;

        self.history.lock().clear();
        *self.state.lock() = LoginState::Idle;
        let started_at = Utc::now();

        let result = self.attempt(credential).await;
        let outcome = SessionOutcome::from(result);

        match &outcome {
            SessionOutcome::Succeeded { final_url } => {
                self.transition(LoginState::Succeeded);
                info!("Login succeeded, landed on {}", final_url);
            }
            SessionOutcome::Failed { kind, reason } => {
                self.transition(LoginState::Failed);
                warn!("Login failed ({}): {}", kind, reason);
            }
        }

        if self.config.shutdown_on_finish {
            if let Err(e) = self.navigator.shutdown().await {
                warn!("Failed to shut down browser session: {}", e);
            }
        }

        LoginReport {
            outcome,
            started_at,
            finished_at: Utc::now(),
            states: self.history.lock().clone(),
        }
    }

    async fn attempt(&self, credential: &Credential) -> Result<String, LoginError> {
        self.transition(LoginState::Navigating);
        self.navigator.open_portal(&self.config.base_url).await?;
        self.navigator.request_signature().await?;

        self.transition(LoginState::AwaitingDialog);
        let dialog = self
            .watcher
            .wait_for_dialog(self.config.dialog_timeout)
            .await?;
        if dialog.is_observed() {
            info!("Signing dialog detected: {:?}", dialog.title);
        }

        if !self.config.settle_delay.is_zero() {
            tokio::time::sleep(self.config.settle_delay).await;
        }
        self.check_focus(&dialog).await?;

        self.transition(LoginState::Injecting);
        info!(
            "Typing certificate password ({} chars)",
            credential.char_count()
        );
        self.injector.send_secret(credential).await?;

        if !self.config.certificate_keys.is_empty() {
            if !self.config.certificate_delay.is_zero() {
                tokio::time::sleep(self.config.certificate_delay).await;
            }
            debug!("Confirming certificate: {:?}", self.config.certificate_keys);
            self.injector
                .send_keys(&self.config.certificate_keys)
                .await?;
        }

        self.transition(LoginState::Verifying);
        self.verify().await
    }

    async fn check_focus(&self, dialog: &DialogHandle) -> Result<(), LoginError> {
        match self.watcher.focus(dialog).await {
            FocusState::Focused => {
                debug!("Signing dialog holds focus");
                Ok(())
            }
            FocusState::Elsewhere { title } => match self.config.focus_policy {
                FocusPolicy::Require => Err(LoginError::FocusNotHeld { active: title }),
                FocusPolicy::Warn => {
                    warn!(
                        "Active window is {:?}, not the signing dialog; typing anyway",
                        title
                    );
                    Ok(())
                }
            },
            FocusState::Unknown { reason } => {
                warn!(
                    "Cannot confirm the signing dialog holds focus ({}); keystrokes go to whatever window is active",
                    reason
                );
                Ok(())
            }
        }
    }

    async fn verify(&self) -> Result<String, LoginError> {
        let timeout = self.config.verify_timeout;
        let deadline = Instant::now() + timeout;
        let mut last_url = String::new();
        let mut polls: u32 = 0;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match tokio::time::timeout(remaining, self.navigator.current_url()).await {
                Ok(Ok(url)) => {
                    if self.config.indicator.matches(&url) {
                        return Ok(url);
                    }
                    last_url = url;
                }
                Ok(Err(e)) => debug!("Reading page URL failed: {}", e),
                Err(_) => {}
            }

            polls += 1;
            if polls % 5 == 1 {
                info!("Waiting for post-login page (check {})", polls);
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(LoginError::VerificationTimeout {
                    waited: timeout,
                    last_url,
                });
            }
            tokio::time::sleep(remaining.min(self.config.verify_poll_interval)).await;
        }
    }

    fn transition(&self, next: LoginState) {
        let prev = std::mem::replace(&mut *self.state.lock(), next);
        self.history.lock().push(next);
        info!("Login state: {} -> {}", prev, next);
    }
}
