//! Ranked keystroke injection.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::credential::Credential;
use crate::keystroke::{InjectError, Key, KeystrokeSink};

/// One keystroke action.
#[derive(Clone, Copy)]
enum Step<'a> {
    Text(&'a str),
    Key(Key),
}

/// Delivers keystrokes through the first strategy that works.
///
/// Strategies are tried in order. A strategy that fails hands over to the
/// next one at the step where it stopped: steps already delivered are never
/// repeated, so a password typed before a failed Enter is not typed again.
/// When all of them fail the errors are reported together and nothing more is
/// attempted.
#[derive(Clone)]
pub struct RankedInjector {
    sinks: Vec<Arc<dyn KeystrokeSink>>,
    key_pause: Duration,
}

impl RankedInjector {
    pub fn new(sinks: Vec<Arc<dyn KeystrokeSink>>) -> Self {
        Self {
            sinks,
            key_pause: Duration::from_millis(500),
        }
    }

    /// Pause between keys of a key sequence.
    pub fn with_key_pause(mut self, pause: Duration) -> Self {
        self.key_pause = pause;
        self
    }

    /// Names of the strategies, in the order they are tried.
    pub fn strategies(&self) -> Vec<&str> {
        self.sinks.iter().map(|s| s.name()).collect()
    }

    /// Type the password and submit it. Returns the strategy that finished it.
    pub async fn send_secret(&self, credential: &Credential) -> Result<String, InjectError> {
        self.deliver(&[Step::Text(credential.expose()), Step::Key(Key::Enter)])
            .await
    }

    /// Press `keys` one after another. Returns the strategy that finished them.
    pub async fn send_keys(&self, keys: &[Key]) -> Result<String, InjectError> {
        let steps: Vec<Step<'_>> = keys.iter().map(|k| Step::Key(*k)).collect();
        self.deliver(&steps).await
    }

    async fn deliver(&self, steps: &[Step<'_>]) -> Result<String, InjectError> {
        if self.sinks.is_empty() {
            return Err(InjectError::NoStrategies);
        }

        let mut next = 0;
        let mut failures = Vec::new();
        for sink in &self.sinks {
            if next > 0 {
                debug!("Continuing with {} at step {} of {}", sink.name(), next + 1, steps.len());
            } else {
                debug!("Delivering keystrokes via {}", sink.name());
            }
            match self.deliver_with(sink.as_ref(), steps, next).await {
                Ok(()) => {
                    info!("Keystrokes delivered via {}", sink.name());
                    return Ok(sink.name().to_string());
                }
                Err((reached, e)) => {
                    warn!("Keystroke strategy {} failed: {}", sink.name(), e);
                    failures.push(format!("{}: {}", sink.name(), e));
                    next = reached;
                }
            }
        }

        Err(InjectError::Exhausted(failures.join("; ")))
    }

    /// Run `steps[from..]` on one sink. On failure, returns the index of the
    /// step that failed alongside the error.
    async fn deliver_with(
        &self,
        sink: &dyn KeystrokeSink,
        steps: &[Step<'_>],
        from: usize,
    ) -> Result<(), (usize, InjectError)> {
        for (i, step) in steps.iter().enumerate().skip(from) {
            let result = match step {
                Step::Text(text) => sink.type_text(text).await,
                Step::Key(key) => {
                    let after_key = i > 0 && matches!(steps[i - 1], Step::Key(_));
                    if after_key && !self.key_pause.is_zero() {
                        tokio::time::sleep(self.key_pause).await;
                    }
                    sink.press_key(*key).await
                }
            };
            result.map_err(|e| (i, e))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "injector_tests.rs"]
mod tests;
