//! `xdotool` keystroke sink.

use std::time::Duration;

use async_trait::async_trait;
use erap_core::{InjectError, Key, KeystrokeSink};
use tracing::debug;

use crate::command::run_tool;

const DEFAULT_TYPING_DELAY: Duration = Duration::from_millis(100);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Types through the `xdotool` command-line tool.
///
/// Text is passed with `type --file -` so it only ever travels over the
/// child's stdin and never shows up in the process table.
#[derive(Debug, Clone)]
pub struct XdotoolSink {
    program: String,
    typing_delay: Duration,
    timeout: Duration,
}

impl XdotoolSink {
    /// Create a sink running `program` (usually just `"xdotool"`).
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            typing_delay: DEFAULT_TYPING_DELAY,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Delay between typed characters.
    pub fn with_typing_delay(mut self, delay: Duration) -> Self {
        self.typing_delay = delay;
        self
    }

    /// Upper bound on a single invocation. Typing time is added on top.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn type_timeout(&self, text: &str) -> Duration {
        let chars = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
        self.timeout + self.typing_delay.saturating_mul(chars)
    }
}

impl Default for XdotoolSink {
    fn default() -> Self {
        Self::new("xdotool")
    }
}

#[async_trait]
impl KeystrokeSink for XdotoolSink {
    fn name(&self) -> &str {
        "xdotool"
    }

    async fn type_text(&self, text: &str) -> Result<(), InjectError> {
        debug!(chars = text.chars().count(), "xdotool: typing text");
        run_tool(
            &self.program,
            &type_args(self.typing_delay),
            Some(text),
            self.type_timeout(text),
        )
        .await?;
        Ok(())
    }

    async fn press_key(&self, key: Key) -> Result<(), InjectError> {
        debug!(%key, "xdotool: pressing key");
        run_tool(&self.program, &key_args(key), None, self.timeout).await?;
        Ok(())
    }
}

/// `xdotool type` arguments; the text itself comes from stdin.
pub(crate) fn type_args(delay: Duration) -> Vec<String> {
    vec![
        "type".to_string(),
        "--clearmodifiers".to_string(),
        "--delay".to_string(),
        delay.as_millis().to_string(),
        "--file".to_string(),
        "-".to_string(),
    ]
}

pub(crate) fn key_args(key: Key) -> Vec<String> {
    vec![
        "key".to_string(),
        "--clearmodifiers".to_string(),
        keysym(key).to_string(),
    ]
}

/// X keysym name for a key.
fn keysym(key: Key) -> &'static str {
    match key {
        Key::Enter => "Return",
        Key::Tab => "Tab",
        Key::Escape => "Escape",
    }
}

#[cfg(test)]
#[path = "xdotool_tests.rs"]
mod tests;
