//! Keystroke delivery protocol.
//!
//! A [`KeystrokeSink`] synthesizes keyboard input for whichever window holds
//! OS focus. Implementations live in the desktop input extension (xdotool,
//! enigo); [`crate::RankedInjector`] chains them.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Keystroke delivery errors.
#[derive(Debug, Error)]
pub enum InjectError {
    /// The mechanism cannot be used on this host (tool missing, no display).
    #[error("{tool} is not available: {message}")]
    Unavailable { tool: String, message: String },

    /// An external tool ran but reported failure.
    #[error("{tool} exited with status {code}: {stderr}")]
    NonZeroExit {
        tool: String,
        code: i32,
        stderr: String,
    },

    /// An external tool did not finish in time.
    #[error("{tool} timed out after {after:?}")]
    Timeout { tool: String, after: Duration },

    /// Input failed for another reason.
    #[error("Input failed: {0}")]
    Failed(String),

    /// Every configured strategy failed.
    #[error("All keystroke strategies failed: {0}")]
    Exhausted(String),

    /// Nothing to try.
    #[error("No keystroke strategies configured")]
    NoStrategies,
}

/// Keys the sign-in flow needs besides plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    #[serde(alias = "return")]
    Enter,
    Tab,
    #[serde(alias = "esc")]
    Escape,
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Key::Enter => "enter",
            Key::Tab => "tab",
            Key::Escape => "escape",
        };
        f.write_str(name)
    }
}

impl FromStr for Key {
    type Err = InjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "enter" | "return" => Ok(Key::Enter),
            "tab" => Ok(Key::Tab),
            "escape" | "esc" => Ok(Key::Escape),
            other => Err(InjectError::Failed(format!("Invalid key: {}", other))),
        }
    }
}

/// One way of synthesizing keyboard input.
#[async_trait]
pub trait KeystrokeSink: Send + Sync {
    /// Short name used in logs and error messages.
    fn name(&self) -> &str;

    /// Type `text` into the focused window.
    async fn type_text(&self, text: &str) -> Result<(), InjectError>;

    /// Press and release a single key.
    async fn press_key(&self, key: Key) -> Result<(), InjectError>;
}
