//! Login state machine states.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a login attempt currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginState {
    #[default]
    Idle,
    Navigating,
    AwaitingDialog,
    Injecting,
    Verifying,
    Succeeded,
    Failed,
}

impl LoginState {
    /// Whether the attempt has ended.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoginState::Succeeded | LoginState::Failed)
    }
}

impl fmt::Display for LoginState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoginState::Idle => "idle",
            LoginState::Navigating => "navigating",
            LoginState::AwaitingDialog => "awaiting_dialog",
            LoginState::Injecting => "injecting",
            LoginState::Verifying => "verifying",
            LoginState::Succeeded => "succeeded",
            LoginState::Failed => "failed",
        };
        f.write_str(name)
    }
}
