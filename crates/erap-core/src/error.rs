//! Login failure taxonomy.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dialog::DialogError;
use crate::keystroke::InjectError;
use crate::navigator::NavigatorError;

/// Kind of a failed login attempt, as reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The "Sign in with EDS" control was not found or the page failed.
    NavigationFailure,
    /// The native signing dialog never appeared.
    DialogTimeout,
    /// No keystroke strategy could deliver the password.
    InjectionFailure,
    /// The post-login page was not reached in time.
    VerificationTimeout,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::NavigationFailure => "NavigationFailure",
            FailureKind::DialogTimeout => "DialogTimeout",
            FailureKind::InjectionFailure => "InjectionFailure",
            FailureKind::VerificationTimeout => "VerificationTimeout",
        };
        f.write_str(name)
    }
}

/// Errors that end a login attempt.
#[derive(Debug, Error)]
pub enum LoginError {
    #[error("navigation failed: {0}")]
    Navigation(#[from] NavigatorError),

    #[error("signing dialog did not appear: {0}")]
    Dialog(#[from] DialogError),

    #[error("keystroke injection failed: {0}")]
    Injection(#[from] InjectError),

    /// Another window held focus and the policy forbids typing blind.
    #[error("signing dialog is not focused (active window: {active:?}); password not typed")]
    FocusNotHeld { active: String },

    #[error("post-login page not reached within {waited:?} (last URL: {last_url})")]
    VerificationTimeout { waited: Duration, last_url: String },
}

impl LoginError {
    /// Map to the caller-facing failure kind.
    pub fn kind(&self) -> FailureKind {
        match self {
            LoginError::Navigation(_) => FailureKind::NavigationFailure,
            LoginError::Dialog(_) => FailureKind::DialogTimeout,
            LoginError::Injection(_) | LoginError::FocusNotHeld { .. } => {
                FailureKind::InjectionFailure
            }
            LoginError::VerificationTimeout { .. } => FailureKind::VerificationTimeout,
        }
    }
}
