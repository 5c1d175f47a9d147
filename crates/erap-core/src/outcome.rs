//! Result of one login attempt.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FailureKind, LoginError};
use crate::state::LoginState;

/// Session outcome handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionOutcome {
    Succeeded { final_url: String },
    Failed { kind: FailureKind, reason: String },
}

impl SessionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SessionOutcome::Succeeded { .. })
    }

    /// Failure kind, if the attempt failed.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            SessionOutcome::Succeeded { .. } => None,
            SessionOutcome::Failed { kind, .. } => Some(*kind),
        }
    }
}

impl From<Result<String, LoginError>> for SessionOutcome {
    fn from(result: Result<String, LoginError>) -> Self {
        match result {
            Ok(final_url) => SessionOutcome::Succeeded { final_url },
            Err(e) => SessionOutcome::Failed {
                kind: e.kind(),
                reason: e.to_string(),
            },
        }
    }
}

/// Outcome plus timing and the states the attempt went through.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginReport {
    pub outcome: SessionOutcome,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub states: Vec<LoginState>,
}

impl LoginReport {
    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

#[cfg(test)]
#[path = "outcome_tests.rs"]
mod tests;
