//! # erap-core
//!
//! Login orchestration for the eRAP portal EDS sign-in flow.
//!
//! The flow crosses two automation surfaces that cannot talk to each other:
//! a browser session that clicks through the portal, and the native NCALayer
//! dialog that only accepts OS-level keyboard input. This crate holds the
//! capability traits for both sides and the state machine that sequences them.
//!
//! ## Core Traits
//!
//! - [`PortalNavigator`] - Drives the browser to the "Sign in with EDS" control
//! - [`DialogWatcher`] - Detects the native signing dialog and checks focus
//! - [`KeystrokeSink`] - One strategy for delivering synthetic keystrokes
//!
//! ## Orchestration
//!
//! - [`RankedInjector`] - Tries keystroke strategies in order until one succeeds
//! - [`LoginOrchestrator`] - Idle → Navigating → AwaitingDialog → Injecting →
//!   Verifying → Succeeded | Failed

pub mod credential;
pub mod dialog;
pub mod error;
pub mod indicator;
pub mod injector;
pub mod keystroke;
pub mod navigator;
pub mod orchestrator;
pub mod outcome;
pub mod state;

pub use credential::Credential;
pub use dialog::{DialogError, DialogHandle, DialogWatcher, FocusPolicy, FocusState};
pub use error::{FailureKind, LoginError};
pub use indicator::LoginIndicator;
pub use injector::RankedInjector;
pub use keystroke::{InjectError, Key, KeystrokeSink};
pub use navigator::{NavigatorError, PortalNavigator};
pub use orchestrator::{LoginOrchestrator, OrchestratorConfig};
pub use outcome::{LoginReport, SessionOutcome};
pub use state::LoginState;

#[cfg(test)]
pub(crate) mod test_support;
