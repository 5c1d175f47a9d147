//! Login orchestration.
//!
//! Sequences the portal navigator, the dialog watcher and the keystroke
//! injector. The browser and the native dialog share no channel, so every
//! handoff is a bounded poll of observable state:
//!
//! ```text
//! Idle → Navigating → AwaitingDialog → Injecting → Verifying → Succeeded
//!            │               │              │            │
//!            └───────────────┴──────────────┴────────────┴──→ Failed
//! ```

mod orchestrator_config;
mod orchestrator_core;

pub use orchestrator_config::OrchestratorConfig;
pub use orchestrator_core::LoginOrchestrator;

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
