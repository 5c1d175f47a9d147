//! Browser instance manager.
//!
//! Attaches to Chrome on its debugging port, or launches it with a dedicated
//! profile so portal cookies survive between runs.

mod manager_core;
mod manager_types;

pub use manager_core::BrowserManager;
pub use manager_types::{BrowserError, BrowserManagerConfig};

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
