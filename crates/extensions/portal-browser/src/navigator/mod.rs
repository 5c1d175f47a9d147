//! Portal navigator backed by a CDP page.

mod navigator_core;
mod scripts;

pub use navigator_core::{CdpPortalNavigator, PortalSettings};

#[cfg(test)]
#[path = "navigator_tests.rs"]
mod tests;
