//! Portal navigation for erap-signer over the Chrome DevTools Protocol.
//!
//! - [`cdp`] - WebSocket CDP client and page sessions
//! - [`manager`] - Chrome launch/attach with a persistent profile
//! - [`CdpPortalNavigator`] - clicks through the portal's sign-in UI

pub mod cdp;
pub mod manager;
mod navigator;

pub use navigator::{CdpPortalNavigator, PortalSettings};

#[cfg(test)]
pub(crate) mod test_support;
