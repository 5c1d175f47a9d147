//! Chrome DevTools Protocol (CDP) client.
//!
//! Connects to Chrome/Chromium started with `--remote-debugging-port` and
//! speaks the CDP JSON-RPC protocol over a WebSocket.
//!
//! ```rust,ignore
//! let client = CdpClient::connect("http://127.0.0.1:9222").await?;
//! let page = client.new_page().await?;
//! page.navigate("https://erap-public.kgp.kz/#/login").await?;
//! ```

mod client;
mod error;
mod protocol;
mod session;

pub use client::CdpClient;
pub use error::CdpError;
pub use protocol::*;
pub use session::PageSession;
