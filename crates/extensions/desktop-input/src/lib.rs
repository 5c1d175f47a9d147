//! Desktop input for erap-signer.
//!
//! ## Keystroke sinks
//! - [`XdotoolSink`] - `xdotool type`/`xdotool key`, secret fed through stdin
//! - [`EnigoSink`] - in-process input through `enigo`
//!
//! ## Dialog watchers
//! - [`PollingDialogWatcher`] - polls the window list for the signing dialog
//! - [`FixedDelayWatcher`] - sleeps and assumes the dialog is up
//!
//! ## Window management
//! - [`WindowController`] - `wmctrl` listing and activation, `xdotool` fallback

mod command;
mod enigo_sink;
mod watcher;
mod window;
mod xdotool;

pub use command::{probe_tool, CommandError};
pub use enigo_sink::EnigoSink;
pub use watcher::{FixedDelayWatcher, PollingDialogWatcher, WindowSource};
pub use window::{title_matches, WindowController, WindowError, WindowInfo};
pub use xdotool::XdotoolSink;
