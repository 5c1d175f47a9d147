//! Window listing and activation on X11.
//!
//! Uses `wmctrl` when present and falls back to `xdotool search`.

mod parsers;
mod window_controller;
mod window_types;

pub use window_controller::WindowController;
pub use window_types::{WindowError, WindowInfo};

pub use parsers::title_matches;

#[cfg(test)]
#[path = "window_tests.rs"]
mod tests;
