//! WindowController: list, search, active window, activate.

use std::collections::HashSet;
use std::time::Duration;

use tracing::debug;

use super::parsers::{escape_search_pattern, parse_window_ids, parse_wmctrl_windows, title_matches};
use super::{WindowError, WindowInfo};
use crate::command::{run_tool, CommandError};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Window controller backed by `wmctrl` and `xdotool`.
#[derive(Debug, Clone)]
pub struct WindowController {
    wmctrl: String,
    xdotool: String,
    timeout: Duration,
}

impl WindowController {
    /// Create a controller using the tools found on `PATH`.
    pub fn new() -> Self {
        Self {
            wmctrl: "wmctrl".to_string(),
            xdotool: "xdotool".to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_xdotool(mut self, program: impl Into<String>) -> Self {
        self.xdotool = program.into();
        self
    }

    pub fn with_wmctrl(mut self, program: impl Into<String>) -> Self {
        self.wmctrl = program.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// List all managed windows through `wmctrl`.
    pub async fn list_windows(&self) -> Result<Vec<WindowInfo>, WindowError> {
        let args = ["-l", "-p", "-G"].map(String::from);
        let stdout = run_tool(&self.wmctrl, &args, None, self.timeout)
            .await
            .map_err(|e| match e {
                CommandError::NotFound { program } => {
                    WindowError::Unavailable(format!("{} not found", program))
                }
                other => WindowError::ListFailed(other.to_string()),
            })?;
        Ok(parse_wmctrl_windows(&stdout))
    }

    /// Windows whose title contains any of `patterns`, case-insensitively.
    ///
    /// Falls back to `xdotool search` when `wmctrl` is not installed.
    pub async fn find_windows(&self, patterns: &[String]) -> Result<Vec<WindowInfo>, WindowError> {
        match self.list_windows().await {
            Ok(windows) => Ok(windows
                .into_iter()
                .filter(|w| title_matches(&w.title, patterns))
                .collect()),
            Err(WindowError::Unavailable(reason)) => {
                debug!("{}; searching with xdotool", reason);
                self.search_windows(patterns).await
            }
            Err(e) => Err(e),
        }
    }

    /// `xdotool search --onlyvisible --name` per pattern, deduplicated.
    pub async fn search_windows(&self, patterns: &[String]) -> Result<Vec<WindowInfo>, WindowError> {
        let mut seen = HashSet::new();
        let mut windows = Vec::new();

        for pattern in patterns.iter().filter(|p| !p.trim().is_empty()) {
            let args = vec![
                "search".to_string(),
                "--onlyvisible".to_string(),
                "--name".to_string(),
                escape_search_pattern(pattern),
            ];
            let ids = match run_tool(&self.xdotool, &args, None, self.timeout).await {
                Ok(stdout) => parse_window_ids(&stdout),
                // xdotool exits 1 when nothing matches
                Err(CommandError::NonZeroExit { code: 1, .. }) => Vec::new(),
                Err(CommandError::NotFound { .. }) => {
                    return Err(WindowError::Unavailable(
                        "neither wmctrl nor xdotool is installed".to_string(),
                    ));
                }
                Err(e) => return Err(WindowError::ListFailed(e.to_string())),
            };

            for id in ids {
                if seen.insert(id) {
                    let title = self.window_name(id).await.unwrap_or_default();
                    windows.push(WindowInfo::titled(id, title));
                }
            }
        }

        Ok(windows)
    }

    /// The window that currently holds input focus.
    pub async fn active_window(&self) -> Result<WindowInfo, WindowError> {
        let stdout = run_tool(
            &self.xdotool,
            &["getactivewindow".to_string()],
            None,
            self.timeout,
        )
        .await
        .map_err(|e| WindowError::ActiveFailed(e.to_string()))?;

        let id = parse_window_ids(&stdout)
            .into_iter()
            .next()
            .ok_or_else(|| WindowError::ActiveFailed("no active window reported".to_string()))?;
        let title = self.window_name(id).await?;
        Ok(WindowInfo::titled(id, title))
    }

    /// Raise and focus a window. Tries `wmctrl -i -a`, then `xdotool windowactivate`.
    pub async fn activate(&self, id: u64) -> Result<(), WindowError> {
        let args = vec!["-i".to_string(), "-a".to_string(), format!("0x{:x}", id)];
        match run_tool(&self.wmctrl, &args, None, self.timeout).await {
            Ok(_) => Ok(()),
            Err(CommandError::NotFound { .. }) => {
                let args = vec!["windowactivate".to_string(), id.to_string()];
                run_tool(&self.xdotool, &args, None, self.timeout)
                    .await
                    .map(|_| ())
                    .map_err(|e| WindowError::FocusFailed(e.to_string()))
            }
            Err(e) => Err(WindowError::FocusFailed(e.to_string())),
        }
    }

    async fn window_name(&self, id: u64) -> Result<String, WindowError> {
        let args = vec!["getwindowname".to_string(), id.to_string()];
        run_tool(&self.xdotool, &args, None, self.timeout)
            .await
            .map(|s| s.trim().to_string())
            .map_err(|e| WindowError::ActiveFailed(e.to_string()))
    }
}

impl Default for WindowController {
    fn default() -> Self {
        Self::new()
    }
}
