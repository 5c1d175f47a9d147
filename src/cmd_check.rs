//! `check` and `windows` commands.

use std::process::ExitCode;

use erap_config::{Config, ConfigValidator};
use erap_desktop_input::{probe_tool, title_matches, WindowError, WindowInfo};
use erap_portal_browser::manager::BrowserManager;

use crate::adapters;
use crate::{EXIT_CONFIG, EXIT_FAILED};

/// Report configuration problems and which external tools are usable.
pub(crate) async fn check(config: &Config) -> ExitCode {
    let mut config_ok = true;
    let mut tools_ok = true;

    println!("Configuration:");
    match ConfigValidator::validate(config) {
        Ok(result) => {
            for err in &result.errors {
                println!("  [error] {}: {}", err.path, err.message);
            }
            for warning in &result.warnings {
                println!("  [warn]  {}: {}", warning.path, warning.message);
            }
            if result.is_valid() {
                println!("  ok");
            } else {
                config_ok = false;
            }
        }
        Err(e) => {
            println!("  [error] {}", e);
            config_ok = false;
        }
    }

    println!("Desktop:");
    match std::env::var("DISPLAY") {
        Ok(display) if !display.is_empty() => println!("  DISPLAY  {}", display),
        _ => println!("  DISPLAY  not set (keystrokes need an X session)"),
    }
    print_tool("xdotool", probe_tool(&config.injector.xdotool_path, &["version"]).await);
    print_tool("wmctrl", probe_tool("wmctrl", &["-m"]).await);

    println!("Browser:");
    let manager = BrowserManager::new(adapters::browser_config(config));
    match manager.chrome_executable() {
        Some(path) => println!("  chrome   {}", path.display()),
        None => {
            println!("  chrome   not found (set browser.chrome_path)");
            tools_ok = false;
        }
    }
    if manager.is_chrome_running().await {
        println!("  debugger {} (running)", manager.config().endpoint());
    } else {
        println!("  debugger {} (not running, will be launched)", manager.config().endpoint());
    }

    if !config_ok {
        ExitCode::from(EXIT_CONFIG)
    } else if !tools_ok {
        ExitCode::from(EXIT_FAILED)
    } else {
        ExitCode::SUCCESS
    }
}

fn print_tool<E: std::fmt::Display>(name: &str, result: Result<String, E>) {
    match result {
        Ok(version) => println!("  {:<8} {}", name, version),
        Err(e) => println!("  {:<8} unavailable: {}", name, e),
    }
}

/// List windows and mark the ones the dialog watcher would pick.
pub(crate) async fn windows(config: &Config, pattern: Option<String>, json: bool) -> ExitCode {
    let patterns = match pattern {
        Some(p) => vec![p],
        None => config.dialog.title_patterns.clone(),
    };

    let controller = adapters::window_controller(config);
    let windows = match controller.list_windows().await {
        Ok(windows) => windows,
        Err(WindowError::Unavailable(_)) => match controller.find_windows(&patterns).await {
            Ok(windows) => windows,
            Err(e) => {
                eprintln!("Failed to list windows: {}", e);
                return ExitCode::from(EXIT_FAILED);
            }
        },
        Err(e) => {
            eprintln!("Failed to list windows: {}", e);
            return ExitCode::from(EXIT_FAILED);
        }
    };

    if json {
        let entries: Vec<serde_json::Value> = windows
            .iter()
            .map(|w| {
                serde_json::json!({
                    "window": w,
                    "dialog": title_matches(&w.title, &patterns),
                })
            })
            .collect();
        match serde_json::to_string_pretty(&entries) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Failed to serialize windows: {}", e);
                return ExitCode::from(EXIT_FAILED);
            }
        }
    } else {
        for line in format_windows(&windows, &patterns) {
            println!("{}", line);
        }
    }

    ExitCode::SUCCESS
}

fn format_windows(windows: &[WindowInfo], patterns: &[String]) -> Vec<String> {
    if windows.is_empty() {
        return vec!["No windows found".to_string()];
    }
    windows
        .iter()
        .map(|w| {
            let marker = if title_matches(&w.title, patterns) { "*" } else { " " };
            format!("{} 0x{:08x} {:>7} {}", marker, w.id, w.pid, w.title)
        })
        .collect()
}
