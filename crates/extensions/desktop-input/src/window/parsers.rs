//! Output parsers for window tools.

use super::WindowInfo;

/// Parse `wmctrl -l -p -G` output.
pub fn parse_wmctrl_windows(output: &str) -> Vec<WindowInfo> {
    let mut windows = Vec::new();

    for line in output.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 8 {
            continue;
        }

        // 0x02c00004  0 12345   0    0    1920 1080  hostname Window Title
        let Some(id) = parse_hex_id(parts[0]) else {
            continue;
        };
        let pid = parts[2].parse().unwrap_or(0);
        let x = parts[3].parse().unwrap_or(0);
        let y = parts[4].parse().unwrap_or(0);
        let width = parts[5].parse().unwrap_or(0);
        let height = parts[6].parse().unwrap_or(0);
        let title = parts[8..].join(" ");

        windows.push(WindowInfo {
            id,
            title,
            pid,
            x,
            y,
            width,
            height,
        });
    }

    windows
}

/// Parse decimal window ids, one per line (`xdotool search`, `getactivewindow`).
pub fn parse_window_ids(output: &str) -> Vec<u64> {
    output
        .lines()
        .filter_map(|line| line.trim().parse().ok())
        .collect()
}

fn parse_hex_id(s: &str) -> Option<u64> {
    u64::from_str_radix(s.trim_start_matches("0x"), 16).ok()
}

/// Case-insensitive substring match against any pattern.
pub fn title_matches(title: &str, patterns: &[String]) -> bool {
    let title = title.to_lowercase();
    patterns
        .iter()
        .filter(|p| !p.trim().is_empty())
        .any(|p| title.contains(&p.to_lowercase()))
}

/// Escape a literal for the POSIX regex `xdotool search` expects.
pub fn escape_search_pattern(pattern: &str) -> String {
    let mut escaped = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        if "\\.^$|?*+()[]{}".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
