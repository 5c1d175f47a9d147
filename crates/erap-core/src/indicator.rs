//! Post-login page detection.

/// Decides whether a page URL means the portal let us in.
///
/// A URL counts as logged in when it contains one of the success markers, or
/// when it has left the login page: no longer mentions the login marker and
/// differs from the URL the attempt started on. Blank and error pages never
/// count.
#[derive(Debug, Clone)]
pub struct LoginIndicator {
    base_url: String,
    success_markers: Vec<String>,
    login_marker: String,
}

impl LoginIndicator {
    pub fn new(base_url: impl Into<String>, success_markers: Vec<String>) -> Self {
        Self {
            base_url: base_url.into(),
            success_markers: success_markers
                .into_iter()
                .map(|m| m.to_lowercase())
                .filter(|m| !m.is_empty())
                .collect(),
            login_marker: "login".to_string(),
        }
    }

    /// Override the marker that identifies the login page.
    pub fn with_login_marker(mut self, marker: impl Into<String>) -> Self {
        self.login_marker = marker.into().to_lowercase();
        self
    }

    pub fn matches(&self, url: &str) -> bool {
        let url = url.trim();
        if url.is_empty() || is_placeholder_page(url) {
            return false;
        }

        let lower = url.to_lowercase();
        if self.success_markers.iter().any(|m| lower.contains(m.as_str())) {
            return true;
        }

        !lower.contains(&self.login_marker) && !same_url(url, &self.base_url)
    }
}

fn is_placeholder_page(url: &str) -> bool {
    ["about:", "data:", "chrome-error:", "chrome:"]
        .iter()
        .any(|scheme| url.starts_with(scheme))
}

fn same_url(a: &str, b: &str) -> bool {
    a.trim_end_matches('/') == b.trim_end_matches('/')
}
