//! Configuration schema definitions.

use std::path::PathBuf;

use erap_core::{Credential, FocusPolicy, Key};
use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub credential: CredentialConfig,

    #[serde(default)]
    pub portal: PortalConfig,

    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub dialog: DialogConfig,

    #[serde(default)]
    pub injector: InjectorConfig,

    #[serde(default)]
    pub verify: VerifyConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Certificate password. Never written back out.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialConfig {
    #[serde(default, skip_serializing)]
    pub password: Option<Credential>,
}

/// Portal pages and the controls clicked on them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Labels of the optional "enter personal cabinet" control.
    #[serde(default = "default_entry_labels")]
    pub entry_labels: Vec<String>,

    /// Labels of the "Sign in with EDS" control.
    #[serde(default = "default_eds_labels")]
    pub eds_labels: Vec<String>,

    #[serde(default = "default_entry_timeout_ms")]
    pub entry_timeout_ms: u64,

    #[serde(default = "default_control_timeout_ms")]
    pub control_timeout_ms: u64,

    /// Pause after page load before looking for controls (SPA rendering).
    #[serde(default = "default_load_settle_ms")]
    pub load_settle_ms: u64,

    /// URL fragments that mean the user is logged in.
    #[serde(default = "default_success_markers")]
    pub success_markers: Vec<String>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            entry_labels: default_entry_labels(),
            eds_labels: default_eds_labels(),
            entry_timeout_ms: default_entry_timeout_ms(),
            control_timeout_ms: default_control_timeout_ms(),
            load_settle_ms: default_load_settle_ms(),
            success_markers: default_success_markers(),
        }
    }
}

fn default_base_url() -> String {
    "https://erap-public.kgp.kz/#/login".to_string()
}

fn default_entry_labels() -> Vec<String> {
    vec![
        "Войти в личный кабинет".to_string(),
        "Жеке кабинетке кіріңіз".to_string(),
    ]
}

fn default_eds_labels() -> Vec<String> {
    vec![
        "Выбрать сертификат".to_string(),
        "Сертификатты таңдау".to_string(),
    ]
}

fn default_entry_timeout_ms() -> u64 {
    3000
}

fn default_control_timeout_ms() -> u64 {
    10_000
}

fn default_load_settle_ms() -> u64 {
    2000
}

fn default_success_markers() -> Vec<String> {
    vec![
        "personal".to_string(),
        "cabinet".to_string(),
        "main".to_string(),
    ]
}

/// Chrome launch and attach settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_debug_port")]
    pub debug_port: u16,

    #[serde(default)]
    pub headless: bool,

    /// Profile directory; defaults to `~/.erap-signer/browser-profile`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_dir: Option<PathBuf>,

    /// Explicit Chrome binary; searched in standard locations otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chrome_path: Option<PathBuf>,

    #[serde(default = "default_extra_args")]
    pub extra_args: Vec<String>,

    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,

    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            debug_port: default_debug_port(),
            headless: false,
            profile_dir: None,
            chrome_path: None,
            extra_args: default_extra_args(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
        }
    }
}

impl BrowserConfig {
    /// Profile directory with `~` expanded, or the default location.
    pub fn resolved_profile_dir(&self) -> PathBuf {
        match &self.profile_dir {
            Some(dir) => PathBuf::from(crate::ConfigLoader::expand_path(&dir.to_string_lossy())),
            None => dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".erap-signer")
                .join("browser-profile"),
        }
    }
}

fn default_debug_port() -> u16 {
    9222
}

fn default_extra_args() -> Vec<String> {
    vec![
        "--no-sandbox".to_string(),
        "--disable-setuid-sandbox".to_string(),
    ]
}

fn default_viewport_width() -> u32 {
    1920
}

fn default_viewport_height() -> u32 {
    1080
}

/// How the native dialog is waited for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogMode {
    /// Poll the window list for a matching title.
    #[default]
    Poll,
    /// Sleep a fixed delay and assume the dialog is up.
    FixedDelay,
}

/// Native signing dialog detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogConfig {
    #[serde(default)]
    pub mode: DialogMode,

    /// Case-insensitive substrings of the dialog window title.
    #[serde(default = "default_title_patterns")]
    pub title_patterns: Vec<String>,

    #[serde(default = "default_dialog_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_fixed_delay_ms")]
    pub fixed_delay_ms: u64,

    #[serde(default = "default_dialog_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Pause between detection and typing.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    #[serde(default)]
    pub focus_policy: FocusPolicy,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            mode: DialogMode::default(),
            title_patterns: default_title_patterns(),
            timeout_ms: default_dialog_timeout_ms(),
            fixed_delay_ms: default_fixed_delay_ms(),
            poll_interval_ms: default_dialog_poll_interval_ms(),
            settle_ms: default_settle_ms(),
            focus_policy: FocusPolicy::default(),
        }
    }
}

fn default_title_patterns() -> Vec<String> {
    vec!["NCALayer".to_string()]
}

fn default_dialog_timeout_ms() -> u64 {
    15_000
}

fn default_fixed_delay_ms() -> u64 {
    3000
}

fn default_dialog_poll_interval_ms() -> u64 {
    250
}

fn default_settle_ms() -> u64 {
    800
}

/// Keystroke strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InjectorKind {
    Xdotool,
    Enigo,
}

/// Keystroke injection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InjectorConfig {
    /// Strategies in the order they are tried.
    #[serde(default = "default_strategies")]
    pub strategies: Vec<InjectorKind>,

    #[serde(default = "default_xdotool_path")]
    pub xdotool_path: String,

    /// Delay between typed characters.
    #[serde(default = "default_typing_delay_ms")]
    pub typing_delay_ms: u64,

    /// Upper bound for a single external tool invocation.
    #[serde(default = "default_command_timeout_ms")]
    pub command_timeout_ms: u64,

    /// Keys pressed in the certificate list after the password.
    #[serde(default = "default_certificate_keys")]
    pub certificate_keys: Vec<Key>,

    #[serde(default = "default_certificate_delay_ms")]
    pub certificate_delay_ms: u64,

    #[serde(default = "default_key_pause_ms")]
    pub key_pause_ms: u64,
}

impl Default for InjectorConfig {
    fn default() -> Self {
        Self {
            strategies: default_strategies(),
            xdotool_path: default_xdotool_path(),
            typing_delay_ms: default_typing_delay_ms(),
            command_timeout_ms: default_command_timeout_ms(),
            certificate_keys: default_certificate_keys(),
            certificate_delay_ms: default_certificate_delay_ms(),
            key_pause_ms: default_key_pause_ms(),
        }
    }
}

fn default_strategies() -> Vec<InjectorKind> {
    vec![InjectorKind::Xdotool, InjectorKind::Enigo]
}

fn default_xdotool_path() -> String {
    "xdotool".to_string()
}

fn default_typing_delay_ms() -> u64 {
    100
}

fn default_command_timeout_ms() -> u64 {
    10_000
}

fn default_certificate_keys() -> Vec<Key> {
    vec![Key::Enter, Key::Tab, Key::Enter]
}

fn default_certificate_delay_ms() -> u64 {
    2500
}

fn default_key_pause_ms() -> u64 {
    500
}

/// Post-login verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyConfig {
    #[serde(default = "default_verify_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_verify_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_verify_timeout_ms(),
            poll_interval_ms: default_verify_poll_interval_ms(),
        }
    }
}

fn default_verify_timeout_ms() -> u64 {
    20_000
}

fn default_verify_poll_interval_ms() -> u64 {
    1000
}

/// Log output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,

    /// Log file directory; defaults to `~/.erap-signer/logs`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            dir: None,
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
