//! Wiring from configuration to the login components.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use erap_config::{Config, ConfigLoader, DialogMode, InjectorKind, LoggingConfig};
use erap_core::{
    DialogWatcher, KeystrokeSink, LoginIndicator, LoginOrchestrator, OrchestratorConfig,
    RankedInjector,
};
use erap_desktop_input::{
    EnigoSink, FixedDelayWatcher, PollingDialogWatcher, WindowController, XdotoolSink,
};
use erap_portal_browser::manager::{BrowserManager, BrowserManagerConfig};
use erap_portal_browser::{CdpPortalNavigator, PortalSettings};

/// Get the ~/.erap-signer directory path.
pub(crate) fn erap_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".erap-signer"))
        .unwrap_or_else(|| PathBuf::from(".erap-signer"))
}

pub(crate) fn log_dir(logging: &LoggingConfig) -> PathBuf {
    match &logging.dir {
        Some(dir) => PathBuf::from(ConfigLoader::expand_path(&dir.to_string_lossy())),
        None => erap_dir().join("logs"),
    }
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

/// Keystroke sinks in the configured order.
pub(crate) fn build_sinks(config: &Config) -> Vec<Arc<dyn KeystrokeSink>> {
    config
        .injector
        .strategies
        .iter()
        .map(|kind| -> Arc<dyn KeystrokeSink> {
            match kind {
                InjectorKind::Xdotool => Arc::new(
                    XdotoolSink::new(config.injector.xdotool_path.clone())
                        .with_typing_delay(ms(config.injector.typing_delay_ms))
                        .with_timeout(ms(config.injector.command_timeout_ms)),
                ),
                InjectorKind::Enigo => Arc::new(EnigoSink::new()),
            }
        })
        .collect()
}

pub(crate) fn window_controller(config: &Config) -> WindowController {
    WindowController::new()
        .with_xdotool(config.injector.xdotool_path.clone())
        .with_timeout(ms(config.injector.command_timeout_ms))
}

pub(crate) fn build_watcher(config: &Config) -> Arc<dyn DialogWatcher> {
    match config.dialog.mode {
        DialogMode::Poll => Arc::new(PollingDialogWatcher::new(
            Arc::new(window_controller(config)),
            config.dialog.title_patterns.clone(),
            ms(config.dialog.poll_interval_ms),
        )),
        DialogMode::FixedDelay => Arc::new(FixedDelayWatcher::new(ms(config.dialog.fixed_delay_ms))),
    }
}

pub(crate) fn browser_config(config: &Config) -> BrowserManagerConfig {
    BrowserManagerConfig {
        debug_port: config.browser.debug_port,
        viewport_width: config.browser.viewport_width,
        viewport_height: config.browser.viewport_height,
        profile_dir: Some(config.browser.resolved_profile_dir()),
        chrome_path: config.browser.chrome_path.clone(),
        headless: config.browser.headless,
        extra_args: config.browser.extra_args.clone(),
    }
}

pub(crate) fn portal_settings(config: &Config) -> PortalSettings {
    PortalSettings {
        entry_labels: config.portal.entry_labels.clone(),
        entry_timeout: ms(config.portal.entry_timeout_ms),
        control_timeout: ms(config.portal.control_timeout_ms),
        load_settle: ms(config.portal.load_settle_ms),
        ..PortalSettings::new(config.portal.eds_labels.clone())
    }
}

pub(crate) fn orchestrator_config(config: &Config, shutdown_on_finish: bool) -> OrchestratorConfig {
    OrchestratorConfig {
        dialog_timeout: ms(config.dialog.timeout_ms),
        settle_delay: ms(config.dialog.settle_ms),
        focus_policy: config.dialog.focus_policy,
        certificate_keys: config.injector.certificate_keys.clone(),
        certificate_delay: ms(config.injector.certificate_delay_ms),
        verify_timeout: ms(config.verify.timeout_ms),
        verify_poll_interval: ms(config.verify.poll_interval_ms),
        indicator: LoginIndicator::new(
            config.portal.base_url.clone(),
            config.portal.success_markers.clone(),
        ),
        shutdown_on_finish,
        ..OrchestratorConfig::new(config.portal.base_url.clone())
    }
}

/// Everything a login attempt needs. The navigator is kept separately so the
/// browser can be closed after `--keep-open`.
pub(crate) struct LoginStack {
    pub orchestrator: LoginOrchestrator,
    pub navigator: Arc<CdpPortalNavigator>,
}

pub(crate) fn build_login(config: &Config, shutdown_on_finish: bool) -> LoginStack {
    let manager = Arc::new(BrowserManager::new(browser_config(config)));
    let navigator = Arc::new(CdpPortalNavigator::new(manager, portal_settings(config)));
    let injector =
        RankedInjector::new(build_sinks(config)).with_key_pause(ms(config.injector.key_pause_ms));

    let orchestrator = LoginOrchestrator::new(
        navigator.clone(),
        build_watcher(config),
        injector,
        orchestrator_config(config, shutdown_on_finish),
    );

    LoginStack {
        orchestrator,
        navigator,
    }
}
