use super::scripts::{locate_control_script, ControlLocation};
use super::*;
use crate::manager::{BrowserManager, BrowserManagerConfig};
use erap_core::{NavigatorError, PortalNavigator};
use std::sync::Arc;

fn navigator() -> CdpPortalNavigator {
    CdpPortalNavigator::new(
        Arc::new(BrowserManager::new(BrowserManagerConfig::default())),
        PortalSettings::new(vec!["Выбрать сертификат".to_string()]),
    )
}

#[test]
fn test_settings_defaults() {
    let settings = PortalSettings::new(vec!["Sign in".to_string()]);
    assert!(settings.entry_labels.is_empty());
    assert_eq!(settings.control_timeout.as_secs(), 10);
    assert_eq!(settings.entry_timeout.as_secs(), 3);
}

#[test]
fn test_locate_script_embeds_labels_as_json() {
    let script = locate_control_script(&[
        "Выбрать сертификат".to_string(),
        "it's \"quoted\"".to_string(),
    ]);
    assert!(script.contains(r#"["Выбрать сертификат","it's \"quoted\""]"#));
    assert!(script.starts_with("(() => {"));
    assert!(script.trim_end().ends_with("})()"));
}

#[test]
fn test_locate_script_empty_labels() {
    let script = locate_control_script(&[]);
    assert!(script.contains("[].map(norm)"));
}

#[test]
fn test_control_location_deserialize() {
    let value = serde_json::json!({"x": 960.5, "y": 540.0, "text": "выбрать сертификат"});
    let location: ControlLocation = serde_json::from_value(value).unwrap();
    assert_eq!(location.x, 960.5);
    assert_eq!(location.text, "выбрать сертификат");
}

#[tokio::test]
async fn test_request_signature_before_open() {
    let err = navigator().request_signature().await.unwrap_err();
    assert!(matches!(err, NavigatorError::Browser(_)));
}

#[tokio::test]
async fn test_current_url_before_open() {
    let err = navigator().current_url().await.unwrap_err();
    assert!(matches!(err, NavigatorError::Browser(_)));
}

#[tokio::test]
async fn test_shutdown_without_page() {
    navigator().shutdown().await.unwrap();
}

mod against_fake_chrome {
    use super::*;
    use crate::test_support::{is_ready_state, js_exception, js_value, FakeChrome};
    use serde_json::{json, Value};
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn fast_navigator(chrome: &FakeChrome, control_timeout: Duration) -> CdpPortalNavigator {
        let manager = BrowserManager::new(BrowserManagerConfig {
            debug_port: chrome.port(),
            chrome_path: Some(PathBuf::from("/nonexistent/chrome")),
            ..Default::default()
        });
        let settings = PortalSettings {
            control_timeout,
            load_settle: Duration::from_millis(1),
            poll_interval: Duration::from_millis(20),
            ..PortalSettings::new(vec!["Выбрать сертификат".to_string()])
        };
        CdpPortalNavigator::new(Arc::new(manager), settings)
    }

    #[tokio::test]
    async fn test_control_clicked_after_transient_errors() {
        let locates = AtomicUsize::new(0);
        let chrome = FakeChrome::start(move |method, params| match method {
            "Runtime.evaluate" if is_ready_state(params) => js_value(json!("complete")),
            "Runtime.evaluate" => match locates.fetch_add(1, Ordering::SeqCst) {
                0 => js_exception("Execution context was destroyed."),
                1 => Err((-32000, "Cannot find context with specified id".to_string())),
                2 => js_value(Value::Null),
                _ => js_value(json!({"x": 640.0, "y": 360.5, "text": "выбрать сертификат"})),
            },
            _ => Ok(Value::Null),
        })
        .await;

        let navigator = fast_navigator(&chrome, Duration::from_secs(5));
        navigator
            .open_portal("https://erap-public.kgp.kz/#/login")
            .await
            .unwrap();
        navigator.request_signature().await.unwrap();

        assert_eq!(chrome.count("Page.navigate"), 1);
        assert_eq!(chrome.count("Input.dispatchMouseEvent"), 3);
    }

    #[tokio::test]
    async fn test_missing_control_is_not_found() {
        let chrome = FakeChrome::start(|method, params| match method {
            "Runtime.evaluate" if is_ready_state(params) => js_value(json!("complete")),
            "Runtime.evaluate" => js_value(Value::Null),
            _ => Ok(Value::Null),
        })
        .await;

        let navigator = fast_navigator(&chrome, Duration::from_millis(200));
        navigator
            .open_portal("https://erap-public.kgp.kz/#/login")
            .await
            .unwrap();

        match navigator.request_signature().await.unwrap_err() {
            NavigatorError::ControlNotFound { labels, waited } => {
                assert_eq!(labels, vec!["Выбрать сертификат"]);
                assert_eq!(waited, Duration::from_millis(200));
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(chrome.count("Input.dispatchMouseEvent"), 0);
        assert!(chrome.count("Runtime.evaluate") > 2);
    }

    #[tokio::test]
    async fn test_navigation_error_is_load_failure() {
        let chrome = FakeChrome::start(|method, _| match method {
            "Page.navigate" => Ok(json!({"frameId": "F1", "errorText": "net::ERR_NAME_NOT_RESOLVED"})),
            _ => Ok(Value::Null),
        })
        .await;

        let navigator = fast_navigator(&chrome, Duration::from_millis(200));
        let err = navigator
            .open_portal("https://erap-public.kgp.kz/#/login")
            .await
            .unwrap_err();
        match err {
            NavigatorError::LoadFailed(msg) => assert!(msg.contains("ERR_NAME_NOT_RESOLVED")),
            other => panic!("unexpected error: {}", other),
        }
    }
}
