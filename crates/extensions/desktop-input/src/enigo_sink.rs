//! In-process keystroke sink backed by `enigo`.

use async_trait::async_trait;
use enigo::{Direction, Enigo, Keyboard, Settings};
use erap_core::{InjectError, Key, KeystrokeSink};
use tracing::debug;

/// Synthesizes input through `enigo` on a blocking thread.
///
/// A fresh `Enigo` connection is opened per call; it is not `Send` on every
/// backend.
#[derive(Debug, Clone, Default)]
pub struct EnigoSink;

impl EnigoSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl KeystrokeSink for EnigoSink {
    fn name(&self) -> &str {
        "enigo"
    }

    async fn type_text(&self, text: &str) -> Result<(), InjectError> {
        debug!(chars = text.chars().count(), "enigo: typing text");
        let text = text.to_owned();
        with_enigo(move |enigo| enigo.text(&text)).await
    }

    async fn press_key(&self, key: Key) -> Result<(), InjectError> {
        debug!(%key, "enigo: pressing key");
        let key = enigo_key(key);
        with_enigo(move |enigo| enigo.key(key, Direction::Click)).await
    }
}

async fn with_enigo<F>(f: F) -> Result<(), InjectError>
where
    F: FnOnce(&mut Enigo) -> Result<(), enigo::InputError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut enigo =
            Enigo::new(&Settings::default()).map_err(|e| InjectError::Unavailable {
                tool: "enigo".to_string(),
                message: e.to_string(),
            })?;
        f(&mut enigo).map_err(|e| InjectError::Failed(e.to_string()))
    })
    .await
    .map_err(|e| InjectError::Failed(format!("input task failed: {}", e)))?
}

fn enigo_key(key: Key) -> enigo::Key {
    match key {
        Key::Enter => enigo::Key::Return,
        Key::Tab => enigo::Key::Tab,
        Key::Escape => enigo::Key::Escape,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enigo_key_mapping() {
        assert_eq!(enigo_key(Key::Enter), enigo::Key::Return);
        assert_eq!(enigo_key(Key::Tab), enigo::Key::Tab);
        assert_eq!(enigo_key(Key::Escape), enigo::Key::Escape);
    }

    #[test]
    fn test_name() {
        assert_eq!(EnigoSink::new().name(), "enigo");
    }

    #[test]
    fn test_backend_independent_of_libxdo() {
        let manifest: toml::Value = toml::from_str(include_str!("../../../../Cargo.toml")).unwrap();
        let enigo = &manifest["workspace"]["dependencies"]["enigo"];
        assert_eq!(enigo["default-features"].as_bool(), Some(false));
        let features: Vec<&str> = enigo["features"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|f| f.as_str())
            .collect();
        assert!(features.contains(&"x11rb"));
        assert!(!features.contains(&"xdo"));
    }

    #[tokio::test]
    #[ignore] // Requires a display
    async fn test_press_escape() {
        EnigoSink::new().press_key(Key::Escape).await.unwrap();
    }
}
