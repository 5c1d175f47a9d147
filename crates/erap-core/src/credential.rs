//! Certificate password holder.

use std::fmt;

use serde::Deserialize;

/// The certificate password used to unlock the EDS key in NCALayer.
///
/// Only [`Credential::expose`] hands out the secret. `Debug` is redacted;
/// there is no `Display` or `Serialize` implementation.
#[derive(Clone, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    /// Wrap a secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Borrow the secret for the injection step.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of characters that will be typed.
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

impl From<String> for Credential {
    fn from(secret: String) -> Self {
        Self(secret)
    }
}

impl From<&str> for Credential {
    fn from(secret: &str) -> Self {
        Self(secret.to_string())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let cred = Credential::new("secret123");
        let debug = format!("{:?}", cred);
        assert_eq!(debug, "Credential(***)");
        assert!(!debug.contains("secret123"));
    }

    #[test]
    fn test_debug_redacted_inside_struct() {
        #[derive(Debug)]
        #[allow(dead_code)]
        struct Holder {
            password: Credential,
        }
        let holder = Holder {
            password: Credential::from("hunter2"),
        };
        assert!(!format!("{:?}", holder).contains("hunter2"));
    }

    #[test]
    fn test_expose() {
        let cred = Credential::from("p@ss wörd".to_string());
        assert_eq!(cred.expose(), "p@ss wörd");
        assert_eq!(cred.char_count(), 9);
        assert!(!cred.is_empty());
    }

    #[test]
    fn test_empty() {
        assert!(Credential::new("").is_empty());
    }

    #[test]
    fn test_deserialize_transparent() {
        let cred: Credential = serde_json::from_str(r#""from-config""#).unwrap();
        assert_eq!(cred.expose(), "from-config");
    }
}
