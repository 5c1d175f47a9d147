//! Configuration loader.

use std::fs;
use std::path::{Path, PathBuf};

use erap_core::Credential;

use crate::error::ConfigError;
use crate::schema::Config;

/// Certificate password.
pub const ENV_CERT_PASSWORD: &str = "CERT_PASSWORD";
/// Portal login page.
pub const ENV_BASE_URL: &str = "BASE_URL";
/// Run Chrome headless (`true`/`false`).
pub const ENV_HEADLESS: &str = "ERAP_HEADLESS";

/// Config file picked up from the working directory when none is given.
const DEFAULT_CONFIG_FILE: &str = "erap-signer.toml";

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let config: Config = toml::from_str(&expanded)?;
        Ok(config)
    }

    /// Load `.env` from the working directory or its parents, if there is one.
    pub fn load_dotenv() -> Option<PathBuf> {
        dotenvy::dotenv().ok()
    }

    /// Full startup load: file (explicit, or `erap-signer.toml` if present,
    /// or defaults), then environment overrides.
    pub fn load_with_env(path: Option<&Path>) -> Result<Config, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load(default_path)?
                } else {
                    Config::default()
                }
            }
        };
        Self::apply_overrides(&mut config, |name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Apply `CERT_PASSWORD`, `BASE_URL` and `ERAP_HEADLESS` on top of `config`.
    pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(password) = lookup(ENV_CERT_PASSWORD).filter(|p| !p.is_empty()) {
            config.credential.password = Some(Credential::new(password));
        }

        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|u| !u.trim().is_empty()) {
            config.portal.base_url = base_url.trim().to_string();
        }

        if let Some(headless) = lookup(ENV_HEADLESS) {
            config.browser.headless = parse_bool(&headless).ok_or_else(|| {
                ConfigError::InvalidValue {
                    field: ENV_HEADLESS.to_string(),
                    message: format!("expected a boolean, got {:?}", headless),
                }
            })?;
        }

        Ok(())
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();
        let re = regex::Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/.config`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
