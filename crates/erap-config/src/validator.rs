//! Configuration validation.

use std::collections::HashSet;

use erap_core::FocusPolicy;

use crate::error::ConfigError;
use crate::loader::ENV_CERT_PASSWORD;
use crate::schema::{Config, DialogMode};

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_credential(config, &mut result);
        Self::validate_portal(config, &mut result);
        Self::validate_dialog(config, &mut result);
        Self::validate_injector(config, &mut result);
        Self::validate_verify(config, &mut result);

        Ok(result)
    }

    fn validate_credential(config: &Config, result: &mut ValidationResult) {
        match &config.credential.password {
            None => result.add_error(ValidationError::new(
                "credential.password",
                format!("Certificate password is not set (use {})", ENV_CERT_PASSWORD),
            )),
            Some(password) if password.is_empty() => result.add_error(ValidationError::new(
                "credential.password",
                "Certificate password is empty",
            )),
            Some(_) => {}
        }
    }

    fn validate_portal(config: &Config, result: &mut ValidationResult) {
        match url::Url::parse(&config.portal.base_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(url) => result.add_error(ValidationError::new(
                "portal.base_url",
                format!("base_url must be http or https, got '{}'", url.scheme()),
            )),
            Err(e) => result.add_error(ValidationError::new(
                "portal.base_url",
                format!("Invalid URL '{}': {}", config.portal.base_url, e),
            )),
        }

        if config.portal.eds_labels.iter().all(|l| l.trim().is_empty()) {
            result.add_error(ValidationError::new(
                "portal.eds_labels",
                "At least one label for the EDS sign-in control is required",
            ));
        }

        if config.portal.control_timeout_ms == 0 {
            result.add_error(ValidationError::new(
                "portal.control_timeout_ms",
                "control_timeout_ms must be greater than 0",
            ));
        }

        if config.portal.success_markers.is_empty() {
            result.add_warning(ValidationWarning::new(
                "portal.success_markers",
                "No success markers; login is detected only by leaving the login page",
            ));
        }
    }

    fn validate_dialog(config: &Config, result: &mut ValidationResult) {
        let dialog = &config.dialog;

        match dialog.mode {
            DialogMode::Poll => {
                if dialog.timeout_ms == 0 {
                    result.add_error(ValidationError::new(
                        "dialog.timeout_ms",
                        "timeout_ms must be greater than 0",
                    ));
                }
                if dialog.poll_interval_ms == 0 {
                    result.add_error(ValidationError::new(
                        "dialog.poll_interval_ms",
                        "poll_interval_ms must be greater than 0",
                    ));
                }
                if dialog.title_patterns.iter().all(|p| p.trim().is_empty()) {
                    result.add_error(ValidationError::new(
                        "dialog.title_patterns",
                        "Polling needs at least one window title pattern",
                    ));
                }
            }
            DialogMode::FixedDelay => {
                result.add_warning(ValidationWarning::new(
                    "dialog.mode",
                    "fixed_delay does not confirm the dialog is open before typing",
                ));
            }
        }

        if dialog.focus_policy == FocusPolicy::Warn {
            result.add_warning(ValidationWarning::new(
                "dialog.focus_policy",
                "Password may be typed into whichever window holds focus",
            ));
        }
    }

    fn validate_injector(config: &Config, result: &mut ValidationResult) {
        let injector = &config.injector;

        if injector.strategies.is_empty() {
            result.add_error(ValidationError::new(
                "injector.strategies",
                "At least one keystroke strategy is required",
            ));
        }

        let mut seen = HashSet::new();
        for kind in &injector.strategies {
            if !seen.insert(kind) {
                result.add_error(ValidationError::new(
                    "injector.strategies",
                    format!("Strategy {:?} is listed more than once", kind),
                ));
            }
        }

        if injector.xdotool_path.trim().is_empty() {
            result.add_error(ValidationError::new(
                "injector.xdotool_path",
                "xdotool_path cannot be empty",
            ));
        }

        if injector.command_timeout_ms == 0 {
            result.add_error(ValidationError::new(
                "injector.command_timeout_ms",
                "command_timeout_ms must be greater than 0",
            ));
        }

        if injector.typing_delay_ms > 1000 {
            result.add_warning(ValidationWarning::new(
                "injector.typing_delay_ms",
                "typing_delay_ms is very high (>1000)",
            ));
        }
    }

    fn validate_verify(config: &Config, result: &mut ValidationResult) {
        if config.verify.timeout_ms == 0 {
            result.add_error(ValidationError::new(
                "verify.timeout_ms",
                "timeout_ms must be greater than 0",
            ));
        }

        if config.verify.poll_interval_ms == 0 {
            result.add_error(ValidationError::new(
                "verify.poll_interval_ms",
                "poll_interval_ms must be greater than 0",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
