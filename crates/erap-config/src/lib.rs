//! # erap-config
//!
//! Configuration for erap-signer: an optional TOML file with `${VAR}`
//! expansion, overridden by `CERT_PASSWORD`, `BASE_URL` and `ERAP_HEADLESS`
//! from the environment (or a `.env` file).

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::{ConfigLoader, ENV_BASE_URL, ENV_CERT_PASSWORD, ENV_HEADLESS};
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
