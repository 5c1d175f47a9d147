//! erap-signer - eRAP portal login bot
//!
//! Opens the portal in Chrome, clicks "Sign in with EDS" and types the
//! certificate password into the native NCALayer dialog.

use std::process::ExitCode;

use clap::Parser;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use erap_config::{ConfigLoader, LoggingConfig};

mod adapters;
mod cli;
mod cmd_check;
mod cmd_login;

use cli::{Cli, Commands};

/// Login failed or a required tool is missing.
pub(crate) const EXIT_FAILED: u8 = 1;
/// Configuration could not be loaded or is invalid.
pub(crate) const EXIT_CONFIG: u8 = 2;

fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = adapters::log_dir(logging);
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("erap-signer")
        .filename_suffix("log")
        .max_log_files(30)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Keeps the file writer flushing until exit.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));

    tracing_subscriber::registry()
        .with(env_filter)
        // Console on stderr so `--json` output stays clean
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(true),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let dotenv = ConfigLoader::load_dotenv();
    let config = match ConfigLoader::load_with_env(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    if let Err(e) = init_tracing(&config.logging) {
        eprintln!("Failed to initialize logging: {}", e);
    }
    if let Some(path) = dotenv {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    match cli.command {
        Commands::Login {
            json,
            headless,
            keep_open,
        } => cmd_login::run(config, json, headless, keep_open).await,
        Commands::Check => cmd_check::check(&config).await,
        Commands::Windows { pattern, json } => cmd_check::windows(&config, pattern, json).await,
    }
}
