//! CLI definitions for erap-signer.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// erap-signer CLI.
#[derive(Parser)]
#[command(name = "erap-signer")]
#[command(about = "Signs in to the eRAP portal with an EDS certificate through NCALayer")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (defaults to ./erap-signer.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run one login attempt
    Login {
        /// Print the login report as JSON
        #[arg(long)]
        json: bool,

        /// Run Chrome headless
        #[arg(long)]
        headless: bool,

        /// Leave the browser open after a successful login until Ctrl+C
        #[arg(long)]
        keep_open: bool,
    },

    /// Check configuration and external tools
    Check,

    /// List visible windows, marking those that look like the signing dialog
    Windows {
        /// Title pattern to match instead of dialog.title_patterns
        #[arg(short, long)]
        pattern: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
