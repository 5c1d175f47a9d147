//! External tool invocation with a time bound.

use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;

use erap_core::InjectError;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, trace};

/// Errors from running an external tool.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{program} not found")]
    NotFound { program: String },

    #[error("failed to run {program}: {message}")]
    Spawn { program: String, message: String },

    #[error("{program} exited with status {code}: {stderr}")]
    NonZeroExit {
        program: String,
        code: i32,
        stderr: String,
    },

    #[error("{program} timed out after {after:?}")]
    Timeout { program: String, after: Duration },
}

impl From<CommandError> for InjectError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::NotFound { program } => InjectError::Unavailable {
                tool: program,
                message: "executable not found".to_string(),
            },
            CommandError::Spawn { program, message } => InjectError::Unavailable {
                tool: program,
                message,
            },
            CommandError::NonZeroExit {
                program,
                code,
                stderr,
            } => InjectError::NonZeroExit {
                tool: program,
                code,
                stderr,
            },
            CommandError::Timeout { program, after } => InjectError::Timeout {
                tool: program,
                after,
            },
        }
    }
}

/// Run `program` with `args`, optionally writing `stdin` to it, and return
/// its stdout. The child is killed if `limit` elapses.
///
/// Arguments are logged at trace level; anything secret must go through
/// `stdin`, which is never logged.
pub(crate) async fn run_tool(
    program: &str,
    args: &[String],
    stdin: Option<&str>,
    limit: Duration,
) -> Result<String, CommandError> {
    trace!(program, ?args, "Running external tool");

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(|e| match e.kind() {
        ErrorKind::NotFound => CommandError::NotFound {
            program: program.to_string(),
        },
        _ => CommandError::Spawn {
            program: program.to_string(),
            message: e.to_string(),
        },
    })?;

    let run = async move {
        if let (Some(input), Some(mut pipe)) = (stdin, child.stdin.take()) {
            // A tool that exits early closes the pipe; its status is checked below.
            if let Err(e) = pipe.write_all(input.as_bytes()).await {
                debug!(program, "Writing to stdin failed: {}", e);
            }
            drop(pipe);
        }
        child.wait_with_output().await
    };

    let output = timeout(limit, run)
        .await
        .map_err(|_| CommandError::Timeout {
            program: program.to_string(),
            after: limit,
        })?
        .map_err(|e| CommandError::Spawn {
            program: program.to_string(),
            message: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(CommandError::NonZeroExit {
            program: program.to_string(),
            code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Run a tool once to see whether it is usable; returns the first line of its output.
pub async fn probe_tool(program: &str, args: &[&str]) -> Result<String, CommandError> {
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    let stdout = run_tool(program, &args, None, Duration::from_secs(5)).await?;
    Ok(stdout.lines().next().unwrap_or_default().trim().to_string())
}
