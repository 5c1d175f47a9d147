//! `login` command.

use std::process::ExitCode;

use erap_config::{Config, ConfigValidator};
use erap_core::{LoginReport, PortalNavigator, SessionOutcome};
use tracing::{error, info, warn};

use crate::adapters;
use crate::{EXIT_CONFIG, EXIT_FAILED};

pub(crate) async fn run(mut config: Config, json: bool, headless: bool, keep_open: bool) -> ExitCode {
    if headless {
        config.browser.headless = true;
    }

    let validation = match ConfigValidator::validate(&config) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::from(EXIT_CONFIG);
        }
    };
    for warning in &validation.warnings {
        warn!("{}: {}", warning.path, warning.message);
    }
    if !validation.is_valid() {
        for err in &validation.errors {
            eprintln!("Configuration error: {}: {}", err.path, err.message);
        }
        return ExitCode::from(EXIT_CONFIG);
    }

    let Some(credential) = config.credential.password.clone() else {
        return ExitCode::from(EXIT_CONFIG);
    };

    let stack = adapters::build_login(&config, !keep_open);
    info!("Starting login to {}", config.portal.base_url);
    let report = stack.orchestrator.run(&credential).await;

    print_report(&report, json);

    if keep_open {
        if report.outcome.is_success() {
            println!("Browser left open; press Ctrl+C to close it.");
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl+C: {}", e);
            }
        }
        if let Err(e) = stack.navigator.shutdown().await {
            warn!("Browser shutdown failed: {}", e);
        }
    }

    if report.outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_FAILED)
    }
}

fn print_report(report: &LoginReport, json: bool) {
    if json {
        match serde_json::to_string_pretty(report) {
            Ok(out) => println!("{}", out),
            Err(e) => error!("Failed to serialize report: {}", e),
        }
        return;
    }

    println!("{}", format_report(report));
}

fn format_report(report: &LoginReport) -> String {
    let states = report
        .states
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(" -> ");

    let headline = match &report.outcome {
        SessionOutcome::Succeeded { final_url } => format!("Login succeeded: {}", final_url),
        SessionOutcome::Failed { kind, reason } => format!("Login failed ({}): {}", kind, reason),
    };

    format!(
        "{}\n  states:  {}\n  elapsed: {} ms",
        headline,
        states,
        report.elapsed_ms()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use erap_core::{FailureKind, LoginState};

    fn report(outcome: SessionOutcome) -> LoginReport {
        let started_at = Utc::now();
        LoginReport {
            outcome,
            started_at,
            finished_at: started_at + Duration::milliseconds(1500),
            states: vec![LoginState::Idle, LoginState::Navigating],
        }
    }

    #[test]
    fn test_format_success() {
        let text = format_report(&report(SessionOutcome::Succeeded {
            final_url: "https://erap-public.kgp.kz/#/personal".to_string(),
        }));
        assert!(text.starts_with("Login succeeded: https://erap-public.kgp.kz/#/personal"));
        assert!(text.contains("1500 ms"));
    }

    #[test]
    fn test_format_failure() {
        let text = format_report(&report(SessionOutcome::Failed {
            kind: FailureKind::DialogTimeout,
            reason: "no window matched".to_string(),
        }));
        assert!(text.starts_with("Login failed ("));
        assert!(text.contains("no window matched"));
        assert!(text.contains(" -> "));
    }
}
