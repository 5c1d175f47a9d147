use super::*;
use crate::navigator::NavigatorError;
use std::time::Duration;

#[test]
fn test_outcome_from_ok() {
    let outcome = SessionOutcome::from(Ok("https://erap-public.kgp.kz/#/cabinet".to_string()));
    assert!(outcome.is_success());
    assert_eq!(outcome.failure_kind(), None);
}

#[test]
fn test_outcome_from_err_carries_kind_and_reason() {
    let err = LoginError::from(NavigatorError::ControlNotFound {
        labels: vec!["Выбрать сертификат".to_string()],
        waited: Duration::from_secs(10),
    });
    let outcome = SessionOutcome::from(Err(err));
    assert!(!outcome.is_success());
    assert_eq!(outcome.failure_kind(), Some(FailureKind::NavigationFailure));
    match outcome {
        SessionOutcome::Failed { reason, .. } => assert!(reason.contains("not found")),
        _ => panic!("expected failure"),
    }
}

#[test]
fn test_outcome_json_shape() {
    let outcome = SessionOutcome::Failed {
        kind: FailureKind::VerificationTimeout,
        reason: "timeout".to_string(),
    };
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["status"], "failed");
    assert_eq!(json["kind"], "verification_timeout");
    assert_eq!(json["reason"], "timeout");

    let ok = SessionOutcome::Succeeded {
        final_url: "https://example.com/cabinet".to_string(),
    };
    let json = serde_json::to_value(&ok).unwrap();
    assert_eq!(json["status"], "succeeded");
    assert_eq!(json["final_url"], "https://example.com/cabinet");
}

#[test]
fn test_report_elapsed() {
    let started_at = Utc::now();
    let report = LoginReport {
        outcome: SessionOutcome::Succeeded {
            final_url: String::new(),
        },
        started_at,
        finished_at: started_at + chrono::Duration::milliseconds(1500),
        states: vec![LoginState::Navigating, LoginState::Succeeded],
    };
    assert_eq!(report.elapsed_ms(), 1500);
}
