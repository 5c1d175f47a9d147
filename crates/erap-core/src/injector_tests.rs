use super::*;
use crate::test_support::{Delivered, DeliveryLog, RecordingSink};

fn log() -> DeliveryLog {
    DeliveryLog::default()
}

#[tokio::test]
async fn test_primary_delivers_text_then_submit() {
    let log = log();
    let injector = RankedInjector::new(vec![
        Arc::new(RecordingSink::new("xdotool", log.clone())),
        Arc::new(RecordingSink::new("enigo", log.clone())),
    ]);

    let used = injector.send_secret(&Credential::new("P")).await.unwrap();
    assert_eq!(used, "xdotool");

    let entries = log.lock().clone();
    assert_eq!(
        entries,
        vec![
            ("xdotool".to_string(), Delivered::Text("P".to_string())),
            ("xdotool".to_string(), Delivered::Key(Key::Enter)),
        ]
    );
}

#[tokio::test]
async fn test_exact_characters_no_drop_or_duplicate() {
    let log = log();
    let injector = RankedInjector::new(vec![Arc::new(RecordingSink::new("xdotool", log.clone()))]);

    injector
        .send_secret(&Credential::new("s3cr3t-пароль!"))
        .await
        .unwrap();

    let texts: Vec<String> = log
        .lock()
        .iter()
        .filter_map(|(_, d)| match d {
            Delivered::Text(t) => Some(t.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(texts, vec!["s3cr3t-пароль!".to_string()]);
    let submits = log
        .lock()
        .iter()
        .filter(|(_, d)| *d == Delivered::Key(Key::Enter))
        .count();
    assert_eq!(submits, 1);
}

#[tokio::test]
async fn test_fallback_gets_same_argument() {
    let log = log();
    let injector = RankedInjector::new(vec![
        Arc::new(RecordingSink::unavailable("xdotool", log.clone())),
        Arc::new(RecordingSink::new("enigo", log.clone())),
    ]);

    let used = injector.send_secret(&Credential::new("secret123")).await.unwrap();
    assert_eq!(used, "enigo");

    let entries = log.lock().clone();
    assert_eq!(
        entries,
        vec![
            ("enigo".to_string(), Delivered::Text("secret123".to_string())),
            ("enigo".to_string(), Delivered::Key(Key::Enter)),
        ]
    );
}

#[tokio::test]
async fn test_fallback_after_typed_text_only_submits() {
    let log = log();
    let injector = RankedInjector::new(vec![
        Arc::new(RecordingSink::broken_keys("xdotool", log.clone())),
        Arc::new(RecordingSink::new("enigo", log.clone())),
    ]);

    let used = injector.send_secret(&Credential::new("abc")).await.unwrap();
    assert_eq!(used, "enigo");

    let entries = log.lock().clone();
    assert_eq!(
        entries,
        vec![
            ("xdotool".to_string(), Delivered::Text("abc".to_string())),
            ("enigo".to_string(), Delivered::Key(Key::Enter)),
        ]
    );
    let typed: String = entries
        .iter()
        .filter_map(|(_, d)| match d {
            Delivered::Text(t) => Some(t.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(typed, "abc");
}

#[tokio::test]
async fn test_fallback_resumes_key_sequence() {
    let log = log();
    let injector = RankedInjector::new(vec![
        Arc::new(RecordingSink::keys_fail_after("xdotool", log.clone(), 1)),
        Arc::new(RecordingSink::new("enigo", log.clone())),
    ])
    .with_key_pause(Duration::from_millis(1));

    let used = injector
        .send_keys(&[Key::Enter, Key::Tab, Key::Enter])
        .await
        .unwrap();
    assert_eq!(used, "enigo");

    assert_eq!(
        log.lock().clone(),
        vec![
            ("xdotool".to_string(), Delivered::Key(Key::Enter)),
            ("enigo".to_string(), Delivered::Key(Key::Tab)),
            ("enigo".to_string(), Delivered::Key(Key::Enter)),
        ]
    );
}

#[tokio::test]
async fn test_partial_progress_reported_when_all_fail() {
    let log = log();
    let injector = RankedInjector::new(vec![
        Arc::new(RecordingSink::broken_keys("xdotool", log.clone())),
        Arc::new(RecordingSink::broken_keys("enigo", log.clone())),
    ]);

    let err = injector.send_secret(&Credential::new("abc")).await.unwrap_err();
    assert!(matches!(err, InjectError::Exhausted(_)));
    // Text went out once; neither sink could submit.
    assert_eq!(
        log.lock().clone(),
        vec![("xdotool".to_string(), Delivered::Text("abc".to_string()))]
    );
}

#[tokio::test]
async fn test_all_strategies_fail() {
    let log = log();
    let injector = RankedInjector::new(vec![
        Arc::new(RecordingSink::unavailable("xdotool", log.clone())),
        Arc::new(RecordingSink::unavailable("enigo", log.clone())),
    ]);

    let err = injector.send_secret(&Credential::new("x")).await.unwrap_err();
    match err {
        InjectError::Exhausted(msg) => {
            assert!(msg.contains("xdotool"));
            assert!(msg.contains("enigo"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(log.lock().is_empty());
}

#[tokio::test]
async fn test_no_strategies() {
    let injector = RankedInjector::new(vec![]);
    let err = injector.send_secret(&Credential::new("x")).await.unwrap_err();
    assert!(matches!(err, InjectError::NoStrategies));
}

#[tokio::test]
async fn test_send_keys_in_order() {
    let log = log();
    let injector = RankedInjector::new(vec![Arc::new(RecordingSink::new("xdotool", log.clone()))])
        .with_key_pause(Duration::from_millis(1));

    injector
        .send_keys(&[Key::Enter, Key::Tab, Key::Enter])
        .await
        .unwrap();

    let keys: Vec<Delivered> = log.lock().iter().map(|(_, d)| d.clone()).collect();
    assert_eq!(
        keys,
        vec![
            Delivered::Key(Key::Enter),
            Delivered::Key(Key::Tab),
            Delivered::Key(Key::Enter),
        ]
    );
}

#[test]
fn test_strategy_order() {
    let log = log();
    let injector = RankedInjector::new(vec![
        Arc::new(RecordingSink::new("xdotool", log.clone())),
        Arc::new(RecordingSink::new("enigo", log)),
    ]);
    assert_eq!(injector.strategies(), vec!["xdotool", "enigo"]);
}
