//! Each translate call moves exactly one outcome counter and one latency
//! sample. Kept in its own binary so no other test shares the recorder.

use serde_json::json;

mod common;

use common::{sample, scrape, start_server, EN_FR};

const ERRORS: &str = "translator_errors_total";
const TRANSLATIONS: &str = "translator_translations_total";
const LATENCY_COUNT: &str = "translator_request_latency_seconds_count";

const BAD_REQUEST: &[&str] = &["endpoint=\"/translate\"", "error_category=\"bad_request\""];
const INTERNAL: &[&str] = &["endpoint=\"/translate\"", "error_category=\"internal_error\""];
const TRANSLATE: &[&str] = &["endpoint=\"/translate\""];

#[tokio::test]
async fn test_outcome_counters_move_once_per_call() {
    let server = start_server(|_| {}).await;
    let model = format!("model=\"{EN_FR}\"");
    let by_model = [model.as_str()];

    let before = scrape(&server).await;
    let res = server
        .client
        .post(server.url("/translate"))
        .json(&json!({"text": "hello", "source_lang": "en", "target_lang": "en"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    let after_bad = scrape(&server).await;

    assert_eq!(
        sample(&after_bad, ERRORS, BAD_REQUEST) - sample(&before, ERRORS, BAD_REQUEST),
        1.0
    );
    assert_eq!(
        sample(&after_bad, ERRORS, INTERNAL),
        sample(&before, ERRORS, INTERNAL)
    );
    assert_eq!(
        sample(&after_bad, TRANSLATIONS, &by_model),
        sample(&before, TRANSLATIONS, &by_model)
    );
    assert_eq!(
        sample(&after_bad, LATENCY_COUNT, TRANSLATE) - sample(&before, LATENCY_COUNT, TRANSLATE),
        1.0
    );

    let res = server
        .client
        .post(server.url("/translate"))
        .json(&json!({"text": "hello", "target_lang": "fr"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let after_ok = scrape(&server).await;

    assert_eq!(
        sample(&after_ok, TRANSLATIONS, &by_model) - sample(&after_bad, TRANSLATIONS, &by_model),
        1.0
    );
    assert_eq!(
        sample(&after_ok, ERRORS, BAD_REQUEST),
        sample(&after_bad, ERRORS, BAD_REQUEST)
    );
    assert_eq!(
        sample(&after_ok, ERRORS, INTERNAL),
        sample(&after_bad, ERRORS, INTERNAL)
    );
    assert_eq!(
        sample(&after_ok, LATENCY_COUNT, TRANSLATE) - sample(&after_bad, LATENCY_COUNT, TRANSLATE),
        1.0
    );
}
