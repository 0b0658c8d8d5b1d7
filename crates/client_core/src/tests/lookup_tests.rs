use std::sync::atomic::Ordering;

use shared::domain::EpochMillis;

use super::*;
use crate::{
    notification::NotificationKind,
    presenter::{COPIED_LABEL, COPY_LABEL},
    tests::ScriptedBackend,
    ClipboardError,
};

fn record(timestamp: i64, target_group: &str, bypass_link: Option<&str>) -> SurveyRecord {
    SurveyRecord {
        survey_url: "https://s.co/1".to_string(),
        target_group: target_group.to_string(),
        bypass_link: bypass_link.map(str::to_string),
        additional_details: Some(format!("details {timestamp}")),
        timestamp: Some(EpochMillis(timestamp)),
    }
}

fn found(records: Vec<SurveyRecord>) -> LookupResponse {
    LookupResponse {
        found: true,
        count: Some(records.len() as u64),
        results: Some(records),
        message: None,
    }
}

fn workflow() -> LookupWorkflow {
    LookupWorkflow::with_presenter(
        ResultPresenter::new(Duration::from_millis(2000)).with_labeler(|stamp| stamp.0.to_string()),
    )
}

struct NullClipboard(Result<(), ClipboardError>);

impl ClipboardSink for NullClipboard {
    fn set_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
        self.0.clone()
    }
}

#[tokio::test]
async fn single_result_is_displayed_without_selector() {
    let backend = ScriptedBackend::with_lookups([Ok(found(vec![record(
        1000,
        "students",
        Some("https://bypass.example/1"),
    )]))]);
    let mut lookup = workflow();
    lookup.query.set("https://s.co/1");

    assert_eq!(lookup.lookup(&backend).await, Ok(LookupOutcome::Single));
    assert!(!lookup.presenter().has_selector());
    let view = lookup.presenter().displayed().expect("displayed");
    assert_eq!(view.target_group, "students");
    assert!(view.can_copy());
    assert_eq!(
        lookup.notification().map(|n| n.message.as_str()),
        Some("Survey found!")
    );
    assert_eq!(
        backend.last_lookup.lock().expect("lock").as_deref(),
        Some("https://s.co/1")
    );
}

#[tokio::test]
async fn multiple_results_populate_selector_in_response_order() {
    let backend = ScriptedBackend::with_lookups([Ok(found(vec![
        record(1000, "first", None),
        record(2000, "second", None),
    ]))]);
    let mut lookup = workflow();
    lookup.query.set("https://s.co/1");

    assert_eq!(lookup.lookup(&backend).await, Ok(LookupOutcome::Multiple(2)));
    let labels: Vec<_> = lookup
        .presenter()
        .selector()
        .iter()
        .map(|entry| entry.label.clone())
        .collect();
    assert_eq!(labels, vec!["1000".to_string(), "2000".to_string()]);
    assert!(lookup.presenter().displayed().is_none());
    assert_eq!(
        lookup.notification().map(|n| n.message.as_str()),
        Some("Found 2 entries for this URL. Select below to view.")
    );

    lookup.select(Some(1));
    let view = lookup.presenter().displayed().expect("second record");
    assert_eq!(view.timestamp, Some(EpochMillis(2000)));
    assert_eq!(view.target_group, "second");

    lookup.select(None);
    assert!(lookup.presenter().displayed().is_none());
    assert!(!lookup.presenter().can_copy());
}

#[tokio::test]
async fn not_found_prefers_backend_message_and_clears_stale_record() {
    let backend = ScriptedBackend::with_lookups([
        Ok(found(vec![record(1000, "students", None)])),
        Ok(LookupResponse {
            found: false,
            count: None,
            results: None,
            message: Some("Survey URL not registered".to_string()),
        }),
        Ok(LookupResponse {
            found: false,
            count: Some(0),
            results: None,
            message: None,
        }),
    ]);
    let mut lookup = workflow();
    lookup.query.set("https://s.co/1");
    lookup.lookup(&backend).await.expect("first lookup");
    assert!(lookup.presenter().displayed().is_some());

    assert_eq!(lookup.lookup(&backend).await, Ok(LookupOutcome::NotFound));
    assert!(lookup.presenter().displayed().is_none());
    assert!(lookup.results().is_empty());
    let notification = lookup.notification().expect("notification");
    assert_eq!(notification.kind, NotificationKind::Error);
    assert_eq!(notification.message, "Survey URL not registered");

    lookup.lookup(&backend).await.expect("third lookup");
    assert_eq!(
        lookup.notification().map(|n| n.message.as_str()),
        Some("No survey found for this URL.")
    );
}

#[tokio::test]
async fn found_without_records_is_treated_as_not_found() {
    let backend = ScriptedBackend::with_lookups([Ok(LookupResponse {
        found: true,
        count: Some(1),
        results: Some(Vec::new()),
        message: None,
    })]);
    let mut lookup = workflow();
    lookup.query.set("https://s.co/1");
    assert_eq!(lookup.lookup(&backend).await, Ok(LookupOutcome::NotFound));
}

#[tokio::test]
async fn missing_count_falls_back_to_result_length() {
    let mut response = found(vec![record(1000, "a", None), record(2000, "b", None)]);
    response.count = None;
    let backend = ScriptedBackend::with_lookups([Ok(response)]);
    let mut lookup = workflow();
    lookup.query.set("https://s.co/1");
    assert_eq!(lookup.lookup(&backend).await, Ok(LookupOutcome::Multiple(2)));
    assert_eq!(lookup.presenter().selector().len(), 2);
}

#[tokio::test]
async fn new_lookup_drops_previous_selector_and_results() {
    let backend = ScriptedBackend::with_lookups([
        Ok(found(vec![
            record(1000, "a", Some("https://bypass.example/a")),
            record(2000, "b", None),
            record(3000, "c", None),
        ])),
        Ok(found(vec![record(4000, "d", None)])),
    ]);
    let mut lookup = workflow();
    lookup.query.set("https://s.co/1");
    lookup.lookup(&backend).await.expect("first");
    lookup.select(Some(0));
    lookup.copy_bypass_link(&mut NullClipboard(Ok(())), Instant::now());
    assert_eq!(lookup.presenter().copy_label(), COPIED_LABEL);

    let pending = lookup.begin().expect("second lookup");
    assert!(lookup.results().is_empty());
    assert!(!lookup.presenter().has_selector());
    assert!(lookup.presenter().displayed().is_none());
    assert!(lookup.notification().is_none());
    assert_eq!(lookup.presenter().copy_label(), COPY_LABEL);

    let result = backend.lookup(&pending.survey_url).await;
    assert_eq!(lookup.finish(pending.ticket, result), LookupOutcome::Single);
    assert_eq!(lookup.results().len(), 1);
    assert_eq!(
        lookup.presenter().displayed().map(|view| view.timestamp),
        Some(Some(EpochMillis(4000)))
    );
}

#[tokio::test]
async fn invalid_query_never_reaches_backend() {
    let backend = ScriptedBackend::default();
    let mut lookup = workflow();

    assert_eq!(lookup.lookup(&backend).await, Err(LookupRejected::Invalid));
    assert_eq!(
        lookup.query.error(),
        Some(crate::ValidationError::Required)
    );

    lookup.query.set("not a url");
    assert_eq!(lookup.lookup(&backend).await, Err(LookupRejected::Invalid));
    assert_eq!(
        lookup.notification().map(|n| n.message.as_str()),
        Some("Please enter a valid survey URL to search.")
    );
    assert_eq!(backend.lookup_calls.load(Ordering::SeqCst), 0);
    assert!(!lookup.is_busy());
}

#[tokio::test]
async fn transport_failure_reports_and_reenables() {
    let backend = ScriptedBackend::with_lookups([Err(ClientError::Transport {
        status: 502,
        body: "bad gateway".to_string(),
    })]);
    let mut lookup = workflow();
    lookup.query.set("https://s.co/1");

    let pending = lookup.begin().expect("valid");
    assert_eq!(lookup.button_label(), FETCHING_LABEL);
    assert_eq!(lookup.begin(), Err(LookupRejected::InFlight));

    let result = backend.lookup(&pending.survey_url).await;
    assert_eq!(lookup.finish(pending.ticket, result), LookupOutcome::Failed);
    assert_eq!(lookup.button_label(), FIND_LABEL);
    assert_eq!(
        lookup.notification().map(|n| n.message.as_str()),
        Some("Failed to retrieve survey: Server error: 502 - bad gateway")
    );
}

#[tokio::test]
async fn completion_after_reset_does_not_repopulate_presenter() {
    let backend = ScriptedBackend::with_lookups([Ok(found(vec![record(1000, "a", None)]))]);
    let mut lookup = workflow();
    lookup.query.set("https://s.co/1");
    let pending = lookup.begin().expect("valid");

    lookup.reset();
    assert!(lookup.is_busy());

    let result = backend.lookup(&pending.survey_url).await;
    assert_eq!(lookup.finish(pending.ticket, result), LookupOutcome::Stale);
    assert!(!lookup.is_busy());
    assert!(lookup.presenter().displayed().is_none());
    assert!(lookup.results().is_empty());
    assert!(lookup.notification().is_none());
}

#[tokio::test]
async fn clipboard_failure_surfaces_manual_copy_hint() {
    let backend = ScriptedBackend::with_lookups([Ok(found(vec![record(
        1000,
        "a",
        Some("https://bypass.example/a"),
    )]))]);
    let mut lookup = workflow();
    lookup.query.set("https://s.co/1");
    lookup.lookup(&backend).await.expect("lookup");

    let outcome = lookup.copy_bypass_link(
        &mut NullClipboard(Err(ClipboardError("denied".to_string()))),
        Instant::now(),
    );
    assert!(matches!(outcome, CopyOutcome::Failed(_)));
    assert_eq!(
        lookup.notification().map(|n| n.message.as_str()),
        Some("Failed to copy. Please copy manually.")
    );
    assert!(lookup.presenter().displayed().is_some());
}

#[tokio::test]
async fn records_with_blank_timestamps_are_still_shown() {
    use axum::http::StatusCode;

    use crate::{
        backend::HttpSurveyBackend,
        tests::{spawn_mock_backend, MockState},
    };

    let state = MockState::new(
        (StatusCode::OK, r#"{"result":"success"}"#),
        (
            StatusCode::OK,
            r#"{"found":true,"count":2,"results":[
                {"surveyUrl":"https://s.co/1","targetGroup":"first","bypassLink":"https://b.co/1","timestamp":""},
                {"surveyUrl":"https://s.co/1","targetGroup":"second","timestamp":2000}
            ]}"#,
        ),
    );
    let endpoint = spawn_mock_backend(state).await.expect("spawn backend");
    let backend = HttpSurveyBackend::new(endpoint);
    let mut lookup = workflow();
    lookup.query.set("https://s.co/1");

    assert_eq!(lookup.lookup(&backend).await, Ok(LookupOutcome::Multiple(2)));
    let labels: Vec<_> = lookup
        .presenter()
        .selector()
        .iter()
        .map(|entry| entry.label.as_str())
        .collect();
    assert_eq!(labels, ["Unknown date", "2000"]);

    lookup.select(Some(0));
    let view = lookup.presenter().displayed().expect("first record");
    assert_eq!(view.target_group, "first");
    assert_eq!(view.timestamp, None);
    assert_eq!(view.timestamp_label(), "Unknown date");
    assert!(view.can_copy());
}
