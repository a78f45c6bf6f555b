//! Integration tests for record emission and dry-run reporting

use issuelens_domain::traits::DeliveryStats;
use issuelens_domain::{FieldValue, Record, Sentiment};
use issuelens_telemetry::{
    emit_and_close, flatten, DryRunReporter, HoneycombConfig, HoneycombSink, MemorySink,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to build a record with the given libraries
fn create_record(id: u64, title: &str, libraries: &[&str]) -> Record {
    Record {
        title: title.to_string(),
        id,
        url: format!("https://github.com/acme/infra/issues/{}", id),
        libraries: libraries.iter().map(|l| l.to_string()).collect(),
        detected_cloud_providers: vec!["aws".to_string()],
        body: format!("Body of issue {}", id),
        body_summary: format!("Summary of issue {}", id),
        comment_count: 2,
        updated_at: "2024-05-01T09:30:00Z".to_string(),
        positive_reactions: 1,
        negative_reactions: 0,
        inferred_sentiment: Sentiment::Positive,
        source_repo: "infra".to_string(),
        labels: vec!["enhancement".to_string()],
    }
}

#[test]
fn test_flatten_twice_is_identical() {
    let record = create_record(1, "Drift detection", &["terraform"]);
    assert_eq!(flatten(&record), flatten(&record));
}

#[test]
fn test_libraries_share_one_key() {
    let record = create_record(1, "Mixed stacks", &["terraform", "pulumi"]);
    let event = flatten(&record);

    let libraries: Vec<String> = event
        .values("libraries")
        .into_iter()
        .map(FieldValue::to_string)
        .collect();
    assert_eq!(libraries, vec!["terraform", "pulumi"]);
}

#[tokio::test]
async fn test_empty_batch_emits_zero_events() {
    let sink = MemorySink::new();
    let report = emit_and_close(&[], &sink).await;

    assert_eq!(report.events, 0);
    assert!(sink.events().is_empty());
}

#[tokio::test]
async fn test_memory_sink_receives_one_event_per_record() {
    let sink = MemorySink::new();
    let records = vec![
        create_record(1, "First", &["terraform"]),
        create_record(2, "Second", &[]),
    ];

    let report = emit_and_close(&records, &sink).await;
    assert_eq!(report.delivered, 2);

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].first("id"), Some(&FieldValue::UInt(1)));
    assert_eq!(events[1].first("title"), Some(&FieldValue::from("Second")));
    assert!(events[1].values("libraries").is_empty());
}

#[tokio::test]
async fn test_honeycomb_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/1/batch/otel-github-issues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"status": 202},
            {"status": 202},
            {"status": 202}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let sink = HoneycombSink::new(HoneycombConfig::new("key").with_endpoint(server.uri())).unwrap();
    let records: Vec<Record> = (1..=3)
        .map(|id| create_record(id, "Issue", &["terraform"]))
        .collect();

    let report = emit_and_close(&records, &sink).await;
    assert_eq!(report.events, 3);
    assert_eq!(report.accepted, 3);
    assert_eq!(report.delivered, 3);
    assert_eq!(report.failed, 0);
    assert_eq!(sink.stats(), DeliveryStats { delivered: 3, failed: 0 });
}

#[test]
fn test_dry_run_report() {
    let records = vec![
        create_record(10, "Plan output truncated", &["terraform"]),
        create_record(11, "Stack refresh hangs", &["pulumi"]),
    ];

    let mut reporter = DryRunReporter::new(Vec::new());
    reporter.report(&records).unwrap();
    let output = String::from_utf8(reporter.into_inner()).unwrap();

    assert!(output.starts_with("---- DRY RUN OUTPUT ----\n"));
    assert!(output.contains("Total issues processed: 2"));
    assert!(output.contains("Issue Title: Plan output truncated"));
    assert!(output.contains("URL: https://github.com/acme/infra/issues/11"));
    assert!(output.contains("Summary: Summary of issue 10"));
    assert_eq!(output.matches("-----\n").count(), 2);
}
