//! Record to event flattening

use issuelens_domain::{Event, Record};

/// Flatten a record into one event
///
/// Scalars become single entries. `libraries`, `detected_cloud_providers`
/// and `labels` contribute one entry per element under their own key, so an
/// empty list contributes nothing. Field order follows the record.
pub fn flatten(record: &Record) -> Event {
    let mut event = Event::new();

    event.add_field("title", record.title.as_str());
    event.add_field("id", record.id);
    event.add_field("url", record.url.as_str());
    add_all(&mut event, "libraries", &record.libraries);
    add_all(&mut event, "detected_cloud_providers", &record.detected_cloud_providers);
    event.add_field("body", record.body.as_str());
    event.add_field("body_summary", record.body_summary.as_str());
    event.add_field("comment_count", record.comment_count);
    event.add_field("updated_at", record.updated_at.as_str());
    event.add_field("positive_reactions", record.positive_reactions);
    event.add_field("negative_reactions", record.negative_reactions);
    event.add_field("inferred_sentiment", record.inferred_sentiment.as_str());
    event.add_field("source_repo", record.source_repo.as_str());
    add_all(&mut event, "labels", &record.labels);

    event
}

fn add_all(event: &mut Event, key: &str, values: &[String]) {
    for value in values {
        event.add_field(key, value.as_str());
    }
}
