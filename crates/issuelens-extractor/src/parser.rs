//! Parse completion output into validated records

use crate::error::ExtractorError;
use issuelens_domain::Record;
use serde::Deserialize;

/// Parse the provider's JSON answer into a validated record
///
/// Library names are normalized first; every other field is taken as-is and
/// a record that fails validation is rejected rather than repaired.
pub fn parse_record(response: &str) -> Result<Record, ExtractorError> {
    let json_str = extract_json(response)?;

    let record: Record = serde_json::from_str(json_str)
        .map_err(|e| ExtractorError::InvalidFormat(format!("JSON parse error: {}", e)))?;

    let record = record.normalize_libraries();
    record.validate()?;
    Ok(record)
}

/// Strip a markdown code fence around the JSON, if present
fn extract_json(response: &str) -> Result<&str, ExtractorError> {
    let trimmed = response.trim();

    if let Some(rest) = trimmed.strip_prefix("```") {
        // Skip the info string (e.g. "json") on the opening line
        let body = rest
            .split_once('\n')
            .map(|(_, body)| body)
            .ok_or_else(|| ExtractorError::InvalidFormat("Empty code block".to_string()))?;
        let body = body.trim_end();
        let body = body.strip_suffix("```").unwrap_or(body);
        Ok(body.trim())
    } else {
        Ok(trimmed)
    }
}

#[derive(Deserialize)]
struct IdHint {
    number: Option<u64>,
    id: Option<u64>,
}

/// Best-effort issue identifier from raw issue text
///
/// Prefers the tracker's issue number over its internal id. Returns `None`
/// when the text is not a JSON object carrying either.
pub fn issue_id_hint(raw_text: &str) -> Option<u64> {
    let hint: IdHint = serde_json::from_str(raw_text).ok()?;
    hint.number.or(hint.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use issuelens_domain::RecordValidationError;

    const VALID: &str = r#"{
        "title": "Plan fails with pulumi",
        "id": 12,
        "url": "https://github.com/acme/infra/issues/12",
        "libraries": ["Pulumi", "terraform"],
        "detected_cloud_providers": ["gcp"],
        "body": "Running plan fails.",
        "body_summary": "Plan fails.",
        "comment_count": 1,
        "updated_at": "2024-02-02T08:00:00Z",
        "positive_reactions": 0,
        "negative_reactions": 1,
        "inferred_sentiment": "negative",
        "source_repo": "infra",
        "labels": ["bug", "triage"]
    }"#;

    #[test]
    fn test_parse_valid_record() {
        let record = parse_record(VALID).unwrap();
        assert_eq!(record.id, 12);
        assert_eq!(record.libraries, vec!["pulumi", "terraform"]);
        assert_eq!(record.labels, vec!["bug", "triage"]);
    }

    #[test]
    fn test_parse_with_markdown_wrapper() {
        let wrapped = format!("```json\n{}\n```", VALID);
        let record = parse_record(&wrapped).unwrap();
        assert_eq!(record.title, "Plan fails with pulumi");
    }

    #[test]
    fn test_parse_not_json() {
        let result = parse_record("This is not JSON");
        assert!(matches!(result, Err(ExtractorError::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_missing_field() {
        let result = parse_record(r#"{"title": "x", "id": 1}"#);
        assert!(matches!(result, Err(ExtractorError::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_unknown_sentiment() {
        let bad = VALID.replace("\"negative\"", "\"furious\"");
        assert!(matches!(parse_record(&bad), Err(ExtractorError::InvalidFormat(_))));
    }

    #[test]
    fn test_long_summary_is_rejected() {
        let long = "s".repeat(501);
        let bad = VALID.replace("\"Plan fails.\"", &format!("\"{}\"", long));
        assert!(matches!(
            parse_record(&bad),
            Err(ExtractorError::Validation(RecordValidationError::SummaryTooLong(501, 500)))
        ));
    }

    #[test]
    fn test_extract_json_plain() {
        assert_eq!(extract_json("  {\"a\": 1} ").unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_json_without_language() {
        assert_eq!(extract_json("```\n{\"a\": 1}\n```").unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_json_empty_fence() {
        assert!(extract_json("```").is_err());
    }

    #[test]
    fn test_issue_id_hint() {
        assert_eq!(issue_id_hint(r#"{"number": 7, "id": 99999}"#), Some(7));
        assert_eq!(issue_id_hint(r#"{"id": 3}"#), Some(3));
        assert_eq!(issue_id_hint(r#"{"title": "x"}"#), None);
        assert_eq!(issue_id_hint("plain text"), None);
    }
}
