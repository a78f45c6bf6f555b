//! Request construction for issue extraction

use issuelens_domain::traits::CompletionRequest;
use issuelens_domain::{Sentiment, MAX_SUMMARY_CHARS};
use serde_json::{json, Value};

/// System instruction sent with every extraction request
pub const SYSTEM_INSTRUCTION: &str =
    "You are a system that parses GitHub issues and extracts data from them.";

/// Name under which the record schema is registered with the provider
pub const SCHEMA_NAME: &str = "issue_record";

/// JSON schema describing a record
///
/// Every property is required and no others are allowed, which is what
/// strict structured-output modes expect. Those modes reject string length
/// keywords, so the summary limit is stated in the description and enforced
/// by [`Record::validate`](issuelens_domain::Record::validate).
pub fn record_schema() -> Value {
    let string = |description: &str| json!({"type": "string", "description": description});
    let count = |description: &str| json!({"type": "integer", "minimum": 0, "description": description});
    let list = |description: &str| {
        json!({"type": "array", "items": {"type": "string"}, "description": description})
    };

    json!({
        "type": "object",
        "properties": {
            "title": string("The title of the issue."),
            "id": count("The ID of the issue."),
            "url": string("The URL of the issue."),
            "libraries": list("Libraries mentioned in the issue, in lower case."),
            "detected_cloud_providers": list(
                "Cloud providers mentioned in the issue, or inferred from the issue body."
            ),
            "body": string("The body of the issue."),
            "body_summary": string(&format!(
                "A summary of the issue body of at most {} characters.",
                MAX_SUMMARY_CHARS
            )),
            "comment_count": count("The number of comments on the issue."),
            "updated_at": string("The date and time the issue was last updated."),
            "positive_reactions": count("The number of positive reactions on the issue."),
            "negative_reactions": count("The number of negative reactions on the issue."),
            "inferred_sentiment": {
                "type": "string",
                "enum": Sentiment::variants(),
                "description": "The sentiment of the issue body.",
            },
            "source_repo": string("The name of the repository where the issue was opened."),
            "labels": list("The labels on the issue."),
        },
        "required": [
            "title", "id", "url", "libraries", "detected_cloud_providers", "body",
            "body_summary", "comment_count", "updated_at", "positive_reactions",
            "negative_reactions", "inferred_sentiment", "source_repo", "labels"
        ],
        "additionalProperties": false,
    })
}

/// Build the completion request for one issue
pub fn build_request(raw_text: &str) -> CompletionRequest {
    CompletionRequest {
        system: SYSTEM_INSTRUCTION.to_string(),
        user: raw_text.to_string(),
        schema_name: SCHEMA_NAME.to_string(),
        schema: record_schema(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use issuelens_domain::Record;

    #[test]
    fn test_request_carries_issue_text_verbatim() {
        let request = build_request("{\"title\": \"Bug\"}");
        assert_eq!(request.system, SYSTEM_INSTRUCTION);
        assert_eq!(request.user, "{\"title\": \"Bug\"}");
        assert_eq!(request.schema_name, SCHEMA_NAME);
    }

    #[test]
    fn test_schema_requires_every_record_field() {
        let schema = record_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        let properties = schema["properties"].as_object().unwrap();

        assert_eq!(required.len(), properties.len());
        for key in &required {
            assert!(properties.contains_key(*key), "missing property {}", key);
        }
        assert_eq!(schema["additionalProperties"], false);
    }

    #[test]
    fn test_schema_matches_record_fields() {
        let record = Record {
            title: "t".to_string(),
            id: 1,
            url: String::new(),
            libraries: vec![],
            detected_cloud_providers: vec![],
            body: String::new(),
            body_summary: String::new(),
            comment_count: 0,
            updated_at: "x".to_string(),
            positive_reactions: 0,
            negative_reactions: 0,
            inferred_sentiment: Sentiment::Neutral,
            source_repo: String::new(),
            labels: vec![],
        };
        let value = serde_json::to_value(record).unwrap();
        let schema = record_schema();
        let properties = schema["properties"].as_object().unwrap();

        for key in value.as_object().unwrap().keys() {
            assert!(properties.contains_key(key), "schema lacks {}", key);
        }
    }

    #[test]
    fn test_sentiment_enum() {
        let schema = record_schema();
        assert_eq!(
            schema["properties"]["inferred_sentiment"]["enum"],
            json!(["positive", "negative", "neutral"])
        );
        assert!(schema["properties"]["body_summary"]["description"]
            .as_str()
            .unwrap()
            .contains("500"));
    }

    fn collect_keywords(schema: &serde_json::Value, out: &mut Vec<String>) {
        if let Some(object) = schema.as_object() {
            for (key, value) in object {
                out.push(key.clone());
                if key == "properties" {
                    for property in value.as_object().unwrap().values() {
                        collect_keywords(property, out);
                    }
                } else if key == "items" {
                    collect_keywords(value, out);
                }
            }
        }
    }

    #[test]
    fn test_schema_uses_only_strict_mode_keywords() {
        let allowed = [
            "type",
            "properties",
            "required",
            "additionalProperties",
            "items",
            "enum",
            "description",
            "minimum",
        ];
        let mut keywords = Vec::new();
        collect_keywords(&record_schema(), &mut keywords);

        for keyword in keywords {
            assert!(allowed.contains(&keyword.as_str()), "unsupported keyword {}", keyword);
        }
    }
}
