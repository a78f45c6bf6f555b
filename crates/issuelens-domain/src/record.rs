//! Record module - the structured result of extracting one issue

use crate::sentiment::Sentiment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound on `body_summary`, counted in characters
pub const MAX_SUMMARY_CHARS: usize = 500;

/// Serialized text of one issue, as produced by an issue source
///
/// Opaque to the pipeline: the only thing that reads it is the language model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawIssue(String);

impl RawIssue {
    /// Wrap serialized issue text
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Borrow the serialized text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take the serialized text
    pub fn into_text(self) -> String {
        self.0
    }
}

impl From<String> for RawIssue {
    fn from(text: String) -> Self {
        Self(text)
    }
}

/// Reasons a deserialized record is refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    /// Title is empty or whitespace
    #[error("title is empty")]
    EmptyTitle,

    /// Summary longer than [`MAX_SUMMARY_CHARS`]
    #[error("body_summary has {0} chars (max: {1})")]
    SummaryTooLong(usize, usize),

    /// A library name that is not lower case
    #[error("library '{0}' is not lower case")]
    LibraryNotLowercase(String),

    /// `updated_at` is empty
    #[error("updated_at is empty")]
    EmptyTimestamp,
}

/// Structured data extracted from one issue
///
/// Every field is required on deserialization. A Record is only handed
/// downstream after [`Record::validate`] succeeds, and is never mutated after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Issue title
    pub title: String,

    /// Issue identifier, unique within a batch
    pub id: u64,

    /// Issue URL
    pub url: String,

    /// Libraries mentioned in the issue, lower case
    pub libraries: Vec<String>,

    /// Cloud providers mentioned in or inferred from the issue
    pub detected_cloud_providers: Vec<String>,

    /// Full issue body, unmodified
    pub body: String,

    /// Model-written summary of the body
    pub body_summary: String,

    /// Number of comments
    pub comment_count: u64,

    /// Last update timestamp, as reported by the tracker
    pub updated_at: String,

    /// Number of positive reactions
    pub positive_reactions: u64,

    /// Number of negative reactions
    pub negative_reactions: u64,

    /// Sentiment of the issue body
    pub inferred_sentiment: Sentiment,

    /// Repository the issue was opened in
    pub source_repo: String,

    /// Labels on the issue
    pub labels: Vec<String>,
}

impl Record {
    /// Validate field constraints that the type system does not cover
    ///
    /// # Examples
    ///
    /// ```
    /// use issuelens_domain::{Record, RecordValidationError, Sentiment};
    ///
    /// let mut record = Record {
    ///     title: "Crash on start".to_string(),
    ///     id: 7,
    ///     url: "https://example.com/issues/7".to_string(),
    ///     libraries: vec!["tokio".to_string()],
    ///     detected_cloud_providers: vec![],
    ///     body: "It crashes".to_string(),
    ///     body_summary: "Crashes on start".to_string(),
    ///     comment_count: 0,
    ///     updated_at: "2024-05-01T10:00:00Z".to_string(),
    ///     positive_reactions: 0,
    ///     negative_reactions: 0,
    ///     inferred_sentiment: Sentiment::Negative,
    ///     source_repo: "example".to_string(),
    ///     labels: vec![],
    /// };
    /// assert!(record.validate().is_ok());
    ///
    /// record.body_summary = "x".repeat(501);
    /// assert!(matches!(record.validate(), Err(RecordValidationError::SummaryTooLong(501, 500))));
    /// ```
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.title.trim().is_empty() {
            return Err(RecordValidationError::EmptyTitle);
        }

        let summary_chars = self.body_summary.chars().count();
        if summary_chars > MAX_SUMMARY_CHARS {
            return Err(RecordValidationError::SummaryTooLong(
                summary_chars,
                MAX_SUMMARY_CHARS,
            ));
        }

        if let Some(library) = self.libraries.iter().find(|l| l.to_lowercase() != **l) {
            return Err(RecordValidationError::LibraryNotLowercase(library.clone()));
        }

        if self.updated_at.trim().is_empty() {
            return Err(RecordValidationError::EmptyTimestamp);
        }

        Ok(())
    }

    /// Fold library names to lower case and drop duplicates
    ///
    /// Libraries are set-like, so the first occurrence of each name wins.
    /// No other field is touched; in particular `body_summary` is never
    /// truncated here.
    pub fn normalize_libraries(mut self) -> Self {
        let mut seen = std::collections::HashSet::new();
        self.libraries = self
            .libraries
            .into_iter()
            .map(|l| l.trim().to_lowercase())
            .filter(|l| !l.is_empty() && seen.insert(l.clone()))
            .collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> Record {
        Record {
            title: "Provider panics on empty region".to_string(),
            id: 42,
            url: "https://github.com/acme/infra/issues/42".to_string(),
            libraries: vec!["terraform".to_string(), "pulumi".to_string()],
            detected_cloud_providers: vec!["aws".to_string()],
            body: "Setting region to \"\" panics.".to_string(),
            body_summary: "Empty region causes a panic.".to_string(),
            comment_count: 3,
            updated_at: "2024-03-01T12:00:00Z".to_string(),
            positive_reactions: 2,
            negative_reactions: 0,
            inferred_sentiment: Sentiment::Negative,
            source_repo: "infra".to_string(),
            labels: vec!["bug".to_string()],
        }
    }

    #[test]
    fn test_valid_record() {
        assert!(sample_record().validate().is_ok());
    }

    #[test]
    fn test_empty_title() {
        let mut record = sample_record();
        record.title = "   ".to_string();
        assert_eq!(record.validate(), Err(RecordValidationError::EmptyTitle));
    }

    #[test]
    fn test_summary_at_limit_is_accepted() {
        let mut record = sample_record();
        record.body_summary = "a".repeat(MAX_SUMMARY_CHARS);
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_summary_counts_chars_not_bytes() {
        let mut record = sample_record();
        record.body_summary = "é".repeat(MAX_SUMMARY_CHARS);
        assert!(record.body_summary.len() > MAX_SUMMARY_CHARS);
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_summary_over_limit_is_rejected_not_truncated() {
        let mut record = sample_record();
        record.body_summary = "a".repeat(MAX_SUMMARY_CHARS + 1);
        assert_eq!(
            record.validate(),
            Err(RecordValidationError::SummaryTooLong(501, 500))
        );
        assert_eq!(record.body_summary.len(), MAX_SUMMARY_CHARS + 1);
    }

    #[test]
    fn test_uppercase_library_rejected() {
        let mut record = sample_record();
        record.libraries = vec!["Terraform".to_string()];
        assert!(matches!(
            record.validate(),
            Err(RecordValidationError::LibraryNotLowercase(_))
        ));
    }

    #[test]
    fn test_normalize_libraries() {
        let mut record = sample_record();
        record.libraries = vec![
            "Terraform".to_string(),
            "terraform".to_string(),
            " Pulumi ".to_string(),
            "".to_string(),
        ];
        let record = record.normalize_libraries();
        assert_eq!(record.libraries, vec!["terraform", "pulumi"]);
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_deserialize_requires_every_field() {
        let mut value = serde_json::to_value(sample_record()).unwrap();
        value.as_object_mut().unwrap().remove("labels");
        assert!(serde_json::from_value::<Record>(value).is_err());
    }

    #[test]
    fn test_deserialize_rejects_negative_counts() {
        let mut value = serde_json::to_value(sample_record()).unwrap();
        value["comment_count"] = serde_json::json!(-1);
        assert!(serde_json::from_value::<Record>(value).is_err());
    }

    #[test]
    fn test_raw_issue_text() {
        let raw = RawIssue::new("{\"number\": 1}");
        assert_eq!(raw.as_str(), "{\"number\": 1}");
        assert_eq!(raw.into_text(), "{\"number\": 1}");
    }
}
