//! Sentiment module - the model's reading of an issue's tone

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentiment inferred from an issue body
///
/// Serialized in lower case; any other spelling fails deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    /// Appreciative or constructive tone
    Positive,

    /// Frustrated or critical tone
    Negative,

    /// Neither
    Neutral,
}

impl Sentiment {
    /// Get the sentiment name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }

    /// Parse a sentiment from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "positive" => Some(Sentiment::Positive),
            "negative" => Some(Sentiment::Negative),
            "neutral" => Some(Sentiment::Neutral),
            _ => None,
        }
    }

    /// All accepted values, in schema order
    pub fn variants() -> [&'static str; 3] {
        ["positive", "negative", "neutral"]
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid sentiment: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        for name in Sentiment::variants() {
            let sentiment: Sentiment = name.parse().unwrap();
            assert_eq!(sentiment.as_str(), name);
        }
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!(Sentiment::parse("Positive").is_none());
        assert!("angry".parse::<Sentiment>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Sentiment::Negative).unwrap();
        assert_eq!(json, "\"negative\"");

        let parsed: Sentiment = serde_json::from_str("\"neutral\"").unwrap();
        assert_eq!(parsed, Sentiment::Neutral);

        assert!(serde_json::from_str::<Sentiment>("\"mixed\"").is_err());
    }
}
