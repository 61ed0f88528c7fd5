use serde::{Deserialize, Serialize};

/// One normalized search result.
///
/// Produced by the extractor from a raw provider item; immutable afterwards.
/// `published_date` is best-effort: a metatag timestamp, a date-like substring
/// found in the snippet, or `None` when neither source yields one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub published_date: Option<String>,
}

/// Search request body
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    pub query_location: String,
}

/// Success envelope
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub sorted_results: SortedResults,
}

/// Failure envelope: `{"detail": "<message>"}`
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    pub detail: String,
}

impl ErrorDetail {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Outcome of the relevance sorter.
///
/// The model's reply is sometimes a parseable record array, sometimes free
/// text, and a fenced reply that fails to parse yields nothing at all. Each
/// case is a distinct variant so callers must handle all three; serialization
/// is untagged, so the wire shape stays array | string | null.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SortedResults {
    /// A parseable sequence of record-shaped entries, order as emitted.
    Structured(Vec<SearchRecord>),
    /// An unparseable plain-text reply, passed through verbatim.
    RawText(String),
    /// A fenced reply whose content failed to parse. Serializes as `null`.
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str) -> SearchRecord {
        SearchRecord {
            title: title.to_string(),
            snippet: String::new(),
            link: String::new(),
            published_date: None,
        }
    }

    #[test]
    fn test_structured_serializes_to_array() {
        let value = serde_json::to_value(SortedResults::Structured(vec![record("A")])).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["title"], "A");
    }

    #[test]
    fn test_raw_text_serializes_to_string() {
        let value =
            serde_json::to_value(SortedResults::RawText("not json".to_string())).unwrap();
        assert_eq!(value, serde_json::Value::String("not json".to_string()));
    }

    #[test]
    fn test_empty_serializes_to_null() {
        let value = serde_json::to_value(SortedResults::Empty).unwrap();
        assert!(value.is_null());
    }

    #[test]
    fn test_record_deserializes_with_missing_fields() {
        let rec: SearchRecord = serde_json::from_str(r#"{"title":"Water table"}"#).unwrap();
        assert_eq!(rec.title, "Water table");
        assert_eq!(rec.snippet, "");
        assert_eq!(rec.link, "");
        assert_eq!(rec.published_date, None);
    }

    #[test]
    fn test_record_serializes_null_date() {
        let value = serde_json::to_value(record("A")).unwrap();
        assert!(value["published_date"].is_null());
    }
}
