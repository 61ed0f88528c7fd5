use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::models::SearchRecord;

/// Date-like substrings in snippet text: a capitalized month word followed by
/// a day and a four-digit year, e.g. "March 5, 2024" or "Mar 5, 2024".
static SNIPPET_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Z][a-z]{2,8} \d{1,2}, \d{4}").unwrap());

/// Metatag keys that may carry a publication timestamp, most authoritative
/// first.
const METATAG_DATE_KEYS: [&str; 4] = [
    "article:published_time",
    "article:modified_time",
    "datePublished",
    "dateCreated",
];

/// Map a raw provider response to normalized records, one per item.
///
/// Parsing is permissive: a response without an `items` list yields an empty
/// vec, and missing or non-string item fields default to "" instead of
/// failing.
pub fn parse_search_results(response: &Value) -> Vec<SearchRecord> {
    let Some(items) = response.get("items").and_then(|v| v.as_array()) else {
        return Vec::new();
    };

    items
        .iter()
        .map(|item| {
            let title = str_field(item, "title");
            let snippet = str_field(item, "snippet");
            let link = str_field(item, "link");

            // Structured metadata is authoritative; only scan the snippet
            // when the metatags yield nothing.
            let published_date = metatag_date(item).or_else(|| snippet_date(&snippet));

            SearchRecord {
                title,
                snippet,
                link,
                published_date,
            }
        })
        .collect()
}

fn str_field(item: &Value, key: &str) -> String {
    item.get(key)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

/// Read a publication date from the item's first `pagemap.metatags` entry.
/// The first non-empty value among the known keys wins.
fn metatag_date(item: &Value) -> Option<String> {
    let meta = item.get("pagemap")?.get("metatags")?.as_array()?.first()?;

    METATAG_DATE_KEYS.iter().find_map(|key| {
        meta.get(*key)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
    })
}

/// Scan snippet text for a date-like substring.
fn snippet_date(snippet: &str) -> Option<String> {
    SNIPPET_DATE.find(snippet).map(|m| m.as_str().to_string())
}
