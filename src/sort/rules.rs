use std::cmp::Ordering;
use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::config::SortConfig;
use crate::models::{SearchRecord, SortedResults};

use super::RecordSorter;

/// Water-resource topics that make a record relevant, in priority order.
/// "aquifer" is stemmed so the singular form matches too.
const TOPICS: [&str; 20] = [
    "groundwater",
    "water crisis",
    "water pollution",
    "drinking water",
    "water supply",
    "water management",
    "water sustainability",
    "water conservation",
    "water quality",
    "water resources",
    "water scarcity",
    "water infrastructure",
    "hydrology",
    "aquifer",
    "water treatment",
    "water reuse",
    "water efficiency",
    "water governance",
    "watershed management",
    "integrated water resources management",
];

/// Markers of advertisements, promotions, or sponsored content.
/// "promotion" also catches "promotional".
const EXCLUDE_MARKERS: [&str; 4] = ["advertisement", "advertorial", "sponsored", "promotion"];

/// Records mentioning this phrase form the top group.
const PRIORITY_PHRASE: &str = "groundwater level";

/// Deterministic counterpart to the prompt-based sorter: topic keywords for
/// the relevance filter, marker words for the exclusion filter, and parsed
/// publication dates for the recency order within each topic group.
#[derive(Debug)]
pub struct RuleSorter {
    config: SortConfig,
}

struct Ranked {
    rank: usize,
    date: Option<NaiveDate>,
    record: SearchRecord,
}

impl RuleSorter {
    pub fn new(config: SortConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl RecordSorter for RuleSorter {
    async fn sort(&self, records: Vec<SearchRecord>) -> Result<SortedResults> {
        let mut seen_links: HashSet<String> = HashSet::new();
        let mut kept: Vec<Ranked> = Vec::new();

        for record in records {
            let text = format!("{} {}", record.title, record.snippet).to_lowercase();
            let rank = group_rank(&text);

            let exempt = rank == 0 && !self.config.priority_respects_filters;
            if !exempt && (rank == usize::MAX || is_promotional(&text)) {
                continue;
            }

            // Duplicate links collapse to their first occurrence.
            if !record.link.is_empty() && !seen_links.insert(record.link.clone()) {
                continue;
            }

            let date = record
                .published_date
                .as_deref()
                .and_then(parse_published_date);
            kept.push(Ranked { rank, date, record });
        }

        // Stable sort: undated records within a group keep their input order.
        kept.sort_by(|a, b| match a.rank.cmp(&b.rank) {
            Ordering::Equal => cmp_dates_desc(a.date, b.date),
            other => other,
        });

        Ok(SortedResults::Structured(
            kept.into_iter().map(|r| r.record).collect(),
        ))
    }
}

/// Topic-group rank: 0 for the priority phrase, 1 + topic index for the first
/// matching topic, `usize::MAX` when nothing matches.
fn group_rank(text: &str) -> usize {
    if text.contains(PRIORITY_PHRASE) {
        return 0;
    }
    TOPICS
        .iter()
        .position(|topic| text.contains(topic))
        .map(|i| i + 1)
        .unwrap_or(usize::MAX)
}

fn is_promotional(text: &str) -> bool {
    EXCLUDE_MARKERS.iter().any(|m| text.contains(m))
}

/// Dated records first, most recent first; undated records sink to the
/// bottom of their group.
fn cmp_dates_desc(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Best-effort parse of the date strings the extractor produces: RFC 3339
/// metatag timestamps, bare dates, and "January 5, 2023"-style snippet text.
pub(crate) fn parse_published_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.date());
    }
    for format in ["%Y-%m-%d", "%B %d, %Y", "%b %d, %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }
    None
}
