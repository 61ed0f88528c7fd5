use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::Config;
use crate::models::{SearchRecord, SortedResults};

pub mod llm;
pub mod rules;

/// Strategy seam for the filtering/sorting step.
///
/// The prompt-based implementation delegates the decision to a language
/// model; the rules implementation applies the same criteria
/// deterministically. Both consume the extracted records and produce the
/// tagged outcome the endpoint serializes.
#[async_trait]
pub trait RecordSorter: Send + Sync + std::fmt::Debug {
    async fn sort(&self, records: Vec<SearchRecord>) -> Result<SortedResults>;
}

/// Construct the configured sorter strategy.
pub fn from_config(
    config: &Config,
    http_client: reqwest::Client,
) -> Result<Arc<dyn RecordSorter>> {
    match config.sort.strategy.as_str() {
        "llm" => Ok(Arc::new(llm::LlmSorter::new(
            http_client,
            config.llm.clone(),
            config.sort.clone(),
        ))),
        "rules" => Ok(Arc::new(rules::RuleSorter::new(config.sort.clone()))),
        other => anyhow::bail!("Unknown sort strategy: {other}"),
    }
}
