use anyhow::Result;

use crate::models::SortedResults;
use crate::search;
use crate::state::AppState;

/// Per-request search credentials, substituted over the configured ones.
#[derive(Debug, Clone)]
pub struct SearchCredentials {
    pub api_key: String,
    pub engine_id: String,
}

/// Run the full pipeline for one location: search, extract, sort.
///
/// Each stage feeds the next unchanged and any stage failure propagates to
/// the caller untouched.
pub async fn run(state: &AppState, query_location: &str) -> Result<SortedResults> {
    run_with_credentials(state, query_location, None).await
}

/// Same as [`run`], but with per-request search credentials, e.g. to query an
/// alternate search scope without restarting the server.
pub async fn run_with_credentials(
    state: &AppState,
    query_location: &str,
    credentials: Option<SearchCredentials>,
) -> Result<SortedResults> {
    let mut search_config = state.config.search.clone();
    if let Some(creds) = credentials {
        search_config.api_key = Some(creds.api_key);
        search_config.engine_id = Some(creds.engine_id);
    }

    let raw = search::client::search(&state.http_client, &search_config, query_location).await?;
    let records = search::extract::parse_search_results(&raw);
    tracing::info!(
        "Extracted {} records for \"{query_location}\"",
        records.len()
    );

    state.sorter.sort(records).await
}
