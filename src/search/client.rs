use anyhow::{Context, Result};

use crate::config::SearchConfig;

/// Build the provider query for a location. The phrase template is fixed:
/// every search asks about groundwater levels at the given place.
pub fn build_query(query_location: &str) -> String {
    format!("groundwater levels in {query_location}")
}

/// Run one search request for `query_location` and return the decoded JSON
/// body as-is. Transport failures and non-success statuses propagate to the
/// caller unmodified; there is no retry and no caching.
pub async fn search(
    client: &reqwest::Client,
    config: &SearchConfig,
    query_location: &str,
) -> Result<serde_json::Value> {
    let api_key = config
        .api_key
        .as_deref()
        .context("SEARCH_API_KEY is not set")?;
    let engine_id = config
        .engine_id
        .as_deref()
        .context("SEARCH_ENGINE_ID is not set")?;

    let mut params = vec![
        ("key", api_key.to_string()),
        ("cx", engine_id.to_string()),
        ("q", build_query(query_location)),
    ];
    if let Some(num) = config.result_count {
        params.push(("num", num.to_string()));
    }

    let resp = client
        .get(&config.base_url)
        .query(&params)
        .send()
        .await
        .context("Failed to call search API")?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("Search API returned {status}: {body}");
    }

    resp.json()
        .await
        .context("Failed to decode search API response")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_query_embeds_location() {
        assert_eq!(
            build_query("Fresno, California"),
            "groundwater levels in Fresno, California"
        );
    }

    #[test]
    fn test_build_query_empty_location() {
        // The template is applied verbatim; validation happens at the endpoint.
        assert_eq!(build_query(""), "groundwater levels in ");
    }
}
