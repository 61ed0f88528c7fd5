use std::sync::Arc;

use crate::config::Config;
use crate::sort::{self, RecordSorter};

/// Shared application state.
///
/// Everything here is fixed at startup; requests share the HTTP client and
/// the sorter but hold no mutable data.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub http_client: reqwest::Client,
    pub sorter: Arc<dyn RecordSorter>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()?;

        let sorter = sort::from_config(&config, http_client.clone())?;

        Ok(Self {
            config,
            http_client,
            sorter,
        })
    }
}
