use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address
    pub bind_addr: String,
    /// Total timeout for each outbound provider call, in seconds
    pub request_timeout_secs: u64,
    /// Search provider configuration
    pub search: SearchConfig,
    /// LLM provider configuration
    pub llm: LlmConfig,
    /// Relevance sorter configuration
    pub sort: SortConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Base URL of the Custom Search endpoint
    pub base_url: String,
    /// Provider API key. Absent keys fail lazily on first request.
    pub api_key: Option<String>,
    /// Search-scope identifier (the provider's "cx" engine id)
    pub engine_id: Option<String>,
    /// Result count passed as the provider's `num` parameter when set
    pub result_count: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "gemini" or "openai"
    pub provider: String,
    /// Base URL for the LLM API
    pub base_url: String,
    /// Model name for the sorting prompt
    pub model: String,
    /// API key. Absent keys fail lazily on first request.
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortConfig {
    /// "llm" (prompt-based) or "rules" (deterministic)
    pub strategy: String,
    /// Whether the groundwater-levels priority group is still subject to the
    /// relevance and advertisement filters, or bypasses them entirely
    pub priority_respects_filters: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            request_timeout_secs: 30,
            search: SearchConfig::default(),
            llm: LlmConfig::default(),
            sort: SortConfig::default(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.googleapis.com/customsearch/v1".to_string(),
            api_key: None,
            engine_id: None,
            result_count: None,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-2.0-flash".to_string(),
            api_key: None,
        }
    }
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            strategy: "llm".to_string(),
            priority_respects_filters: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("AQUIFER_SEARCH_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(val) = std::env::var("AQUIFER_SEARCH_TIMEOUT_SECS") {
            if let Ok(v) = val.parse() {
                config.request_timeout_secs = v;
            }
        }

        if let Ok(url) = std::env::var("SEARCH_BASE_URL") {
            config.search.base_url = url;
        }
        if let Ok(key) = std::env::var("SEARCH_API_KEY") {
            config.search.api_key = Some(key);
        }
        if let Ok(id) = std::env::var("SEARCH_ENGINE_ID") {
            config.search.engine_id = Some(id);
        }
        if let Ok(val) = std::env::var("SEARCH_RESULT_COUNT") {
            if let Ok(v) = val.parse() {
                config.search.result_count = Some(v);
            }
        }

        if let Ok(provider) = std::env::var("LLM_PROVIDER") {
            config.llm.provider = provider;
        }
        if let Ok(url) = std::env::var("LLM_BASE_URL") {
            config.llm.base_url = url;
        }
        if let Ok(model) = std::env::var("LLM_MODEL") {
            config.llm.model = model;
        }
        // GEMINI_API_KEY is honored as a fallback for deployments keyed to
        // the default provider.
        if let Ok(key) = std::env::var("LLM_API_KEY") {
            config.llm.api_key = Some(key);
        } else if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            config.llm.api_key = Some(key);
        }

        if let Ok(strategy) = std::env::var("SORT_STRATEGY") {
            config.sort.strategy = strategy;
        }
        if let Ok(val) = std::env::var("SORT_PRIORITY_RESPECTS_FILTERS") {
            if let Ok(v) = val.parse() {
                config.sort.priority_respects_filters = v;
            }
        }

        config
    }
}
