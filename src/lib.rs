//! # aquifer-search
//!
//! A Rust web service that searches the web for groundwater coverage of a
//! location and returns the results filtered by topic and ordered by
//! priority and recency.
//!
//! ## Architecture
//!
//! Each request runs one strictly linear pipeline:
//!
//! ```text
//!            ┌──────────────────────────────┐
//!            │ POST /search                 │
//!            │ {"query_location": "Fresno"} │
//!            └──────────────┬───────────────┘
//!                           │
//!                           ▼
//!            ┌──────────────────────────────┐
//!            │        Search Client         │
//!            │ "groundwater levels in ..."  │──▶ Custom Search API
//!            └──────────────┬───────────────┘
//!                           │ raw provider JSON
//!                           ▼
//!            ┌──────────────────────────────┐
//!            │          Extractor           │
//!            │ title / snippet / link +     │
//!            │ best-effort publication date │
//!            └──────────────┬───────────────┘
//!                           │ Vec<SearchRecord>
//!                           ▼
//!            ┌──────────────────────────────┐
//!            │           Sorter             │
//!            │ prompt-based (Gemini/OpenAI) │──▶ LLM API
//!            │ or deterministic rules       │
//!            └──────────────┬───────────────┘
//!                           │ array | raw text | null
//!                           ▼
//!            ┌──────────────────────────────┐
//!            │ 200 {"sorted_results": ...}  │
//!            └──────────────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for the server and both providers
//! - [`models`] - `SearchRecord`, request/response envelopes, and the tagged sorter outcome
//! - [`search::client`] - Custom Search API client with the fixed groundwater query phrase
//! - [`search::extract`] - Metadata extraction: metatag dates first, snippet scan as fallback
//! - [`sort`] - `RecordSorter` strategies: prompt-based and rule-based implementations
//! - [`workflow`] - Linear orchestration of search, extraction, and sorting
//! - [`api`] - Axum HTTP handler for `POST /search`
//! - [`state`] - Shared application state: config, HTTP client, and the chosen sorter

pub mod api;
pub mod config;
pub mod models;
pub mod search;
pub mod sort;
pub mod state;
pub mod workflow;
