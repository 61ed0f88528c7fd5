use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{LlmConfig, SortConfig};
use crate::models::{SearchRecord, SortedResults};

use super::RecordSorter;

/// Prompt-based sorter: embeds the serialized records in a natural-language
/// instruction and lets the configured model do the filtering and ordering.
///
/// The reply is decoded leniently; see [`parse_sorted_reply`] for the three
/// shapes tolerated.
#[derive(Debug)]
pub struct LlmSorter {
    client: reqwest::Client,
    llm: LlmConfig,
    sort: SortConfig,
}

impl LlmSorter {
    pub fn new(client: reqwest::Client, llm: LlmConfig, sort: SortConfig) -> Self {
        Self { client, llm, sort }
    }
}

#[async_trait]
impl RecordSorter for LlmSorter {
    async fn sort(&self, records: Vec<SearchRecord>) -> Result<SortedResults> {
        // Nothing to rank; skip the round trip.
        if records.is_empty() {
            return Ok(SortedResults::Structured(Vec::new()));
        }

        let records_json =
            serde_json::to_string(&records).context("Failed to serialize search records")?;
        let prompt = build_sorting_prompt(&records_json, self.sort.priority_respects_filters);

        let reply = match self.llm.provider.as_str() {
            "gemini" => call_gemini(&self.client, &self.llm, &prompt).await?,
            "openai" => call_openai(&self.client, &self.llm, &prompt).await?,
            other => anyhow::bail!("Unknown LLM provider: {other}"),
        };

        Ok(parse_sorted_reply(&reply))
    }
}

/// Build the sorting instruction around the serialized record list.
///
/// The final note pins down whether the groundwater-levels priority group is
/// itself subject to the relevance and exclusion criteria.
fn build_sorting_prompt(records_json: &str, priority_respects_filters: bool) -> String {
    let priority_note = if priority_respects_filters {
        "The relevance and exclusion criteria apply to every entry, including those discussing \"groundwater levels\"."
    } else {
        "Entries discussing \"groundwater levels\" are always kept, even when the criteria above would otherwise exclude them."
    };

    format!(
        r#"You are provided with a list of response data entries:

{records_json}

Please filter and sort these entries according to the following criteria:

1. **Relevance**: Include only entries that are clearly related to the following topics:
   - Groundwater
   - Water crisis
   - Water pollution
   - Drinking water
   - Water supply
   - Water management
   - Water sustainability
   - Water conservation
   - Water quality
   - Water resources
   - Water scarcity
   - Water infrastructure
   - Hydrology
   - Aquifers
   - Water treatment
   - Water reuse
   - Water efficiency
   - Water governance
   - Watershed management
   - Integrated water resources management (IWRM)

2. **Exclusion**: Exclude any entries that are related to advertisements, promotions, or sponsored content.

3. **Prioritization**:
   - Entries specifically discussing "groundwater levels" should appear at the top.
   - Within each topic group:
     - Entries with a publication date should be sorted in descending order (most recent first).
     - Entries without a publication date should be placed at the bottom of their respective groups.

**Note**: The publication date for each entry is provided explicitly as a key in the data.

{priority_note}

Return the result strictly as a valid JSON array, with no additional text or explanations."#
    )
}

/// Decode the model's reply into the tagged outcome.
///
/// Three shapes are tolerated: a reply opening with a ```json fence (markers
/// stripped, then parsed; a parse failure here yields `Empty`), a bare JSON
/// record array (parsed directly), and anything else (logged and passed
/// through verbatim as `RawText`).
fn parse_sorted_reply(reply: &str) -> SortedResults {
    let trimmed = reply.trim();

    if trimmed.starts_with("```json") {
        return match serde_json::from_str::<Vec<SearchRecord>>(&strip_code_fences(trimmed)) {
            Ok(records) => SortedResults::Structured(records),
            Err(e) => {
                tracing::warn!("Fenced model reply failed to parse: {e}");
                SortedResults::Empty
            }
        };
    }

    match serde_json::from_str::<Vec<SearchRecord>>(trimmed) {
        Ok(records) => SortedResults::Structured(records),
        Err(e) => {
            tracing::warn!("Model reply is not a record array ({e}); passing the text through");
            SortedResults::RawText(reply.to_string())
        }
    }
}

/// Remove every ```json and ``` marker from a fenced reply.
fn strip_code_fences(reply: &str) -> String {
    reply
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

// ─── Gemini ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize)]
struct GeminiGenerationConfig {
    temperature: f32,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiReplyContent,
}

#[derive(Deserialize)]
struct GeminiReplyContent {
    #[serde(default)]
    parts: Vec<GeminiReplyPart>,
}

#[derive(Deserialize)]
struct GeminiReplyPart {
    #[serde(default)]
    text: String,
}

async fn call_gemini(client: &reqwest::Client, config: &LlmConfig, prompt: &str) -> Result<String> {
    let api_key = config
        .api_key
        .as_deref()
        .context("LLM_API_KEY (or GEMINI_API_KEY) is not set")?;
    let url = format!(
        "{}/v1beta/models/{}:generateContent",
        config.base_url, config.model
    );

    let request = GeminiRequest {
        contents: vec![GeminiContent {
            role: "user".to_string(),
            parts: vec![GeminiPart {
                text: prompt.to_string(),
            }],
        }],
        generation_config: GeminiGenerationConfig { temperature: 0.0 },
    };

    let response = client
        .post(&url)
        .query(&[("key", api_key)])
        .json(&request)
        .send()
        .await
        .context("Failed to call Gemini API")?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("Gemini API returned {status}: {body}");
    }

    let body: GeminiResponse = response
        .json()
        .await
        .context("Failed to parse Gemini response")?;

    Ok(body
        .candidates
        .first()
        .map(|c| {
            c.content
                .parts
                .iter()
                .map(|p| p.text.as_str())
                .collect::<String>()
        })
        .unwrap_or_default())
}

// ─── OpenAI-compatible ───────────────────────────────────────────────────

#[derive(Serialize)]
struct OpenAiChatRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    temperature: f32,
}

#[derive(Serialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct OpenAiChatResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiReplyMessage,
}

#[derive(Deserialize)]
struct OpenAiReplyMessage {
    content: String,
}

async fn call_openai(client: &reqwest::Client, config: &LlmConfig, prompt: &str) -> Result<String> {
    let url = format!("{}/v1/chat/completions", config.base_url);
    let api_key = config.api_key.as_deref().unwrap_or_default();

    let request = OpenAiChatRequest {
        model: config.model.clone(),
        messages: vec![OpenAiMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        }],
        temperature: 0.0,
    };

    let response = client
        .post(&url)
        .header("Authorization", format!("Bearer {api_key}"))
        .json(&request)
        .send()
        .await
        .context("Failed to call OpenAI chat API")?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("OpenAI chat API returned {status}: {body}");
    }

    let body: OpenAiChatResponse = response
        .json()
        .await
        .context("Failed to parse OpenAI chat response")?;

    Ok(body
        .choices
        .first()
        .map(|c| c.message.content.clone())
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN_ARRAY: &str = r#"[
        {"title": "Groundwater levels drop", "snippet": "s", "link": "https://a", "published_date": "2024-01-15"},
        {"title": "Aquifer recharge", "snippet": "t", "link": "https://b", "published_date": null}
    ]"#;

    #[test]
    fn test_parse_plain_array() {
        let result = parse_sorted_reply(PLAIN_ARRAY);
        match result {
            SortedResults::Structured(records) => {
                assert_eq!(records.len(), 2);
                assert_eq!(records[0].title, "Groundwater levels drop");
                assert_eq!(records[0].published_date.as_deref(), Some("2024-01-15"));
                assert_eq!(records[1].published_date, None);
            }
            other => panic!("expected structured results, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_fenced_array_matches_plain() {
        let fenced = format!("```json\n{PLAIN_ARRAY}\n```");
        assert_eq!(parse_sorted_reply(&fenced), parse_sorted_reply(PLAIN_ARRAY));
    }

    #[test]
    fn test_parse_fenced_with_surrounding_whitespace() {
        let fenced = format!("\n\n  ```json\n{PLAIN_ARRAY}\n```  \n");
        match parse_sorted_reply(&fenced) {
            SortedResults::Structured(records) => assert_eq!(records.len(), 2),
            other => panic!("expected structured results, got {other:?}"),
        }
    }

    #[test]
    fn test_fenced_garbage_yields_empty() {
        let reply = "```json\nthis is not json\n```";
        assert_eq!(parse_sorted_reply(reply), SortedResults::Empty);
    }

    #[test]
    fn test_plain_text_passes_through_verbatim() {
        let reply = "  I could not find any relevant entries. ";
        assert_eq!(
            parse_sorted_reply(reply),
            SortedResults::RawText(reply.to_string())
        );
    }

    #[test]
    fn test_bare_fence_without_json_tag_is_raw_text() {
        let reply = format!("```\n{PLAIN_ARRAY}\n```");
        assert_eq!(
            parse_sorted_reply(&reply),
            SortedResults::RawText(reply.clone())
        );
    }

    #[test]
    fn test_parse_ignores_unknown_record_fields() {
        let reply = r#"[{"title": "Water table", "displayLink": "a.example"}]"#;
        match parse_sorted_reply(reply) {
            SortedResults::Structured(records) => {
                assert_eq!(records[0].title, "Water table");
                assert_eq!(records[0].link, "");
            }
            other => panic!("expected structured results, got {other:?}"),
        }
    }

    #[test]
    fn test_strip_code_fences_removes_all_markers() {
        let reply = "```json\n[1]\n```\n```json\n[2]\n```";
        assert_eq!(strip_code_fences(reply), "[1]\n\n\n[2]");
    }

    #[test]
    fn test_prompt_embeds_records_and_criteria() {
        let prompt = build_sorting_prompt(r#"[{"title":"x"}]"#, true);
        assert!(prompt.contains(r#"[{"title":"x"}]"#));
        assert!(prompt.contains("- Groundwater\n"));
        assert!(prompt.contains("- Integrated water resources management (IWRM)"));
        assert!(prompt.contains("advertisements, promotions, or sponsored content"));
        assert!(prompt.contains("strictly as a valid JSON array"));
    }

    #[test]
    fn test_prompt_priority_note_follows_config() {
        let strict = build_sorting_prompt("[]", true);
        assert!(strict.contains("apply to every entry"));

        let lax = build_sorting_prompt("[]", false);
        assert!(lax.contains("are always kept"));
    }

    #[tokio::test]
    async fn test_empty_records_skip_the_provider() {
        // No key and an unroutable URL; an attempted call would error out.
        let llm = LlmConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            api_key: None,
            ..LlmConfig::default()
        };
        let sorter = LlmSorter::new(reqwest::Client::new(), llm, SortConfig::default());
        let result = sorter.sort(Vec::new()).await.unwrap();
        assert_eq!(result, SortedResults::Structured(Vec::new()));
    }
}
