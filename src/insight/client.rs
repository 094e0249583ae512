//! HTTP adapter for the Gemini `generateContent` REST endpoint

use crate::data::loader::HTTP_CLIENT;
use crate::insight::types::{ChatMessage, ChatRole, GroundingSource, SovereignInsight};
use crate::insight::InsightProvider;
use crate::{MapError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const UNTITLED_SOURCE: &str = "Verified Intel Source";

const ANALYST_INSTRUCTION: &str = "IDENTITY: Lead Analyst for the Sovereign Map Global Spatial DAO. \
TASK: Provide technical, objective geopolitical analysis. \
THEME: Decentralization, spatial sovereignty, and cryptographically verifiable world data. \
MANDATE: Always use Google Search for up-to-date events.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl InsightConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Reads `GEMINI_API_KEY` (or `API_KEY`), plus an optional `GEMINI_MODEL`
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| MapError::Insight("no API key configured".to_string()))?;
        let mut config = Self::new(api_key);
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            config.model = model;
        }
        Ok(config)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

// --- wire types ----------------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    web: Option<WebChunk>,
}

#[derive(Debug, Deserialize)]
struct WebChunk {
    uri: Option<String>,
    title: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    fn sources(&self) -> Vec<GroundingSource> {
        self.candidates
            .first()
            .and_then(|c| c.grounding_metadata.as_ref())
            .map(|metadata| {
                metadata
                    .grounding_chunks
                    .iter()
                    .filter_map(|chunk| chunk.web.as_ref())
                    .filter_map(|web| {
                        Some(GroundingSource {
                            uri: web.uri.clone()?,
                            title: web
                                .title
                                .clone()
                                .filter(|t| !t.is_empty())
                                .unwrap_or_else(|| UNTITLED_SOURCE.to_string()),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn insight_prompt(region_name: &str) -> String {
    format!(
        "TASK: Analyze sovereign risk for {}.\n\
         REQUIREMENTS: Focus on real-time political stability, recent economic shifts, and spatial-sovereignty risks.\n\
         FORMAT: Strict JSON only.",
        region_name
    )
}

fn insight_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": { "type": "STRING" },
            "politicalStatus": { "type": "STRING" },
            "economicOutlook": { "type": "STRING" },
            "recentEvents": { "type": "ARRAY", "items": { "type": "STRING" } },
            "keyRisks": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "severity": { "type": "INTEGER" }
                    },
                    "required": ["name", "severity"]
                }
            }
        },
        "required": ["summary", "politicalStatus", "economicOutlook", "recentEvents", "keyRisks"]
    })
}

pub(crate) fn insight_request(region_name: &str) -> Value {
    json!({
        "contents": [{ "role": "user", "parts": [{ "text": insight_prompt(region_name) }] }],
        "tools": [{ "google_search": {} }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": insight_schema()
        }
    })
}

/// Gemini expects the conversation to open with a user turn, so the
/// analyst greeting and any other leading model turns are left out.
pub(crate) fn chat_request(history: &[ChatMessage], message: &str) -> Value {
    let mut contents: Vec<Value> = history
        .iter()
        .skip_while(|m| m.role == ChatRole::Assistant)
        .map(|m| {
            let role = match m.role {
                ChatRole::User => "user",
                ChatRole::Assistant => "model",
            };
            json!({ "role": role, "parts": [{ "text": m.content }] })
        })
        .collect();
    contents.push(json!({ "role": "user", "parts": [{ "text": message }] }));
    json!({
        "systemInstruction": { "parts": [{ "text": ANALYST_INSTRUCTION }] },
        "contents": contents,
        "tools": [{ "google_search": {} }]
    })
}

/// Decodes an insight from a raw `generateContent` response body. An empty
/// text part decodes as an empty insight.
pub(crate) fn parse_insight_response(body: &str) -> Result<SovereignInsight> {
    let response: GenerateContentResponse = serde_json::from_str(body)?;
    let text = response.text();
    let insight: SovereignInsight = if text.trim().is_empty() {
        SovereignInsight::default()
    } else {
        serde_json::from_str(&text)?
    };
    Ok(insight.with_sources(response.sources()))
}

pub(crate) fn parse_chat_response(body: &str) -> Result<String> {
    let response: GenerateContentResponse = serde_json::from_str(body)?;
    Ok(response.text())
}

/// [`InsightProvider`] backed by the Gemini REST API
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: InsightConfig,
}

impl GeminiClient {
    pub fn new(config: InsightConfig) -> Self {
        Self { config }
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::new(InsightConfig::from_env()?))
    }

    pub fn config(&self) -> &InsightConfig {
        &self.config
    }

    async fn generate(&self, body: &Value) -> Result<String> {
        let response = HTTP_CLIENT
            .post(self.config.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(MapError::Insight(format!("HTTP {}: {}", status, text)));
        }
        Ok(text)
    }
}

#[async_trait]
impl InsightProvider for GeminiClient {
    async fn insight(&self, region_name: &str) -> Result<SovereignInsight> {
        log::debug!("requesting insight for {}", region_name);
        let body = self.generate(&insight_request(region_name)).await?;
        parse_insight_response(&body)
    }

    async fn chat(&self, history: &[ChatMessage], message: &str) -> Result<String> {
        let body = self.generate(&chat_request(history, message)).await?;
        parse_chat_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_insight_response_with_grounding() {
        let insight_json = r#"{"summary":"S","politicalStatus":"P","economicOutlook":"E","recentEvents":["a","b"],"keyRisks":[{"name":"r","severity":30}]}"#;
        let chunks: Vec<Value> = (0..7)
            .map(|i| {
                let title = if i == 0 { "" } else { "Wire" };
                json!({ "web": { "uri": format!("https://news.example/{}", i), "title": title } })
            })
            .chain(std::iter::once(json!({ "retrievedContext": {} })))
            .collect();
        let body = json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": insight_json }] },
                "groundingMetadata": { "groundingChunks": chunks }
            }]
        })
        .to_string();

        let insight = parse_insight_response(&body).unwrap();
        assert_eq!(insight.summary, "S");
        assert_eq!(insight.recent_events, vec!["a", "b"]);
        assert_eq!(insight.key_risks[0].severity, 30);
        assert_eq!(insight.sources.len(), 5);
        assert_eq!(insight.sources[0].title, "Verified Intel Source");
        assert_eq!(insight.sources[1].title, "Wire");
    }

    #[test]
    fn test_parse_empty_and_malformed() {
        let empty = parse_insight_response(r#"{ "candidates": [] }"#).unwrap();
        assert_eq!(empty, SovereignInsight::default());

        let garbage = json!({ "candidates": [{ "content": { "parts": [{ "text": "not json" }] } }] }).to_string();
        assert!(matches!(
            parse_insight_response(&garbage),
            Err(MapError::Serialization(_))
        ));
    }

    #[test]
    fn test_chat_request_maps_roles() {
        let history = vec![
            ChatMessage::assistant("Hello."),
            ChatMessage::user("Outlook for Chile?"),
            ChatMessage::assistant("Stable."),
        ];
        let request = chat_request(&history, "And Peru?");
        let contents = request["contents"].as_array().unwrap();
        let roles: Vec<&str> = contents.iter().map(|c| c["role"].as_str().unwrap()).collect();
        assert_eq!(roles, vec!["user", "model", "user"]);
        assert_eq!(contents[0]["parts"][0]["text"], "Outlook for Chile?");
        assert_eq!(contents[2]["parts"][0]["text"], "And Peru?");
        assert!(request["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("Lead Analyst"));
    }

    #[test]
    fn test_chat_request_opens_with_user_turn() {
        let request = chat_request(&[ChatMessage::assistant("Hello.")], "Outlook for Chile?");
        let contents = request["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[0]["parts"][0]["text"], "Outlook for Chile?");
    }

    #[test]
    fn test_insight_request_shape() {
        let request = insight_request("Chile");
        assert!(request["contents"][0]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("Chile"));
        assert_eq!(request["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(
            request["generationConfig"]["responseSchema"]["required"]
                .as_array()
                .unwrap()
                .len(),
            5
        );
    }

    #[test]
    fn test_endpoint() {
        let config = InsightConfig::new("k").with_model("m");
        assert_eq!(
            config.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/m:generateContent"
        );
    }
}
