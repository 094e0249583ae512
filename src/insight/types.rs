use crate::core::constants::MAX_GROUNDING_SOURCES;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// A named risk with severity on a 0 to 100 scale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub name: String,
    pub severity: u8,
}

/// A web citation backing an insight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    pub title: String,
    pub uri: String,
}

/// Structured briefing for one region
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SovereignInsight {
    pub summary: String,
    pub political_status: String,
    pub economic_outlook: String,
    pub recent_events: Vec<String>,
    #[serde(deserialize_with = "de::risks")]
    pub key_risks: Vec<RiskFactor>,
    pub sources: Vec<GroundingSource>,
}

impl SovereignInsight {
    /// Caps the citation list
    pub fn with_sources(mut self, sources: Vec<GroundingSource>) -> Self {
        self.sources = sources;
        self.sources.truncate(MAX_GROUNDING_SOURCES);
        self
    }

    /// Mean risk severity, rounded; `None` without risks
    pub fn risk_index(&self) -> Option<u8> {
        if self.key_risks.is_empty() {
            return None;
        }
        let total: u32 = self.key_risks.iter().map(|r| u32::from(r.severity)).sum();
        Some((f64::from(total) / self.key_risks.len() as f64).round() as u8)
    }
}

mod de {
    use super::RiskFactor;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    struct RawRisk {
        name: String,
        severity: f64,
    }

    /// Severity arrives as any JSON number; it is clamped into 0..=100
    pub fn risks<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<RiskFactor>, D::Error> {
        let raw = Vec::<RawRisk>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .map(|r| RiskFactor {
                name: r.name,
                severity: if r.severity.is_nan() {
                    0
                } else {
                    r.severity.round().clamp(0.0, 100.0) as u8
                },
            })
            .collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        Self {
            role,
            content: content.into(),
            timestamp,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }
}
