//! Text-generation collaborator: region briefings and the analyst chat

pub mod client;
pub mod desk;
pub mod types;

pub use client::{GeminiClient, InsightConfig};
pub use desk::{InsightDesk, InsightOutcome};
pub use types::{ChatMessage, ChatRole, GroundingSource, RiskFactor, SovereignInsight};

use crate::Result;
use async_trait::async_trait;

/// The contract of an external text-generation service
#[async_trait]
pub trait InsightProvider: Send + Sync {
    /// Structured briefing for a region
    async fn insight(&self, region_name: &str) -> Result<SovereignInsight>;

    /// Free-text reply to `message`, given the conversation so far
    async fn chat(&self, history: &[ChatMessage], message: &str) -> Result<String>;
}
