use crate::core::constants::INSIGHT_CACHE_SIZE;
use crate::insight::types::{ChatMessage, SovereignInsight};
use crate::insight::InsightProvider;
use lru::LruCache;
use std::num::NonZeroUsize;

pub const ANALYST_GREETING: &str =
    "Hello. I am your Sovereign Analyst. Ask me anything about geopolitical trends, economic data, or sovereign risks.";
pub const EMPTY_REPLY: &str = "I'm sorry, I couldn't process that request.";
pub const CONNECTION_LOST: &str = "Connection to intelligence servers lost. Please try again.";
pub const INSIGHT_UNAVAILABLE: &str = "Intelligence feed unavailable. Select the region again to retry.";

/// Result of an insight request as shown to the user
#[derive(Debug, Clone, PartialEq)]
pub enum InsightOutcome {
    Ready(SovereignInsight),
    Unavailable(&'static str),
}

impl InsightOutcome {
    pub fn insight(&self) -> Option<&SovereignInsight> {
        match self {
            InsightOutcome::Ready(insight) => Some(insight),
            InsightOutcome::Unavailable(_) => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, InsightOutcome::Ready(_))
    }
}

/// User-facing front for an [`InsightProvider`].
///
/// Successful insights are cached per region name. Provider failures never
/// escape: they become static fallback text, and nothing is retried until
/// the caller asks again.
pub struct InsightDesk<P> {
    provider: P,
    cache: LruCache<String, SovereignInsight>,
    transcript: Vec<ChatMessage>,
}

impl<P: InsightProvider> InsightDesk<P> {
    pub fn new(provider: P) -> Self {
        Self::with_capacity(provider, INSIGHT_CACHE_SIZE)
    }

    pub fn with_capacity(provider: P, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            provider,
            cache: LruCache::new(capacity),
            transcript: vec![ChatMessage::assistant(ANALYST_GREETING)],
        }
    }

    pub async fn insight(&mut self, region_name: &str) -> InsightOutcome {
        if let Some(insight) = self.cache.get(region_name) {
            return InsightOutcome::Ready(insight.clone());
        }
        match self.provider.insight(region_name).await {
            Ok(insight) => {
                self.cache.put(region_name.to_string(), insight.clone());
                InsightOutcome::Ready(insight)
            }
            Err(e) => {
                log::warn!("insight for {} failed: {}", region_name, e);
                InsightOutcome::Unavailable(INSIGHT_UNAVAILABLE)
            }
        }
    }

    /// Sends a message to the analyst and returns the reply appended to the
    /// transcript
    pub async fn ask(&mut self, message: &str) -> &ChatMessage {
        let reply = {
            let history = &self.transcript;
            self.provider.chat(history, message).await
        };
        self.transcript.push(ChatMessage::user(message));

        let content = match reply {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => EMPTY_REPLY.to_string(),
            Err(e) => {
                log::warn!("analyst chat failed: {}", e);
                CONNECTION_LOST.to_string()
            }
        };
        self.transcript.push(ChatMessage::assistant(content));
        &self.transcript[self.transcript.len() - 1]
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Starts a fresh conversation with only the greeting
    pub fn reset_chat(&mut self) {
        self.transcript = vec![ChatMessage::assistant(ANALYST_GREETING)];
    }

    pub fn is_cached(&self, region_name: &str) -> bool {
        self.cache.contains(region_name)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}
