//! Pluggable narrative backend abstraction
//!
//! The pricing engine never depends on this module. The server and CLI ask a
//! narrative backend for an onboarding write-up after the plan is computed,
//! and fall back to an empty narrative when the backend misbehaves.
//!
//! # Architecture
//!
//! - `NarrativeBackend` trait: interface shared by every backend
//! - `NarrativeClient` enum: Clone + compile-time dispatch over the backends
//! - Backends: `TemplateBackend` (offline), `OpenAICompatibleBackend`,
//!   `OllamaBackend`, `MockBackend`
//!
//! # Configuration
//!
//! Environment variables:
//! - `AI_BACKEND`: `openai_compatible` (alias `openai`), `ollama`, `template`
//!   or `mock`. When unset, an OpenAI-compatible host or key wins, then
//!   `OLLAMA_HOST`, then the offline template.
//! - `HOMEPLAN_NARRATIVE_TIMEOUT_SECS`: upper bound for one narrative call
//!   (default: 20)
//!
//! See `openai_compatible` and `ollama` for their own variables.

mod mock;
mod ollama;
mod openai_compatible;
pub mod parsing;
mod template;
pub mod types;

pub use mock::MockBackend;
pub use ollama::{OllamaBackend, DEFAULT_OLLAMA_MODEL};
pub use openai_compatible::{OpenAICompatibleBackend, DEFAULT_OPENAI_MODEL};
pub use template::TemplateBackend;
pub use types::*;

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::prompts::{PromptId, PromptLibrary};

/// Default bound on a single narrative call
pub const DEFAULT_NARRATIVE_TIMEOUT: Duration = Duration::from_secs(20);

/// Trait implemented by every narrative backend
///
/// Backends must be Send + Sync so a single client can be shared by all
/// request handlers.
#[async_trait]
pub trait NarrativeBackend: Send + Sync {
    /// Produce an onboarding narrative for a quiz and its plan
    async fn narrate(&self, request: &NarrativeRequest<'_>) -> Result<Narrative>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Model name (for logging)
    fn model(&self) -> &str;

    /// Host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete narrative client
#[derive(Clone)]
pub enum NarrativeClient {
    /// Offline narrative built from the plan itself
    Template(TemplateBackend),
    /// OpenAI chat completions API or any server speaking it
    OpenAICompatible(OpenAICompatibleBackend),
    /// Ollama HTTP API
    Ollama(OllamaBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl NarrativeClient {
    /// Create a narrative client from environment variables
    ///
    /// Never fails: a requested backend whose settings are missing degrades
    /// to the template backend with a warning.
    pub fn from_env() -> Self {
        let requested = std::env::var("AI_BACKEND").ok();

        match requested.as_deref().map(str::to_lowercase).as_deref() {
            Some("openai_compatible") | Some("openai") => OpenAICompatibleBackend::from_env()
                .map(NarrativeClient::OpenAICompatible)
                .unwrap_or_else(|| {
                    warn!(
                        "AI_BACKEND=openai_compatible but no host or API key is set, using template"
                    );
                    Self::template()
                }),
            Some("ollama") => OllamaBackend::from_env()
                .map(NarrativeClient::Ollama)
                .unwrap_or_else(|| {
                    warn!("AI_BACKEND=ollama but OLLAMA_HOST is not set, using template");
                    Self::template()
                }),
            Some("template") => Self::template(),
            Some("mock") => Self::mock(),
            Some(other) => {
                warn!(backend = %other, "Unknown AI_BACKEND, auto-detecting");
                Self::detect()
            }
            None => Self::detect(),
        }
    }

    fn detect() -> Self {
        if let Some(backend) = OpenAICompatibleBackend::from_env() {
            return NarrativeClient::OpenAICompatible(backend);
        }
        if let Some(backend) = OllamaBackend::from_env() {
            return NarrativeClient::Ollama(backend);
        }
        Self::template()
    }

    /// Offline template backend
    pub fn template() -> Self {
        NarrativeClient::Template(TemplateBackend::new())
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        NarrativeClient::Mock(MockBackend::new())
    }

    /// Short backend name for logs and health output
    pub fn name(&self) -> &'static str {
        match self {
            NarrativeClient::Template(_) => "template",
            NarrativeClient::OpenAICompatible(_) => "openai_compatible",
            NarrativeClient::Ollama(_) => "ollama",
            NarrativeClient::Mock(_) => "mock",
        }
    }

    /// Narrate with a time bound, falling back to an empty narrative
    ///
    /// Timeouts, transport errors, non-2xx responses and malformed JSON are
    /// logged and swallowed. The plan itself is never affected.
    pub async fn narrate_with_fallback(
        &self,
        request: &NarrativeRequest<'_>,
        limit: Duration,
    ) -> Narrative {
        let result = match tokio::time::timeout(limit, self.narrate(request)).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(limit.as_secs())),
        };

        match result {
            Ok(narrative) => {
                debug!(backend = self.name(), "Narrative generated");
                narrative
            }
            Err(e) => {
                warn!(
                    backend = self.name(),
                    host = self.host(),
                    error = %e,
                    "Narrative generation failed, returning empty narrative"
                );
                Narrative::default()
            }
        }
    }
}

#[async_trait]
impl NarrativeBackend for NarrativeClient {
    async fn narrate(&self, request: &NarrativeRequest<'_>) -> Result<Narrative> {
        match self {
            NarrativeClient::Template(b) => b.narrate(request).await,
            NarrativeClient::OpenAICompatible(b) => b.narrate(request).await,
            NarrativeClient::Ollama(b) => b.narrate(request).await,
            NarrativeClient::Mock(b) => b.narrate(request).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            NarrativeClient::Template(b) => b.health_check().await,
            NarrativeClient::OpenAICompatible(b) => b.health_check().await,
            NarrativeClient::Ollama(b) => b.health_check().await,
            NarrativeClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            NarrativeClient::Template(b) => b.model(),
            NarrativeClient::OpenAICompatible(b) => b.model(),
            NarrativeClient::Ollama(b) => b.model(),
            NarrativeClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            NarrativeClient::Template(b) => b.host(),
            NarrativeClient::OpenAICompatible(b) => b.host(),
            NarrativeClient::Ollama(b) => b.host(),
            NarrativeClient::Mock(b) => b.host(),
        }
    }
}

/// Read `HOMEPLAN_NARRATIVE_TIMEOUT_SECS`, defaulting to 20 seconds
pub fn narrative_timeout_from_env() -> Duration {
    std::env::var("HOMEPLAN_NARRATIVE_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_NARRATIVE_TIMEOUT)
}

/// Treat unset and blank settings alike
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub(crate) fn non_empty_env(key: &str) -> Option<String> {
    non_empty(std::env::var(key).ok())
}

/// Render the plan narrative prompt into (system, user) text
pub(crate) fn render_narrative_prompt(
    prompts: &RwLock<PromptLibrary>,
    request: &NarrativeRequest<'_>,
) -> Result<(Option<String>, String)> {
    let quiz = serde_json::to_string_pretty(request.quiz)?;
    let plan_summary = request.plan.map(|p| p.summary.as_str()).unwrap_or_default();

    let mut vars = HashMap::new();
    vars.insert("quiz", quiz.as_str());
    vars.insert("plan_summary", plan_summary);

    let mut library = prompts
        .write()
        .map_err(|_| Error::Config("prompt library lock poisoned".into()))?;
    let prompt = library.get(PromptId::PlanNarrative)?;

    Ok((
        prompt.system_section().map(str::to_string),
        prompt.render_user(&vars),
    ))
}
