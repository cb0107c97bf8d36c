//! Ollama backend implementation
//!
//! Talks to the Ollama `/api/generate` endpoint in JSON mode. The system
//! section of the narrative prompt is sent as Ollama's `system` field.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::prompts::PromptLibrary;

use super::parsing::parse_narrative;
use super::types::{Narrative, NarrativeRequest};
use super::{non_empty, render_narrative_prompt, NarrativeBackend};

/// Default model when `OLLAMA_MODEL` is unset
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2";

#[derive(Clone)]
pub struct OllamaBackend {
    http_client: Client,
    base_url: String,
    model: String,
    prompts: Arc<RwLock<PromptLibrary>>,
}

impl OllamaBackend {
    /// Create a new Ollama backend
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            prompts: Arc::new(RwLock::new(PromptLibrary::new())),
        }
    }

    /// Use a specific prompt library
    pub fn with_prompts(mut self, prompts: PromptLibrary) -> Self {
        self.prompts = Arc::new(RwLock::new(prompts));
        self
    }

    /// Create from environment variables
    pub fn from_env() -> Option<Self> {
        Self::from_settings(std::env::var("OLLAMA_HOST").ok(), std::env::var("OLLAMA_MODEL").ok())
    }

    /// Blank values count as unset; a missing host means no backend
    fn from_settings(host: Option<String>, model: Option<String>) -> Option<Self> {
        let host = non_empty(host)?;
        let model = non_empty(model).unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string());
        Some(Self::new(&host, &model))
    }

    async fn generate(&self, system: Option<&str>, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            system: system.map(str::to_string),
            format: "json".to_string(),
            stream: false,
        };

        let response = self
            .http_client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::InvalidData(format!(
                "Ollama API error {}: {}",
                status, body
            )));
        }

        let generated: GenerateResponse = response.json().await?;
        Ok(generated.response)
    }
}

/// Request to Ollama API
#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    format: String,
    stream: bool,
}

/// Response from Ollama API
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[async_trait]
impl NarrativeBackend for OllamaBackend {
    async fn narrate(&self, request: &NarrativeRequest<'_>) -> Result<Narrative> {
        let (system, user) = render_narrative_prompt(&self.prompts, request)?;

        let response = self.generate(system.as_deref(), &user).await?;
        debug!("Ollama response: {}", response);

        parse_narrative(&response)
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::catalog::Catalog;
    use crate::pricing::PricingEngine;
    use crate::profile::QuizAnswers;
    use crate::test_utils::{MockLlmServer, MockMode};

    fn backend(url: &str) -> OllamaBackend {
        OllamaBackend::new(url, "llama3.2").with_prompts(PromptLibrary::embedded_only())
    }

    #[test]
    fn test_settings_blank_model_uses_default() {
        let backend = OllamaBackend::from_settings(
            Some("http://localhost:11434/".to_string()),
            Some("  ".to_string()),
        )
        .unwrap();
        assert_eq!(backend.model(), DEFAULT_OLLAMA_MODEL);
        assert_eq!(backend.host(), "http://localhost:11434");

        let backend =
            OllamaBackend::from_settings(Some("http://gpu:11434".to_string()), None).unwrap();
        assert_eq!(backend.model(), DEFAULT_OLLAMA_MODEL);

        let backend = OllamaBackend::from_settings(
            Some("http://gpu:11434".to_string()),
            Some("gemma3".to_string()),
        )
        .unwrap();
        assert_eq!(backend.model(), "gemma3");
    }

    #[test]
    fn test_settings_blank_host_means_no_backend() {
        assert!(OllamaBackend::from_settings(None, Some("gemma3".to_string())).is_none());
        assert!(OllamaBackend::from_settings(Some(String::new()), None).is_none());
    }

    #[tokio::test]
    async fn test_narrate_sends_json_mode_and_plan() {
        let server = MockLlmServer::start(MockMode::Valid).await;

        let engine = PricingEngine::new(Arc::new(Catalog::embedded().unwrap()));
        let answers = QuizAnswers::from_pairs([("kids_0_12", "2")]);
        let plan = engine.plan(&answers);
        let mut quiz = BTreeMap::new();
        quiz.insert("kids_0_12".to_string(), "2".to_string());

        let narrative = backend(&server.url())
            .narrate(&NarrativeRequest {
                quiz: &quiz,
                plan: Some(&plan),
            })
            .await
            .unwrap();
        assert_eq!(narrative.summary, "Mock healthy home plan.");

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        let body = &requests[0];
        assert_eq!(body["format"], "json");
        assert_eq!(body["stream"], false);
        assert_eq!(body["system"], "You output JSON only.");
        assert!(body["prompt"]
            .as_str()
            .unwrap()
            .contains(&plan.summary));
    }

    #[tokio::test]
    async fn test_narrate_server_error() {
        let server = MockLlmServer::start(MockMode::ServerError).await;
        let quiz = BTreeMap::new();

        let result = backend(&server.url())
            .narrate(&NarrativeRequest {
                quiz: &quiz,
                plan: None,
            })
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = MockLlmServer::start(MockMode::Valid).await;
        assert!(backend(&server.url()).health_check().await);
        assert!(!backend("http://127.0.0.1:1").health_check().await);
    }
}
