//! Mock backend for testing
//!
//! Returns a canned narrative without any network access. Can be configured
//! to fail so callers can exercise their fallback path.

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::types::{Narrative, NarrativeCategory, NarrativeRequest};
use super::NarrativeBackend;

/// Mock narrative backend for testing
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    /// Whether narrate should return an error
    pub failing: bool,
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            failing: false,
        }
    }

    /// Create a mock backend whose calls always fail
    pub fn failing() -> Self {
        Self {
            healthy: false,
            failing: true,
        }
    }
}

#[async_trait]
impl NarrativeBackend for MockBackend {
    async fn narrate(&self, request: &NarrativeRequest<'_>) -> Result<Narrative> {
        if self.failing {
            return Err(Error::InvalidData("mock backend configured to fail".into()));
        }

        let household = request
            .plan
            .map(|p| p.meta.household_size)
            .unwrap_or_default();

        Ok(Narrative {
            summary: format!("Mock narrative for a household of {}.", household),
            priority_steps: vec!["Swap the products you use daily first".to_string()],
            categories: vec![NarrativeCategory {
                name: "Mock".to_string(),
                reason: "Canned response".to_string(),
                recommendations: request.quiz.keys().cloned().collect(),
            }],
        })
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
