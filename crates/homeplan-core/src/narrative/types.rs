//! Narrative request and response types
//!
//! These types are backend-agnostic and used across all narrative implementations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::pricing::PlanResult;

/// Input to a narrative backend
#[derive(Debug, Clone, Copy)]
pub struct NarrativeRequest<'a> {
    /// Raw quiz parameters as submitted
    pub quiz: &'a BTreeMap<String, String>,
    /// The computed cost plan, when available
    pub plan: Option<&'a PlanResult>,
}

/// Onboarding narrative for a household
///
/// `Default` is the empty structure returned whenever a backend fails.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Narrative {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub priority_steps: Vec<String>,
    #[serde(default)]
    pub categories: Vec<NarrativeCategory>,
}

impl Narrative {
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty() && self.priority_steps.is_empty() && self.categories.is_empty()
    }
}

/// A themed group of recommendations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NarrativeCategory {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
}
