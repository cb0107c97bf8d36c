//! Homeplan Core Library
//!
//! Shared functionality for the healthy home transition planner:
//! - Product catalog and pricing configuration (TOML, embedded default)
//! - Quiz answer parsing and household resolution
//! - Variant and store grouping rules
//! - Pricing engine producing the first-year plan
//! - Template summary formatter
//! - Prompt library and pluggable narrative backends (OpenAI-compatible, Ollama)

pub mod catalog;
pub mod error;
pub mod narrative;
pub mod pricing;
pub mod profile;
pub mod prompts;
pub mod store;
pub mod summary;
pub mod variant;

/// Test utilities including a mock LLM server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use catalog::{Catalog, CatalogSource, PricingConfig, Product, ProductCategory};
pub use error::{Error, Result};
pub use narrative::{
    narrative_timeout_from_env, MockBackend, Narrative, NarrativeBackend, NarrativeCategory,
    NarrativeClient, NarrativeRequest, OllamaBackend, OpenAICompatibleBackend, TemplateBackend,
};
pub use pricing::{PlanResult, PricingEngine};
pub use profile::{ExclusionSet, HouseholdProfile, QuizAnswers};
pub use prompts::{Prompt, PromptId, PromptLibrary};
pub use store::store_key;
