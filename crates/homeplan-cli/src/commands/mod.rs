//! CLI command implementations
//!
//! Commands are organized by area:
//! - `plan` - Compute and print a plan
//! - `catalog` - Browse the product catalog
//! - `serve` - HTTP API server
//! - `ai` - Narrative backend status
//! - `prompts` - Prompt library inspection

pub mod ai;
pub mod catalog;
pub mod plan;
pub mod prompts;
pub mod serve;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use homeplan_core::catalog::Catalog;
use homeplan_core::pricing::PricingEngine;
use tracing::debug;

// Re-export command functions for main.rs
pub use ai::*;
pub use catalog::*;
pub use plan::*;
pub use prompts::*;
pub use serve::*;

/// Load the catalog and wrap it in a pricing engine
pub fn load_engine(catalog_path: Option<&Path>) -> Result<PricingEngine> {
    let catalog = Catalog::load(catalog_path).context("Failed to load product catalog")?;
    debug!(
        products = catalog.len(),
        source = %catalog.source(),
        "Catalog loaded"
    );
    Ok(PricingEngine::new(Arc::new(catalog)))
}
