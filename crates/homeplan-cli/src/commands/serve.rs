//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use homeplan_core::narrative::{NarrativeBackend, NarrativeClient};
use homeplan_server::ServerConfig;

use super::load_engine;

pub async fn cmd_serve(catalog: Option<&Path>, host: &str, port: u16) -> Result<()> {
    let engine = load_engine(catalog)?;
    let narrator = NarrativeClient::from_env();
    let config = ServerConfig::from_env();

    println!("🚀 Starting homeplan server...");
    println!(
        "   Catalog: {} ({} products)",
        engine.catalog().source(),
        engine.catalog().len()
    );
    println!("   Narrative: {} ({})", narrator.name(), narrator.host());
    println!(
        "   Narrative timeout: {}s (HOMEPLAN_NARRATIVE_TIMEOUT_SECS)",
        config.narrative_timeout.as_secs()
    );
    if config.allowed_origins.is_empty() {
        println!("   CORS: any origin");
    } else {
        println!(
            "   CORS: {} (HOMEPLAN_ALLOWED_ORIGINS)",
            config.allowed_origins.join(", ")
        );
    }
    println!("   Listening: http://{}:{}", host, port);
    println!();

    homeplan_server::serve(engine, narrator, host, port, config)
        .await
        .context("Server exited with an error")
}

