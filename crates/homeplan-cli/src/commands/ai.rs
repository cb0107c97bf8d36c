//! Narrative backend status command

use anyhow::Result;
use homeplan_core::narrative::{narrative_timeout_from_env, NarrativeBackend, NarrativeClient};

/// Report which narrative backend the environment selects and whether it responds
pub async fn cmd_ai_status() -> Result<()> {
    let client = NarrativeClient::from_env();

    println!("🔍 Narrative backend\n");
    println!("  Backend: {}", client.name());
    println!("  Host:    {}", client.host());
    println!("  Model:   {}", client.model());
    println!("  Timeout: {}s", narrative_timeout_from_env().as_secs());
    println!();

    if let NarrativeClient::Template(_) = client {
        println!("ℹ️  No language model configured; narratives are built from the plan.");
        println!();
        println!("To use a model, set one of:");
        println!("  OPENAI_API_KEY                 (OpenAI, model via OPENAI_COMPATIBLE_MODEL)");
        println!("  OPENAI_COMPATIBLE_HOST         (vLLM, LocalAI, llama-server, ...)");
        println!("  OLLAMA_HOST                    (Ollama, model via OLLAMA_MODEL)");
        return Ok(());
    }

    print!("Checking availability... ");
    if client.health_check().await {
        println!("✅ Connected");
    } else {
        println!("❌ Not responding");
        println!();
        println!("Plans still work; narratives will be empty until the backend responds.");
    }

    Ok(())
}
