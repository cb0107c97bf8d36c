//! Prompt library commands

use anyhow::{bail, Result};
use homeplan_core::prompts::{default_prompts_dir, PromptId, PromptLibrary};

/// List all prompts and their override status
pub fn cmd_prompts_list() -> Result<()> {
    let mut library = PromptLibrary::new();

    println!("{:<24} {:>7}  {}", "ID", "VERSION", "SOURCE");
    println!("{}", "-".repeat(48));

    for id in PromptId::all() {
        let prompt = library.get(*id)?;
        let source = if prompt.is_override {
            "override"
        } else {
            "built-in"
        };
        println!(
            "{:<24} {:>7}  {}",
            id.as_str(),
            prompt.metadata.version,
            source
        );
    }

    println!();
    println!(
        "Override directory: {}",
        default_prompts_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not available)".to_string())
    );

    Ok(())
}

/// Show the resolved content of one prompt
pub fn cmd_prompts_show(prompt_id: &str) -> Result<()> {
    let mut library = PromptLibrary::new();
    let id = parse_prompt_id(prompt_id)?;
    let prompt = library.get(id)?;

    println!("Prompt:  {}", prompt.metadata.id);
    println!("Version: {}", prompt.metadata.version);
    println!(
        "Source:  {}",
        if prompt.is_override {
            "override"
        } else {
            "built-in"
        }
    );
    println!();
    println!("{}", prompt.content);

    Ok(())
}

pub fn parse_prompt_id(raw: &str) -> Result<PromptId> {
    match PromptId::all().iter().find(|id| id.as_str() == raw.trim()) {
        Some(id) => Ok(*id),
        None => {
            let known: Vec<&str> = PromptId::all().iter().map(|id| id.as_str()).collect();
            bail!("Unknown prompt ID: {} (available: {})", raw, known.join(", "))
        }
    }
}
