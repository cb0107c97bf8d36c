//! CLI argument definitions using clap
//!
//! This module contains the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Homeplan - Price a year of healthier household products
#[derive(Parser)]
#[command(name = "homeplan")]
#[command(about = "Healthy home transition planner", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Catalog TOML file
    ///
    /// Falls back to HOMEPLAN_CATALOG, then the data-dir override, then the
    /// built-in catalog.
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute a first-year plan from quiz answers
    Plan {
        /// Quiz answer as key=value (repeatable), e.g. -p females_13_plus=1 -p "wontUse=Toilet Paper"
        #[arg(short = 'p', long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,

        /// Print the full plan as JSON
        #[arg(long)]
        json: bool,

        /// Also generate a narrative with the configured backend
        #[arg(long)]
        narrative: bool,
    },

    /// List catalog products, or show one by name
    Catalog {
        /// Product name (case-insensitive)
        name: Option<String>,
    },

    /// Start the HTTP API server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value = "10000")]
        port: u16,

        /// Host to bind to
        #[arg(long, env = "HOMEPLAN_HOST", default_value = "0.0.0.0")]
        host: String,
    },

    /// Show the narrative backend configuration and check that it responds
    Ai,

    /// Manage narrative prompts
    Prompts {
        #[command(subcommand)]
        action: Option<PromptsAction>,
    },
}

#[derive(Subcommand)]
pub enum PromptsAction {
    /// List prompts and their override status
    List,
    /// Show the resolved content of a prompt
    Show {
        /// Prompt ID (e.g. plan_narrative)
        id: String,
    },
}

/// Parse a `key=value` pair; the value may itself contain `=`
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid key=value: no `=` found in `{}`", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("invalid key=value: empty key in `{}`", s));
    }
    Ok((key.to_string(), value.to_string()))
}
