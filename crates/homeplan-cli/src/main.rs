//! Homeplan CLI - Healthy home transition planner
//!
//! Usage:
//!   homeplan plan -p females_13_plus=1 -p kids_0_12=2   Print a first-year plan
//!   homeplan catalog                                      List catalog products
//!   homeplan serve --port 10000                           Start the HTTP API
//!   homeplan ai                                           Check the narrative backend

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let catalog = cli.catalog.as_deref();

    match cli.command {
        Commands::Plan {
            params,
            json,
            narrative,
        } => commands::cmd_plan(catalog, &params, json, narrative).await,
        Commands::Catalog { name } => commands::cmd_catalog(catalog, name.as_deref()),
        Commands::Serve { port, host } => commands::cmd_serve(catalog, &host, port).await,
        Commands::Ai => commands::cmd_ai_status().await,
        Commands::Prompts { action } => match action {
            None | Some(PromptsAction::List) => commands::cmd_prompts_list(),
            Some(PromptsAction::Show { id }) => commands::cmd_prompts_show(&id),
        },
    }
}
