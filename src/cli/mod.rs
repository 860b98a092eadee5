//! Command line interface
//!
//! - `serve`: run the HTTP API
//! - `ask`: answer one question and print it

pub mod ask;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::observability::init_tracing;

/// Retrieval-augmented question answering with a semantic answer cache
#[derive(Parser)]
#[command(name = "rag-answer-pipeline")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Answer a single question
    Ask(ask::AskArgs),
}

/// Load `.env` and configuration, then install the tracing subscriber
pub(crate) fn load_config() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_tracing(&config.logging, &config.observability.tracing);

    Ok(config)
}
