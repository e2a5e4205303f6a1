mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use vecsearch::config::VecsearchConfig;

#[derive(Parser)]
#[command(
    name = "vecsearch",
    version,
    about = "Rank candidate texts by semantic similarity to a query"
)]
struct Cli {
    /// Config file (default: ~/.vecsearch/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Match a query against candidate texts once
    Match {
        /// Query text (default: from config)
        #[arg(short, long)]
        query: Option<String>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
        /// Candidate texts (default: from config)
        candidates: Vec<String>,
    },
    /// Edit a query and candidates interactively and re-match using cached embeddings
    Repl,
    /// Print the effective configuration with the API key redacted
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => VecsearchConfig::load_from(path)?,
        None => VecsearchConfig::load()?,
    };

    // Log to stderr so stdout carries only results.
    let filter =
        EnvFilter::try_new(&config.log.level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Match {
            query,
            json,
            candidates,
        } => {
            cli::rank::rank(&config, query, candidates, json).await?;
        }
        Command::Repl => {
            cli::repl::repl(&config).await?;
        }
        Command::Config => {
            cli::show_config(&config)?;
        }
    }

    Ok(())
}
