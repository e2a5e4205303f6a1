//! CLI `match` command: rank candidates against a query once and print the report.

use anyhow::{Context, Result};

use vecsearch::config::VecsearchConfig;
use vecsearch::matching::MatchEngine;

/// Match `query` against `candidates`, falling back to the configured defaults.
pub async fn rank(
    config: &VecsearchConfig,
    query: Option<String>,
    candidates: Vec<String>,
    json: bool,
) -> Result<()> {
    let query = query.unwrap_or_else(|| config.defaults.query.clone());
    let candidates = if candidates.is_empty() {
        config.defaults.candidates.clone()
    } else {
        candidates
    };

    if candidates.is_empty() {
        println!("No candidates to match against.");
        return Ok(());
    }

    let provider = super::shared_provider(config)?;
    let engine = MatchEngine::with_candidates(provider, query, candidates);

    let report = super::with_spinner(engine.match_candidates())
        .await
        .context("could not calculate embeddings")?;

    if json {
        let rendered =
            serde_json::to_string_pretty(&report).context("failed to serialize report")?;
        println!("{rendered}");
    } else {
        print!("{}", super::render_report(&report, &engine.candidates()));
    }

    Ok(())
}
