pub mod rank;
pub mod repl;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Write as _;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use vecsearch::config::VecsearchConfig;
use vecsearch::embedding::{self, VectorProvider};
use vecsearch::matching::{MatchReport, TextSlot};

/// Build the configured vector provider, shared for use by a match engine.
pub fn shared_provider(config: &VecsearchConfig) -> Result<Arc<dyn VectorProvider>> {
    let provider = embedding::create_provider(&config.embedding)
        .context("failed to create embedding provider")?;
    Ok(Arc::from(provider))
}

/// Run `task` behind a "Calculating..." spinner on stderr.
pub async fn with_spinner<F: Future>(task: F) -> F::Output {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message("Calculating...");
    pb.enable_steady_tick(Duration::from_millis(100));

    let output = task.await;
    pb.finish_and_clear();
    output
}

/// Render a report as `text: NN.NN%` lines, followed by excluded candidates.
///
/// `candidates` supplies the text of excluded slots.
pub fn render_report(report: &MatchReport, candidates: &[TextSlot]) -> String {
    let mut out = String::new();

    if report.ranked.is_empty() {
        out.push_str("No candidates could be scored.\n");
    } else {
        out.push_str("Similarity scores:\n");
        for item in &report.ranked {
            let _ = writeln!(out, "  {}: {:.2}%", item.content, item.percentage);
        }
    }

    if !report.excluded.is_empty() {
        out.push_str("Excluded:\n");
        for (id, reason) in &report.excluded {
            let label = candidates
                .iter()
                .find(|slot| slot.id == *id)
                .map(|slot| slot.content.as_str())
                .unwrap_or("(removed)");
            let _ = writeln!(out, "  {label} [{id}]: {reason}");
        }
    }

    out
}

/// Print the effective configuration as TOML.
pub fn show_config(config: &VecsearchConfig) -> Result<()> {
    let rendered =
        toml::to_string_pretty(&config.redacted()).context("failed to render config")?;
    println!("{rendered}");
    Ok(())
}
