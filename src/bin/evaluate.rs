//! Evaluate binary - scores candidate translations offline, without starting the server
//!
//! Usage:
//!   cargo run --bin evaluate -- candidates.txt   # One candidate per line
//!   cat candidates.txt | cargo run --bin evaluate
//!
//! Candidates are matched line by line against the built-in reference corpus,
//! so the input must contain exactly one line per reference.

use anyhow::{Context, Result};
use lokalise_translation_assistant::evaluation::{self, EvaluationResponse, REFERENCE_TRANSLATIONS};
use std::io::Read;
use tracing::info;

fn read_input() -> Result<String> {
    match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read candidates from {}", path)),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read candidates from stdin")?;
            Ok(input)
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("evaluate=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let input = read_input()?;
    let candidates: Vec<&str> = input.lines().filter(|l| !l.trim().is_empty()).collect();
    info!(
        "Scoring {} candidates against {} references",
        candidates.len(),
        REFERENCE_TRANSLATIONS.len()
    );

    let report = evaluation::evaluate(&candidates, &REFERENCE_TRANSLATIONS)?;

    info!(
        "Precisions: {:?}, brevity penalty {:.4}, {} edits over {} reference words",
        report.bleu.precisions, report.bleu.brevity_penalty, report.ter.num_edits, report.ter.ref_length
    );

    let response = EvaluationResponse::from(&report);
    println!(
        "{}",
        serde_json::to_string_pretty(&response).context("Failed to serialize results")?
    );

    Ok(())
}
