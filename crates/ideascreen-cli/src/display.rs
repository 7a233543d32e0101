//! Terminal output: vertical cards for single extractions, Arrow tables for lists.

use arrow::util::pretty::pretty_format_batches;
use ideascreen_core::schema::{proposal_batch, ranking_batch};
use ideascreen_core::{ExtractedProposal, ProposalRecord, ScoredIdea};

/// Format one extraction as a vertical card; unknown fields show as `-`.
pub fn format_extraction_card(title: &str, extracted: &ExtractedProposal) -> String {
    let mut out = format!("=== {title} ===\n");
    for (key, value) in extracted.entries() {
        out.push_str(&format!("  {:<26} {}\n", key, value.unwrap_or("-")));
    }
    let missing = extracted.missing_required();
    if !missing.is_empty() {
        out.push_str(&format!("\n  incomplete: missing {}\n", missing.join(", ")));
    }
    out
}

pub fn print_extraction_card(title: &str, extracted: &ExtractedProposal) {
    print!("{}", format_extraction_card(title, extracted));
}

/// Print ranked ideas as a table with 1-based rank positions.
pub fn print_ranking(ranked: &[ScoredIdea]) -> anyhow::Result<()> {
    if ranked.is_empty() {
        println!("No proposals available to rank.");
        return Ok(());
    }
    let batch = ranking_batch(ranked)?;
    println!("{}", pretty_format_batches(&[batch])?);
    Ok(())
}

/// Print stored proposals after coercion.
pub fn print_proposals(records: &[ProposalRecord]) -> anyhow::Result<()> {
    let batch = proposal_batch(records)?;
    println!("{}", pretty_format_batches(&[batch])?);
    Ok(())
}
