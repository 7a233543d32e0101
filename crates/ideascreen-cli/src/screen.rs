//! Screening pipeline: read proposals → score → rank → publish.

use std::num::NonZeroUsize;
use std::time::Instant;

use anyhow::Context;
use chrono::{DateTime, Utc};
use ideascreen_core::{ScoredIdea, rank, score_with_report};
use ideascreen_store::{RecordStore, load_proposals, publish_ranking};
use tracing::info;

pub struct ScreenOptions<'a> {
    pub proposals: &'a str,
    pub ranks: &'a str,
    pub top_n: NonZeroUsize,
    pub publish: bool,
}

#[derive(Debug, Default)]
pub struct ScreenStats {
    pub read: usize,
    pub skipped: usize,
    pub ranked: usize,
    pub published: usize,
    pub elapsed_secs: f64,
}

pub struct ScreenOutcome {
    pub ranked: Vec<ScoredIdea>,
    pub stats: ScreenStats,
}

/// Run one full screening pass against `store`.
///
/// An empty source collection is not an error: the outcome is an empty
/// ranking and nothing is written.
pub fn run_screen(
    store: &dyn RecordStore,
    opts: &ScreenOptions<'_>,
    ranked_at: DateTime<Utc>,
) -> anyhow::Result<ScreenOutcome> {
    let start = Instant::now();

    // 1. Read and coerce.
    let records = load_proposals(store, opts.proposals)
        .with_context(|| format!("reading collection {}", opts.proposals))?;
    if records.is_empty() {
        info!(collection = opts.proposals, "no proposals to screen");
    }

    // 2. Score, skipping incomplete records.
    let report = score_with_report(&records);

    // 3. Rank.
    let ranked = rank(report.scored, opts.top_n);

    // 4. Publish.
    let published = if opts.publish {
        publish_ranking(store, opts.ranks, &ranked, ranked_at)
            .with_context(|| format!("writing collection {}", opts.ranks))?
    } else {
        0
    };

    let stats = ScreenStats {
        read: records.len(),
        skipped: report.skipped,
        ranked: ranked.len(),
        published,
        elapsed_secs: start.elapsed().as_secs_f64(),
    };
    info!(
        read = stats.read,
        skipped = stats.skipped,
        ranked = stats.ranked,
        published = stats.published,
        "screening complete"
    );
    Ok(ScreenOutcome { ranked, stats })
}
