//! Weighted composite scoring of proposal records.

use serde::Serialize;
use tracing::{debug, warn};

use crate::record::ProposalRecord;

/// Per-criterion weights for the composite score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub budget: f64,
    pub npv: f64,
    pub irr: f64,
}

/// Fixed engine weights.
pub const WEIGHTS: Weights = Weights {
    budget: 0.3,
    npv: 0.4,
    irr: 0.3,
};

impl Weights {
    pub fn sum(&self) -> f64 {
        self.budget + self.npv + self.irr
    }

    /// `budget*w_budget + npv*w_npv + irr*w_irr`, evaluated left to right.
    pub fn composite(&self, budget: f64, npv: f64, irr: f64) -> f64 {
        budget * self.budget + npv * self.npv + irr * self.irr
    }
}

/// A record that passed the scoring precondition, with its composite score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredIdea {
    pub score: f64,
    pub budget: f64,
    pub npv: f64,
    pub irr: f64,
    pub name: String,
}

/// Outcome of scoring a batch.
#[derive(Debug, Clone, Default)]
pub struct ScoreReport {
    pub scored: Vec<ScoredIdea>,
    pub skipped: usize,
}

/// Score one record, or `None` if any of `name`, `npv`, `irr`, `budget` is unknown.
pub fn score_record(record: &ProposalRecord) -> Option<ScoredIdea> {
    let (Some(name), Some(budget), Some(npv), Some(irr)) =
        (record.name.as_ref(), record.budget, record.npv, record.irr)
    else {
        return None;
    };
    Some(ScoredIdea {
        score: WEIGHTS.composite(budget, npv, irr),
        budget,
        npv,
        irr,
        name: name.clone(),
    })
}

/// Score a batch, skipping records that fail the precondition.
///
/// Output order follows input order; callers sort via [`crate::rank::rank`].
pub fn score_with_report(records: &[ProposalRecord]) -> ScoreReport {
    let mut report = ScoreReport::default();
    for (idx, record) in records.iter().enumerate() {
        match score_record(record) {
            Some(idea) => {
                debug!(name = %idea.name, score = idea.score, "scored proposal");
                report.scored.push(idea);
            }
            None => {
                warn!(
                    index = idx,
                    name = record.name.as_deref().unwrap_or("<unknown>"),
                    missing = ?record.missing_required(),
                    "skipping proposal with missing scoring fields"
                );
                report.skipped += 1;
            }
        }
    }
    report
}

pub fn score(records: &[ProposalRecord]) -> Vec<ScoredIdea> {
    score_with_report(records).scored
}
