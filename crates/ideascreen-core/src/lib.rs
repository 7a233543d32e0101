//! Proposal screening core: field extraction, composite scoring, and ranking.

pub mod extract;
pub mod rank;
pub mod record;
pub mod schema;
pub mod score;

pub use extract::{Extractor, Field, PageMatchPolicy, extract, split_pages};
pub use rank::{DEFAULT_TOP_N, rank};
pub use record::{Document, ExtractedProposal, ProposalRecord, keys};
pub use score::{ScoreReport, ScoredIdea, WEIGHTS, Weights, score, score_with_report};
