//! Deterministic ordering and top-N selection of scored ideas.
//!
//! Order is score descending. Equal scores are ordered by name ascending, and
//! anything still tied keeps its input order (the sort is stable). The store
//! returns records in no particular order, so ranking by read order alone
//! would not be reproducible.

use std::cmp::Ordering;
use std::num::NonZeroUsize;

use crate::score::ScoredIdea;

/// Number of ideas kept when no explicit `top_n` is given.
pub const DEFAULT_TOP_N: NonZeroUsize = NonZeroUsize::new(3).unwrap();

/// Ranking order: score descending, then name ascending.
pub fn compare(a: &ScoredIdea, b: &ScoredIdea) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.name.cmp(&b.name))
}

/// Sort and keep the best `min(top_n, len)` ideas.
pub fn rank(mut scored: Vec<ScoredIdea>, top_n: NonZeroUsize) -> Vec<ScoredIdea> {
    scored.sort_by(compare);
    scored.truncate(top_n.get());
    scored
}
