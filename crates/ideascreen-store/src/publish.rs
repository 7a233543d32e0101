//! Publisher: persists a ranked result into the rank collection.
//!
//! Position `i` (1-based) is always stored under key `idea_{i}`, so a rerun
//! overwrites the previous run's entries position by position. Writes go out
//! in rank order and are not transactional: if position `k` fails, positions
//! `1..k` stay written and the error names `k`. Entries above the new result
//! length are left as they were.

use chrono::{DateTime, SecondsFormat, Utc};
use ideascreen_core::record::number_value;
use ideascreen_core::{Document, ScoredIdea};
use serde_json::Value;
use tracing::info;

use crate::{PublishError, RecordStore};

/// Collection receiving one document per rank position.
pub const RANK_COLLECTION: &str = "rank";

/// Store key for a 1-based rank position.
pub fn rank_key(position: usize) -> String {
    format!("idea_{position}")
}

/// Document persisted for one rank position.
pub fn rank_document(position: usize, idea: &ScoredIdea, ranked_at: DateTime<Utc>) -> Document {
    let mut doc = Document::new();
    doc.insert("rank".into(), Value::from(position));
    doc.insert("score".into(), number_value(idea.score));
    doc.insert("budget".into(), number_value(idea.budget));
    doc.insert("npv".into(), number_value(idea.npv));
    doc.insert("irr".into(), number_value(idea.irr));
    doc.insert("name".into(), Value::String(idea.name.clone()));
    doc.insert(
        "ranked_at".into(),
        Value::String(ranked_at.to_rfc3339_opts(SecondsFormat::Secs, true)),
    );
    doc
}

/// Write `ranked` to `collection`, position 1 first. Returns the number written.
pub fn publish_ranking(
    store: &dyn RecordStore,
    collection: &str,
    ranked: &[ScoredIdea],
    ranked_at: DateTime<Utc>,
) -> Result<usize, PublishError> {
    for (idx, idea) in ranked.iter().enumerate() {
        let position = idx + 1;
        let doc = rank_document(position, idea, ranked_at);
        store
            .write(collection, &rank_key(position), &doc)
            .map_err(|source| PublishError { position, source })?;
    }
    info!(collection, count = ranked.len(), "published ranking");
    Ok(ranked.len())
}
