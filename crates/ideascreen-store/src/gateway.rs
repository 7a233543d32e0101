//! Record store gateway: typed reads and writes of proposal collections.
//!
//! This is the only place raw documents are turned into [`ProposalRecord`]s,
//! so numeric coercion happens once, right after the read.

use ideascreen_core::{Document, ExtractedProposal, ProposalRecord};
use tracing::{info, warn};

use crate::{RecordStore, StoreError};

/// Read every raw document from `collection`.
pub fn load_documents(
    store: &dyn RecordStore,
    collection: &str,
) -> Result<Vec<Document>, StoreError> {
    let docs = store.read_all(collection)?;
    info!(collection, count = docs.len(), "loaded documents");
    Ok(docs)
}

/// Read `collection` and coerce each document into a typed proposal.
pub fn load_proposals(
    store: &dyn RecordStore,
    collection: &str,
) -> Result<Vec<ProposalRecord>, StoreError> {
    let docs = load_documents(store, collection)?;
    Ok(docs.iter().map(ProposalRecord::from_document).collect())
}

/// Upsert an extraction result under `key`. Incomplete extractions are stored too.
pub fn save_extracted(
    store: &dyn RecordStore,
    collection: &str,
    key: &str,
    extracted: &ExtractedProposal,
) -> Result<(), StoreError> {
    let missing = extracted.missing_required();
    if !missing.is_empty() {
        warn!(key, ?missing, "storing incomplete extraction");
    }
    store.write(collection, key, &extracted.to_document())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use serde_json::{Value, json};

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn load_coerces_mixed_documents() {
        let store = MemoryStore::new();
        store
            .write("finance", "a", &doc(json!({"Name": "A", "Budget": 100, "NPV": 50, "IRR": 20})))
            .unwrap();
        store
            .write("finance", "b", &doc(json!({"Name": "B", "Budget": "10", "NPV": "90"})))
            .unwrap();
        let records = load_proposals(&store, "finance").unwrap();
        assert_eq!(records.len(), 2);
        let a = records.iter().find(|r| r.name.as_deref() == Some("A")).unwrap();
        assert_eq!(a.budget, Some(100.0));
        let b = records.iter().find(|r| r.name.as_deref() == Some("B")).unwrap();
        assert_eq!(b.budget, Some(10.0));
        assert!(b.irr.is_none());
    }

    #[test]
    fn saved_extraction_round_trips_through_coercion() {
        let store = MemoryStore::new();
        let extracted = ExtractedProposal {
            name: Some("Bob".into()),
            npv: Some("500".into()),
            irr: Some("12".into()),
            budget: Some("900".into()),
            email: Some("bob@x.com".into()),
            ..Default::default()
        };
        save_extracted(&store, "finance", "bob", &extracted).unwrap();
        let records = load_proposals(&store, "finance").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].npv, Some(500.0));
        assert_eq!(records[0].email.as_deref(), Some("bob@x.com"));
        assert!(records[0].phone.is_none());
    }

    #[test]
    fn incomplete_extraction_is_still_saved() {
        let store = MemoryStore::new();
        let extracted = ExtractedProposal {
            name: Some("Half".into()),
            ..Default::default()
        };
        save_extracted(&store, "finance", "half", &extracted).unwrap();
        assert_eq!(store.count("finance").unwrap(), 1);
    }
}
