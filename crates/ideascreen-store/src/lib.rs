//! Storage layer: the document-store boundary, its DuckDB and in-memory
//! backends, and the gateway/publisher built on top of it.

mod error;
pub mod gateway;
mod memory;
pub mod publish;

pub use error::{PublishError, StoreError};
pub use gateway::{load_documents, load_proposals, save_extracted};
pub use ideascreen_core::Document;
pub use memory::MemoryStore;
pub use publish::{RANK_COLLECTION, publish_ranking, rank_key};

#[cfg(feature = "duckdb")]
mod duck;
#[cfg(feature = "duckdb")]
pub use duck::DuckStore;

/// Collection holding extracted and seeded proposals.
pub const PROPOSAL_COLLECTION: &str = "finance";

/// Narrow read/write contract with an external document store.
///
/// Reads return documents in no particular order. Writes are upserts: a
/// second write to the same `(collection, key)` replaces the first.
/// Calls block until the backend answers.
pub trait RecordStore {
    fn read_all(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    fn write(&self, collection: &str, key: &str, doc: &Document) -> Result<(), StoreError>;
}
