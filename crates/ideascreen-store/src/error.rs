use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document {key} in {collection} is not a JSON object")]
    NotAnObject { collection: String, key: String },

    #[error("no results for query")]
    NoResults,

    #[cfg(feature = "duckdb")]
    #[error("duckdb error: {0}")]
    DuckDb(#[from] ::duckdb::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// A rank position could not be written. Lower positions are already stored.
#[derive(Debug, Error)]
#[error("failed to publish rank position {position}: {source}")]
pub struct PublishError {
    pub position: usize,
    #[source]
    pub source: StoreError,
}
