//! DuckDB-backed document store.

use std::path::Path;

use arrow::array::{Array, LargeStringArray, StringArray, StringViewArray};
use arrow::record_batch::RecordBatch;
use duckdb::{Connection, params};
use serde_json::Value;
use tracing::{debug, info};

use crate::{Document, RecordStore, StoreError};

const CREATE_DOCUMENTS: &str = "CREATE TABLE IF NOT EXISTS documents (
    collection VARCHAR NOT NULL,
    doc_key    VARCHAR NOT NULL,
    body       VARCHAR NOT NULL,
    PRIMARY KEY (collection, doc_key)
)";

/// Document store on a single DuckDB table.
///
/// Every collection lives in the `documents` table keyed by
/// `(collection, doc_key)`; bodies are JSON objects stored as text.
///
/// Supports both in-memory (ephemeral) and persistent (file-backed) modes.
/// Use [`open`](Self::open) for in-memory and [`open_persistent`](Self::open_persistent)
/// for file-backed storage that survives across process restarts.
pub struct DuckStore {
    conn: Connection,
}

impl DuckStore {
    /// Open an in-memory DuckDB database.
    pub fn open() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    /// Open or create a persistent DuckDB database at the given path.
    pub fn open_persistent(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self::init(conn)?;
        info!(path = %path.display(), "opened document store");
        Ok(store)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(CREATE_DOCUMENTS)?;
        Ok(Self { conn })
    }

    // ── Counts ──

    /// Number of documents in `collection`.
    pub fn document_count(&self, collection: &str) -> Result<usize, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT count(*)::BIGINT AS cnt FROM documents WHERE collection = ?")?;
        let batches: Vec<RecordBatch> = stmt.query_arrow([collection])?.collect();
        let batch = batches.first().ok_or(StoreError::NoResults)?;
        let col = batch
            .column(0)
            .as_any()
            .downcast_ref::<arrow::array::Int64Array>()
            .ok_or_else(|| StoreError::Other("count column not i64".into()))?;
        Ok(col.value(0) as usize)
    }

    // ── Escape hatch ──

    /// Execute arbitrary SQL and return Arrow RecordBatches.
    pub fn query_arrow(&self, sql: &str) -> Result<Vec<RecordBatch>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let batches: Vec<RecordBatch> = stmt.query_arrow([])?.collect();
        Ok(batches)
    }

    /// Access the underlying DuckDB connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl RecordStore for DuckStore {
    fn read_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT doc_key, body FROM documents WHERE collection = ?")?;
        let batches: Vec<RecordBatch> = stmt.query_arrow([collection])?.collect();

        let mut docs = Vec::new();
        for batch in &batches {
            let keys = batch.column(0);
            let bodies = batch.column(1);
            for row in 0..batch.num_rows() {
                let key = col_str(keys.as_ref(), row).unwrap_or_default();
                let body = col_str(bodies.as_ref(), row)
                    .ok_or_else(|| StoreError::Other(format!("null body for {key}")))?;
                match serde_json::from_str::<Value>(body)? {
                    Value::Object(map) => docs.push(map),
                    _ => {
                        return Err(StoreError::NotAnObject {
                            collection: collection.to_string(),
                            key: key.to_string(),
                        });
                    }
                }
            }
        }
        debug!(collection, count = docs.len(), "read documents");
        Ok(docs)
    }

    fn write(&self, collection: &str, key: &str, doc: &Document) -> Result<(), StoreError> {
        let body = serde_json::to_string(doc)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO documents (collection, doc_key, body) VALUES (?, ?, ?)",
            params![collection, key, body],
        )?;
        debug!(collection, key, "wrote document");
        Ok(())
    }
}

/// Get a string value from a column that might be Utf8, LargeUtf8, or Utf8View.
fn col_str(col: &dyn Array, i: usize) -> Option<&str> {
    if col.is_null(i) {
        return None;
    }
    if let Some(arr) = col.as_any().downcast_ref::<StringArray>() {
        return Some(arr.value(i));
    }
    if let Some(arr) = col.as_any().downcast_ref::<LargeStringArray>() {
        return Some(arr.value(i));
    }
    if let Some(arr) = col.as_any().downcast_ref::<StringViewArray>() {
        return Some(arr.value(i));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn open_in_memory() {
        let store = DuckStore::open().unwrap();
        let batches = store.query_arrow("SELECT 1 AS x").unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].num_rows(), 1);
        assert_eq!(store.document_count("finance").unwrap(), 0);
    }

    #[test]
    fn empty_collection_reads_empty() {
        let store = DuckStore::open().unwrap();
        assert!(store.read_all("finance").unwrap().is_empty());
    }

    #[test]
    fn write_then_read() {
        let store = DuckStore::open().unwrap();
        store
            .write("finance", "alice", &doc(json!({"Name": "Alice", "Budget": 900})))
            .unwrap();
        store
            .write("finance", "bob", &doc(json!({"Name": "Bob", "NPV": "500"})))
            .unwrap();
        let mut docs = store.read_all("finance").unwrap();
        docs.sort_by_key(|d| d["Name"].as_str().map(str::to_string));
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0]["Budget"], json!(900));
        assert_eq!(docs[1]["NPV"], json!("500"));
    }

    #[test]
    fn write_overwrites_same_key() {
        let store = DuckStore::open().unwrap();
        store.write("rank", "idea_1", &doc(json!({"name": "A"}))).unwrap();
        store.write("rank", "idea_1", &doc(json!({"name": "B"}))).unwrap();
        assert_eq!(store.document_count("rank").unwrap(), 1);
        let docs = store.read_all("rank").unwrap();
        assert_eq!(docs[0]["name"], json!("B"));
    }

    #[test]
    fn same_key_in_different_collections() {
        let store = DuckStore::open().unwrap();
        store.write("finance", "k", &doc(json!({"a": 1}))).unwrap();
        store.write("rank", "k", &doc(json!({"b": 2}))).unwrap();
        assert_eq!(store.document_count("finance").unwrap(), 1);
        assert_eq!(store.document_count("rank").unwrap(), 1);
    }

    #[test]
    fn non_object_body_is_rejected() {
        let store = DuckStore::open().unwrap();
        store
            .connection()
            .execute(
                "INSERT INTO documents VALUES ('finance', 'bad', '[1, 2]')",
                [],
            )
            .unwrap();
        let result = store.read_all("finance");
        assert!(matches!(result, Err(StoreError::NotAnObject { .. })));
    }

    // ── Persistent storage tests ──

    #[test]
    fn open_persistent_creates_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let db_path = tmp.path().join("test.duckdb");
        assert!(!db_path.exists());

        let store = DuckStore::open_persistent(&db_path).unwrap();
        assert!(db_path.exists());
        assert_eq!(store.document_count("finance").unwrap(), 0);
    }

    #[test]
    fn persistent_write_and_reopen() {
        let tmp = tempfile::TempDir::new().unwrap();
        let db_path = tmp.path().join("test.duckdb");

        let store = DuckStore::open_persistent(&db_path).unwrap();
        store
            .write("finance", "carol", &doc(json!({"Name": "Carol", "IRR": 7})))
            .unwrap();
        drop(store);

        let store = DuckStore::open_persistent(&db_path).unwrap();
        let docs = store.read_all("finance").unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["Name"], json!("Carol"));
    }
}
