//! Arrow schemas and batch builders for tabular display of proposals and rankings.

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray, UInt32Array};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;

use crate::record::{ProposalRecord, keys};
use crate::score::ScoredIdea;

/// Schema for a ranked result: one row per rank position.
pub fn ranking_schema() -> Schema {
    Schema::new(vec![
        Field::new("rank", DataType::UInt32, false),
        Field::new("score", DataType::Float64, false),
        Field::new("budget", DataType::Float64, false),
        Field::new("npv", DataType::Float64, false),
        Field::new("irr", DataType::Float64, false),
        Field::new("name", DataType::Utf8, false),
    ])
}

/// Schema for typed proposal records. Every column is nullable.
pub fn proposal_schema() -> Schema {
    Schema::new(vec![
        Field::new(keys::NAME, DataType::Utf8, true),
        Field::new(keys::NPV, DataType::Float64, true),
        Field::new(keys::IRR, DataType::Float64, true),
        Field::new(keys::PHONE, DataType::Utf8, true),
        Field::new(keys::TIME_TAKEN, DataType::Float64, true),
        Field::new(keys::BUDGET, DataType::Float64, true),
        Field::new(keys::EMAIL, DataType::Utf8, true),
        Field::new(keys::PRIOR_WORKS, DataType::UInt32, true),
    ])
}

/// Build a batch of ranked ideas; row `i` gets rank `i + 1`.
pub fn ranking_batch(ranked: &[ScoredIdea]) -> Result<RecordBatch, ArrowError> {
    let ranks = (1..=ranked.len())
        .map(|r| u32::try_from(r).map_err(|_| ArrowError::ComputeError("rank overflow".into())))
        .collect::<Result<Vec<u32>, _>>()?;
    let columns: Vec<ArrayRef> = vec![
        Arc::new(UInt32Array::from(ranks)),
        Arc::new(Float64Array::from_iter_values(ranked.iter().map(|i| i.score))),
        Arc::new(Float64Array::from_iter_values(ranked.iter().map(|i| i.budget))),
        Arc::new(Float64Array::from_iter_values(ranked.iter().map(|i| i.npv))),
        Arc::new(Float64Array::from_iter_values(ranked.iter().map(|i| i.irr))),
        Arc::new(StringArray::from_iter_values(ranked.iter().map(|i| i.name.as_str()))),
    ];
    RecordBatch::try_new(Arc::new(ranking_schema()), columns)
}

/// Build a batch of proposals; unknown fields become nulls.
pub fn proposal_batch(records: &[ProposalRecord]) -> Result<RecordBatch, ArrowError> {
    let schema: SchemaRef = Arc::new(proposal_schema());
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter(records.iter().map(|r| r.name.as_deref()))),
        Arc::new(Float64Array::from_iter(records.iter().map(|r| r.npv))),
        Arc::new(Float64Array::from_iter(records.iter().map(|r| r.irr))),
        Arc::new(StringArray::from_iter(records.iter().map(|r| r.phone.as_deref()))),
        Arc::new(Float64Array::from_iter(records.iter().map(|r| r.time_taken))),
        Arc::new(Float64Array::from_iter(records.iter().map(|r| r.budget))),
        Arc::new(StringArray::from_iter(records.iter().map(|r| r.email.as_deref()))),
        Arc::new(UInt32Array::from_iter(records.iter().map(|r| r.prior_works_count))),
    ];
    RecordBatch::try_new(schema, columns)
}
