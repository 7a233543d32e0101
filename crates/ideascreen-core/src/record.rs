//! Proposal record types and the string-to-number coercion boundary.
//!
//! Two shapes of the same proposal exist:
//!
//! - [`ExtractedProposal`]: raw text captures straight out of the extractor.
//!   Every field is `Option<String>`; `None` is the unknown marker.
//! - [`ProposalRecord`]: typed fields, built once right after a store read
//!   (or from an extraction) and consumed by scoring.
//!
//! Store documents use the proposal form labels as keys (`Name`, `NPV`, ...).

use serde::Serialize;
use serde_json::{Map, Number, Value};
use tracing::debug;

/// A schemaless record as exchanged with the document store.
pub type Document = Map<String, Value>;

/// Document keys, one per extracted field.
pub mod keys {
    pub const NAME: &str = "Name";
    pub const NPV: &str = "NPV";
    pub const IRR: &str = "IRR";
    pub const PHONE: &str = "Phone no";
    pub const TIME_TAKEN: &str = "Time taken";
    pub const BUDGET: &str = "Budget";
    pub const EMAIL: &str = "Email";
    pub const PRIOR_WORKS: &str = "Number of Previous works";

    /// Keys that must be known for a record to be scored.
    pub const REQUIRED: &[&str] = &[NAME, NPV, IRR, BUDGET];
}

/// Raw field captures from a proposal document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedProposal {
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "NPV")]
    pub npv: Option<String>,
    #[serde(rename = "IRR")]
    pub irr: Option<String>,
    #[serde(rename = "Phone no")]
    pub phone: Option<String>,
    #[serde(rename = "Time taken")]
    pub time_taken: Option<String>,
    #[serde(rename = "Budget")]
    pub budget: Option<String>,
    #[serde(rename = "Email")]
    pub email: Option<String>,
    #[serde(rename = "Number of Previous works")]
    pub prior_works_count: Option<String>,
}

impl ExtractedProposal {
    /// Convert to a store document. Unknown fields become JSON `null`.
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        for (key, value) in self.entries() {
            let v = value.map_or(Value::Null, |s| Value::String(s.to_string()));
            doc.insert(key.to_string(), v);
        }
        doc
    }

    /// `(key, value)` pairs in form order.
    pub fn entries(&self) -> [(&'static str, Option<&str>); 8] {
        [
            (keys::NAME, self.name.as_deref()),
            (keys::NPV, self.npv.as_deref()),
            (keys::IRR, self.irr.as_deref()),
            (keys::PHONE, self.phone.as_deref()),
            (keys::TIME_TAKEN, self.time_taken.as_deref()),
            (keys::BUDGET, self.budget.as_deref()),
            (keys::EMAIL, self.email.as_deref()),
            (keys::PRIOR_WORKS, self.prior_works_count.as_deref()),
        ]
    }

    /// Required keys with no captured value.
    pub fn missing_required(&self) -> Vec<&'static str> {
        self.entries()
            .into_iter()
            .filter(|(key, value)| keys::REQUIRED.contains(key) && value.is_none())
            .map(|(key, _)| key)
            .collect()
    }

    pub fn is_extraction_complete(&self) -> bool {
        self.missing_required().is_empty()
    }
}

/// A proposal with typed fields. `None` means the field is unknown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProposalRecord {
    pub name: Option<String>,
    pub npv: Option<f64>,
    pub irr: Option<f64>,
    pub phone: Option<String>,
    pub time_taken: Option<f64>,
    pub budget: Option<f64>,
    pub email: Option<String>,
    pub prior_works_count: Option<u32>,
}

impl ProposalRecord {
    /// Coerce a store document into a typed record.
    ///
    /// Numbers are taken as-is, strings are trimmed and parsed. Anything that
    /// does not coerce (null, empty, garbage, NaN/inf) becomes unknown.
    pub fn from_document(doc: &Document) -> Self {
        Self {
            name: coerce_text(doc.get(keys::NAME)),
            npv: coerce_f64(keys::NPV, doc.get(keys::NPV)),
            irr: coerce_f64(keys::IRR, doc.get(keys::IRR)),
            phone: coerce_digits(doc.get(keys::PHONE)),
            time_taken: coerce_f64(keys::TIME_TAKEN, doc.get(keys::TIME_TAKEN)),
            budget: coerce_f64(keys::BUDGET, doc.get(keys::BUDGET)),
            email: coerce_text(doc.get(keys::EMAIL)),
            prior_works_count: coerce_u32(keys::PRIOR_WORKS, doc.get(keys::PRIOR_WORKS)),
        }
    }

    /// Whether the field stored under `key` is known.
    pub fn has(&self, key: &str) -> bool {
        match key {
            keys::NAME => self.name.is_some(),
            keys::NPV => self.npv.is_some(),
            keys::IRR => self.irr.is_some(),
            keys::PHONE => self.phone.is_some(),
            keys::TIME_TAKEN => self.time_taken.is_some(),
            keys::BUDGET => self.budget.is_some(),
            keys::EMAIL => self.email.is_some(),
            keys::PRIOR_WORKS => self.prior_works_count.is_some(),
            _ => false,
        }
    }

    /// Required keys that are unknown on this record.
    pub fn missing_required(&self) -> Vec<&'static str> {
        keys::REQUIRED
            .iter()
            .copied()
            .filter(|key| !self.has(key))
            .collect()
    }

    pub fn is_extraction_complete(&self) -> bool {
        self.missing_required().is_empty()
    }
}

// ── Coercion helpers ──

fn coerce_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

/// Phone numbers stay strings; integer values are rendered back to digits.
fn coerce_digits(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) if n.is_u64() || n.is_i64() => Some(n.to_string()),
        _ => None,
    }
}

fn coerce_f64(key: &str, value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => return None,
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Null => return None,
        other => {
            debug!(key, value = %other, "non-scalar value for numeric field");
            return None;
        }
    };
    match parsed {
        Some(v) if v.is_finite() => Some(v),
        _ => {
            debug!(key, "numeric field did not coerce");
            None
        }
    }
}

fn coerce_u32(key: &str, value: Option<&Value>) -> Option<u32> {
    let parsed = match value? {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) if s.trim().is_empty() => return None,
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => return None,
    };
    if parsed.is_none() {
        debug!(key, "count field did not coerce");
    }
    parsed
}

/// Convert a finite `f64` into a JSON number, or `null` if it cannot be represented.
pub fn number_value(v: f64) -> Value {
    Number::from_f64(v).map_or(Value::Null, Value::Number)
}
