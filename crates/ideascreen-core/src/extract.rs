//! Best-effort field extraction from proposal page text.
//!
//! Each field has one pattern. Patterns are evaluated independently on every
//! page, so a miss on one field never stops the others. A field that never
//! matches stays unknown (`None`); that is logged, not returned as an error.
//!
//! # Repeated fields across pages
//!
//! When more than one page matches the same field, [`PageMatchPolicy`] decides
//! which value is kept. [`PageMatchPolicy::LastMatchWins`] is the default and
//! reproduces the output of earlier ingestion runs;
//! [`PageMatchPolicy::FirstMatchWins`] keeps the earliest page's value.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::record::{ExtractedProposal, keys};

/// Which page's value to keep when a field matches on several pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageMatchPolicy {
    #[default]
    LastMatchWins,
    FirstMatchWins,
}

/// A named field of a proposal document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Npv,
    Irr,
    Phone,
    TimeTaken,
    Budget,
    Email,
    PriorWorks,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Name,
        Field::Npv,
        Field::Irr,
        Field::Phone,
        Field::TimeTaken,
        Field::Budget,
        Field::Email,
        Field::PriorWorks,
    ];

    /// Store document key for this field.
    pub fn key(self) -> &'static str {
        match self {
            Field::Name => keys::NAME,
            Field::Npv => keys::NPV,
            Field::Irr => keys::IRR,
            Field::Phone => keys::PHONE,
            Field::TimeTaken => keys::TIME_TAKEN,
            Field::Budget => keys::BUDGET,
            Field::Email => keys::EMAIL,
            Field::PriorWorks => keys::PRIOR_WORKS,
        }
    }

    /// Fields that must be present for a proposal to be scored.
    pub fn is_required(self) -> bool {
        keys::REQUIRED.contains(&self.key())
    }

    fn pattern_source(self) -> &'static str {
        match self {
            Field::Name => r"Name:(\w+)",
            Field::Npv => r"NPV:([0-9]+)",
            Field::Irr => r"IRR:([0-9]+)",
            Field::Phone => r"Phone no:([0-9]+)",
            Field::TimeTaken => r"Time taken:([0-9]+)",
            Field::Budget => r"Budget:([0-9]+)",
            Field::Email => r"Email:\s*([\w.\-]+@[\w.\-]+)",
            Field::PriorWorks => r"Number of Previous works:([0-9]+)",
        }
    }

    fn pattern(self) -> &'static Regex {
        &PATTERNS[self as usize]
    }
}

/// Compiled patterns, indexed by `Field as usize`.
static PATTERNS: LazyLock<[Regex; 8]> = LazyLock::new(|| {
    Field::ALL.map(|f| Regex::new(f.pattern_source()).expect("field pattern is valid"))
});

/// First capture of `field` within `text`, if any.
pub fn capture(field: Field, text: &str) -> Option<&str> {
    field
        .pattern()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Split a text dump into pages on form-feed characters.
pub fn split_pages(text: &str) -> Vec<&str> {
    text.split('\x0c').collect()
}

/// Pattern-based proposal field extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct Extractor {
    policy: PageMatchPolicy,
}

impl Extractor {
    pub fn new(policy: PageMatchPolicy) -> Self {
        Self { policy }
    }

    /// Extract every field from a sequence of pages.
    pub fn extract<S: AsRef<str>>(&self, pages: &[S]) -> ExtractedProposal {
        let mut out = ExtractedProposal::default();

        for (idx, page) in pages.iter().enumerate() {
            let text = page.as_ref();
            for field in Field::ALL {
                let Some(value) = capture(field, text) else {
                    continue;
                };
                let slot = slot_mut(&mut out, field);
                if let Some(prev) = slot.as_deref() {
                    if self.policy == PageMatchPolicy::FirstMatchWins {
                        continue;
                    }
                    if prev != value {
                        debug!(field = field.key(), page = idx + 1, "later page overrides field");
                    }
                }
                *slot = Some(value.to_string());
            }
        }

        for field in Field::ALL {
            if slot_ref(&out, field).is_some() {
                continue;
            }
            if field.is_required() {
                warn!(field = field.key(), pages = pages.len(), "required field not found");
            } else {
                debug!(field = field.key(), "optional field not found");
            }
        }

        out
    }
}

/// Extract with the default policy.
pub fn extract<S: AsRef<str>>(pages: &[S]) -> ExtractedProposal {
    Extractor::default().extract(pages)
}

fn slot_mut(p: &mut ExtractedProposal, field: Field) -> &mut Option<String> {
    match field {
        Field::Name => &mut p.name,
        Field::Npv => &mut p.npv,
        Field::Irr => &mut p.irr,
        Field::Phone => &mut p.phone,
        Field::TimeTaken => &mut p.time_taken,
        Field::Budget => &mut p.budget,
        Field::Email => &mut p.email,
        Field::PriorWorks => &mut p.prior_works_count,
    }
}

fn slot_ref(p: &ExtractedProposal, field: Field) -> &Option<String> {
    match field {
        Field::Name => &p.name,
        Field::Npv => &p.npv,
        Field::Irr => &p.irr,
        Field::Phone => &p.phone,
        Field::TimeTaken => &p.time_taken,
        Field::Budget => &p.budget,
        Field::Email => &p.email,
        Field::PriorWorks => &p.prior_works_count,
    }
}
