pub mod aero;
pub mod delivery;
pub mod masking;
pub(crate) mod normalizer;
pub mod rejections;
pub mod source;
pub mod travel;

use source::{RawRecord, RowSource};

/// How a single company ended within a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompanyOutcome {
    /// A response with content came back for the batch.
    Delivered { records: usize },
    /// No candidate produced a response, or the response was empty.
    NotDelivered { records: usize },
    SerializationFailed,
    BelowThreshold { found: usize, required: usize },
    /// Every fetched record was rejected.
    NothingToSend,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyReport {
    pub company_id: String,
    pub outcome: CompanyOutcome,
    pub rejected: usize,
}

/// Per-company results of one agency run, in processing order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub companies: Vec<CompanyReport>,
    /// Set when a threshold violation stopped the whole run.
    pub aborted: bool,
}

impl RunSummary {
    pub fn delivered(&self) -> usize {
        self.companies
            .iter()
            .filter(|report| matches!(report.outcome, CompanyOutcome::Delivered { .. }))
            .count()
    }

    fn push(&mut self, company_id: &str, outcome: CompanyOutcome, rejected: usize) {
        self.companies.push(CompanyReport {
            company_id: company_id.to_string(),
            outcome,
            rejected,
        });
    }
}

/// Source failures count as an empty extract so threshold rules still apply.
pub(crate) fn fetch_rows(source: &mut dyn RowSource, procedure: &str) -> Vec<RawRecord> {
    match source.fetch(procedure) {
        Ok(rows) => {
            tracing::info!(procedure, rows = rows.len(), "extract fetched");
            rows
        }
        Err(err) => {
            tracing::error!(procedure, error = %err, "unable to fetch extract");
            Vec::new()
        }
    }
}
