use std::fmt;

/// Failures are reported in aggregate only once this many have piled up in a batch.
pub(crate) const AGGREGATE_REPORT_MIN: usize = 2;

/// Why one record was left out of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRejection {
    pub tab_number: String,
    pub reason: String,
}

impl RecordRejection {
    pub fn new(tab_number: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            tab_number: tab_number.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for RecordRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.tab_number, self.reason)
    }
}

/// Accumulates rejections for one batch and reports them once at the end.
#[derive(Debug, Default)]
pub struct RejectionLog {
    entries: Vec<RecordRejection>,
}

impl RejectionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rejection: RecordRejection) {
        tracing::debug!(tab_number = %rejection.tab_number, reason = %rejection.reason, "record rejected");
        self.entries.push(rejection);
    }

    pub fn entries(&self) -> &[RecordRejection] {
        &self.entries
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Renders the aggregated entry, or `None` while below the reporting minimum.
    pub fn summary(&self, context: &str) -> Option<String> {
        if self.entries.len() < AGGREGATE_REPORT_MIN {
            return None;
        }
        let body = self
            .entries
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\r\n");
        Some(format!("Errors while building {context}:\r\n{body}"))
    }

    pub fn report(&self, context: &str) {
        if let Some(summary) = self.summary(context) {
            tracing::error!(rejected = self.entries.len(), "{summary}");
        }
    }
}
