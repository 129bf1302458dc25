//! Anonymized bundle result

use crate::anonymization::report::AnonymizationReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Output of one anonymization session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizedBundle {
    /// `id` of the input bundle or resource, when it had one
    pub source_id: Option<String>,
    /// Anonymized copy of the input
    pub data: Value,
    /// What the session did
    pub report: AnonymizationReport,
    /// Timestamp of anonymization
    pub timestamp: DateTime<Utc>,
}

impl AnonymizedBundle {
    /// Create a new anonymized bundle result
    pub fn new(source_id: Option<String>, data: Value, report: AnonymizationReport) -> Self {
        Self {
            source_id,
            data,
            report,
            timestamp: Utc::now(),
        }
    }

    /// Entries in the anonymized bundle (1 for a standalone resource)
    pub fn entry_count(&self) -> usize {
        self.report.total_entries
    }

    /// Consumes self and returns the anonymized JSON
    pub fn into_data(self) -> Value {
        self.data
    }
}
