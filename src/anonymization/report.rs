//! Anonymization session reporting
//!
//! Collects what happened while one bundle was anonymized: substitutions per
//! PII kind, reference rewrites, and the fields that had to be skipped.
//! Reports never carry original values.

use crate::anonymization::models::PiiKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A field left untouched because its shape was not what the rules expect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedField {
    /// Index of the bundle entry holding the resource
    pub entry_index: usize,

    /// Resource type of the entry
    pub resource_type: String,

    /// Dotted path of the skipped field
    pub field_path: String,

    /// Short description of the mismatch
    pub reason: String,
}

/// Statistics for one anonymization session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnonymizationReport {
    /// Entries walked (1 for a standalone resource)
    pub total_entries: usize,

    /// Recognized resources by type
    pub resources_by_type: BTreeMap<String, usize>,

    /// Entries returned without inspection
    pub passed_through: usize,

    /// Values substituted, by kind
    pub substitutions_by_kind: BTreeMap<PiiKind, usize>,

    /// References rewritten to synthetic ids
    pub references_rewritten: usize,

    /// References left unchanged because their target is unknown
    pub unresolved_references: usize,

    /// Entry `fullUrl` and `request.url` values pointed at synthetic ids
    pub entry_urls_rewritten: usize,

    /// Birth dates removed because age is not preserved
    pub birth_dates_removed: usize,

    /// Fields skipped due to shape mismatches
    pub skipped_fields: Vec<SkippedField>,

    /// Wall-clock time spent, in milliseconds
    pub processing_time_ms: u64,
}

impl AnonymizationReport {
    /// Create a new empty report
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_resource(&mut self, resource_type: &str) {
        *self
            .resources_by_type
            .entry(resource_type.to_string())
            .or_insert(0) += 1;
    }

    pub(crate) fn record_substitution(&mut self, kind: PiiKind) {
        *self.substitutions_by_kind.entry(kind).or_insert(0) += 1;
    }

    pub(crate) fn record_skip(
        &mut self,
        entry_index: usize,
        resource_type: &str,
        field_path: impl Into<String>,
        reason: impl Into<String>,
    ) {
        self.skipped_fields.push(SkippedField {
            entry_index,
            resource_type: resource_type.to_string(),
            field_path: field_path.into(),
            reason: reason.into(),
        });
    }

    /// Total number of substituted values across all kinds
    pub fn total_substitutions(&self) -> usize {
        self.substitutions_by_kind.values().sum()
    }

    /// Substitutions for one kind
    pub fn substitutions(&self, kind: PiiKind) -> usize {
        self.substitutions_by_kind.get(&kind).copied().unwrap_or(0)
    }

    /// Whether any field had to be skipped
    pub fn has_warnings(&self) -> bool {
        !self.skipped_fields.is_empty()
    }

    /// Format report for console output
    pub fn format_console(&self) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push_str("                    ANONYMIZATION REPORT                       \n");
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output.push_str("📊 SUMMARY\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!("  Entries Processed:      {}\n", self.total_entries));
        output.push_str(&format!("  Passed Through:         {}\n", self.passed_through));
        output.push_str(&format!(
            "  Values Substituted:     {}\n",
            self.total_substitutions()
        ));
        output.push_str(&format!(
            "  References Rewritten:   {}\n",
            self.references_rewritten
        ));
        output.push_str(&format!(
            "  Unresolved References:  {}\n",
            self.unresolved_references
        ));
        output.push_str(&format!(
            "  Entry URLs Rewritten:   {}\n",
            self.entry_urls_rewritten
        ));
        output.push_str(&format!(
            "  Birth Dates Removed:    {}\n",
            self.birth_dates_removed
        ));
        output.push_str(&format!(
            "  Processing Time:        {} ms\n",
            self.processing_time_ms
        ));
        output.push('\n');

        if !self.resources_by_type.is_empty() {
            output.push_str("🗂  RESOURCES BY TYPE\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for (resource_type, count) in &self.resources_by_type {
                output.push_str(&format!("  {:30} {:>5}\n", resource_type, count));
            }
            output.push('\n');
        }

        if !self.substitutions_by_kind.is_empty() {
            output.push_str("🔍 SUBSTITUTIONS BY KIND\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for (kind, count) in &self.substitutions_by_kind {
                output.push_str(&format!("  {:30} {:>5}\n", kind.label(), count));
            }
            output.push('\n');
        }

        if !self.skipped_fields.is_empty() {
            output.push_str("⚠️  SKIPPED FIELDS\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for skipped in &self.skipped_fields {
                output.push_str(&format!(
                    "  • entry {} ({}): {} - {}\n",
                    skipped.entry_index, skipped.resource_type, skipped.field_path, skipped.reason
                ));
            }
            output.push('\n');
        }

        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output
    }

    /// Format report as JSON
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write report to file
    pub fn write_to_file(&self, path: &std::path::Path) -> std::io::Result<()> {
        let json = self.format_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_creation() {
        let report = AnonymizationReport::new();
        assert_eq!(report.total_entries, 0);
        assert_eq!(report.total_substitutions(), 0);
        assert!(!report.has_warnings());
    }

    #[test]
    fn test_record_counts() {
        let mut report = AnonymizationReport::new();
        report.record_substitution(PiiKind::Name);
        report.record_substitution(PiiKind::Name);
        report.record_substitution(PiiKind::Phone);
        report.record_resource("Patient");

        assert_eq!(report.total_substitutions(), 3);
        assert_eq!(report.substitutions(PiiKind::Name), 2);
        assert_eq!(report.substitutions(PiiKind::Email), 0);
        assert_eq!(report.resources_by_type.get("Patient"), Some(&1));
    }

    #[test]
    fn test_record_skip() {
        let mut report = AnonymizationReport::new();
        report.record_skip(0, "Patient", "name", "expected a list");

        assert!(report.has_warnings());
        assert_eq!(report.skipped_fields[0].field_path, "name");
    }

    #[test]
    fn test_format_console() {
        let mut report = AnonymizationReport::new();
        report.total_entries = 4;
        report.references_rewritten = 2;
        report.record_substitution(PiiKind::Address);
        report.record_skip(1, "Observation", "performer", "expected a list");

        let output = report.format_console();
        assert!(output.contains("ANONYMIZATION REPORT"));
        assert!(output.contains("Entries Processed:      4"));
        assert!(output.contains("References Rewritten:   2"));
        assert!(output.contains("ADDRESS"));
        assert!(output.contains("performer"));
    }

    #[test]
    fn test_format_json_uses_kind_labels() {
        let mut report = AnonymizationReport::new();
        report.record_substitution(PiiKind::Ssn);

        let json = report.format_json().unwrap();
        assert!(json.contains("\"SSN\""));
    }
}
