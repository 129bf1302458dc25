//! Audit logger for anonymization sessions

use crate::anonymization::models::{AnonymizedBundle, PiiKind};
use anyhow::{Context, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Audit log entry
///
/// Only counts and a hash of the source id are written. Original values and
/// original-to-synthetic mappings never reach the log.
#[derive(Debug, Serialize)]
struct AuditLogEntry {
    timestamp: String,
    /// SHA-256 hash of the bundle id (never log plaintext ids)
    source_hash: String,
    total_entries: usize,
    passed_through: usize,
    substitutions: BTreeMap<PiiKind, usize>,
    references_rewritten: usize,
    unresolved_references: usize,
    skipped_fields: usize,
    processing_time_ms: u64,
}

/// Audit logger for anonymization sessions
pub struct AuditLogger {
    log_path: PathBuf,
    json_format: bool,
    enabled: bool,
}

impl AuditLogger {
    /// Create a new audit logger
    pub fn new(log_path: PathBuf, json_format: bool, enabled: bool) -> Result<Self> {
        if enabled {
            if let Some(parent) = log_path.parent() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create audit log directory: {}", parent.display())
                })?;
            }
        }

        Ok(Self {
            log_path,
            json_format,
            enabled,
        })
    }

    /// Log an anonymization session
    pub fn log_session(&self, bundle: &AnonymizedBundle) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let report = &bundle.report;
        let entry = AuditLogEntry {
            timestamp: bundle.timestamp.to_rfc3339(),
            source_hash: self.hash_value(bundle.source_id.as_deref().unwrap_or("unknown")),
            total_entries: report.total_entries,
            passed_through: report.passed_through,
            substitutions: report.substitutions_by_kind.clone(),
            references_rewritten: report.references_rewritten,
            unresolved_references: report.unresolved_references,
            skipped_fields: report.skipped_fields.len(),
            processing_time_ms: report.processing_time_ms,
        };

        self.write_entry(&entry)
    }

    /// Hash a value using SHA-256
    fn hash_value(&self, value: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(value.as_bytes());
        let result = hasher.finalize();
        format!("{result:x}")
    }

    /// Write an audit entry to the log file
    fn write_entry(&self, entry: &AuditLogEntry) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .with_context(|| format!("Failed to open audit log: {}", self.log_path.display()))?;

        if self.json_format {
            let json_line =
                serde_json::to_string(entry).context("Failed to serialize audit entry")?;
            writeln!(file, "{json_line}").context("Failed to write audit entry")?;
        } else {
            writeln!(
                file,
                "[{}] Source: {} | Entries: {} | Substitutions: {} | References: {} | Skipped: {} | Time: {}ms",
                entry.timestamp,
                entry.source_hash,
                entry.total_entries,
                entry.substitutions.values().sum::<usize>(),
                entry.references_rewritten,
                entry.skipped_fields,
                entry.processing_time_ms
            )
            .context("Failed to write audit entry")?;
        }

        Ok(())
    }
}
