//! Bundle anonymization engine
//!
//! This module provides the [`AnonymizationEngine`] that walks a bundle of
//! linked clinical resources, applies the per-kind resource rules, and keeps
//! every intra-bundle reference pointing at the right synthetic id.
//!
//! # Two passes
//!
//! References are rewritten through the identifier vault, and a reference is
//! only rewritable once its target's synthetic id is known. The engine
//! therefore walks the entries twice:
//!
//! 1. register synthetic ids for every identifier-bearing resource
//! 2. substitute PII and rewrite references for every resource
//!
//! An Observation may appear before the Patient it points to and still end up
//! with the rewritten reference.
//!
//! # Examples
//!
//! ```
//! use healthgate::anonymization::{AnonymizationConfig, AnonymizationEngine};
//! use serde_json::json;
//!
//! # fn example() -> anyhow::Result<()> {
//! let mut engine = AnonymizationEngine::new(AnonymizationConfig::with_salt("test_salt"))?;
//!
//! let bundle = json!({
//!     "resourceType": "Bundle",
//!     "entry": [
//!         {"resource": {"resourceType": "Observation", "id": "obs1",
//!                       "subject": {"reference": "Patient/patient123"}}},
//!         {"resource": {"resourceType": "Patient", "id": "patient123"}}
//!     ]
//! });
//!
//! let anonymized = engine.anonymize(&bundle)?;
//! let patient_id = anonymized["entry"][1]["resource"]["id"].as_str().unwrap();
//! assert_eq!(
//!     anonymized["entry"][0]["resource"]["subject"]["reference"],
//!     format!("Patient/{patient_id}")
//! );
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

use crate::anonymization::{
    anonymizer::FieldAnonymizer,
    audit::AuditLogger,
    config::AnonymizationConfig,
    models::AnonymizedBundle,
    report::AnonymizationReport,
    resource::ResourceAnonymizer,
    vault::IdentifierVault,
};
use crate::domain::{AnonymizationError, GatewayError, Reference, Result};
use anyhow::Context;
use secrecy::ExposeSecret;
use serde_json::Value;
use std::time::Instant;

/// `resourceType` of a bundle
pub const BUNDLE_TYPE: &str = "Bundle";

/// Bundle anonymizer
///
/// Owns one [`IdentifierVault`], emptied at the start of every call: mappings
/// and reference rewrites never carry over from one bundle to the next. The
/// salt does, so the same original value still maps to the same synthetic
/// value across calls on one instance. The vault is unsynchronized: methods
/// take `&mut self`, and concurrent callers should each build their own engine
/// or guard a shared one with a mutex.
pub struct AnonymizationEngine {
    config: AnonymizationConfig,
    rules: ResourceAnonymizer,
    vault: IdentifierVault,
    audit_logger: Option<AuditLogger>,
}

impl AnonymizationEngine {
    /// Create a new anonymization engine
    ///
    /// Uses the configured salt, or draws a random one when none is set.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation or audit logger
    /// initialization fails.
    pub fn new(config: AnonymizationConfig) -> anyhow::Result<Self> {
        config
            .validate()
            .context("Invalid anonymization configuration")?;

        let salt = match config.salt {
            Some(ref salt) => salt.expose_secret().as_ref().to_string(),
            None => {
                tracing::debug!("No anonymization salt configured, generating a session salt");
                uuid::Uuid::new_v4().to_string()
            }
        };

        let audit_logger = if config.audit.enabled {
            Some(AuditLogger::new(
                config.audit.log_path.clone(),
                config.audit.json_format,
                true,
            )?)
        } else {
            None
        };

        Ok(Self {
            rules: ResourceAnonymizer::new(config.preserve_age, config.preserve_gender),
            vault: IdentifierVault::new(FieldAnonymizer::new(salt)),
            config,
            audit_logger,
        })
    }

    /// Engine without audit logging, built from the three public knobs
    pub fn with_options(preserve_age: bool, preserve_gender: bool, salt: Option<&str>) -> Self {
        let salt = salt
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let config = AnonymizationConfig {
            preserve_age,
            preserve_gender,
            ..AnonymizationConfig::with_salt(salt.clone())
        };

        Self {
            rules: ResourceAnonymizer::new(preserve_age, preserve_gender),
            vault: IdentifierVault::new(FieldAnonymizer::new(salt)),
            config,
            audit_logger: None,
        }
    }

    /// Anonymize a bundle or a standalone resource
    ///
    /// Never mutates the input; the result is a transformed deep copy.
    /// Bundle entry `fullUrl` and `request.url` values ending in
    /// `Patient/{id}` are rewritten along with the references.
    ///
    /// # Errors
    ///
    /// Returns [`AnonymizationError::MalformedBundle`] (wrapped in
    /// [`GatewayError::Anonymization`]) when the input is not a keyed structure
    /// with a `resourceType`, or when a bundle's `entry` is not a list.
    pub fn anonymize(&mut self, input: &Value) -> Result<Value> {
        self.anonymize_with_report(input).map(AnonymizedBundle::into_data)
    }

    /// Anonymize and return the session report alongside the data
    pub fn anonymize_with_report(&mut self, input: &Value) -> Result<AnonymizedBundle> {
        let start = Instant::now();

        let mut data = input.clone();
        let mut report = AnonymizationReport::new();

        let source_id = data.get("id").and_then(Value::as_str).map(str::to_string);

        self.vault.clear();
        if let Err(e) = self.anonymize_in_place(&mut data, &mut report) {
            tracing::error!(error = %e, "Rejected malformed anonymization input");
            return Err(e.into());
        }

        report.processing_time_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            entries = report.total_entries,
            substitutions = report.total_substitutions(),
            references_rewritten = report.references_rewritten,
            unresolved_references = report.unresolved_references,
            skipped_fields = report.skipped_fields.len(),
            duration_ms = report.processing_time_ms,
            "Anonymization completed"
        );

        let result = AnonymizedBundle::new(source_id, data, report);

        if let Some(ref logger) = self.audit_logger {
            logger
                .log_session(&result)
                .map_err(|e| GatewayError::Io(format!("{e:#}")))?;
        }

        Ok(result)
    }

    fn anonymize_in_place(
        &mut self,
        data: &mut Value,
        report: &mut AnonymizationReport,
    ) -> std::result::Result<(), AnonymizationError> {
        if !data.is_object() {
            return Err(AnonymizationError::MalformedBundle(format!(
                "expected a JSON object, got {}",
                json_type_name(data)
            )));
        }

        let resource_type = data
            .get("resourceType")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                AnonymizationError::MalformedBundle("missing string resourceType".to_string())
            })?;

        if resource_type != BUNDLE_TYPE {
            // A standalone resource is a one-entry bundle
            tracing::info!(resource_type, "Anonymizing standalone resource");
            report.total_entries = 1;
            self.rules.register_identifiers(data, &mut self.vault);
            if !self.rules.anonymize(data, 0, &mut self.vault, report) {
                report.passed_through = 1;
            }
            return Ok(());
        }

        let entries = match data.get_mut("entry") {
            None | Some(Value::Null) => {
                tracing::info!(entries = 0, "Anonymizing bundle");
                return Ok(());
            }
            Some(Value::Array(entries)) => entries,
            Some(other) => {
                return Err(AnonymizationError::MalformedBundle(format!(
                    "bundle entry must be a list, got {}",
                    json_type_name(other)
                )))
            }
        };

        tracing::info!(entries = entries.len(), "Anonymizing bundle");
        report.total_entries = entries.len();

        for entry in entries.iter() {
            if let Some(resource) = entry.get("resource") {
                self.rules.register_identifiers(resource, &mut self.vault);
            }
        }

        for (index, entry) in entries.iter_mut().enumerate() {
            rewrite_entry_urls(entry, &self.vault, report);
            let inspected = match entry.get_mut("resource") {
                Some(resource) => self.rules.anonymize(resource, index, &mut self.vault, report),
                None => false,
            };
            if !inspected {
                tracing::debug!(entry_index = index, "Passing entry through unchanged");
                report.passed_through += 1;
            }
        }

        Ok(())
    }

    /// Identifier vault of the most recent call
    pub fn vault(&self) -> &IdentifierVault {
        &self.vault
    }

    /// Salt in use
    pub fn salt(&self) -> &str {
        self.vault.salt()
    }

    /// Active configuration
    pub fn config(&self) -> &AnonymizationConfig {
        &self.config
    }
}

/// Anonymize one bundle with a fresh engine
///
/// Without a salt the output is not reproducible across calls.
pub fn anonymize(
    bundle: &Value,
    preserve_age: bool,
    preserve_gender: bool,
    salt: Option<&str>,
) -> Result<Value> {
    AnonymizationEngine::with_options(preserve_age, preserve_gender, salt).anonymize(bundle)
}

/// Rewrite the `{Kind}/{id}` tail of an entry's `fullUrl` and `request.url`
fn rewrite_entry_urls(
    entry: &mut Value,
    vault: &IdentifierVault,
    report: &mut AnonymizationReport,
) {
    let Value::Object(entry) = entry else {
        return;
    };

    if let Some(Value::String(url)) = entry.get_mut("fullUrl") {
        if let Some(rewritten) = rewrite_url_tail(url, vault) {
            *url = rewritten;
            report.entry_urls_rewritten += 1;
        }
    }

    if let Some(Value::String(url)) = entry
        .get_mut("request")
        .and_then(|request| request.get_mut("url"))
    {
        if let Some(rewritten) = rewrite_url_tail(url, vault) {
            *url = rewritten;
            report.entry_urls_rewritten += 1;
        }
    }
}

/// `url` with its trailing `{Kind}/{id}` replaced, when the vault knows it
fn rewrite_url_tail(url: &str, vault: &IdentifierVault) -> Option<String> {
    let (head, id) = url.rsplit_once('/')?;
    let (base, kind) = match head.rsplit_once('/') {
        Some((base, kind)) => (Some(base), kind),
        None => (None, head),
    };

    let rewritten = vault.resolve(&Reference::new(kind, id).ok()?)?;
    tracing::debug!(
        resource_type = rewritten.resource_type(),
        synthetic_id = rewritten.id(),
        "Rewriting entry URL"
    );
    Some(match base {
        Some(base) => format!("{base}/{rewritten}"),
        None => rewritten.into_inner(),
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
