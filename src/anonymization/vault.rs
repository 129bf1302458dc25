//! Identifier vault
//!
//! Per-session mapping from `(PiiKind, original)` to synthetic values, plus
//! literal reference rewrites such as `Patient/p1 -> Patient/ID-...`.
//! The vault lives only as long as its owning engine and is never persisted.

use crate::anonymization::anonymizer::FieldAnonymizer;
use crate::anonymization::models::PiiKind;
use crate::domain::ids::Reference;
use std::collections::HashMap;

/// Session-scoped store of synthetic replacements
///
/// Not synchronized: one vault belongs to one engine, and the engine takes
/// `&mut self` for every anonymization call.
#[derive(Debug)]
pub struct IdentifierVault {
    anonymizer: FieldAnonymizer,
    values: HashMap<String, String>,
    references: HashMap<String, String>,
}

impl IdentifierVault {
    /// Create an empty vault generating values with the given field anonymizer
    pub fn new(anonymizer: FieldAnonymizer) -> Self {
        Self {
            anonymizer,
            values: HashMap::new(),
            references: HashMap::new(),
        }
    }

    /// Synthetic value for `original`, computed once per `(kind, original)`
    pub fn get_or_create(&mut self, kind: PiiKind, original: &str) -> String {
        let key = format!("{}:{}", kind.label(), original);
        if let Some(existing) = self.values.get(&key) {
            return existing.clone();
        }

        let synthetic = self.anonymizer.anonymize(kind, original);
        self.values.insert(key, synthetic.clone());
        synthetic
    }

    /// Record that `{resource_type}/{original_id}` now reads `{resource_type}/{synthetic_id}`
    pub fn record_reference_rewrite(
        &mut self,
        resource_type: &str,
        original_id: &str,
        synthetic_id: &str,
    ) {
        self.references.insert(
            format!("{resource_type}/{original_id}"),
            format!("{resource_type}/{synthetic_id}"),
        );
    }

    /// Rewritten form of a literal reference string, if known
    pub fn resolve_reference(&self, reference: &str) -> Option<&str> {
        self.references.get(reference).map(String::as_str)
    }

    /// Typed variant of [`resolve_reference`](Self::resolve_reference), used
    /// for references recovered from URL tails
    pub fn resolve(&self, reference: &Reference) -> Option<Reference> {
        self.resolve_reference(reference.as_str())
            .and_then(|rewritten| rewritten.parse().ok())
    }

    /// Number of stored `(kind, original)` substitutions
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no substitutions have been stored yet
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.references.is_empty()
    }

    /// Drop every mapping learned so far
    pub fn clear(&mut self) {
        self.values.clear();
        self.references.clear();
    }

    /// Salt of the underlying field anonymizer
    pub fn salt(&self) -> &str {
        self.anonymizer.salt()
    }
}
