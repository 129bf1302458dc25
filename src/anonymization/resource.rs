//! Resource anonymizer
//!
//! Per-kind rules deciding which fields of a Patient, Observation,
//! MedicationStatement or Encounter are PII, which are cross-references to
//! rewrite, and which are structural. Resources of any other kind are never
//! inspected.
//!
//! Rules run in two phases so reference rewriting does not depend on entry
//! order:
//!
//! 1. [`ResourceAnonymizer::register_identifiers`] assigns synthetic ids to
//!    identifier-bearing resources and records `Kind/old -> Kind/new`.
//! 2. [`ResourceAnonymizer::anonymize`] substitutes PII fields and rewrites
//!    references through the vault.
//!
//! A field with an unexpected shape is skipped and reported; it never aborts
//! the resource or the bundle.

use crate::anonymization::models::PiiKind;
use crate::anonymization::report::AnonymizationReport;
use crate::anonymization::vault::IdentifierVault;
use crate::domain::ids::ResourceKind;
use serde_json::{json, Map, Value};

/// Coding system of the security label appended to anonymized resources
pub const SECURITY_SYSTEM: &str = "http://healthdatagateway.org/security";

/// Code of the security label appended to anonymized resources
pub const SECURITY_CODE: &str = "anonymized";

/// Display text of the security label appended to anonymized resources
pub const SECURITY_DISPLAY: &str = "Anonymized Data";

/// Resource-level anonymization rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceAnonymizer {
    preserve_age: bool,
    preserve_gender: bool,
}

impl ResourceAnonymizer {
    /// Create the rule set
    ///
    /// `preserve_gender` is carried for callers and reports only; gender
    /// fields are never altered whichever way it is set.
    pub fn new(preserve_age: bool, preserve_gender: bool) -> Self {
        Self {
            preserve_age,
            preserve_gender,
        }
    }

    pub fn preserve_age(&self) -> bool {
        self.preserve_age
    }

    pub fn preserve_gender(&self) -> bool {
        self.preserve_gender
    }

    /// Phase one: reserve synthetic ids for resources other entries point to
    ///
    /// Only Patient-like resources register reference rewrites.
    pub fn register_identifiers(&self, resource: &Value, vault: &mut IdentifierVault) {
        let Some(kind) = resource_kind(resource) else {
            return;
        };
        if kind != ResourceKind::Patient {
            return;
        }

        if let Some(original_id) = resource.get("id").and_then(Value::as_str) {
            let synthetic_id = vault.get_or_create(PiiKind::Id, original_id);
            vault.record_reference_rewrite(kind.type_name(), original_id, &synthetic_id);
        }
    }

    /// Phase two: substitute PII fields and rewrite references in place
    ///
    /// Returns `false` when the resource was not inspected (unrecognized kind
    /// or not a keyed structure).
    pub fn anonymize(
        &self,
        resource: &mut Value,
        entry_index: usize,
        vault: &mut IdentifierVault,
        report: &mut AnonymizationReport,
    ) -> bool {
        let Some(kind) = resource_kind(resource) else {
            return false;
        };
        if !kind.is_recognized() {
            return false;
        }
        let Value::Object(fields) = resource else {
            return false;
        };

        let mut walker = FieldWalker {
            vault,
            report,
            entry_index,
            resource_type: kind.type_name().to_string(),
        };

        walker.substitute_field(fields, "id", PiiKind::Id, "id");

        match kind {
            ResourceKind::Patient => self.anonymize_patient(fields, &mut walker),
            ResourceKind::Observation => anonymize_observation(fields, &mut walker),
            ResourceKind::MedicationStatement => {
                anonymize_medication_statement(fields, &mut walker)
            }
            ResourceKind::Encounter => anonymize_encounter(fields, &mut walker),
            ResourceKind::Other(_) => {}
        }

        walker.tag_anonymized(fields);
        walker.report.record_resource(kind.type_name());

        tracing::debug!(
            entry_index,
            resource_type = %kind,
            "Resource anonymized"
        );

        true
    }

    fn anonymize_patient(&self, patient: &mut Map<String, Value>, walker: &mut FieldWalker<'_>) {
        for (i, name) in walker.objects_mut(patient, "name") {
            walker.substitute_field(name, "text", PiiKind::Name, &format!("name[{i}].text"));
            walker.substitute_field(name, "family", PiiKind::Name, &format!("name[{i}].family"));
            walker.substitute_list(name, "given", PiiKind::Name, &format!("name[{i}].given"));
        }

        for (i, identifier) in walker.objects_mut(patient, "identifier") {
            walker.substitute_field(
                identifier,
                "value",
                PiiKind::Id,
                &format!("identifier[{i}].value"),
            );
        }

        for (i, telecom) in walker.objects_mut(patient, "telecom") {
            let kind = match telecom.get("system").and_then(Value::as_str) {
                Some("phone") => PiiKind::Phone,
                Some("email") => PiiKind::Email,
                _ => PiiKind::Id,
            };
            walker.substitute_field(telecom, "value", kind, &format!("telecom[{i}].value"));
        }

        if patient.contains_key("birthDate") {
            if self.preserve_age {
                walker.substitute_field(patient, "birthDate", PiiKind::Dob, "birthDate");
            } else {
                patient.remove("birthDate");
                walker.report.birth_dates_removed += 1;
            }
        }

        for (i, address) in walker.objects_mut(patient, "address") {
            walker.substitute_list(
                address,
                "line",
                PiiKind::Address,
                &format!("address[{i}].line"),
            );
            for key in ["city", "postalCode", "text"] {
                walker.substitute_field(
                    address,
                    key,
                    PiiKind::Address,
                    &format!("address[{i}].{key}"),
                );
            }
        }
    }
}

impl Default for ResourceAnonymizer {
    fn default() -> Self {
        Self::new(true, true)
    }
}

fn anonymize_observation(observation: &mut Map<String, Value>, walker: &mut FieldWalker<'_>) {
    walker.rewrite_nested_reference(observation, "subject");

    for (i, performer) in walker.objects_mut(observation, "performer") {
        walker.rewrite_reference(performer, &format!("performer[{i}].reference"));
    }
}

fn anonymize_medication_statement(
    statement: &mut Map<String, Value>,
    walker: &mut FieldWalker<'_>,
) {
    walker.rewrite_nested_reference(statement, "subject");

    match statement.get_mut("informationSource") {
        None => {}
        Some(Value::Object(source)) => {
            if source.contains_key("reference") {
                walker.rewrite_reference(source, "informationSource.reference");
            } else {
                walker.substitute_field(
                    source,
                    "display",
                    PiiKind::Name,
                    "informationSource.display",
                );
            }
        }
        Some(_) => walker.skip("informationSource", "expected an object"),
    }
}

fn anonymize_encounter(encounter: &mut Map<String, Value>, walker: &mut FieldWalker<'_>) {
    walker.rewrite_nested_reference(encounter, "subject");

    for (i, participant) in walker.objects_mut(encounter, "participant") {
        match participant.get_mut("individual") {
            None => {}
            Some(Value::Object(individual)) => {
                walker.rewrite_reference(
                    individual,
                    &format!("participant[{i}].individual.reference"),
                );
            }
            Some(_) => walker.skip(
                &format!("participant[{i}].individual"),
                "expected an object",
            ),
        }
    }
}

/// Kind of a resource, or `None` when it has no string `resourceType`
pub fn resource_kind(resource: &Value) -> Option<ResourceKind> {
    resource
        .get("resourceType")
        .and_then(Value::as_str)
        .map(ResourceKind::from_type_name)
}

/// Whether a resource already carries the anonymized security label
pub fn is_anonymized(resource: &Value) -> bool {
    resource
        .pointer("/meta/security")
        .and_then(Value::as_array)
        .is_some_and(|labels| labels.iter().any(is_anonymized_label))
}

fn is_anonymized_label(label: &Value) -> bool {
    label.get("system").and_then(Value::as_str) == Some(SECURITY_SYSTEM)
        && label.get("code").and_then(Value::as_str) == Some(SECURITY_CODE)
}

/// Field-level helpers sharing the session vault and report
struct FieldWalker<'a> {
    vault: &'a mut IdentifierVault,
    report: &'a mut AnonymizationReport,
    entry_index: usize,
    resource_type: String,
}

impl FieldWalker<'_> {
    fn skip(&mut self, field_path: &str, reason: &str) {
        tracing::warn!(
            entry_index = self.entry_index,
            resource_type = %self.resource_type,
            field_path,
            reason,
            "Skipping malformed field"
        );
        self.report
            .record_skip(self.entry_index, &self.resource_type, field_path, reason);
    }

    /// Replace a string value with its synthetic counterpart
    fn substitute(&mut self, value: &mut Value, kind: PiiKind, path: &str) {
        match value {
            Value::String(original) => {
                let synthetic = self.vault.get_or_create(kind, original);
                *original = synthetic;
                self.report.record_substitution(kind);
            }
            Value::Null => {}
            _ => self.skip(path, "expected a string"),
        }
    }

    fn substitute_field(
        &mut self,
        object: &mut Map<String, Value>,
        key: &str,
        kind: PiiKind,
        path: &str,
    ) {
        if let Some(value) = object.get_mut(key) {
            self.substitute(value, kind, path);
        }
    }

    fn substitute_list(
        &mut self,
        object: &mut Map<String, Value>,
        key: &str,
        kind: PiiKind,
        path: &str,
    ) {
        match object.get_mut(key) {
            None => {}
            Some(Value::Array(items)) => {
                for (i, item) in items.iter_mut().enumerate() {
                    self.substitute(item, kind, &format!("{path}[{i}]"));
                }
            }
            Some(_) => self.skip(path, "expected a list"),
        }
    }

    /// Keyed sub-objects of a list field, skipping anything else
    fn objects_mut<'v>(
        &mut self,
        object: &'v mut Map<String, Value>,
        key: &str,
    ) -> Vec<(usize, &'v mut Map<String, Value>)> {
        match object.get_mut(key) {
            None => Vec::new(),
            Some(Value::Array(items)) => {
                let mut objects = Vec::with_capacity(items.len());
                for (i, item) in items.iter_mut().enumerate() {
                    match item {
                        Value::Object(map) => objects.push((i, map)),
                        _ => self.skip(&format!("{key}[{i}]"), "expected an object"),
                    }
                }
                objects
            }
            Some(_) => {
                self.skip(key, "expected a list");
                Vec::new()
            }
        }
    }

    /// Rewrite `holder.reference` through the vault
    fn rewrite_reference(&mut self, holder: &mut Map<String, Value>, path: &str) {
        match holder.get_mut("reference") {
            None | Some(Value::Null) => {}
            Some(Value::String(reference)) => match self.vault.resolve_reference(reference) {
                Some(rewritten) => {
                    *reference = rewritten.to_string();
                    self.report.references_rewritten += 1;
                }
                None => self.report.unresolved_references += 1,
            },
            Some(_) => self.skip(path, "expected a string"),
        }
    }

    /// Rewrite `object.<key>.reference` where `<key>` holds a single reference object
    fn rewrite_nested_reference(&mut self, object: &mut Map<String, Value>, key: &str) {
        match object.get_mut(key) {
            None => {}
            Some(Value::Object(holder)) => {
                self.rewrite_reference(holder, &format!("{key}.reference"));
            }
            Some(_) => self.skip(key, "expected an object"),
        }
    }

    /// Append the anonymized security label once
    fn tag_anonymized(&mut self, resource: &mut Map<String, Value>) {
        let meta = resource
            .entry("meta")
            .or_insert_with(|| Value::Object(Map::new()));
        let Value::Object(meta) = meta else {
            self.skip("meta", "expected an object");
            return;
        };

        let security = meta
            .entry("security")
            .or_insert_with(|| Value::Array(Vec::new()));
        let Value::Array(labels) = security else {
            self.skip("meta.security", "expected a list");
            return;
        };

        if !labels.iter().any(is_anonymized_label) {
            labels.push(json!({
                "system": SECURITY_SYSTEM,
                "code": SECURITY_CODE,
                "display": SECURITY_DISPLAY
            }));
        }
    }
}
