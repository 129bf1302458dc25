//! Resource kinds and reference identifiers
//!
//! Newtype and enum wrappers for the pieces of a clinical record that the
//! anonymization engine reasons about structurally.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Discriminator of a clinical resource, read from its `resourceType` field
///
/// Only the four recognized kinds are inspected for PII. Everything else is
/// carried as [`ResourceKind::Other`] and passes through untouched.
///
/// # Examples
///
/// ```
/// use healthgate::domain::ids::ResourceKind;
///
/// assert_eq!(ResourceKind::from_type_name("Patient"), ResourceKind::Patient);
/// assert!(!ResourceKind::from_type_name("Device").is_recognized());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Patient,
    Observation,
    MedicationStatement,
    Encounter,
    /// Any other resource type, keeping its original name
    Other(String),
}

impl ResourceKind {
    /// Maps a `resourceType` string to a kind
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "Patient" => Self::Patient,
            "Observation" => Self::Observation,
            "MedicationStatement" => Self::MedicationStatement,
            "Encounter" => Self::Encounter,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the `resourceType` string for this kind
    pub fn type_name(&self) -> &str {
        match self {
            Self::Patient => "Patient",
            Self::Observation => "Observation",
            Self::MedicationStatement => "MedicationStatement",
            Self::Encounter => "Encounter",
            Self::Other(name) => name,
        }
    }

    /// Whether the anonymizer has rules for this kind
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// A literal `{ResourceKind}/{id}` pointer from one resource to another
///
/// # Examples
///
/// ```
/// use healthgate::domain::ids::Reference;
/// use std::str::FromStr;
///
/// let reference = Reference::from_str("Patient/patient123").unwrap();
/// assert_eq!(reference.resource_type(), "Patient");
/// assert_eq!(reference.id(), "patient123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference(String);

impl Reference {
    /// Builds a reference from its two halves
    pub fn new(resource_type: &str, id: &str) -> Result<Self, String> {
        if resource_type.trim().is_empty() {
            return Err("Reference resource type cannot be empty".to_string());
        }
        if id.trim().is_empty() {
            return Err("Reference id cannot be empty".to_string());
        }
        Ok(Self(format!("{resource_type}/{id}")))
    }

    /// Resource type half of the reference
    pub fn resource_type(&self) -> &str {
        self.0.split_once('/').map(|(kind, _)| kind).unwrap_or("")
    }

    /// Identifier half of the reference
    pub fn id(&self) -> &str {
        self.0.split_once('/').map(|(_, id)| id).unwrap_or("")
    }

    /// Returns the reference as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Reference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((kind, id)) => Self::new(kind, id),
            None => Err(format!(
                "Invalid reference format. Expected {{ResourceKind}}/{{id}}, got: {s}"
            )),
        }
    }
}

impl AsRef<str> for Reference {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
