//! Field anonymizers
//!
//! One deterministic generator per [`PiiKind`]. Every generator derives its
//! output from the salted SHA-256 digest of the original value, so the same
//! value and salt always produce the same synthetic value.

pub mod date;
pub mod digest;

use crate::anonymization::models::PiiKind;
use crate::config::{secret_string, SecretString};
use date::shift_birth_date;
use digest::salted_digest;
use secrecy::ExposeSecret;

/// Synthetic value for `original` of the given kind
///
/// Pure and total. Birth dates are shifted by a digest-derived day offset
/// with the year held fixed; unparseable dates fall back to `Date-<hash>`.
///
/// # Examples
///
/// ```
/// use healthgate::anonymization::anonymizer::anonymize_field;
/// use healthgate::anonymization::models::PiiKind;
///
/// let id = anonymize_field("patient123", PiiKind::Id, "test_salt");
/// assert!(id.starts_with("ID-"));
/// assert_eq!(id, anonymize_field("patient123", PiiKind::Id, "test_salt"));
/// ```
pub fn anonymize_field(original: &str, kind: PiiKind, salt: &str) -> String {
    let digest = salted_digest(salt, original);

    match kind {
        PiiKind::Name => format!("Person-{}", &digest[..8]),
        PiiKind::Id => format!("ID-{}", &digest[..12]),
        PiiKind::Dob => shift_birth_date(original, &digest)
            .unwrap_or_else(|| format!("Date-{}", &digest[..8])),
        PiiKind::Address => format!("Address-{}", &digest[..8]),
        PiiKind::Phone => format!("555-{}-{}", &digest[..3], &digest[3..7]),
        PiiKind::Email => format!("person.{}@example.com", &digest[..8]),
        PiiKind::Ssn => format!("XXX-XX-{}", &digest[..4]),
        PiiKind::Other => format!("Anon-{}", &digest[..8]),
    }
}

/// Field anonymizer bound to one session salt
///
/// The salt is kept as a secret so it never shows up in debug output.
#[derive(Clone)]
pub struct FieldAnonymizer {
    salt: SecretString,
}

impl FieldAnonymizer {
    /// Create a field anonymizer for the given salt
    pub fn new(salt: impl Into<String>) -> Self {
        Self {
            salt: secret_string(salt.into()),
        }
    }

    /// Anonymize a single value
    pub fn anonymize(&self, kind: PiiKind, original: &str) -> String {
        anonymize_field(original, kind, self.salt.expose_secret().as_ref())
    }

    /// Salt in use, for callers that need to reproduce a session
    pub fn salt(&self) -> &str {
        self.salt.expose_secret().as_ref()
    }
}

impl std::fmt::Debug for FieldAnonymizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldAnonymizer")
            .field("salt", &"[REDACTED]")
            .finish()
    }
}
