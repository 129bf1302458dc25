//! Anonymization module
//!
//! Produces de-identified copies of clinical bundles for research and reward
//! use. Every personally identifying field is replaced with a stable synthetic
//! value derived from a salted SHA-256 digest, and references between
//! resources keep pointing at the right (now synthetic) ids.
//!
//! # Architecture
//!
//! The pipeline consists of:
//! - **Field anonymizers**: one deterministic generator per [`PiiKind`]
//! - **Identifier vault**: per-session `(kind, original) -> synthetic` store
//! - **Resource anonymizer**: per-resource-kind field and reference rules
//! - **Engine**: two-pass walk over a bundle, plus reporting and audit
//!
//! # Usage
//!
//! ```rust
//! use healthgate::anonymization::anonymize;
//! use serde_json::json;
//!
//! let bundle = json!({"resourceType": "Bundle", "entry": []});
//! let anonymized = anonymize(&bundle, true, true, Some("salt")).unwrap();
//! assert_eq!(anonymized, bundle);
//! ```

pub mod anonymizer;
pub mod audit;
pub mod config;
pub mod engine;
pub mod models;
pub mod report;
pub mod resource;
pub mod vault;

// Re-export main types
pub use anonymizer::{anonymize_field, FieldAnonymizer};
pub use config::AnonymizationConfig;
pub use engine::{anonymize, AnonymizationEngine};
pub use models::{AnonymizedBundle, PiiKind};
pub use report::AnonymizationReport;
pub use resource::{is_anonymized, ResourceAnonymizer};
pub use vault::IdentifierVault;
