//! Data models for anonymization

pub mod anonymized;
pub mod pii_kind;

pub use anonymized::AnonymizedBundle;
pub use pii_kind::PiiKind;
