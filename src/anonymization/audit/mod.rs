//! Audit logging module
//!
//! Provides structured audit logging for anonymization sessions.

pub mod logger;

pub use logger::AuditLogger;
