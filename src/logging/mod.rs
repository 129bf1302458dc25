//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Configurable log levels
//! - Console output on stderr
//! - JSON-formatted local file logging with rotation
//!
//! Log events carry kinds, counts, entry indices and field paths. They never
//! carry original identifying values or the synthetic values that replace them.
//!
//! # Example
//!
//! ```no_run
//! use healthgate::logging::init_logging;
//! use healthgate::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(entries = 3, "Anonymization completed");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};
