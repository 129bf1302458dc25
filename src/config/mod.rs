//! Configuration management for the gateway.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! The gateway uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `HEALTHGATE_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation with human-readable messages
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use healthgate::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("healthgate.toml")?;
//!
//! println!("Preserve age: {}", config.anonymization.preserve_age);
//! println!("Rewards enabled: {}", config.rewards.enabled);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (name, log level)
//! - [`AnonymizationConfig`](crate::anonymization::AnonymizationConfig) - Salt, age/gender flags, audit log
//! - [`ConsentConfig`] - Default consent duration
//! - [`RewardsConfig`] - Reward issuance switch
//! - [`LoggingConfig`] - Local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! name = "healthgate"
//! log_level = "info"
//!
//! [anonymization]
//! salt = "${HEALTHGATE_SALT}"
//! preserve_age = true
//!
//! [anonymization.audit]
//! enabled = true
//! log_path = "./audit/anonymization.log"
//! ```
//!
//! The salt is wrapped in a [`SecretString`] as soon as it is parsed and is
//! never printed.

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{ApplicationConfig, ConsentConfig, GatewayConfig, LoggingConfig, RewardsConfig};
pub use secret::{secret_string, SecretString, SecretValue};
