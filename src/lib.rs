// HealthData Gateway - deterministic clinical bundle anonymization
// Copyright (c) 2025 HealthData Gateway Contributors
// Licensed under the MIT License

//! # HealthData Gateway
//!
//! The gateway aggregates clinical records from hospital, pharmacy and
//! wearable sources and produces de-identified copies of them for research
//! and contributor rewards.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Anonymizing** bundles of linked clinical resources deterministically
//! - **Preserving** references between resources after their ids change
//! - **Gating** releases on consent and **rewarding** contributors
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`anonymization`] - Field anonymizers, identifier vault, resource rules, bundle engine
//! - [`core`] - Contribution pipeline (consent, anonymize, reward)
//! - [`adapters`] - Consent and reward ledger boundaries
//! - [`domain`] - Error types, resource kinds and references
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust
//! use healthgate::anonymization::anonymize;
//! use serde_json::json;
//!
//! let bundle = json!({
//!     "resourceType": "Bundle",
//!     "entry": [
//!         {"resource": {"resourceType": "Patient", "id": "patient123",
//!                       "name": [{"family": "Smith", "given": ["Jane"]}]}},
//!         {"resource": {"resourceType": "Observation", "id": "obs1",
//!                       "subject": {"reference": "Patient/patient123"}}}
//!     ]
//! });
//!
//! let anonymized = anonymize(&bundle, true, true, Some("my-salt")).unwrap();
//! let patient = &anonymized["entry"][0]["resource"];
//!
//! assert!(patient["name"][0]["family"].as_str().unwrap().starts_with("Person-"));
//! assert_eq!(
//!     anonymized["entry"][1]["resource"]["subject"]["reference"],
//!     format!("Patient/{}", patient["id"].as_str().unwrap())
//! );
//! ```
//!
//! ## Determinism
//!
//! Every synthetic value is derived from `SHA-256(salt ":" original)`. The
//! same salt and input always give the same output; no original-to-synthetic
//! mapping is ever written to disk.
//!
//! ## Error Handling
//!
//! Library operations return [`domain::Result`], an alias over
//! [`domain::GatewayError`]. The only fatal anonymization failure is
//! [`domain::AnonymizationError::MalformedBundle`]; field-level problems are
//! recovered and listed in the session report.
//!
//! ## Logging
//!
//! The gateway uses structured logging with the `tracing` crate. Events carry
//! counts, kinds and field paths, never identifying values.

pub mod adapters;
pub mod anonymization;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
