//! Core business logic for the gateway.
//!
//! # Modules
//!
//! - [`contribution`] - Consent-gated anonymization and reward issuance
//!
//! # Contribution Workflow
//!
//! 1. **Consent**: ask the consent ledger whether the requester may receive the subject's data
//! 2. **Anonymize**: run the bundle through a fresh [`AnonymizationEngine`](crate::anonymization::AnonymizationEngine)
//! 3. **Reward**: credit the subject with one point per bundle entry
//!
//! # Example
//!
//! ```rust
//! use healthgate::adapters::{InMemoryConsentLedger, InMemoryRewardLedger, SourceKind};
//! use healthgate::config::GatewayConfig;
//! use healthgate::core::ContributionPipeline;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # async fn example() -> healthgate::domain::Result<()> {
//! let pipeline = ContributionPipeline::new(
//!     &GatewayConfig::default(),
//!     Arc::new(InMemoryConsentLedger::new()),
//!     Arc::new(InMemoryRewardLedger::new()),
//! );
//! pipeline.grant_default_consent("patient123", "research-lab").await?;
//!
//! let bundle = json!({"resourceType": "Bundle", "entry": [
//!     {"resource": {"resourceType": "Patient", "id": "patient123"}}
//! ]});
//! let outcome = pipeline
//!     .contribute("patient123", "research-lab", SourceKind::Hospital, &bundle)
//!     .await?;
//!
//! println!("Entries: {}", outcome.anonymized.entry_count());
//! # Ok(())
//! # }
//! ```

pub mod contribution;

pub use contribution::{ContributionOutcome, ContributionPipeline};
