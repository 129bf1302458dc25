//! Contribution pipeline
//!
//! A contribution is one standardized bundle owned by one subject. The
//! pipeline checks that the requester holds consent, anonymizes the bundle
//! with a fresh engine, and credits the subject with one reward point per
//! bundle entry.

use crate::adapters::{ConsentLedger, RewardLedger, RewardReceipt, SourceKind};
use crate::anonymization::{AnonymizationConfig, AnonymizationEngine, AnonymizedBundle};
use crate::config::GatewayConfig;
use crate::domain::{GatewayError, Result};
use serde_json::Value;
use std::sync::Arc;

/// Result of a successful contribution
#[derive(Debug, Clone)]
pub struct ContributionOutcome {
    /// Anonymized bundle and session report
    pub anonymized: AnonymizedBundle,

    /// Reward receipt, `None` when rewards are disabled or nothing was contributed
    pub reward: Option<RewardReceipt>,
}

/// Consent check, anonymization and reward issuance for contributed bundles
pub struct ContributionPipeline {
    consent: Arc<dyn ConsentLedger>,
    rewards: Arc<dyn RewardLedger>,
    anonymization: AnonymizationConfig,
    rewards_enabled: bool,
    default_consent_days: u32,
}

impl ContributionPipeline {
    /// Create a pipeline over the given ledgers
    ///
    /// # Arguments
    ///
    /// * `config` - Gateway configuration (anonymization, consent and reward sections)
    /// * `consent` - Consent ledger
    /// * `rewards` - Reward ledger
    pub fn new(
        config: &GatewayConfig,
        consent: Arc<dyn ConsentLedger>,
        rewards: Arc<dyn RewardLedger>,
    ) -> Self {
        Self {
            consent,
            rewards,
            anonymization: config.anonymization.clone(),
            rewards_enabled: config.rewards.enabled,
            default_consent_days: config.consent.default_duration_days,
        }
    }

    /// Grant `requester` consent over `subject_id` for the configured default duration
    ///
    /// # Errors
    ///
    /// Returns an error if the consent ledger rejects the grant.
    pub async fn grant_default_consent(&self, subject_id: &str, requester: &str) -> Result<()> {
        self.consent
            .grant(subject_id, requester, self.default_consent_days)
            .await
            .map(|_| ())
    }

    /// Process one contributed bundle
    ///
    /// # Arguments
    ///
    /// * `subject_id` - Owner of the data, credited with the reward
    /// * `requester` - Party the anonymized data is released to
    /// * `source_kind` - Where the data came from
    /// * `bundle` - Standardized bundle or single resource
    ///
    /// # Errors
    ///
    /// Returns:
    /// - [`GatewayError::Consent`] if the requester holds no valid consent
    /// - [`GatewayError::Configuration`] if the anonymization settings are invalid
    /// - [`GatewayError::Anonymization`] for a malformed bundle
    /// - [`GatewayError::Reward`] if the reward ledger rejects the issuance
    pub async fn contribute(
        &self,
        subject_id: &str,
        requester: &str,
        source_kind: SourceKind,
        bundle: &Value,
    ) -> Result<ContributionOutcome> {
        if !self.consent.has_consent(subject_id, requester).await? {
            tracing::warn!(source_kind = %source_kind, "Contribution refused: no valid consent");
            return Err(GatewayError::Consent(
                "Requester does not hold valid consent for this subject".to_string(),
            ));
        }

        let mut engine = AnonymizationEngine::new(self.anonymization.clone())
            .map_err(|e| GatewayError::Configuration(format!("{e:#}")))?;
        let anonymized = engine.anonymize_with_report(bundle)?;

        let count = anonymized.entry_count() as u64;
        let reward = if !self.rewards_enabled || count == 0 {
            None
        } else {
            let receipt = self
                .rewards
                .issue_reward(subject_id, source_kind.as_str(), count)
                .await;
            if !receipt.success {
                let reason = receipt
                    .error
                    .unwrap_or_else(|| "reward ledger refused issuance".to_string());
                tracing::error!(source_kind = %source_kind, error = %reason, "Reward issuance failed");
                return Err(GatewayError::Reward(reason));
            }
            Some(receipt)
        };

        tracing::info!(
            source_kind = %source_kind,
            entries = count,
            rewarded = reward.is_some(),
            "Contribution processed"
        );

        Ok(ContributionOutcome { anonymized, reward })
    }
}
