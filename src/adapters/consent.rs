//! Consent ledger boundary
//!
//! A consent record grants one requester access to one subject's data until
//! an expiry timestamp. Revocation does not delete the record; it moves the
//! expiry into the past, so the ledger keeps a trace of every grant.

use crate::domain::{GatewayError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared backing store for [`InMemoryConsentLedger`]
///
/// Keyed by `(subject_id, requester)`; the value is the expiry timestamp.
pub type ConsentStore = Arc<RwLock<HashMap<(String, String), DateTime<Utc>>>>;

/// Consent ledger trait
///
/// This trait defines the interface to the external consent ledger. The
/// gateway only ever asks whether consent is currently valid, grants it for
/// a number of days, or revokes it.
#[async_trait]
pub trait ConsentLedger: Send + Sync {
    /// Check whether `requester` currently holds valid consent for `subject_id`
    ///
    /// # Returns
    ///
    /// Returns `Ok(true)` if a grant exists and has not expired, `Ok(false)`
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be queried.
    async fn has_consent(&self, subject_id: &str, requester: &str) -> Result<bool>;

    /// Grant consent for `duration_days` days from now
    ///
    /// Re-granting replaces the previous expiry.
    ///
    /// # Returns
    ///
    /// Returns the new expiry timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] for an empty subject or requester
    /// or a zero duration.
    async fn grant(
        &self,
        subject_id: &str,
        requester: &str,
        duration_days: u32,
    ) -> Result<DateTime<Utc>>;

    /// Revoke previously granted consent
    ///
    /// # Returns
    ///
    /// Returns `Ok(false)` if there was no grant to revoke.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be updated.
    async fn revoke(&self, subject_id: &str, requester: &str) -> Result<bool>;

    /// Expiry of the grant, if any grant (valid or expired) exists
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be queried.
    async fn expiration(&self, subject_id: &str, requester: &str)
        -> Result<Option<DateTime<Utc>>>;
}

/// In-memory consent ledger
pub struct InMemoryConsentLedger {
    store: ConsentStore,
}

impl InMemoryConsentLedger {
    /// Create a ledger with its own empty store
    pub fn new() -> Self {
        Self::with_store(ConsentStore::default())
    }

    /// Create a ledger backed by an existing store
    ///
    /// # Arguments
    ///
    /// * `store` - Store shared with whoever else should observe the grants
    pub fn with_store(store: ConsentStore) -> Self {
        Self { store }
    }

    fn key(subject_id: &str, requester: &str) -> (String, String) {
        (subject_id.to_string(), requester.to_string())
    }
}

impl Default for InMemoryConsentLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConsentLedger for InMemoryConsentLedger {
    async fn has_consent(&self, subject_id: &str, requester: &str) -> Result<bool> {
        let store = self.store.read().await;
        let valid = store
            .get(&Self::key(subject_id, requester))
            .is_some_and(|expiry| *expiry > Utc::now());
        Ok(valid)
    }

    async fn grant(
        &self,
        subject_id: &str,
        requester: &str,
        duration_days: u32,
    ) -> Result<DateTime<Utc>> {
        if subject_id.trim().is_empty() || requester.trim().is_empty() {
            return Err(GatewayError::Validation(
                "Consent requires a subject and a requester".to_string(),
            ));
        }
        if duration_days == 0 {
            return Err(GatewayError::Validation(
                "Consent duration must be at least one day".to_string(),
            ));
        }

        let expiry = Utc::now() + Duration::days(i64::from(duration_days));
        self.store
            .write()
            .await
            .insert(Self::key(subject_id, requester), expiry);

        tracing::info!(duration_days, "Consent granted");
        Ok(expiry)
    }

    async fn revoke(&self, subject_id: &str, requester: &str) -> Result<bool> {
        let mut store = self.store.write().await;
        match store.get_mut(&Self::key(subject_id, requester)) {
            Some(expiry) => {
                *expiry = Utc::now() - Duration::seconds(1);
                tracing::info!("Consent revoked");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn expiration(
        &self,
        subject_id: &str,
        requester: &str,
    ) -> Result<Option<DateTime<Utc>>> {
        let store = self.store.read().await;
        Ok(store.get(&Self::key(subject_id, requester)).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_grant_means_no_consent() {
        let ledger = InMemoryConsentLedger::new();
        assert!(!ledger.has_consent("patient123", "lab").await.unwrap());
        assert!(ledger.expiration("patient123", "lab").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_grant_and_check() {
        let ledger = InMemoryConsentLedger::new();
        let expiry = ledger.grant("patient123", "lab", 30).await.unwrap();

        assert!(expiry > Utc::now() + Duration::days(29));
        assert!(ledger.has_consent("patient123", "lab").await.unwrap());
        assert!(!ledger.has_consent("patient123", "other-lab").await.unwrap());
        assert!(!ledger.has_consent("patient456", "lab").await.unwrap());
    }

    #[tokio::test]
    async fn test_revoke_moves_expiry_into_past() {
        let ledger = InMemoryConsentLedger::new();
        ledger.grant("patient123", "lab", 7).await.unwrap();

        assert!(ledger.revoke("patient123", "lab").await.unwrap());
        assert!(!ledger.has_consent("patient123", "lab").await.unwrap());

        let expiry = ledger.expiration("patient123", "lab").await.unwrap();
        assert!(expiry.is_some_and(|e| e < Utc::now()));
    }

    #[tokio::test]
    async fn test_revoke_without_grant() {
        let ledger = InMemoryConsentLedger::new();
        assert!(!ledger.revoke("patient123", "lab").await.unwrap());
    }

    #[tokio::test]
    async fn test_grant_rejects_invalid_input() {
        let ledger = InMemoryConsentLedger::new();
        assert!(matches!(
            ledger.grant("", "lab", 30).await,
            Err(GatewayError::Validation(_))
        ));
        assert!(matches!(
            ledger.grant("patient123", " ", 30).await,
            Err(GatewayError::Validation(_))
        ));
        assert!(matches!(
            ledger.grant("patient123", "lab", 0).await,
            Err(GatewayError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_expired_grant_is_invalid() {
        let store = ConsentStore::default();
        store.write().await.insert(
            ("patient123".to_string(), "lab".to_string()),
            Utc::now() - Duration::days(1),
        );

        let ledger = InMemoryConsentLedger::with_store(store);
        assert!(!ledger.has_consent("patient123", "lab").await.unwrap());
    }

    #[tokio::test]
    async fn test_ledgers_share_injected_store() {
        let store = ConsentStore::default();
        let writer = InMemoryConsentLedger::with_store(Arc::clone(&store));
        let reader = InMemoryConsentLedger::with_store(store);

        writer.grant("patient123", "lab", 1).await.unwrap();
        assert!(reader.has_consent("patient123", "lab").await.unwrap());

        let isolated = InMemoryConsentLedger::new();
        assert!(!isolated.has_consent("patient123", "lab").await.unwrap());
    }
}
