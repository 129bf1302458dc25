//! Reward ledger boundary

use crate::domain::{GatewayError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Kind of source a contribution came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Hospital records
    Hospital,
    /// Pharmacy dispensing records
    Pharmacy,
    /// Wearable device readings
    Wearable,
}

impl SourceKind {
    /// Every accepted source kind
    pub const ALL: [SourceKind; 3] = [Self::Hospital, Self::Pharmacy, Self::Wearable];

    /// Lowercase name used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hospital => "hospital",
            Self::Pharmacy => "pharmacy",
            Self::Wearable => "wearable",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                GatewayError::Validation(format!(
                    "Invalid source kind '{s}'. Must be one of: hospital, pharmacy, wearable"
                ))
            })
    }
}

/// Outcome of a reward issuance
///
/// Issuance failures are reported in-band: `success` is false and `error`
/// says why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardReceipt {
    /// Whether the reward was recorded
    pub success: bool,

    /// Ledger receipt for a recorded reward
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<String>,

    /// Points credited
    pub reward_points: u64,

    /// Reason a reward was not recorded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RewardReceipt {
    /// Receipt for a recorded reward
    pub fn issued(receipt: impl Into<String>, reward_points: u64) -> Self {
        Self {
            success: true,
            receipt: Some(receipt.into()),
            reward_points,
            error: None,
        }
    }

    /// Receipt for a rejected reward
    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: false,
            receipt: None,
            reward_points: 0,
            error: Some(error.into()),
        }
    }
}

/// Shared per-user balances for [`InMemoryRewardLedger`]
pub type RewardBalances = Arc<RwLock<HashMap<String, u64>>>;

/// Reward ledger trait
///
/// This trait defines the interface to the external reward ledger that
/// credits users for contributed data points.
#[async_trait]
pub trait RewardLedger: Send + Sync {
    /// Issue a reward of `count` points to `user_id`
    ///
    /// # Arguments
    ///
    /// * `user_id` - Contributor to credit
    /// * `source_kind` - `hospital`, `pharmacy` or `wearable`
    /// * `count` - Number of contributed data points
    ///
    /// # Returns
    ///
    /// A receipt with `success = false` for an empty user, a zero count or
    /// an unknown source kind.
    async fn issue_reward(&self, user_id: &str, source_kind: &str, count: u64) -> RewardReceipt;

    /// Total points credited to `user_id`
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] for an empty user id.
    async fn balance(&self, user_id: &str) -> Result<u64>;
}

/// In-memory reward ledger
pub struct InMemoryRewardLedger {
    balances: RewardBalances,
}

impl InMemoryRewardLedger {
    /// Create a ledger with its own empty balances
    pub fn new() -> Self {
        Self::with_balances(RewardBalances::default())
    }

    /// Create a ledger backed by existing balances
    pub fn with_balances(balances: RewardBalances) -> Self {
        Self { balances }
    }
}

impl Default for InMemoryRewardLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RewardLedger for InMemoryRewardLedger {
    async fn issue_reward(&self, user_id: &str, source_kind: &str, count: u64) -> RewardReceipt {
        if user_id.is_empty() {
            return RewardReceipt::rejected("User ID cannot be empty");
        }
        if count == 0 {
            return RewardReceipt::rejected("Data points must be greater than zero");
        }
        let kind = match source_kind.parse::<SourceKind>() {
            Ok(kind) => kind,
            Err(e) => return RewardReceipt::rejected(e.to_string()),
        };

        let mut balances = self.balances.write().await;
        let balance = balances.entry(user_id.to_string()).or_insert(0);
        *balance = balance.saturating_add(count);

        let receipt = format!("rcpt-{}", uuid::Uuid::new_v4());
        tracing::info!(source_kind = %kind, points = count, "Reward issued");

        RewardReceipt::issued(receipt, count)
    }

    async fn balance(&self, user_id: &str) -> Result<u64> {
        if user_id.is_empty() {
            return Err(GatewayError::Validation(
                "User ID cannot be empty".to_string(),
            ));
        }
        Ok(self
            .balances
            .read()
            .await
            .get(user_id)
            .copied()
            .unwrap_or(0))
    }
}
