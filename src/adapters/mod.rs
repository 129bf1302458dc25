//! Collaborator boundaries for the gateway.
//!
//! The gateway never owns consent or reward state itself. It talks to two
//! external ledgers through narrow traits:
//!
//! - [`consent`] - [`ConsentLedger`]: who may read whose data, and until when
//! - [`rewards`] - [`RewardLedger`]: credit issued to data contributors
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external systems and
//! enable testing with in-memory implementations. Every implementation takes
//! its backing store through its constructor, so two ledgers never share
//! state unless the caller hands them the same store.
//!
//! ```rust
//! use healthgate::adapters::{ConsentLedger, InMemoryConsentLedger};
//!
//! # async fn example() -> healthgate::domain::Result<()> {
//! let ledger = InMemoryConsentLedger::new();
//! ledger.grant("patient123", "research-lab", 30).await?;
//! assert!(ledger.has_consent("patient123", "research-lab").await?);
//! # Ok(())
//! # }
//! ```

pub mod consent;
pub mod rewards;

pub use consent::{ConsentLedger, ConsentStore, InMemoryConsentLedger};
pub use rewards::{
    InMemoryRewardLedger, RewardBalances, RewardLedger, RewardReceipt, SourceKind,
};
