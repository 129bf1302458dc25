//! Domain models and types for the gateway.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Resource vocabulary** ([`ResourceKind`], [`Reference`])
//! - **Error types** ([`GatewayError`], [`AnonymizationError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, GatewayError>`]:
//!
//! ```rust
//! use healthgate::domain::{AnonymizationError, GatewayError, Result};
//!
//! fn example() -> Result<()> {
//!     Err(AnonymizationError::MalformedBundle("not an object".to_string()).into())
//! }
//!
//! assert!(matches!(example(), Err(GatewayError::Anonymization(_))));
//! ```

pub mod errors;
pub mod ids;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{AnonymizationError, GatewayError};
pub use ids::{Reference, ResourceKind};
pub use result::Result;
