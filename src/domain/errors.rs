//! Domain error types
//!
//! This module defines the error hierarchy for the gateway.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main gateway error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Anonymization-related errors
    #[error("Anonymization error: {0}")]
    Anonymization(#[from] AnonymizationError),

    /// Consent was missing, expired or could not be recorded
    #[error("Consent error: {0}")]
    Consent(String),

    /// Reward issuance errors
    #[error("Reward error: {0}")]
    Reward(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Anonymization-specific errors
///
/// Only structurally invalid top-level input is fatal. Field-level problems
/// (wrong shapes, unknown references, unparseable dates) are recovered inside
/// the engine and show up in the session report instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnonymizationError {
    /// Top-level input is not a recognizable bundle or resource
    #[error("Malformed bundle: {0}")]
    MalformedBundle(String),
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for GatewayError {
    fn from(err: std::io::Error) -> Self {
        GatewayError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_error_display() {
        let err = GatewayError::Configuration("missing salt".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing salt");
    }

    #[test]
    fn test_anonymization_error_conversion() {
        let err: GatewayError =
            AnonymizationError::MalformedBundle("expected a JSON object".to_string()).into();
        assert!(matches!(
            err,
            GatewayError::Anonymization(AnonymizationError::MalformedBundle(_))
        ));
        assert_eq!(
            err.to_string(),
            "Anonymization error: Malformed bundle: expected a JSON object"
        );
    }

    #[test]
    fn test_serde_error_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: GatewayError = parse_err.into();
        assert!(matches!(err, GatewayError::Serialization(_)));
    }
}
