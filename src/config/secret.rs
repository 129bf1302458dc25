//! Secure salt handling using the secrecy crate
//!
//! The anonymization salt is what makes synthetic values unguessable, so it
//! is held the same way credentials are: zeroed on drop, redacted in `Debug`,
//! and only readable through an explicit `expose_secret()`.
//!
//! # Example
//!
//! ```rust
//! use healthgate::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let salt = secret_string("session-salt".to_string());
//! assert_eq!(salt.expose_secret().as_ref(), "session-salt");
//! println!("{:?}", salt); // Prints: Secret([REDACTED ...])
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// Newtype wrapper for String that implements the required traits for Secret
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    /// Check if the secret value is empty or whitespace
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// A secret string: zeroed on drop, redacted in `Debug`
pub type SecretString = Secret<SecretValue>;

/// Wraps a String as a [`SecretString`]
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_secret_string_creation() {
        let secret = secret_string("salt-value".to_string());
        assert_eq!(secret.expose_secret(), "salt-value");
        assert!(!secret.expose_secret().is_blank());
        assert!(secret_string("  ".to_string()).expose_secret().is_blank());
    }

    #[test]
    fn test_secret_debug_redacted() {
        let secret = secret_string("sensitive-salt".to_string());
        let debug_output = format!("{secret:?}");

        assert!(!debug_output.contains("sensitive-salt"));
        assert!(debug_output.contains("REDACTED") || debug_output.contains("Secret"));
    }

    #[test]
    fn test_secret_serde() {
        #[derive(Serialize, Deserialize)]
        struct TestConfig {
            salt: SecretString,
        }

        let config = TestConfig {
            salt: secret_string("pepper".to_string()),
        };

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("pepper"));

        let deserialized: TestConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.salt.expose_secret(), "pepper");
    }
}
