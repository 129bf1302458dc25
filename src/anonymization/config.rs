//! Anonymization configuration

use crate::config::{secret_string, SecretString};
use anyhow::{Context, Result};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Anonymization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizationConfig {
    /// Salt mixed into every digest. When unset, each engine instance draws
    /// a fresh random salt, so output is only reproducible across instances
    /// if the same salt is supplied explicitly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<SecretString>,

    /// Shift birth dates within the same year instead of removing them
    #[serde(default = "default_true")]
    pub preserve_age: bool,

    /// Accepted for compatibility; gender fields pass through unchanged
    #[serde(default = "default_true")]
    pub preserve_gender: bool,

    /// Audit logging configuration
    #[serde(default)]
    pub audit: AuditConfig,
}

fn default_true() -> bool {
    true
}

impl Default for AnonymizationConfig {
    fn default() -> Self {
        Self {
            salt: None,
            preserve_age: true,
            preserve_gender: true,
            audit: AuditConfig::default(),
        }
    }
}

impl AnonymizationConfig {
    /// Configuration with an explicit salt and default flags
    pub fn with_salt(salt: impl Into<String>) -> Self {
        Self {
            salt: Some(secret_string(salt.into())),
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(ref salt) = self.salt {
            if salt.expose_secret().is_blank() {
                anyhow::bail!("Anonymization salt must not be empty when set");
            }
        }

        self.audit.validate().context("Invalid audit configuration")?;

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("HEALTHGATE_ANONYMIZATION_SALT") {
            self.salt = Some(secret_string(val));
        }

        if let Ok(val) = std::env::var("HEALTHGATE_ANONYMIZATION_PRESERVE_AGE") {
            self.preserve_age = val
                .parse()
                .context("Invalid HEALTHGATE_ANONYMIZATION_PRESERVE_AGE value")?;
        }

        if let Ok(val) = std::env::var("HEALTHGATE_ANONYMIZATION_PRESERVE_GENDER") {
            self.preserve_gender = val
                .parse()
                .context("Invalid HEALTHGATE_ANONYMIZATION_PRESERVE_GENDER value")?;
        }

        self.audit.apply_env_overrides()?;

        Ok(())
    }
}

/// Audit logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Enable audit logging
    #[serde(default)]
    pub enabled: bool,

    /// Audit log file path
    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,

    /// Use JSON format for audit logs
    #[serde(default = "default_true")]
    pub json_format: bool,
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("./audit/anonymization.log")
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: default_audit_log_path(),
            json_format: true,
        }
    }
}

impl AuditConfig {
    /// Validate audit configuration
    pub fn validate(&self) -> Result<()> {
        if self.enabled && self.log_path.as_os_str().is_empty() {
            anyhow::bail!("Audit logging enabled but log_path is empty");
        }
        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("HEALTHGATE_ANONYMIZATION_AUDIT_ENABLED") {
            self.enabled = val
                .parse()
                .context("Invalid HEALTHGATE_ANONYMIZATION_AUDIT_ENABLED value")?;
        }

        if let Ok(val) = std::env::var("HEALTHGATE_ANONYMIZATION_AUDIT_LOG_PATH") {
            self.log_path = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("HEALTHGATE_ANONYMIZATION_AUDIT_JSON_FORMAT") {
            self.json_format = val
                .parse()
                .context("Invalid HEALTHGATE_ANONYMIZATION_AUDIT_JSON_FORMAT value")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnonymizationConfig::default();
        assert!(config.salt.is_none());
        assert!(config.preserve_age);
        assert!(config.preserve_gender);
        assert!(!config.audit.enabled);
        assert!(config.audit.json_format);
    }

    #[test]
    fn test_config_validation() {
        assert!(AnonymizationConfig::default().validate().is_ok());
        assert!(AnonymizationConfig::with_salt("pepper").validate().is_ok());
        assert!(AnonymizationConfig::with_salt("   ").validate().is_err());
    }

    #[test]
    fn test_audit_validation() {
        let mut config = AnonymizationConfig::default();
        config.audit.enabled = true;
        config.audit.log_path = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_defaults() {
        let config: AnonymizationConfig = toml::from_str("preserve_age = false").unwrap();
        assert!(!config.preserve_age);
        assert!(config.preserve_gender);
        assert!(config.salt.is_none());
    }
}
