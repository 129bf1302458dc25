//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the gateway configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Loading runs substitution, overrides and validation
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(2); // Configuration error exit code
            }
        };

        let anonymization = &config.anonymization;

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Application: {}", config.application.name);
        println!("  Log Level: {}", config.application.log_level);
        println!(
            "  Salt: {}",
            if anonymization.salt.is_some() {
                "configured"
            } else {
                "not set (random per run)"
            }
        );
        println!("  Preserve Age: {}", anonymization.preserve_age);
        println!("  Preserve Gender: {}", anonymization.preserve_gender);
        if anonymization.audit.enabled {
            println!("  Audit Log: {}", anonymization.audit.log_path.display());
        } else {
            println!("  Audit Log: disabled");
        }
        println!(
            "  Consent Duration: {} days",
            config.consent.default_duration_days
        );
        println!("  Rewards: {}", config.rewards.enabled);
        if config.logging.local_enabled {
            println!(
                "  Log Files: {} ({})",
                config.logging.local_path, config.logging.local_rotation
            );
        }
        println!();
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_validate_valid_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("healthgate.toml");
        std::fs::write(&path, "[anonymization]\nsalt = \"pepper\"\n").unwrap();

        let code = ValidateArgs {}.execute(&path.to_string_lossy()).await.unwrap();
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_validate_invalid_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("healthgate.toml");
        std::fs::write(&path, "[consent]\ndefault_duration_days = 0\n").unwrap();

        let code = ValidateArgs {}.execute(&path.to_string_lossy()).await.unwrap();
        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn test_validate_missing_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");

        let code = ValidateArgs {}.execute(&path.to_string_lossy()).await.unwrap();
        assert_eq!(code, 2);
    }
}
