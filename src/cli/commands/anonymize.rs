//! Anonymize command implementation
//!
//! This module implements the `anonymize` command, which reads a bundle or a
//! single resource as JSON and writes its anonymized copy.

use crate::anonymization::{AnonymizationConfig, AnonymizationEngine};
use crate::config::{load_config, secret_string};
use crate::domain::GatewayError;
use clap::Args;
use serde_json::Value;
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Arguments for the anonymize command
#[derive(Args, Debug)]
pub struct AnonymizeArgs {
    /// Input JSON file, or `-` for stdin
    #[arg(short, long)]
    pub input: String,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Salt for this run (overrides the configured salt)
    #[arg(long)]
    pub salt: Option<String>,

    /// Remove birth dates instead of shifting them
    #[arg(long)]
    pub no_preserve_age: bool,

    /// Clear the preserve_gender flag
    #[arg(long)]
    pub no_preserve_gender: bool,

    /// Print the session report to stderr
    #[arg(long)]
    pub report: bool,

    /// Write the session report as JSON to this file
    #[arg(long, value_name = "FILE")]
    pub report_file: Option<String>,
}

impl AnonymizeArgs {
    /// Execute the anonymize command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(input = %self.input, "Starting anonymize command");

        let mut config = match self.load_anonymization_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load configuration");
                eprintln!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        // Apply CLI overrides
        if let Some(ref salt) = self.salt {
            config.salt = Some(secret_string(salt.clone()));
        }
        if self.no_preserve_age {
            config.preserve_age = false;
        }
        if self.no_preserve_gender {
            config.preserve_gender = false;
        }

        if config.salt.is_none() {
            eprintln!("⚠️  No salt configured; synthetic values will differ on every run");
        }

        let mut engine = match AnonymizationEngine::new(config) {
            Ok(engine) => engine,
            Err(e) => {
                eprintln!("❌ Invalid anonymization settings");
                eprintln!("   Error: {e:#}");
                return Ok(2); // Configuration error exit code
            }
        };

        let raw = match self.read_input().await {
            Ok(raw) => raw,
            Err(e) => {
                eprintln!("❌ Failed to read input {}", self.input);
                eprintln!("   Error: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        let input: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                eprintln!("❌ Input is not valid JSON");
                eprintln!("   Error: {e}");
                return Ok(3); // Malformed input exit code
            }
        };

        let result = match engine.anonymize_with_report(&input) {
            Ok(result) => result,
            Err(GatewayError::Anonymization(e)) => {
                eprintln!("❌ {e}");
                return Ok(3); // Malformed input exit code
            }
            Err(e) => return Err(e.into()),
        };

        let rendered = serde_json::to_string_pretty(&result.data)?;
        match self.output {
            Some(ref path) => {
                tokio::fs::write(path, format!("{rendered}\n")).await?;
                eprintln!(
                    "✅ Anonymized {} entries into {}",
                    result.entry_count(),
                    path
                );
            }
            None => println!("{rendered}"),
        }

        if self.report {
            eprintln!();
            eprintln!("{}", result.report.format_console());
        }

        if let Some(ref path) = self.report_file {
            result.report.write_to_file(Path::new(path))?;
            tracing::info!(report_file = %path, "Report written");
        }

        Ok(0)
    }

    /// Anonymization settings from the config file, or defaults when there is none
    fn load_anonymization_config(&self, config_path: &str) -> anyhow::Result<AnonymizationConfig> {
        if Path::new(config_path).exists() {
            return Ok(load_config(config_path)?.anonymization);
        }

        tracing::debug!(config_path = %config_path, "No configuration file, using defaults");
        let mut config = AnonymizationConfig::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    async fn read_input(&self) -> std::io::Result<String> {
        if self.input == "-" {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            Ok(buf)
        } else {
            tokio::fs::read_to_string(&self.input).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn args(input: &Path, output: &Path) -> AnonymizeArgs {
        AnonymizeArgs {
            input: input.to_string_lossy().to_string(),
            output: Some(output.to_string_lossy().to_string()),
            salt: Some("cli-test-salt".to_string()),
            no_preserve_age: false,
            no_preserve_gender: false,
            report: false,
            report_file: None,
        }
    }

    fn missing_config(dir: &TempDir) -> String {
        dir.path().join("absent.toml").to_string_lossy().to_string()
    }

    #[tokio::test]
    async fn test_anonymize_file_to_file() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("bundle.json");
        let output = dir.path().join("out.json");
        let bundle = json!({
            "resourceType": "Bundle",
            "entry": [
                {"resource": {"resourceType": "Patient", "id": "p1", "birthDate": "1980-06-15"}},
                {"resource": {"resourceType": "Observation", "id": "o1",
                              "subject": {"reference": "Patient/p1"}}}
            ]
        });
        std::fs::write(&input, bundle.to_string()).unwrap();

        let mut args = args(&input, &output);
        args.no_preserve_age = true;
        args.report_file = Some(dir.path().join("report.json").to_string_lossy().to_string());

        let code = args.execute(&missing_config(&dir)).await.unwrap();
        assert_eq!(code, 0);

        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        let patient_id = written["entry"][0]["resource"]["id"].as_str().unwrap();
        assert!(patient_id.starts_with("ID-"));
        assert!(written["entry"][0]["resource"].get("birthDate").is_none());
        assert_eq!(
            written["entry"][1]["resource"]["subject"]["reference"],
            format!("Patient/{patient_id}")
        );

        let report = std::fs::read_to_string(dir.path().join("report.json")).unwrap();
        assert!(report.contains("\"references_rewritten\": 1"));
    }

    #[tokio::test]
    async fn test_invalid_json_exits_3() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("bundle.json");
        std::fs::write(&input, "{not json").unwrap();

        let code = args(&input, &dir.path().join("out.json"))
            .execute(&missing_config(&dir))
            .await
            .unwrap();
        assert_eq!(code, 3);
    }

    #[tokio::test]
    async fn test_malformed_bundle_exits_3() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("bundle.json");
        std::fs::write(&input, r#"{"resourceType": "Bundle", "entry": {}}"#).unwrap();

        let output = dir.path().join("out.json");
        let code = args(&input, &output)
            .execute(&missing_config(&dir))
            .await
            .unwrap();
        assert_eq!(code, 3);
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_missing_input_exits_5() {
        let dir = TempDir::new().unwrap();
        let code = args(&dir.path().join("nope.json"), &dir.path().join("out.json"))
            .execute(&missing_config(&dir))
            .await
            .unwrap();
        assert_eq!(code, 5);
    }

    #[tokio::test]
    async fn test_invalid_config_exits_2() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("healthgate.toml");
        std::fs::write(&config_path, "[application]\nlog_level = \"loud\"\n").unwrap();
        let input = dir.path().join("bundle.json");
        std::fs::write(&input, r#"{"resourceType": "Bundle"}"#).unwrap();

        let code = args(&input, &dir.path().join("out.json"))
            .execute(&config_path.to_string_lossy())
            .await
            .unwrap();
        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn test_same_salt_same_output() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("patient.json");
        std::fs::write(
            &input,
            r#"{"resourceType": "Patient", "id": "p1", "name": [{"family": "Smith"}]}"#,
        )
        .unwrap();

        let first = dir.path().join("first.json");
        let second = dir.path().join("second.json");
        assert_eq!(args(&input, &first).execute(&missing_config(&dir)).await.unwrap(), 0);
        assert_eq!(args(&input, &second).execute(&missing_config(&dir)).await.unwrap(), 0);

        assert_eq!(
            std::fs::read_to_string(first).unwrap(),
            std::fs::read_to_string(second).unwrap()
        );
    }
}
