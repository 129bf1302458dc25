//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for the gateway using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// HealthData Gateway - deterministic clinical bundle anonymization
#[derive(Parser, Debug)]
#[command(name = "healthgate")]
#[command(version, about, long_about = None)]
#[command(author = "HealthData Gateway Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "healthgate.toml", env = "HEALTHGATE_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "HEALTHGATE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Anonymize a bundle or a single resource
    Anonymize(commands::anonymize::AnonymizeArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_anonymize() {
        let cli = Cli::parse_from(["healthgate", "anonymize", "--input", "bundle.json"]);
        assert_eq!(cli.config, "healthgate.toml");
        match cli.command {
            Commands::Anonymize(args) => {
                assert_eq!(args.input, "bundle.json");
                assert!(args.output.is_none());
                assert!(!args.no_preserve_age);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_anonymize_flags() {
        let cli = Cli::parse_from([
            "healthgate",
            "anonymize",
            "-i",
            "-",
            "-o",
            "out.json",
            "--salt",
            "pepper",
            "--no-preserve-age",
            "--no-preserve-gender",
            "--report",
        ]);
        match cli.command {
            Commands::Anonymize(args) => {
                assert_eq!(args.input, "-");
                assert_eq!(args.output.as_deref(), Some("out.json"));
                assert_eq!(args.salt.as_deref(), Some("pepper"));
                assert!(args.no_preserve_age);
                assert!(args.no_preserve_gender);
                assert!(args.report);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_anonymize_requires_input() {
        assert!(Cli::try_parse_from(["healthgate", "anonymize"]).is_err());
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["healthgate", "--config", "custom.toml", "validate-config"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["healthgate", "--log-level", "debug", "validate-config"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["healthgate", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["healthgate", "init", "--force"]);
        assert!(matches!(cli.command, Commands::Init(ref args) if args.force));
    }
}
