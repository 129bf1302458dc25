//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::GatewayConfig;
use crate::domain::errors::GatewayError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into GatewayConfig
/// 4. Applies environment variable overrides (HEALTHGATE_* prefix)
/// 5. Validates the configuration
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use healthgate::config::loader::load_config;
///
/// let config = load_config("healthgate.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<GatewayConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(GatewayError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        GatewayError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration text, applying the same steps as [`load_config`]
///
/// # Errors
///
/// Returns an error if substitution, parsing or validation fails.
pub fn parse_config(contents: &str) -> Result<GatewayConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: GatewayConfig = toml::from_str(&contents)
        .map_err(|e| GatewayError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        GatewayError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied through untouched. Line structure, including a
/// trailing newline, is preserved.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| GatewayError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let processed = re.replace_all(line, |cap: &regex::Captures<'_>| {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    cap[0].to_string()
                }
            }
        });
        lines.push(processed.into_owned());
    }

    if !missing_vars.is_empty() {
        return Err(GatewayError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    let mut result = lines.join("\n");
    if input.ends_with('\n') {
        result.push('\n');
    }
    Ok(result)
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| GatewayError::Configuration(format!("Invalid {name} value: '{value}'")))
}

/// Applies environment variable overrides using HEALTHGATE_* prefix
///
/// Environment variables follow the pattern: HEALTHGATE_<SECTION>_<KEY>
/// For example: HEALTHGATE_APPLICATION_LOG_LEVEL, HEALTHGATE_ANONYMIZATION_SALT
///
/// # Arguments
///
/// * `config` - Mutable reference to the configuration to update
fn apply_env_overrides(config: &mut GatewayConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("HEALTHGATE_APPLICATION_NAME") {
        config.application.name = val;
    }
    if let Ok(val) = std::env::var("HEALTHGATE_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Anonymization overrides
    config
        .anonymization
        .apply_env_overrides()
        .map_err(|e| GatewayError::Configuration(format!("{e:#}")))?;

    // Consent overrides
    if let Ok(val) = std::env::var("HEALTHGATE_CONSENT_DEFAULT_DURATION_DAYS") {
        config.consent.default_duration_days =
            parse_env("HEALTHGATE_CONSENT_DEFAULT_DURATION_DAYS", &val)?;
    }

    // Rewards overrides
    if let Ok(val) = std::env::var("HEALTHGATE_REWARDS_ENABLED") {
        config.rewards.enabled = parse_env("HEALTHGATE_REWARDS_ENABLED", &val)?;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("HEALTHGATE_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_env("HEALTHGATE_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Ok(val) = std::env::var("HEALTHGATE_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("HEALTHGATE_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}
