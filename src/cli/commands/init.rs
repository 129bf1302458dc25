//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "healthgate.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing HealthData Gateway configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Set HEALTHGATE_SALT in your environment or a .env file");
                println!("  2. Validate configuration: healthgate validate-config");
                println!("  3. Anonymize a bundle: healthgate anonymize --input bundle.json");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Sample configuration with every section and its defaults
    fn generate_config() -> String {
        r#"# HealthData Gateway Configuration File

[application]
name = "healthgate"

# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Anonymization
# ============================================================================
[anonymization]
# Salt mixed into every synthetic value. The same salt always produces the
# same synthetic values, which keeps datasets linkable across runs. Without a
# salt every run draws a random one.
salt = "${HEALTHGATE_SALT}"

# Shift birth dates by up to 30 days within the same year (true) or remove
# them (false)
preserve_age = true

# Gender is never rewritten; kept for compatibility with existing configs
preserve_gender = true

[anonymization.audit]
# Append one line per anonymized bundle: hashed bundle id and counts only
enabled = false
log_path = "./audit/anonymization.log"
json_format = true

# ============================================================================
# Collaborators
# ============================================================================
[consent]
# Validity of a consent grant, in days
default_duration_days = 30

[rewards]
# Credit contributors with one point per bundle entry
enabled = true

# ============================================================================
# Logging
# ============================================================================
[logging]
# JSON log files in addition to console output
local_enabled = false
local_path = "./logs"

# Rotation (daily, hourly, never)
local_rotation = "daily"
"#
        .to_string()
    }
}
