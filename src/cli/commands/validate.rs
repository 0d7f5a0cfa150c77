//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Veil configuration file, including its mask types.

use super::{EXIT_CONFIG_ERROR, EXIT_SUCCESS};
use crate::config::{load_config, SinkKind, SourceKind, VeilConfig};
use crate::masking::ProviderRegistry;
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

        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        match check_mask_types(&config, &ProviderRegistry::with_builtins()) {
            Ok(()) => {
                println!("✅ Configuration is valid");
                println!();
                print_config_summary(&config);
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(EXIT_CONFIG_ERROR)
            }
        }
    }
}

/// Checks every configured mask type against the registry
pub fn check_mask_types(config: &VeilConfig, registry: &ProviderRegistry) -> crate::domain::Result<()> {
    let specs = config.masking.mask_specs()?;
    config.masking.suppressed_fields()?;
    registry.validate(&specs)
}

fn print_config_summary(config: &VeilConfig) {
    println!("Configuration Summary:");
    println!("  Log Level: {}", config.application.log_level);
    println!("  Dry Run: {}", config.application.dry_run);
    match config.source.kind {
        SourceKind::Files => println!("  Source: files {:?}", config.source.paths),
        SourceKind::Stdin => println!("  Source: stdin"),
    }
    match config.sink.kind {
        SinkKind::Directory => println!("  Sink: directory {}", config.sink.path),
        SinkKind::Stdout => println!("  Sink: stdout"),
    }
    println!("  Mode: {}", config.masking.mode());
    println!("  Batch Size: {}", config.masking.effective_batch_size());
    println!("  Output Format: {}", config.masking.output_format);
    println!("  Masked Fields: {}", config.masking.fields.len());
    for (path, mask_type) in &config.masking.fields {
        println!("    {path} -> {mask_type}");
    }
    if !config.masking.suppress.is_empty() {
        println!("  Suppressed: {:?}", config.masking.suppress);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_mask_types_accepts_builtins() {
        let mut config = VeilConfig::default();
        config.masking.fields.insert("source.ip".to_string(), "ipv4".to_string());
        config.masking.fields.insert("@timestamp".to_string(), "none".to_string());
        assert!(check_mask_types(&config, &ProviderRegistry::with_builtins()).is_ok());
    }

    #[test]
    fn test_check_mask_types_rejects_unknown() {
        let mut config = VeilConfig::default();
        config.masking.fields.insert("source.ip".to_string(), "ipv6".to_string());
        let err = check_mask_types(&config, &ProviderRegistry::with_builtins()).unwrap_err();
        assert!(err.to_string().contains("ipv6"));
    }
}
