//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use super::{EXIT_CONFIG_ERROR, EXIT_FATAL, EXIT_SUCCESS};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "veil.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Veil configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG_ERROR);
        }

        match fs::write(&self.output, sample_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your input paths and fields", self.output);
                println!("  2. List available mask types: veil providers");
                println!("  3. Validate configuration: veil validate-config");
                println!("  4. Run: veil mask");
                println!();
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(EXIT_FATAL)
            }
        }
    }
}

/// Sample configuration written by `veil init`
pub fn sample_config() -> &'static str {
    r#"# Veil Configuration File
# Consistent field masking for semi-structured documents

[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# Mask and count documents without writing them
dry_run = false

[source]
# files | stdin
kind = "files"

# NDJSON files, or directories whose *.json / *.ndjson files are read in order
paths = ["./input"]

[sink]
# directory | stdout
kind = "directory"
path = "./masked"

# Batch files are named <file_prefix>-<n>.json
file_prefix = "documents"

[masking]
# true: keep every field and mask configured ones in place
# false: emit only the configured fields
include_rest = true

# Documents per batch (defaults to 10000, or 100000 with include_rest = false)
# batch_size = 10000

# ndjson | bulk
output_format = "ndjson"
# bulk_index = "masked"   # required for bulk output

# Fields removed from every document
suppress = []

# Field path -> mask type. Use "none" to copy a field unmasked.
# Run `veil providers` for the list of mask types.
[masking.fields]
"source.ip" = "ipv4"
"source.geo" = "geo_point"
"user.name" = "username"
"log.file.path" = "file_path"
"service.name" = "service"
"message" = "message"
"@timestamp" = "none"

[logging]
local_enabled = false
local_path = "./logs"
# daily | hourly | never
local_rotation = "daily"
"#
}
