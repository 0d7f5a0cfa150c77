//! Configuration management for Veil.
//!
//! This module provides TOML-based configuration loading, parsing, and
//! validation.
//!
//! # Overview
//!
//! Veil uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `VEIL_*` environment overrides
//! - Default values for optional settings
//! - Validation before any document is read
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use veil::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("veil.toml")?;
//!
//! println!("Include rest: {}", config.masking.include_rest);
//! println!("Batch size: {}", config.masking.effective_batch_size());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level and dry-run flag
//! - [`SourceConfig`] - Where documents come from
//! - [`SinkConfig`] - Where masked batches go
//! - [`MaskingConfig`] - Field specs, suppression, batching, output format
//! - [`LoggingConfig`] - Optional JSON file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [source]
//! kind = "files"
//! paths = ["./logs"]
//!
//! [sink]
//! kind = "directory"
//! path = "${VEIL_OUTPUT_DIR}"
//!
//! [masking]
//! include_rest = true
//! suppress = ["user.name"]
//!
//! [masking.fields]
//! "source.ip" = "ipv4"
//! "source.geo" = "geo_point"
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, LoggingConfig, MaskingConfig, SinkConfig, SinkKind, SourceConfig,
    SourceKind, VeilConfig,
};
