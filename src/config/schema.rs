//! Configuration schema types
//!
//! This module defines the configuration structure for Veil.

use crate::domain::{MaskSpecs, SuppressedFieldSet};
use crate::masking::MaskMode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Largest accepted batch size
pub const MAX_BATCH_SIZE: usize = 1_000_000;

/// Where documents are read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Newline-delimited JSON files or directories of them
    #[default]
    Files,
    /// Newline-delimited JSON on standard input
    Stdin,
}

/// Where masked batches are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// One file per batch in a directory
    #[default]
    Directory,
    /// Standard output
    Stdout,
}

/// Main Veil configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VeilConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Document source
    #[serde(default)]
    pub source: SourceConfig,

    /// Output sink
    #[serde(default)]
    pub sink: SinkConfig,

    /// Masking rules
    #[serde(default)]
    pub masking: MaskingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl VeilConfig {
    /// Validates the configuration
    ///
    /// Mask type names are not checked here; that needs the provider
    /// registry and happens when the run is built.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.source.validate()?;
        self.sink.validate()?;
        self.masking.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (transform and count, write nothing)
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

/// Document source configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Source kind (files or stdin)
    #[serde(default)]
    pub kind: SourceKind,

    /// Input files or directories (files kind only)
    #[serde(default)]
    pub paths: Vec<String>,
}

impl SourceConfig {
    fn validate(&self) -> Result<(), String> {
        if self.kind == SourceKind::Files {
            if self.paths.is_empty() {
                return Err("source.paths cannot be empty when source.kind = 'files'".to_string());
            }
            if self.paths.iter().any(|p| p.trim().is_empty()) {
                return Err("source.paths cannot contain empty entries".to_string());
            }
        }
        Ok(())
    }
}

/// Output sink configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Sink kind (directory or stdout)
    #[serde(default)]
    pub kind: SinkKind,

    /// Output directory (directory kind only)
    #[serde(default = "default_sink_path")]
    pub path: String,

    /// Prefix of batch labels (`<prefix>-<n>`)
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

impl SinkConfig {
    fn validate(&self) -> Result<(), String> {
        if self.kind == SinkKind::Directory && self.path.trim().is_empty() {
            return Err("sink.path cannot be empty when sink.kind = 'directory'".to_string());
        }
        if self.file_prefix.trim().is_empty() {
            return Err("sink.file_prefix cannot be empty".to_string());
        }
        if self.file_prefix.contains(['/', '\\']) {
            return Err(format!(
                "sink.file_prefix '{}' must not contain path separators",
                self.file_prefix
            ));
        }
        Ok(())
    }
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            kind: SinkKind::default(),
            path: default_sink_path(),
            file_prefix: default_file_prefix(),
        }
    }
}

/// Masking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaskingConfig {
    /// Keep unconfigured fields (in-place masking) or emit only the
    /// configured ones (rebuild)
    #[serde(default = "default_true")]
    pub include_rest: bool,

    /// Documents per output batch; defaults depend on the mode
    #[serde(default)]
    pub batch_size: Option<usize>,

    /// Output format (ndjson or bulk)
    #[serde(default = "default_output_format")]
    pub output_format: String,

    /// Index name written into bulk metadata lines
    #[serde(default)]
    pub bulk_index: Option<String>,

    /// Field paths removed from every output document
    #[serde(default)]
    pub suppress: Vec<String>,

    /// Field path → mask type; `"none"` passes the value through
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl MaskingConfig {
    /// Masking mode selected by `include_rest`
    pub fn mode(&self) -> MaskMode {
        MaskMode::from_include_rest(self.include_rest)
    }

    /// Configured batch size, or the mode default
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size
            .unwrap_or_else(|| self.mode().default_batch_size())
    }

    /// Parses `fields` into mask specs
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unparseable field path.
    pub fn mask_specs(&self) -> crate::domain::Result<MaskSpecs> {
        MaskSpecs::parse(
            self.fields
                .iter()
                .map(|(path, mask)| (path.as_str(), Some(mask.as_str()))),
        )
    }

    /// Parses `suppress` into a suppressed field set
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unparseable field path.
    pub fn suppressed_fields(&self) -> crate::domain::Result<SuppressedFieldSet> {
        SuppressedFieldSet::parse(self.suppress.iter().map(String::as_str))
    }

    fn validate(&self) -> Result<(), String> {
        if let Some(size) = self.batch_size {
            if size == 0 || size > MAX_BATCH_SIZE {
                return Err(format!(
                    "masking.batch_size must be between 1 and {MAX_BATCH_SIZE}, got {size}"
                ));
            }
        }

        let valid_formats = ["ndjson", "bulk"];
        if !valid_formats.contains(&self.output_format.as_str()) {
            return Err(format!(
                "Invalid masking.output_format '{}'. Must be one of: {}",
                self.output_format,
                valid_formats.join(", ")
            ));
        }

        if self.output_format == "bulk"
            && self.bulk_index.as_deref().map_or(true, |i| i.trim().is_empty())
        {
            return Err("masking.bulk_index is required when output_format = 'bulk'".to_string());
        }

        let specs = self.mask_specs().map_err(|e| format!("masking.fields: {e}"))?;
        self.suppressed_fields()
            .map_err(|e| format!("masking.suppress: {e}"))?;

        if !self.include_rest && specs.is_empty() {
            return Err(
                "masking.fields cannot be empty when include_rest = false (every document would be empty)"
                    .to_string(),
            );
        }

        Ok(())
    }
}

impl Default for MaskingConfig {
    fn default() -> Self {
        Self {
            include_rest: true,
            batch_size: None,
            output_format: default_output_format(),
            bulk_index: None,
            suppress: Vec::new(),
            fields: BTreeMap::new(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly or never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    /// Console-only logging
    pub fn console_only() -> Self {
        Self {
            local_enabled: false,
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled = true".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_sink_path() -> String {
    "./masked".to_string()
}

fn default_file_prefix() -> String {
    "documents".to_string()
}

fn default_output_format() -> String {
    "ndjson".to_string()
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
