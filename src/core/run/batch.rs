//! Batch configuration and serialization
//!
//! This module turns masked documents into output lines and accumulates
//! them into labelled batches.

use crate::config::VeilConfig;
use crate::domain::{Document, Result, VeilError};
use serde_json::json;
use std::str::FromStr;

/// Output line format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One JSON line per document
    Ndjson,
    /// A bulk index metadata line before each document line
    Bulk,
}

impl FromStr for OutputFormat {
    type Err = VeilError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "ndjson" => Ok(OutputFormat::Ndjson),
            "bulk" => Ok(OutputFormat::Bulk),
            other => Err(VeilError::Configuration(format!(
                "Invalid output format '{other}'. Must be one of: ndjson, bulk"
            ))),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Ndjson => write!(f, "ndjson"),
            OutputFormat::Bulk => write!(f, "bulk"),
        }
    }
}

/// Configuration for batch processing
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Documents per batch
    pub batch_size: usize,
    /// Output line format
    pub output_format: OutputFormat,
    /// Index named in bulk metadata lines
    pub bulk_index: Option<String>,
    /// Batch label prefix
    pub file_prefix: String,
    /// Transform and count without writing
    pub dry_run: bool,
}

impl BatchConfig {
    /// Create a new batch configuration
    pub fn new(batch_size: usize, output_format: OutputFormat, file_prefix: impl Into<String>) -> Self {
        Self {
            batch_size: batch_size.max(1),
            output_format,
            bulk_index: None,
            file_prefix: file_prefix.into(),
            dry_run: false,
        }
    }

    /// Sets the bulk index
    pub fn with_bulk_index(mut self, index: impl Into<String>) -> Self {
        self.bulk_index = Some(index.into());
        self
    }

    /// Sets dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Create from the loaded configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unknown output format.
    pub fn from_config(config: &VeilConfig) -> Result<Self> {
        let output_format = OutputFormat::from_str(&config.masking.output_format)?;
        let mut batch = Self::new(
            config.masking.effective_batch_size(),
            output_format,
            config.sink.file_prefix.clone(),
        )
        .with_dry_run(config.application.dry_run);
        batch.bulk_index = config.masking.bulk_index.clone();
        Ok(batch)
    }

    /// Label of the batch at `index` (0-based)
    pub fn batch_label(&self, index: usize) -> String {
        format!("{}-{}", self.file_prefix, index)
    }
}

/// Serializes masked documents into output lines
#[derive(Debug, Clone)]
pub struct LineEncoder {
    format: OutputFormat,
    metadata_line: Option<String>,
}

impl LineEncoder {
    /// Create an encoder for a batch configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if bulk format is selected without an
    /// index name.
    pub fn new(config: &BatchConfig) -> Result<Self> {
        let metadata_line = match config.output_format {
            OutputFormat::Ndjson => None,
            OutputFormat::Bulk => {
                let index = config.bulk_index.as_deref().ok_or_else(|| {
                    VeilError::Configuration("Bulk output requires an index name".to_string())
                })?;
                let meta = json!({"index": {"_index": index, "_type": "doc"}});
                Some(serde_json::to_string(&meta)?)
            }
        };
        Ok(Self {
            format: config.output_format,
            metadata_line,
        })
    }

    /// Lines emitted for one document (one, or two in bulk format)
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the document cannot be encoded.
    pub fn encode(&self, doc: &Document) -> Result<Vec<String>> {
        let line = serde_json::to_string(doc)?;
        Ok(match &self.metadata_line {
            Some(meta) => vec![meta.clone(), line],
            None => vec![line],
        })
    }

    /// Output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

/// Accumulates encoded documents until a batch is full
#[derive(Debug, Default)]
pub struct PendingBatch {
    lines: Vec<String>,
    documents: usize,
}

impl PendingBatch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one document's lines
    pub fn push(&mut self, lines: Vec<String>) {
        self.lines.extend(lines);
        self.documents += 1;
    }

    /// Documents in the batch
    pub fn documents(&self) -> usize {
        self.documents
    }

    /// Returns true if the batch holds no document
    pub fn is_empty(&self) -> bool {
        self.documents == 0
    }

    /// Returns true once `batch_size` documents are held
    pub fn is_full(&self, batch_size: usize) -> bool {
        self.documents >= batch_size
    }

    /// Empties the batch, returning its lines and document count
    pub fn take(&mut self) -> (Vec<String>, usize) {
        let documents = std::mem::take(&mut self.documents);
        (std::mem::take(&mut self.lines), documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::from_str("ndjson").unwrap(), OutputFormat::Ndjson);
        assert_eq!(OutputFormat::from_str(" BULK ").unwrap(), OutputFormat::Bulk);
        assert!(OutputFormat::from_str("csv").is_err());
    }

    #[test]
    fn test_batch_label() {
        let config = BatchConfig::new(10, OutputFormat::Ndjson, "documents");
        assert_eq!(config.batch_label(0), "documents-0");
        assert_eq!(config.batch_label(12), "documents-12");
    }

    #[test]
    fn test_batch_size_at_least_one() {
        assert_eq!(BatchConfig::new(0, OutputFormat::Ndjson, "d").batch_size, 1);
    }

    #[test]
    fn test_batch_config_from_config() {
        let mut config = VeilConfig::default();
        config.masking.include_rest = false;
        config.masking.output_format = "bulk".to_string();
        config.masking.bulk_index = Some("masked".to_string());
        config.sink.file_prefix = "out".to_string();
        config.application.dry_run = true;

        let batch = BatchConfig::from_config(&config).unwrap();
        assert_eq!(batch.batch_size, 100_000);
        assert_eq!(batch.output_format, OutputFormat::Bulk);
        assert_eq!(batch.bulk_index.as_deref(), Some("masked"));
        assert_eq!(batch.batch_label(3), "out-3");
        assert!(batch.dry_run);
    }

    #[test]
    fn test_ndjson_encoding() {
        let encoder = LineEncoder::new(&BatchConfig::new(10, OutputFormat::Ndjson, "d")).unwrap();
        let lines = encoder.encode(&doc(serde_json::json!({"a": {"b": 1}}))).unwrap();
        assert_eq!(lines, vec![r#"{"a":{"b":1}}"#.to_string()]);
    }

    #[test]
    fn test_bulk_encoding_emits_metadata_line() {
        let config = BatchConfig::new(10, OutputFormat::Bulk, "d").with_bulk_index("masked-logs");
        let encoder = LineEncoder::new(&config).unwrap();
        let lines = encoder.encode(&doc(serde_json::json!({"a": 1}))).unwrap();
        assert_eq!(
            lines,
            vec![
                r#"{"index":{"_index":"masked-logs","_type":"doc"}}"#.to_string(),
                r#"{"a":1}"#.to_string(),
            ]
        );
    }

    #[test]
    fn test_bulk_without_index_rejected() {
        let config = BatchConfig::new(10, OutputFormat::Bulk, "d");
        assert!(matches!(LineEncoder::new(&config), Err(VeilError::Configuration(_))));
    }

    #[test]
    fn test_pending_batch() {
        let mut batch = PendingBatch::new();
        assert!(batch.is_empty());

        batch.push(vec!["a".to_string()]);
        batch.push(vec!["m".to_string(), "b".to_string()]);
        assert!(batch.is_full(2));
        assert!(!batch.is_full(3));

        let (lines, documents) = batch.take();
        assert_eq!(lines.len(), 3);
        assert_eq!(documents, 2);
        assert!(batch.is_empty());
    }
}
