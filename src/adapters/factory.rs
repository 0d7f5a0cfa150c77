//! Source and sink factory
//!
//! Builds the configured source and sink implementations.

use crate::adapters::sink::{DirectorySink, DocumentSink, StdoutSink};
use crate::adapters::source::{DocumentSource, JsonLinesFileSource, StdinSource};
use crate::config::{SinkConfig, SinkKind, SourceConfig, SourceKind};
use crate::domain::Result;
use std::path::PathBuf;

/// Create a document source based on the configuration
///
/// # Errors
///
/// Returns an error if an input path is missing or unreadable
pub async fn create_source(config: &SourceConfig) -> Result<Box<dyn DocumentSource>> {
    match config.kind {
        SourceKind::Files => {
            let paths: Vec<PathBuf> = config.paths.iter().map(PathBuf::from).collect();
            tracing::info!(paths = ?config.paths, "Creating file source");
            Ok(Box::new(JsonLinesFileSource::open(&paths).await?))
        }
        SourceKind::Stdin => {
            tracing::info!("Creating stdin source");
            Ok(Box::new(StdinSource::new()))
        }
    }
}

/// Create a document sink based on the configuration
///
/// # Errors
///
/// Returns an error if the output directory cannot be created
pub async fn create_sink(config: &SinkConfig) -> Result<Box<dyn DocumentSink>> {
    match config.kind {
        SinkKind::Directory => {
            tracing::info!(path = %config.path, "Creating directory sink");
            Ok(Box::new(DirectorySink::create(&config.path).await?))
        }
        SinkKind::Stdout => {
            tracing::info!("Creating stdout sink");
            Ok(Box::new(StdoutSink::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_create_directory_sink() {
        let tmp = TempDir::new().unwrap();
        let config = SinkConfig {
            kind: SinkKind::Directory,
            path: tmp.path().join("out").display().to_string(),
            file_prefix: "documents".to_string(),
        };
        let sink = create_sink(&config).await.unwrap();
        assert!(sink.describe().ends_with("out"));
        assert!(tmp.path().join("out").is_dir());
    }

    #[tokio::test]
    async fn test_create_file_source_missing_path() {
        let config = SourceConfig {
            kind: SourceKind::Files,
            paths: vec!["/no/such/input.json".to_string()],
        };
        assert!(create_source(&config).await.is_err());
    }

    #[tokio::test]
    async fn test_create_stdin_source() {
        let config = SourceConfig {
            kind: SourceKind::Stdin,
            paths: Vec::new(),
        };
        let source = create_source(&config).await.unwrap();
        assert_eq!(source.describe(), "stdin");
    }
}
