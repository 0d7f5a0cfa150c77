//! Integration tests for graceful shutdown
//!
//! These tests verify that:
//! - A shutdown signal stops reading new documents
//! - The pending partial batch is flushed before the run returns
//! - A source blocked on input does not delay shutdown
//! - Interrupted runs map to exit code 130

use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tokio::sync::watch;
use veil::adapters::sink::MemorySink;
use veil::adapters::source::{DocumentSource, MemorySource};
use veil::cli::commands::mask::exit_code;
use veil::cli::commands::EXIT_INTERRUPTED;
use veil::core::run::{BatchConfig, OutputFormat, RunCoordinator};
use veil::domain::{Document, MaskSpecs, Result, SuppressedFieldSet};
use veil::masking::{MaskMode, Masker, ProviderRegistry};

fn masker() -> Masker {
    Masker::new(
        &ProviderRegistry::with_builtins(),
        MaskSpecs::parse([("source.ip", Some("ipv4"))]).unwrap(),
        SuppressedFieldSet::new(),
        MaskMode::InPlace,
    )
    .unwrap()
}

/// Yields documents and requests shutdown once `stop_after` have been read
struct SignallingSource {
    inner: MemorySource,
    read: usize,
    stop_after: usize,
    shutdown: watch::Sender<bool>,
}

#[async_trait]
impl DocumentSource for SignallingSource {
    async fn next_document(&mut self) -> Result<Option<Document>> {
        let next = self.inner.next_document().await?;
        self.read += 1;
        if self.read == self.stop_after {
            let _ = self.shutdown.send(true);
        }
        Ok(next)
    }

    fn describe(&self) -> String {
        "signalling".to_string()
    }
}

/// Never yields, like stdin with no writer
struct StalledSource;

#[async_trait]
impl DocumentSource for StalledSource {
    async fn next_document(&mut self) -> Result<Option<Document>> {
        std::future::pending().await
    }

    fn describe(&self) -> String {
        "stalled".to_string()
    }
}

#[tokio::test]
async fn test_shutdown_flushes_pending_batch() {
    let (tx, rx) = watch::channel(false);
    let docs = (0..10)
        .map(|i| json!({"source": {"ip": format!("10.0.0.{i}")}}))
        .collect();
    let source = SignallingSource {
        inner: MemorySource::from_values(docs),
        read: 0,
        stop_after: 5,
        shutdown: tx,
    };
    let sink = MemorySink::new(true);

    let summary = RunCoordinator::new(
        masker(),
        Box::new(source),
        Box::new(sink.clone()),
        BatchConfig::new(3, OutputFormat::Ndjson, "documents"),
        rx,
    )
    .unwrap()
    .execute()
    .await
    .unwrap();

    assert!(summary.interrupted);
    assert_eq!(summary.documents_read, 5);
    assert_eq!(summary.documents_emitted, 5);
    assert_eq!(sink.labels().await, vec!["documents-0", "documents-1"]);
    assert_eq!(sink.line_count().await, 5);
    assert!(sink.is_finished().await);
    assert_eq!(exit_code(&summary), EXIT_INTERRUPTED);
}

#[tokio::test]
async fn test_shutdown_interrupts_stalled_source() {
    let (tx, rx) = watch::channel(false);
    let sink = MemorySink::new(true);

    let run = RunCoordinator::new(
        masker(),
        Box::new(StalledSource),
        Box::new(sink.clone()),
        BatchConfig::new(3, OutputFormat::Ndjson, "documents"),
        rx,
    )
    .unwrap()
    .execute();
    let handle = tokio::spawn(run);

    tokio::time::sleep(Duration::from_millis(20)).await;
    tx.send(true).unwrap();

    let summary = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("run did not stop after shutdown")
        .unwrap()
        .unwrap();

    assert!(summary.interrupted);
    assert_eq!(summary.documents_read, 0);
    assert_eq!(sink.batch_count().await, 0);
}

#[tokio::test]
async fn test_completed_run_is_not_interrupted() {
    let (_tx, rx) = watch::channel(false);
    let summary = RunCoordinator::new(
        masker(),
        Box::new(MemorySource::from_values(vec![json!({"n": 1})])),
        Box::new(MemorySink::new(false)),
        BatchConfig::new(3, OutputFormat::Ndjson, "documents"),
        rx,
    )
    .unwrap()
    .execute()
    .await
    .unwrap();

    assert!(!summary.interrupted);
    assert_eq!(exit_code(&summary), 0);
}
