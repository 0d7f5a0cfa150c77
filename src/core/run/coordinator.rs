//! Run coordinator - main orchestrator for a masking run
//!
//! This module drives one run: it pulls documents from the source, masks
//! them, groups the encoded lines into batches and hands each batch to the
//! sink, while tracking progress and honouring shutdown requests.

use crate::adapters::sink::{DocumentSink, MemorySink};
use crate::adapters::source::DocumentSource;
use crate::adapters::{create_sink, create_source};
use crate::config::VeilConfig;
use crate::core::run::batch::{BatchConfig, LineEncoder, PendingBatch};
use crate::core::run::summary::RunSummary;
use crate::domain::{Document, Result, VeilError};
use crate::masking::{DocumentStage, Masker, ProviderRegistry};
use std::time::Instant;
use tokio::sync::watch;

/// Run coordinator
pub struct RunCoordinator {
    masker: Masker,
    source: Box<dyn DocumentSource>,
    sink: Box<dyn DocumentSink>,
    batch_config: BatchConfig,
    encoder: LineEncoder,
    shutdown: watch::Receiver<bool>,
}

impl RunCoordinator {
    /// Create a coordinator from already-built parts
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the batch configuration is
    /// inconsistent (bulk format without an index).
    pub fn new(
        masker: Masker,
        source: Box<dyn DocumentSource>,
        sink: Box<dyn DocumentSink>,
        batch_config: BatchConfig,
        shutdown: watch::Receiver<bool>,
    ) -> Result<Self> {
        let encoder = LineEncoder::new(&batch_config)?;
        Ok(Self {
            masker,
            source,
            sink,
            batch_config,
            encoder,
            shutdown,
        })
    }

    /// Build a coordinator from configuration
    ///
    /// Mask specs are checked against the registry before the source is
    /// opened, so an unknown mask type fails without reading anything. In
    /// dry-run mode the configured sink is not created.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid settings and a source or
    /// sink error if those cannot be opened.
    pub async fn from_config(
        config: &VeilConfig,
        registry: &ProviderRegistry,
        shutdown: watch::Receiver<bool>,
    ) -> Result<Self> {
        config.validate().map_err(VeilError::Configuration)?;

        let masker = Masker::new(
            registry,
            config.masking.mask_specs()?,
            config.masking.suppressed_fields()?,
            config.masking.mode(),
        )?;
        let batch_config = BatchConfig::from_config(config)?;

        let source = create_source(&config.source).await?;
        let sink: Box<dyn DocumentSink> = if batch_config.dry_run {
            tracing::info!("Dry run: output sink not created");
            Box::new(MemorySink::new(false))
        } else {
            create_sink(&config.sink).await?
        };

        Self::new(masker, source, sink, batch_config, shutdown)
    }

    /// Execute the run
    ///
    /// Malformed records and documents whose masking fails are counted and
    /// skipped. Source and sink failures abort the run.
    ///
    /// # Errors
    ///
    /// Returns the first non-record-scoped error.
    pub async fn execute(mut self) -> Result<RunSummary> {
        let start_time = Instant::now();
        let mut summary = RunSummary::new();
        summary.total_hint = self.source.total_hint();
        summary.dry_run = self.batch_config.dry_run;

        tracing::info!(
            run_id = %summary.run_id,
            source = %self.source.describe(),
            sink = %self.sink.describe(),
            mode = %self.masker.mode(),
            batch_size = self.batch_config.batch_size,
            format = %self.encoder.format(),
            dry_run = self.batch_config.dry_run,
            "Starting masking run"
        );

        let mut pending = PendingBatch::new();

        loop {
            let next = tokio::select! {
                biased;
                _ = wait_for_shutdown(&mut self.shutdown) => {
                    tracing::info!(
                        read = summary.documents_read,
                        pending = pending.documents(),
                        "Shutdown requested, flushing pending batch"
                    );
                    summary.interrupted = true;
                    break;
                }
                next = self.source.next_document() => next,
            };

            let position = summary.documents_read + 1;
            match next {
                Ok(None) => break,
                Ok(Some(doc)) => {
                    summary.documents_read += 1;
                    self.process_document(doc, position, &mut pending, &mut summary)?;
                }
                Err(e) if e.is_record_scoped() => {
                    summary.documents_read += 1;
                    tracing::warn!(position = position, error = %e, "Skipping malformed record");
                    summary.record_skipped(position, &e);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Source failed, aborting run");
                    return Err(e);
                }
            }

            if pending.is_full(self.batch_config.batch_size) {
                self.flush(&mut pending, &mut summary).await?;
            }
        }

        if !pending.is_empty() {
            self.flush(&mut pending, &mut summary).await?;
        }
        self.sink.finish().await?;

        summary.cache = self.masker.store_stats();
        let summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();
        Ok(summary)
    }

    fn process_document(
        &mut self,
        doc: Document,
        position: u64,
        pending: &mut PendingBatch,
        summary: &mut RunSummary,
    ) -> Result<()> {
        match self.masker.mask_document(doc) {
            Ok(masked) => {
                pending.push(self.encoder.encode(&masked)?);
                Ok(())
            }
            Err(e) if e.is_record_scoped() => {
                tracing::warn!(position = position, error = %e, "Dropping document");
                summary.record_failed(position, &e);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn flush(&mut self, pending: &mut PendingBatch, summary: &mut RunSummary) -> Result<()> {
        let (lines, documents) = pending.take();
        let label = self.batch_config.batch_label(summary.batches_written as usize);

        if self.batch_config.dry_run {
            tracing::debug!(label = %label, documents = documents, "Dry run: batch not written");
        } else {
            self.sink.write_batch(&lines, &label).await.map_err(|e| {
                tracing::error!(label = %label, error = %e, "Failed to write batch");
                e
            })?;
        }

        summary.batches_written += 1;
        summary.documents_emitted += documents as u64;
        tracing::trace!(stage = ?DocumentStage::Emitted, documents = documents);
        log_progress(summary, &label);
        Ok(())
    }
}

/// Resolves once shutdown is requested; never resolves if the sender is gone
async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

fn log_progress(summary: &RunSummary, label: &str) {
    match summary.total_hint {
        Some(total) if total > 0 => {
            let percent = summary.documents_read as f64 / total as f64 * 100.0;
            tracing::info!(
                batch = %label,
                processed = summary.documents_read,
                total = total,
                percent = format!("{percent:.1}%"),
                "Progress"
            );
        }
        _ => {
            tracing::info!(
                batch = %label,
                processed = summary.documents_read,
                "Progress"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::source::MemorySource;
    use crate::core::run::batch::OutputFormat;
    use crate::domain::{MaskSpecs, SuppressedFieldSet};
    use crate::masking::MaskMode;
    use serde_json::json;

    fn masker(mode: MaskMode) -> Masker {
        Masker::new(
            &ProviderRegistry::with_builtins(),
            MaskSpecs::parse([("source.ip", Some("ipv4"))]).unwrap(),
            SuppressedFieldSet::new(),
            mode,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_batches_are_labelled_in_order() {
        let docs = (0..5).map(|i| json!({"n": i})).collect();
        let sink = MemorySink::new(true);
        let (_tx, rx) = watch::channel(false);

        let coordinator = RunCoordinator::new(
            masker(MaskMode::InPlace),
            Box::new(MemorySource::from_values(docs)),
            Box::new(sink.clone()),
            BatchConfig::new(2, OutputFormat::Ndjson, "documents"),
            rx,
        )
        .unwrap();
        let summary = coordinator.execute().await.unwrap();

        assert_eq!(summary.documents_emitted, 5);
        assert_eq!(summary.batches_written, 3);
        assert_eq!(
            sink.labels().await,
            vec!["documents-0", "documents-1", "documents-2"]
        );
        assert!(sink.is_finished().await);
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let sink = MemorySink::new(true);
        let (_tx, rx) = watch::channel(false);

        let coordinator = RunCoordinator::new(
            masker(MaskMode::InPlace),
            Box::new(MemorySource::from_values(vec![json!({"source": {"ip": "1.2.3.4"}})])),
            Box::new(sink.clone()),
            BatchConfig::new(10, OutputFormat::Ndjson, "documents").with_dry_run(true),
            rx,
        )
        .unwrap();
        let summary = coordinator.execute().await.unwrap();

        assert_eq!(summary.documents_emitted, 1);
        assert!(summary.dry_run);
        assert_eq!(sink.batch_count().await, 0);
        assert_eq!(summary.cache.entries.get("ipv4"), Some(&1));
    }

    #[tokio::test]
    async fn test_shutdown_before_start() {
        let sink = MemorySink::new(true);
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();

        let coordinator = RunCoordinator::new(
            masker(MaskMode::InPlace),
            Box::new(MemorySource::from_values(vec![json!({"a": 1})])),
            Box::new(sink.clone()),
            BatchConfig::new(10, OutputFormat::Ndjson, "documents"),
            rx,
        )
        .unwrap();
        let summary = coordinator.execute().await.unwrap();

        assert!(summary.interrupted);
        assert_eq!(summary.documents_read, 0);
        assert_eq!(sink.batch_count().await, 0);
    }

    #[tokio::test]
    async fn test_dropped_sender_does_not_interrupt() {
        let (tx, rx) = watch::channel(false);
        drop(tx);

        let coordinator = RunCoordinator::new(
            masker(MaskMode::Rebuild),
            Box::new(MemorySource::from_values(vec![json!({"source": {"ip": "1.2.3.4"}})])),
            Box::new(MemorySink::new(false)),
            BatchConfig::new(10, OutputFormat::Ndjson, "documents"),
            rx,
        )
        .unwrap();
        let summary = coordinator.execute().await.unwrap();

        assert!(!summary.interrupted);
        assert_eq!(summary.documents_emitted, 1);
    }
}
