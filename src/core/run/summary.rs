//! Run summary and reporting
//!
//! This module defines structures for tracking and reporting run results.

use crate::domain::{DocumentErrorDetail, VeilError};
use crate::masking::StoreStats;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

/// Per-document error details kept in a summary; later ones are only counted
pub const MAX_RECORDED_ERRORS: usize = 1_000;

/// Summary of a masking run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Unique id of the run, for log correlation
    pub run_id: Uuid,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// Records pulled from the source (including malformed ones)
    pub documents_read: u64,

    /// Documents written (or counted, in dry-run)
    pub documents_emitted: u64,

    /// Malformed records skipped
    pub documents_skipped: u64,

    /// Documents dropped because a provider failed
    pub documents_failed: u64,

    /// Batches handed to the sink
    pub batches_written: u64,

    /// Total records announced by the source, if known
    pub total_hint: Option<u64>,

    /// Duration of the run
    #[serde(serialize_with = "serialize_duration_secs")]
    pub duration: Duration,

    /// Cached replacement counts per mask type
    pub cache: StoreStats,

    /// Whether the run stopped early on a shutdown signal
    pub interrupted: bool,

    /// Whether batches were withheld from the sink
    pub dry_run: bool,

    /// Per-document errors, at most [`MAX_RECORDED_ERRORS`]
    #[serde(skip)]
    pub errors: Vec<DocumentErrorDetail>,
}

impl RunSummary {
    /// Create a new empty summary stamped with a fresh run id
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            documents_read: 0,
            documents_emitted: 0,
            documents_skipped: 0,
            documents_failed: 0,
            batches_written: 0,
            total_hint: None,
            duration: Duration::from_secs(0),
            cache: StoreStats::default(),
            interrupted: false,
            dry_run: false,
            errors: Vec::new(),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Record a malformed record that was skipped
    pub fn record_skipped(&mut self, position: u64, error: &VeilError) {
        self.documents_skipped += 1;
        self.push_error(position, error);
    }

    /// Record a document dropped after a provider failure
    pub fn record_failed(&mut self, position: u64, error: &VeilError) {
        self.documents_failed += 1;
        self.push_error(position, error);
    }

    fn push_error(&mut self, position: u64, error: &VeilError) {
        if self.errors.len() < MAX_RECORDED_ERRORS {
            self.errors.push(DocumentErrorDetail {
                position,
                ..DocumentErrorDetail::from(error)
            });
        }
    }

    /// Records skipped or dropped, including those without a kept detail
    pub fn error_count(&self) -> u64 {
        self.documents_skipped + self.documents_failed
    }

    /// Check if the run was successful (nothing skipped or dropped)
    pub fn is_successful(&self) -> bool {
        self.documents_failed == 0 && self.documents_skipped == 0
    }

    /// Get success rate as a percentage of records read
    pub fn success_rate(&self) -> f64 {
        if self.documents_read == 0 {
            return 100.0;
        }
        (self.documents_emitted as f64 / self.documents_read as f64) * 100.0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            run_id = %self.run_id,
            read = self.documents_read,
            emitted = self.documents_emitted,
            skipped = self.documents_skipped,
            failed = self.documents_failed,
            batches = self.batches_written,
            cached_values = self.cache.total(),
            interrupted = self.interrupted,
            dry_run = self.dry_run,
            duration_secs = self.duration.as_secs(),
            success_rate = format!("{:.2}%", self.success_rate()),
            "Run completed"
        );

        for (mask_type, entries) in &self.cache.entries {
            tracing::debug!(mask_type = %mask_type, entries = entries, "Masking map size");
        }

        if !self.errors.is_empty() {
            tracing::warn!(
                error_count = self.error_count(),
                recorded = self.errors.len(),
                "Run completed with document errors"
            );
            for error in &self.errors {
                tracing::warn!(
                    position = error.position,
                    field = error.field.as_deref().unwrap_or("-"),
                    mask_type = error.mask_type.as_deref().unwrap_or("-"),
                    message = %error.message,
                    "Document error"
                );
            }
        }
    }
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}

fn serialize_duration_secs<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_f64(duration.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_summary_creation() {
        let summary = RunSummary::new();

        assert_eq!(summary.documents_read, 0);
        assert_eq!(summary.documents_emitted, 0);
        assert_eq!(summary.batches_written, 0);
        assert_eq!(summary.duration, Duration::from_secs(0));
        assert!(!summary.interrupted);
        assert!(summary.errors.is_empty());
    }

    #[test]
    fn test_run_ids_are_unique() {
        assert_ne!(RunSummary::new().run_id, RunSummary::new().run_id);
    }

    #[test]
    fn test_run_summary_with_duration() {
        let summary = RunSummary::new().with_duration(Duration::from_secs(120));
        assert_eq!(summary.duration, Duration::from_secs(120));
    }

    #[test]
    fn test_is_successful() {
        let mut summary = RunSummary::new();
        summary.documents_read = 10;
        summary.documents_emitted = 10;
        assert!(summary.is_successful());

        summary.record_failed(
            4,
            &VeilError::Provider {
                mask_type: "geo_point".to_string(),
                field: "source.geo".to_string(),
                reason: "no location".to_string(),
            },
        );
        assert!(!summary.is_successful());
        assert_eq!(summary.errors[0].position, 4);
        assert_eq!(summary.errors[0].field.as_deref(), Some("source.geo"));
    }

    #[test]
    fn test_record_skipped() {
        let mut summary = RunSummary::new();
        summary.record_skipped(
            2,
            &VeilError::MalformedInput {
                location: "a.json:2".to_string(),
                reason: "EOF".to_string(),
            },
        );
        assert_eq!(summary.documents_skipped, 1);
        assert!(summary.errors[0].message.contains("a.json:2"));
    }

    #[test]
    fn test_error_details_are_capped() {
        let mut summary = RunSummary::new();
        let error = VeilError::MalformedInput {
            location: "logs.json:1".to_string(),
            reason: "expected value".to_string(),
        };
        for position in 1..=(MAX_RECORDED_ERRORS as u64 + 25) {
            summary.record_skipped(position, &error);
        }

        assert_eq!(summary.errors.len(), MAX_RECORDED_ERRORS);
        assert_eq!(summary.documents_skipped, MAX_RECORDED_ERRORS as u64 + 25);
        assert_eq!(summary.error_count(), MAX_RECORDED_ERRORS as u64 + 25);
        assert_eq!(summary.errors[0].position, 1);
    }

    #[test]
    fn test_success_rate() {
        let mut summary = RunSummary::new();
        assert_eq!(summary.success_rate(), 100.0);

        summary.documents_read = 100;
        summary.documents_emitted = 95;
        assert_eq!(summary.success_rate(), 95.0);
    }

    #[test]
    fn test_serializes_without_values() {
        let mut summary = RunSummary::new();
        summary.cache.entries.insert("ipv4".to_string(), 3);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["cache"]["entries"]["ipv4"], 3);
        assert!(json.get("errors").is_none());
    }
}
