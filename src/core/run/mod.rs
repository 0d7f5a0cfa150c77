//! Run orchestration and batch processing
//!
//! This module provides the run loop for Veil, including:
//! - Serialization of masked documents into batches
//! - Run coordination and orchestration
//! - Summary and reporting

pub mod batch;
pub mod coordinator;
pub mod summary;

pub use batch::{BatchConfig, LineEncoder, OutputFormat, PendingBatch};
pub use coordinator::RunCoordinator;
pub use summary::RunSummary;
