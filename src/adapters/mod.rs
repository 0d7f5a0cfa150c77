//! Document sources and sinks for Veil.
//!
//! This module provides the collaborators a run reads from and writes to:
//!
//! - [`source`] - [`DocumentSource`] trait plus NDJSON file, stdin and
//!   in-memory sources
//! - [`sink`] - [`DocumentSink`] trait plus directory, stdout and in-memory
//!   sinks
//! - [`factory`] - builds the configured source and sink
//!
//! # Design Pattern
//!
//! Adapters isolate I/O from the masking engine behind async traits, so runs
//! can be tested end to end with the in-memory implementations:
//!
//! ```rust
//! use veil::adapters::sink::{DocumentSink, MemorySink};
//! use veil::adapters::source::{DocumentSource, MemorySource};
//! use serde_json::json;
//!
//! # async fn example() -> veil::domain::Result<()> {
//! let mut source = MemorySource::from_values(vec![json!({"source": {"ip": "10.0.0.1"}})]);
//! let sink = MemorySink::new(true);
//!
//! while let Some(doc) = source.next_document().await? {
//!     let line = serde_json::to_string(&doc)?;
//!     sink.clone().write_batch(&[line], "documents-0").await?;
//! }
//! assert_eq!(sink.line_count().await, 1);
//! # Ok(())
//! # }
//! ```

pub mod factory;
pub mod sink;
pub mod source;

pub use factory::{create_sink, create_source};
pub use sink::DocumentSink;
pub use source::DocumentSource;
