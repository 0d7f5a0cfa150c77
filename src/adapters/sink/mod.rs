//! Document sinks
//!
//! A sink receives serialized batches: each batch is a list of output lines
//! plus a label (`<prefix>-<n>`). Sink errors end the run.

pub mod directory;
pub mod memory;
pub mod stdout;

use crate::domain::Result;
use async_trait::async_trait;

pub use directory::DirectorySink;
pub use memory::MemorySink;
pub use stdout::StdoutSink;

/// Destination for serialized batches
#[async_trait]
pub trait DocumentSink: Send {
    /// Write one batch of lines
    ///
    /// # Errors
    ///
    /// Returns a sink error if the batch could not be written.
    async fn write_batch(&mut self, lines: &[String], label: &str) -> Result<()>;

    /// Flush and release resources once the run is over
    async fn finish(&mut self) -> Result<()> {
        Ok(())
    }

    /// Human-readable description for logs
    fn describe(&self) -> String;
}
