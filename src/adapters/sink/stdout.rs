//! Standard output sink

use super::DocumentSink;
use crate::domain::{Result, VeilError};
use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Writes every line to standard output (or any async writer); labels are
/// ignored
pub struct StdoutSink<W = tokio::io::Stdout> {
    writer: W,
}

impl StdoutSink {
    /// Sink over the process's standard output
    pub fn new() -> Self {
        Self::from_writer(tokio::io::stdout())
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: AsyncWrite + Unpin + Send> StdoutSink<W> {
    /// Sink over an arbitrary writer
    pub fn from_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> DocumentSink for StdoutSink<W> {
    async fn write_batch(&mut self, lines: &[String], _label: &str) -> Result<()> {
        for line in lines {
            self.writer
                .write_all(line.as_bytes())
                .await
                .map_err(|e| VeilError::Sink(format!("Failed to write to stdout: {e}")))?;
            self.writer
                .write_all(b"\n")
                .await
                .map_err(|e| VeilError::Sink(format!("Failed to write to stdout: {e}")))?;
        }
        Ok(())
    }

    async fn finish(&mut self) -> Result<()> {
        self.writer
            .flush()
            .await
            .map_err(|e| VeilError::Sink(format!("Failed to flush stdout: {e}")))
    }

    fn describe(&self) -> String {
        "stdout".to_string()
    }
}
