//! In-memory sink

use super::DocumentSink;
use crate::domain::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct Buffer {
    batches: Vec<(String, Vec<String>)>,
    line_count: usize,
    batch_count: usize,
    finished: bool,
}

/// Collects batches in memory
///
/// Clones share the same buffer, so a handle kept by the caller sees what
/// the run wrote. With `keep = false` only counts are tracked.
#[derive(Debug, Clone)]
pub struct MemorySink {
    buffer: Arc<Mutex<Buffer>>,
    keep: bool,
}

impl MemorySink {
    /// Create a sink; `keep` controls whether lines are retained
    pub fn new(keep: bool) -> Self {
        Self {
            buffer: Arc::new(Mutex::new(Buffer::default())),
            keep,
        }
    }

    /// All retained lines, in write order
    pub async fn lines(&self) -> Vec<String> {
        let buffer = self.buffer.lock().await;
        buffer
            .batches
            .iter()
            .flat_map(|(_, lines)| lines.iter().cloned())
            .collect()
    }

    /// Labels of the retained batches, in write order
    pub async fn labels(&self) -> Vec<String> {
        let buffer = self.buffer.lock().await;
        buffer.batches.iter().map(|(label, _)| label.clone()).collect()
    }

    /// Retained batches as `(label, lines)`
    pub async fn batches(&self) -> Vec<(String, Vec<String>)> {
        self.buffer.lock().await.batches.clone()
    }

    /// Number of lines written
    pub async fn line_count(&self) -> usize {
        self.buffer.lock().await.line_count
    }

    /// Number of batches written
    pub async fn batch_count(&self) -> usize {
        self.buffer.lock().await.batch_count
    }

    /// Returns true once `finish` was called
    pub async fn is_finished(&self) -> bool {
        self.buffer.lock().await.finished
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new(true)
    }
}

#[async_trait]
impl DocumentSink for MemorySink {
    async fn write_batch(&mut self, lines: &[String], label: &str) -> Result<()> {
        let mut buffer = self.buffer.lock().await;
        buffer.line_count += lines.len();
        buffer.batch_count += 1;
        if self.keep {
            buffer.batches.push((label.to_string(), lines.to_vec()));
        }
        Ok(())
    }

    async fn finish(&mut self) -> Result<()> {
        self.buffer.lock().await.finished = true;
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
