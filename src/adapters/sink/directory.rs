//! Directory sink: one file per batch

use super::DocumentSink;
use crate::domain::{Result, VeilError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Writes each batch to `<dir>/<label>.json`
#[derive(Debug)]
pub struct DirectorySink {
    dir: PathBuf,
    files_written: usize,
}

impl DirectorySink {
    /// Create the sink, creating the directory if needed
    ///
    /// # Errors
    ///
    /// Returns a sink error if the directory cannot be created.
    pub async fn create(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            VeilError::Sink(format!(
                "Failed to create output directory {}: {e}",
                dir.display()
            ))
        })?;
        Ok(Self {
            dir,
            files_written: 0,
        })
    }

    /// Path a batch with this label is written to
    pub fn batch_path(&self, label: &str) -> PathBuf {
        self.dir.join(format!("{label}.json"))
    }
}

#[async_trait]
impl DocumentSink for DirectorySink {
    async fn write_batch(&mut self, lines: &[String], label: &str) -> Result<()> {
        let path = self.batch_path(label);
        let sink_err = |e: std::io::Error| {
            VeilError::Sink(format!("Failed to write {}: {e}", path.display()))
        };

        let mut body = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
        for line in lines {
            body.push_str(line);
            body.push('\n');
        }

        let mut file = tokio::fs::File::create(&path).await.map_err(sink_err)?;
        file.write_all(body.as_bytes()).await.map_err(sink_err)?;
        file.flush().await.map_err(sink_err)?;

        tracing::debug!(file = %path.display(), lines = lines.len(), "Wrote batch file");
        self.files_written += 1;
        Ok(())
    }

    async fn finish(&mut self) -> Result<()> {
        tracing::info!(
            directory = %self.dir.display(),
            files = self.files_written,
            "Finished writing batch files"
        );
        Ok(())
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}
