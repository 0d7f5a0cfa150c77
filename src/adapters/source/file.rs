//! Newline-delimited JSON file source

use super::{is_blank, parse_line, read_raw_line, DocumentSource};
use crate::domain::{Document, Result, VeilError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::BufReader;

/// File extensions picked up when a directory is given
pub const INPUT_EXTENSIONS: [&str; 2] = ["json", "ndjson"];

struct OpenFile {
    path: PathBuf,
    reader: BufReader<File>,
    line_no: u64,
}

/// Reads documents from one or more NDJSON files
///
/// Directories are expanded to their `*.json` / `*.ndjson` files in sorted
/// order. Files are read one after another, line by line.
pub struct JsonLinesFileSource {
    pending: VecDeque<PathBuf>,
    current: Option<OpenFile>,
    total: u64,
    description: String,
    buf: Vec<u8>,
}

impl JsonLinesFileSource {
    /// Open a source over the given files or directories
    ///
    /// Non-blank lines are counted up front for progress reporting.
    ///
    /// # Errors
    ///
    /// Returns a source error if a path does not exist or cannot be read.
    pub async fn open(paths: &[PathBuf]) -> Result<Self> {
        let files = expand_paths(paths).await?;

        let mut total = 0;
        for file in &files {
            total += count_records(file).await?;
        }

        let description = if files.len() == 1 {
            files[0].display().to_string()
        } else {
            format!("{} files", files.len())
        };

        tracing::info!(
            files = files.len(),
            records = total,
            "Opened NDJSON file source"
        );

        Ok(Self {
            pending: files.into(),
            current: None,
            total,
            description,
            buf: Vec::new(),
        })
    }
}

#[async_trait]
impl DocumentSource for JsonLinesFileSource {
    async fn next_document(&mut self) -> Result<Option<Document>> {
        loop {
            if self.current.is_none() {
                let Some(path) = self.pending.pop_front() else {
                    return Ok(None);
                };
                tracing::debug!(file = %path.display(), "Reading input file");
                let file = File::open(&path).await.map_err(|e| {
                    VeilError::Source(format!("Failed to open {}: {e}", path.display()))
                })?;
                self.current = Some(OpenFile {
                    path,
                    reader: BufReader::new(file),
                    line_no: 0,
                });
            }

            let Some(open) = self.current.as_mut() else {
                continue;
            };
            let more = read_raw_line(&mut open.reader, &mut self.buf)
                .await
                .map_err(|e| {
                    VeilError::Source(format!("Failed to read {}: {e}", open.path.display()))
                })?;

            if more {
                open.line_no += 1;
                let (path, line_no) = (&open.path, open.line_no);
                if let Some(parsed) =
                    parse_line(&self.buf, || format!("{}:{line_no}", path.display()))
                {
                    return parsed.map(Some);
                }
            } else {
                self.current = None;
            }
        }
    }

    fn total_hint(&self) -> Option<u64> {
        Some(self.total)
    }

    fn describe(&self) -> String {
        self.description.clone()
    }
}

/// Expands directories into their input files
///
/// # Errors
///
/// Returns a source error for a missing path.
pub async fn expand_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        let metadata = tokio::fs::metadata(path).await.map_err(|e| {
            VeilError::Source(format!("Input path {} is not accessible: {e}", path.display()))
        })?;

        if metadata.is_dir() {
            let mut found = Vec::new();
            let mut entries = tokio::fs::read_dir(path).await?;
            while let Some(entry) = entries.next_entry().await? {
                let candidate = entry.path();
                if entry.file_type().await?.is_file() && has_input_extension(&candidate) {
                    found.push(candidate);
                }
            }
            found.sort();
            if found.is_empty() {
                tracing::warn!(directory = %path.display(), "No input files found in directory");
            }
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

fn has_input_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| INPUT_EXTENSIONS.contains(&e.to_lowercase().as_str()))
}

async fn count_records(path: &Path) -> Result<u64> {
    let file = File::open(path)
        .await
        .map_err(|e| VeilError::Source(format!("Failed to open {}: {e}", path.display())))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    let mut count = 0;
    while read_raw_line(&mut reader, &mut buf).await? {
        if !is_blank(&buf) {
            count += 1;
        }
    }
    Ok(count)
}
