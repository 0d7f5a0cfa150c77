//! Standard input source

use super::{parse_line, read_raw_line, DocumentSource};
use crate::domain::{Document, Result, VeilError};
use async_trait::async_trait;
use tokio::io::{AsyncRead, BufReader};

/// Reads NDJSON documents from standard input (or any async reader)
///
/// The total is unknown, so progress is reported as a plain count.
pub struct StdinSource<R = tokio::io::Stdin> {
    reader: BufReader<R>,
    line_no: u64,
    buf: Vec<u8>,
}

impl StdinSource {
    /// Source over the process's standard input
    pub fn new() -> Self {
        Self::from_reader(tokio::io::stdin())
    }
}

impl Default for StdinSource {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: AsyncRead + Unpin + Send> StdinSource<R> {
    /// Source over an arbitrary reader
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line_no: 0,
            buf: Vec::new(),
        }
    }
}

#[async_trait]
impl<R: AsyncRead + Unpin + Send> DocumentSource for StdinSource<R> {
    async fn next_document(&mut self) -> Result<Option<Document>> {
        while read_raw_line(&mut self.reader, &mut self.buf)
            .await
            .map_err(|e| VeilError::Source(format!("Failed to read standard input: {e}")))?
        {
            self.line_no += 1;
            let line_no = self.line_no;
            if let Some(parsed) = parse_line(&self.buf, || format!("stdin:{line_no}")) {
                return parsed.map(Some);
            }
        }
        Ok(None)
    }

    fn describe(&self) -> String {
        "stdin".to_string()
    }
}
