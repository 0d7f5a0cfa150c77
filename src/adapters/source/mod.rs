//! Document sources
//!
//! A source yields documents one at a time. A record that cannot be turned
//! into a document is reported as [`VeilError::MalformedInput`] and the next
//! call moves on to the following record; any other error ends the run.
//!
//! [`VeilError::MalformedInput`]: crate::domain::VeilError::MalformedInput

pub mod file;
pub mod memory;
pub mod stdin;

use crate::domain::document::parse_document;
use crate::domain::{Document, Result, VeilError};
use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub use file::JsonLinesFileSource;
pub use memory::MemorySource;
pub use stdin::StdinSource;

/// Lazy, pull-based document source
#[async_trait]
pub trait DocumentSource: Send {
    /// Next document, or `None` once the source is exhausted
    ///
    /// # Errors
    ///
    /// Returns `MalformedInput` for a single bad record (the source stays
    /// usable) and `Source`/`Io` errors for failures that end the run.
    async fn next_document(&mut self) -> Result<Option<Document>>;

    /// Total number of records, when known up front
    fn total_hint(&self) -> Option<u64> {
        None
    }

    /// Human-readable description for logs
    fn describe(&self) -> String;
}

/// Reads the next line into `buf` as raw bytes, without its terminator
///
/// Returns false at end of input. Bytes are not checked for UTF-8 here so
/// that one bad line stays a record-level problem.
pub(crate) async fn read_raw_line<R>(reader: &mut R, buf: &mut Vec<u8>) -> std::io::Result<bool>
where
    R: AsyncBufRead + Unpin + Send,
{
    buf.clear();
    if reader.read_until(b'\n', buf).await? == 0 {
        return Ok(false);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    Ok(true)
}

/// True for a line holding only ASCII whitespace
pub(crate) fn is_blank(line: &[u8]) -> bool {
    line.iter().all(u8::is_ascii_whitespace)
}

/// Parses one NDJSON line; blank lines yield `None`
pub(crate) fn parse_line(
    line: &[u8],
    location: impl FnOnce() -> String,
) -> Option<Result<Document>> {
    if is_blank(line) {
        return None;
    }
    let location = location();
    let parsed = match std::str::from_utf8(line) {
        Ok(text) => parse_document(text, &location),
        Err(e) => Err(VeilError::MalformedInput {
            location,
            reason: format!("invalid UTF-8: {e}"),
        }),
    };
    Some(parsed)
}
