//! In-memory source

use super::DocumentSource;
use crate::domain::document::document_from_value;
use crate::domain::{Document, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;

/// Yields documents held in memory, in order
///
/// Raw values are accepted so that callers can feed records that are not
/// objects; those surface as malformed input.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: VecDeque<Value>,
    total: u64,
    position: u64,
}

impl MemorySource {
    /// Source over already-parsed documents
    pub fn new(documents: Vec<Document>) -> Self {
        Self::from_values(documents.into_iter().map(Value::Object).collect())
    }

    /// Source over raw JSON values
    pub fn from_values(values: Vec<Value>) -> Self {
        let total = values.len() as u64;
        Self {
            records: values.into(),
            total,
            position: 0,
        }
    }
}

#[async_trait]
impl DocumentSource for MemorySource {
    async fn next_document(&mut self) -> Result<Option<Document>> {
        let Some(value) = self.records.pop_front() else {
            return Ok(None);
        };
        self.position += 1;
        document_from_value(value, &format!("memory:{}", self.position)).map(Some)
    }

    fn total_hint(&self) -> Option<u64> {
        Some(self.total)
    }

    fn describe(&self) -> String {
        format!("memory ({} records)", self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VeilError;
    use serde_json::json;

    #[tokio::test]
    async fn test_yields_in_order() {
        let mut source = MemorySource::from_values(vec![json!({"n": 1}), json!({"n": 2})]);
        assert_eq!(source.total_hint(), Some(2));
        assert_eq!(source.next_document().await.unwrap().unwrap()["n"], 1);
        assert_eq!(source.next_document().await.unwrap().unwrap()["n"], 2);
        assert!(source.next_document().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_non_object_is_malformed() {
        let mut source = MemorySource::from_values(vec![json!(42), json!({"ok": true})]);
        let err = source.next_document().await.unwrap_err();
        assert!(matches!(err, VeilError::MalformedInput { ref location, .. } if location == "memory:1"));
        assert!(source.next_document().await.unwrap().is_some());
    }
}
