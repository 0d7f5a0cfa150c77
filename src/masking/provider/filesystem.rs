//! File path provider

use super::MaskProvider;
use anyhow::Result;
use fake::faker::filesystem::en::FilePath;
use fake::Fake;
use serde_json::Value;

/// Replaces values with random file paths
#[derive(Debug, Clone, Copy, Default)]
pub struct FilePathProvider;

impl MaskProvider for FilePathProvider {
    fn generate(&self, _raw: &Value) -> Result<Value> {
        let path: String = FilePath().fake();
        Ok(Value::String(path))
    }

    fn description(&self) -> &str {
        "Random file path"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generates_path_string() {
        let value = FilePathProvider
            .generate(&json!("/var/log/auth.log"))
            .unwrap();
        assert!(!value.as_str().unwrap().is_empty());
    }
}
