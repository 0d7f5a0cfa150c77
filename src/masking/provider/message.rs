//! Free-text message provider
//!
//! Rewrites every dotted-quad substring of a message with a random IPv4
//! address and leaves the rest of the text untouched. Messages are nearly
//! always unique, so the provider opts out of the masking map.

use super::network::Ipv4Provider;
use super::MaskProvider;
use crate::masking::key::MaskKey;
use anyhow::Result;
use regex::Regex;
use serde_json::Value;

const IPV4_PATTERN: &str = r"\b(?:\d{1,3}\.){3}\d{1,3}\b";

/// Masks IPv4 addresses embedded in text
#[derive(Debug, Clone)]
pub struct MessageProvider {
    pattern: Regex,
}

impl MessageProvider {
    /// Create the provider
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(IPV4_PATTERN).expect("IPv4 pattern is a valid regex"),
        }
    }

    /// Replaces each address-like substring with a fresh random address
    pub fn scrub(&self, text: &str) -> String {
        self.pattern
            .replace_all(text, |_: &regex::Captures| Ipv4Provider::random_address())
            .into_owned()
    }
}

impl Default for MessageProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MaskProvider for MessageProvider {
    fn generate(&self, raw: &Value) -> Result<Value> {
        match raw {
            Value::String(text) => Ok(Value::String(self.scrub(text))),
            other => Ok(other.clone()),
        }
    }

    fn derive_key(&self, _raw: &Value) -> Result<MaskKey> {
        Ok(MaskKey::Rescan)
    }

    fn description(&self) -> &str {
        "Replaces IPv4 addresses inside free text"
    }
}
