//! Network address provider

use super::MaskProvider;
use anyhow::Result;
use fake::faker::internet::en::IPv4;
use fake::Fake;
use serde_json::Value;

/// Replaces values with random IPv4 addresses
#[derive(Debug, Clone, Copy, Default)]
pub struct Ipv4Provider;

impl Ipv4Provider {
    /// Random dotted-quad address
    pub fn random_address() -> String {
        IPv4().fake()
    }
}

impl MaskProvider for Ipv4Provider {
    fn generate(&self, _raw: &Value) -> Result<Value> {
        Ok(Value::String(Self::random_address()))
    }

    fn description(&self) -> &str {
        "Random IPv4 address"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::net::Ipv4Addr;

    #[test]
    fn test_generates_valid_ipv4() {
        let value = Ipv4Provider.generate(&json!("34.70.236.26")).unwrap();
        let text = value.as_str().unwrap();
        assert!(text.parse::<Ipv4Addr>().is_ok(), "not an IPv4 address: {text}");
    }
}
