//! User and service name providers

use super::MaskProvider;
use anyhow::Result;
use fake::faker::internet::en::Username;
use fake::faker::lorem::en::Word;
use fake::Fake;
use rand::Rng;
use serde_json::Value;

/// Replaces values with random user names
#[derive(Debug, Clone, Copy, Default)]
pub struct UsernameProvider;

impl MaskProvider for UsernameProvider {
    fn generate(&self, _raw: &Value) -> Result<Value> {
        let name: String = Username().fake();
        Ok(Value::String(name))
    }

    fn description(&self) -> &str {
        "Random user name"
    }
}

/// Replaces values with service-like names (`word-word-NN`)
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceProvider;

impl MaskProvider for ServiceProvider {
    fn generate(&self, _raw: &Value) -> Result<Value> {
        let first: String = Word().fake();
        let second: String = Word().fake();
        let suffix: u8 = rand::thread_rng().gen_range(1..100);
        Ok(Value::String(format!("{first}-{second}-{suffix:02}")))
    }

    fn description(&self) -> &str {
        "Random service name (word-word-NN)"
    }
}
