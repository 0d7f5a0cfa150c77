//! Masking map store
//!
//! Per mask type, maps each derived key to the replacement generated the
//! first time that key was seen. Entries are never overwritten, so masking
//! is consistent for the lifetime of a run.

use crate::domain::MaskType;
use crate::masking::key::MaskKey;
use crate::masking::provider::MaskProvider;
use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Run-scoped cache of generated replacements
#[derive(Debug, Default)]
pub struct MaskingMapStore {
    maps: HashMap<MaskType, HashMap<MaskKey, Value>>,
}

/// Per mask type entry counts
///
/// Holds counts only; replacement values never leave the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Distinct keys cached, per mask type
    pub entries: BTreeMap<String, usize>,
}

impl StoreStats {
    /// Total entries across all mask types
    pub fn total(&self) -> usize {
        self.entries.values().sum()
    }
}

impl MaskingMapStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached replacement for `key`, generating and caching it
    /// on first sight
    ///
    /// Non-cacheable keys (empty text, the rescan sentinel) call the
    /// provider every time and leave the store untouched.
    ///
    /// # Errors
    ///
    /// Propagates provider failures; nothing is cached for a failed key.
    pub fn resolve(
        &mut self,
        mask_type: &MaskType,
        key: MaskKey,
        raw: &Value,
        provider: &dyn MaskProvider,
    ) -> Result<Value> {
        if !key.is_cacheable() {
            return provider.generate(raw);
        }

        let map = self.maps.entry(mask_type.clone()).or_default();
        if let Some(existing) = map.get(&key) {
            return Ok(existing.clone());
        }

        let generated = provider.generate(raw)?;
        map.insert(key, generated.clone());
        Ok(generated)
    }

    /// Cached replacement for a key, if any
    pub fn lookup(&self, mask_type: &MaskType, key: &MaskKey) -> Option<&Value> {
        self.maps.get(mask_type)?.get(key)
    }

    /// Entry counts per mask type
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            entries: self
                .maps
                .iter()
                .map(|(mask_type, map)| (mask_type.to_string(), map.len()))
                .collect(),
        }
    }

    /// Total number of cached entries
    pub fn len(&self) -> usize {
        self.maps.values().map(HashMap::len).sum()
    }

    /// Returns true if nothing has been cached yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Emits "v1", "v2", ... so every generation is distinguishable
    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    impl MaskProvider for Counting {
        fn generate(&self, _raw: &Value) -> Result<Value> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(json!(format!("v{n}")))
        }
    }

    struct Failing;

    impl MaskProvider for Failing {
        fn generate(&self, _raw: &Value) -> Result<Value> {
            Err(anyhow::anyhow!("generator exhausted"))
        }
    }

    fn mask_type(name: &str) -> MaskType {
        MaskType::new(name).unwrap()
    }

    fn text(s: &str) -> MaskKey {
        MaskKey::Text(s.to_string())
    }

    #[test]
    fn test_first_writer_wins() {
        let mut store = MaskingMapStore::new();
        let provider = Counting::default();
        let ipv4 = mask_type("ipv4");

        let first = store.resolve(&ipv4, text("10.0.0.1"), &json!("10.0.0.1"), &provider).unwrap();
        let second = store.resolve(&ipv4, text("10.0.0.1"), &json!("10.0.0.1"), &provider).unwrap();

        assert_eq!(first, json!("v1"));
        assert_eq!(second, json!("v1"));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_distinct_keys_get_distinct_entries() {
        let mut store = MaskingMapStore::new();
        let provider = Counting::default();
        let ipv4 = mask_type("ipv4");

        store.resolve(&ipv4, text("a"), &json!("a"), &provider).unwrap();
        store.resolve(&ipv4, text("b"), &json!("b"), &provider).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.lookup(&ipv4, &text("b")), Some(&json!("v2")));
    }

    #[test]
    fn test_maps_are_separate_per_mask_type() {
        let mut store = MaskingMapStore::new();
        let provider = Counting::default();

        let a = store.resolve(&mask_type("ipv4"), text("x"), &json!("x"), &provider).unwrap();
        let b = store.resolve(&mask_type("username"), text("x"), &json!("x"), &provider).unwrap();

        assert_ne!(a, b);
        assert_eq!(store.stats().entries.len(), 2);
    }

    #[test]
    fn test_non_cacheable_keys_bypass_store() {
        let mut store = MaskingMapStore::new();
        let provider = Counting::default();
        let message = mask_type("message");

        let a = store.resolve(&message, MaskKey::Rescan, &json!("m"), &provider).unwrap();
        let b = store.resolve(&message, MaskKey::Rescan, &json!("m"), &provider).unwrap();
        let c = store.resolve(&message, text(""), &json!(""), &provider).unwrap();

        assert_ne!(a, b);
        assert_ne!(b, c);
        assert!(store.is_empty());
    }

    #[test]
    fn test_failed_generation_is_not_cached() {
        let mut store = MaskingMapStore::new();
        let ipv4 = mask_type("ipv4");

        assert!(store.resolve(&ipv4, text("a"), &json!("a"), &Failing).is_err());
        assert!(store.lookup(&ipv4, &text("a")).is_none());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_stats_report_counts_only() {
        let mut store = MaskingMapStore::new();
        let provider = Counting::default();
        let ipv4 = mask_type("ipv4");
        for ip in ["1.1.1.1", "2.2.2.2", "1.1.1.1"] {
            store.resolve(&ipv4, text(ip), &json!(ip), &provider).unwrap();
        }

        let stats = store.stats();
        assert_eq!(stats.entries.get("ipv4"), Some(&2));
        assert_eq!(stats.total(), 2);
        let rendered = serde_json::to_string(&stats).unwrap();
        assert!(!rendered.contains("1.1.1.1"));
        assert!(!rendered.contains("v1"));
    }
}
