//! Mask key derivation
//!
//! A [`MaskKey`] is the lookup key under which a masked replacement is cached
//! for one mask type. Equal keys always receive the same replacement within
//! a run.

use crate::masking::provider::MaskProvider;
use anyhow::Result;
use serde_json::Value;

/// Deterministic lookup key derived from a raw value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MaskKey {
    /// A raw string value, or a synthetic string built from sub-fields
    Text(String),
    /// Canonical JSON rendering of a non-string value
    ///
    /// Kept apart from [`MaskKey::Text`] so that `"10"` and `10` never share
    /// a replacement.
    Scalar(String),
    /// Context-free sentinel: the value is regenerated on every occurrence
    Rescan,
}

impl MaskKey {
    /// Default key: the raw value itself
    pub fn identity(raw: &Value) -> Self {
        match raw {
            Value::String(s) => MaskKey::Text(s.clone()),
            other => MaskKey::Scalar(canonical_json(other)),
        }
    }

    /// Synthetic key joined from several parts with `:`
    pub fn composite<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = parts
            .into_iter()
            .map(|p| p.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(":");
        MaskKey::Text(joined)
    }

    /// Returns false for keys that must bypass the masking map
    ///
    /// Empty text keys and the rescan sentinel always call the provider.
    pub fn is_cacheable(&self) -> bool {
        match self {
            MaskKey::Text(s) => !s.is_empty(),
            MaskKey::Scalar(_) => true,
            MaskKey::Rescan => false,
        }
    }
}

/// Renders a value with object keys sorted at every level
///
/// Documents keep their input key order, so two objects with the same
/// members must be normalized before they can share a key.
fn canonical_json(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut members: Vec<_> = map.iter().collect();
            members.sort_by(|a, b| a.0.cmp(b.0));
            let body = members
                .into_iter()
                .map(|(name, member)| {
                    format!("{}:{}", Value::String(name.clone()), canonical_json(member))
                })
                .collect::<Vec<_>>()
                .join(",");
            format!("{{{body}}}")
        }
        Value::Array(items) => {
            let body = items.iter().map(canonical_json).collect::<Vec<_>>().join(",");
            format!("[{body}]")
        }
        other => other.to_string(),
    }
}

/// Keys derived for one field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskKeys {
    /// A scalar or object field
    Single(MaskKey),
    /// A multi-valued field: one entry per element, `None` for null elements
    PerElement(Vec<Option<MaskKey>>),
}

/// Derives the key(s) for a field value
///
/// Arrays yield one key per element; null elements get no key and are
/// passed through by the caller.
pub fn derive_keys(provider: &dyn MaskProvider, raw: &Value) -> Result<MaskKeys> {
    match raw {
        Value::Array(elements) => elements
            .iter()
            .map(|element| match element {
                Value::Null => Ok(None),
                other => provider.derive_key(other).map(Some),
            })
            .collect::<Result<Vec<_>>>()
            .map(MaskKeys::PerElement),
        other => provider.derive_key(other).map(MaskKeys::Single),
    }
}
