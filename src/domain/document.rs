//! Documents and masking rules
//!
//! A [`Document`] is a JSON object with no fixed schema. [`MaskSpecs`] and
//! [`SuppressedFieldSet`] describe what happens to its fields during a run;
//! both are immutable once the run starts.

use super::errors::VeilError;
use super::ids::{FieldPath, MaskType};
use super::Result;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// A nested key/value record
pub type Document = Map<String, Value>;

/// Mask type names that mean "pass the value through unmasked"
///
/// TOML has no null, so configuration files spell identity this way.
pub const IDENTITY_MASK_NAMES: [&str; 3] = ["none", "identity", "keep"];

/// Converts a parsed JSON value into a document
///
/// Only JSON objects are documents; anything else is malformed input.
pub fn document_from_value(value: Value, location: &str) -> Result<Document> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(VeilError::MalformedInput {
            location: location.to_string(),
            reason: format!("expected a JSON object, found {}", json_kind(&other)),
        }),
    }
}

/// Parses one line of text into a document
pub fn parse_document(line: &str, location: &str) -> Result<Document> {
    let value: Value = serde_json::from_str(line).map_err(|e| VeilError::MalformedInput {
        location: location.to_string(),
        reason: e.to_string(),
    })?;
    document_from_value(value, location)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Field path → mask type association
///
/// A `None` mask type passes the value through unchanged. Iteration order is
/// the sorted path order, so a parent path is always visited before its
/// children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaskSpecs {
    specs: BTreeMap<FieldPath, Option<MaskType>>,
}

impl MaskSpecs {
    /// Creates an empty set of specs
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the spec for a path
    pub fn insert(&mut self, path: FieldPath, mask_type: Option<MaskType>) {
        self.specs.insert(path, mask_type);
    }

    /// Parses raw `path → mask type` pairs
    ///
    /// A missing mask type, an empty string or one of
    /// [`IDENTITY_MASK_NAMES`] yields an identity spec.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unparseable field path.
    pub fn parse<'a, I>(raw: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
    {
        let mut specs = Self::new();
        for (path, mask) in raw {
            let path = FieldPath::new(path).map_err(VeilError::Configuration)?;
            let mask_type = match mask.map(str::trim) {
                None => None,
                Some(name)
                    if name.is_empty()
                        || IDENTITY_MASK_NAMES.contains(&name.to_lowercase().as_str()) =>
                {
                    None
                }
                Some(name) => Some(MaskType::new(name).map_err(VeilError::Configuration)?),
            };
            specs.insert(path, mask_type);
        }
        Ok(specs)
    }

    /// Iterates over `(path, mask type)` pairs in path order
    pub fn iter(&self) -> impl Iterator<Item = (&FieldPath, Option<&MaskType>)> {
        self.specs.iter().map(|(path, mask)| (path, mask.as_ref()))
    }

    /// Distinct mask types referenced by the specs
    pub fn mask_types(&self) -> BTreeSet<&MaskType> {
        self.specs.values().flatten().collect()
    }

    /// Mask type configured for a path, if any
    pub fn get(&self, path: &FieldPath) -> Option<Option<&MaskType>> {
        self.specs.get(path).map(Option::as_ref)
    }

    /// Number of configured paths
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Returns true if no path is configured
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

/// Field paths whose values must never appear in output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuppressedFieldSet {
    paths: BTreeSet<FieldPath>,
}

impl SuppressedFieldSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses dot-delimited paths
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unparseable field path.
    pub fn parse<'a, I>(raw: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let paths = raw
            .into_iter()
            .map(|p| FieldPath::new(p).map_err(VeilError::Configuration))
            .collect::<Result<BTreeSet<_>>>()?;
        Ok(Self { paths })
    }

    /// Adds a path
    pub fn insert(&mut self, path: FieldPath) {
        self.paths.insert(path);
    }

    /// Returns true if exactly this path is suppressed
    pub fn contains(&self, path: &FieldPath) -> bool {
        self.paths.contains(path)
    }

    /// Iterates over the suppressed paths
    pub fn iter(&self) -> impl Iterator<Item = &FieldPath> {
        self.paths.iter()
    }

    /// Number of suppressed paths
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Returns true if nothing is suppressed
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl FromIterator<FieldPath> for SuppressedFieldSet {
    fn from_iter<T: IntoIterator<Item = FieldPath>>(iter: T) -> Self {
        Self {
            paths: iter.into_iter().collect(),
        }
    }
}
