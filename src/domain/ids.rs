//! Domain identifier types with validation
//!
//! This module provides newtype wrappers for the identifiers used by the
//! masking engine. Each type validates its format on construction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Mask type identifier newtype wrapper
///
/// Selects which provider generates replacement values for a field
/// (e.g. `ipv4`, `geo_point`).
///
/// # Examples
///
/// ```
/// use veil::domain::ids::MaskType;
/// use std::str::FromStr;
///
/// let mask_type = MaskType::from_str("ipv4").unwrap();
/// assert_eq!(mask_type.as_str(), "ipv4");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MaskType(String);

impl MaskType {
    /// Creates a new MaskType from a string
    ///
    /// Surrounding whitespace is trimmed; an empty identifier is rejected.
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err("Mask type cannot be empty".to_string());
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Builds a mask type from a known-good built-in name
    pub(crate) fn builtin(name: &'static str) -> Self {
        debug_assert!(!name.trim().is_empty());
        Self(name.to_string())
    }

    /// Returns the mask type as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MaskType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for MaskType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MaskType> for String {
    fn from(value: MaskType) -> Self {
        value.0
    }
}

impl AsRef<str> for MaskType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Dot-delimited address of a value inside a nested document
///
/// Stored as its segments. Every segment must be non-empty, so `a..b`,
/// `.a` and `a.` are rejected.
///
/// # Examples
///
/// ```
/// use veil::domain::ids::FieldPath;
/// use std::str::FromStr;
///
/// let path = FieldPath::from_str("log.file.path").unwrap();
/// assert_eq!(path.segments(), ["log", "file", "path"]);
/// assert_eq!(path.to_string(), "log.file.path");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    /// Separator between path segments
    pub const SEPARATOR: char = '.';

    /// Parses a dot-delimited path
    pub fn new(path: impl AsRef<str>) -> Result<Self, String> {
        let path = path.as_ref().trim();
        if path.is_empty() {
            return Err("Field path cannot be empty".to_string());
        }

        let segments: Vec<String> = path.split(Self::SEPARATOR).map(str::to_string).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(format!("Field path '{path}' contains an empty segment"));
        }

        Ok(Self(segments))
    }

    /// Returns the path segments
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false: a path has at least one segment
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Final segment (the key holding the value)
    pub fn leaf(&self) -> &str {
        // Non-empty by construction
        &self.0[self.0.len() - 1]
    }

    /// Segments leading to the leaf's container
    pub fn parents(&self) -> &[String] {
        &self.0[..self.0.len() - 1]
    }

    /// Returns true if `self` is a strict prefix of `other`
    pub fn is_ancestor_of(&self, other: &FieldPath) -> bool {
        self.0.len() < other.0.len() && other.0.starts_with(&self.0)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl FromStr for FieldPath {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for FieldPath {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FieldPath> for String {
    fn from(value: FieldPath) -> Self {
        value.to_string()
    }
}
