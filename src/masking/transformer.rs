//! Document transformer
//!
//! Applies mask specs and suppression to one document at a time. Two modes
//! are supported:
//!
//! - [`MaskMode::InPlace`]: every field is kept; configured fields are
//!   masked where they sit.
//! - [`MaskMode::Rebuild`]: the output holds only the configured paths.
//!
//! In both modes suppressed paths are removed last, so they never reach the
//! output even when a mask spec names them too.

use crate::domain::{Document, FieldPath, MaskSpecs, MaskType, Result, SuppressedFieldSet, VeilError};
use crate::masking::key::{derive_keys, MaskKeys};
use crate::masking::path::{delete_at, get_at, get_at_mut, insert_at};
use crate::masking::provider::{MaskProvider, ProviderRegistry};
use crate::masking::store::{MaskingMapStore, StoreStats};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// How unconfigured fields are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskMode {
    /// Keep every field, mask the configured ones in place
    InPlace,
    /// Emit only the configured fields
    Rebuild,
}

impl MaskMode {
    /// Mode for an `include_rest` setting
    pub fn from_include_rest(include_rest: bool) -> Self {
        if include_rest {
            MaskMode::InPlace
        } else {
            MaskMode::Rebuild
        }
    }

    /// Returns true if unconfigured fields are kept
    pub fn include_rest(&self) -> bool {
        matches!(self, MaskMode::InPlace)
    }

    /// Default number of documents per output batch
    ///
    /// Rebuilt documents are small, so that mode batches more of them.
    pub fn default_batch_size(&self) -> usize {
        match self {
            MaskMode::InPlace => 10_000,
            MaskMode::Rebuild => 100_000,
        }
    }
}

impl std::fmt::Display for MaskMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaskMode::InPlace => write!(f, "in_place"),
            MaskMode::Rebuild => write!(f, "rebuild"),
        }
    }
}

/// Lifecycle of a document through a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentStage {
    /// Read from the source, untouched
    Unprocessed,
    /// Mask specs applied
    FieldsMasked,
    /// Suppressed paths removed
    SuppressedFieldsRemoved,
    /// Handed to a sink (or counted, in dry-run)
    Emitted,
}

/// Applies mask specs to documents, keeping replacements consistent across
/// the whole run
pub struct Masker {
    specs: MaskSpecs,
    suppressed: SuppressedFieldSet,
    mode: MaskMode,
    registry: ProviderRegistry,
    store: MaskingMapStore,
}

impl Masker {
    /// Create a masker
    ///
    /// Every mask type named by `specs` is checked against the registry up
    /// front.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if any mask type is unknown.
    pub fn new(
        registry: &ProviderRegistry,
        specs: MaskSpecs,
        suppressed: SuppressedFieldSet,
        mode: MaskMode,
    ) -> Result<Self> {
        registry.validate(&specs)?;

        tracing::debug!(
            mode = %mode,
            specs = specs.len(),
            suppressed = suppressed.len(),
            mask_types = specs.mask_types().len(),
            "Masker initialized"
        );

        Ok(Self {
            specs,
            suppressed,
            mode,
            registry: registry.clone(),
            store: MaskingMapStore::new(),
        })
    }

    /// Mask one document
    ///
    /// # Errors
    ///
    /// Returns [`VeilError::Provider`] if a provider fails; the document
    /// should then be dropped. Replacements cached before the failure stay
    /// in the store.
    pub fn mask_document(&mut self, doc: Document) -> Result<Document> {
        tracing::trace!(stage = ?DocumentStage::Unprocessed, "Masking document");
        let mut masked = match self.mode {
            MaskMode::InPlace => self.mask_in_place(doc)?,
            MaskMode::Rebuild => self.rebuild(&doc)?,
        };
        tracing::trace!(stage = ?DocumentStage::FieldsMasked);

        for path in self.suppressed.iter() {
            delete_at(&mut masked, path);
        }
        tracing::trace!(stage = ?DocumentStage::SuppressedFieldsRemoved);

        Ok(masked)
    }

    /// Mask a single value as if it sat at `path`
    ///
    /// A `None` mask type returns the value unchanged.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unknown mask type and
    /// [`VeilError::Provider`] if the provider fails.
    pub fn mask_value(
        &mut self,
        path: &FieldPath,
        mask_type: Option<&MaskType>,
        raw: &Value,
    ) -> Result<Value> {
        let Some(mask_type) = mask_type else {
            return Ok(raw.clone());
        };
        let provider = self.registry.get(mask_type)?;
        mask_field(&mut self.store, provider.as_ref(), mask_type, path, raw)
    }

    fn mask_in_place(&mut self, mut doc: Document) -> Result<Document> {
        for (path, mask) in self.specs.iter() {
            let Some(mask_type) = mask else {
                continue;
            };
            if self.suppressed.contains(path) {
                continue;
            }
            let Some(slot) = get_at_mut(&mut doc, path) else {
                continue;
            };
            let provider = self.registry.get(mask_type)?;
            let masked = mask_field(&mut self.store, provider.as_ref(), mask_type, path, &*slot)?;
            *slot = masked;
        }
        Ok(doc)
    }

    fn rebuild(&mut self, doc: &Document) -> Result<Document> {
        let mut out = Document::new();
        for (path, mask) in self.specs.iter() {
            if self.suppressed.contains(path) {
                continue;
            }
            let Some(raw) = get_at(doc, path) else {
                continue;
            };
            let value = match mask {
                None => raw.clone(),
                Some(mask_type) => {
                    let provider = self.registry.get(mask_type)?;
                    mask_field(&mut self.store, provider.as_ref(), mask_type, path, raw)?
                }
            };
            if !insert_at(&mut out, path, value) {
                tracing::debug!(field = %path, "Skipping field nested under a non-object value");
            }
        }
        Ok(out)
    }

    /// Masking mode
    pub fn mode(&self) -> MaskMode {
        self.mode
    }

    /// Configured mask specs
    pub fn specs(&self) -> &MaskSpecs {
        &self.specs
    }

    /// Replacement cache statistics
    pub fn store_stats(&self) -> StoreStats {
        self.store.stats()
    }

    /// Read-only access to the replacement cache
    pub fn store(&self) -> &MaskingMapStore {
        &self.store
    }
}

impl std::fmt::Debug for Masker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Masker")
            .field("mode", &self.mode)
            .field("specs", &self.specs.len())
            .field("suppressed", &self.suppressed.len())
            .field("cached", &self.store.len())
            .finish()
    }
}

/// Masks one field value
///
/// Null stays null. Arrays are masked element by element, each element
/// under its own key.
fn mask_field(
    store: &mut MaskingMapStore,
    provider: &dyn MaskProvider,
    mask_type: &MaskType,
    path: &FieldPath,
    raw: &Value,
) -> Result<Value> {
    if raw.is_null() {
        return Ok(Value::Null);
    }

    let masked = match derive_keys(provider, raw) {
        Ok(MaskKeys::Single(key)) => store.resolve(mask_type, key, raw, provider),
        Ok(MaskKeys::PerElement(keys)) => {
            let elements = raw.as_array().map(Vec::as_slice).unwrap_or_default();
            keys.into_iter()
                .zip(elements)
                .map(|(key, element)| match key {
                    None => Ok(Value::Null),
                    Some(key) => store.resolve(mask_type, key, element, provider),
                })
                .collect::<anyhow::Result<Vec<_>>>()
                .map(Value::Array)
        }
        Err(e) => Err(e),
    };

    masked.map_err(|e| {
        tracing::warn!(
            mask_type = %mask_type,
            field = %path,
            value_sha256 = %hash_value(raw),
            error = %e,
            "Mask provider failed"
        );
        VeilError::Provider {
            mask_type: mask_type.to_string(),
            field: path.to_string(),
            reason: format!("{e:#}"),
        }
    })
}

/// SHA-256 of a value's JSON rendering, for logs that must not carry it
fn hash_value(value: &Value) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.to_string().as_bytes());
    format!("{:x}", hasher.finalize())
}
