//! Mask providers
//!
//! A provider generates replacement values for one mask type and may define
//! how the lookup key is derived from a raw value. Providers are registered
//! by name in a [`ProviderRegistry`]; the built-in set covers network,
//! filesystem, naming, geographic and free-text fields.

pub mod filesystem;
pub mod geo;
pub mod message;
pub mod naming;
pub mod network;

use crate::domain::{MaskSpecs, MaskType, Result, VeilError};
use crate::masking::key::MaskKey;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

pub use filesystem::FilePathProvider;
pub use geo::GeoPointProvider;
pub use message::MessageProvider;
pub use naming::{ServiceProvider, UsernameProvider};
pub use network::Ipv4Provider;

/// Built-in mask type: IPv4 addresses
pub const IPV4: &str = "ipv4";
/// Built-in mask type: file paths
pub const FILE_PATH: &str = "file_path";
/// Built-in mask type: user names
pub const USERNAME: &str = "username";
/// Built-in mask type: service / namespace names
pub const SERVICE: &str = "service";
/// Built-in mask type: geo point objects
pub const GEO_POINT: &str = "geo_point";
/// Built-in mask type: free-text messages (embedded IPv4 addresses)
pub const MESSAGE: &str = "message";

/// Trait for mask provider implementations
pub trait MaskProvider: Send + Sync {
    /// Generate a replacement for a raw value
    ///
    /// The replacement must be JSON-serializable; it may be a scalar, an
    /// object or an array.
    fn generate(&self, raw: &Value) -> anyhow::Result<Value>;

    /// Derive the lookup key for a raw value
    ///
    /// Defaults to the raw value itself.
    fn derive_key(&self, raw: &Value) -> anyhow::Result<MaskKey> {
        Ok(MaskKey::identity(raw))
    }

    /// One-line description shown by the `providers` command
    fn description(&self) -> &str {
        ""
    }
}

/// Registry of named mask providers
#[derive(Clone)]
pub struct ProviderRegistry {
    providers: HashMap<MaskType, Arc<dyn MaskProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry
    pub fn empty() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// Create a registry holding the built-in providers
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        let builtins: [(&str, Arc<dyn MaskProvider>); 6] = [
            (IPV4, Arc::new(Ipv4Provider)),
            (FILE_PATH, Arc::new(FilePathProvider)),
            (USERNAME, Arc::new(UsernameProvider)),
            (SERVICE, Arc::new(ServiceProvider)),
            (GEO_POINT, Arc::new(GeoPointProvider)),
            (MESSAGE, Arc::new(MessageProvider::new())),
        ];
        for (name, provider) in builtins {
            registry.providers.insert(MaskType::builtin(name), provider);
        }
        registry
    }

    /// Register a provider, replacing any provider already registered under
    /// the same mask type
    ///
    /// Returns the replaced provider, if any.
    pub fn register(
        &mut self,
        mask_type: MaskType,
        provider: Arc<dyn MaskProvider>,
    ) -> Option<Arc<dyn MaskProvider>> {
        tracing::debug!(mask_type = %mask_type, "Registering mask provider");
        self.providers.insert(mask_type, provider)
    }

    /// Look up the provider for a mask type
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the mask type is not registered.
    pub fn get(&self, mask_type: &MaskType) -> Result<Arc<dyn MaskProvider>> {
        self.providers.get(mask_type).cloned().ok_or_else(|| {
            VeilError::Configuration(format!(
                "Unknown mask type '{}'. Registered types: {}",
                mask_type,
                self.identifiers()
                    .iter()
                    .map(|t| t.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })
    }

    /// Returns true if a provider is registered for the mask type
    pub fn contains(&self, mask_type: &MaskType) -> bool {
        self.providers.contains_key(mask_type)
    }

    /// Registered mask types, sorted
    pub fn identifiers(&self) -> Vec<&MaskType> {
        let mut ids: Vec<&MaskType> = self.providers.keys().collect();
        ids.sort();
        ids
    }

    /// Check every mask type referenced by `specs`
    ///
    /// # Errors
    ///
    /// Returns one configuration error naming all unknown mask types.
    pub fn validate(&self, specs: &MaskSpecs) -> Result<()> {
        let unknown: Vec<String> = specs
            .iter()
            .filter_map(|(path, mask)| match mask {
                Some(mask_type) if !self.contains(mask_type) => {
                    Some(format!("'{mask_type}' (field '{path}')"))
                }
                _ => None,
            })
            .collect();

        if unknown.is_empty() {
            Ok(())
        } else {
            Err(VeilError::Configuration(format!(
                "Unknown mask type(s): {}",
                unknown.join(", ")
            )))
        }
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("mask_types", &self.identifiers())
            .finish()
    }
}
