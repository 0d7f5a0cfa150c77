//! Consistent field masking
//!
//! This module turns raw documents into masked ones. It is synchronous and
//! has no I/O; the run orchestrator in [`crate::core::run`] drives it.
//!
//! # Architecture
//!
//! - **Paths** ([`path`]): iterative get / insert / delete over nested objects
//! - **Providers** ([`provider`]): named generators of replacement values
//! - **Keys** ([`key`]): how a raw value maps to a cache key
//! - **Store** ([`store`]): first-writer-wins replacement cache per mask type
//! - **Transformer** ([`transformer`]): applies mask specs and suppression
//!
//! # Examples
//!
//! ```
//! use veil::domain::{MaskSpecs, SuppressedFieldSet};
//! use veil::masking::{Masker, MaskMode, ProviderRegistry};
//! use serde_json::json;
//!
//! # fn example() -> veil::domain::Result<()> {
//! let specs = MaskSpecs::parse([("source.ip", Some("ipv4")), ("@timestamp", None)])?;
//! let mut masker = Masker::new(
//!     &ProviderRegistry::with_builtins(),
//!     specs,
//!     SuppressedFieldSet::new(),
//!     MaskMode::Rebuild,
//! )?;
//!
//! let doc = json!({"source": {"ip": "34.70.236.26"}, "user": {"name": "alice"}});
//! let masked = masker.mask_document(doc.as_object().cloned().unwrap_or_default())?;
//! assert!(masked.get("user").is_none());
//! assert_ne!(masked["source"]["ip"], json!("34.70.236.26"));
//! # Ok(())
//! # }
//! ```

pub mod key;
pub mod path;
pub mod provider;
pub mod store;
pub mod transformer;

pub use key::{MaskKey, MaskKeys};
pub use provider::{MaskProvider, ProviderRegistry};
pub use store::{MaskingMapStore, StoreStats};
pub use transformer::{DocumentStage, MaskMode, Masker};
