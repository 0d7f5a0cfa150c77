// Veil - Consistent field masking for semi-structured documents
// Copyright (c) 2025 Veil Contributors
// Licensed under the MIT License

//! # Veil - Consistent field masking
//!
//! Veil rewrites streams of JSON documents so that configured fields carry
//! realistic fake values instead of real ones. Within one run, the same raw
//! value of the same mask type always maps to the same fake value, across
//! fields and across documents, so joins and aggregations over the masked
//! data still line up.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Run orchestration, batching and reporting
//! - [`masking`] - Providers, key derivation, masking maps, path resolution
//!   and the document transformer
//! - [`adapters`] - Document sources and sinks
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust
//! use veil::domain::{MaskSpecs, SuppressedFieldSet};
//! use veil::masking::{MaskMode, Masker, ProviderRegistry};
//! use serde_json::json;
//!
//! # fn main() -> veil::domain::Result<()> {
//! let specs = MaskSpecs::parse([("source.ip", Some("ipv4")), ("user.name", None)])?;
//! let mut masker = Masker::new(
//!     &ProviderRegistry::with_builtins(),
//!     specs,
//!     SuppressedFieldSet::new(),
//!     MaskMode::Rebuild,
//! )?;
//!
//! let doc = json!({"source": {"ip": "10.0.0.1"}, "user": {"name": "alice"}, "pid": 7});
//! let masked = masker.mask_document(doc.as_object().cloned().unwrap_or_default())?;
//!
//! assert_eq!(masked["user"]["name"], "alice");
//! assert!(masked.get("pid").is_none());
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Library operations return [`domain::Result`], whose error type is
//! [`domain::VeilError`]. Mask providers report failures with `anyhow`; the
//! transformer wraps them into [`domain::VeilError::Provider`].

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod masking;
