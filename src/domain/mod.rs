//! Domain models and types for Veil.
//!
//! This module contains the core domain types shared by the masking engine,
//! the run orchestrator and the adapters.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`MaskType`], [`FieldPath`])
//! - **Documents and rules** ([`Document`], [`MaskSpecs`], [`SuppressedFieldSet`])
//! - **Error types** ([`VeilError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Field paths are parsed once, when configuration is loaded:
//!
//! ```rust
//! use veil::domain::{FieldPath, MaskType};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let path = FieldPath::new("source.ip")?;
//! let mask_type = MaskType::new("ipv4")?;
//! assert_eq!(path.leaf(), "ip");
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, VeilError>`]:
//!
//! ```rust
//! use veil::domain::{Result, VeilError};
//!
//! fn example() -> Result<()> {
//!     Err(VeilError::Configuration("unknown mask type 'ipv6'".to_string()))
//! }
//! ```

pub mod document;
pub mod errors;
pub mod ids;
pub mod result;

// Re-export commonly used types for convenience
pub use document::{Document, MaskSpecs, SuppressedFieldSet};
pub use errors::{DocumentErrorDetail, VeilError};
pub use ids::{FieldPath, MaskType};
pub use result::Result;
