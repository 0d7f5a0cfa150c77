//! Result type alias for Veil
//!
//! This module provides a convenient Result type alias that uses VeilError
//! as the error type.

use super::errors::VeilError;

/// Result type alias for Veil operations
///
/// # Examples
///
/// ```
/// use veil::domain::result::Result;
/// use veil::domain::errors::VeilError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(VeilError::Configuration("unknown mask type".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, VeilError>;
