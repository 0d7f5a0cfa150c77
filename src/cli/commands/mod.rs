//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod init;
pub mod mask;
pub mod providers;
pub mod validate;

/// Exit code for a clean run
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code when documents were skipped or dropped
pub const EXIT_PARTIAL: i32 = 1;
/// Exit code for configuration errors
pub const EXIT_CONFIG_ERROR: i32 = 2;
/// Exit code for fatal errors
pub const EXIT_FATAL: i32 = 5;
/// Exit code after a shutdown signal (SIGINT convention)
pub const EXIT_INTERRUPTED: i32 = 130;
