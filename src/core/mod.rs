//! Core components for the crypto handles.
//!
//! This module contains the handles themselves, the constants that size
//! them, and error handling.

// Export cryptographic functionality
pub mod crypto;

// Sizes and defaults
pub mod constants;

// Error handling
pub mod error;

// Last-error record
pub mod diagnostics;

// Re-exports for convenience
pub use self::diagnostics::last_error_string;
pub use self::error::{Error, Result};
