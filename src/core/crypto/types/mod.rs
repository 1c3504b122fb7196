/*!
Core types for cryptographic operations.

This module provides the type definitions and configuration
used throughout the cryptographic subsystem.
*/

pub mod algorithms;
pub mod config;

// Re-export core types for easier access
pub use algorithms::{CipherAlgorithm, Direction, KeyKind, PaddingMode};
pub use config::{CryptoConfig, FilenamePolicy};
