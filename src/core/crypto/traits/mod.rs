/*!
Core traits for cryptographic operations.

This module defines the interfaces provider implementations plug into.
*/

pub mod cipher;

// Re-export core traits for easier access
pub use cipher::KeystreamCipher;
