/*!
Registry for cryptographic algorithms.

This module provides the process-wide, read-only tables that tie each
cipher tag to its provider primitive.
*/

pub mod manager;

// Re-export registry manager functions
pub use manager::{
    CryptoRegistry,
    Primitive,
    get_cipher,
    get_registry,
    list_cipher_algorithms,
    provider_primitive,
};
