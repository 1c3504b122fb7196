/*!
Cryptographic handles and facades.

This module provides the public-key handle, the symmetric cipher handle,
and the digest and random-byte helpers they share.
*/

// Provider-backed keystream engines
pub mod algorithms;

// Symmetric cipher handle
pub mod cipher;

// Message digests
pub mod digest;

// Public-key handle
pub mod pk;

// Random bytes
pub mod random;

// Registry for algorithm lookup
pub mod registry;

// Shared traits
pub mod traits;

// Algorithm tags and configuration
pub mod types;

pub use cipher::{CipherHandle, CipherState};
pub use digest::{digest, digest256};
pub use pk::PkHandle;
pub use random::{fast_random, fill_fast, fill_strong, strong_random};
pub use registry::{get_cipher, get_registry, list_cipher_algorithms};
pub use types::{CipherAlgorithm, CryptoConfig, Direction, FilenamePolicy, KeyKind, PaddingMode};
