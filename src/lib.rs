/*!
# Crypto Handles

Provider-agnostic handles for public-key and stream-cipher cryptography.

## Overview

This library wraps RustCrypto providers behind two handle types:

- [`PkHandle`] holds an RSA keypair or public key. Handles are reference
  counted and duplicating one aliases the same key slot.
- [`CipherHandle`] owns sized key and IV buffers plus a streaming context
  for one of the identity, DES-OFB, RC4 or two-key DES-EDE-OFB ciphers.

Alongside them sit one-shot digests ([`digest`], [`digest256`]) and random
byte sources from the OS ([`strong_random`]) or the thread-local generator
([`fast_random`]).

Every failing call returns an [`Error`]. The message of the most recent
failure is also kept for [`last_error_string`].

## Features

- `des` (default): DES-OFB and DES-EDE-OFB
- `rc4` (default): RC4 with a 128-bit key
- `serde-support`: serde derives on tags and configuration
*/

// Core components
pub mod core;

// Re-export commonly used types for convenience
pub use crate::core::constants::{DIGEST_LEN, DIGEST256_LEN, sizes};
pub use crate::core::diagnostics::last_error_string;
pub use crate::core::error::{Error, Result};

pub use crate::core::crypto::{
    CipherAlgorithm, CipherHandle, CipherState, CryptoConfig, Direction, FilenamePolicy, KeyKind,
    PaddingMode, PkHandle,
};
pub use crate::core::crypto::{digest, digest256, fast_random, fill_fast, fill_strong, strong_random};
pub use crate::core::crypto::registry::{get_cipher, list_cipher_algorithms};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
