/*!
Configuration for public-key handles.

This module holds the key generation parameters, the default padding
mode and the approved filename-character set used when loading keys
from disk.
*/

use std::path::Path;

use crate::core::constants::{
    DEFAULT_KEY_BITS, DEFAULT_PUBLIC_EXPONENT, LEGAL_FILENAME_CHARACTERS, MIN_KEY_BITS,
};
use crate::core::crypto::types::algorithms::PaddingMode;
use crate::core::error::{Error, Result};
use crate::crypto_err;

/// Approved set of characters for key file paths
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct FilenamePolicy {
    allowed: String,
}

impl Default for FilenamePolicy {
    fn default() -> Self {
        Self::new(LEGAL_FILENAME_CHARACTERS)
    }
}

impl FilenamePolicy {
    /// Create a policy from the characters it allows
    pub fn new(allowed: impl Into<String>) -> Self {
        Self { allowed: allowed.into() }
    }

    /// The allowed characters
    pub fn allowed(&self) -> &str {
        &self.allowed
    }

    /// Check that every character of `path` is in the approved set.
    ///
    /// Paths that are not valid UTF-8 are rejected on the first
    /// replacement character.
    pub fn check(&self, path: &Path) -> Result<()> {
        let text = path.to_string_lossy();
        match text.chars().find(|c| !self.allowed.contains(*c)) {
            Some(character) => crypto_err!(Error::InvalidPath {
                path: path.to_path_buf(),
                character,
            }),
            None => Ok(()),
        }
    }
}

/// Configuration carried by every public-key handle
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct CryptoConfig {
    /// Modulus size for generated keys
    pub key_bits: usize,
    /// Public exponent for generated keys
    pub public_exponent: u64,
    /// Padding used when a caller does not pick one
    pub padding: PaddingMode,
    /// Characters allowed in key file paths
    pub filename_policy: FilenamePolicy,
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            key_bits: DEFAULT_KEY_BITS,
            public_exponent: DEFAULT_PUBLIC_EXPONENT,
            padding: PaddingMode::default(),
            filename_policy: FilenamePolicy::default(),
        }
    }
}

impl CryptoConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration with specific key generation parameters
    pub fn with_key_params(key_bits: usize, public_exponent: u64) -> Self {
        Self {
            key_bits,
            public_exponent,
            ..Self::default()
        }
    }

    /// Create a configuration for 2048-bit keys
    pub fn high_security() -> Self {
        Self::with_key_params(2048, DEFAULT_PUBLIC_EXPONENT)
    }

    /// Replace the default padding
    pub fn with_padding(mut self, padding: PaddingMode) -> Self {
        self.padding = padding;
        self
    }

    /// Replace the filename policy
    pub fn with_filename_policy(mut self, policy: FilenamePolicy) -> Self {
        self.filename_policy = policy;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.key_bits < MIN_KEY_BITS {
            return crypto_err!(Error::KeyGenerationFailed(format!(
                "modulus of {} bits is below the minimum of {}",
                self.key_bits, MIN_KEY_BITS
            )));
        }

        if self.public_exponent < 3 || self.public_exponent % 2 == 0 {
            return crypto_err!(Error::KeyGenerationFailed(format!(
                "public exponent {} must be odd and at least 3",
                self.public_exponent
            )));
        }

        Ok(())
    }
}
