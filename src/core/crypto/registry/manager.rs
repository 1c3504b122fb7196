/*!
Registry manager for cryptographic algorithms.

This module maps cipher tags to the provider primitive that implements
them and resolves algorithm names. The tables are built once and never
change afterwards.
*/

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;

use crate::core::crypto::types::algorithms::{CipherAlgorithm, Direction};

/// Provider primitive backing a cipher tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// Pass-through keystream
    Null,
    /// DES block cipher in output-feedback mode
    #[cfg(feature = "des")]
    DesOfb,
    /// RC4 keystream with a 128-bit key
    #[cfg(feature = "rc4")]
    Rc4,
    /// Two-key triple DES (EDE) in output-feedback mode
    #[cfg(feature = "des")]
    DesEdeOfb,
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Null => write!(f, "null"),
            #[cfg(feature = "des")]
            Primitive::DesOfb => write!(f, "DES-OFB"),
            #[cfg(feature = "rc4")]
            Primitive::Rc4 => write!(f, "RC4"),
            #[cfg(feature = "des")]
            Primitive::DesEdeOfb => write!(f, "DES-EDE-OFB"),
        }
    }
}

/// Look up the provider primitive for `algorithm` in `direction`.
///
/// All supported primitives are keystream ciphers, so both directions
/// resolve to the same primitive. Returns `None` when the provider for the
/// tag was not compiled in.
pub fn provider_primitive(algorithm: CipherAlgorithm, direction: Direction) -> Option<Primitive> {
    let _ = direction;
    match algorithm {
        CipherAlgorithm::Identity => Some(Primitive::Null),
        #[cfg(feature = "des")]
        CipherAlgorithm::Des => Some(Primitive::DesOfb),
        #[cfg(feature = "rc4")]
        CipherAlgorithm::Rc4 => Some(Primitive::Rc4),
        #[cfg(feature = "des")]
        CipherAlgorithm::TripleDes => Some(Primitive::DesEdeOfb),
        #[allow(unreachable_patterns)]
        _ => None,
    }
}

/// Registry of cipher algorithm names
pub struct CryptoRegistry {
    /// Available symmetric cipher algorithms
    cipher_algorithms: HashMap<&'static str, CipherAlgorithm>,
}

impl CryptoRegistry {
    /// Create a new registry with every algorithm this build supports
    fn new() -> Self {
        let mut registry = Self {
            cipher_algorithms: HashMap::new(),
        };

        for algorithm in CipherAlgorithm::ALL {
            if algorithm.is_available() {
                registry.cipher_algorithms.insert(algorithm.name(), algorithm);
            }
        }

        registry
    }

    /// Look up a cipher algorithm by name
    pub fn get_cipher(&self, name: &str) -> Option<CipherAlgorithm> {
        self.cipher_algorithms.get(name).copied()
    }

    /// List available cipher algorithms
    pub fn list_cipher_algorithms(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.cipher_algorithms.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

// Global registry instance
static REGISTRY: Lazy<CryptoRegistry> = Lazy::new(CryptoRegistry::new);

// Public API

/// Get a reference to the global registry
pub fn get_registry() -> &'static CryptoRegistry {
    &REGISTRY
}

/// Get a cipher algorithm by name
pub fn get_cipher(name: &str) -> Option<CipherAlgorithm> {
    get_registry().get_cipher(name)
}

/// List all registered cipher algorithms, sorted by name
pub fn list_cipher_algorithms() -> Vec<&'static str> {
    get_registry().list_cipher_algorithms()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_always_registered() {
        assert_eq!(get_cipher("identity"), Some(CipherAlgorithm::Identity));
        assert_eq!(
            provider_primitive(CipherAlgorithm::Identity, Direction::Encrypt),
            Some(Primitive::Null)
        );
    }

    #[test]
    fn test_primitive_matches_availability() {
        for algorithm in CipherAlgorithm::ALL {
            for direction in [Direction::Encrypt, Direction::Decrypt] {
                assert_eq!(
                    provider_primitive(algorithm, direction).is_some(),
                    algorithm.is_available()
                );
            }
            assert_eq!(get_cipher(algorithm.name()).is_some(), algorithm.is_available());
        }
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(get_cipher("aes-256-gcm"), None);
        assert!(list_cipher_algorithms().contains(&"identity"));
    }
}
