/*!
Algorithm type definitions.

This module defines the cipher tags, key kinds and mode selectors used
throughout the crypto subsystem. Key and IV lengths are pure functions of
the tag so they cannot drift from the buffers a handle allocates.
*/

use std::convert::TryFrom;
use std::fmt;

use crate::core::constants::sizes;
use crate::core::error::Error;

/// Supported symmetric cipher algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub enum CipherAlgorithm {
    /// No-op cipher, output equals input
    Identity,
    /// Single DES in OFB mode
    Des,
    /// RC4 with a 128-bit key
    Rc4,
    /// Two-key triple DES (EDE) in OFB mode
    TripleDes,
}

impl CipherAlgorithm {
    /// Every tag, in wire order
    pub const ALL: [CipherAlgorithm; 4] = [
        CipherAlgorithm::Identity,
        CipherAlgorithm::Des,
        CipherAlgorithm::Rc4,
        CipherAlgorithm::TripleDes,
    ];

    /// Required key length in bytes
    pub const fn key_length(self) -> usize {
        match self {
            CipherAlgorithm::Identity => 0,
            CipherAlgorithm::Des => sizes::des::KEY_SIZE,
            CipherAlgorithm::Rc4 => sizes::rc4::KEY_SIZE,
            CipherAlgorithm::TripleDes => sizes::tdes::KEY_SIZE,
        }
    }

    /// Required IV length in bytes
    pub const fn iv_length(self) -> usize {
        match self {
            CipherAlgorithm::Identity => 0,
            CipherAlgorithm::Des => sizes::des::IV_SIZE,
            CipherAlgorithm::Rc4 => sizes::rc4::IV_SIZE,
            CipherAlgorithm::TripleDes => sizes::tdes::IV_SIZE,
        }
    }

    /// Numeric tag used at external boundaries
    pub const fn tag(self) -> u8 {
        match self {
            CipherAlgorithm::Identity => 0,
            CipherAlgorithm::Des => 1,
            CipherAlgorithm::Rc4 => 2,
            CipherAlgorithm::TripleDes => 3,
        }
    }

    /// Get the name of the algorithm as a string
    pub fn name(&self) -> &'static str {
        match self {
            CipherAlgorithm::Identity => "identity",
            CipherAlgorithm::Des => "des-ofb",
            CipherAlgorithm::Rc4 => "rc4",
            CipherAlgorithm::TripleDes => "des-ede-ofb",
        }
    }

    /// Check if the algorithm is available in the current build
    pub fn is_available(&self) -> bool {
        match self {
            CipherAlgorithm::Identity => true, // Always available
            CipherAlgorithm::Des | CipherAlgorithm::TripleDes => cfg!(feature = "des"),
            CipherAlgorithm::Rc4 => cfg!(feature = "rc4"),
        }
    }
}

impl Default for CipherAlgorithm {
    fn default() -> Self {
        CipherAlgorithm::Identity
    }
}

impl fmt::Display for CipherAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for CipherAlgorithm {
    type Error = Error;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        CipherAlgorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.tag() == tag)
            .ok_or_else(|| Error::UnsupportedAlgorithm(format!("unknown cipher tag {}", tag)))
    }
}

/// Direction a cipher context is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Plaintext in, ciphertext out
    Encrypt,
    /// Ciphertext in, plaintext out
    Decrypt,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Encrypt => write!(f, "Encrypt"),
            Direction::Decrypt => write!(f, "Decrypt"),
        }
    }
}

/// Supported public-key kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub enum KeyKind {
    /// RSA keypair
    Rsa,
}

impl KeyKind {
    /// Numeric kind used at external boundaries
    pub const fn tag(self) -> u8 {
        match self {
            KeyKind::Rsa => 0,
        }
    }

    /// Get the name of the key kind as a string
    pub fn name(&self) -> &'static str {
        match self {
            KeyKind::Rsa => "RSA",
        }
    }
}

impl Default for KeyKind {
    fn default() -> Self {
        KeyKind::Rsa
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for KeyKind {
    type Error = Error;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(KeyKind::Rsa),
            other => Err(Error::UnsupportedKeyKind(other)),
        }
    }
}

/// Padding applied by raw asymmetric encrypt and decrypt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub enum PaddingMode {
    /// PKCS#1 v1.5 encryption padding
    Pkcs1v15,
    /// OAEP with SHA-1 and MGF1-SHA-1
    Oaep,
}

impl Default for PaddingMode {
    fn default() -> Self {
        PaddingMode::Oaep
    }
}

impl PaddingMode {
    /// Bytes of overhead the padding adds to each block
    pub const fn overhead(self) -> usize {
        match self {
            PaddingMode::Pkcs1v15 => 11,
            PaddingMode::Oaep => 42,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lengths_per_tag() {
        assert_eq!(CipherAlgorithm::Identity.key_length(), 0);
        assert_eq!(CipherAlgorithm::Identity.iv_length(), 0);
        assert_eq!(CipherAlgorithm::Des.key_length(), 8);
        assert_eq!(CipherAlgorithm::Des.iv_length(), 8);
        assert_eq!(CipherAlgorithm::Rc4.key_length(), 16);
        assert_eq!(CipherAlgorithm::Rc4.iv_length(), 16);
        assert_eq!(CipherAlgorithm::TripleDes.key_length(), 16);
        assert_eq!(CipherAlgorithm::TripleDes.iv_length(), 8);
    }

    #[test]
    fn test_tag_conversion() {
        for algorithm in CipherAlgorithm::ALL {
            assert_eq!(CipherAlgorithm::try_from(algorithm.tag()).unwrap(), algorithm);
        }
        assert!(matches!(
            CipherAlgorithm::try_from(42),
            Err(Error::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn test_key_kind_conversion() {
        assert_eq!(KeyKind::try_from(0).unwrap(), KeyKind::Rsa);
        assert!(matches!(KeyKind::try_from(9), Err(Error::UnsupportedKeyKind(9))));
    }
}
