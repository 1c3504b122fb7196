/*!
Error handling for the crypto handles.

Every failing operation returns one of these variants directly. The same
failure is also mirrored into the process-wide diagnostics sink, see
[`crate::core::diagnostics`].
*/

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for the crypto handles
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the crypto handles
#[derive(Error, Debug)]
pub enum Error {
    /// A buffer could not be reserved
    #[error("Allocation failed: {0}")]
    AllocationFailed(String),

    /// The cipher tag is unknown or its provider is compiled out
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The requested public-key kind is not supported
    #[error("Unsupported key kind: {0}")]
    UnsupportedKeyKind(u8),

    /// Key or IV material has the wrong length for the algorithm
    #[error("Buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch {
        expected: usize,
        actual: usize,
    },

    /// The provider rejected the key or IV while binding the context
    #[error("Cipher initialization failed: {0}")]
    CipherInitFailed(String),

    /// The provider failed while streaming data
    #[error("Cipher transform failed: {0}")]
    CipherTransformFailed(String),

    /// A cipher operation was called out of order
    #[error("Cipher not in correct state: expected {expected}, but was {actual}")]
    InvalidState {
        expected: String,
        actual: String,
    },

    /// The provider could not produce a keypair
    #[error("Key generation failed: {0}")]
    KeyGenerationFailed(String),

    /// The input did not contain a well-formed key of the expected kind
    #[error("Key parse failed: {0}")]
    KeyParseFailed(String),

    /// The key could not be serialized or written
    #[error("Key write failed: {0}")]
    KeyWriteFailed(String),

    /// The key loaded but failed its consistency check
    #[error("Key is invalid: {0}")]
    KeyInvalid(String),

    /// The consistency check itself could not run
    #[error("Key check failed: {0}")]
    CheckFailed(String),

    /// A private-key operation was requested on a public-only key
    #[error("Not a private key")]
    NotAPrivateKey,

    /// The provider rejected an asymmetric encrypt or decrypt
    #[error("Crypto operation failed: {0}")]
    CryptoOperationFailed(String),

    /// The path contains a character outside the approved set
    #[error("Invalid path {path:?}: character {character:?} is not allowed")]
    InvalidPath {
        path: PathBuf,
        character: char,
    },

    /// The key file could not be opened
    #[error("Failed to open {path:?}")]
    FileOpenFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The OS entropy source failed
    #[error("Strong random source unavailable")]
    RandomUnavailable(#[source] getrandom::Error),

    /// The fast pseudo-random generator failed
    #[error("Fast random source unavailable")]
    FastRandomUnavailable(#[source] rand::Error),
}

impl Error {
    /// Whether a caller can log this error and carry on
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::InvalidState { .. })
    }
}

/// Create an error, record it in the diagnostics sink and wrap it in `Err`
#[macro_export]
macro_rules! crypto_err {
    ($err:expr) => {
        Err($crate::core::diagnostics::raise($err))
    };
}

/// Create an invalid state error with context
#[macro_export]
macro_rules! invalid_state_err {
    ($expected:expr, $actual:expr) => {
        Err($crate::core::diagnostics::raise(
            $crate::core::error::Error::InvalidState {
                expected: $expected.to_string(),
                actual: $actual.to_string(),
            },
        ))
    };
}

/// Convert from Error to io::Error (for compatibility)
impl From<Error> for io::Error {
    fn from(error: Error) -> Self {
        match error {
            Error::FileOpenFailed { source, .. } => source,
            Error::InvalidPath { .. } => io::Error::new(io::ErrorKind::InvalidInput, error),
            Error::AllocationFailed(_) => io::Error::new(io::ErrorKind::OutOfMemory, error),
            Error::UnsupportedAlgorithm(_) | Error::UnsupportedKeyKind(_) => {
                io::Error::new(io::ErrorKind::Unsupported, error)
            }
            Error::BufferSizeMismatch { .. } | Error::InvalidState { .. } => {
                io::Error::new(io::ErrorKind::InvalidInput, error)
            }
            Error::KeyParseFailed(_) | Error::KeyInvalid(_) | Error::NotAPrivateKey => {
                io::Error::new(io::ErrorKind::InvalidData, error)
            }
            _ => io::Error::other(error),
        }
    }
}
