/*!
Symmetric cipher handle.

A [`CipherHandle`] owns key and IV buffers sized by its algorithm tag and
a provider streaming context. The handle moves through
`Constructed → Keyed → IvSet → EncryptReady | DecryptReady → Streaming`.
Key and IV must be in place (or be zero-length for the tag) before the
context is bound, the context is bound exactly once, and every transform
after that runs in the bound direction.
*/

use std::fmt;

use zeroize::Zeroizing;

use crate::core::crypto::algorithms::symmetric::create_keystream;
use crate::core::crypto::random;
use crate::core::crypto::registry::{Primitive, provider_primitive};
use crate::core::crypto::traits::cipher::KeystreamCipher;
use crate::core::crypto::types::algorithms::{CipherAlgorithm, Direction};
use crate::core::error::{Error, Result};
use crate::{crypto_err, invalid_state_err};

/// Lifecycle state of a cipher handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CipherState {
    /// Buffers allocated, nothing set
    Constructed,
    /// Key set, IV still missing
    Keyed,
    /// Key and IV both set
    IvSet,
    /// Bound for encryption, no data streamed yet
    EncryptReady,
    /// Bound for decryption, no data streamed yet
    DecryptReady,
    /// At least one transform has run
    Streaming,
}

impl fmt::Display for CipherState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CipherState::Constructed => write!(f, "Constructed"),
            CipherState::Keyed => write!(f, "Keyed"),
            CipherState::IvSet => write!(f, "IvSet"),
            CipherState::EncryptReady => write!(f, "EncryptReady"),
            CipherState::DecryptReady => write!(f, "DecryptReady"),
            CipherState::Streaming => write!(f, "Streaming"),
        }
    }
}

struct Bound {
    direction: Direction,
    engine: Box<dyn KeystreamCipher>,
    streamed: bool,
}

/// Provider streaming-context slot
struct StreamContext {
    primitive: Primitive,
    bound: Option<Bound>,
}

/// Symmetric cipher handle
///
/// Fields drop in declaration order: the streaming context first, then
/// the key, then the IV. Key and IV bytes are zeroized on release.
pub struct CipherHandle {
    context: StreamContext,
    key: Option<Zeroizing<Vec<u8>>>,
    iv: Option<Zeroizing<Vec<u8>>>,
    algorithm: CipherAlgorithm,
    key_set: bool,
    iv_set: bool,
}

fn allocate(len: usize) -> Result<Option<Zeroizing<Vec<u8>>>> {
    if len == 0 {
        return Ok(None);
    }
    let mut buf = Vec::new();
    if let Err(e) = buf.try_reserve_exact(len) {
        return crypto_err!(Error::AllocationFailed(e.to_string()));
    }
    buf.resize(len, 0);
    Ok(Some(Zeroizing::new(buf)))
}

fn copy_into(slot: &mut Option<Zeroizing<Vec<u8>>>, required: usize, bytes: &[u8]) -> Result<()> {
    match slot {
        Some(buf) if buf.len() == required && bytes.len() == required => {
            buf.copy_from_slice(bytes);
            Ok(())
        }
        Some(_) => crypto_err!(Error::BufferSizeMismatch {
            expected: required,
            actual: bytes.len(),
        }),
        None => crypto_err!(Error::BufferSizeMismatch {
            expected: required,
            actual: 0,
        }),
    }
}

impl CipherHandle {
    /// Create a handle for `algorithm` with zeroed key and IV buffers.
    ///
    /// Fails with `UnsupportedAlgorithm` when the provider for the tag is
    /// not compiled in.
    pub fn new(algorithm: CipherAlgorithm) -> Result<Self> {
        let Some(primitive) = provider_primitive(algorithm, Direction::Encrypt) else {
            return crypto_err!(Error::UnsupportedAlgorithm(format!(
                "{} has no provider in this build",
                algorithm
            )));
        };

        let handle = Self {
            context: StreamContext { primitive, bound: None },
            key: allocate(algorithm.key_length())?,
            iv: allocate(algorithm.iv_length())?,
            algorithm,
            key_set: false,
            iv_set: false,
        };

        tracing::trace!(algorithm = %algorithm, primitive = %primitive, "cipher handle created");
        Ok(handle)
    }

    /// Create a handle from a raw algorithm tag
    pub fn from_tag(tag: u8) -> Result<Self> {
        match CipherAlgorithm::try_from(tag) {
            Ok(algorithm) => Self::new(algorithm),
            Err(e) => crypto_err!(e),
        }
    }

    /// Create a handle, set its key and IV, and bind it in one call
    pub fn create_init(
        algorithm: CipherAlgorithm,
        key: &[u8],
        iv: &[u8],
        direction: Direction,
    ) -> Result<Self> {
        let mut handle = Self::new(algorithm).inspect_err(|e| {
            tracing::error!(algorithm = %algorithm, error = %e, "unable to allocate cipher handle");
        })?;

        handle.set_key(key).inspect_err(|e| {
            tracing::error!(algorithm = %algorithm, error = %e, "unable to set key");
        })?;

        handle.set_iv(iv).inspect_err(|e| {
            tracing::error!(algorithm = %algorithm, error = %e, "unable to set iv");
        })?;

        handle.init(direction).inspect_err(|e| {
            tracing::error!(algorithm = %algorithm, error = %e, "unable to initialize cipher");
        })?;

        Ok(handle)
    }

    /// Get the algorithm tag
    pub fn algorithm(&self) -> CipherAlgorithm {
        self.algorithm
    }

    /// Get the current lifecycle state
    pub fn state(&self) -> CipherState {
        match &self.context.bound {
            Some(bound) if bound.streamed => CipherState::Streaming,
            Some(Bound { direction: Direction::Encrypt, .. }) => CipherState::EncryptReady,
            Some(Bound { direction: Direction::Decrypt, .. }) => CipherState::DecryptReady,
            None if self.key_ready() && self.iv_ready() => CipherState::IvSet,
            None if self.key_ready() => CipherState::Keyed,
            None => CipherState::Constructed,
        }
    }

    /// Provider primitive behind this handle
    pub fn primitive(&self) -> Primitive {
        self.context.primitive
    }

    /// Direction the context is bound to, if any
    pub fn direction(&self) -> Option<Direction> {
        self.context.bound.as_ref().map(|bound| bound.direction)
    }

    /// Key buffer, absent for tags with a zero-length key
    pub fn key(&self) -> Option<&[u8]> {
        self.key.as_ref().map(|buf| buf.as_slice())
    }

    /// IV buffer, absent for tags with a zero-length IV
    pub fn iv(&self) -> Option<&[u8]> {
        self.iv.as_ref().map(|buf| buf.as_slice())
    }

    fn key_ready(&self) -> bool {
        self.key_set || self.algorithm.key_length() == 0
    }

    fn iv_ready(&self) -> bool {
        self.iv_set || self.algorithm.iv_length() == 0
    }

    fn ensure_unbound(&self) -> Result<()> {
        if self.context.bound.is_some() {
            return invalid_state_err!(CipherState::IvSet, self.state());
        }
        Ok(())
    }

    /// Copy exactly `key_length` bytes into the key buffer.
    ///
    /// A zero-length requirement accepts any input and does nothing.
    pub fn set_key(&mut self, key: &[u8]) -> Result<()> {
        let required = self.algorithm.key_length();
        if required == 0 {
            return Ok(());
        }
        self.ensure_unbound()?;
        copy_into(&mut self.key, required, key)?;
        self.key_set = true;
        Ok(())
    }

    /// Copy exactly `iv_length` bytes into the IV buffer.
    ///
    /// A zero-length requirement accepts any input and does nothing.
    pub fn set_iv(&mut self, iv: &[u8]) -> Result<()> {
        let required = self.algorithm.iv_length();
        if required == 0 {
            return Ok(());
        }
        self.ensure_unbound()?;
        copy_into(&mut self.iv, required, iv)?;
        self.iv_set = true;
        Ok(())
    }

    /// Fill the key buffer with strong random bytes
    pub fn generate_key(&mut self) -> Result<()> {
        if self.algorithm.key_length() == 0 {
            return Ok(());
        }
        self.ensure_unbound()?;
        match self.key.as_mut() {
            Some(buf) => random::fill_strong(buf)?,
            None => {
                return crypto_err!(Error::BufferSizeMismatch {
                    expected: self.algorithm.key_length(),
                    actual: 0,
                });
            }
        }
        self.key_set = true;
        Ok(())
    }

    /// Bind the streaming context for encryption
    pub fn init_for_encrypt(&mut self) -> Result<()> {
        self.init(Direction::Encrypt)
    }

    /// Bind the streaming context for decryption
    pub fn init_for_decrypt(&mut self) -> Result<()> {
        self.init(Direction::Decrypt)
    }

    fn init(&mut self, direction: Direction) -> Result<()> {
        if self.context.bound.is_some() || !self.key_ready() || !self.iv_ready() {
            return invalid_state_err!(CipherState::IvSet, self.state());
        }

        let primitive = match provider_primitive(self.algorithm, direction) {
            Some(primitive) => primitive,
            None => {
                return crypto_err!(Error::CipherInitFailed(format!(
                    "no {} primitive for {}",
                    direction, self.algorithm
                )));
            }
        };

        let key = self.key.as_deref().map(Vec::as_slice).unwrap_or(&[]);
        let iv = self.iv.as_deref().map(Vec::as_slice).unwrap_or(&[]);
        let engine = create_keystream(primitive, key, iv)?;

        self.context.primitive = primitive;
        self.context.bound = Some(Bound { direction, engine, streamed: false });
        tracing::debug!(algorithm = %self.algorithm, direction = %direction, "cipher context bound");
        Ok(())
    }

    /// Transform `buf` in place in the bound direction
    pub fn transform_in_place(&mut self, buf: &mut [u8]) -> Result<()> {
        let state = self.state();
        match self.context.bound.as_mut() {
            Some(bound) => {
                bound.engine.apply(buf)?;
                bound.streamed = true;
                Ok(())
            }
            None => invalid_state_err!("EncryptReady or DecryptReady", state),
        }
    }

    /// Stream `input` through the bound context, returning output of the same length
    pub fn transform(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        let mut output = input.to_vec();
        self.transform_in_place(&mut output)?;
        Ok(output)
    }

    fn transform_as(&mut self, direction: Direction, input: &[u8]) -> Result<Vec<u8>> {
        if self.direction() != Some(direction) {
            let expected = match direction {
                Direction::Encrypt => CipherState::EncryptReady,
                Direction::Decrypt => CipherState::DecryptReady,
            };
            return invalid_state_err!(expected, self.state());
        }
        self.transform(input)
    }

    /// Encrypt `input`; the handle must be bound for encryption
    pub fn encrypt(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        self.transform_as(Direction::Encrypt, input)
    }

    /// Decrypt `input`; the handle must be bound for decryption
    pub fn decrypt(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        self.transform_as(Direction::Decrypt, input)
    }

    /// Release the context, then the key, then the IV
    pub fn destroy(self) {
        drop(self);
    }
}

impl Drop for CipherHandle {
    fn drop(&mut self) {
        tracing::trace!(algorithm = %self.algorithm, "cipher handle released");
    }
}

impl fmt::Debug for CipherHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherHandle")
            .field("algorithm", &self.algorithm)
            .field("state", &self.state())
            .field("key", &"[REDACTED]")
            .field("iv", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffers_sized_by_tag() {
        for algorithm in CipherAlgorithm::ALL.into_iter().filter(|a| a.is_available()) {
            let handle = CipherHandle::new(algorithm).unwrap();
            assert_eq!(handle.key().map_or(0, <[u8]>::len), algorithm.key_length());
            assert_eq!(handle.iv().map_or(0, <[u8]>::len), algorithm.iv_length());
            assert_eq!(handle.state(), if algorithm.key_length() == 0 {
                CipherState::IvSet
            } else {
                CipherState::Constructed
            });
        }
    }

    #[test]
    fn test_identity_passes_through() {
        let mut handle = CipherHandle::new(CipherAlgorithm::Identity).unwrap();
        handle.set_key(b"ignored").unwrap();
        handle.set_iv(b"").unwrap();
        handle.init_for_encrypt().unwrap();
        assert_eq!(handle.transform(b"plain").unwrap(), b"plain");
        assert_eq!(handle.state(), CipherState::Streaming);
    }

    #[cfg(feature = "des")]
    #[test]
    fn test_state_progression() {
        let mut handle = CipherHandle::new(CipherAlgorithm::Des).unwrap();
        assert_eq!(handle.state(), CipherState::Constructed);

        handle.set_key(&[1u8; 8]).unwrap();
        assert_eq!(handle.state(), CipherState::Keyed);

        handle.set_iv(&[2u8; 8]).unwrap();
        assert_eq!(handle.state(), CipherState::IvSet);

        handle.init_for_decrypt().unwrap();
        assert_eq!(handle.state(), CipherState::DecryptReady);

        handle.decrypt(&[0u8; 3]).unwrap();
        assert_eq!(handle.state(), CipherState::Streaming);
    }

    #[cfg(feature = "des")]
    #[test]
    fn test_misuse_rejected() {
        let mut handle = CipherHandle::new(CipherAlgorithm::Des).unwrap();

        assert!(matches!(
            handle.set_key(&[0u8; 5]),
            Err(Error::BufferSizeMismatch { expected: 8, actual: 5 })
        ));
        assert!(matches!(handle.init_for_encrypt(), Err(Error::InvalidState { .. })));
        assert!(matches!(handle.transform(b"x"), Err(Error::InvalidState { .. })));

        handle.generate_key().unwrap();
        handle.set_iv(&[0u8; 8]).unwrap();
        handle.init_for_encrypt().unwrap();

        assert!(matches!(handle.init_for_encrypt(), Err(Error::InvalidState { .. })));
        assert!(matches!(handle.set_key(&[0u8; 8]), Err(Error::InvalidState { .. })));
        assert!(matches!(handle.decrypt(b"x"), Err(Error::InvalidState { .. })));
    }
}
