/*!
RC4 keystream with a 128-bit key.

RC4 takes no IV. The handle still owns an IV buffer for this tag, but the
keystream never reads it.
*/

use cipher::consts::U16;
use cipher::{KeyInit, StreamCipher};
use rc4::Rc4;

use crate::core::crypto::registry::Primitive;
use crate::core::crypto::traits::cipher::KeystreamCipher;
use crate::core::error::{Error, Result};
use crate::crypto_err;

/// RC4-128 keystream
pub struct Rc4Cipher {
    inner: Rc4<U16>,
}

impl Rc4Cipher {
    /// Create a keystream from a 16-byte key
    pub fn new(key: &[u8]) -> Result<Self> {
        match Rc4::<U16>::new_from_slice(key) {
            Ok(inner) => Ok(Self { inner }),
            Err(e) => crypto_err!(Error::CipherInitFailed(format!("RC4: {}", e))),
        }
    }
}

impl KeystreamCipher for Rc4Cipher {
    fn apply(&mut self, buf: &mut [u8]) -> Result<()> {
        match self.inner.try_apply_keystream(buf) {
            Ok(()) => Ok(()),
            Err(e) => crypto_err!(Error::CipherTransformFailed(format!("RC4: {}", e))),
        }
    }

    fn primitive(&self) -> Primitive {
        Primitive::Rc4
    }
}
