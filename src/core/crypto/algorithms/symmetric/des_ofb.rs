/*!
DES and two-key triple DES in output-feedback mode.
*/

use cipher::{KeyIvInit, StreamCipher};
use des::{Des, TdesEde2};
use ofb::Ofb;

use crate::core::crypto::registry::Primitive;
use crate::core::crypto::traits::cipher::KeystreamCipher;
use crate::core::error::{Error, Result};
use crate::crypto_err;

enum OfbEngine {
    Single(Ofb<Des>),
    Ede(Ofb<TdesEde2>),
}

/// DES-family OFB keystream
pub struct DesOfbCipher {
    engine: OfbEngine,
}

impl DesOfbCipher {
    /// Single DES, 8-byte key and 8-byte IV
    pub fn single(key: &[u8], iv: &[u8]) -> Result<Self> {
        match Ofb::<Des>::new_from_slices(key, iv) {
            Ok(inner) => Ok(Self { engine: OfbEngine::Single(inner) }),
            Err(e) => crypto_err!(Error::CipherInitFailed(format!("DES-OFB: {}", e))),
        }
    }

    /// Two-key triple DES, 16-byte key and 8-byte IV
    pub fn ede(key: &[u8], iv: &[u8]) -> Result<Self> {
        match Ofb::<TdesEde2>::new_from_slices(key, iv) {
            Ok(inner) => Ok(Self { engine: OfbEngine::Ede(inner) }),
            Err(e) => crypto_err!(Error::CipherInitFailed(format!("DES-EDE-OFB: {}", e))),
        }
    }
}

impl KeystreamCipher for DesOfbCipher {
    fn apply(&mut self, buf: &mut [u8]) -> Result<()> {
        let outcome = match &mut self.engine {
            OfbEngine::Single(inner) => inner.try_apply_keystream(buf),
            OfbEngine::Ede(inner) => inner.try_apply_keystream(buf),
        };
        match outcome {
            Ok(()) => Ok(()),
            Err(e) => crypto_err!(Error::CipherTransformFailed(format!("{}: {}", self.primitive(), e))),
        }
    }

    fn primitive(&self) -> Primitive {
        match self.engine {
            OfbEngine::Single(_) => Primitive::DesOfb,
            OfbEngine::Ede(_) => Primitive::DesEdeOfb,
        }
    }
}
