use crate::core::crypto::registry::Primitive;
use crate::core::crypto::traits::cipher::KeystreamCipher;
use crate::core::error::Result;

/// Pass-through context for the identity tag
pub struct NullCipher;

impl KeystreamCipher for NullCipher {
    fn apply(&mut self, _buf: &mut [u8]) -> Result<()> {
        Ok(())
    }

    fn primitive(&self) -> Primitive {
        Primitive::Null
    }
}
