/*!
Traits for keystream ciphers.

This module defines the interface a provider streaming context must offer
to a cipher handle.
*/

use crate::core::error::Result;
use crate::core::crypto::registry::Primitive;

/// Trait for a bound keystream context
pub trait KeystreamCipher: Send {
    /// XOR the next `buf.len()` keystream bytes into `buf`
    fn apply(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Get the primitive backing this context
    fn primitive(&self) -> Primitive;
}
