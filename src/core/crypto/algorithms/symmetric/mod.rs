/*!
Keystream cipher implementations.

This module binds each registry primitive to its provider crate.
*/

mod null;
#[cfg(feature = "des")]
mod des_ofb;
#[cfg(feature = "rc4")]
mod rc4;

use crate::core::crypto::registry::Primitive;
use crate::core::crypto::traits::cipher::KeystreamCipher;
use crate::core::error::Result;

/// Create a keystream context for `primitive` keyed with `key` and `iv`.
///
/// Fails with `CipherInitFailed` if the provider rejects the key or IV.
#[cfg_attr(not(any(feature = "des", feature = "rc4")), allow(unused_variables))]
pub fn create_keystream(
    primitive: Primitive,
    key: &[u8],
    iv: &[u8],
) -> Result<Box<dyn KeystreamCipher>> {
    match primitive {
        Primitive::Null => Ok(Box::new(null::NullCipher)),
        #[cfg(feature = "des")]
        Primitive::DesOfb => Ok(Box::new(des_ofb::DesOfbCipher::single(key, iv)?)),
        #[cfg(feature = "rc4")]
        Primitive::Rc4 => Ok(Box::new(rc4::Rc4Cipher::new(key)?)),
        #[cfg(feature = "des")]
        Primitive::DesEdeOfb => Ok(Box::new(des_ofb::DesOfbCipher::ede(key, iv)?)),
    }
}
