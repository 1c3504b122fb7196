/*!
Random byte generation.

`strong_*` draws straight from the operating system entropy source and is
meant for key material. `fast_*` uses the thread-local generator, which is
seeded from the OS but never blocks.
*/

use rand::RngCore;

use crate::core::error::{Error, Result};
use crate::crypto_err;

/// Fill `buf` from the OS entropy source.
///
/// On failure `buf` holds unspecified bytes and must not be used.
pub fn fill_strong(buf: &mut [u8]) -> Result<()> {
    match getrandom::getrandom(buf) {
        Ok(()) => Ok(()),
        Err(e) => crypto_err!(Error::RandomUnavailable(e)),
    }
}

/// Return `n` bytes from the OS entropy source
pub fn strong_random(n: usize) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; n];
    fill_strong(&mut buf)?;
    Ok(buf)
}

/// Fill `buf` from the thread-local generator
pub fn fill_fast(buf: &mut [u8]) -> Result<()> {
    match rand::thread_rng().try_fill_bytes(buf) {
        Ok(()) => Ok(()),
        Err(e) => crypto_err!(Error::FastRandomUnavailable(e)),
    }
}

/// Return `n` bytes from the thread-local generator
pub fn fast_random(n: usize) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; n];
    fill_fast(&mut buf)?;
    Ok(buf)
}
