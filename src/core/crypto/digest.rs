//! One-shot message digests.

use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::core::constants::{DIGEST256_LEN, DIGEST_LEN};

/// SHA-1 digest of `data`
pub fn digest(data: &[u8]) -> [u8; DIGEST_LEN] {
    Sha1::digest(data).into()
}

/// SHA-256 digest of `data`
pub fn digest256(data: &[u8]) -> [u8; DIGEST256_LEN] {
    Sha256::digest(data).into()
}
