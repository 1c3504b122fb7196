/*!
Constants for the crypto handles.

This module contains key and IV sizes for the supported ciphers, digest
lengths, and the defaults used when generating public keys.
*/

/// Length of a SHA-1 digest in bytes
pub const DIGEST_LEN: usize = 20;

/// Length of a SHA-256 digest in bytes
pub const DIGEST256_LEN: usize = 32;

/// Default RSA modulus size in bits
pub const DEFAULT_KEY_BITS: usize = 1024;

/// Default RSA public exponent
pub const DEFAULT_PUBLIC_EXPONENT: u64 = 65537;

/// Smallest modulus size accepted by configuration validation
pub const MIN_KEY_BITS: usize = 512;

/// Characters allowed in key file paths unless the caller supplies its own set
pub const LEGAL_FILENAME_CHARACTERS: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789.-_/";

/// Size constants for the cipher algorithms
pub mod sizes {
    /// Single DES in OFB mode
    pub mod des {
        /// Size of a DES key in bytes
        pub const KEY_SIZE: usize = 8;

        /// Size of a DES IV in bytes
        pub const IV_SIZE: usize = 8;
    }

    /// RC4 with a 128-bit key
    pub mod rc4 {
        /// Size of an RC4 key in bytes
        pub const KEY_SIZE: usize = 16;

        /// Size of the IV buffer kept for RC4 (the keystream ignores it)
        pub const IV_SIZE: usize = 16;
    }

    /// Two-key triple DES (EDE) in OFB mode
    pub mod tdes {
        /// Size of a two-key triple DES key in bytes
        pub const KEY_SIZE: usize = 16;

        /// Size of a triple DES IV in bytes
        pub const IV_SIZE: usize = 8;
    }
}
