/*!
Public-key handle.

A [`PkHandle`] is a shared reference to one key-material slot. Duplicating
the handle aliases the slot rather than copying it, so a key loaded through
one reference is visible through all of them. The slot, and the key in it,
is released exactly once, when the last reference is dropped.
*/

use std::cmp::Ordering;
use std::ffi::CString;
use std::fmt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rand::rngs::OsRng;
use rsa::pkcs1::der::SecretDocument;
use rsa::pkcs1::{
    DecodeRsaPublicKey, EncodeRsaPrivateKey, EncodeRsaPublicKey, LineEnding,
    RsaPrivateKey as Pkcs1PrivateKey, UintRef,
};
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, Oaep, Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};
use sha1::Sha1;

use crate::core::crypto::types::algorithms::{KeyKind, PaddingMode};
use crate::core::crypto::types::config::CryptoConfig;
use crate::core::error::{Error, Result};
use crate::crypto_err;

const PRIVATE_KEY_LABEL: &str = "RSA PRIVATE KEY";

/// Key material held by a handle
enum KeyMaterial {
    /// Full keypair
    Private(RsaPrivateKey),
    /// Public component only
    Public(RsaPublicKey),
}

impl KeyMaterial {
    fn n(&self) -> &BigUint {
        match self {
            KeyMaterial::Private(key) => key.n(),
            KeyMaterial::Public(key) => key.n(),
        }
    }

    fn e(&self) -> &BigUint {
        match self {
            KeyMaterial::Private(key) => key.e(),
            KeyMaterial::Public(key) => key.e(),
        }
    }

    fn size(&self) -> usize {
        match self {
            KeyMaterial::Private(key) => key.size(),
            KeyMaterial::Public(key) => key.size(),
        }
    }

    fn public_key(&self) -> RsaPublicKey {
        match self {
            KeyMaterial::Private(key) => key.to_public_key(),
            KeyMaterial::Public(key) => key.clone(),
        }
    }
}

struct PkInner {
    kind: KeyKind,
    config: CryptoConfig,
    slot: RwLock<Option<KeyMaterial>>,
}

impl Drop for PkInner {
    fn drop(&mut self) {
        tracing::trace!(kind = %self.kind, "public key handle released");
    }
}

/// Reference-counted public-key handle
#[derive(Clone)]
pub struct PkHandle {
    inner: Arc<PkInner>,
}

impl PkHandle {
    /// Create an empty handle with the default configuration
    pub fn new(kind: KeyKind) -> Self {
        Self::with_config(kind, CryptoConfig::default())
    }

    /// Create an empty handle with a specific configuration
    pub fn with_config(kind: KeyKind, config: CryptoConfig) -> Self {
        tracing::trace!(kind = %kind, "public key handle created");
        Self {
            inner: Arc::new(PkInner {
                kind,
                config,
                slot: RwLock::new(None),
            }),
        }
    }

    /// Create an empty handle from a raw kind tag
    pub fn from_tag(tag: u8) -> Result<Self> {
        match KeyKind::try_from(tag) {
            Ok(kind) => Ok(Self::new(kind)),
            Err(e) => crypto_err!(e),
        }
    }

    /// Get the key kind
    pub fn kind(&self) -> KeyKind {
        self.inner.kind
    }

    /// Get the configuration this handle was created with
    pub fn config(&self) -> &CryptoConfig {
        &self.inner.config
    }

    fn slot(&self) -> RwLockReadGuard<'_, Option<KeyMaterial>> {
        self.inner.slot.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn slot_mut(&self) -> RwLockWriteGuard<'_, Option<KeyMaterial>> {
        self.inner.slot.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drop whatever is loaded, then store `material`
    fn replace(&self, material: KeyMaterial) {
        let mut slot = self.slot_mut();
        drop(slot.take());
        *slot = Some(material);
    }

    fn clear(&self) {
        drop(self.slot_mut().take());
    }

    /// Whether no key is loaded
    pub fn is_empty(&self) -> bool {
        self.slot().is_none()
    }

    /// Whether the loaded key has its private component
    pub fn has_private_key(&self) -> bool {
        matches!(*self.slot(), Some(KeyMaterial::Private(_)))
    }

    /// Generate a keypair with the configured size and exponent
    pub fn generate(&self) -> Result<()> {
        let config = self.config();
        self.generate_with(config.key_bits, config.public_exponent)
    }

    /// Replace any loaded key with a freshly generated keypair.
    ///
    /// The old key is released first, so the slot is empty after any
    /// failure.
    pub fn generate_with(&self, bits: usize, public_exponent: u64) -> Result<()> {
        self.clear();
        CryptoConfig::with_key_params(bits, public_exponent).validate()?;

        let exponent = BigUint::from(public_exponent);
        match RsaPrivateKey::new_with_exp(&mut OsRng, bits, &exponent) {
            Ok(key) => {
                self.replace(KeyMaterial::Private(key));
                tracing::debug!(bits, "generated keypair");
                Ok(())
            }
            Err(e) => crypto_err!(Error::KeyGenerationFailed(e.to_string())),
        }
    }

    /// Parse a PEM private key from `source`, replacing any loaded key.
    ///
    /// Malformed PEM or ASN.1 fails with `KeyParseFailed`. A well-formed
    /// key whose components do not fit together fails with `KeyInvalid`.
    pub fn load_private_from_stream<R: Read>(&self, source: R) -> Result<()> {
        self.clear();
        let pem = read_pem(source)?;
        let key = decode_private_pem(&pem)?;
        self.replace(KeyMaterial::Private(key));
        Ok(())
    }

    /// Parse a PEM public key from `source`, replacing any loaded key
    pub fn load_public_from_stream<R: Read>(&self, source: R) -> Result<()> {
        self.clear();
        let pem = read_pem(source)?;
        self.load_public_pem(&pem)
    }

    fn load_public_pem(&self, pem: &str) -> Result<()> {
        match RsaPublicKey::from_pkcs1_pem(pem) {
            Ok(key) => {
                self.replace(KeyMaterial::Public(key));
                Ok(())
            }
            Err(e) => crypto_err!(Error::KeyParseFailed(e.to_string())),
        }
    }

    /// Load and check a private key from a file.
    ///
    /// The path is checked against the configured filename policy before
    /// anything touches the filesystem. A key that loads but fails
    /// [`check_key`](Self::check_key) is rejected and the slot left empty.
    pub fn load_private_from_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.config().filename_policy.check(path)?;

        let file = match File::open(path) {
            Ok(file) => file,
            Err(source) => {
                return crypto_err!(Error::FileOpenFailed {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        match self.load_private_from_stream(file) {
            Ok(()) => {}
            Err(e @ Error::KeyInvalid(_)) => {
                tracing::error!(path = %path.display(), error = %e, "private key read but is invalid");
                return Err(e);
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "error reading private key");
                return Err(e);
            }
        }

        match self.check_key() {
            Ok(true) => {
                tracing::debug!(path = %path.display(), "loaded private key");
                Ok(())
            }
            Ok(false) => {
                self.clear();
                tracing::error!(path = %path.display(), "private key read but is invalid");
                crypto_err!(Error::KeyInvalid(format!(
                    "{} failed the consistency check",
                    path.display()
                )))
            }
            Err(e) => {
                self.clear();
                tracing::error!(path = %path.display(), error = %e, "private key validity checking failed");
                Err(e)
            }
        }
    }

    /// Write the private key as unencrypted PEM
    pub fn write_private_to_stream<W: Write>(&self, mut dest: W) -> Result<()> {
        let pem = match &*self.slot() {
            Some(KeyMaterial::Private(key)) => match key.to_pkcs1_pem(LineEnding::LF) {
                Ok(pem) => pem,
                Err(e) => return crypto_err!(Error::KeyWriteFailed(e.to_string())),
            },
            Some(KeyMaterial::Public(_)) => {
                return crypto_err!(Error::KeyWriteFailed("key has no private component".into()));
            }
            None => return crypto_err!(Error::KeyWriteFailed("no key material".into())),
        };
        write_pem(&mut dest, pem.as_bytes())
    }

    /// Write the private key to a file, checking the path first.
    ///
    /// The private key is stored unencrypted. File permissions are the
    /// caller's concern.
    pub fn write_private_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.config().filename_policy.check(path)?;

        let file = match File::create(path) {
            Ok(file) => file,
            Err(source) => {
                return crypto_err!(Error::FileOpenFailed {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        self.write_private_to_stream(file)
    }

    fn public_pem(&self) -> Result<String> {
        let public = match &*self.slot() {
            Some(material) => material.public_key(),
            None => return crypto_err!(Error::KeyWriteFailed("no key material".into())),
        };
        match public.to_pkcs1_pem(LineEnding::LF) {
            Ok(pem) => Ok(pem),
            Err(e) => crypto_err!(Error::KeyWriteFailed(e.to_string())),
        }
    }

    /// Write the public key as PEM
    pub fn write_public_to_stream<W: Write>(&self, mut dest: W) -> Result<()> {
        let pem = self.public_pem()?;
        write_pem(&mut dest, pem.as_bytes())
    }

    /// The public key as NUL-terminated PEM text.
    ///
    /// `as_bytes()` on the result gives the text without the terminator.
    pub fn public_key_to_text(&self) -> Result<CString> {
        let pem = self.public_pem()?;
        match CString::new(pem) {
            Ok(text) => Ok(text),
            Err(e) => crypto_err!(Error::KeyWriteFailed(e.to_string())),
        }
    }

    /// Load a public key from PEM text, with or without a trailing NUL
    pub fn load_public_from_text(&self, text: &[u8]) -> Result<()> {
        self.clear();
        let end = text.iter().position(|&b| b == 0).unwrap_or(text.len());
        match std::str::from_utf8(&text[..end]) {
            Ok(pem) => self.load_public_pem(pem),
            Err(e) => crypto_err!(Error::KeyParseFailed(e.to_string())),
        }
    }

    /// Run the provider's consistency check on the loaded keypair.
    ///
    /// Returns `Ok(false)` for an inconsistent key. Keys loaded or generated
    /// through this handle are checked as they are assembled, so a loaded
    /// key reports `true`. Fails with `CheckFailed` when there is nothing
    /// to check.
    pub fn check_key(&self) -> Result<bool> {
        match &*self.slot() {
            Some(KeyMaterial::Private(key)) => Ok(key.validate().is_ok()),
            Some(KeyMaterial::Public(_)) => {
                crypto_err!(Error::CheckFailed("key has no private component".into()))
            }
            None => crypto_err!(Error::CheckFailed("no key material".into())),
        }
    }

    /// Compare public components, modulus first and then exponent.
    ///
    /// Returns `None` when either handle has no key or the kinds differ.
    pub fn compare(&self, other: &PkHandle) -> Option<Ordering> {
        if self.kind() != other.kind() {
            return None;
        }
        if Arc::ptr_eq(&self.inner, &other.inner) {
            return self.slot().as_ref().map(|_| Ordering::Equal);
        }

        let ours = self.slot();
        let theirs = other.slot();
        match (ours.as_ref(), theirs.as_ref()) {
            (Some(a), Some(b)) => Some(a.n().cmp(b.n()).then_with(|| a.e().cmp(b.e()))),
            _ => None,
        }
    }

    /// Modulus size in bytes, `None` when no key is loaded
    pub fn key_size_bytes(&self) -> Option<usize> {
        self.slot().as_ref().map(KeyMaterial::size)
    }

    /// Return another reference to this same handle
    pub fn duplicate(&self) -> PkHandle {
        let dup = self.clone();
        tracing::trace!(refs = dup.ref_count(), "public key handle duplicated");
        dup
    }

    /// Number of live references to this handle
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Largest input `public_encrypt` accepts under `padding`
    pub fn max_plaintext_len(&self, padding: PaddingMode) -> Option<usize> {
        self.key_size_bytes()
            .map(|size| size.saturating_sub(padding.overhead()))
    }

    /// Encrypt `input` with the public component.
    ///
    /// Input longer than [`max_plaintext_len`](Self::max_plaintext_len)
    /// fails with `CryptoOperationFailed` before reaching the provider.
    pub fn public_encrypt(&self, input: &[u8], padding: PaddingMode) -> Result<Vec<u8>> {
        let public = match &*self.slot() {
            Some(material) => material.public_key(),
            None => return crypto_err!(Error::CryptoOperationFailed("no key material".into())),
        };

        let limit = public.size().saturating_sub(padding.overhead());
        if input.len() > limit {
            return crypto_err!(Error::CryptoOperationFailed(format!(
                "input of {} bytes exceeds the {} byte limit for {:?} padding",
                input.len(),
                limit,
                padding
            )));
        }

        let outcome = match padding {
            PaddingMode::Pkcs1v15 => public.encrypt(&mut OsRng, Pkcs1v15Encrypt, input),
            PaddingMode::Oaep => public.encrypt(&mut OsRng, Oaep::new::<Sha1>(), input),
        };
        match outcome {
            Ok(output) => Ok(output),
            Err(e) => crypto_err!(Error::CryptoOperationFailed(e.to_string())),
        }
    }

    /// Decrypt `input` with the private component
    pub fn private_decrypt(&self, input: &[u8], padding: PaddingMode) -> Result<Vec<u8>> {
        let slot = self.slot();
        let Some(KeyMaterial::Private(key)) = &*slot else {
            return crypto_err!(Error::NotAPrivateKey);
        };

        let outcome = match padding {
            PaddingMode::Pkcs1v15 => key.decrypt(Pkcs1v15Encrypt, input),
            PaddingMode::Oaep => key.decrypt(Oaep::new::<Sha1>(), input),
        };
        match outcome {
            Ok(output) => Ok(output),
            Err(e) => crypto_err!(Error::CryptoOperationFailed(e.to_string())),
        }
    }

    /// Encrypt with the padding from this handle's configuration
    pub fn public_encrypt_default(&self, input: &[u8]) -> Result<Vec<u8>> {
        self.public_encrypt(input, self.config().padding)
    }

    /// Decrypt with the padding from this handle's configuration
    pub fn private_decrypt_default(&self, input: &[u8]) -> Result<Vec<u8>> {
        self.private_decrypt(input, self.config().padding)
    }

    /// Drop this reference; the key is released with the last one
    pub fn destroy(self) {
        drop(self);
    }
}

fn to_biguint(value: UintRef<'_>) -> BigUint {
    BigUint::from_bytes_be(value.as_bytes())
}

/// Decode PKCS#1 PEM, then assemble the key from its components
fn decode_private_pem(pem: &str) -> Result<RsaPrivateKey> {
    let (label, document) = match SecretDocument::from_pem(pem) {
        Ok(decoded) => decoded,
        Err(e) => return crypto_err!(Error::KeyParseFailed(e.to_string())),
    };
    if label != PRIVATE_KEY_LABEL {
        return crypto_err!(Error::KeyParseFailed(format!("unexpected PEM label {:?}", label)));
    }

    let fields = match Pkcs1PrivateKey::try_from(document.as_bytes()) {
        Ok(fields) => fields,
        Err(e) => return crypto_err!(Error::KeyParseFailed(e.to_string())),
    };
    if fields.other_prime_infos.is_some() {
        return crypto_err!(Error::KeyParseFailed("multi-prime keys are not supported".into()));
    }

    let primes = vec![to_biguint(fields.prime1), to_biguint(fields.prime2)];
    match RsaPrivateKey::from_components(
        to_biguint(fields.modulus),
        to_biguint(fields.public_exponent),
        to_biguint(fields.private_exponent),
        primes,
    ) {
        Ok(key) => Ok(key),
        Err(e) => crypto_err!(Error::KeyInvalid(e.to_string())),
    }
}

fn read_pem<R: Read>(mut source: R) -> Result<String> {
    let mut pem = String::new();
    match source.read_to_string(&mut pem) {
        Ok(_) => Ok(pem),
        Err(e) => crypto_err!(Error::KeyParseFailed(format!("read failed: {}", e))),
    }
}

fn write_pem<W: Write>(dest: &mut W, pem: &[u8]) -> Result<()> {
    match dest.write_all(pem).and_then(|()| dest.flush()) {
        Ok(()) => Ok(()),
        Err(e) => crypto_err!(Error::KeyWriteFailed(e.to_string())),
    }
}

impl PartialEq for PkHandle {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Some(Ordering::Equal)
    }
}

impl fmt::Debug for PkHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PkHandle")
            .field("kind", &self.kind())
            .field("refs", &self.ref_count())
            .field("key_size_bytes", &self.key_size_bytes())
            .field("private", &self.has_private_key())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn small_key() -> PkHandle {
        let handle = PkHandle::with_config(KeyKind::Rsa, CryptoConfig::with_key_params(512, 65537));
        handle.generate().unwrap();
        handle
    }

    #[test]
    fn test_new_handle_is_empty() {
        let handle = PkHandle::new(KeyKind::Rsa);
        assert!(handle.is_empty());
        assert_eq!(handle.ref_count(), 1);
        assert_eq!(handle.key_size_bytes(), None);
        assert!(matches!(handle.check_key(), Err(Error::CheckFailed(_))));
        assert!(matches!(
            handle.write_public_to_stream(Vec::new()),
            Err(Error::KeyWriteFailed(_))
        ));
    }

    #[test]
    fn test_duplicate_shares_slot_and_releases_once() {
        let original = PkHandle::new(KeyKind::Rsa);
        let weak = Arc::downgrade(&original.inner);

        let dup = original.duplicate();
        assert_eq!(original.ref_count(), 2);

        let key = small_key();
        let mut pem = Vec::new();
        key.write_private_to_stream(&mut pem).unwrap();
        dup.load_private_from_stream(pem.as_slice()).unwrap();

        // Loaded through the duplicate, visible through the original
        assert_eq!(original.key_size_bytes(), Some(64));

        dup.destroy();
        assert_eq!(original.ref_count(), 1);
        assert!(original.has_private_key());
        assert!(weak.upgrade().is_some());

        original.destroy();
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_compare_orders_by_modulus() {
        let a = small_key();
        let b = small_key();
        let empty = PkHandle::new(KeyKind::Rsa);

        assert_eq!(a.compare(&a), Some(Ordering::Equal));
        assert_eq!(a.compare(&empty), None);
        assert_eq!(empty.compare(&empty), None);

        let forward = a.compare(&b).unwrap();
        assert_eq!(b.compare(&a).unwrap(), forward.reverse());
        assert_eq!(forward, a.slot().as_ref().unwrap().n().cmp(b.slot().as_ref().unwrap().n()));
    }

    #[test]
    fn test_failed_parse_leaves_slot_empty() {
        let handle = small_key();
        let result = handle.load_public_from_text(b"-----BEGIN NOTHING-----\0");
        assert!(matches!(result, Err(Error::KeyParseFailed(_))));
        assert!(handle.is_empty());
    }

    #[test]
    fn test_generate_rejects_bad_parameters() {
        let handle = PkHandle::new(KeyKind::Rsa);
        assert!(matches!(handle.generate_with(128, 65537), Err(Error::KeyGenerationFailed(_))));
        assert!(matches!(handle.generate_with(1024, 65536), Err(Error::KeyGenerationFailed(_))));
    }

    #[test]
    fn test_failed_generate_releases_old_key() {
        let handle = small_key();
        assert!(handle.has_private_key());

        assert!(handle.generate_with(64, 65537).is_err());
        assert!(handle.is_empty());
    }

    #[test]
    fn test_max_plaintext_len_follows_padding() {
        let handle = small_key();
        assert_eq!(handle.max_plaintext_len(PaddingMode::Oaep), Some(22));
        assert_eq!(handle.max_plaintext_len(PaddingMode::Pkcs1v15), Some(53));
        assert_eq!(PkHandle::new(KeyKind::Rsa).max_plaintext_len(PaddingMode::Oaep), None);

        assert!(handle.public_encrypt(&[7u8; 22], PaddingMode::Oaep).is_ok());
        assert!(matches!(
            handle.public_encrypt(&[7u8; 23], PaddingMode::Oaep),
            Err(Error::CryptoOperationFailed(_))
        ));
    }
}
