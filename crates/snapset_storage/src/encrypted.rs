//! Encrypted storage backend wrapper.
//!
//! This module provides a storage backend that wraps any other backend
//! with AES-256-GCM encryption at rest.
//!
//! ## Security Model
//!
//! - Every blob is encrypted independently with a fresh random nonce
//! - Blob layout: `nonce (12 bytes) || ciphertext || tag (16 bytes)`
//! - The normalised storage path is bound as associated data, so a blob
//!   copied to another path fails authentication
//! - Keys are never stored and are zeroized on drop
//!
//! Paths, listings and existence checks pass through unencrypted; only
//! contents are protected.

use crate::backend::{StorageBackend, WriteMode};
use crate::error::{StorageError, StorageResult};
use crate::path;
use aes_gcm::{
    aead::{generic_array::GenericArray, Aead, KeyInit, Payload},
    Aes256Gcm, Nonce,
};
use rand::RngCore;
use std::borrow::Cow;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of AES-256 key in bytes.
pub const KEY_SIZE: usize = 32;
/// Size of GCM nonce in bytes.
pub const NONCE_SIZE: usize = 12;
/// Size of GCM authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

/// Encryption key for the encrypted backend.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EncryptionKey {
    bytes: [u8; KEY_SIZE],
}

impl EncryptionKey {
    /// Generates a new random key.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_SIZE];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Creates a key from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes slice is not exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> StorageResult<Self> {
        if bytes.len() != KEY_SIZE {
            return Err(StorageError::Encryption(format!(
                "invalid key size: expected {KEY_SIZE}, got {}",
                bytes.len()
            )));
        }
        let mut key_bytes = [0u8; KEY_SIZE];
        key_bytes.copy_from_slice(bytes);
        Ok(Self { bytes: key_bytes })
    }

    /// Returns the key as a byte slice.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// An encrypted storage backend that wraps another backend.
///
/// # Example
///
/// ```rust
/// use snapset_storage::{
///     EncryptedBackend, EncryptionKey, InMemoryBackend, StorageBackend, WriteMode,
/// };
///
/// let backend = EncryptedBackend::new(InMemoryBackend::new(), EncryptionKey::generate());
/// backend.write_bytes("secret.bin", b"hidden", WriteMode::CreateNew).unwrap();
/// assert_eq!(backend.read_bytes("secret.bin").unwrap(), b"hidden");
/// assert_ne!(backend.inner().read_bytes("secret.bin").unwrap(), b"hidden");
/// ```
pub struct EncryptedBackend<B> {
    inner: B,
    cipher: Aes256Gcm,
}

impl<B: StorageBackend> EncryptedBackend<B> {
    /// Wraps `inner`, encrypting everything written through it with `key`.
    #[must_use]
    pub fn new(inner: B, key: EncryptionKey) -> Self {
        let cipher = Aes256Gcm::new(GenericArray::from_slice(key.as_bytes()));
        Self { inner, cipher }
    }

    /// Returns the wrapped backend.
    #[must_use]
    pub fn inner(&self) -> &B {
        &self.inner
    }

    fn encrypt(&self, storage_path: &str, plaintext: &[u8]) -> StorageResult<Vec<u8>> {
        let aad = path::normalize(storage_path)?;
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(
                Nonce::from_slice(&nonce_bytes),
                Payload {
                    msg: plaintext,
                    aad: aad.as_bytes(),
                },
            )
            .map_err(|_| StorageError::Encryption("encryption failed".to_string()))?;

        let mut blob = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        blob.extend_from_slice(&nonce_bytes);
        blob.extend(ciphertext);
        Ok(blob)
    }

    fn decrypt(&self, storage_path: &str, blob: &[u8]) -> StorageResult<Vec<u8>> {
        if blob.len() < NONCE_SIZE + TAG_SIZE {
            return Err(StorageError::Encryption("ciphertext too short".to_string()));
        }
        let aad = path::normalize(storage_path)?;
        let (nonce, ciphertext) = blob.split_at(NONCE_SIZE);

        self.cipher
            .decrypt(
                Nonce::from_slice(nonce),
                Payload {
                    msg: ciphertext,
                    aad: aad.as_bytes(),
                },
            )
            .map_err(|_| StorageError::Encryption("authentication failed".to_string()))
    }
}

impl<B> std::fmt::Debug for EncryptedBackend<B>
where
    B: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptedBackend")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl<B: StorageBackend> StorageBackend for EncryptedBackend<B> {
    fn kind(&self) -> Cow<'static, str> {
        Cow::Owned(format!("Encrypted{}", self.inner.kind()))
    }

    fn describe(&self) -> Vec<(String, String)> {
        self.inner.describe()
    }

    fn exists(&self, path: &str) -> StorageResult<bool> {
        self.inner.exists(path)
    }

    fn list_children(&self, path: &str) -> StorageResult<Vec<String>> {
        self.inner.list_children(path)
    }

    fn read_bytes(&self, path: &str) -> StorageResult<Vec<u8>> {
        let blob = self.inner.read_bytes(path)?;
        self.decrypt(path, &blob)
    }

    fn write_bytes(&self, path: &str, data: &[u8], mode: WriteMode) -> StorageResult<()> {
        let blob = self.encrypt(path, data)?;
        self.inner.write_bytes(path, &blob, mode)
    }
}
