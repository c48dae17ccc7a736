//! AES-256-GCM cipher for secret fields
//!
//! Ciphertext layout, Base64-encoded as one INI value:
//!
//! ```text
//! salt (16) | nonce (12) | ciphertext + tag
//! ```
//!
//! The AES key is derived from the device secret and the per-value salt with
//! Argon2id. Derived keys are kept in a small LRU cache because every read of
//! a secret field would otherwise pay for a full Argon2 run.

use super::SecretCipher;
use crate::error::{Error, Result};
use crate::sync::MutexExt;
use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, KeyInit},
};
use base64::Engine;
use log::debug;
use lru::LruCache;
use rand::Rng;
use std::num::NonZeroUsize;
use std::sync::Mutex;

const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;
const DEFAULT_CACHE_SIZE: usize = 16;

type KeyCacheEntry = (Vec<u8>, [u8; SALT_LEN]);

/// AES-256-GCM with Argon2id key derivation
pub struct AesGcmCipher {
    keys: Mutex<LruCache<KeyCacheEntry, [u8; 32]>>,
}

impl Default for AesGcmCipher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AesGcmCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AesGcmCipher").finish_non_exhaustive()
    }
}

impl AesGcmCipher {
    #[must_use]
    pub fn new() -> Self {
        Self::with_cache_size(
            NonZeroUsize::new(DEFAULT_CACHE_SIZE).unwrap_or(NonZeroUsize::MIN),
        )
    }

    /// Create a cipher remembering up to `size` derived keys
    #[must_use]
    pub fn with_cache_size(size: NonZeroUsize) -> Self {
        Self {
            keys: Mutex::new(LruCache::new(size)),
        }
    }

    /// Generate a random 16-byte salt for Argon2
    #[must_use]
    pub fn generate_salt() -> [u8; SALT_LEN] {
        rand::rng().random()
    }

    /// Derive a key from the device secret using Argon2id
    ///
    /// # Errors
    /// Returns an error if hashing fails.
    pub fn derive_key(&self, key_material: &[u8], salt: &[u8; SALT_LEN]) -> Result<[u8; 32]> {
        let cache_key = (key_material.to_vec(), *salt);
        if let Some(key) = self.keys.lock_recovered().get(&cache_key) {
            return Ok(*key);
        }

        let mut key = [0u8; 32];
        argon2::Argon2::default()
            .hash_password_into(key_material, salt, &mut key)
            .map_err(|e| Error::Credential(format!("key derivation failed: {e}")))?;

        debug!("derived secret-field key (cache miss)");
        self.keys.lock_recovered().put(cache_key, key);
        Ok(key)
    }

    fn cipher_for(&self, key_material: &[u8], salt: &[u8; SALT_LEN]) -> Result<Aes256Gcm> {
        if key_material.is_empty() {
            return Err(Error::CryptoUnavailable);
        }
        let key = self.derive_key(key_material, salt)?;
        Aes256Gcm::new_from_slice(&key)
            .map_err(|_| Error::Credential("encryption_key: Invalid key length".into()))
    }
}

impl SecretCipher for AesGcmCipher {
    fn encrypt(&self, plaintext: &str, key_material: &[u8]) -> Result<String> {
        let salt = Self::generate_salt();
        let cipher = self.cipher_for(key_material, &salt)?;

        let nonce_bytes: [u8; NONCE_LEN] = rand::rng().random();
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_bytes())
            .map_err(|e| Error::Credential(format!("encryption: Encryption failed: {e}")))?;

        let mut blob = Vec::with_capacity(SALT_LEN + NONCE_LEN + ciphertext.len());
        blob.extend_from_slice(&salt);
        blob.extend_from_slice(&nonce_bytes);
        blob.extend_from_slice(&ciphertext);
        Ok(base64::engine::general_purpose::STANDARD.encode(blob))
    }

    fn decrypt(&self, ciphertext: &str, key_material: &[u8]) -> Result<String> {
        let blob = base64::engine::general_purpose::STANDARD
            .decode(ciphertext.trim())
            .map_err(|e| Error::BadFormat(format!("ciphertext: Invalid encoding: {e}")))?;
        if blob.len() < SALT_LEN + NONCE_LEN + TAG_LEN {
            return Err(Error::BadFormat(format!(
                "ciphertext: too short ({} bytes)",
                blob.len()
            )));
        }

        let (salt, rest) = blob.split_at(SALT_LEN);
        let (nonce, body) = rest.split_at(NONCE_LEN);
        let mut salt_arr = [0u8; SALT_LEN];
        salt_arr.copy_from_slice(salt);

        let cipher = self.cipher_for(key_material, &salt_arr)?;
        let plaintext = cipher
            .decrypt(Nonce::from_slice(nonce), body)
            .map_err(|e| Error::Credential(format!("decryption: Decryption failed: {e}")))?;

        String::from_utf8(plaintext)
            .map_err(|e| Error::Credential(format!("decryption: Invalid UTF-8: {e}")))
    }
}
