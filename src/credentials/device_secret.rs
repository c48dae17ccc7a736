//! Per-device secret used as key material for secret fields
//!
//! Stored as `[core] uuid=<base64 of a hyphenated UUIDv4>`. Generated the
//! first time a store is attached; every generation clears the secret fields,
//! since ciphertext written under an older secret can no longer be read.

use super::SECRET_FIELDS;
use crate::error::Result;
use crate::store::ConfigStore;
use base64::Engine;
use log::{info, warn};

pub const SECRET_SECTION: &str = "core";
pub const SECRET_KEY: &str = "uuid";

/// Encoded device secret as stored in the config file
#[derive(Clone, PartialEq, Eq)]
pub struct DeviceSecret {
    encoded: String,
}

impl std::fmt::Debug for DeviceSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceSecret")
            .field("usable", &self.key_material().is_some())
            .finish_non_exhaustive()
    }
}

impl DeviceSecret {
    /// Wrap an already-encoded value
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self {
            encoded: encoded.into(),
        }
    }

    /// Create a fresh secret (not persisted)
    #[must_use]
    pub fn generate() -> Self {
        let id = uuid::Uuid::new_v4().hyphenated().to_string();
        Self::from_encoded(base64::engine::general_purpose::STANDARD.encode(id))
    }

    /// The value as written to the config file
    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    /// Decoded key bytes, or `None` when the stored value is unusable
    pub fn key_material(&self) -> Option<Vec<u8>> {
        if self.encoded.is_empty() {
            return None;
        }
        match base64::engine::general_purpose::STANDARD.decode(self.encoded.trim()) {
            Ok(bytes) if !bytes.is_empty() => Some(bytes),
            Ok(_) => None,
            Err(e) => {
                warn!("device secret is not valid base64: {e}");
                None
            }
        }
    }

    /// Read the stored secret without generating one
    pub fn load(store: &ConfigStore) -> Result<Option<Self>> {
        Ok(store
            .get(SECRET_SECTION, SECRET_KEY)?
            .filter(|v| !v.is_empty())
            .map(Self::from_encoded))
    }

    /// Write this secret into `store`
    pub fn persist(&self, store: &ConfigStore) -> Result<()> {
        store.set(SECRET_SECTION, SECRET_KEY, &self.encoded)
    }

    /// Return the stored secret, generating one if it is missing or empty
    ///
    /// The flag is `true` when a new secret was generated (and the secret
    /// fields cleared). Calling this again on the same store is a no-op.
    pub fn ensure(store: &ConfigStore) -> Result<(Self, bool)> {
        if let Some(existing) = Self::load(store)? {
            return Ok((existing, false));
        }
        Ok((Self::regenerate(store)?, true))
    }

    /// Generate and persist a new secret, then clear every secret field
    pub fn regenerate(store: &ConfigStore) -> Result<Self> {
        let secret = Self::generate();
        secret.persist(store)?;
        info!("generated new device secret for {}", store.path().display());

        for field in SECRET_FIELDS {
            if store.contains(field.section, field.key)? {
                store.set(field.section, field.key, "")?;
            }
        }
        Ok(secret)
    }
}
