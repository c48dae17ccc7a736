//! Secret field handling
//!
//! A handful of settings (login, VNC and FTP passwords) are never stored in
//! plaintext. They are encrypted with a key derived from the device secret:
//! - **DeviceSecret**: generated once per device, stored in `[core] uuid`
//! - **SecretCipher**: the symmetric primitive (`AesGcmCipher` by default)
//! - **SecretField**: one encrypted setting, read/written through both

mod cipher;
mod device_secret;

pub use cipher::AesGcmCipher;
pub use device_secret::{DeviceSecret, SECRET_KEY, SECRET_SECTION};

use crate::error::{Error, Result};
use crate::store::ConfigStore;
use log::warn;

/// Symmetric cipher with password-based key derivation
pub trait SecretCipher: Send + Sync {
    /// Encrypt `plaintext` under `key_material`
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unusable or encryption fails.
    fn encrypt(&self, plaintext: &str, key_material: &[u8]) -> Result<String>;

    /// Decrypt a value produced by [`SecretCipher::encrypt`]
    ///
    /// # Errors
    ///
    /// Returns an error on a wrong key or corrupt ciphertext.
    fn decrypt(&self, ciphertext: &str, key_material: &[u8]) -> Result<String>;
}

/// A setting that is encrypted at rest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecretField {
    pub section: &'static str,
    pub key: &'static str,
}

pub const LOGIN_PASSWORD: SecretField = SecretField {
    section: "security",
    key: "login_password",
};

pub const VNC_PASSWORD: SecretField = SecretField {
    section: "vnc",
    key: "vnc_server_password",
};

pub const FTP_PASSWORD: SecretField = SecretField {
    section: "ftp",
    key: "ftp_server_password",
};

/// Every secret field; cleared when the device secret changes
pub const SECRET_FIELDS: [SecretField; 3] = [LOGIN_PASSWORD, VNC_PASSWORD, FTP_PASSWORD];

impl SecretField {
    /// Decrypt the stored value
    ///
    /// Never fails: a missing value, an unusable device secret or a value that
    /// does not decrypt all read as an empty string.
    pub fn read(&self, store: &ConfigStore, secret: &DeviceSecret, cipher: &dyn SecretCipher) -> String {
        let stored = match store.get(self.section, self.key) {
            Ok(Some(v)) if !v.is_empty() => v,
            Ok(_) => return String::new(),
            Err(e) => {
                warn!("[{}] {}: read failed: {e}", self.section, self.key);
                return String::new();
            }
        };

        let Some(key) = secret.key_material() else {
            warn!("[{}] {}: missing uuid, cannot decrypt", self.section, self.key);
            return String::new();
        };

        match cipher.decrypt(&stored, &key) {
            Ok(plaintext) => plaintext,
            Err(e) => {
                warn!("[{}] {}: {e}", self.section, self.key);
                String::new()
            }
        }
    }

    /// Encrypt and store `plaintext`
    ///
    /// An empty plaintext stores the cleared state. With an unusable device
    /// secret, or when encryption fails, nothing is written.
    ///
    /// # Errors
    ///
    /// Only store errors are returned; crypto problems are logged.
    pub fn write(
        &self,
        store: &ConfigStore,
        secret: &DeviceSecret,
        cipher: &dyn SecretCipher,
        plaintext: &str,
    ) -> Result<()> {
        if plaintext.is_empty() {
            return store.set(self.section, self.key, "");
        }

        let Some(key) = secret.key_material() else {
            warn!(
                "[{}] {}: {}, not written",
                self.section,
                self.key,
                Error::CryptoUnavailable
            );
            return Ok(());
        };

        match cipher.encrypt(plaintext, &key) {
            Ok(ciphertext) => store.set(self.section, self.key, &ciphertext),
            Err(e) => {
                warn!("[{}] {}: {e}, not written", self.section, self.key);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn setup() -> (tempfile::TempDir, ConfigStore, DeviceSecret, AesGcmCipher) {
        let dir = tempdir().unwrap();
        let store = ConfigStore::open(dir.path().join("settings_config.ini"));
        let (secret, _) = DeviceSecret::ensure(&store).unwrap();
        (dir, store, secret, AesGcmCipher::new())
    }

    #[test]
    fn test_write_never_stores_plaintext() {
        let (_dir, store, secret, cipher) = setup();
        VNC_PASSWORD.write(&store, &secret, &cipher, "Secr3t!").unwrap();

        let raw = store.get("vnc", "vnc_server_password").unwrap().unwrap();
        assert!(!raw.contains("Secr3t!"));
        assert_eq!(VNC_PASSWORD.read(&store, &secret, &cipher), "Secr3t!");
    }

    #[test]
    fn test_unusable_secret_blocks_write() {
        let (_dir, store, _, cipher) = setup();
        let broken = DeviceSecret::from_encoded("");

        LOGIN_PASSWORD.write(&store, &broken, &cipher, "pw").unwrap();
        assert_eq!(store.get("security", "login_password").unwrap(), None);
        assert_eq!(LOGIN_PASSWORD.read(&store, &broken, &cipher), "");
    }

    #[test]
    fn test_wrong_secret_reads_empty() {
        let (_dir, store, secret, cipher) = setup();
        FTP_PASSWORD.write(&store, &secret, &cipher, "ftp-pw").unwrap();

        let other = DeviceSecret::generate();
        assert_eq!(FTP_PASSWORD.read(&store, &other, &cipher), "");
    }

    #[test]
    fn test_empty_plaintext_clears() {
        let (_dir, store, secret, cipher) = setup();
        VNC_PASSWORD.write(&store, &secret, &cipher, "x").unwrap();
        VNC_PASSWORD.write(&store, &secret, &cipher, "").unwrap();

        assert_eq!(store.get("vnc", "vnc_server_password").unwrap().as_deref(), Some(""));
        assert_eq!(VNC_PASSWORD.read(&store, &secret, &cipher), "");
    }
}
