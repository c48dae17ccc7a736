//! Typed read/write surface over the settings file
//!
//! `ConfigSchema` exposes one getter/setter pair per setting, grouped by
//! domain in the submodules. Getters never fail: storage problems are logged
//! and the legacy default is returned, because the panel has to keep working
//! on a damaged or partial config. Setters return `Result`.
//!
//! Every schema owns its own [`DeviceSecret`], resolved when the file is
//! attached. A schema opened on an imported file therefore decrypts with the
//! exporting device's secret, never the local one.

pub mod keys;

mod indexed;
mod network;
mod pages;
mod remote;
mod screen;
mod startup;
mod system;
mod time;

pub use indexed::{FirewallRule, IndexedList, IndexedRecord, WebPage};
pub use network::NetSettings;
pub use pages::Page;
pub use startup::StartupApp;
pub use system::RebootSchedule;

use crate::credentials::{AesGcmCipher, DeviceSecret, SecretCipher, SecretField};
use crate::error::Result;
use crate::store::{ConfigStore, parse_bool, parse_int};
use crate::sync::RwLockExt;
use keys::*;
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Settings file with typed accessors and transparent secret fields
pub struct ConfigSchema {
    store: ConfigStore,
    secret: RwLock<DeviceSecret>,
    cipher: Arc<dyn SecretCipher>,
}

impl std::fmt::Debug for ConfigSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigSchema")
            .field("path", &self.store.path())
            .finish_non_exhaustive()
    }
}

impl ConfigSchema {
    /// Attach to a settings file with the default AES-GCM cipher
    ///
    /// Generates the device secret if the file has none (clearing the secret
    /// fields in that case).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the secret cannot be
    /// persisted.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with_cipher(path, Arc::new(AesGcmCipher::new()))
    }

    /// Attach to a settings file with a custom cipher
    pub fn open_with_cipher(path: impl Into<PathBuf>, cipher: Arc<dyn SecretCipher>) -> Result<Self> {
        let store = ConfigStore::open(path);
        let (secret, generated) = DeviceSecret::ensure(&store)?;
        if generated {
            info!("settings {}: new device secret", store.path().display());
        }
        Ok(Self {
            store,
            secret: RwLock::new(secret),
            cipher,
        })
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    pub fn cipher(&self) -> Arc<dyn SecretCipher> {
        Arc::clone(&self.cipher)
    }

    /// The secret this schema encrypts with
    pub fn device_secret(&self) -> DeviceSecret {
        self.secret.read_recovered().clone()
    }

    /// Encoded device secret (`[core] uuid`)
    pub fn get_uuid(&self) -> String {
        self.secret.read_recovered().encoded().to_string()
    }

    /// Overwrite the stored device secret without touching secret fields
    ///
    /// Used when swapping in an imported file to put the local identity back.
    pub fn set_uuid(&self, secret: &DeviceSecret) -> Result<()> {
        secret.persist(&self.store)?;
        *self.secret.write_recovered() = secret.clone();
        Ok(())
    }

    /// Generate a new device secret and clear every secret field
    pub fn regenerate_device_secret(&self) -> Result<()> {
        let secret = DeviceSecret::regenerate(&self.store)?;
        *self.secret.write_recovered() = secret;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Secret fields
    // -------------------------------------------------------------------------

    pub fn read_secret(&self, field: SecretField) -> String {
        let secret = self.secret.read_recovered();
        field.read(&self.store, &secret, self.cipher.as_ref())
    }

    pub fn write_secret(&self, field: SecretField, plaintext: &str) -> Result<()> {
        let secret = self.secret.read_recovered();
        field.write(&self.store, &secret, self.cipher.as_ref(), plaintext)
    }

    // -------------------------------------------------------------------------
    // Degrading accessors
    // -------------------------------------------------------------------------

    /// Raw value; `None` when absent or unreadable
    pub fn value(&self, section: &str, key: &str) -> Option<String> {
        match self.store.get(section, key) {
            Ok(v) => v,
            Err(e) => {
                warn!("[{section}] {key}: {e}");
                None
            }
        }
    }

    /// Value as a string, empty when absent
    pub fn string(&self, section: &str, key: &str) -> String {
        self.value(section, key).unwrap_or_default()
    }

    /// Value as a bool, false when absent
    pub fn flag(&self, section: &str, key: &str) -> bool {
        self.value(section, key).is_some_and(|v| parse_bool(&v))
    }

    /// Value as an int, 0 when absent or unparseable
    pub fn int(&self, section: &str, key: &str) -> i32 {
        self.value(section, key)
            .map(|v| i32::try_from(parse_int(&v)).unwrap_or(0))
            .unwrap_or(0)
    }

    pub fn set_string(&self, section: &str, key: &str, value: &str) -> Result<()> {
        self.store.set(section, key, value)
    }

    pub fn set_flag(&self, section: &str, key: &str, value: bool) -> Result<()> {
        self.store.set_bool(section, key, value)
    }

    pub fn set_int(&self, section: &str, key: &str, value: i32) -> Result<()> {
        self.store.set_int(section, key, i64::from(value))
    }

    // -------------------------------------------------------------------------
    // Core / UI / credentials
    // -------------------------------------------------------------------------

    pub fn get_app_mode(&self) -> String {
        self.string(SECTION_CORE, KEY_APP_MODE)
    }

    pub fn set_app_mode(&self, mode: &str) -> Result<()> {
        self.set_string(SECTION_CORE, KEY_APP_MODE, mode)
    }

    pub fn is_init_mode(&self) -> bool {
        self.get_app_mode() == APP_MODE_INIT
    }

    pub fn get_ui_theme(&self) -> String {
        self.string(SECTION_UI, KEY_THEME)
    }

    pub fn get_keyboard_locale(&self) -> String {
        self.string(SECTION_UI, KEY_KEYBOARD_LOCALE)
    }

    pub fn get_root_password_required(&self) -> bool {
        self.flag(SECTION_CREDENTIALS, KEY_ROOT_PASSWORD_REQUIRED)
    }

    pub fn get_weston_password_required(&self) -> bool {
        self.flag(SECTION_CREDENTIALS, KEY_WESTON_PASSWORD_REQUIRED)
    }

    // -------------------------------------------------------------------------
    // Backup flags
    // -------------------------------------------------------------------------

    pub fn get_backup_config_enable(&self) -> bool {
        self.flag(SECTION_BACKUP, KEY_BACKUP_CONFIG_ENABLE)
    }

    pub fn set_backup_config_enable(&self, enabled: bool) -> Result<()> {
        self.set_flag(SECTION_BACKUP, KEY_BACKUP_CONFIG_ENABLE, enabled)
    }

    pub fn get_backup_user_enable(&self) -> bool {
        self.flag(SECTION_BACKUP, KEY_BACKUP_USER_ENABLE)
    }

    pub fn set_backup_user_enable(&self, enabled: bool) -> Result<()> {
        self.set_flag(SECTION_BACKUP, KEY_BACKUP_USER_ENABLE, enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::VNC_PASSWORD;
    use tempfile::tempdir;

    fn schema() -> (tempfile::TempDir, ConfigSchema) {
        let dir = tempdir().unwrap();
        let schema = ConfigSchema::open(dir.path().join("settings_config.ini")).unwrap();
        (dir, schema)
    }

    #[test]
    fn test_open_persists_secret() {
        let (_dir, schema) = schema();
        let uuid = schema.get_uuid();
        assert!(!uuid.is_empty());

        let again = ConfigSchema::open(schema.path()).unwrap();
        assert_eq!(again.get_uuid(), uuid);
    }

    #[test]
    fn test_degrading_accessors() {
        let (_dir, schema) = schema();
        schema.set_string("screen", "brightness", "abc").unwrap();

        assert_eq!(schema.int("screen", "brightness"), 0);
        assert_eq!(schema.string("screen", "missing"), "");
        assert!(!schema.flag("screen", "missing"));
        // Empty names are logged and read as absent
        assert_eq!(schema.value("", "brightness"), None);
    }

    #[test]
    fn test_set_uuid_switches_key() {
        let (_dir, schema) = schema();
        schema.write_secret(VNC_PASSWORD, "pw").unwrap();

        let foreign = DeviceSecret::generate();
        schema.set_uuid(&foreign).unwrap();
        assert_eq!(schema.read_secret(VNC_PASSWORD), "");
        assert_eq!(schema.device_secret(), foreign);
    }

    #[test]
    fn test_backup_flags() {
        let (_dir, schema) = schema();
        assert!(!schema.get_backup_config_enable());
        schema.set_backup_config_enable(true).unwrap();
        schema.set_backup_user_enable(false).unwrap();
        assert!(schema.get_backup_config_enable());
        assert!(!schema.get_backup_user_enable());
    }

    #[test]
    fn test_app_mode() {
        let (_dir, schema) = schema();
        assert!(!schema.is_init_mode());
        schema.set_app_mode(APP_MODE_INIT).unwrap();
        assert!(schema.is_init_mode());
        assert_eq!(schema.get_app_mode(), "init");
    }
}
