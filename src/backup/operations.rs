//! Local copies of the settings file and the user password entries

use super::accounts::{ROOT_USER, UserAccounts, WESTON_USER};
use crate::config::DeviceConfig;
use crate::error::{self, Error, Result};
use crate::security::set_secure_file_permissions;
use log::{debug, info, warn};
use std::path::Path;

/// Plain file backups of the settings file and the shadow file
///
/// Borrowed from a [`RestoreOrchestrator`](super::RestoreOrchestrator) or
/// built directly over a config and an accounts backend.
pub struct BackupManager<'a> {
    config: &'a DeviceConfig,
    accounts: &'a dyn UserAccounts,
}

impl std::fmt::Debug for BackupManager<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackupManager")
            .field("config_dir", &self.config.config_dir)
            .finish_non_exhaustive()
    }
}

impl<'a> BackupManager<'a> {
    pub fn new(config: &'a DeviceConfig, accounts: &'a dyn UserAccounts) -> Self {
        Self { config, accounts }
    }

    /// Copy `src` to `dst`, creating the destination directory
    ///
    /// # Errors
    ///
    /// `NotFound` if `src` does not exist, otherwise I/O errors.
    pub fn backup(src: &Path, dst: &Path) -> Result<u64> {
        if !src.exists() {
            return Err(Error::NotFound(src.display().to_string()));
        }
        error::create_parent_dir(dst)?;
        let bytes = error::copy_file(src, dst)?;
        debug!("copied {} -> {} ({bytes} bytes)", src.display(), dst.display());
        Ok(bytes)
    }

    /// Move `src` over `dst`
    ///
    /// Falls back to copy and remove when a rename crosses filesystems.
    ///
    /// # Errors
    ///
    /// `NotFound` if `src` does not exist, otherwise I/O errors.
    pub fn restore(src: &Path, dst: &Path) -> Result<()> {
        if !src.exists() {
            return Err(Error::NotFound(src.display().to_string()));
        }
        error::create_parent_dir(dst)?;
        error::move_file(src, dst)?;
        debug!("moved {} -> {}", src.display(), dst.display());
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Settings file
    // -------------------------------------------------------------------------

    /// Copy the live settings file to the fixed backup path
    pub fn backup_config(&self) -> Result<()> {
        self.backup_config_to_custom_path(&self.config.backup_config_path)
    }

    pub fn backup_config_to_custom_path(&self, target: &Path) -> Result<()> {
        Self::backup(&self.config.settings_path(), target)?;
        info!("settings backed up to {}", target.display());
        Ok(())
    }

    /// Move the fixed backup over the live settings file
    ///
    /// The backup is consumed. No reconciliation happens here.
    pub fn restore_config_from_backup(&self) -> Result<()> {
        self.restore_config_from_custom_path(&self.config.backup_config_path)
    }

    pub fn restore_config_from_custom_path(&self, source: &Path) -> Result<()> {
        Self::restore(source, &self.config.settings_path())?;
        info!("settings restored from {}", source.display());
        Ok(())
    }

    // -------------------------------------------------------------------------
    // User password entries
    // -------------------------------------------------------------------------

    /// Copy the shadow file to the fixed user backup path (mode 0600)
    pub fn backup_user_config(&self) -> Result<()> {
        self.backup_user_config_to_custom_path(&self.config.backup_user_config_path)
    }

    pub fn backup_user_config_to_custom_path(&self, target: &Path) -> Result<()> {
        Self::backup(&self.config.user_config_path, target)?;
        set_secure_file_permissions(target)?;
        info!("user config backed up to {}", target.display());
        Ok(())
    }

    /// Restore the root and weston passwords from the fixed user backup
    ///
    /// Both users are attempted. The backup is removed only if both
    /// succeed; a half-applied restore is not rolled back.
    ///
    /// # Errors
    ///
    /// The first failure, after both users were attempted.
    pub fn restore_user_config_from_backup(&self) -> Result<()> {
        let source = &self.config.backup_user_config_path;
        if !source.exists() {
            return Err(Error::NotFound(source.display().to_string()));
        }

        let results = [ROOT_USER, WESTON_USER].map(|user| {
            self.accounts.restore_user(source, user).inspect_err(|e| {
                warn!("restore password of {user} failed: {e}");
            })
        });
        let [root, weston] = results;
        root?;
        weston?;

        error::remove_file(source)?;
        info!("user config restored from {}", source.display());
        Ok(())
    }

    /// Restore the root password from `source`; the source is kept
    pub fn restore_user_config_from_custom_path(&self, source: &Path) -> Result<()> {
        self.accounts.restore_user(source, ROOT_USER)
    }
}
