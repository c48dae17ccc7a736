//! Import, export and local restore of the whole settings folder
//!
//! An import never touches the live settings file until the end:
//! 1. the archive is extracted into a scratch directory and validated
//! 2. each domain is reconciled against the live system from the
//!    extracted file
//! 3. the extracted file takes the local device secret and its secret
//!    fields are re-encrypted under it
//! 4. the extracted file is moved over the live one
//!
//! Entry points never return `Err`: every outcome becomes a
//! [`RestoreReport`] (or a `bool` for the user restore), worded for the
//! settings panel.

use super::accounts::{ShadowFile, UserAccounts};
use super::archive;
use super::lock::{LOCK_HELD_MESSAGE, RestoreLock};
use super::operations::BackupManager;
use super::reconcile;
use super::types::{ExportIntegrity, ExportManifest, MANIFEST_FILENAME, RestoreReport};
use crate::config::DeviceConfig;
use crate::credentials::{DeviceSecret, SECRET_FIELDS, SecretField};
use crate::error::{self, Error, Result};
use crate::live::LiveSystem;
use crate::schema::ConfigSchema;
use crate::storage::{IniStorage, StorageBackend};
use log::{debug, error, info, warn};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;
use tempfile::TempDir;

const MSG_SUCCESS: &str = "Success.";
const MSG_READONLY: &str =
    " But the system is readonly mode. If you want to keep import settings, you should disable readonly mode first.";
const MSG_REBOOT: &str = " Please reboot your device for these changes to take effect.";
const MSG_IMPORT_FAILED: &str = "Import config failed.";
const MSG_EXPORT_FAILED: &str = "Export config failed.";
const MSG_RESTORE_FAILED: &str = "Restore config failed.";

/// What a swap left behind for the report
struct Applied {
    needs_reboot: bool,
    issues: Vec<String>,
}

/// Runs import, export and local backup/restore against a live system
pub struct RestoreOrchestrator {
    config: DeviceConfig,
    live: LiveSystem,
    accounts: Arc<dyn UserAccounts>,
}

impl std::fmt::Debug for RestoreOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestoreOrchestrator")
            .field("config", &self.config)
            .field("live", &self.live)
            .finish_non_exhaustive()
    }
}

impl RestoreOrchestrator {
    /// Orchestrator using the shadow file at `config.user_config_path`
    pub fn new(config: DeviceConfig, live: LiveSystem) -> Self {
        let accounts = Arc::new(ShadowFile::new(&config.user_config_path));
        Self {
            config,
            live,
            accounts,
        }
    }

    /// Replace the user accounts backend
    #[must_use]
    pub fn with_accounts(mut self, accounts: Arc<dyn UserAccounts>) -> Self {
        self.accounts = accounts;
        self
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Plain file backups over the same config and accounts
    pub fn backups(&self) -> BackupManager<'_> {
        BackupManager::new(&self.config, self.accounts.as_ref())
    }

    fn lock(&self) -> std::result::Result<RestoreLock, RestoreReport> {
        RestoreLock::acquire(&self.config.lock_path).map_err(|e| {
            warn!("restore lock: {e}");
            match e {
                Error::LockHeld(_) => RestoreReport::failure(LOCK_HELD_MESSAGE),
                _ => RestoreReport::failure(MSG_RESTORE_FAILED),
            }
        })
    }

    fn scratch_dir(&self) -> Result<TempDir> {
        let parent = self
            .config
            .scratch_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir);
        error::create_dir(&parent)?;
        tempfile::Builder::new()
            .prefix("devconf-")
            .tempdir_in(&parent)
            .map_err(|e| Error::DirectoryCreate {
                path: parent,
                source: e,
            })
    }

    // =========================================================================
    // Import
    // =========================================================================

    /// Import an exported archive into the live settings file
    ///
    /// `local` is the schema attached to the live settings file; it keeps its
    /// device secret across the import.
    pub fn import_config(&self, path: &Path, local: &ConfigSchema) -> RestoreReport {
        info!("importing settings from {}", path.display());
        let _lock = match self.lock() {
            Ok(lock) => lock,
            Err(report) => return report,
        };

        if path.as_os_str().is_empty() {
            warn!("import: {}", Error::MissingParameter("import file".into()));
            return RestoreReport::failure(MSG_IMPORT_FAILED);
        }
        if !path.exists() {
            warn!("import: {} does not exist", path.display());
            return RestoreReport::failure(format!("Import file:{} is not exist.", path.display()));
        }

        let scratch = match self.scratch_dir() {
            Ok(dir) => dir,
            Err(e) => {
                error!("import: scratch dir: {e}");
                return RestoreReport::failure(MSG_IMPORT_FAILED);
            }
        };

        let settings = match self.extract(path, scratch.path(), false) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("import: {e}");
                return if matches!(e, Error::BadFormat(_) | Error::Archive(_)) {
                    RestoreReport::failure(format!(
                        "Incorrect format of import file:{}",
                        path.display()
                    ))
                } else {
                    RestoreReport::failure(MSG_IMPORT_FAILED)
                };
            }
        };

        match self.apply(&settings, local) {
            Ok(applied) => {
                let report = self.success_report(&applied);
                info!("import finished: {report}");
                report
            }
            Err(e) => {
                error!("import: {e}");
                RestoreReport::failure(MSG_IMPORT_FAILED)
            }
        }
    }

    /// Extract `source` into `dir` and return the validated settings file
    ///
    /// With `allow_plain`, a file that is not a gzip archive is taken as the
    /// settings file itself.
    fn extract(&self, source: &Path, dir: &Path, allow_plain: bool) -> Result<PathBuf> {
        let settings = dir.join(&self.config.settings_file);

        if archive::is_gzip(source)? {
            archive::unpack(source, dir)?;
        } else if allow_plain {
            debug!("{} is a plain settings file", source.display());
            error::copy_file(source, &settings)?;
        } else {
            return Err(Error::BadFormat(format!(
                "{} is not a gzip archive",
                source.display()
            )));
        }

        if !settings.is_file() {
            return Err(Error::BadFormat(format!(
                "no {} in {}",
                self.config.settings_file,
                source.display()
            )));
        }

        let manifest_path = dir.join(MANIFEST_FILENAME);
        if manifest_path.is_file() {
            let manifest = ExportManifest::from_json(&error::read_file(&manifest_path)?)?;
            manifest.verify(&settings)?;
            debug!(
                "manifest ok: exported by {} at {}",
                manifest.export.app_version, manifest.export.created_at
            );
        } else {
            debug!("no manifest in {}", source.display());
        }

        IniStorage::new().read(&settings)?;
        Ok(settings)
    }

    /// Reconcile from `imported_path`, re-key it, then move it over the
    /// live file
    ///
    /// The swap is the last step: an error before it leaves the live file
    /// as it was.
    fn apply(&self, imported_path: &Path, local: &ConfigSchema) -> Result<Applied> {
        let imported = ConfigSchema::open_with_cipher(imported_path, local.cipher())?;

        let outcomes = reconcile::reconcile_all(&imported, &self.live, &self.config);
        let needs_reboot = outcomes.iter().any(|o| o.needs_reboot());
        let mut issues: Vec<String> = outcomes
            .iter()
            .flat_map(|o| o.issues().iter().cloned())
            .collect();

        let origin = local.device_secret();
        if imported.device_secret() == origin {
            debug!("same device secret, secrets kept as imported");
        } else {
            issues.extend(rekey(&imported, &origin)?);
        }
        drop(imported);

        BackupManager::restore(imported_path, local.path())?;

        Ok(Applied {
            needs_reboot,
            issues,
        })
    }

    fn success_report(&self, applied: &Applied) -> RestoreReport {
        let mut message = String::from(MSG_SUCCESS);
        if self.live.system.readonly_mode() {
            message.push_str(MSG_READONLY);
        }
        if applied.needs_reboot {
            message.push_str(MSG_REBOOT);
        }
        if !applied.issues.is_empty() {
            message.push_str(&format!(
                " Some settings could not be applied: {}.",
                applied.issues.join(", ")
            ));
        }
        RestoreReport::success(message, applied.needs_reboot)
    }

    // =========================================================================
    // Export / local backup
    // =========================================================================

    /// Archive the settings folder, with a manifest, into `dst`
    ///
    /// On success the report message is the archive path.
    pub fn export_config(&self, dst: &Path) -> RestoreReport {
        info!("exporting settings to {}", dst.display());
        let _lock = match self.lock() {
            Ok(lock) => lock,
            Err(report) => return report,
        };

        match self.write_export(dst) {
            Ok(count) => {
                info!("exported {count} files to {}", dst.display());
                RestoreReport::success(dst.display().to_string(), false)
            }
            Err(e) => {
                error!("export: {e}");
                RestoreReport::failure(MSG_EXPORT_FAILED)
            }
        }
    }

    fn write_export(&self, dst: &Path) -> Result<u32> {
        let settings = self.config.settings_path();
        if !settings.is_file() {
            return Err(Error::NotFound(settings.display().to_string()));
        }

        let (sha256, size_bytes) = archive::calculate_file_hash(&settings)?;
        let file_count = archive::count_files(&self.config.config_dir, dst)?;
        let manifest = ExportManifest::new(
            &self.config.app_version,
            file_count,
            ExportIntegrity {
                settings_file: self.config.settings_file.clone(),
                sha256,
                size_bytes,
            },
        );
        let json = manifest.to_json()?;

        error::create_parent_dir(dst)?;
        let count = archive::pack_dir(
            &self.config.config_dir,
            dst,
            &[(MANIFEST_FILENAME, json.as_bytes())],
        )?;
        sync_to_disk(dst)?;
        Ok(count)
    }

    /// Export to the fixed local backup path
    pub fn backup_config(&self) -> RestoreReport {
        self.export_config(&self.config.backup_config_path)
    }

    /// Restore from the fixed local backup, reconciling like an import
    ///
    /// The backup may be an archive or a plain copy of the settings file.
    /// It is removed only after a successful restore.
    pub fn restore_config_from_backup(&self, local: &ConfigSchema) -> RestoreReport {
        let source = &self.config.backup_config_path;
        info!("restoring settings from {}", source.display());
        let _lock = match self.lock() {
            Ok(lock) => lock,
            Err(report) => return report,
        };

        if !source.is_file() {
            warn!("restore: {} does not exist", source.display());
            return RestoreReport::failure(format!("Backup file:{} is not exist.", source.display()));
        }

        let scratch = match self.scratch_dir() {
            Ok(dir) => dir,
            Err(e) => {
                error!("restore: scratch dir: {e}");
                return RestoreReport::failure(MSG_RESTORE_FAILED);
            }
        };

        let settings = match self.extract(source, scratch.path(), true) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("restore: {e}");
                return RestoreReport::failure(format!(
                    "Incorrect format of backup file:{}",
                    source.display()
                ));
            }
        };

        match self.apply(&settings, local) {
            Ok(applied) => {
                if let Err(e) = error::remove_file(source) {
                    warn!("restore: backup not removed: {e}");
                }
                let report = self.success_report(&applied);
                info!("restore finished: {report}");
                report
            }
            Err(e) => {
                error!("restore: {e}");
                RestoreReport::failure(MSG_RESTORE_FAILED)
            }
        }
    }

    /// Restore the root and weston passwords from the fixed user backup
    pub fn restore_user_config_from_backup(&self) -> bool {
        if !self.config.backup_user_config_path.exists() {
            debug!("no user backup at {}", self.config.backup_user_config_path.display());
            return false;
        }
        let Ok(_lock) = self.lock() else {
            return false;
        };
        match self.backups().restore_user_config_from_backup() {
            Ok(()) => true,
            Err(e) => {
                warn!("user restore: {e}");
                false
            }
        }
    }

    // =========================================================================
    // Background workers
    // =========================================================================

    /// Run [`import_config`](Self::import_config) on a worker thread
    pub fn spawn_import(
        self: &Arc<Self>,
        path: PathBuf,
        local: Arc<ConfigSchema>,
    ) -> JoinHandle<RestoreReport> {
        let this = Arc::clone(self);
        std::thread::spawn(move || this.import_config(&path, &local))
    }

    /// Run [`export_config`](Self::export_config) on a worker thread
    pub fn spawn_export(self: &Arc<Self>, dst: PathBuf) -> JoinHandle<RestoreReport> {
        let this = Arc::clone(self);
        std::thread::spawn(move || this.export_config(&dst))
    }
}

/// Put `origin` into `imported` and re-encrypt its secret fields under it
///
/// Only fields present in the file are rewritten. A field that cannot be
/// re-encrypted is cleared and returned as an issue.
fn rekey(imported: &ConfigSchema, origin: &DeviceSecret) -> Result<Vec<String>> {
    // Plaintext only readable with the exporting device's secret
    let captured: Vec<(SecretField, String)> = SECRET_FIELDS
        .iter()
        .filter(|field| {
            imported
                .store()
                .contains(field.section, field.key)
                .unwrap_or(false)
        })
        .map(|field| (*field, imported.read_secret(*field)))
        .collect();

    imported.set_uuid(origin)?;

    let mut issues = Vec::new();
    for (field, plaintext) in captured {
        imported.write_secret(field, &plaintext)?;
        if imported.read_secret(field) != plaintext {
            warn!("[{}] {}: re-encrypt failed, cleared", field.section, field.key);
            imported.store().set(field.section, field.key, "")?;
            issues.push(format!("credentials: {}", field.key));
        }
    }
    debug!("secrets re-encrypted under the local device secret");
    Ok(issues)
}

/// Flush a written file and its directory entry
fn sync_to_disk(path: &Path) -> Result<()> {
    File::open(path)
        .and_then(|f| f.sync_all())
        .map_err(|e| Error::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })?;

    #[cfg(unix)]
    {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = File::open(parent).and_then(|d| d.sync_all()) {
                debug!("sync {}: {e}", parent.display());
            }
        }
    }
    Ok(())
}
