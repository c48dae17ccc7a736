//! Backup, export, import and restore of device settings

pub mod accounts;
mod archive;
mod lock;
mod operations;
pub mod reconcile;
mod restore;
mod types;

pub use accounts::{ROOT_USER, ShadowFile, UserAccounts, WESTON_USER};
pub use archive::{calculate_file_hash, is_gzip};
pub use lock::{LOCK_HELD_MESSAGE, RestoreLock};
pub use operations::BackupManager;
pub use restore::RestoreOrchestrator;

pub use types::{
    ExportInfo, ExportIntegrity, ExportManifest, MANIFEST_FILENAME, MANIFEST_VERSION_CURRENT,
    MANIFEST_VERSION_MAX_SUPPORTED, MANIFEST_VERSION_MIN_SUPPORTED, ReconcileOutcome,
    RestoreReport, is_manifest_version_supported,
};
