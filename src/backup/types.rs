//! Backup/restore types

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use time::OffsetDateTime;

/// Name of the manifest entry embedded at the root of an export archive
pub const MANIFEST_FILENAME: &str = ".devconf-manifest.json";

/// Current manifest format version
pub const MANIFEST_VERSION_CURRENT: u32 = 1;

/// Minimum manifest version this library can import
pub const MANIFEST_VERSION_MIN_SUPPORTED: u32 = 1;

/// Maximum manifest version this library can import
pub const MANIFEST_VERSION_MAX_SUPPORTED: u32 = 1;

/// Check if a manifest version is supported for import
pub fn is_manifest_version_supported(version: u32) -> bool {
    (MANIFEST_VERSION_MIN_SUPPORTED..=MANIFEST_VERSION_MAX_SUPPORTED).contains(&version)
}

/// Manifest embedded in export archives
///
/// Archives produced by older panels carry no manifest; those are accepted
/// as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportManifest {
    /// Manifest format version
    pub version: u32,

    /// Export metadata
    pub export: ExportInfo,

    /// Integrity info for the settings file
    pub integrity: ExportIntegrity,
}

/// Export metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportInfo {
    /// Application version that created the export
    pub app_version: String,

    /// When the export was created
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    /// Number of files archived besides the manifest
    pub file_count: u32,
}

/// Checksum of the settings file at export time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportIntegrity {
    /// Settings filename inside the archive
    pub settings_file: String,

    /// SHA-256 of the settings file
    pub sha256: String,

    pub size_bytes: u64,
}

impl ExportManifest {
    pub fn new(app_version: impl Into<String>, file_count: u32, integrity: ExportIntegrity) -> Self {
        Self {
            version: MANIFEST_VERSION_CURRENT,
            export: ExportInfo {
                app_version: app_version.into(),
                created_at: OffsetDateTime::now_utc(),
                file_count,
            },
            integrity,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a manifest; malformed JSON is a bad format, not a serializer error
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::BadFormat(format!("export manifest: {e}")))
    }

    /// Check the version and the settings checksum against an extracted file
    ///
    /// # Errors
    ///
    /// `BadFormat` for an unsupported version or a checksum mismatch.
    pub fn verify(&self, settings_path: &Path) -> Result<()> {
        if !is_manifest_version_supported(self.version) {
            return Err(Error::BadFormat(format!(
                "unsupported export manifest version {}",
                self.version
            )));
        }
        let (sha256, size) = super::archive::calculate_file_hash(settings_path)?;
        if sha256 != self.integrity.sha256 || size != self.integrity.size_bytes {
            return Err(Error::BadFormat(format!(
                "checksum mismatch for {}",
                self.integrity.settings_file
            )));
        }
        Ok(())
    }
}

/// Outcome of reconciling one settings domain against the live system
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The imported config has no data for the domain
    Skipped,

    /// Everything applied
    Applied { needs_reboot: bool },

    /// Some live calls failed; the rest was applied
    Partial {
        needs_reboot: bool,
        issues: Vec<String>,
    },
}

impl ReconcileOutcome {
    /// `Applied`, or `Partial` when `issues` is non-empty
    pub fn from_issues(needs_reboot: bool, issues: Vec<String>) -> Self {
        if issues.is_empty() {
            Self::Applied { needs_reboot }
        } else {
            Self::Partial {
                needs_reboot,
                issues,
            }
        }
    }

    pub fn needs_reboot(&self) -> bool {
        match self {
            Self::Skipped => false,
            Self::Applied { needs_reboot } | Self::Partial { needs_reboot, .. } => *needs_reboot,
        }
    }

    pub fn issues(&self) -> &[String] {
        match self {
            Self::Partial { issues, .. } => issues,
            _ => &[],
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }
}

/// Result of an import, export or restore, as shown to the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Human-readable outcome, including caveats
    pub message: String,

    pub success: bool,

    /// Whether the device must be rebooted for the changes to take effect
    pub reboot_required: bool,
}

impl RestoreReport {
    pub fn success(message: impl Into<String>, reboot_required: bool) -> Self {
        Self {
            message: message.into(),
            success: true,
            reboot_required,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
            reboot_required: false,
        }
    }
}

impl std::fmt::Display for RestoreReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}
