//! Error types for devconf

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for devconf operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for devconf
#[derive(Error, Debug)]
pub enum Error {
    // -------------------------------------------------------------------------
    // Argument Errors
    // -------------------------------------------------------------------------
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad format: {0}")]
    BadFormat(String),

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory '{path}': {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to delete file '{path}': {source}")]
    FileDelete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to move '{from}' to '{to}': {source}")]
    FileMove {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Archive Errors
    // -------------------------------------------------------------------------
    #[error("Archive error: {0}")]
    Archive(String),

    #[error("Failed to serialize data: {0}")]
    Serialize(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Credential Errors
    // -------------------------------------------------------------------------
    #[error("No usable device secret")]
    CryptoUnavailable,

    #[error("Credential error: {0}")]
    Credential(String),

    // -------------------------------------------------------------------------
    // Live System Errors
    // -------------------------------------------------------------------------
    #[error("Could not apply {domain} settings: {reason}")]
    PartialReconciliation { domain: String, reason: String },

    #[error("Command '{program}' failed: {reason}")]
    Command { program: String, reason: String },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Concurrency Errors
    // -------------------------------------------------------------------------
    #[error("Another restore operation is in progress (lock file '{0}')")]
    LockHeld(String),
}

impl Error {
    /// Check if this is a "not found" type error
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound(_) => true,
            Error::FileRead { source, .. } | Error::FileMove { source, .. } => {
                source.kind() == std::io::ErrorKind::NotFound
            }
            _ => false,
        }
    }

    /// Check if this error aborts a top-level backup/export/import operation
    #[must_use]
    pub fn is_fatal_io(&self) -> bool {
        matches!(
            self,
            Error::FileRead { .. }
                | Error::FileWrite { .. }
                | Error::DirectoryCreate { .. }
                | Error::FileDelete { .. }
                | Error::FileMove { .. }
                | Error::Archive(_)
        )
    }
}

// =============================================================================
// Filesystem Helper Functions
// =============================================================================
// These reduce repetitive map_err patterns in the backup module.

/// Create a directory (and parents) with proper error handling
pub fn create_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| Error::DirectoryCreate {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Create the parent directory of `path` if it has one
pub fn create_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => create_dir(parent),
        _ => Ok(()),
    }
}

/// Copy a file with proper error handling
pub fn copy_file(src: &Path, dest: &Path) -> Result<u64> {
    std::fs::copy(src, dest).map_err(|e| Error::FileRead {
        path: src.to_path_buf(),
        source: e,
    })
}

/// Move a file, falling back to copy + remove across filesystems
pub fn move_file(src: &Path, dest: &Path) -> Result<()> {
    match std::fs::rename(src, dest) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::FileMove {
            from: src.to_path_buf(),
            to: dest.to_path_buf(),
            source: e,
        }),
        Err(e) => {
            log::debug!(
                "rename {} -> {} failed ({e}), copying instead",
                src.display(),
                dest.display()
            );
            std::fs::copy(src, dest).map_err(|source| Error::FileMove {
                from: src.to_path_buf(),
                to: dest.to_path_buf(),
                source,
            })?;
            remove_file(src)
        }
    }
}

/// Write content to a file with proper error handling
pub fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    std::fs::write(path, contents).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Read a file to a string with proper error handling
pub fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Remove a file with proper error handling
pub fn remove_file(path: &Path) -> Result<()> {
    std::fs::remove_file(path).map_err(|e| Error::FileDelete {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_move_file_missing_source_is_not_found() {
        let dir = tempdir().unwrap();
        let err = move_file(&dir.path().join("nope"), &dir.path().join("dest")).unwrap_err();
        assert!(err.is_not_found());
        assert!(err.is_fatal_io());
    }

    #[test]
    fn test_move_file_consumes_source() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("a.ini");
        let dest = dir.path().join("b.ini");
        write_file(&src, "[core]\nuuid=x\n").unwrap();

        move_file(&src, &dest).unwrap();

        assert!(!src.exists());
        assert_eq!(read_file(&dest).unwrap(), "[core]\nuuid=x\n");
    }

    #[test]
    fn test_create_parent_dir_handles_bare_filename() {
        create_parent_dir(Path::new("settings_config.ini")).unwrap();
    }
}
