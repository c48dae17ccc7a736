//! File permission helpers for credential-bearing files
//!
//! The user-account backup holds password hashes copied out of the shadow
//! file and must never be world readable.

use crate::error::{Error, Result};
use std::path::Path;

/// Set restrictive permissions on a file (Unix: 0o600 - owner read/write only)
///
/// # Errors
///
/// Returns an error if the file metadata cannot be read or updated.
#[cfg(unix)]
pub fn set_secure_file_permissions(path: &Path) -> Result<()> {
    set_mode(path, 0o600)
}

/// Set restrictive permissions on a directory (Unix: 0o700 - owner rwx only)
///
/// # Errors
///
/// Returns an error if the directory metadata cannot be read or updated.
#[cfg(unix)]
pub fn set_secure_dir_permissions(path: &Path) -> Result<()> {
    set_mode(path, 0o700)
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)
        .map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?
        .permissions();
    perms.set_mode(mode);

    fs::set_permissions(path, perms).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Ensure a directory exists with secure permissions (Unix: 0o700)
///
/// # Errors
///
/// Returns an error if directory creation or permission setting fails.
pub fn ensure_secure_dir(path: &Path) -> Result<()> {
    crate::error::create_dir(path)?;

    #[cfg(unix)]
    set_secure_dir_permissions(path)?;

    Ok(())
}

/// No-op where Unix modes are unavailable
#[cfg(not(unix))]
pub fn set_secure_file_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

/// No-op where Unix modes are unavailable
#[cfg(not(unix))]
pub fn set_secure_dir_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_secure_file_permissions() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join(".backup_shadow");
        fs::write(&file_path, "root:$6$abc:19000:0:99999:7:::\n").unwrap();

        set_secure_file_permissions(&file_path).unwrap();

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&file_path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn test_ensure_secure_dir_creates_nested() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("userdata").join("secure");

        ensure_secure_dir(&nested).unwrap();
        assert!(nested.is_dir());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&nested).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o700);
        }
    }

    #[test]
    fn test_missing_file_errors() {
        let dir = tempdir().unwrap();
        assert!(set_secure_file_permissions(&dir.path().join("absent")).is_err());
    }
}
