//! Advisory lock serialising import, export and restore

use crate::error::{self, Error, Result};
use log::{debug, warn};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Message reported when another operation holds the lock
pub const LOCK_HELD_MESSAGE: &str = "Another restore operation is in progress.";

/// Lock file holding the owner's pid, removed on drop
#[derive(Debug)]
pub struct RestoreLock {
    path: PathBuf,
}

impl RestoreLock {
    /// Take the lock at `path`
    ///
    /// A lock left behind by a process that no longer exists is taken over.
    ///
    /// # Errors
    ///
    /// `LockHeld` if a live process holds the lock, otherwise I/O errors.
    pub fn acquire(path: &Path) -> Result<Self> {
        match Self::try_create(path) {
            Err(Error::LockHeld(_)) if is_stale(path) => {
                warn!("removing stale restore lock {}", path.display());
                error::remove_file(path)?;
                Self::try_create(path)
            }
            other => other,
        }
    }

    fn try_create(path: &Path) -> Result<Self> {
        error::create_parent_dir(path)?;
        let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(Error::LockHeld(path.display().to_string()));
            }
            Err(e) => {
                return Err(Error::FileWrite {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };
        // Best effort: an empty lock file is simply never considered stale
        let _ = writeln!(file, "{}", std::process::id());
        debug!("restore lock taken: {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RestoreLock {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!("failed to remove restore lock {}: {e}", self.path.display());
        }
    }
}

#[cfg(target_os = "linux")]
fn is_stale(path: &Path) -> bool {
    let Ok(content) = std::fs::read_to_string(path) else {
        return false;
    };
    match content.trim().parse::<u32>() {
        Ok(pid) => !Path::new("/proc").join(pid.to_string()).exists(),
        Err(_) => false,
    }
}

#[cfg(not(target_os = "linux"))]
fn is_stale(_path: &Path) -> bool {
    false
}
