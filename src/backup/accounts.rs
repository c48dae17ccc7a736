//! OS account password hashes
//!
//! The user backup is a copy of the shadow file. Restoring never replaces the
//! live shadow file wholesale: only the hash of each restored user is copied
//! across, so accounts created since the backup survive.

use crate::error::{self, Error, Result};
use log::{debug, info};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Administrative account
pub const ROOT_USER: &str = "root";

/// Account the panel UI runs under
pub const WESTON_USER: &str = "weston";

const FIELD_SEPARATOR: char = ':';

/// Access to OS account password hashes
pub trait UserAccounts: Send + Sync {
    /// Hash stored for `user` in a shadow-format file at `source`
    ///
    /// # Errors
    ///
    /// `NotFound` if the file or the user entry is missing.
    fn hash_from_file(&self, source: &Path, user: &str) -> Result<String>;

    /// Replace the live hash of `user`
    ///
    /// # Errors
    ///
    /// `NotFound` if the user has no live entry, otherwise I/O errors.
    fn set_hash(&self, user: &str, hash: &str) -> Result<()>;

    /// Copy the hash of `user` from `source` to the live accounts
    fn restore_user(&self, source: &Path, user: &str) -> Result<()> {
        if !source.exists() {
            return Err(Error::NotFound(source.display().to_string()));
        }
        let hash = self.hash_from_file(source, user)?;
        self.set_hash(user, &hash)?;
        info!("restored password of {user} from {}", source.display());
        Ok(())
    }
}

/// Shadow-format password file (`name:hash:lastchg:...`)
#[derive(Debug, Clone)]
pub struct ShadowFile {
    path: PathBuf,
}

impl ShadowFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Atomically swap in `content`, keeping the live file's mode
    ///
    /// The temp file sits next to the live one and is created owner-only, so
    /// the hashes are never readable by others while it exists.
    fn replace_contents(&self, content: &str) -> Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let write_err = |source: std::io::Error| Error::FileWrite {
            path: self.path.clone(),
            source,
        };

        let mut temp = tempfile::Builder::new()
            .prefix(".shadow")
            .tempfile_in(dir)
            .map_err(write_err)?;
        temp.write_all(content.as_bytes()).map_err(write_err)?;
        temp.as_file().sync_all().map_err(write_err)?;

        let permissions = std::fs::metadata(&self.path)
            .map_err(|e| Error::FileRead {
                path: self.path.clone(),
                source: e,
            })?
            .permissions();
        temp.as_file()
            .set_permissions(permissions)
            .map_err(write_err)?;

        temp.persist(&self.path).map_err(|e| write_err(e.error))?;
        Ok(())
    }
}

fn entry_hash<'a>(content: &'a str, user: &str) -> Option<&'a str> {
    content.lines().find_map(|line| {
        let mut fields = line.split(FIELD_SEPARATOR);
        if fields.next()? == user {
            Some(fields.next().unwrap_or_default())
        } else {
            None
        }
    })
}

impl UserAccounts for ShadowFile {
    fn hash_from_file(&self, source: &Path, user: &str) -> Result<String> {
        let content = error::read_file(source)?;
        entry_hash(&content, user)
            .map(str::to_string)
            .ok_or_else(|| Error::NotFound(format!("user {user} in {}", source.display())))
    }

    fn set_hash(&self, user: &str, hash: &str) -> Result<()> {
        let content = error::read_file(&self.path)?;
        let mut found = false;

        let mut rewritten: String = content
            .lines()
            .map(|line| {
                let mut fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
                if fields.first() == Some(&user) && fields.len() > 1 {
                    found = true;
                    fields[1] = hash;
                    fields.join(":")
                } else {
                    line.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n");
        if content.ends_with('\n') {
            rewritten.push('\n');
        }

        if !found {
            return Err(Error::NotFound(format!(
                "user {user} in {}",
                self.path.display()
            )));
        }

        self.replace_contents(&rewritten)?;
        debug!("{}: hash of {user} replaced", self.path.display());
        Ok(())
    }
}
