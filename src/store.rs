//! Section/key configuration store backed by an INI file
//!
//! Every read goes to disk and every write is atomic and durable when it
//! returns, so two `ConfigStore` handles on the same path always agree. A
//! missing file behaves like an empty store.

use crate::error::{Error, Result};
use crate::storage::{IniDocument, IniStorage, StorageBackend};
use log::{debug, warn};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Section and key names: no brackets, no `=`, no line breaks, no comment
/// marker in front, no surrounding whitespace.
static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s\[\]=;#](?:[^\[\]=\r\n]*[^\s\[\]=])?$").expect("valid name pattern")
});

/// Parse a stored value the way the settings panel always has: empty, `0`
/// and `false` are false, anything else is true.
pub fn parse_bool(value: &str) -> bool {
    let value = value.trim();
    !(value.is_empty() || value == "0" || value.eq_ignore_ascii_case("false"))
}

/// Parse a stored integer, falling back to 0
pub fn parse_int(value: &str) -> i64 {
    value.trim().parse().unwrap_or(0)
}

/// Persistent section/key store
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    storage: IniStorage,
}

impl ConfigStore {
    /// Attach to the file at `path` (it does not need to exist yet)
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            storage: IniStorage::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the backing file exists
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn validate_name(which: &str, name: &str) -> Result<()> {
        if name.is_empty() {
            warn!("config store: empty {which} name");
            return Err(Error::MissingParameter(which.into()));
        }
        if !NAME_PATTERN.is_match(name) {
            warn!("config store: invalid name '{name}'");
            return Err(Error::BadFormat(format!("invalid {which} name '{name}'")));
        }
        Ok(())
    }

    fn validate(section: &str, key: &str) -> Result<()> {
        if key.is_empty() && !section.is_empty() {
            return Self::validate_name("key", key);
        }
        Self::validate_name("section", section)?;
        Self::validate_name("key", key)
    }

    /// Check a key/value pair before it goes into a document
    ///
    /// # Errors
    ///
    /// Same as [`set`](Self::set).
    pub fn validate_entry(section: &str, key: &str, value: &str) -> Result<()> {
        Self::validate(section, key)?;
        if value.contains(['\r', '\n']) {
            warn!("config store: line break in value for [{section}] {key}");
            return Err(Error::BadFormat(format!("line break in value for {key}")));
        }
        Ok(())
    }

    /// Load the whole document; a missing file is an empty document
    pub fn load(&self) -> Result<IniDocument> {
        if !self.path.exists() {
            return Ok(IniDocument::new());
        }
        self.storage.read(&self.path)
    }

    fn save(&self, doc: &IniDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                crate::security::ensure_secure_dir(parent)?;
            }
        }
        self.storage.write(&self.path, doc)
    }

    /// Read a value; `None` means the key was never written
    ///
    /// # Errors
    ///
    /// `MissingParameter` for an empty section or key, otherwise I/O or parse
    /// errors from the backing file.
    pub fn get(&self, section: &str, key: &str) -> Result<Option<String>> {
        Self::validate(section, key)?;
        Ok(self.load()?.get(section, key).map(str::to_string))
    }

    pub fn contains(&self, section: &str, key: &str) -> Result<bool> {
        Ok(self.get(section, key)?.is_some())
    }

    pub fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>> {
        Ok(self.get(section, key)?.as_deref().map(parse_bool))
    }

    pub fn get_int(&self, section: &str, key: &str) -> Result<Option<i64>> {
        Ok(self.get(section, key)?.as_deref().map(parse_int))
    }

    /// Upsert a value and persist it
    ///
    /// # Errors
    ///
    /// `MissingParameter` for an empty section or key (nothing is written),
    /// `BadFormat` for names or values the file format cannot hold.
    pub fn set(&self, section: &str, key: &str, value: &str) -> Result<()> {
        self.set_many(section, &[(key, value)])
    }

    pub fn set_bool(&self, section: &str, key: &str, value: bool) -> Result<()> {
        self.set(section, key, if value { "true" } else { "false" })
    }

    pub fn set_int(&self, section: &str, key: &str, value: i64) -> Result<()> {
        self.set(section, key, &value.to_string())
    }

    /// Upsert several keys of one section in a single write
    pub fn set_many(&self, section: &str, entries: &[(&str, &str)]) -> Result<()> {
        Self::validate_name("section", section)?;
        for (key, value) in entries {
            Self::validate_entry(section, key, value)?;
        }
        if entries.is_empty() {
            return Ok(());
        }

        let mut doc = self.load()?;
        for (key, value) in entries {
            doc.set(section, key, value);
        }
        self.save(&doc)?;
        debug!("config store: wrote {} key(s) to [{section}]", entries.len());
        Ok(())
    }

    /// Load, edit and save the document in one atomic write
    ///
    /// Nothing is written if `edit` fails.
    pub fn update(&self, edit: impl FnOnce(&mut IniDocument) -> Result<()>) -> Result<()> {
        let mut doc = self.load()?;
        edit(&mut doc)?;
        self.save(&doc)
    }

    /// Remove a key; returns whether it existed
    pub fn remove(&self, section: &str, key: &str) -> Result<bool> {
        Self::validate(section, key)?;
        let mut doc = self.load()?;
        if !doc.remove(section, key) {
            return Ok(false);
        }
        self.save(&doc)?;
        Ok(true)
    }

    /// All key/value pairs of a section, in file order
    pub fn section(&self, name: &str) -> Result<Vec<(String, String)>> {
        if name.is_empty() {
            warn!("config store: empty section name");
            return Err(Error::MissingParameter("section".into()));
        }
        Ok(self
            .load()?
            .section(name)
            .map(|s| s.entries.clone())
            .unwrap_or_default())
    }
}
