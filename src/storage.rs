//! Storage backend trait and the INI implementation
//!
//! The device settings file is a flat INI document:
//!
//! ```text
//! [core]
//! uuid=ZTg0ZjYw...
//! app_mode=general
//!
//! [eth0]
//! IPv4.method=manual
//! ```
//!
//! Section and key order is preserved across a read/write cycle so that an
//! untouched file renders byte-for-byte the same.

use crate::error::{Error, Result};
use std::path::Path;

/// Section that receives keys appearing before any `[section]` header
pub const GENERAL_SECTION: &str = "General";

/// Trait for storage backend implementations
pub trait StorageBackend: Clone + Send + Sync {
    /// File extension for this storage format (e.g., "ini")
    fn extension(&self) -> &str;

    /// Render a document to text
    fn serialize(&self, doc: &IniDocument) -> String;

    /// Parse text into a document
    fn deserialize(&self, content: &str) -> Result<IniDocument>;

    /// Read and parse a file
    fn read(&self, path: &Path) -> Result<IniDocument> {
        let content = crate::error::read_file(path)?;
        self.deserialize(&content)
    }

    /// Render and write to file
    ///
    /// Uses atomic write: writes to temp file then renames to prevent corruption.
    fn write(&self, path: &Path, doc: &IniDocument) -> Result<()> {
        let content = self.serialize(doc);

        crate::error::create_parent_dir(path)?;

        // Atomic write: temp file + rename
        let file_name = path.file_name().ok_or_else(|| {
            Error::Config(format!(
                "Invalid path '{}': must have a filename",
                path.display()
            ))
        })?;
        let mut temp_filename = file_name.to_os_string();
        temp_filename.push(".tmp");
        let temp_path = path.with_file_name(temp_filename);

        crate::error::write_file(&temp_path, &content)?;

        std::fs::rename(&temp_path, path).map_err(|e| Error::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

// =============================================================================
// Document Model
// =============================================================================

/// One `[name]` block with its keys in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniSection {
    pub name: String,
    pub entries: Vec<(String, String)>,
}

impl IniSection {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Value stored under `key`, if any
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn set(&mut self, key: &str, value: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => value.clone_into(v),
            None => self.entries.push((key.to_string(), value.to_string())),
        }
    }
}

/// Ordered in-memory INI document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: Vec<IniSection>,
}

impl IniDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section).and_then(|s| s.get(key))
    }

    /// Upsert a value; new sections are appended at the end
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        self.section_mut(section).set(key, value);
    }

    /// Remove a key; returns whether it was present
    pub fn remove(&mut self, section: &str, key: &str) -> bool {
        let Some(s) = self.sections.iter_mut().find(|s| s.name == section) else {
            return false;
        };
        let before = s.entries.len();
        s.entries.retain(|(k, _)| k != key);
        before != s.entries.len()
    }

    pub fn section(&self, name: &str) -> Option<&IniSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Drop every key of a section but keep its place in the file
    pub fn clear_section(&mut self, name: &str) {
        if let Some(s) = self.sections.iter_mut().find(|s| s.name == name) {
            s.entries.clear();
        }
    }

    /// Remove the sections `drop` selects; returns how many went
    pub fn remove_sections(&mut self, mut drop: impl FnMut(&str) -> bool) -> usize {
        let before = self.sections.len();
        self.sections.retain(|s| !drop(&s.name));
        before - self.sections.len()
    }

    pub fn sections(&self) -> impl Iterator<Item = &IniSection> {
        self.sections.iter()
    }

    fn section_mut(&mut self, name: &str) -> &mut IniSection {
        let idx = match self.sections.iter().position(|s| s.name == name) {
            Some(idx) => idx,
            None => {
                self.sections.push(IniSection::new(name));
                self.sections.len() - 1
            }
        };
        &mut self.sections[idx]
    }
}

// =============================================================================
// INI Storage Implementation
// =============================================================================

/// INI storage backend (default)
#[derive(Debug, Clone, Default)]
pub struct IniStorage;

impl IniStorage {
    pub fn new() -> Self {
        Self
    }
}

fn needs_quotes(value: &str) -> bool {
    value.starts_with('"') || value.trim() != value
}

fn unquote(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

impl StorageBackend for IniStorage {
    fn extension(&self) -> &str {
        "ini"
    }

    fn serialize(&self, doc: &IniDocument) -> String {
        let mut out = String::new();
        for (i, section) in doc.sections.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push('[');
            out.push_str(&section.name);
            out.push_str("]\n");
            for (key, value) in &section.entries {
                out.push_str(key);
                out.push('=');
                if needs_quotes(value) {
                    out.push('"');
                    out.push_str(value);
                    out.push('"');
                } else {
                    out.push_str(value);
                }
                out.push('\n');
            }
        }
        out
    }

    fn deserialize(&self, content: &str) -> Result<IniDocument> {
        let mut doc = IniDocument::new();
        let mut current = GENERAL_SECTION.to_string();

        for (lineno, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }

            if let Some(rest) = line.strip_prefix('[') {
                let name = rest.strip_suffix(']').ok_or_else(|| {
                    Error::BadFormat(format!("line {}: unterminated section header", lineno + 1))
                })?;
                let name = name.trim();
                if name.is_empty() {
                    return Err(Error::BadFormat(format!(
                        "line {}: empty section name",
                        lineno + 1
                    )));
                }
                current = name.to_string();
                // Keep empty sections so they survive a round trip
                doc.section_mut(&current);
                continue;
            }

            match line.split_once('=') {
                Some((key, value)) => {
                    let key = key.trim();
                    if key.is_empty() {
                        log::warn!("line {}: key missing before '=', skipped", lineno + 1);
                        continue;
                    }
                    doc.set(&current, key, unquote(value.trim()));
                }
                None => log::warn!("line {}: no '=' in '{line}', skipped", lineno + 1),
            }
        }

        Ok(doc)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = "[core]\nuuid=abc=\napp_mode=init\n\n[eth0]\nIPv4.method=dhcp\nNameservers=8.8.8.8;8.8.4.4;\n";

    #[test]
    fn test_roundtrip_preserves_order_and_bytes() {
        let storage = IniStorage::new();
        let doc = storage.deserialize(SAMPLE).unwrap();

        assert_eq!(doc.get("core", "uuid"), Some("abc="));
        assert_eq!(doc.get("eth0", "Nameservers"), Some("8.8.8.8;8.8.4.4;"));
        assert_eq!(storage.serialize(&doc), SAMPLE);
    }

    #[test]
    fn test_comments_and_general_section() {
        let storage = IniStorage::new();
        let doc = storage
            .deserialize("; header\nloose=1\n# note\n[ui]\ntheme = dark \n")
            .unwrap();

        assert_eq!(doc.get(GENERAL_SECTION, "loose"), Some("1"));
        assert_eq!(doc.get("ui", "theme"), Some("dark"));
    }

    #[test]
    fn test_quoted_values_survive() {
        let storage = IniStorage::new();
        let mut doc = IniDocument::new();
        doc.set("startup", "startup_command", " padded ");
        doc.set("startup", "quoted", "\"x\"");

        let parsed = storage.deserialize(&storage.serialize(&doc)).unwrap();
        assert_eq!(parsed.get("startup", "startup_command"), Some(" padded "));
        assert_eq!(parsed.get("startup", "quoted"), Some("\"x\""));
    }

    #[test]
    fn test_unterminated_header_is_bad_format() {
        let err = IniStorage::new().deserialize("[core\nuuid=1\n").unwrap_err();
        assert!(matches!(err, Error::BadFormat(_)));
    }

    #[test]
    fn test_set_and_remove() {
        let mut doc = IniDocument::new();
        doc.set("vnc", "vnc_server_port", "5900");
        doc.set("vnc", "vnc_server_port", "5901");

        assert_eq!(doc.get("vnc", "vnc_server_port"), Some("5901"));
        assert_eq!(doc.section("vnc").unwrap().entries.len(), 1);
        assert!(doc.remove("vnc", "vnc_server_port"));
        assert!(!doc.remove("vnc", "vnc_server_port"));
        assert_eq!(doc.get("vnc", "vnc_server_port"), None);
    }

    #[test]
    fn test_atomic_write_creates_parent_and_no_temp_left() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings").join("settings_config.ini");
        let storage = IniStorage::new();

        let mut doc = IniDocument::new();
        doc.set("ui", "theme", "light");
        storage.write(&path, &doc).unwrap();

        assert_eq!(storage.read(&path).unwrap(), doc);
        assert!(!path.with_file_name("settings_config.ini.tmp").exists());
        assert_eq!(storage.extension(), "ini");
    }
}
