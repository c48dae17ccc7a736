//! Repeating sections stored as `[list] count` plus `[pattern<i>]` blocks
//!
//! The count is authoritative: indices `0..count` are read, anything past it
//! is an orphan from an earlier, longer list and is ignored. Replacing the
//! whole list drops such orphans.

use super::ConfigSchema;
use super::keys::*;
use crate::error::Result;
use crate::store::ConfigStore;
use crate::store::parse_bool;
use log::{debug, warn};
use std::marker::PhantomData;

/// A record type that lives in an indexed section family
///
/// Fields are optional so that a partial record only touches the keys it
/// carries when written.
pub trait IndexedRecord: Default + Sized {
    /// Section holding the `count` key
    const LIST_SECTION: &'static str;
    /// Prefix of the per-record section; the index is appended
    const PATTERN: &'static str;

    /// Build a record from the entries of its section
    fn from_entries(entries: &[(String, String)]) -> Self;

    /// Key/value pairs for the fields that are present
    fn to_entries(&self) -> Vec<(&'static str, String)>;
}

fn lookup<'a>(entries: &'a [(String, String)], key: &str) -> Option<&'a str> {
    entries
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn bool_str(value: bool) -> String {
    if value { "true" } else { "false" }.to_string()
}

/// Browser bookmark shown by the kiosk pages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebPage {
    pub page: Option<String>,
    pub is_startup: Option<bool>,
}

impl WebPage {
    pub fn new(page: impl Into<String>, is_startup: bool) -> Self {
        Self {
            page: Some(page.into()),
            is_startup: Some(is_startup),
        }
    }
}

impl IndexedRecord for WebPage {
    const LIST_SECTION: &'static str = SECTION_WEB_PAGES;
    const PATTERN: &'static str = PATTERN_WEB_PAGE;

    fn from_entries(entries: &[(String, String)]) -> Self {
        Self {
            page: lookup(entries, KEY_PAGE).map(str::to_string),
            is_startup: lookup(entries, KEY_IS_STARTUP).map(parse_bool),
        }
    }

    fn to_entries(&self) -> Vec<(&'static str, String)> {
        let mut entries = Vec::new();
        if let Some(page) = &self.page {
            entries.push((KEY_PAGE, page.clone()));
        }
        if let Some(is_startup) = self.is_startup {
            entries.push((KEY_IS_STARTUP, bool_str(is_startup)));
        }
        entries
    }
}

/// Accepted port on the device firewall
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FirewallRule {
    pub protocol: Option<String>,
    pub port: Option<String>,
    pub is_allowed: Option<bool>,
}

impl FirewallRule {
    pub fn new(protocol: impl Into<String>, port: impl Into<String>, is_allowed: bool) -> Self {
        Self {
            protocol: Some(protocol.into()),
            port: Some(port.into()),
            is_allowed: Some(is_allowed),
        }
    }

    pub fn protocol(&self) -> &str {
        self.protocol.as_deref().unwrap_or_default()
    }

    pub fn port(&self) -> &str {
        self.port.as_deref().unwrap_or_default()
    }

    pub fn allowed(&self) -> bool {
        self.is_allowed.unwrap_or(false)
    }
}

impl IndexedRecord for FirewallRule {
    const LIST_SECTION: &'static str = SECTION_FIREWALL_RULES;
    const PATTERN: &'static str = PATTERN_FIREWALL_RULE;

    fn from_entries(entries: &[(String, String)]) -> Self {
        Self {
            protocol: lookup(entries, KEY_PROTOCOL).map(str::to_string),
            port: lookup(entries, KEY_PORT).map(str::to_string),
            is_allowed: lookup(entries, KEY_IS_ALLOWED).map(parse_bool),
        }
    }

    fn to_entries(&self) -> Vec<(&'static str, String)> {
        let mut entries = Vec::new();
        if let Some(protocol) = &self.protocol {
            entries.push((KEY_PROTOCOL, protocol.clone()));
        }
        if let Some(port) = &self.port {
            entries.push((KEY_PORT, port.clone()));
        }
        if let Some(is_allowed) = self.is_allowed {
            entries.push((KEY_IS_ALLOWED, bool_str(is_allowed)));
        }
        entries
    }
}

/// Ordered view over one indexed section family of a schema
pub struct IndexedList<'a, R: IndexedRecord> {
    schema: &'a ConfigSchema,
    _record: PhantomData<R>,
}

impl<'a, R: IndexedRecord> IndexedList<'a, R> {
    pub fn new(schema: &'a ConfigSchema) -> Self {
        Self {
            schema,
            _record: PhantomData,
        }
    }

    fn section_name(index: usize) -> String {
        format!("{}{index}", R::PATTERN)
    }

    fn section_index(name: &str) -> Option<usize> {
        let digits = name.strip_prefix(R::PATTERN)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }

    /// Stored count; negative or unparseable counts read as 0
    pub fn count(&self) -> usize {
        usize::try_from(self.schema.int(R::LIST_SECTION, KEY_COUNT)).unwrap_or(0)
    }

    pub fn set_count(&self, count: usize) -> Result<()> {
        self.schema
            .store()
            .set(R::LIST_SECTION, KEY_COUNT, &count.to_string())
    }

    /// Record at `index`, or `None` past the stored count
    pub fn get(&self, index: usize) -> Option<R> {
        if index >= self.count() {
            return None;
        }
        Some(self.read_at(index))
    }

    fn read_at(&self, index: usize) -> R {
        let section = Self::section_name(index);
        match self.schema.store().section(&section) {
            Ok(entries) => R::from_entries(&entries),
            Err(e) => {
                warn!("[{section}]: {e}");
                R::default()
            }
        }
    }

    /// Write the fields present in `record` at `index`; the count is untouched
    pub fn set(&self, record: &R, index: usize) -> Result<()> {
        let entries = record.to_entries();
        if entries.is_empty() {
            debug!("[{}]: empty partial record, nothing written", Self::section_name(index));
            return Ok(());
        }
        let pairs: Vec<(&str, &str)> = entries.iter().map(|(k, v)| (*k, v.as_str())).collect();
        self.schema.store().set_many(&Self::section_name(index), &pairs)
    }

    /// Every record in `0..count`
    pub fn all(&self) -> Vec<R> {
        (0..self.count()).map(|i| self.read_at(i)).collect()
    }

    /// Rewrite the list in one write: each record replaces its section
    /// wholesale, sections past the new length are dropped, then the count
    pub fn replace(&self, records: &[R]) -> Result<()> {
        let len = records.len();
        self.schema.store().update(|doc| {
            let dropped =
                doc.remove_sections(|name| Self::section_index(name).is_some_and(|i| i >= len));
            for (index, record) in records.iter().enumerate() {
                let section = Self::section_name(index);
                doc.clear_section(&section);
                for (key, value) in record.to_entries() {
                    ConfigStore::validate_entry(&section, key, &value)?;
                    doc.set(&section, key, &value);
                }
            }
            doc.set(R::LIST_SECTION, KEY_COUNT, &len.to_string());
            debug!("[{}]: {len} record(s) written, {dropped} stale dropped", R::LIST_SECTION);
            Ok(())
        })
    }
}

impl ConfigSchema {
    pub fn web_pages(&self) -> IndexedList<'_, WebPage> {
        IndexedList::new(self)
    }

    pub fn firewall_rules(&self) -> IndexedList<'_, FirewallRule> {
        IndexedList::new(self)
    }

    pub fn get_web_pages_count(&self) -> usize {
        self.web_pages().count()
    }

    pub fn set_web_pages_count(&self, count: usize) -> Result<()> {
        self.web_pages().set_count(count)
    }

    pub fn get_web_page_by_index(&self, index: usize) -> Option<WebPage> {
        self.web_pages().get(index)
    }

    pub fn set_web_page_by_index(&self, page: &WebPage, index: usize) -> Result<()> {
        self.web_pages().set(page, index)
    }

    pub fn get_web_pages(&self) -> Vec<WebPage> {
        self.web_pages().all()
    }

    pub fn set_web_pages(&self, pages: &[WebPage]) -> Result<()> {
        self.web_pages().replace(pages)
    }

    pub fn get_firewall_rules_count(&self) -> usize {
        self.firewall_rules().count()
    }

    pub fn set_firewall_rules_count(&self, count: usize) -> Result<()> {
        self.firewall_rules().set_count(count)
    }

    pub fn get_firewall_rule_by_index(&self, index: usize) -> Option<FirewallRule> {
        self.firewall_rules().get(index)
    }

    pub fn set_firewall_rule_by_index(&self, rule: &FirewallRule, index: usize) -> Result<()> {
        self.firewall_rules().set(rule, index)
    }

    pub fn get_firewall_rules(&self) -> Vec<FirewallRule> {
        self.firewall_rules().all()
    }

    pub fn set_firewall_rules(&self, rules: &[FirewallRule]) -> Result<()> {
        self.firewall_rules().replace(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn schema() -> (tempfile::TempDir, ConfigSchema) {
        let dir = tempdir().unwrap();
        let schema = ConfigSchema::open(dir.path().join("settings_config.ini")).unwrap();
        (dir, schema)
    }

    #[test]
    fn test_partial_update_keeps_other_fields() {
        let (_dir, schema) = schema();
        schema
            .set_web_pages(&[WebPage::new("https://a.example", true)])
            .unwrap();

        let partial = WebPage {
            page: Some("https://b.example".into()),
            is_startup: None,
        };
        schema.set_web_page_by_index(&partial, 0).unwrap();

        let page = schema.get_web_page_by_index(0).unwrap();
        assert_eq!(page.page.as_deref(), Some("https://b.example"));
        assert_eq!(page.is_startup, Some(true));
    }

    #[test]
    fn test_shrinking_list_hides_stale_records() {
        let (_dir, schema) = schema();
        let rules = vec![
            FirewallRule::new("tcp", "22", true),
            FirewallRule::new("tcp", "80", true),
            FirewallRule::new("udp", "123", false),
        ];
        schema.set_firewall_rules(&rules).unwrap();
        assert_eq!(schema.get_firewall_rules(), rules);

        schema.set_firewall_rules(&rules[..1]).unwrap();
        assert_eq!(schema.get_firewall_rules_count(), 1);
        assert_eq!(schema.get_firewall_rules(), rules[..1].to_vec());
        assert_eq!(schema.get_firewall_rule_by_index(2), None);
        assert!(schema.store().section("firewall_rule_1").unwrap().is_empty());
        assert!(schema.store().section("firewall_rule_2").unwrap().is_empty());
    }

    #[test]
    fn test_orphan_left_by_count_is_ignored() {
        let (_dir, schema) = schema();
        schema
            .set_web_pages(&[
                WebPage::new("https://a.example", true),
                WebPage::new("https://b.example", false),
            ])
            .unwrap();

        schema.set_web_pages_count(1).unwrap();
        assert_eq!(schema.get_web_pages().len(), 1);
        assert!(schema.store().contains("web_page_1", KEY_PAGE).unwrap());
    }

    #[test]
    fn test_replace_drops_fields_missing_from_new_record() {
        let (_dir, schema) = schema();
        schema
            .set_web_pages(&[WebPage::new("https://a.example", true)])
            .unwrap();

        let bare = WebPage {
            page: Some("https://b.example".into()),
            is_startup: None,
        };
        schema.set_web_pages(std::slice::from_ref(&bare)).unwrap();
        assert_eq!(schema.get_web_pages(), vec![bare]);

        schema
            .set_firewall_rules(&[FirewallRule::new("tcp", "22", true)])
            .unwrap();
        let port_only = FirewallRule {
            port: Some("8080".into()),
            ..Default::default()
        };
        schema.set_firewall_rules(std::slice::from_ref(&port_only)).unwrap();
        assert_eq!(schema.get_firewall_rule_by_index(0), Some(port_only));
    }

    #[test]
    fn test_section_index_matches_only_records() {
        assert_eq!(IndexedList::<WebPage>::section_index("web_page_12"), Some(12));
        assert_eq!(IndexedList::<WebPage>::section_index("web_pages"), None);
        assert_eq!(IndexedList::<WebPage>::section_index("web_page_"), None);
        assert_eq!(IndexedList::<WebPage>::section_index("web_page_+1"), None);
    }

    #[test]
    fn test_bad_count_reads_as_empty() {
        let (_dir, schema) = schema();
        schema.set_string(SECTION_WEB_PAGES, KEY_COUNT, "-3").unwrap();
        assert_eq!(schema.get_web_pages_count(), 0);
        assert!(schema.get_web_pages().is_empty());
    }
}
