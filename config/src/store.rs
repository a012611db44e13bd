//! Section storage.
//!
//! Sections are kept in the order their header was first seen. Fields inside a
//! section are unordered and the last assignment of a key wins.

use crate::LookupError;
use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::{debug, trace, warn};

/// Position of a section inside its [`SectionStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SectionId(usize);

/// A named group of key/value pairs, the `[header]` block of an INI file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    fields: HashMap<String, String>,
}

impl Section {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: HashMap::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Assign `key`, replacing any earlier value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        trace!(section = %self.name, key = %key, value = %value, "Set field");
        if let Some(previous) = self.fields.insert(key.clone(), value) {
            warn!(section = %self.name, key = %key, previous = %previous, "Duplicate key overwritten");
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionStore {
    sections: IndexMap<String, Section>,
}

impl SectionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the section named `name`, registering it first if unseen.
    pub fn get_or_create(&mut self, name: &str) -> SectionId {
        if let Some(index) = self.sections.get_index_of(name) {
            return SectionId(index);
        }
        let (index, _) = self
            .sections
            .insert_full(name.to_string(), Section::new(name));
        debug!(section = %name, "Registered section");
        SectionId(index)
    }

    /// # Panics
    ///
    /// If `id` was not issued by this store's [`get_or_create`](Self::get_or_create).
    pub fn section_mut(&mut self, id: SectionId) -> &mut Section {
        &mut self.sections[id.0]
    }

    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// Section names in the order their headers were first seen.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    /// Exact-match lookup of `key` under `section`.
    pub fn lookup(&self, section: &str, key: &str) -> Result<&str, LookupError> {
        let found = self
            .section(section)
            .ok_or_else(|| LookupError::no_such_section(section))?;
        found
            .get(key)
            .ok_or_else(|| LookupError::no_such_key(section, key))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_or_create_is_idempotent() {
        let mut store = SectionStore::new();
        let first = store.get_or_create("server");
        let second = store.get_or_create("server");
        assert_eq!(first, second);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn names_keep_first_seen_order() {
        let mut store = SectionStore::new();
        store.get_or_create("b");
        store.get_or_create("a");
        store.get_or_create("b");
        let names: Vec<_> = store.section_names().collect();
        assert_eq!(names, ["b", "a"]);
    }

    #[test]
    fn last_assignment_wins() {
        let mut section = Section::new("s");
        section.set("a", "1");
        section.set("a", "2");
        assert_eq!(section.get("a"), Some("2"));
        assert_eq!(section.len(), 1);
    }

    #[test]
    fn iter_yields_current_pairs() {
        let mut section = Section::new("s");
        section.set("a", "1");
        section.set("b", "2");
        section.set("a", "3");

        let mut pairs: Vec<_> = section.iter().collect();
        pairs.sort_unstable();
        assert_eq!(pairs, [("a", "3"), ("b", "2")]);
        assert!(section.contains_key("b"));
        assert!(!section.contains_key("c"));
        assert!(!section.is_empty());
    }

    #[test]
    fn section_mut_reaches_created_section() {
        let mut store = SectionStore::new();
        let first = store.get_or_create("first");
        let second = store.get_or_create("second");
        store.section_mut(second).set("k", "v");

        assert_eq!(store.section_mut(first).name(), "first");
        assert!(store.section("first").unwrap().is_empty());
        assert_eq!(store.lookup("second", "k"), Ok("v"));
    }

    #[test]
    fn lookup_distinguishes_missing_section_and_key() {
        let mut store = SectionStore::new();
        let id = store.get_or_create("s");
        store.section_mut(id).set("k", "v");

        assert_eq!(store.lookup("s", "k"), Ok("v"));
        assert_eq!(
            store.lookup("missing", "k"),
            Err(LookupError::no_such_section("missing"))
        );
        assert_eq!(
            store.lookup("s", "missing"),
            Err(LookupError::no_such_key("s", "missing"))
        );
    }

    #[test]
    fn lookup_is_exact_match() {
        let mut store = SectionStore::new();
        let id = store.get_or_create("Server");
        store.section_mut(id).set("Port", "1");

        assert!(store.lookup("server", "Port").unwrap_err().is_no_such_section());
        assert!(store.lookup("Server", "port").unwrap_err().is_no_such_key());
    }
}
