//! Unique namespace identifiers for schema files.
//!
//! Every input file gets a namespace under which its types are referenced in
//! generated code. Candidates are derived from the declared package and made
//! identifier-safe; duplicates get a numeric suffix, so the first claimant
//! keeps the bare name.

use std::collections::{HashMap, HashSet};

use crate::descriptor::FileId;
use crate::naming::sanitize_identifier;

/// Namespaces reserved before any schema file registers.
const BUILTIN_NAMESPACES: &[&str] = &["goog"];

#[derive(Debug, Clone)]
pub struct NamespaceRegistry {
    in_use: HashSet<String>,
    by_file: HashMap<FileId, String>,
}

impl Default for NamespaceRegistry {
    fn default() -> Self {
        let mut registry = NamespaceRegistry {
            in_use: HashSet::new(),
            by_file: HashMap::new(),
        };
        for builtin in BUILTIN_NAMESPACES {
            registry.register(builtin, None);
        }
        registry
    }
}

impl NamespaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a unique namespace derived from `candidate` and return it.
    ///
    /// `owner` is `None` for builtin namespaces that belong to no file.
    pub fn register(&mut self, candidate: &str, owner: Option<FileId>) -> String {
        let base = sanitize_identifier(candidate);
        let mut name = base.clone();
        let mut suffix = 1;
        while self.in_use.contains(&name) {
            name = format!("{base}{suffix}");
            suffix += 1;
        }
        self.in_use.insert(name.clone());
        if let Some(file) = owner {
            self.by_file.insert(file, name.clone());
        }
        name
    }

    /// Record `name` (already registered) as the namespace of `file`.
    pub fn assign(&mut self, file: FileId, name: &str) {
        self.by_file.insert(file, name.to_string());
    }

    pub fn namespace_of(&self, file: FileId) -> Option<&str> {
        self.by_file.get(&file).map(String::as_str)
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.in_use.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_are_normalized() {
        let mut registry = NamespaceRegistry::new();
        assert_eq!(registry.register("foo.bar-v2", Some(FileId(0))), "foo_bar_v2");
        assert_eq!(registry.namespace_of(FileId(0)), Some("foo_bar_v2"));
    }

    #[test]
    fn duplicates_get_increasing_suffixes() {
        let mut registry = NamespaceRegistry::new();
        assert_eq!(registry.register("pkg", Some(FileId(0))), "pkg");
        assert_eq!(registry.register("pkg", Some(FileId(1))), "pkg1");
        assert_eq!(registry.register("pkg", Some(FileId(2))), "pkg2");
        // Suffixes apply to the normalized candidate, not to the last winner.
        assert_eq!(registry.register("pkg1", Some(FileId(3))), "pkg11");
    }

    #[test]
    fn different_spellings_can_collide_after_normalization() {
        let mut registry = NamespaceRegistry::new();
        assert_eq!(registry.register("a.b", Some(FileId(0))), "a_b");
        assert_eq!(registry.register("a_b", Some(FileId(1))), "a_b1");
    }

    #[test]
    fn builtins_are_reserved() {
        let mut registry = NamespaceRegistry::new();
        assert!(registry.is_registered("goog"));
        assert_eq!(registry.register("goog", Some(FileId(0))), "goog1");
    }

    #[test]
    fn unregistered_file_has_no_namespace() {
        let registry = NamespaceRegistry::new();
        assert_eq!(registry.namespace_of(FileId(7)), None);
    }
}
