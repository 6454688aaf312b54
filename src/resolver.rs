//! Cross-file resolution of qualified type names.

use std::collections::HashMap;

use crate::descriptor::{FileId, FileSet, Object, qualified_name};
use crate::error::{Error, Result};

/// Global map from qualified name (`.pkg.Outer.Inner`) to its definition,
/// covering every input file, not only the ones being generated.
#[derive(Debug, Default)]
pub struct TypeTable {
    by_name: HashMap<String, Object>,
}

impl TypeTable {
    pub fn build(files: &FileSet<'_>) -> Self {
        let mut by_name = HashMap::new();
        for (_, file) in files.files() {
            for &e in &file.enums {
                let node = files.enumeration(e);
                by_name.insert(qualified_name(file.package(), &node.type_name), Object::Enum(e));
            }
            for &m in &file.messages {
                let node = files.message(m);
                by_name.insert(
                    qualified_name(file.package(), &node.type_name),
                    Object::Message(m),
                );
            }
        }
        TypeTable { by_name }
    }

    pub fn get(&self, name: &str) -> Option<Object> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Resolves names as seen from one file.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'s, 'a> {
    files: &'s FileSet<'a>,
    types: &'s TypeTable,
    current: FileId,
}

impl<'s, 'a> Resolver<'s, 'a> {
    pub fn new(files: &'s FileSet<'a>, types: &'s TypeTable, current: FileId) -> Self {
        Resolver {
            files,
            types,
            current,
        }
    }

    /// The definition named `type_name` as visible from the current file.
    ///
    /// A type defined neither in the current file nor in one of its direct
    /// dependencies can only be visible through a dependency's public
    /// import, so the dependency's proxy for it is returned instead. When
    /// no such proxy exists a warning is logged and the definition itself
    /// is returned.
    pub fn object_named(&self, type_name: &str) -> Result<Object> {
        let obj = self
            .types
            .get(type_name)
            .ok_or_else(|| Error::UnknownType {
                type_name: type_name.to_string(),
            })?;

        let current = self.files.file(self.current);
        let definer = self.files.file_of(obj);
        if definer == self.current || current.dependencies.contains(&definer) {
            return Ok(obj);
        }

        let proxy = current.dependencies.iter().find_map(|&dep| {
            self.files
                .file(dep)
                .imported
                .iter()
                .copied()
                .find(|&p| self.files.proxy(p).target == obj)
        });
        match proxy {
            Some(p) => Ok(Object::Imported(p)),
            None => {
                tracing::warn!(
                    type_name,
                    file = current.name(),
                    "failed finding publicly imported dependency"
                );
                Ok(obj)
            }
        }
    }
}
