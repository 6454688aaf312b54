//! The link phase: namespace assignment and the global type table.
//!
//! Runs once, after every file has been wrapped and before any code is
//! emitted. The result is read-only for the rest of the run.

use crate::descriptor::{FileId, FileSet, Object};
use crate::error::{Error, Result};
use crate::naming::base_name;
use crate::registry::NamespaceRegistry;
use crate::resolver::{Resolver, TypeTable};

#[derive(Debug)]
pub struct Link {
    /// Namespace shared by every file being generated.
    namespace: String,
    /// Namespace of each input file, indexed by `FileId`.
    namespaces: Vec<String>,
    registry: NamespaceRegistry,
    types: TypeTable,
}

impl Link {
    /// Assign a namespace to every input file, then build the type table.
    ///
    /// The files to generate must all declare the same package; it becomes
    /// their shared namespace. Every other file registers its own package,
    /// or its base name when it has none.
    pub fn build(files: &FileSet<'_>) -> Result<Self> {
        let generated = files.to_generate();
        let first = files.file(generated[0]);
        let package = first.package();
        if package.is_empty() {
            return Err(Error::MissingPackage {
                file: first.name().to_string(),
            });
        }
        for &id in generated {
            let file = files.file(id);
            if file.package().is_empty() {
                return Err(Error::MissingPackage {
                    file: file.name().to_string(),
                });
            }
            if file.package() != package {
                return Err(Error::InconsistentPackages {
                    found: file.package().to_string(),
                    expected: package.to_string(),
                });
            }
        }

        let mut registry = NamespaceRegistry::new();
        let namespace = registry.register(package, Some(generated[0]));

        let mut namespaces = Vec::new();
        for (id, file) in files.files() {
            let assigned = if files.is_generated(id) {
                registry.assign(id, &namespace);
                namespace.clone()
            } else {
                let candidate = match file.package() {
                    "" => base_name(file.name()),
                    pkg => pkg,
                };
                registry.register(candidate, Some(id))
            };
            namespaces.push(assigned);
        }

        let types = TypeTable::build(files);
        tracing::debug!(namespace = %namespace, types = types.len(), "linked");
        Ok(Link {
            namespace,
            namespaces,
            registry,
            types,
        })
    }

    /// The namespace of the files being generated.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn namespace_of(&self, file: FileId) -> &str {
        &self.namespaces[file.0]
    }

    /// Namespace under which `obj` is referenced. A proxy is referenced
    /// through the file that re-exports it.
    pub fn object_namespace(&self, files: &FileSet<'_>, obj: Object) -> &str {
        self.namespace_of(files.file_of(obj))
    }

    pub fn registry(&self) -> &NamespaceRegistry {
        &self.registry
    }

    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    pub fn resolver<'s, 'a>(&'s self, files: &'s FileSet<'a>, current: FileId) -> Resolver<'s, 'a> {
        Resolver::new(files, &self.types, current)
    }
}
