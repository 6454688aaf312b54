//! Collision-free identifier allocation within one generated message.

use std::collections::HashSet;

/// Appended to every name of a group when any of them collides.
const COLLISION_MARKER: char = '_';

/// Identifiers already taken in one message's scope.
///
/// Names that belong together (a field, its getter and its setter) are
/// allocated as a group, so a collision on any of them shifts all of them
/// and they stay consistent. Allocation depends on call order: reordering
/// fields in the schema can change the generated names.
#[derive(Debug, Default, Clone)]
pub struct NameAllocator {
    used: HashSet<String>,
}

impl NameAllocator {
    /// An allocator with `reserved` names already taken.
    pub fn with_reserved<I, S>(reserved: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        NameAllocator {
            used: reserved.into_iter().map(Into::into).collect(),
        }
    }

    /// Find a conflict-free variant of `names`, mark it used and return it.
    pub fn alloc<const N: usize>(&mut self, mut names: [String; N]) -> [String; N] {
        while names.iter().any(|n| self.used.contains(n)) {
            for n in &mut names {
                n.push(COLLISION_MARKER);
            }
        }
        self.used.extend(names.iter().cloned());
        names
    }

    /// Allocate `Base`, `getBase` and `setBase` together.
    pub fn alloc_accessors(&mut self, base: &str) -> [String; 3] {
        self.alloc([base.to_string(), format!("get{base}"), format!("set{base}")])
    }

    pub fn is_used(&self, name: &str) -> bool {
        self.used.contains(name)
    }
}
