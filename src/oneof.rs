//! Oneof group bookkeeping for one message.
//!
//! A oneof becomes a union typedef over one wrapper type per member, plus a
//! discriminator getter. The member list is only complete once every field
//! of the message has been walked, so the typedef is emitted with a slot
//! that is filled from [`OneofGroup::members`] afterwards.

use prost_types::FieldDescriptorProto;

use crate::emitter::SlotId;
use crate::type_map::JsType;

/// A member field of a oneof group.
#[derive(Debug)]
pub struct Member<'a> {
    pub field: &'a FieldDescriptorProto,
    /// Wrapper type name without namespace, e.g. `Msg_Name`.
    pub wrapper: String,
    pub ty: JsType,
    /// Structural path of the field, for comment lookup.
    pub path: String,
}

#[derive(Debug)]
pub struct OneofGroup<'a> {
    /// Index into the message's `oneof_decl`.
    pub index: i32,
    /// Allocated union name, e.g. `Kind`.
    pub union: String,
    /// Allocated discriminator getter, e.g. `getKind`.
    pub getter: String,
    /// Where the typedef's member list goes.
    pub slot: SlotId,
    pub members: Vec<Member<'a>>,
}

/// All oneof groups of one message, in order of first member.
#[derive(Debug, Default)]
pub struct Oneofs<'a> {
    groups: Vec<OneofGroup<'a>>,
}

impl<'a> Oneofs<'a> {
    pub fn contains(&self, index: i32) -> bool {
        self.groups.iter().any(|g| g.index == index)
    }

    pub fn start(&mut self, index: i32, union: String, getter: String, slot: SlotId) {
        self.groups.push(OneofGroup {
            index,
            union,
            getter,
            slot,
            members: Vec::new(),
        });
    }

    /// Record `member` under the group started for `index`.
    ///
    /// Returns the member back when no such group was started.
    pub fn push(&mut self, index: i32, member: Member<'a>) -> Result<(), Member<'a>> {
        match self.groups.iter_mut().find(|g| g.index == index) {
            Some(group) => {
                group.members.push(member);
                Ok(())
            }
            None => Err(member),
        }
    }

    /// Every wrapper name assigned so far.
    pub fn wrappers(&self) -> impl Iterator<Item = &str> + Clone {
        self.groups
            .iter()
            .flat_map(|g| g.members.iter().map(|m| m.wrapper.as_str()))
    }

    pub fn groups(&self) -> &[OneofGroup<'a>] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// A proto3 `optional` field lives in a synthetic oneof of its own; it is
/// generated as an ordinary field.
pub fn is_synthetic(field: &FieldDescriptorProto) -> bool {
    field.proto3_optional()
}

/// The real oneof `field` belongs to, if any.
pub fn oneof_index(field: &FieldDescriptorProto) -> Option<i32> {
    field.oneof_index.filter(|_| !is_synthetic(field))
}

/// Wrapper type name for a member: `<Message>_<Field>`, with `_` appended
/// while it clashes with one of `taken` (nested type names, earlier wrappers).
pub fn wrapper_name<'t>(
    message: &str,
    field: &str,
    taken: impl Iterator<Item = &'t str> + Clone,
) -> String {
    let mut name = format!("{message}_{field}");
    while taken.clone().any(|t| t == name) {
        name.push('_');
    }
    name
}
