//! In-memory graph over the raw schema descriptors.
//!
//! Every message, enum and publicly imported type of every input file is
//! wrapped in a node stored in one arena ([`FileSet`]). Nodes refer to their
//! parent, children and owning file by index, so the graph can be walked in
//! either direction without reference cycles.
//!
//! Per file, messages are listed in pre-order (each top-level message
//! followed by its nested messages), and enums are listed top-level first,
//! then nested enums in the order of their containing messages. Generation
//! relies on this order being the declaration order.

use std::collections::HashMap;

use prost_types::field_descriptor_proto::Type;
use prost_types::{DescriptorProto, EnumDescriptorProto, FileDescriptorProto};

use crate::comments::{self, CommentIndex};
use crate::error::{Error, Result};
use crate::naming::{camel_case, camel_case_slice, dotted_slice};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnumId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProxyId(pub usize);

/// A definition that can be referred to by qualified name.
///
/// `Imported` is a type made visible in a file through a public import; it
/// is referenced from that file's namespace but never defined there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Object {
    Message(MessageId),
    Enum(EnumId),
    Imported(ProxyId),
}

/// One input schema file.
#[derive(Debug)]
pub struct FileNode<'a> {
    pub proto: &'a FileDescriptorProto,
    /// All messages of the file, nested ones included, in pre-order.
    pub messages: Vec<MessageId>,
    /// All enums of the file, nested ones included.
    pub enums: Vec<EnumId>,
    /// Types re-exported by this file's public imports.
    pub imported: Vec<ProxyId>,
    /// Direct dependencies, in declaration order.
    pub dependencies: Vec<FileId>,
    pub comments: CommentIndex,
    /// Position among the files to generate, if this file is generated.
    pub index: Option<usize>,
    pub proto3: bool,
}

impl FileNode<'_> {
    pub fn name(&self) -> &str {
        self.proto.name()
    }

    pub fn package(&self) -> &str {
        self.proto.package()
    }
}

#[derive(Debug)]
pub struct MessageNode<'a> {
    pub proto: &'a DescriptorProto,
    pub file: FileId,
    pub parent: Option<MessageId>,
    pub nested: Vec<MessageId>,
    pub enums: Vec<EnumId>,
    /// Dotted-name path without the package, e.g. `["Outer", "Inner"]`.
    pub type_name: Vec<String>,
    /// Index within the containing file or message.
    pub index: usize,
    pub path: String,
    /// Legacy proto2 group; groups are not supported by the generator.
    pub group: bool,
}

impl MessageNode<'_> {
    pub fn name(&self) -> &str {
        self.proto.name()
    }

    pub fn camel_name(&self) -> String {
        camel_case_slice(&self.type_name)
    }

    pub fn is_map_entry(&self) -> bool {
        self.proto
            .options
            .as_ref()
            .is_some_and(|options| options.map_entry())
    }
}

#[derive(Debug)]
pub struct EnumNode<'a> {
    pub proto: &'a EnumDescriptorProto,
    pub file: FileId,
    pub parent: Option<MessageId>,
    pub type_name: Vec<String>,
    pub index: usize,
    pub path: String,
}

impl EnumNode<'_> {
    pub fn name(&self) -> &str {
        self.proto.name()
    }

    pub fn camel_name(&self) -> String {
        camel_case_slice(&self.type_name)
    }

    /// Prefix of the generated constant names.
    ///
    /// Values are namespaced by the container, not by the enum itself: the
    /// values of `Foo.Bar` are `Foo_VALUE`, not `Foo_Bar_VALUE`.
    pub fn prefix(&self) -> String {
        match self.parent {
            None => format!("{}_", camel_case(self.name())),
            Some(_) => {
                let container = &self.type_name[..self.type_name.len() - 1];
                format!("{}_", camel_case_slice(container))
            }
        }
    }
}

/// A type publicly imported into `file`.
#[derive(Debug)]
pub struct ProxyNode {
    pub file: FileId,
    /// The real definition; never itself an `Object::Imported`.
    pub target: Object,
}

/// Arena of every file, message, enum and proxy in one request.
#[derive(Debug)]
pub struct FileSet<'a> {
    files: Vec<FileNode<'a>>,
    messages: Vec<MessageNode<'a>>,
    enums: Vec<EnumNode<'a>>,
    proxies: Vec<ProxyNode>,
    by_name: HashMap<&'a str, FileId>,
    to_generate: Vec<FileId>,
}

impl<'a> FileSet<'a> {
    /// Wrap every input file and resolve the list of files to generate.
    pub fn wrap(files: &'a [FileDescriptorProto], to_generate: &[String]) -> Result<Self> {
        let mut set = FileSet {
            files: Vec::with_capacity(files.len()),
            messages: Vec::new(),
            enums: Vec::new(),
            proxies: Vec::new(),
            by_name: HashMap::with_capacity(files.len()),
            to_generate: Vec::with_capacity(to_generate.len()),
        };

        for proto in files {
            set.wrap_file(proto)?;
        }
        for id in 0..set.files.len() {
            set.link_dependencies(FileId(id))?;
        }

        if to_generate.is_empty() {
            return Err(Error::NoFilesToGenerate);
        }
        for (index, name) in to_generate.iter().enumerate() {
            let id = set
                .file_by_name(name)
                .ok_or_else(|| Error::FileNotFound { name: name.clone() })?;
            set.files[id.0].index = Some(index);
            set.to_generate.push(id);
        }

        tracing::debug!(
            files = set.files.len(),
            messages = set.messages.len(),
            enums = set.enums.len(),
            proxies = set.proxies.len(),
            "wrapped descriptors"
        );
        Ok(set)
    }

    fn wrap_file(&mut self, proto: &'a FileDescriptorProto) -> Result<()> {
        let file = FileId(self.files.len());

        let first_message = self.messages.len();
        for (i, desc) in proto.message_type.iter().enumerate() {
            self.wrap_message(proto, desc, None, file, i);
        }
        let messages: Vec<MessageId> = (first_message..self.messages.len()).map(MessageId).collect();
        self.link_nested_messages(&messages)?;

        let first_enum = self.enums.len();
        for (i, desc) in proto.enum_type.iter().enumerate() {
            self.push_enum(desc, None, file, i);
        }
        for &msg in &messages {
            let proto = self.messages[msg.0].proto;
            for (i, desc) in proto.enum_type.iter().enumerate() {
                self.push_enum(desc, Some(msg), file, i);
            }
        }
        let enums: Vec<EnumId> = (first_enum..self.enums.len()).map(EnumId).collect();
        self.link_nested_enums(&messages, &enums)?;

        self.files.push(FileNode {
            proto,
            messages,
            enums,
            imported: Vec::new(),
            dependencies: Vec::new(),
            comments: CommentIndex::build(proto.source_code_info.as_ref()),
            index: None,
            proto3: proto.syntax() == "proto3",
        });
        self.by_name.insert(proto.name(), file);
        Ok(())
    }

    /// Wrap `desc` and, recursively, its nested messages in pre-order.
    fn wrap_message(
        &mut self,
        file_proto: &FileDescriptorProto,
        desc: &'a DescriptorProto,
        parent: Option<MessageId>,
        file: FileId,
        index: usize,
    ) {
        let (path, mut type_name) = match parent {
            None => (comments::root_path(comments::FILE_MESSAGE, index), Vec::new()),
            Some(p) => {
                let p = &self.messages[p.0];
                (
                    comments::child_path(&p.path, comments::MESSAGE_NESTED, index),
                    p.type_name.clone(),
                )
            }
        };
        type_name.push(desc.name().to_string());

        // A group is only distinguishable from a message by a GROUP field
        // in the parent naming it.
        let group = parent.is_some_and(|p| {
            let expected = qualified_name(file_proto.package(), &type_name);
            self.messages[p.0].proto.field.iter().any(|f| {
                f.r#type == Some(Type::Group as i32) && f.type_name() == expected
            })
        });

        let id = MessageId(self.messages.len());
        self.messages.push(MessageNode {
            proto: desc,
            file,
            parent,
            nested: Vec::new(),
            enums: Vec::new(),
            type_name,
            index,
            path,
            group,
        });
        for (i, nested) in desc.nested_type.iter().enumerate() {
            self.wrap_message(file_proto, nested, Some(id), file, i);
        }
    }

    fn push_enum(
        &mut self,
        desc: &'a EnumDescriptorProto,
        parent: Option<MessageId>,
        file: FileId,
        index: usize,
    ) {
        let (path, mut type_name) = match parent {
            None => (comments::root_path(comments::FILE_ENUM, index), Vec::new()),
            Some(p) => {
                let p = &self.messages[p.0];
                (
                    comments::child_path(&p.path, comments::MESSAGE_ENUM, index),
                    p.type_name.clone(),
                )
            }
        };
        type_name.push(desc.name().to_string());
        self.enums.push(EnumNode {
            proto: desc,
            file,
            parent,
            type_name,
            index,
            path,
        });
    }

    fn link_nested_messages(&mut self, messages: &[MessageId]) -> Result<()> {
        for &id in messages {
            let nested: Vec<MessageId> = messages
                .iter()
                .copied()
                .filter(|m| self.messages[m.0].parent == Some(id))
                .collect();
            let node = &mut self.messages[id.0];
            if nested.len() != node.proto.nested_type.len() {
                return Err(Error::NestingFailure {
                    message: node.name().to_string(),
                });
            }
            node.nested = nested;
        }
        Ok(())
    }

    fn link_nested_enums(&mut self, messages: &[MessageId], enums: &[EnumId]) -> Result<()> {
        for &id in messages {
            let nested: Vec<EnumId> = enums
                .iter()
                .copied()
                .filter(|e| self.enums[e.0].parent == Some(id))
                .collect();
            let node = &mut self.messages[id.0];
            if nested.len() != node.proto.enum_type.len() {
                return Err(Error::EnumNestingFailure {
                    message: node.name().to_string(),
                });
            }
            node.enums = nested;
        }
        Ok(())
    }

    /// Resolve `file`'s dependency names and wrap its public re-exports.
    ///
    /// Files are visited in input order, which protoc guarantees to be
    /// topological, so a public dependency's own re-exports already exist.
    fn link_dependencies(&mut self, file: FileId) -> Result<()> {
        let proto = self.files[file.0].proto;

        let dependencies = proto
            .dependency
            .iter()
            .map(|name| self.require_file(name))
            .collect::<Result<Vec<_>>>()?;

        let mut targets = Vec::new();
        for &index in &proto.public_dependency {
            let dep = usize::try_from(index)
                .ok()
                .and_then(|i| dependencies.get(i).copied())
                .ok_or_else(|| Error::FileNotFound {
                    name: format!("{}: public dependency #{index}", proto.name()),
                })?;
            let dep = &self.files[dep.0];
            targets.extend(
                dep.messages
                    .iter()
                    .filter(|m| !self.messages[m.0].is_map_entry())
                    .map(|&m| Object::Message(m)),
            );
            targets.extend(dep.enums.iter().map(|&e| Object::Enum(e)));
            targets.extend(dep.imported.iter().map(|p| self.proxies[p.0].target));
        }

        let first = self.proxies.len();
        self.proxies
            .extend(targets.into_iter().map(|target| ProxyNode { file, target }));
        let node = &mut self.files[file.0];
        node.imported = (first..self.proxies.len()).map(ProxyId).collect();
        node.dependencies = dependencies;
        Ok(())
    }

    fn require_file(&self, name: &str) -> Result<FileId> {
        self.file_by_name(name).ok_or_else(|| Error::FileNotFound {
            name: name.to_string(),
        })
    }

    pub fn file_by_name(&self, name: &str) -> Option<FileId> {
        self.by_name.get(name).copied()
    }

    pub fn files(&self) -> impl Iterator<Item = (FileId, &FileNode<'a>)> {
        self.files.iter().enumerate().map(|(i, f)| (FileId(i), f))
    }

    /// Files to generate, in request order.
    pub fn to_generate(&self) -> &[FileId] {
        &self.to_generate
    }

    pub fn is_generated(&self, file: FileId) -> bool {
        self.files[file.0].index.is_some()
    }

    pub fn file(&self, id: FileId) -> &FileNode<'a> {
        &self.files[id.0]
    }

    pub fn message(&self, id: MessageId) -> &MessageNode<'a> {
        &self.messages[id.0]
    }

    pub fn enumeration(&self, id: EnumId) -> &EnumNode<'a> {
        &self.enums[id.0]
    }

    pub fn proxy(&self, id: ProxyId) -> &ProxyNode {
        &self.proxies[id.0]
    }

    /// The definition behind `obj`, looking through public-import proxies.
    pub fn target(&self, obj: Object) -> Object {
        match obj {
            Object::Imported(p) => self.proxies[p.0].target,
            other => other,
        }
    }

    /// The file `obj` belongs to. For a proxy this is the importing file.
    pub fn file_of(&self, obj: Object) -> FileId {
        match obj {
            Object::Message(m) => self.messages[m.0].file,
            Object::Enum(e) => self.enums[e.0].file,
            Object::Imported(p) => self.proxies[p.0].file,
        }
    }

    /// Dotted-name path of `obj` without the package.
    pub fn type_name(&self, obj: Object) -> &[String] {
        match self.target(obj) {
            Object::Message(m) => &self.messages[m.0].type_name,
            Object::Enum(e) => &self.enums[e.0].type_name,
            Object::Imported(_) => unreachable!("proxies always wrap a real definition"),
        }
    }

    /// Fully qualified name as written in the raw schema, e.g. `.pkg.Outer.Inner`.
    pub fn qualified_name(&self, obj: Object) -> String {
        let definer = self.file_of(self.target(obj));
        qualified_name(self.files[definer.0].package(), self.type_name(obj))
    }
}

/// `.pkg.A.B`, or `.A.B` when the package is empty.
pub fn qualified_name(package: &str, type_name: &[String]) -> String {
    let mut name = String::from(".");
    if !package.is_empty() {
        name.push_str(package);
        name.push('.');
    }
    name.push_str(&dotted_slice(type_name));
    name
}
