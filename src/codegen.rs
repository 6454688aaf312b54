//! Closure-style JavaScript generation from the linked descriptor graph.
//!
//! Each file is generated in two passes. The body pass walks the file's
//! enums, then its messages, in declaration order, collecting the names the
//! file provides and the names it requires from other namespaces. The header
//! pass then writes the banner and the `goog.provide` / `goog.require`
//! blocks in front of the body.
//!
//! Every input file is generated, so every reference in the request is
//! checked, but only the requested files make it into the response.
//!
//! The generated output is deterministic: identical input always produces
//! byte-identical output.

use std::collections::{BTreeSet, HashMap};

use prost_types::FieldDescriptorProto;
use prost_types::compiler::code_generator_response::File;
use prost_types::field_descriptor_proto::Type;

use crate::alloc::NameAllocator;
use crate::comments::{self, CommentIndex};
use crate::config::Options;
use crate::descriptor::{EnumId, FileId, FileNode, FileSet, MessageId, Object};
use crate::emitter::{Literal, Printer, SlotId};
use crate::error::{Error, Result};
use crate::link::Link;
use crate::naming::{camel_case, js_param_name, output_file_name, qualify};
use crate::oneof::{self, Member, OneofGroup, Oneofs};
use crate::type_map::{JsType, TypeMapper};

/// Namespace of the Closure array helpers used by repeated message accessors.
const GOOG_ARRAY: &str = "goog.array";

/// Method every generated message defines; never handed out to a field.
const GET_JSON_DATA: &str = "getJsonData";

/// Drives generation for every file of a linked request.
#[derive(Debug)]
pub struct Generator<'s, 'a> {
    files: &'s FileSet<'a>,
    link: &'s Link,
    options: &'s Options,
}

impl<'s, 'a> Generator<'s, 'a> {
    pub fn new(files: &'s FileSet<'a>, link: &'s Link, options: &'s Options) -> Self {
        Generator {
            files,
            link,
            options,
        }
    }

    /// Generate every input file and return the requested ones, in request order.
    pub fn generate_all(&self) -> Result<Vec<File>> {
        let mut generated = Vec::with_capacity(self.files.to_generate().len());
        for (id, file) in self.files.files() {
            let content = self.generate_file(id)?;
            match file.index {
                Some(index) => {
                    tracing::debug!(file = file.name(), bytes = content.len(), "generated");
                    generated.push((index, output_file_name(file.name()), content));
                }
                None => tracing::trace!(file = file.name(), "checked dependency"),
            }
        }
        generated.sort_by_key(|(index, _, _)| *index);

        Ok(generated
            .into_iter()
            .map(|(_, name, content)| File {
                name: Some(name),
                content: Some(content),
                ..Default::default()
            })
            .collect())
    }

    /// The generated source for one file.
    pub fn generate_file(&self, id: FileId) -> Result<String> {
        let node = self.files.file(id);
        let mut file = FileGen::new(self, id);
        for &e in &node.enums {
            file.emit_enum(e);
        }
        for &m in &node.messages {
            let message = self.files.message(m);
            if message.is_map_entry() || message.group {
                continue;
            }
            file.emit_message(m)?;
        }
        file.emit_aliases();
        Ok(file.finish())
    }
}

/// Per-file generation state.
struct FileGen<'s, 'a> {
    files: &'s FileSet<'a>,
    node: &'s FileNode<'a>,
    mapper: TypeMapper<'s, 'a>,
    prefix: &'s str,
    namespace: &'s str,
    body: Printer,
    fills: HashMap<SlotId, Vec<String>>,
    provides: Vec<String>,
    requires: BTreeSet<String>,
    link: &'s Link,
}

impl<'s, 'a> FileGen<'s, 'a> {
    fn new(generator: &Generator<'s, 'a>, id: FileId) -> Self {
        let Generator {
            files,
            link,
            options,
        } = *generator;
        let prefix = options.pkg_prefix.as_str();
        FileGen {
            files,
            node: files.file(id),
            mapper: TypeMapper::new(files, link, id, prefix),
            prefix,
            namespace: link.namespace_of(id),
            body: Printer::new(),
            fills: HashMap::new(),
            provides: Vec::new(),
            requires: BTreeSet::new(),
            link,
        }
    }

    fn comments(&self) -> &CommentIndex {
        &self.node.comments
    }

    /// Write the leading comment for `path` as JSDoc lines, if there is one.
    fn doc_comment(&mut self, path: &str) {
        let lines: Vec<String> = self
            .comments()
            .lines(path)
            .into_iter()
            .flatten()
            .map(|line| {
                if line.is_empty() {
                    " *".to_string()
                } else {
                    format!(" * {line}")
                }
            })
            .collect();
        for line in lines {
            self.body.line(line);
        }
    }

    /// Record `obj` as needed by this file. Objects in the file's own
    /// namespace are provided alongside it and need no require.
    fn refer(&mut self, obj: Object) {
        if self.link.object_namespace(self.files, obj) != self.namespace {
            self.requires.insert(self.mapper.qualified_name(obj));
        }
    }

    fn emit_enum(&mut self, id: EnumId) {
        let files = self.files;
        let node = files.enumeration(id);
        let name = self.mapper.qualified_name(Object::Enum(id));
        let prefix = node.prefix();

        self.body.line("/**");
        self.doc_comment(&node.path);
        self.body.line(" * @enum {number}");
        self.body.line(" */");
        self.body.line(format!("{name} = {{"));
        self.body.indent();
        let count = node.proto.value.len();
        for (i, value) in node.proto.value.iter().enumerate() {
            let separator = if i + 1 < count { "," } else { "" };
            self.body
                .line(format!("{prefix}{}: {}{separator}", value.name(), value.number()));
        }
        self.body.outdent();
        self.body.line("};");
        self.body.blank();

        self.provides.push(name);
    }

    fn emit_message(&mut self, id: MessageId) -> Result<()> {
        let files = self.files;
        let message = files.message(id);
        let name = self.mapper.qualified_name(Object::Message(id));
        let camel = message.camel_name();
        self.provides.push(name.clone());

        self.body.line("/**");
        self.doc_comment(&message.path);
        self.body.line(" * @param {Object} jsonData The JSON data.");
        self.body.line(" * @constructor");
        self.body.line(" */");
        self.body.line(format!("{name} = function(jsonData) {{"));
        self.body.indent();
        self.body.line("/**");
        self.body.line(" * @private {Object}");
        self.body.line(" */");
        self.body.line("this.jsonData_ = jsonData;");
        self.body.outdent();
        self.body.line("};");
        self.body.blank();

        self.body.line("/**");
        self.body.line(" * @return {Object} The JSON data.");
        self.body.line(" */");
        self.body
            .line(format!("{name}.prototype.{GET_JSON_DATA} = function() {{"));
        self.body.indent();
        self.body.line("return this.jsonData_;");
        self.body.outdent();
        self.body.line("};");
        self.body.blank();

        let nested: Vec<String> = message
            .nested
            .iter()
            .map(|&m| files.message(m).camel_name())
            .chain(message.enums.iter().map(|&e| files.enumeration(e).camel_name()))
            .collect();

        let mut names = NameAllocator::with_reserved([GET_JSON_DATA]);
        let mut oneofs = Oneofs::default();
        for (i, field) in message.proto.field.iter().enumerate() {
            let [base, getter, setter] = names.alloc_accessors(&camel_case(field.name()));
            let ty = self.mapper.js_type(field)?;
            if let Some(obj) = ty.reference {
                self.refer(obj);
            }
            let path = comments::child_path(&message.path, comments::MESSAGE_FIELD, i);

            let Some(index) = oneof::oneof_index(field) else {
                let default = self.mapper.default_value(field, &ty)?;
                let accessor = Accessor {
                    owner: &name,
                    field,
                    ty: &ty,
                    cache: &base,
                    path: &path,
                };
                self.emit_getter(&accessor, &getter, &default);
                self.emit_setter(&accessor, &setter);
                continue;
            };

            if !oneofs.contains(index) {
                let position = usize::try_from(index)
                    .ok()
                    .filter(|&i| i < message.proto.oneof_decl.len())
                    .ok_or_else(|| Error::UnsupportedFieldType {
                        field: field.name().to_string(),
                    })?;
                let union = camel_case(message.proto.oneof_decl[position].name());
                let discriminator = format!("get{union}");
                let [union, discriminator] = names.alloc([union, discriminator]);
                let oneof_path =
                    comments::child_path(&message.path, comments::MESSAGE_ONEOF, position);
                let slot = self.emit_union_typedef(&name, &union, &oneof_path);
                oneofs.start(index, union, discriminator, slot);
            }

            let wrapper = oneof::wrapper_name(
                &camel,
                &base,
                nested.iter().map(String::as_str).chain(oneofs.wrappers()),
            );
            let member = Member {
                field,
                wrapper,
                ty,
                path,
            };
            if oneofs.push(index, member).is_err() {
                return Err(Error::UnsupportedFieldType {
                    field: field.name().to_string(),
                });
            }
        }

        for group in oneofs.groups() {
            let members = group
                .members
                .iter()
                .map(|m| self.wrapper_path(&m.wrapper))
                .collect::<Vec<_>>()
                .join("|");
            self.fills
                .insert(group.slot, vec![format!(" * @typedef {{{members}}}")]);
        }
        for group in oneofs.groups() {
            for member in &group.members {
                self.emit_wrapper(member);
            }
            self.emit_discriminator(&name, group);
        }
        Ok(())
    }

    fn wrapper_path(&self, wrapper: &str) -> String {
        qualify(self.prefix, self.namespace, wrapper)
    }

    fn emit_getter(&mut self, accessor: &Accessor<'_>, getter: &str, default: &Literal) {
        let Accessor {
            owner,
            field,
            ty,
            cache,
            path,
        } = *accessor;
        let key = Literal::Str(field.name().to_string());

        self.body.line("/**");
        self.doc_comment(path);
        self.body.line(format!(" * Wire format: {}.", ty.wire));
        self.body.line(format!(" * @return {{{}}}", ty.display));
        self.body.line(" */");
        self.body
            .line(format!("{owner}.prototype.{getter} = function() {{"));
        self.body.indent();
        if ty.kind == Type::Message && !ty.map {
            self.body.line(format!("if (this.{cache}_) {{"));
            self.body.indent();
            self.body.line(format!("return this.{cache}_;"));
            self.body.outdent();
            self.body.line("}");
            self.body.line(format!("var value = this.jsonData_[{key}];"));
            self.body.line("if (value) {");
            self.body.indent();
            self.body.line(format!("/** @private {{{}}} */", ty.display));
            match &ty.element {
                Some(element) => {
                    self.requires.insert(GOOG_ARRAY.to_string());
                    self.body.line(format!("this.{cache}_ = [];"));
                    self.body
                        .line(format!("{GOOG_ARRAY}.forEach(value, function(__item) {{"));
                    self.body.indent();
                    self.body
                        .line(format!("this.{cache}_.push(new {element}(__item));"));
                    self.body.outdent();
                    self.body.line("}, this);");
                }
                None => {
                    self.body
                        .line(format!("this.{cache}_ = new {}(value);", ty.display));
                }
            }
            self.body.line(format!("return this.{cache}_;"));
            self.body.outdent();
            self.body.line("}");
            self.body.line(format!("return {default};"));
        } else {
            self.body.line(format!("var value = this.jsonData_[{key}];"));
            self.body
                .line(format!("return value != null ? value : {default};"));
        }
        self.body.outdent();
        self.body.line("};");
        self.body.blank();
    }

    fn emit_setter(&mut self, accessor: &Accessor<'_>, setter: &str) {
        let Accessor {
            owner,
            field,
            ty,
            cache,
            path,
        } = *accessor;
        let key = Literal::Str(field.name().to_string());
        let param = js_param_name(field.name());

        self.body.line("/**");
        self.doc_comment(path);
        self.body.line(format!(" * Wire format: {}.", ty.wire));
        self.body.line(format!(
            " * @param {{{}}} {param} The {}.",
            ty.display,
            field.name()
        ));
        self.body.line(" */");
        self.body
            .line(format!("{owner}.prototype.{setter} = function({param}) {{"));
        self.body.indent();
        if ty.kind == Type::Message && !ty.map {
            if ty.element.is_some() {
                self.requires.insert(GOOG_ARRAY.to_string());
                self.body.line(format!("if ({param}) {{"));
                self.body.indent();
                self.body.line("var __data = [];");
                self.body
                    .line(format!("{GOOG_ARRAY}.forEach({param}, function(__item) {{"));
                self.body.indent();
                self.body.line("__data.push(__item.getJsonData());");
                self.body.outdent();
                self.body.line("});");
                self.body.line(format!("this.jsonData_[{key}] = __data;"));
                self.body.outdent();
                self.body.line("} else {");
                self.body.indent();
                self.body.line(format!("this.jsonData_[{key}] = [];"));
                self.body.outdent();
                self.body.line("}");
            } else {
                self.body
                    .line(format!("this.jsonData_[{key}] = {param}.getJsonData();"));
            }
            self.body.line(format!("this.{cache}_ = undefined;"));
        } else {
            self.body.line(format!("this.jsonData_[{key}] = {param};"));
        }
        self.body.outdent();
        self.body.line("};");
        self.body.blank();
    }

    /// Declare the union type of a oneof; its member list is filled in later.
    fn emit_union_typedef(&mut self, owner: &str, union: &str, path: &str) -> SlotId {
        self.body.line("/**");
        self.doc_comment(path);
        let slot = self.body.slot();
        self.body.line(" */");
        self.body.line(format!("{owner}.{union};"));
        self.body.blank();
        slot
    }

    fn emit_wrapper(&mut self, member: &Member<'_>) {
        let name = self.wrapper_path(&member.wrapper);
        let display = &member.ty.display;

        self.body.line("/**");
        self.doc_comment(&member.path);
        self.body.line(format!(" * Wire format: {}.", member.ty.wire));
        self.body.line(format!(
            " * @param {{{display}}} value The {}.",
            member.field.name()
        ));
        self.body.line(" * @constructor");
        self.body.line(" */");
        self.body.line(format!("{name} = function(value) {{"));
        self.body.indent();
        self.body.line("/**");
        self.body.line(format!(" * @const {{{display}}}"));
        self.body.line(" */");
        self.body.line("this.value = value;");
        self.body.outdent();
        self.body.line("};");
        self.body.blank();

        self.provides.push(name);
    }

    /// `getU` returns a wrapper for the first member set in the backing
    /// data, or `undefined` when none is.
    fn emit_discriminator(&mut self, owner: &str, group: &OneofGroup<'_>) {
        let union = format!("{owner}.{}", group.union);

        self.body.line("/**");
        self.body.line(format!(" * @return {{{union}|undefined}}"));
        self.body.line(" */");
        self.body.line(format!(
            "{owner}.prototype.{} = function() {{",
            group.getter
        ));
        self.body.indent();
        self.body.line("var value;");
        for member in &group.members {
            let key = Literal::Str(member.field.name().to_string());
            let wrapper = self.wrapper_path(&member.wrapper);
            let inner = wrapped_value(&member.ty);
            self.body.line(format!("value = this.jsonData_[{key}];"));
            self.body.line("if (value != null) {");
            self.body.indent();
            self.body.line(format!("return new {wrapper}({inner});"));
            self.body.outdent();
            self.body.line("}");
        }
        self.body.line("return undefined;");
        self.body.outdent();
        self.body.line("};");
        self.body.blank();
    }

    /// Re-export every publicly imported type under this file's namespace.
    fn emit_aliases(&mut self) {
        let node = self.node;
        let mut emitted = false;
        for &proxy in &node.imported {
            let alias = self.mapper.qualified_name(Object::Imported(proxy));
            let target = self.files.proxy(proxy).target;
            let original = self.mapper.qualified_name(target);
            if alias == original {
                continue;
            }
            self.refer(target);
            self.body.line(format!("{alias} = {original};"));
            self.provides.push(alias);
            emitted = true;
        }
        if emitted {
            self.body.blank();
        }
    }

    /// Prepend the banner and dependency declarations to the body.
    fn finish(self) -> String {
        let mut header = Printer::new();
        header.line("// Code generated by protoc-gen-jspb.");
        header.line(format!("// source: {}", self.node.name()));
        header.line("// DO NOT EDIT!");
        header.blank();
        if self.node.index == Some(0) {
            header.line("/**");
            header.line(" * @fileoverview Generated protocol buffers in Javascript.");
            header.line(" */");
            header.blank();
        }
        if !self.provides.is_empty() {
            for name in &self.provides {
                header.line(format!("goog.provide('{name}');"));
            }
            header.blank();
        }
        if !self.requires.is_empty() {
            for name in &self.requires {
                header.line(format!("goog.require('{name}');"));
            }
            header.blank();
        }

        let mut out = header.finish(&HashMap::new());
        out.push_str(&self.body.finish(&self.fills));
        out
    }
}

/// The pieces of one field needed to write its getter and setter.
#[derive(Clone, Copy)]
struct Accessor<'r> {
    /// Qualified constructor name of the owning message.
    owner: &'r str,
    field: &'r FieldDescriptorProto,
    ty: &'r JsType,
    /// Allocated field name, used for the cached wrapper property.
    cache: &'r str,
    path: &'r str,
}

/// Expression wrapping the raw JSON `value` of a oneof member.
fn wrapped_value(ty: &JsType) -> String {
    if ty.kind == Type::Message && !ty.map {
        format!("new {}(value)", ty.display)
    } else {
        "value".to_string()
    }
}

#[cfg(test)]
mod tests {
    use prost_types::field_descriptor_proto::Type;
    use prost_types::source_code_info::Location;
    use prost_types::{FileDescriptorProto, SourceCodeInfo};

    use super::*;
    use crate::test_utils::*;

    fn generate(files: &[FileDescriptorProto], to_generate: &[&str], prefix: &str) -> Vec<File> {
        let names: Vec<String> = to_generate.iter().map(|s| s.to_string()).collect();
        let set = FileSet::wrap(files, &names).unwrap();
        let link = Link::build(&set).unwrap();
        let options = Options {
            pkg_prefix: prefix.to_string(),
        };
        Generator::new(&set, &link, &options).generate_all().unwrap()
    }

    fn content_of(files: Vec<FileDescriptorProto>, name: &str) -> String {
        let out = generate(&files, &[name], "");
        assert_eq!(out.len(), 1);
        out[0].content().to_string()
    }

    #[test]
    fn point_message() {
        let content = content_of(vec![point_file()], "geo/point.proto");
        let expected = "\
// Code generated by protoc-gen-jspb.
// source: geo/point.proto
// DO NOT EDIT!

/**
 * @fileoverview Generated protocol buffers in Javascript.
 */

goog.provide('geo.Point');

/**
 * @param {Object} jsonData The JSON data.
 * @constructor
 */
geo.Point = function(jsonData) {
\t/**
\t * @private {Object}
\t */
\tthis.jsonData_ = jsonData;
};

/**
 * @return {Object} The JSON data.
 */
geo.Point.prototype.getJsonData = function() {
\treturn this.jsonData_;
};

/**
 * Wire format: varint.
 * @return {number}
 */
geo.Point.prototype.getX = function() {
\tvar value = this.jsonData_[\"x\"];
\treturn value != null ? value : 0;
};

/**
 * Wire format: varint.
 * @param {number} x The x.
 */
geo.Point.prototype.setX = function(x) {
\tthis.jsonData_[\"x\"] = x;
};

/**
 * Wire format: varint.
 * @return {number}
 */
geo.Point.prototype.getY = function() {
\tvar value = this.jsonData_[\"y\"];
\treturn value != null ? value : 0;
};

/**
 * Wire format: varint.
 * @param {number} y The y.
 */
geo.Point.prototype.setY = function(y) {
\tthis.jsonData_[\"y\"] = y;
};

";
        assert_eq!(content, expected);
    }

    #[test]
    fn nested_enum_constants_use_container_prefix() {
        let mut foo = message("Foo", vec![]);
        foo.enum_type = vec![enumeration("Bar", &[("BAZ", 0), ("QUX", 2)])];
        let mut f = file("a.proto", Some("pkg"));
        f.message_type = vec![foo];
        f.enum_type = vec![enumeration("Color", &[("RED", 0)])];

        let content = content_of(vec![f], "a.proto");
        assert!(content.contains("pkg.Color = {\n\tColor_RED: 0\n};\n"));
        assert!(content.contains("pkg.Foo_Bar = {\n\tFoo_BAZ: 0,\n\tFoo_QUX: 2\n};\n"));
        assert!(!content.contains("Foo_Bar_BAZ"));
        let color = content.find("goog.provide('pkg.Color');").unwrap();
        let bar = content.find("goog.provide('pkg.Foo_Bar');").unwrap();
        let foo = content.find("goog.provide('pkg.Foo');").unwrap();
        assert!(color < bar && bar < foo);
    }

    #[test]
    fn colliding_fields_shift_all_accessor_names() {
        let mut f = file("a.proto", Some("pkg"));
        f.message_type = vec![message(
            "M",
            vec![field("value", 1, Type::String), field("Value", 2, Type::String)],
        )];

        let content = content_of(vec![f], "a.proto");
        assert!(content.contains("pkg.M.prototype.getValue = function() {"));
        assert!(content.contains("pkg.M.prototype.setValue = function(value) {"));
        assert!(content.contains("pkg.M.prototype.getValue_ = function() {"));
        assert!(content.contains("pkg.M.prototype.setValue_ = function(Value) {"));
        assert!(content.contains("this.jsonData_[\"Value\"] = Value;"));
    }

    #[test]
    fn json_data_accessor_is_reserved() {
        let mut f = file("a.proto", Some("pkg"));
        f.message_type = vec![message("M", vec![field("json_data", 1, Type::Bool)])];

        let content = content_of(vec![f], "a.proto");
        assert_eq!(content.matches("prototype.getJsonData = ").count(), 1);
        assert!(content.contains("pkg.M.prototype.getJsonData_ = function() {"));
        assert!(content.contains("pkg.M.prototype.setJsonData_ = function(json_data) {"));
        assert!(content.contains("return value != null ? value : false;"));
    }

    #[test]
    fn message_fields_are_cached_and_written_through() {
        let mut f = file("a.proto", Some("pkg"));
        f.message_type = vec![
            message("Child", vec![]),
            message(
                "Parent",
                vec![
                    typed("child", 1, Type::Message, ".pkg.Child"),
                    repeated(typed("kids", 2, Type::Message, ".pkg.Child")),
                ],
            ),
        ];

        let content = content_of(vec![f], "a.proto");
        assert!(content.contains(
            "\tif (this.Child_) {\n\t\treturn this.Child_;\n\t}\n\
             \tvar value = this.jsonData_[\"child\"];\n\
             \tif (value) {\n\
             \t\t/** @private {pkg.Child} */\n\
             \t\tthis.Child_ = new pkg.Child(value);\n\
             \t\treturn this.Child_;\n\
             \t}\n\
             \treturn undefined;\n"
        ));
        assert!(content.contains("\tthis.jsonData_[\"child\"] = child.getJsonData();\n\tthis.Child_ = undefined;\n"));
        assert!(content.contains(
            "\t\tgoog.array.forEach(value, function(__item) {\n\
             \t\t\tthis.Kids_.push(new pkg.Child(__item));\n\
             \t\t}, this);\n"
        ));
        assert!(content.contains("\treturn [];\n"));
        assert!(content.contains(
            "pkg.Parent.prototype.setKids = function(kids) {\n\
             \tif (kids) {\n\
             \t\tvar __data = [];\n\
             \t\tgoog.array.forEach(kids, function(__item) {\n\
             \t\t\t__data.push(__item.getJsonData());\n\
             \t\t});\n\
             \t\tthis.jsonData_[\"kids\"] = __data;\n\
             \t} else {\n\
             \t\tthis.jsonData_[\"kids\"] = [];\n\
             \t}\n\
             \tthis.Kids_ = undefined;\n"
        ));
        assert!(content.contains("goog.require('goog.array');\n"));
        assert!(content.contains(" * @return {Array.<pkg.Child>}\n"));
    }

    #[test]
    fn references_to_other_namespaces_are_required_sorted() {
        let mut dep = file("dep/types.proto", Some("other.pkg"));
        dep.message_type = vec![message("Zeta", vec![]), message("Alpha", vec![])];
        dep.enum_type = vec![enumeration("Level", &[("LOW", 0)])];
        let mut main = file("main.proto", Some("app"));
        main.dependency = vec!["dep/types.proto".to_string()];
        main.message_type = vec![
            message("Local", vec![]),
            message(
                "Holder",
                vec![
                    typed("z", 1, Type::Message, ".other.pkg.Zeta"),
                    typed("a", 2, Type::Message, ".other.pkg.Alpha"),
                    typed("level", 3, Type::Enum, ".other.pkg.Level"),
                    typed("again", 4, Type::Message, ".other.pkg.Zeta"),
                    typed("local", 5, Type::Message, ".app.Local"),
                ],
            ),
        ];

        let content = content_of(vec![dep, main], "main.proto");
        assert!(content.contains(
            "goog.provide('app.Local');\ngoog.provide('app.Holder');\n\n\
             goog.require('other_pkg.Alpha');\n\
             goog.require('other_pkg.Level');\n\
             goog.require('other_pkg.Zeta');\n\n"
        ));
        assert!(!content.contains("goog.require('app.Local')"));
        assert!(content.contains(" * @return {other_pkg.Level}\n"));
    }

    #[test]
    fn oneof_members_get_wrappers_and_a_discriminator() {
        let mut msg = message(
            "Msg",
            vec![
                field("id", 1, Type::Int32),
                in_oneof(field("name", 2, Type::String), 0),
                in_oneof(typed("child", 3, Type::Message, ".app.Msg.Child"), 0),
            ],
        );
        msg.nested_type = vec![message("Child", vec![])];
        msg.oneof_decl = vec![oneof("kind")];
        let mut f = file("a.proto", Some("app"));
        f.message_type = vec![msg];

        let content = content_of(vec![f], "a.proto");
        assert!(content.contains(
            "/**\n * @typedef {app.Msg_Name|app.Msg_Child_}\n */\napp.Msg.Kind;\n"
        ));
        assert!(content.contains("goog.provide('app.Msg_Name');"));
        assert!(content.contains("goog.provide('app.Msg_Child_');"));
        assert!(content.contains("app.Msg_Name = function(value) {"));
        assert!(content.contains(" * @const {app.Msg_Child}\n"));
        assert!(content.contains(
            "app.Msg.prototype.getKind = function() {\n\
             \tvar value;\n\
             \tvalue = this.jsonData_[\"name\"];\n\
             \tif (value != null) {\n\
             \t\treturn new app.Msg_Name(value);\n\
             \t}\n\
             \tvalue = this.jsonData_[\"child\"];\n\
             \tif (value != null) {\n\
             \t\treturn new app.Msg_Child_(new app.Msg_Child(value));\n\
             \t}\n\
             \treturn undefined;\n\
             };\n"
        ));
        // Members have no accessors of their own.
        assert!(!content.contains("prototype.getName ="));
        assert!(content.contains("app.Msg.prototype.getId = function() {"));
    }

    #[test]
    fn proto3_optional_fields_are_plain_accessors() {
        let mut maybe = in_oneof(field("maybe", 1, Type::Int64), 0);
        maybe.proto3_optional = Some(true);
        let mut msg = message("M", vec![maybe]);
        msg.oneof_decl = vec![oneof("_maybe")];
        let mut f = file("a.proto", Some("app"));
        f.message_type = vec![msg];

        let content = content_of(vec![f], "a.proto");
        assert!(content.contains("app.M.prototype.getMaybe = function() {"));
        assert!(content.contains("app.M.prototype.setMaybe = function(maybe) {"));
        assert!(!content.contains("@typedef"));
    }

    #[test]
    fn map_fields_are_plain_objects() {
        let mut msg = message(
            "M",
            vec![repeated(typed("labels", 1, Type::Message, ".app.M.LabelsEntry"))],
        );
        msg.nested_type = vec![map_entry(
            "LabelsEntry",
            Type::String,
            field("value", 2, Type::Int32),
        )];
        let mut f = file("a.proto", Some("app"));
        f.message_type = vec![msg];

        let content = content_of(vec![f], "a.proto");
        assert!(content.contains(" * @return {Object.<string, number>}\n"));
        assert!(content.contains("\treturn value != null ? value : {};\n"));
        assert!(content.contains("\tthis.jsonData_[\"labels\"] = labels;\n"));
        assert!(!content.contains("LabelsEntry"));
    }

    #[test]
    fn keyword_parameters_are_escaped() {
        let mut f = file("a.proto", Some("app"));
        f.message_type = vec![message("M", vec![field("default", 1, Type::String)])];

        let content = content_of(vec![f], "a.proto");
        assert!(content.contains("app.M.prototype.setDefault = function(default_) {"));
        assert!(content.contains(" * @param {string} default_ The default.\n"));
        assert!(content.contains("this.jsonData_[\"default\"] = default_;"));
    }

    #[test]
    fn explicit_defaults_are_quoted() {
        let mut name = field("name", 1, Type::String);
        name.default_value = Some("say \"hi\"".to_string());
        let mut f = file("a.proto", Some("app"));
        f.message_type = vec![message("M", vec![name])];

        let content = content_of(vec![f], "a.proto");
        assert!(content.contains("\treturn value != null ? value : \"say \\\"hi\\\"\";\n"));
    }

    #[test]
    fn source_comments_become_jsdoc() {
        let mut f = point_file();
        f.source_code_info = Some(SourceCodeInfo {
            location: vec![
                Location {
                    path: vec![4, 0],
                    leading_comments: Some(" A point.\n\n On a plane.\n".to_string()),
                    ..Default::default()
                },
                Location {
                    path: vec![4, 0, 2, 1],
                    leading_comments: Some(" Vertical.\n".to_string()),
                    ..Default::default()
                },
            ],
        });

        let content = content_of(vec![f], "geo/point.proto");
        assert!(content.contains(
            "/**\n * A point.\n *\n * On a plane.\n * @param {Object} jsonData The JSON data.\n"
        ));
        assert_eq!(content.matches(" * Vertical.\n").count(), 2);
    }

    #[test]
    fn public_imports_are_aliased() {
        let mut b = file("b.proto", Some("b"));
        b.message_type = vec![message("M", vec![])];
        let mut a = file("a.proto", Some("a"));
        a.dependency = vec!["b.proto".to_string()];
        a.public_dependency = vec![0];

        let content = content_of(vec![b, a], "a.proto");
        assert!(content.contains("goog.provide('a.M');\n\ngoog.require('b.M');\n\n"));
        assert!(content.ends_with("a.M = b.M;\n\n"));
    }

    #[test]
    fn prefix_applies_to_every_name() {
        let out = generate(&[point_file()], &["geo/point.proto"], "com.acme");
        let content = out[0].content();
        assert!(content.contains("goog.provide('com.acme.geo.Point');"));
        assert!(content.contains("com.acme.geo.Point = function(jsonData) {"));
        assert!(content.contains("com.acme.geo.Point.prototype.getX = function() {"));
    }

    #[test]
    fn only_requested_files_are_returned_in_request_order() {
        let mut dep = file("dep.proto", Some("dep"));
        dep.message_type = vec![message("D", vec![])];
        let files = vec![dep, file("one.proto", Some("app")), file("two.proto", Some("app"))];

        let out = generate(&files, &["two.proto", "one.proto"], "");
        let names: Vec<&str> = out.iter().map(|f| f.name()).collect();
        assert_eq!(names, ["two.pb.js", "one.pb.js"]);
        assert!(out[0].content().contains("@fileoverview"));
        assert!(!out[1].content().contains("@fileoverview"));
    }

    #[test]
    fn unsupported_fields_in_dependencies_fail_the_run() {
        let mut dep = file("dep.proto", Some("dep"));
        let mut outer = message("Outer", vec![typed("g", 1, Type::Group, ".dep.Outer.G")]);
        outer.nested_type = vec![message("G", vec![])];
        dep.message_type = vec![outer];
        let files = vec![dep, point_file()];

        let set = FileSet::wrap(&files, &["geo/point.proto".to_string()]).unwrap();
        let link = Link::build(&set).unwrap();
        let options = Options::default();
        let err = Generator::new(&set, &link, &options)
            .generate_all()
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedFieldType { ref field } if field == "g"));
    }

    #[test]
    fn output_is_deterministic() {
        let mut files = vec![point_file()];
        files[0].enum_type = vec![enumeration("Axis", &[("X", 0), ("Y", 1)])];
        let first = generate(&files, &["geo/point.proto"], "");
        let second = generate(&files, &["geo/point.proto"], "");
        assert_eq!(first, second);
    }
}
