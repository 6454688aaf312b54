//! Maps schema field types to JavaScript (Closure) type strings.
//!
//! # Type Mapping Table
//!
//! | Schema type | JS type | Wire format |
//! |-------------|---------|-------------|
//! | `double` | `number` | `fixed64` |
//! | `float` | `number` | `fixed32` |
//! | `int32`, `int64`, `uint32`, `uint64` | `number` | `varint` |
//! | `fixed32`, `sfixed32` | `number` | `fixed32` |
//! | `fixed64`, `sfixed64` | `number` | `fixed64` |
//! | `sint32` / `sint64` | `number` | `zigzag32` / `zigzag64` |
//! | `bool` | `boolean` | `varint` |
//! | `string`, `bytes` | `string` | `bytes` |
//! | message | qualified message type | `bytes` |
//! | enum | qualified enum type | `varint` |
//! | `group` | unsupported | |
//!
//! Repeated fields become `Array.<T>` (`Array.<number>` for enums); map
//! fields become `Object.<K, V>`. Mapping is purely descriptive: resolving a
//! field's type never emits anything.

use std::fmt;

use prost_types::FieldDescriptorProto;
use prost_types::field_descriptor_proto::{Label, Type};

use crate::descriptor::{FileId, FileSet, Object};
use crate::emitter::Literal;
use crate::error::{Error, Result};
use crate::link::Link;
use crate::naming::{camel_case_slice, qualify};
use crate::resolver::Resolver;

/// Serialization category of a field, surfaced in generated docs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    Varint,
    Fixed32,
    Fixed64,
    Zigzag32,
    Zigzag64,
    Bytes,
}

impl WireType {
    pub fn as_str(self) -> &'static str {
        match self {
            WireType::Varint => "varint",
            WireType::Fixed32 => "fixed32",
            WireType::Fixed64 => "fixed64",
            WireType::Zigzag32 => "zigzag32",
            WireType::Zigzag64 => "zigzag64",
            WireType::Bytes => "bytes",
        }
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved JavaScript type of one field.
#[derive(Debug, Clone, PartialEq)]
pub struct JsType {
    /// Type used in JSDoc annotations.
    pub display: String,
    /// Element type of a repeated message field, used to wrap each item.
    pub element: Option<String>,
    pub wire: WireType,
    pub kind: Type,
    /// The message or enum the field refers to, as resolved from the current file.
    pub reference: Option<Object>,
    pub map: bool,
}

impl JsType {
    pub fn is_array(&self) -> bool {
        self.display.starts_with("Array.")
    }
}

/// Scalar display type and wire format, or `None` for message, enum and group kinds.
pub fn scalar_type(kind: Type) -> Option<(&'static str, WireType)> {
    let mapped = match kind {
        Type::Double => ("number", WireType::Fixed64),
        Type::Float => ("number", WireType::Fixed32),
        Type::Int64 | Type::Uint64 | Type::Int32 | Type::Uint32 => ("number", WireType::Varint),
        Type::Fixed64 | Type::Sfixed64 => ("number", WireType::Fixed64),
        Type::Fixed32 | Type::Sfixed32 => ("number", WireType::Fixed32),
        Type::Bool => ("boolean", WireType::Varint),
        Type::String | Type::Bytes => ("string", WireType::Bytes),
        Type::Sint32 => ("number", WireType::Zigzag32),
        Type::Sint64 => ("number", WireType::Zigzag64),
        Type::Message | Type::Enum | Type::Group => return None,
    };
    Some(mapped)
}

pub fn is_repeated(field: &FieldDescriptorProto) -> bool {
    field.label == Some(Label::Repeated as i32)
}

/// Field type resolution as seen from one file.
#[derive(Debug, Clone, Copy)]
pub struct TypeMapper<'s, 'a> {
    files: &'s FileSet<'a>,
    link: &'s Link,
    resolver: Resolver<'s, 'a>,
    prefix: &'s str,
}

impl<'s, 'a> TypeMapper<'s, 'a> {
    pub fn new(files: &'s FileSet<'a>, link: &'s Link, current: FileId, prefix: &'s str) -> Self {
        TypeMapper {
            files,
            link,
            resolver: link.resolver(files, current),
            prefix,
        }
    }

    /// Absolute JavaScript path of `obj`: `[prefix.]namespace.CamelName`.
    ///
    /// The namespace is that of the file `obj` is visible through, so a
    /// publicly imported type is referenced via the importing file.
    pub fn qualified_name(&self, obj: Object) -> String {
        let namespace = self.link.object_namespace(self.files, obj);
        qualify(
            self.prefix,
            namespace,
            &camel_case_slice(self.files.type_name(obj)),
        )
    }

    pub fn object_named(&self, type_name: &str) -> Result<Object> {
        self.resolver.object_named(type_name)
    }

    /// Resolve the display type, element type and wire format of `field`.
    pub fn js_type(&self, field: &FieldDescriptorProto) -> Result<JsType> {
        let kind = field_kind(field)?;
        let repeated = is_repeated(field);

        if let Some((display, wire)) = scalar_type(kind) {
            let display = if repeated {
                format!("Array.<{display}>")
            } else {
                display.to_string()
            };
            return Ok(JsType {
                display,
                element: None,
                wire,
                kind,
                reference: None,
                map: false,
            });
        }

        let obj = self.object_named(field.type_name())?;
        if let Object::Message(m) = self.files.target(obj) {
            let entry = self.files.message(m);
            if entry.is_map_entry() {
                return self.map_type(entry.proto);
            }
        }

        let name = self.qualified_name(obj);
        let (display, element, wire) = match (kind, repeated) {
            (Type::Message, true) => (format!("Array.<{name}>"), Some(name), WireType::Bytes),
            (Type::Message, false) => (name, None, WireType::Bytes),
            (_, true) => ("Array.<number>".to_string(), None, WireType::Varint),
            (_, false) => (name, None, WireType::Varint),
        };
        Ok(JsType {
            display,
            element,
            wire,
            kind,
            reference: Some(obj),
            map: false,
        })
    }

    fn map_type(&self, entry: &prost_types::DescriptorProto) -> Result<JsType> {
        let (key, value) = match entry.field.as_slice() {
            [key, value, ..] => (key, value),
            _ => {
                return Err(Error::UnsupportedFieldType {
                    field: entry.name().to_string(),
                });
            }
        };
        let key = self.js_type(key)?;
        let value = self.js_type(value)?;
        Ok(JsType {
            display: format!("Object.<{}, {}>", key.display, value.display),
            element: None,
            wire: WireType::Bytes,
            kind: Type::Message,
            reference: value.reference,
            map: true,
        })
    }

    /// The value a getter returns when the backing data has no entry.
    pub fn default_value(&self, field: &FieldDescriptorProto, ty: &JsType) -> Result<Literal> {
        if let Some(text) = field.default_value.as_deref().filter(|s| !s.is_empty()) {
            return self.explicit_default(field, ty, text);
        }
        let literal = if ty.map {
            Literal::Raw("{}".to_string())
        } else if ty.is_array() {
            Literal::Raw("[]".to_string())
        } else {
            match ty.kind {
                Type::Bool => Literal::Bool(false),
                Type::String | Type::Bytes => Literal::Str(String::new()),
                Type::Message | Type::Group => Literal::Raw("undefined".to_string()),
                _ => Literal::Int(0),
            }
        };
        Ok(literal)
    }

    fn explicit_default(
        &self,
        field: &FieldDescriptorProto,
        ty: &JsType,
        text: &str,
    ) -> Result<Literal> {
        let malformed = || {
            Error::Format(format!(
                "default value {text:?} for field {} of type {}",
                field.name(),
                ty.display
            ))
        };
        match ty.kind {
            Type::String | Type::Bytes => Ok(Literal::Str(text.to_string())),
            Type::Bool => text.parse().map(Literal::Bool).map_err(|_| malformed()),
            Type::Double | Type::Float => match text {
                "inf" => Ok(Literal::Raw("Infinity".to_string())),
                "-inf" => Ok(Literal::Raw("-Infinity".to_string())),
                "nan" => Ok(Literal::Raw("NaN".to_string())),
                _ => text.parse().map(Literal::Float).map_err(|_| malformed()),
            },
            Type::Enum => {
                let obj = ty.reference.ok_or_else(malformed)?;
                let Object::Enum(e) = self.files.target(obj) else {
                    return Err(malformed());
                };
                let node = self.files.enumeration(e);
                if !node.proto.value.iter().any(|v| v.name() == text) {
                    return Err(malformed());
                }
                Ok(Literal::Raw(format!(
                    "{}.{}{}",
                    self.qualified_name(obj),
                    node.prefix(),
                    text
                )))
            }
            Type::Message | Type::Group => Err(malformed()),
            _ => text.parse().map(Literal::Int).map_err(|_| malformed()),
        }
    }
}

fn field_kind(field: &FieldDescriptorProto) -> Result<Type> {
    let unsupported = || Error::UnsupportedFieldType {
        field: field.name().to_string(),
    };
    let kind = field
        .r#type
        .and_then(|raw| Type::try_from(raw).ok())
        .ok_or_else(unsupported)?;
    if kind == Type::Group {
        return Err(unsupported());
    }
    Ok(kind)
}
