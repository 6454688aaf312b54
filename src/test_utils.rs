//! Descriptor builders shared by the unit tests.

use prost_types::compiler::CodeGeneratorRequest;
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FileDescriptorProto, MessageOptions, OneofDescriptorProto,
};

pub fn file(name: &str, package: Option<&str>) -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some(name.to_string()),
        package: package.map(str::to_string),
        syntax: Some("proto3".to_string()),
        ..Default::default()
    }
}

pub fn message(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_string()),
        field: fields,
        ..Default::default()
    }
}

pub fn map_entry(name: &str, key: Type, value: FieldDescriptorProto) -> DescriptorProto {
    let mut entry = message(name, vec![field("key", 1, key), value]);
    entry.options = Some(MessageOptions {
        map_entry: Some(true),
        ..Default::default()
    });
    entry
}

pub fn field(name: &str, number: i32, kind: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(kind as i32),
        ..Default::default()
    }
}

/// A message- or enum-typed field referring to `type_name` (e.g. `.pkg.Foo`).
pub fn typed(name: &str, number: i32, kind: Type, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(type_name.to_string()),
        ..field(name, number, kind)
    }
}

pub fn repeated(mut field: FieldDescriptorProto) -> FieldDescriptorProto {
    field.label = Some(Label::Repeated as i32);
    field
}

pub fn in_oneof(mut field: FieldDescriptorProto, index: i32) -> FieldDescriptorProto {
    field.oneof_index = Some(index);
    field
}

pub fn oneof(name: &str) -> OneofDescriptorProto {
    OneofDescriptorProto {
        name: Some(name.to_string()),
        ..Default::default()
    }
}

pub fn enumeration(name: &str, values: &[(&str, i32)]) -> EnumDescriptorProto {
    EnumDescriptorProto {
        name: Some(name.to_string()),
        value: values
            .iter()
            .map(|(name, number)| EnumValueDescriptorProto {
                name: Some(name.to_string()),
                number: Some(*number),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

pub fn request(
    files: Vec<FileDescriptorProto>,
    to_generate: &[&str],
    parameter: Option<&str>,
) -> CodeGeneratorRequest {
    CodeGeneratorRequest {
        file_to_generate: to_generate.iter().map(|s| s.to_string()).collect(),
        parameter: parameter.map(str::to_string),
        proto_file: files,
        ..Default::default()
    }
}

/// `message Point { int32 x = 1; int32 y = 2; }` in package `geo`.
pub fn point_file() -> FileDescriptorProto {
    let mut f = file("geo/point.proto", Some("geo"));
    f.message_type = vec![message(
        "Point",
        vec![field("x", 1, Type::Int32), field("y", 2, Type::Int32)],
    )];
    f
}
