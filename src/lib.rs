//! A `protoc` plugin generating Closure-style JavaScript accessors over
//! JSON-shaped protocol buffer data.
//!
//! `protoc-gen-jspb` reads a `CodeGeneratorRequest`, builds an object graph
//! over every schema file in it, resolves every cross-reference, and emits one
//! `.pb.js` file per requested schema. Each message becomes a constructor
//! wrapping a JSON object, with a typed getter and setter per field:
//!
//! ```text
//! goog.provide('geo.Point');
//!
//! geo.Point = function(jsonData) { ... };
//! geo.Point.prototype.getX = function() { ... };
//! geo.Point.prototype.setX = function(x) { ... };
//! ```
//!
//! # Features
//!
//! - Enums as constant maps, with values prefixed by their container name
//! - Lazily constructed, cached message-typed fields
//! - Oneofs as union typedefs with one wrapper type per member
//! - Types re-exported through public imports, aliased in the importing file
//! - Collision-free identifiers within each message and namespace
//! - Deterministic output: byte-identical across runs
//!
//! # Usage
//!
//! ```no_run
//! use prost::Message;
//! use prost_types::compiler::CodeGeneratorRequest;
//!
//! let request = CodeGeneratorRequest::decode(&b""[..])?;
//! let response = protoc_gen_jspb::generate(&request)?;
//! for file in &response.file {
//!     eprintln!("{}", file.name());
//! }
//! # Ok::<(), protoc_gen_jspb::error::Error>(())
//! ```

pub mod alloc;
pub mod codegen;
pub mod comments;
pub mod config;
pub mod descriptor;
pub mod emitter;
pub mod error;
pub mod link;
pub mod naming;
pub mod oneof;
pub mod registry;
pub mod resolver;
pub mod type_map;

#[cfg(test)]
mod test_utils;

use prost::Message;
use prost_types::compiler::code_generator_response::Feature;
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse};

use crate::codegen::Generator;
use crate::config::Options;
use crate::descriptor::FileSet;
use crate::error::Result;
use crate::link::Link;

/// Run the whole pipeline on a decoded request.
///
/// Wraps every input file, links namespaces and types, then generates every
/// requested file. Any failure aborts the run; no partial response is built.
pub fn generate(request: &CodeGeneratorRequest) -> Result<CodeGeneratorResponse> {
    let options = Options::from_parameter(request.parameter())?;
    let files = FileSet::wrap(&request.proto_file, &request.file_to_generate)?;
    let link = Link::build(&files)?;
    let generated = Generator::new(&files, &link, &options).generate_all()?;

    Ok(CodeGeneratorResponse {
        file: generated,
        supported_features: Some(Feature::Proto3Optional as u64),
        ..Default::default()
    })
}

/// Decode a serialized request, generate, and encode the response.
pub fn run(input: &[u8]) -> Result<Vec<u8>> {
    let request = CodeGeneratorRequest::decode(input)?;
    let response = generate(&request)?;
    let mut output = Vec::with_capacity(response.encoded_len());
    response.encode(&mut output)?;
    Ok(output)
}
