//! Error types for the protoc-gen-jspb crate.
//!
//! Every fatal condition is returned up to the binary, which reports it on
//! one line and exits non-zero. Variants with a `source` wrap an underlying
//! failure; the others are invariant violations found while processing.

/// Errors that can occur while generating JavaScript from a request.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to read the request bytes.
    #[error("reading input: {source}")]
    Read { source: std::io::Error },

    /// The request bytes are not a valid `CodeGeneratorRequest`.
    #[error("parsing input proto: {0}")]
    Decode(#[from] prost::DecodeError),

    /// The response could not be serialized.
    #[error("failed to marshal output proto: {0}")]
    Encode(#[from] prost::EncodeError),

    /// Failed to write the response bytes.
    #[error("failed to write output proto: {source}")]
    Write { source: std::io::Error },

    /// The parameter string could not be mapped onto [`crate::config::Options`].
    #[error("invalid parameter: {0}")]
    Parameter(#[from] serde_json::Error),

    /// The request names no file to generate.
    #[error("no files to generate")]
    NoFilesToGenerate,

    /// A file to generate has no package clause.
    #[error("{file}: no package clause in proto file")]
    MissingPackage { file: String },

    /// Files to generate declare different packages.
    #[error("inconsistent package names: {found} {expected}")]
    InconsistentPackages { found: String, expected: String },

    /// A file name (to generate, or a dependency) is not among the input files.
    #[error("could not find file named {name}")]
    FileNotFound { name: String },

    /// Nested messages were not linked exactly once to their parent.
    #[error("internal error: nesting failure for {message}")]
    NestingFailure { message: String },

    /// Nested enums were not linked exactly once to their parent.
    #[error("internal error: enum nesting failure for {message}")]
    EnumNestingFailure { message: String },

    /// A qualified type name has no definition in any input file.
    #[error("can't find object with type {type_name}")]
    UnknownType { type_name: String },

    /// A field has a type the generator does not support.
    #[error("unknown type for {field}")]
    UnsupportedFieldType { field: String },

    /// A value of unexpected shape reached the output formatter.
    #[error("unexpected value in printer: {0}")]
    Format(String),
}

impl Error {
    /// Whether the error wraps an underlying failure rather than reporting
    /// an invariant violation.
    pub fn has_cause(&self) -> bool {
        matches!(
            self,
            Error::Read { .. }
                | Error::Decode(_)
                | Error::Encode(_)
                | Error::Write { .. }
                | Error::Parameter(_)
        )
    }
}

/// Convenience alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
