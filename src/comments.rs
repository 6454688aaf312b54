//! Source comment lookup by structural path.
//!
//! `SourceCodeInfo` locates each element of a schema file by a path of
//! alternating field numbers and indices (e.g. `4,0,2,1` is the second field
//! of the first message). Paths are stored as comma-separated strings.

use std::collections::HashMap;

use prost_types::SourceCodeInfo;

/// `FileDescriptorProto.message_type`
pub const FILE_MESSAGE: i32 = 4;
/// `FileDescriptorProto.enum_type`
pub const FILE_ENUM: i32 = 5;
/// `DescriptorProto.field`
pub const MESSAGE_FIELD: i32 = 2;
/// `DescriptorProto.nested_type`
pub const MESSAGE_NESTED: i32 = 3;
/// `DescriptorProto.enum_type`
pub const MESSAGE_ENUM: i32 = 4;
/// `DescriptorProto.oneof_decl`
pub const MESSAGE_ONEOF: i32 = 8;

/// Path of a top-level element: `"<tag>,<index>"`.
pub fn root_path(tag: i32, index: usize) -> String {
    format!("{tag},{index}")
}

/// Path of an element inside `parent`: `"<parent>,<tag>,<index>"`.
pub fn child_path(parent: &str, tag: i32, index: usize) -> String {
    format!("{parent},{tag},{index}")
}

/// Leading comments of one schema file, keyed by structural path.
#[derive(Debug, Default, Clone)]
pub struct CommentIndex {
    comments: HashMap<String, String>,
}

impl CommentIndex {
    /// Index every location that carries a leading comment.
    pub fn build(info: Option<&SourceCodeInfo>) -> Self {
        let comments = info
            .into_iter()
            .flat_map(|info| &info.location)
            .filter_map(|loc| {
                let comment = loc.leading_comments.as_ref()?;
                let path = loc
                    .path
                    .iter()
                    .map(i32::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                Some((path, comment.clone()))
            })
            .collect();
        Self { comments }
    }

    /// The comment at `path`, split into lines with one leading space
    /// removed from each.
    pub fn lines(&self, path: &str) -> Option<Vec<&str>> {
        let text = self.comments.get(path)?;
        let text = text.strip_suffix('\n').unwrap_or(text);
        Some(
            text.split('\n')
                .map(|line| line.strip_prefix(' ').unwrap_or(line))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }
}
