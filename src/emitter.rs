//! Indentation-aware text sink for generated code.
//!
//! Output is collected as a sequence of blocks: finished text, and named
//! slots whose contents are only known after the whole message has been
//! walked (e.g. the member list of a oneof). [`Printer::finish`] splices the
//! slot contents in at the indentation they were reserved with.

use std::collections::HashMap;
use std::fmt;

/// A JavaScript literal with kind-specific formatting.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Bool(bool),
    Int(i128),
    Float(f64),
    /// Pre-formatted expression, e.g. `[]` or a constant reference.
    Raw(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // JSON string syntax is valid JavaScript string syntax.
            Literal::Str(s) => match serde_json::to_string(s) {
                Ok(quoted) => f.write_str(&quoted),
                Err(_) => Err(fmt::Error),
            },
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Int(n) => write!(f, "{n}"),
            Literal::Float(x) => write!(f, "{x}"),
            Literal::Raw(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(usize);

#[derive(Debug)]
enum Block {
    Text(String),
    Slot { id: SlotId, indent: usize },
}

const INDENT: &str = "\t";

#[derive(Debug, Default)]
pub struct Printer {
    blocks: Vec<Block>,
    current: String,
    indent: usize,
    slots: usize,
}

impl Printer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write one line at the current indentation. Empty lines carry no indentation.
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.indent {
                self.current.push_str(INDENT);
            }
            self.current.push_str(text);
        }
        self.current.push('\n');
    }

    pub fn blank(&mut self) {
        self.current.push('\n');
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn outdent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// Reserve a slot at the current position, filled in by [`Printer::finish`].
    pub fn slot(&mut self) -> SlotId {
        self.flush();
        let id = SlotId(self.slots);
        self.slots += 1;
        self.blocks.push(Block::Slot {
            id,
            indent: self.indent,
        });
        id
    }

    /// Render all blocks, replacing each slot with its lines. Slots without
    /// an entry in `fills` render as nothing.
    pub fn finish(mut self, fills: &HashMap<SlotId, Vec<String>>) -> String {
        self.flush();
        let mut out = String::new();
        for block in &self.blocks {
            match block {
                Block::Text(text) => out.push_str(text),
                Block::Slot { id, indent } => {
                    for line in fills.get(id).into_iter().flatten() {
                        if !line.is_empty() {
                            out.push_str(&INDENT.repeat(*indent));
                            out.push_str(line);
                        }
                        out.push('\n');
                    }
                }
            }
        }
        out
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.blocks.push(Block::Text(std::mem::take(&mut self.current)));
        }
    }
}
