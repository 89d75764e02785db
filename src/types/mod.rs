//! Core identifier and position types shared across the engine.

use serde::{Deserialize, Serialize};

/// Interned source position, scoped to one project's [`crate::FileSet`].
///
/// Positions are opaque monotonic integers: a file registered later always
/// occupies a higher range than one registered earlier, so positions are
/// comparable and orderable across files. `Pos(0)` is the "no position"
/// sentinel and never denotes a real location.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Pos(pub u32);

/// The "no position" sentinel.
pub const NO_POS: Pos = Pos(0);

impl Pos {
    pub fn is_valid(self) -> bool {
        self.0 != 0
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

/// Index of a node within one file's AST arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identity of a resolved semantic object (variable, type, function, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

/// Identity of a lexical scope in a [`crate::ScopeTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopeId(pub u32);

/// Identity of a type in a [`crate::TypeStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeId(pub u32);

impl ObjectId {
    pub fn new(value: u32) -> Option<Self> {
        if value == 0 { None } else { Some(Self(value)) }
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

/// A resolved (file, line, column) location. Lines and columns are
/// 1-based; `offset` is the byte offset within the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub offset: u32,
}

impl Location {
    pub fn new(file: impl Into<String>, line: u32, column: u32, offset: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
            offset,
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}
