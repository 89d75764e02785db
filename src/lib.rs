//! Semantic-query engine for Go+ editor tooling.
//!
//! This crate answers the position-level questions an editor feature layer
//! asks against an immutable project snapshot: what AST node is under the
//! cursor, where a symbol is defined and used, which lexical scope encloses
//! a position, how two types relate, and how the dialect's mangled names
//! decode. Parsing and type checking are supplied by an external frontend
//! oracle; everything here is a read-only query over its output.

pub mod ast;
pub mod docmodel;
pub mod error;
pub mod mangle;
pub mod project;
pub mod resolve;
pub mod semantic;
pub mod source;
pub mod types;
pub mod typesys;

// Explicit exports for better API clarity
pub use ast::{Ast, Direction, NodeData, NodeKind};
pub use error::{SemaError, SemaResult};
pub use project::{AnalysisOutcome, Frontend, Project};
pub use resolve::IdentRef;
pub use semantic::{Object, ObjectKind, Scope, ScopeTable, Semantics, TypeInfo};
pub use source::{FileSet, SourceFile};
pub use types::{Location, NO_POS, NodeId, ObjectId, Pos, ScopeId, TypeId};
pub use typesys::{BasicKind, ChanDir, Member, Type, TypeStore, is_exported};
