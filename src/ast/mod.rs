//! Arena-backed AST for the dialect, as produced by the frontend oracle.
//!
//! Nodes live in a flat per-file arena and reference each other by
//! [`NodeId`]. Every node carries a start/end position pair and an
//! `implicit` flag; compiler-inserted nodes (auto-declared receivers,
//! expanded sugar) set the flag and are filtered out of user-facing
//! queries through the single [`Ast::is_implicit`] predicate.

mod walk;

pub use walk::{Direction, path_enclosing, walk_enclosing};

use crate::types::{NO_POS, NodeId, Pos};

/// Which keyword a declaration group was introduced with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclGroupKind {
    Var,
    Const,
    Type,
}

/// Branch/jump statement keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind {
    Goto,
    Break,
    Continue,
}

impl BranchKind {
    pub fn keyword(self) -> &'static str {
        match self {
            BranchKind::Goto => "goto",
            BranchKind::Break => "break",
            BranchKind::Continue => "continue",
        }
    }
}

/// Closed sum of syntax-node kinds.
///
/// This mirrors the dialect frontend's node set, reduced to what the
/// semantic queries need: declarations, statements, expressions,
/// identifiers. Child links are arena ids in source order.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    File {
        package: String,
        decls: Vec<NodeId>,
        doc: Option<String>,
    },
    /// A `var (...)`, `const (...)` or `type (...)` group.
    DeclGroup {
        kind: DeclGroupKind,
        specs: Vec<NodeId>,
        doc: Option<String>,
    },
    /// One `name[, name] [type] [= value[, value]]` inside a group.
    ValueSpec {
        names: Vec<NodeId>,
        ty: Option<NodeId>,
        values: Vec<NodeId>,
        doc: Option<String>,
    },
    TypeSpec {
        name: NodeId,
        ty: NodeId,
        doc: Option<String>,
    },
    FuncDecl {
        name: NodeId,
        recv: Option<NodeId>,
        func_type: NodeId,
        body: Option<NodeId>,
        doc: Option<String>,
    },
    FuncType {
        params: Vec<NodeId>,
        results: Vec<NodeId>,
    },
    Field {
        names: Vec<NodeId>,
        ty: Option<NodeId>,
    },
    StructType {
        fields: Vec<NodeId>,
    },
    Block {
        stmts: Vec<NodeId>,
    },
    If {
        cond: NodeId,
        then: NodeId,
        els: Option<NodeId>,
    },
    For {
        init: Option<NodeId>,
        cond: Option<NodeId>,
        post: Option<NodeId>,
        body: NodeId,
    },
    Return {
        results: Vec<NodeId>,
    },
    /// `goto`/`break`/`continue`, optionally labelled. In the dialect a
    /// bare `goto` may also be a command-style call; the semantic tables
    /// record that case in the branch-target table.
    Branch {
        kind: BranchKind,
        label: Option<NodeId>,
    },
    Labeled {
        label: NodeId,
        stmt: NodeId,
    },
    Assign {
        lhs: Vec<NodeId>,
        rhs: Vec<NodeId>,
        define: bool,
    },
    ExprStmt {
        expr: NodeId,
    },
    Call {
        func: NodeId,
        args: Vec<NodeId>,
    },
    Selector {
        x: NodeId,
        sel: NodeId,
    },
    Unary {
        op: char,
        x: NodeId,
    },
    Binary {
        op: char,
        x: NodeId,
        y: NodeId,
    },
    FuncLit {
        func_type: NodeId,
        body: NodeId,
    },
    Ident {
        name: String,
    },
    BasicLit {
        value: String,
    },
}

/// One arena slot: kind plus span and the implicit flag.
#[derive(Debug, Clone)]
pub struct NodeData {
    pub kind: NodeKind,
    pub pos: Pos,
    pub end: Pos,
    pub implicit: bool,
}

/// One file's syntax tree.
#[derive(Debug, Clone, Default)]
pub struct Ast {
    nodes: Vec<NodeData>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a user-written node.
    pub fn alloc(&mut self, kind: NodeKind, pos: Pos, end: Pos) -> NodeId {
        self.nodes.push(NodeData {
            kind,
            pos,
            end,
            implicit: false,
        });
        NodeId(self.nodes.len() as u32 - 1)
    }

    /// Allocate a compiler-inserted node with no corresponding source
    /// text. It still carries the span it was attributed to.
    pub fn alloc_implicit(&mut self, kind: NodeKind, pos: Pos, end: Pos) -> NodeId {
        let id = self.alloc(kind, pos, end);
        self.nodes[id.index()].implicit = true;
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The one shared synthetic-node predicate.
    pub fn is_implicit(&self, id: NodeId) -> bool {
        self.get(id).map(|n| n.implicit).unwrap_or(false)
    }

    pub fn ident_name(&self, id: NodeId) -> Option<&str> {
        match &self.get(id)?.kind {
            NodeKind::Ident { name } => Some(name),
            _ => None,
        }
    }

    pub fn span(&self, id: NodeId) -> (Pos, Pos) {
        self.get(id).map(|n| (n.pos, n.end)).unwrap_or((NO_POS, NO_POS))
    }

    /// Child node ids in source order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        let Some(node) = self.get(id) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let mut push = |n: NodeId| out.push(n);
        match &node.kind {
            NodeKind::File { decls, .. } => decls.iter().copied().for_each(&mut push),
            NodeKind::DeclGroup { specs, .. } => specs.iter().copied().for_each(&mut push),
            NodeKind::ValueSpec {
                names, ty, values, ..
            } => {
                names.iter().copied().for_each(&mut push);
                ty.iter().copied().for_each(&mut push);
                values.iter().copied().for_each(&mut push);
            }
            NodeKind::TypeSpec { name, ty, .. } => {
                push(*name);
                push(*ty);
            }
            NodeKind::FuncDecl {
                name,
                recv,
                func_type,
                body,
                ..
            } => {
                recv.iter().copied().for_each(&mut push);
                push(*name);
                push(*func_type);
                body.iter().copied().for_each(&mut push);
            }
            NodeKind::FuncType { params, results } => {
                params.iter().copied().for_each(&mut push);
                results.iter().copied().for_each(&mut push);
            }
            NodeKind::Field { names, ty } => {
                names.iter().copied().for_each(&mut push);
                ty.iter().copied().for_each(&mut push);
            }
            NodeKind::StructType { fields } => fields.iter().copied().for_each(&mut push),
            NodeKind::Block { stmts } => stmts.iter().copied().for_each(&mut push),
            NodeKind::If { cond, then, els } => {
                push(*cond);
                push(*then);
                els.iter().copied().for_each(&mut push);
            }
            NodeKind::For {
                init,
                cond,
                post,
                body,
            } => {
                init.iter().copied().for_each(&mut push);
                cond.iter().copied().for_each(&mut push);
                post.iter().copied().for_each(&mut push);
                push(*body);
            }
            NodeKind::Return { results } => results.iter().copied().for_each(&mut push),
            NodeKind::Branch { label, .. } => label.iter().copied().for_each(&mut push),
            NodeKind::Labeled { label, stmt } => {
                push(*label);
                push(*stmt);
            }
            NodeKind::Assign { lhs, rhs, .. } => {
                lhs.iter().copied().for_each(&mut push);
                rhs.iter().copied().for_each(&mut push);
            }
            NodeKind::ExprStmt { expr } => push(*expr),
            NodeKind::Call { func, args } => {
                push(*func);
                args.iter().copied().for_each(&mut push);
            }
            NodeKind::Selector { x, sel } => {
                push(*x);
                push(*sel);
            }
            NodeKind::Unary { x, .. } => push(*x),
            NodeKind::Binary { x, y, .. } => {
                push(*x);
                push(*y);
            }
            NodeKind::FuncLit { func_type, body } => {
                push(*func_type);
                push(*body);
            }
            NodeKind::Ident { .. } | NodeKind::BasicLit { .. } => {}
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn implicit_flag_round_trip() {
        let mut ast = Ast::new();
        let user = ast.alloc(
            NodeKind::Ident {
                name: "x".to_string(),
            },
            Pos(1),
            Pos(2),
        );
        let synth = ast.alloc_implicit(
            NodeKind::Ident {
                name: "this".to_string(),
            },
            Pos(1),
            Pos(1),
        );
        assert!(!ast.is_implicit(user));
        assert!(ast.is_implicit(synth));
        // Unknown ids are never implicit.
        assert!(!ast.is_implicit(NodeId(99)));
    }

    #[test]
    fn children_follow_source_order() {
        let mut ast = Ast::new();
        let x = ast.alloc(
            NodeKind::Ident {
                name: "x".to_string(),
            },
            Pos(1),
            Pos(2),
        );
        let y = ast.alloc(
            NodeKind::Ident {
                name: "y".to_string(),
            },
            Pos(5),
            Pos(6),
        );
        let bin = ast.alloc(NodeKind::Binary { op: '+', x, y }, Pos(1), Pos(6));
        assert_eq!(ast.children(bin), vec![x, y]);
        assert_eq!(ast.ident_name(x), Some("x"));
        assert_eq!(ast.ident_name(bin), None);
    }
}
