//! Lexical scopes: parent-linked symbol tables and the innermost-scope
//! position query.

use super::Semantics;
use crate::ast::{NodeKind, path_enclosing};
use crate::types::{ObjectId, Pos, ScopeId};
use std::collections::HashMap;
use tracing::trace;

/// One nested symbol table. Declarations map source names to objects;
/// lookup falls through to the parent chain.
#[derive(Debug, Clone)]
pub struct Scope {
    parent: Option<ScopeId>,
    names: HashMap<String, ObjectId>,
    pub pos: Pos,
    pub end: Pos,
}

/// All scopes of one semantic bundle, indexed by [`ScopeId`].
#[derive(Debug, Clone, Default)]
pub struct ScopeTable {
    scopes: Vec<Scope>,
}

impl ScopeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_scope(&mut self, parent: Option<ScopeId>, pos: Pos, end: Pos) -> ScopeId {
        self.scopes.push(Scope {
            parent,
            names: HashMap::new(),
            pos,
            end,
        });
        ScopeId(self.scopes.len() as u32 - 1)
    }

    pub fn get(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.0 as usize)
    }

    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.get(id)?.parent
    }

    pub fn declare(&mut self, scope: ScopeId, name: impl Into<String>, object: ObjectId) {
        if let Some(s) = self.scopes.get_mut(scope.0 as usize) {
            s.names.insert(name.into(), object);
        }
    }

    /// Look `name` up in `scope` only, without walking parents.
    pub fn lookup_local(&self, scope: ScopeId, name: &str) -> Option<ObjectId> {
        self.get(scope)?.names.get(name).copied()
    }

    /// Look `name` up in `scope` and every lexically enclosing scope.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<ObjectId> {
        let mut cur = Some(scope);
        while let Some(id) = cur {
            let s = self.get(id)?;
            if let Some(&obj) = s.names.get(name) {
                return Some(obj);
            }
            cur = s.parent;
        }
        None
    }

    /// Names declared directly in `scope`, unordered.
    pub fn local_names(&self, scope: ScopeId) -> Vec<&str> {
        self.get(scope)
            .map(|s| s.names.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

impl Semantics {
    /// The innermost lexical scope containing `pos`.
    ///
    /// Walks the enclosing-node path from the leaf outward and stops at
    /// the first node with an attached scope. Function declarations whose
    /// scope is attached to the signature node rather than the
    /// declaration itself are tried at both spots before moving outward.
    ///
    /// Returns the file scope itself when the position sits outside any
    /// nested construct; stepping past it is the caller's choice. `None`
    /// means the position is invalid or belongs to no known file.
    pub fn innermost_scope(&self, pos: Pos) -> Option<ScopeId> {
        let (file_index, _) = self.fileset.file_containing(pos)?;
        let unit = self.unit_for_file_index(file_index)?;
        let path = path_enclosing(&self.ast, unit.root, pos, pos);
        for &node in &path {
            if let Some(scope) = self.info.scope_of(node) {
                trace!(?node, ?scope, "innermost scope hit");
                return Some(scope);
            }
            // Parameter scopes are sometimes attached to the type node
            // rather than the declaration node.
            if let Some(data) = self.ast.get(node)
                && let NodeKind::FuncDecl { func_type, .. } = &data.kind
                && let Some(scope) = self.info.scope_of(*func_type)
            {
                return Some(scope);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::{ObjectKind, TypeInfo};

    #[test]
    fn lookup_walks_parent_chain() {
        let mut info = TypeInfo::new();
        let x = info.new_object("x", ObjectKind::Var, Pos(1), None);
        let y = info.new_object("y", ObjectKind::Var, Pos(10), None);

        let mut table = ScopeTable::new();
        let file = table.new_scope(None, Pos(1), Pos(100));
        let block = table.new_scope(Some(file), Pos(5), Pos(50));
        table.declare(file, "x", x);
        table.declare(block, "y", y);

        assert_eq!(table.lookup(block, "x"), Some(x));
        assert_eq!(table.lookup(block, "y"), Some(y));
        assert_eq!(table.lookup(file, "y"), None);
        assert_eq!(table.lookup_local(block, "x"), None);
        assert_eq!(table.lookup(block, "z"), None);
    }

    #[test]
    fn shadowing_resolves_to_innermost() {
        let mut info = TypeInfo::new();
        let outer = info.new_object("x", ObjectKind::Var, Pos(1), None);
        let inner = info.new_object("x", ObjectKind::Var, Pos(20), None);

        let mut table = ScopeTable::new();
        let file = table.new_scope(None, Pos(1), Pos(100));
        let block = table.new_scope(Some(file), Pos(10), Pos(60));
        table.declare(file, "x", outer);
        table.declare(block, "x", inner);

        assert_eq!(table.lookup(block, "x"), Some(inner));
        assert_eq!(table.lookup(file, "x"), Some(outer));
    }
}
