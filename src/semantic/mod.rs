//! The semantic bundle: resolved objects, definition/use tables, scope
//! tables and expression types, as produced once per project snapshot by
//! the frontend oracle. Everything here is read-only after construction.

mod scope;

pub use scope::{Scope, ScopeTable};

use crate::ast::Ast;
use crate::resolve::LineCache;
use crate::source::FileSet;
use crate::types::{NodeId, ObjectId, Pos, ScopeId, TypeId};
use crate::typesys::TypeStore;
use std::collections::HashMap;

/// What a resolved symbol is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Var,
    Const,
    TypeName,
    Func,
    Label,
    PkgName,
}

/// A resolved semantic object, distinct from any identifier occurrence.
/// Exactly one occurrence defines it; zero or more reference it.
#[derive(Debug, Clone)]
pub struct Object {
    pub id: ObjectId,
    pub name: String,
    pub kind: ObjectKind,
    pub pos: Pos,
    pub ty: Option<TypeId>,
}

/// Definition/use tables plus the sparse node→scope table.
///
/// `defs` and `uses` preserve file traversal order; the reverse
/// `ObjectId -> defining NodeId` index is maintained as definitions are
/// recorded so the hot resolution path never scans the defs table.
#[derive(Debug, Clone, Default)]
pub struct TypeInfo {
    defs: Vec<(NodeId, ObjectId)>,
    uses: Vec<(NodeId, ObjectId)>,
    scopes: HashMap<NodeId, ScopeId>,
    branch_targets: HashMap<NodeId, ObjectId>,
    expr_types: HashMap<NodeId, TypeId>,
    objects: Vec<Object>,
    def_index: HashMap<ObjectId, NodeId>,
}

impl TypeInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh object. Ids start at 1; 0 stays invalid.
    pub fn new_object(
        &mut self,
        name: impl Into<String>,
        kind: ObjectKind,
        pos: Pos,
        ty: Option<TypeId>,
    ) -> ObjectId {
        let id = ObjectId(self.objects.len() as u32 + 1);
        self.objects.push(Object {
            id,
            name: name.into(),
            kind,
            pos,
            ty,
        });
        id
    }

    pub fn object(&self, id: ObjectId) -> Option<&Object> {
        if id.0 == 0 {
            return None;
        }
        self.objects.get(id.0 as usize - 1)
    }

    /// Record a defining identifier occurrence.
    pub fn record_def(&mut self, ident: NodeId, object: ObjectId) {
        self.defs.push((ident, object));
        self.def_index.entry(object).or_insert(ident);
    }

    /// Record a referencing identifier occurrence.
    pub fn record_use(&mut self, ident: NodeId, object: ObjectId) {
        self.uses.push((ident, object));
    }

    /// Attach the scope a node introduces. The table is sparse: most
    /// nodes introduce no scope.
    pub fn record_scope(&mut self, node: NodeId, scope: ScopeId) {
        self.scopes.insert(node, scope);
    }

    /// Record that a branch statement's control keyword resolves to a
    /// callable/label-like object (dialect sugar: a keyword position that
    /// is itself meaningfully clickable).
    pub fn record_branch_target(&mut self, branch: NodeId, object: ObjectId) {
        self.branch_targets.insert(branch, object);
    }

    pub fn record_expr_type(&mut self, expr: NodeId, ty: TypeId) {
        self.expr_types.insert(expr, ty);
    }

    pub fn defs(&self) -> &[(NodeId, ObjectId)] {
        &self.defs
    }

    pub fn uses(&self) -> &[(NodeId, ObjectId)] {
        &self.uses
    }

    pub fn scope_of(&self, node: NodeId) -> Option<ScopeId> {
        self.scopes.get(&node).copied()
    }

    pub fn branch_target(&self, node: NodeId) -> Option<ObjectId> {
        self.branch_targets.get(&node).copied()
    }

    pub fn branch_targets(&self) -> impl Iterator<Item = (NodeId, ObjectId)> + '_ {
        self.branch_targets.iter().map(|(&n, &o)| (n, o))
    }

    pub fn type_of(&self, expr: NodeId) -> Option<TypeId> {
        self.expr_types.get(&expr).copied()
    }

    /// The unique defining identifier node of `object`, via the reverse
    /// index. The linear scan over the defs table remains as a fallback
    /// only; it is not on the hot path.
    pub fn defining_node(&self, object: ObjectId) -> Option<NodeId> {
        if object.0 == 0 {
            return None;
        }
        match self.def_index.get(&object) {
            Some(&node) => Some(node),
            None => self
                .defs
                .iter()
                .find(|&&(_, o)| o == object)
                .map(|&(n, _)| n),
        }
    }
}

/// One parsed file in the forest: path, its index in the fileset, and
/// its AST root in the shared arena.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    pub path: String,
    pub file_index: usize,
    pub root: NodeId,
}

/// The memoized semantic bundle for one immutable project snapshot.
#[derive(Debug)]
pub struct Semantics {
    pub fileset: FileSet,
    pub ast: Ast,
    pub units: Vec<SourceUnit>,
    pub info: TypeInfo,
    pub scopes: ScopeTable,
    pub types: TypeStore,
    pub pkg_path: String,
    pub(crate) line_idents: LineCache,
}

impl Semantics {
    pub fn new(
        fileset: FileSet,
        ast: Ast,
        units: Vec<SourceUnit>,
        info: TypeInfo,
        scopes: ScopeTable,
        types: TypeStore,
        pkg_path: impl Into<String>,
    ) -> Self {
        Self {
            fileset,
            ast,
            units,
            info,
            scopes,
            types,
            pkg_path: pkg_path.into(),
            line_idents: LineCache::default(),
        }
    }

    pub fn unit_by_name(&self, name: &str) -> Option<&SourceUnit> {
        self.units.iter().find(|u| u.path == name)
    }

    pub fn unit_for_file_index(&self, file_index: usize) -> Option<&SourceUnit> {
        self.units.iter().find(|u| u.file_index == file_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NO_POS;

    #[test]
    fn object_ids_start_at_one() {
        let mut info = TypeInfo::new();
        let obj = info.new_object("x", ObjectKind::Var, Pos(5), None);
        assert_eq!(obj, ObjectId(1));
        assert!(info.object(ObjectId(0)).is_none());
        assert_eq!(info.object(obj).unwrap().name, "x");
    }

    #[test]
    fn defining_node_uses_reverse_index() {
        let mut info = TypeInfo::new();
        let obj = info.new_object("x", ObjectKind::Var, Pos(5), None);
        assert!(info.defining_node(obj).is_none());

        info.record_def(NodeId(3), obj);
        assert_eq!(info.defining_node(obj), Some(NodeId(3)));

        // Repeated calls are stable.
        assert_eq!(info.defining_node(obj), Some(NodeId(3)));

        // A second recorded definition never displaces the first.
        info.record_def(NodeId(9), obj);
        assert_eq!(info.defining_node(obj), Some(NodeId(3)));
    }

    #[test]
    fn scope_table_is_sparse() {
        let mut info = TypeInfo::new();
        info.record_scope(NodeId(1), ScopeId(0));
        assert_eq!(info.scope_of(NodeId(1)), Some(ScopeId(0)));
        assert_eq!(info.scope_of(NodeId(2)), None);
    }

    #[test]
    fn objects_with_no_position_are_representable() {
        let mut info = TypeInfo::new();
        let obj = info.new_object("error", ObjectKind::TypeName, NO_POS, None);
        assert!(!info.object(obj).unwrap().pos.is_valid());
    }
}
