//! Aggregate-member topology: enumerate the fields and methods a named
//! struct type exposes, including those surfaced through embedding.
//!
//! The walk is breadth-first by embedding depth with a cycle guard, so
//! mutually embedding types terminate and the host language's shadowing
//! rule (first occurrence wins, shallowest depth) falls out of the
//! traversal order.

use super::{FieldInfo, MethodInfo, Type, TypeStore};
use crate::types::TypeId;
use std::collections::{HashSet, VecDeque};

/// Implicit class types recognized by fixed package-path + type-name
/// pairs. The dialect's type system does not yet mark these itself; this
/// allow-list is a documented workaround for that gap, not a mechanism to
/// generalize.
pub const IMPLICIT_CLASSES: &[(&str, &str)] = &[
    ("github.com/goplus/spx", "Game"),
    ("github.com/goplus/spx", "SpriteImpl"),
];

/// Whether an identifier is exported under the host language's rule.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_uppercase())
}

/// One visited member.
#[derive(Debug, Clone, Copy)]
pub enum Member<'a> {
    Field(&'a FieldInfo),
    Method(&'a MethodInfo),
}

impl Member<'_> {
    pub fn name(&self) -> &str {
        match self {
            Member::Field(f) => &f.name,
            Member::Method(m) => &m.name,
        }
    }
}

fn is_implicit_class(store: &TypeStore, named: TypeId) -> bool {
    store.named(named).is_some_and(|info| {
        IMPLICIT_CLASSES
            .iter()
            .any(|&(pkg, name)| info.pkg_path == pkg && info.name == name)
    })
}

fn named_visible(store: &TypeStore, named: TypeId, main_pkg: &str) -> bool {
    store
        .named(named)
        .is_some_and(|info| is_exported(&info.name) || info.pkg_path == main_pkg)
}

/// Unwrap one level of pointer; embedding by value and by pointer both
/// resolve to the pointee.
fn unwrap_pointer(store: &TypeStore, ty: TypeId) -> TypeId {
    match store.get(ty) {
        Some(Type::Pointer(elem)) => *elem,
        _ => ty,
    }
}

/// Visit the visible fields and methods of `root` and of everything it
/// embeds, breadth-first. For each member the visitor also receives the
/// selector type used for documentation attribution. Returning `false`
/// from the visitor stops the entire walk.
///
/// Members are visible when exported or when their owner belongs to
/// `main_pkg`. Within one type the order is fields (declaration order),
/// then methods (declaration order), then recursion into embedded
/// struct-shaped fields in field order.
pub fn walk_members(
    store: &TypeStore,
    root: TypeId,
    main_pkg: &str,
    mut visit: impl FnMut(Member<'_>, TypeId) -> bool,
) {
    let mut visited: HashSet<TypeId> = HashSet::new();
    let mut emitted: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<(TypeId, TypeId)> = VecDeque::new();

    if store.named(root).is_none() {
        return;
    }
    visited.insert(root);
    queue.push_back((root, root));

    while let Some((named, selector)) = queue.pop_front() {
        let Some(info) = store.named(named) else {
            continue;
        };
        let owner_pkg = info.pkg_path.clone();
        let member_visible =
            |name: &str| is_exported(name) || owner_pkg == main_pkg;

        // Non-struct-shaped underlying types contribute nothing.
        let fields: &[FieldInfo] = match info.underlying.and_then(|u| store.get(u)) {
            Some(Type::Struct { fields }) => fields,
            _ => continue,
        };

        for field in fields {
            if !member_visible(&field.name) || emitted.contains(&field.name) {
                continue;
            }
            emitted.insert(field.name.clone());
            if !visit(Member::Field(field), selector) {
                return;
            }
        }

        for method in &info.methods {
            if !member_visible(&method.name) || emitted.contains(&method.name) {
                continue;
            }
            emitted.insert(method.name.clone());
            if !visit(Member::Method(method), selector) {
                return;
            }
        }

        for field in fields {
            if !field.embedded {
                continue;
            }
            let embedded = unwrap_pointer(store, field.ty);
            if store.named(embedded).is_none() || !visited.insert(embedded) {
                continue;
            }
            // Selector attribution: an implicit class overrides the
            // chain; otherwise keep the outermost still-visible type.
            let child_selector = if is_implicit_class(store, embedded) {
                embedded
            } else if named_visible(store, selector, main_pkg) {
                selector
            } else {
                embedded
            };
            queue.push_back((embedded, child_selector));
        }
    }
}
