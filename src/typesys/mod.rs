//! Semantic type model: an arena-backed store plus the identity,
//! assignability and interface-satisfaction predicates the relation
//! evaluator builds on.
//!
//! Types reference each other by [`TypeId`], so recursive and mutually
//! embedding types are representable without interior mutability; named
//! types are declared first and get their underlying type attached once
//! the frontend has resolved it.

pub mod members;
pub mod relate;

pub use members::{IMPLICIT_CLASSES, Member, is_exported, walk_members};
pub use relate::{compatible, convertible};

use crate::types::{ObjectId, TypeId};

/// Predeclared basic kinds, including the untyped constant kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasicKind {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
    String,
    UntypedBool,
    UntypedInt,
    UntypedFloat,
    UntypedString,
}

impl BasicKind {
    pub fn is_numeric(self) -> bool {
        use BasicKind::*;
        matches!(
            self,
            Int | Int8
                | Int16
                | Int32
                | Int64
                | Uint
                | Uint8
                | Uint16
                | Uint32
                | Uint64
                | Float32
                | Float64
                | UntypedInt
                | UntypedFloat
        )
    }

    pub fn is_float(self) -> bool {
        matches!(
            self,
            BasicKind::Float32 | BasicKind::Float64 | BasicKind::UntypedFloat
        )
    }

    pub fn is_boolean(self) -> bool {
        matches!(self, BasicKind::Bool | BasicKind::UntypedBool)
    }

    pub fn is_string(self) -> bool {
        matches!(self, BasicKind::String | BasicKind::UntypedString)
    }

    pub fn is_untyped(self) -> bool {
        use BasicKind::*;
        matches!(self, UntypedBool | UntypedInt | UntypedFloat | UntypedString)
    }
}

/// Channel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

/// One function parameter.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: TypeId,
}

/// A function type: parameters and result types.
#[derive(Debug, Clone, Default)]
pub struct Signature {
    pub params: Vec<Param>,
    pub results: Vec<TypeId>,
}

/// A struct field. Embedded fields carry the embedded type's name.
#[derive(Debug, Clone)]
pub struct FieldInfo {
    pub name: String,
    pub ty: TypeId,
    pub embedded: bool,
    pub doc: Option<String>,
}

/// A method bound to a named type, or an interface method.
#[derive(Debug, Clone)]
pub struct MethodInfo {
    pub name: String,
    pub sig: TypeId,
    pub doc: Option<String>,
}

/// A declared (named) type.
#[derive(Debug, Clone)]
pub struct NamedInfo {
    pub name: String,
    pub pkg_path: String,
    /// Set once the frontend resolves the declaration; `None` only during
    /// construction of recursive groups.
    pub underlying: Option<TypeId>,
    pub methods: Vec<MethodInfo>,
}

/// The type sum. `Overload` is the attached-object list of an overload
/// group marker parameter and never appears in user-facing type output.
#[derive(Debug, Clone)]
pub enum Type {
    Basic(BasicKind),
    Pointer(TypeId),
    Slice(TypeId),
    Chan { dir: ChanDir, elem: TypeId },
    Signature(Signature),
    Struct { fields: Vec<FieldInfo> },
    Interface { methods: Vec<MethodInfo> },
    Named(NamedInfo),
    Overload(Vec<ObjectId>),
}

/// Arena of types for one semantic bundle.
#[derive(Debug, Clone, Default)]
pub struct TypeStore {
    types: Vec<Type>,
}

impl TypeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ty: Type) -> TypeId {
        self.types.push(ty);
        TypeId(self.types.len() as u32 - 1)
    }

    pub fn basic(&mut self, kind: BasicKind) -> TypeId {
        self.insert(Type::Basic(kind))
    }

    /// Declare a named type with its underlying type still unresolved.
    pub fn declare_named(&mut self, name: impl Into<String>, pkg_path: impl Into<String>) -> TypeId {
        self.insert(Type::Named(NamedInfo {
            name: name.into(),
            pkg_path: pkg_path.into(),
            underlying: None,
            methods: Vec::new(),
        }))
    }

    pub fn set_underlying(&mut self, named: TypeId, underlying: TypeId) {
        if let Some(Type::Named(info)) = self.types.get_mut(named.0 as usize) {
            info.underlying = Some(underlying);
        }
    }

    pub fn add_method(&mut self, named: TypeId, method: MethodInfo) {
        if let Some(Type::Named(info)) = self.types.get_mut(named.0 as usize) {
            info.methods.push(method);
        }
    }

    pub fn get(&self, id: TypeId) -> Option<&Type> {
        self.types.get(id.0 as usize)
    }

    pub fn named(&self, id: TypeId) -> Option<&NamedInfo> {
        match self.get(id)? {
            Type::Named(info) => Some(info),
            _ => None,
        }
    }

    /// Resolve through named types to the structural underlying type.
    pub fn underlying(&self, id: TypeId) -> Option<TypeId> {
        let mut cur = id;
        // Named chains are short; the bound only guards malformed input.
        for _ in 0..64 {
            match self.get(cur)? {
                Type::Named(info) => cur = info.underlying?,
                _ => return Some(cur),
            }
        }
        None
    }

    pub fn basic_kind(&self, id: TypeId) -> Option<BasicKind> {
        match self.get(self.underlying(id)?)? {
            Type::Basic(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Look up a method by name on a named type, a pointer to one, or an
    /// interface.
    pub fn method(&self, id: TypeId, name: &str) -> Option<&MethodInfo> {
        match self.get(id)? {
            Type::Pointer(elem) => self.method(*elem, name),
            Type::Named(info) => match info.methods.iter().find(|m| m.name == name) {
                Some(m) => Some(m),
                None => match self.get(info.underlying?)? {
                    Type::Interface { methods } => methods.iter().find(|m| m.name == name),
                    _ => None,
                },
            },
            Type::Interface { methods } => methods.iter().find(|m| m.name == name),
            _ => None,
        }
    }
}

/// Type identity. Named types are identical only to themselves (nominal
/// identity); everything else compares structurally. Mutually recursive
/// types terminate because named comparison never recurses.
pub fn identical(store: &TypeStore, a: TypeId, b: TypeId) -> bool {
    if a == b {
        return true;
    }
    let (Some(ta), Some(tb)) = (store.get(a), store.get(b)) else {
        return false;
    };
    match (ta, tb) {
        (Type::Basic(ka), Type::Basic(kb)) => ka == kb,
        (Type::Pointer(ea), Type::Pointer(eb)) => identical(store, *ea, *eb),
        (Type::Slice(ea), Type::Slice(eb)) => identical(store, *ea, *eb),
        (
            Type::Chan { dir: da, elem: ea },
            Type::Chan { dir: db, elem: eb },
        ) => da == db && identical(store, *ea, *eb),
        (Type::Signature(sa), Type::Signature(sb)) => {
            sa.params.len() == sb.params.len()
                && sa.results.len() == sb.results.len()
                && sa
                    .params
                    .iter()
                    .zip(&sb.params)
                    .all(|(p, q)| identical(store, p.ty, q.ty))
                && sa
                    .results
                    .iter()
                    .zip(&sb.results)
                    .all(|(&r, &s)| identical(store, r, s))
        }
        (Type::Struct { fields: fa }, Type::Struct { fields: fb }) => {
            fa.len() == fb.len()
                && fa.iter().zip(fb).all(|(f, g)| {
                    f.name == g.name && f.embedded == g.embedded && identical(store, f.ty, g.ty)
                })
        }
        (Type::Interface { methods: ma }, Type::Interface { methods: mb }) => {
            ma.len() == mb.len()
                && ma
                    .iter()
                    .zip(mb)
                    .all(|(m, n)| m.name == n.name && identical(store, m.sig, n.sig))
        }
        // Named identity is the `a == b` fast path above.
        _ => false,
    }
}

/// Interface satisfaction: every method of `iface` exists on `t` with an
/// identical signature. The empty interface is satisfied by everything.
pub fn implements(store: &TypeStore, t: TypeId, iface: TypeId) -> bool {
    let Some(under) = store.underlying(iface) else {
        return false;
    };
    let Some(Type::Interface { methods }) = store.get(under) else {
        return false;
    };
    methods.iter().all(|want| match store.method(t, &want.name) {
        Some(got) => identical(store, got.sig, want.sig),
        None => false,
    })
}

/// Assignability under the host type system: identity, untyped-constant
/// widening, interface satisfaction, and unnamed-type structural identity.
pub fn assignable(store: &TypeStore, got: TypeId, want: TypeId) -> bool {
    if identical(store, got, want) {
        return true;
    }
    let (Some(tg), Some(tw)) = (store.get(got), store.get(want)) else {
        return false;
    };

    // Untyped constants widen to any basic type of their category.
    if let Type::Basic(kg) = tg
        && kg.is_untyped()
        && let Some(kw) = store.basic_kind(want)
    {
        let ok = match kg {
            BasicKind::UntypedInt => kw.is_numeric(),
            BasicKind::UntypedFloat => kw.is_float(),
            BasicKind::UntypedBool => kw.is_boolean(),
            BasicKind::UntypedString => kw.is_string(),
            _ => false,
        };
        if ok {
            return true;
        }
    }

    if implements(store, got, want) {
        return true;
    }

    // x is assignable when the types share an underlying type and at
    // least one side is unnamed.
    let got_named = matches!(tg, Type::Named(_));
    let want_named = matches!(tw, Type::Named(_));
    if !(got_named && want_named)
        && let (Some(ug), Some(uw)) = (store.underlying(got), store.underlying(want))
        && identical(store, ug, uw)
    {
        return true;
    }
    false
}
