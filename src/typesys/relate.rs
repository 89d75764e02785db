//! The two relation procedures the editor layer asks about: direct
//! compatibility (can this value stand where that type is wanted) and
//! practical convertibility (is suggesting an explicit conversion
//! useful). Both are pure and total over valid type ids; an unknown id on
//! either side answers `false`.

use super::{BasicKind, Type, TypeStore, assignable, identical, implements};
use crate::types::TypeId;

/// Whether a value of type `got` fits a context wanting `want`.
///
/// Assignability answers most cases; the remainder dispatches on the
/// shape of `want` and models the dialect's auto-addressing and
/// single-result call unwrapping. The relation is deliberately not
/// symmetric: `compatible(int, *int)` holds (the pointee matches) while
/// `compatible(*int, int)` does not.
pub fn compatible(store: &TypeStore, got: TypeId, want: TypeId) -> bool {
    let (Some(tg), Some(tw)) = (store.get(got), store.get(want)) else {
        return false;
    };
    if assignable(store, got, want) {
        return true;
    }

    match tw {
        Type::Interface { .. } => return implements(store, got, want),
        Type::Pointer(w_elem) => {
            return match tg {
                Type::Pointer(g_elem) => identical(store, *g_elem, *w_elem),
                // Auto-addressing context: the value itself may match the
                // pointee.
                _ => identical(store, got, *w_elem),
            };
        }
        Type::Slice(w_elem) => {
            if let Type::Slice(g_elem) = tg {
                return identical(store, *g_elem, *w_elem);
            }
            return false;
        }
        Type::Chan {
            dir: w_dir,
            elem: w_elem,
        } => {
            if let Type::Chan {
                dir: g_dir,
                elem: g_elem,
            } = tg
            {
                return identical(store, *g_elem, *w_elem)
                    && (*w_dir == super::ChanDir::Both || w_dir == g_dir);
            }
            return false;
        }
        Type::Signature(w_sig) => {
            if let Type::Signature(g_sig) = tg {
                if g_sig.results.len() != w_sig.results.len() {
                    return false;
                }
                if g_sig.results.is_empty() {
                    return true;
                }
                // Single-value context: a call's lone result stands in
                // for the value itself.
                return compatible(store, g_sig.results[0], w_sig.results[0]);
            }
            return false;
        }
        _ => {}
    }

    // A call result in a non-signature context unwraps when it is the
    // only result.
    if let Type::Signature(g_sig) = tg {
        return g_sig.results.len() == 1 && compatible(store, g_sig.results[0], want);
    }

    // A named type not matched above only fits its exact self.
    if matches!(tg, Type::Named(_)) {
        return identical(store, got, want);
    }
    false
}

/// Whether suggesting an explicit conversion `to(from)` is useful.
///
/// Starts from the host system's convertibility and narrows it: a
/// conversion that is legal but practically meaningless for a user-facing
/// suggestion (numeric↔string, bool↔anything else) answers `false`.
pub fn convertible(store: &TypeStore, from: TypeId, to: TypeId) -> bool {
    if store.get(from).is_none() || store.get(to).is_none() {
        return false;
    }

    let core = assignable(store, from, to)
        || matches!(
            (store.underlying(from), store.underlying(to)),
            (Some(uf), Some(ut)) if identical(store, uf, ut)
        )
        || matches!(
            (store.basic_kind(from), store.basic_kind(to)),
            (Some(bf), Some(bt)) if basic_convertible(bf, bt)
        );
    if !core {
        return false;
    }

    // Practical-usefulness narrowing, applied through named types.
    if let (Some(bf), Some(bt)) = (store.basic_kind(from), store.basic_kind(to)) {
        if (bf.is_numeric() && bt.is_string()) || (bf.is_string() && bt.is_numeric()) {
            return false;
        }
        if bf.is_boolean() != bt.is_boolean() {
            return false;
        }
    }
    true
}

/// Raw basic-kind convertibility before narrowing. Numeric kinds convert
/// freely among each other (including int↔float across widths); the host
/// language additionally allows numeric→string, which narrowing removes.
fn basic_convertible(from: BasicKind, to: BasicKind) -> bool {
    if from == to {
        return true;
    }
    if from.is_numeric() && to.is_numeric() {
        return true;
    }
    if from.is_numeric() && to.is_string() {
        return true;
    }
    from.is_string() && to.is_string() || from.is_boolean() && to.is_boolean()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typesys::{ChanDir, MethodInfo, Param, Signature};

    fn store_with_ints() -> (TypeStore, TypeId, TypeId) {
        let mut store = TypeStore::new();
        let int = store.basic(BasicKind::Int);
        let string = store.basic(BasicKind::String);
        (store, int, string)
    }

    #[test]
    fn compatible_is_reflexive() {
        let (mut store, int, string) = store_with_ints();
        let ptr = store.insert(Type::Pointer(int));
        let slice = store.insert(Type::Slice(string));
        for t in [int, string, ptr, slice] {
            assert!(compatible(&store, t, t));
        }
    }

    #[test]
    fn pointer_rule_is_asymmetric() {
        let (mut store, int, _) = store_with_ints();
        let ptr_int = store.insert(Type::Pointer(int));
        assert!(compatible(&store, int, ptr_int));
        assert!(!compatible(&store, ptr_int, int));
    }

    #[test]
    fn slice_requires_identical_elements() {
        let (mut store, int, string) = store_with_ints();
        let s_int = store.insert(Type::Slice(int));
        let s_int2 = store.insert(Type::Slice(int));
        let s_str = store.insert(Type::Slice(string));
        assert!(compatible(&store, s_int, s_int2));
        assert!(!compatible(&store, s_int, s_str));
        assert!(!compatible(&store, int, s_int));
    }

    #[test]
    fn chan_direction_compatibility() {
        let (mut store, int, _) = store_with_ints();
        let bidi = store.insert(Type::Chan {
            dir: ChanDir::Both,
            elem: int,
        });
        let send = store.insert(Type::Chan {
            dir: ChanDir::Send,
            elem: int,
        });
        let recv = store.insert(Type::Chan {
            dir: ChanDir::Recv,
            elem: int,
        });
        // want bidirectional accepts anything with matching elements
        assert!(compatible(&store, send, bidi));
        assert!(compatible(&store, recv, bidi));
        // exact direction match
        assert!(compatible(&store, send, send));
        assert!(!compatible(&store, send, recv));
    }

    #[test]
    fn single_result_call_unwraps() {
        let (mut store, int, string) = store_with_ints();
        let returns_int = store.insert(Type::Signature(Signature {
            params: vec![Param {
                name: "s".to_string(),
                ty: string,
            }],
            results: vec![int],
        }));
        assert!(compatible(&store, returns_int, int));
        assert!(!compatible(&store, returns_int, string));

        let returns_two = store.insert(Type::Signature(Signature {
            params: vec![],
            results: vec![int, string],
        }));
        assert!(!compatible(&store, returns_two, int));
    }

    #[test]
    fn signature_wants_match_by_first_result() {
        let (mut store, int, _) = store_with_ints();
        let nullary = store.insert(Type::Signature(Signature::default()));
        let nullary2 = store.insert(Type::Signature(Signature::default()));
        assert!(compatible(&store, nullary, nullary2));

        let f_int = store.insert(Type::Signature(Signature {
            params: vec![],
            results: vec![int],
        }));
        let g_int = store.insert(Type::Signature(Signature {
            params: vec![Param {
                name: "x".to_string(),
                ty: int,
            }],
            results: vec![int],
        }));
        assert!(compatible(&store, f_int, g_int));
        assert!(!compatible(&store, nullary, f_int));
    }

    #[test]
    fn interface_want_uses_satisfaction() {
        let (mut store, int, _) = store_with_ints();
        let sig = store.insert(Type::Signature(Signature::default()));
        let closer = store.insert(Type::Interface {
            methods: vec![MethodInfo {
                name: "Close".to_string(),
                sig,
                doc: None,
            }],
        });
        let strukt = store.insert(Type::Struct { fields: vec![] });
        let file = store.declare_named("File", "os");
        store.set_underlying(file, strukt);
        store.add_method(
            file,
            MethodInfo {
                name: "Close".to_string(),
                sig,
                doc: None,
            },
        );
        assert!(compatible(&store, file, closer));
        assert!(!compatible(&store, int, closer));
    }

    #[test]
    fn convertible_numeric_widths() {
        let mut store = TypeStore::new();
        let int32 = store.basic(BasicKind::Int32);
        let int64 = store.basic(BasicKind::Int64);
        let float32 = store.basic(BasicKind::Float32);
        let float64 = store.basic(BasicKind::Float64);
        let int = store.basic(BasicKind::Int);
        assert!(convertible(&store, int32, int64));
        assert!(convertible(&store, float32, float64));
        assert!(convertible(&store, int, float64));
        assert!(convertible(&store, float64, int));
    }

    #[test]
    fn convertible_excludes_meaningless_pairs() {
        let mut store = TypeStore::new();
        let int = store.basic(BasicKind::Int);
        let string = store.basic(BasicKind::String);
        let boolean = store.basic(BasicKind::Bool);
        assert!(!convertible(&store, int, string));
        assert!(!convertible(&store, string, int));
        assert!(!convertible(&store, boolean, int));
        assert!(!convertible(&store, int, boolean));
        assert!(!convertible(&store, boolean, string));
        assert!(!convertible(&store, string, boolean));
    }

    #[test]
    fn convertible_named_and_underlying() {
        let mut store = TypeStore::new();
        let int = store.basic(BasicKind::Int);
        let my_int = store.declare_named("MyInt", "main");
        store.set_underlying(my_int, int);
        assert!(convertible(&store, my_int, int));
        assert!(convertible(&store, int, my_int));

        // Narrowing still applies through the named wrapper.
        let string = store.basic(BasicKind::String);
        assert!(!convertible(&store, my_int, string));
    }
}
