//! Decoding of the dialect's compiler-generated name manglings: template
//! methods (`Gopt_Recv_Method`), type-parameterized functions
//! (`Gopx_Func`), overload-group names (`Name__x`), and the overload
//! marker signature shape. Pure string and shape inspection, no semantic
//! lookups.

use crate::types::{ObjectId, TypeId};
use crate::typesys::{Type, TypeStore};

/// Prefix of a method encoded as a package-level template function.
pub const TEMPLATE_METHOD_PREFIX: &str = "Gopt_";

/// Prefix of a type-parameterized function name.
pub const TYPE_PARAM_FUNC_PREFIX: &str = "Gopx_";

/// Name of the marker parameter identifying an overload group
/// placeholder function.
pub const OVERLOAD_ARGS_PARAM: &str = "__gop_overload_args__";

/// Split a template-method name into (receiver type, method name).
///
/// The name must start with [`TEMPLATE_METHOD_PREFIX`]; the remainder is
/// cut at the first following separator. With `trim_type_params`, a
/// method name that is itself a `Gopx_`-mangled function is unwrapped
/// once more.
pub fn split_template_method(name: &str, trim_type_params: bool) -> Option<(&str, &str)> {
    let rest = name.strip_prefix(TEMPLATE_METHOD_PREFIX)?;
    let (recv, method) = rest.split_once('_')?;
    let method = if trim_type_params {
        method.strip_prefix(TYPE_PARAM_FUNC_PREFIX).unwrap_or(method)
    } else {
        method
    };
    Some((recv, method))
}

/// Strip the type-parameterized-function prefix. An exact-prefix-only
/// name yields an empty but valid function name.
pub fn split_type_param_func(name: &str) -> Option<&str> {
    name.strip_prefix(TYPE_PARAM_FUNC_PREFIX)
}

/// Parse an overload-group member name.
///
/// A trailing `__<c>` with a single lowercase-alphanumeric discriminant
/// is split off; the base name is case-folded for presentation. Anything
/// else (including an uppercase or multi-character suffix) is left
/// intact and folded whole.
pub fn parse_overload_name(name: &str) -> (String, Option<char>) {
    let bytes = name.as_bytes();
    if bytes.len() > 3 && &bytes[bytes.len() - 3..bytes.len() - 1] == b"__" {
        let c = bytes[bytes.len() - 1] as char;
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            return (to_camel(&name[..name.len() - 3]), Some(c));
        }
    }
    (to_camel(name), None)
}

/// Pascal→camel fold used when presenting mangled names: ASCII-only,
/// lowercases exactly the first byte, leaves the rest unchanged.
pub fn to_camel(name: &str) -> String {
    match name.as_bytes().first() {
        Some(b) if b.is_ascii_uppercase() => {
            let mut out = String::with_capacity(name.len());
            out.push(b.to_ascii_lowercase() as char);
            out.push_str(&name[1..]);
            out
        }
        _ => name.to_string(),
    }
}

fn marker_param(store: &TypeStore, func: TypeId) -> Option<TypeId> {
    let Some(Type::Signature(sig)) = store.get(func) else {
        return None;
    };
    let [param] = sig.params.as_slice() else {
        return None;
    };
    if param.name != OVERLOAD_ARGS_PARAM {
        return None;
    }
    Some(param.ty)
}

/// Whether `func` (a signature type) is an overload group placeholder:
/// a single parameter carrying the fixed marker name.
pub fn is_overload_expandable(store: &TypeStore, func: TypeId) -> bool {
    marker_param(store, func).is_some()
}

/// The constituent concrete functions of an overload group.
///
/// Returns `None` both for non-placeholder functions and for the
/// degenerate placeholder with an empty attached object list — callers
/// treat that case as a single opaque callable rather than an empty
/// overload set.
pub fn expand_overloads(store: &TypeStore, func: TypeId) -> Option<Vec<ObjectId>> {
    let marker = marker_param(store, func)?;
    match store.get(marker) {
        Some(Type::Overload(objects)) if !objects.is_empty() => Some(objects.clone()),
        _ => None,
    }
}
