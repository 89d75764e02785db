//! Pure doc-model builders for the package-export pipeline.
//!
//! Two variants exist for the two dialect flavors: the plain variant
//! documents a package the way the host language would, and the
//! class-file variant treats every file as an implicit class named after
//! the file, with the file's first `var (...)` group reinterpreted as
//! that class's fields. Both are plain AST walks: no type information,
//! no I/O.

use crate::ast::{Ast, DeclGroupKind, NodeKind};
use crate::mangle::{parse_overload_name, split_template_method};
use crate::types::NodeId;
use crate::typesys::is_exported;
use serde::{Deserialize, Serialize};

/// Documentation for one exported constant or variable (or class field).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueDoc {
    pub name: String,
    pub doc: Option<String>,
}

/// Documentation for one function or method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuncDoc {
    pub name: String,
    pub doc: Option<String>,
}

/// Documentation for one named type with its fields and methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TypeDoc {
    pub name: String,
    pub doc: Option<String>,
    pub fields: Vec<ValueDoc>,
    pub methods: Vec<FuncDoc>,
}

/// The nested package documentation structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PackageDoc {
    pub name: String,
    pub doc: Option<String>,
    pub consts: Vec<ValueDoc>,
    pub vars: Vec<ValueDoc>,
    pub types: Vec<TypeDoc>,
    pub funcs: Vec<FuncDoc>,
}

impl PackageDoc {
    fn type_doc(&mut self, name: &str) -> &mut TypeDoc {
        if let Some(i) = self.types.iter().position(|t| t.name == name) {
            return &mut self.types[i];
        }
        self.types.push(TypeDoc {
            name: name.to_string(),
            ..TypeDoc::default()
        });
        self.types.last_mut().unwrap()
    }
}

/// Presentation name for a method: overload-group members fold their
/// discriminant away, everything else keeps its source spelling.
fn method_display_name(name: &str) -> String {
    match parse_overload_name(name) {
        (base, Some(_)) => base,
        _ => name.to_string(),
    }
}

fn spec_values(ast: &Ast, spec: NodeId, group_doc: &Option<String>, out: &mut Vec<ValueDoc>) {
    let Some(data) = ast.get(spec) else { return };
    let NodeKind::ValueSpec { names, doc, .. } = &data.kind else {
        return;
    };
    for &name_id in names {
        let Some(name) = ast.ident_name(name_id) else {
            continue;
        };
        if !is_exported(name) {
            continue;
        }
        out.push(ValueDoc {
            name: name.to_string(),
            doc: doc.clone().or_else(|| group_doc.clone()),
        });
    }
}

fn struct_field_docs(ast: &Ast, ty: NodeId) -> Vec<ValueDoc> {
    let Some(data) = ast.get(ty) else {
        return Vec::new();
    };
    let NodeKind::StructType { fields } = &data.kind else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for &field in fields {
        let Some(NodeKind::Field { names, .. }) = ast.get(field).map(|d| &d.kind) else {
            continue;
        };
        for &name_id in names {
            if let Some(name) = ast.ident_name(name_id)
                && is_exported(name)
            {
                out.push(ValueDoc {
                    name: name.to_string(),
                    doc: None,
                });
            }
        }
    }
    out
}

fn receiver_type_name<'a>(ast: &'a Ast, recv: NodeId) -> Option<&'a str> {
    let NodeKind::Field { ty, .. } = &ast.get(recv)?.kind else {
        return None;
    };
    let mut ty = (*ty)?;
    if let NodeKind::Unary { op: '*', x } = &ast.get(ty)?.kind {
        ty = *x;
    }
    ast.ident_name(ty)
}

fn add_func(doc: &mut PackageDoc, ast: &Ast, decl: NodeId) {
    let Some(NodeKind::FuncDecl {
        name,
        recv,
        doc: func_doc,
        ..
    }) = ast.get(decl).map(|d| &d.kind)
    else {
        return;
    };
    let Some(fname) = ast.ident_name(*name) else {
        return;
    };

    if let Some(recv) = recv {
        if let Some(recv_ty) = receiver_type_name(ast, *recv)
            && is_exported(fname)
        {
            doc.type_doc(recv_ty).methods.push(FuncDoc {
                name: method_display_name(fname),
                doc: func_doc.clone(),
            });
        }
        return;
    }

    // A template-method mangled name documents as a method of its
    // receiver type, not as a package-level function.
    if let Some((recv_ty, method)) = split_template_method(fname, true) {
        doc.type_doc(recv_ty).methods.push(FuncDoc {
            name: method_display_name(method),
            doc: func_doc.clone(),
        });
        return;
    }

    if is_exported(fname) {
        doc.funcs.push(FuncDoc {
            name: fname.to_string(),
            doc: func_doc.clone(),
        });
    }
}

fn add_decl(doc: &mut PackageDoc, ast: &Ast, decl: NodeId) {
    let Some(data) = ast.get(decl) else { return };
    match &data.kind {
        NodeKind::DeclGroup {
            kind,
            specs,
            doc: group_doc,
        } => match kind {
            DeclGroupKind::Const => {
                for &spec in specs {
                    spec_values(ast, spec, group_doc, &mut doc.consts);
                }
            }
            DeclGroupKind::Var => {
                for &spec in specs {
                    spec_values(ast, spec, group_doc, &mut doc.vars);
                }
            }
            DeclGroupKind::Type => {
                for &spec in specs {
                    let Some(NodeKind::TypeSpec {
                        name,
                        ty,
                        doc: spec_doc,
                    }) = ast.get(spec).map(|d| &d.kind)
                    else {
                        continue;
                    };
                    let Some(tname) = ast.ident_name(*name) else {
                        continue;
                    };
                    if !is_exported(tname) {
                        continue;
                    }
                    let fields = struct_field_docs(ast, *ty);
                    let entry = doc.type_doc(tname);
                    entry.doc = spec_doc.clone().or_else(|| group_doc.clone());
                    entry.fields = fields;
                }
            }
        },
        NodeKind::FuncDecl { .. } => add_func(doc, ast, decl),
        _ => {}
    }
}

/// Build the doc model for a plain (class-sugar-free) package from its
/// parsed files, given as (file name, file root) pairs over one arena.
pub fn package_doc(pkg_name: &str, ast: &Ast, units: &[(&str, NodeId)]) -> PackageDoc {
    let mut doc = PackageDoc {
        name: pkg_name.to_string(),
        ..PackageDoc::default()
    };
    for &(_, root) in units {
        let Some(NodeKind::File { decls, doc: file_doc, .. }) = ast.get(root).map(|d| &d.kind)
        else {
            continue;
        };
        if doc.doc.is_none() {
            doc.doc = file_doc.clone();
        }
        for &decl in decls {
            add_decl(&mut doc, ast, decl);
        }
    }
    doc
}

/// File stem used as the implicit class name: `Bullet.spx` -> `Bullet`.
fn class_name(file: &str) -> &str {
    let base = file.rsplit('/').next().unwrap_or(file);
    base.split_once('.').map(|(stem, _)| stem).unwrap_or(base)
}

/// Build the doc model for a class-based (`.spx`-style) package: every
/// file implicitly defines a class named after the file, the file's
/// first `var (...)` group becomes that class's fields rather than
/// package-level variables, and the file's plain functions become its
/// methods. Class members are user code in the entry package, so they
/// are documented regardless of exportedness.
pub fn class_package_doc(pkg_name: &str, ast: &Ast, units: &[(&str, NodeId)]) -> PackageDoc {
    let mut doc = PackageDoc {
        name: pkg_name.to_string(),
        ..PackageDoc::default()
    };
    for &(file, root) in units {
        let Some(NodeKind::File { decls, doc: file_doc, .. }) = ast.get(root).map(|d| &d.kind)
        else {
            continue;
        };
        let mut class = TypeDoc {
            name: class_name(file).to_string(),
            doc: file_doc.clone(),
            ..TypeDoc::default()
        };
        let mut saw_var_group = false;

        for &decl in decls {
            let Some(data) = ast.get(decl) else { continue };
            match &data.kind {
                NodeKind::DeclGroup {
                    kind: DeclGroupKind::Var,
                    specs,
                    doc: group_doc,
                } if !saw_var_group => {
                    saw_var_group = true;
                    for &spec in specs {
                        let Some(NodeKind::ValueSpec { names, doc: d, .. }) =
                            ast.get(spec).map(|s| &s.kind)
                        else {
                            continue;
                        };
                        for &name_id in names {
                            if let Some(name) = ast.ident_name(name_id) {
                                class.fields.push(ValueDoc {
                                    name: name.to_string(),
                                    doc: d.clone().or_else(|| group_doc.clone()),
                                });
                            }
                        }
                    }
                }
                NodeKind::FuncDecl {
                    name,
                    recv: None,
                    doc: func_doc,
                    ..
                } => {
                    if let Some(fname) = ast.ident_name(*name) {
                        class.methods.push(FuncDoc {
                            name: method_display_name(fname),
                            doc: func_doc.clone(),
                        });
                    }
                }
                _ => add_decl(&mut doc, ast, decl),
            }
        }
        doc.types.push(class);
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Pos;

    struct Builder {
        ast: Ast,
        at: u32,
    }

    impl Builder {
        fn new() -> Self {
            Self {
                ast: Ast::new(),
                at: 1,
            }
        }

        fn span(&mut self, width: u32) -> (Pos, Pos) {
            let pos = Pos(self.at);
            self.at += width;
            (pos, Pos(self.at))
        }

        fn ident(&mut self, name: &str) -> NodeId {
            let (pos, end) = self.span(name.len() as u32);
            self.ast.alloc(
                NodeKind::Ident {
                    name: name.to_string(),
                },
                pos,
                end,
            )
        }

        fn value_spec(&mut self, names: &[&str], doc: Option<&str>) -> NodeId {
            let names: Vec<NodeId> = names.iter().map(|n| self.ident(n)).collect();
            let (pos, end) = self.span(10);
            self.ast.alloc(
                NodeKind::ValueSpec {
                    names,
                    ty: None,
                    values: vec![],
                    doc: doc.map(str::to_string),
                },
                pos,
                end,
            )
        }

        fn group(&mut self, kind: DeclGroupKind, specs: Vec<NodeId>, doc: Option<&str>) -> NodeId {
            let (pos, end) = self.span(10);
            self.ast.alloc(
                NodeKind::DeclGroup {
                    kind,
                    specs,
                    doc: doc.map(str::to_string),
                },
                pos,
                end,
            )
        }

        fn func(&mut self, name: &str, recv: Option<&str>, doc: Option<&str>) -> NodeId {
            let name = self.ident(name);
            let recv = recv.map(|r| {
                let ty = self.ident(r);
                let (pos, end) = self.span(r.len() as u32);
                self.ast.alloc(
                    NodeKind::Field {
                        names: vec![],
                        ty: Some(ty),
                    },
                    pos,
                    end,
                )
            });
            let (pos, end) = self.span(4);
            let func_type = self.ast.alloc(
                NodeKind::FuncType {
                    params: vec![],
                    results: vec![],
                },
                pos,
                end,
            );
            let (pos, end) = self.span(20);
            self.ast.alloc(
                NodeKind::FuncDecl {
                    name,
                    recv,
                    func_type,
                    body: None,
                    doc: doc.map(str::to_string),
                },
                pos,
                end,
            )
        }

        fn file(&mut self, decls: Vec<NodeId>) -> NodeId {
            self.file_with_doc(decls, None)
        }

        fn file_with_doc(&mut self, decls: Vec<NodeId>, doc: Option<&str>) -> NodeId {
            let (pos, end) = self.span(100);
            self.ast.alloc(
                NodeKind::File {
                    package: "main".to_string(),
                    decls,
                    doc: doc.map(str::to_string),
                },
                pos,
                end,
            )
        }
    }

    #[test]
    fn plain_package_exports_only() {
        let mut b = Builder::new();
        let c = b.value_spec(&["MaxLives", "minLives"], None);
        let consts = b.group(DeclGroupKind::Const, vec![c], Some("limits"));
        let v = b.value_spec(&["Score"], Some("current score"));
        let vars = b.group(DeclGroupKind::Var, vec![v], None);
        let f = b.func("Reset", None, Some("Reset restarts the game."));
        let hidden = b.func("tick", None, None);
        let root = b.file(vec![consts, vars, f, hidden]);

        let doc = package_doc("game", &b.ast, &[("game.gop", root)]);
        assert_eq!(doc.name, "game");
        assert_eq!(
            doc.consts,
            vec![ValueDoc {
                name: "MaxLives".to_string(),
                doc: Some("limits".to_string()),
            }]
        );
        assert_eq!(doc.vars[0].name, "Score");
        assert_eq!(doc.vars[0].doc.as_deref(), Some("current score"));
        assert_eq!(doc.funcs.len(), 1);
        assert_eq!(doc.funcs[0].name, "Reset");
    }

    #[test]
    fn methods_attach_to_their_type() {
        let mut b = Builder::new();
        let name = b.ident("Sprite");
        let (pos, end) = b.span(10);
        let fields = {
            let fname = b.ident("Width");
            let hidden = b.ident("speed");
            let (fpos, fend) = b.span(5);
            let f1 = b.ast.alloc(
                NodeKind::Field {
                    names: vec![fname, hidden],
                    ty: None,
                },
                fpos,
                fend,
            );
            vec![f1]
        };
        let strukt = b.ast.alloc(NodeKind::StructType { fields }, pos, end);
        let (pos, end) = b.span(10);
        let spec = b.ast.alloc(
            NodeKind::TypeSpec {
                name,
                ty: strukt,
                doc: Some("A sprite.".to_string()),
            },
            pos,
            end,
        );
        let group = b.group(DeclGroupKind::Type, vec![spec], None);
        let m = b.func("Move__a", Some("Sprite"), None);
        let tpl = b.func("Gopt_Sprite_Clone", None, None);
        let root = b.file(vec![group, m, tpl]);

        let doc = package_doc("spx", &b.ast, &[("sprite.gop", root)]);
        assert_eq!(doc.types.len(), 1);
        let ty = &doc.types[0];
        assert_eq!(ty.name, "Sprite");
        assert_eq!(ty.doc.as_deref(), Some("A sprite."));
        assert_eq!(ty.fields, vec![ValueDoc { name: "Width".to_string(), doc: None }]);
        let methods: Vec<&str> = ty.methods.iter().map(|m| m.name.as_str()).collect();
        // Overload discriminant folded, template method attached.
        assert_eq!(methods, vec!["move", "Clone"]);
    }

    #[test]
    fn class_variant_reinterprets_first_var_group() {
        let mut b = Builder::new();
        let fields = b.value_spec(&["hp", "speed"], None);
        let first = b.group(DeclGroupKind::Var, vec![fields], None);
        let later = b.value_spec(&["Debug"], None);
        let second = b.group(DeclGroupKind::Var, vec![later], None);
        let on_start = b.func("onStart", None, None);
        let root = b.file_with_doc(vec![first, second, on_start], Some("A bullet sprite."));

        let doc = class_package_doc("main", &b.ast, &[("Bullet.spx", root)]);
        let class = doc.types.iter().find(|t| t.name == "Bullet").unwrap();
        assert_eq!(class.doc.as_deref(), Some("A bullet sprite."));
        let fields: Vec<&str> = class.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(fields, vec!["hp", "speed"]);
        let methods: Vec<&str> = class.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(methods, vec!["onStart"]);
        // The second var group stays package-level, exported filter on.
        let vars: Vec<&str> = doc.vars.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(vars, vec!["Debug"]);
    }

    #[test]
    fn doc_model_serializes() {
        let mut b = Builder::new();
        let f = b.func("Run", None, None);
        let root = b.file(vec![f]);
        let doc = package_doc("demo", &b.ast, &[("demo.gop", root)]);
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["name"], "demo");
        assert_eq!(json["funcs"][0]["name"], "Run");
    }
}
