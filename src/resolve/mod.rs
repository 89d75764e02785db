//! Position → identifier resolution.
//!
//! `ident_at` answers "which identifier is under this cursor". Candidates
//! are collected per line from the definition and use tables (implicit
//! identifiers filtered out), then matched against the query column with
//! an end-exclusive span and span-minimal tie-breaking, so overlapping
//! identifiers resolve to the most specific token. Line candidate sets
//! are cached in a concurrent map: simultaneous queries against different
//! lines populate independent entries without serializing each other.

use crate::ast::NodeKind;
use crate::semantic::{Semantics, SourceUnit};
use crate::types::{Location, NodeId, ObjectId, Pos};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

/// A resolved identifier occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentRef {
    pub node: NodeId,
    pub name: String,
    pub object: ObjectId,
    pub pos: Pos,
    pub end: Pos,
    pub is_definition: bool,
}

/// One identifier occurrence on a line, with its rendered column span
/// (1-based start, exclusive end).
#[derive(Debug, Clone)]
pub(crate) struct LineCandidate {
    node: NodeId,
    name: String,
    object: ObjectId,
    pos: Pos,
    end: Pos,
    start_col: u32,
    end_col: u32,
    is_definition: bool,
}

impl LineCandidate {
    fn to_ref(&self) -> IdentRef {
        IdentRef {
            node: self.node,
            name: self.name.clone(),
            object: self.object,
            pos: self.pos,
            end: self.end,
            is_definition: self.is_definition,
        }
    }
}

/// Per-line candidate cache, keyed by (file index, 1-based line).
#[derive(Debug, Default)]
pub(crate) struct LineCache {
    lines: DashMap<(usize, u32), Arc<Vec<LineCandidate>>>,
}

impl Semantics {
    /// The identifier at `loc`, resolved against the file `loc` names.
    /// Returns `None` on any invalid input; this is a query, not a
    /// validating API.
    pub fn ident_at(&self, loc: &Location) -> Option<IdentRef> {
        let unit = self.unit_by_name(&loc.file)?;
        self.ident_at_in(unit, loc)
    }

    /// Like [`Semantics::ident_at`], but scoped to one file: a location
    /// naming a different file is rejected outright.
    pub fn ident_at_in_file(&self, file: &str, loc: &Location) -> Option<IdentRef> {
        if loc.file != file {
            return None;
        }
        let unit = self.unit_by_name(file)?;
        self.ident_at_in(unit, loc)
    }

    fn ident_at_in(&self, unit: &SourceUnit, loc: &Location) -> Option<IdentRef> {
        let file = self.fileset.file(unit.file_index)?;
        if loc.line == 0 || loc.line > file.line_count() {
            return None;
        }
        let candidates = self.line_candidates(unit, loc.line);

        // Tightest span covering the column wins; equal spans keep the
        // first-discovered candidate.
        let mut best: Option<&LineCandidate> = None;
        for cand in candidates.iter() {
            if cand.start_col > loc.column || loc.column >= cand.end_col {
                continue;
            }
            let span = cand.end_col - cand.start_col;
            if best.is_none_or(|b| span < b.end_col - b.start_col) {
                best = Some(cand);
            }
        }
        let found = best.map(|c| c.to_ref());
        debug!(file = %loc.file, line = loc.line, column = loc.column, hit = found.is_some(), "ident_at");
        found
    }

    /// The unique defining identifier of `object`, or `None` when the
    /// object is invalid or was never defined by a source identifier.
    pub fn defining_ident(&self, object: ObjectId) -> Option<IdentRef> {
        let obj = self.info.object(object)?;
        if !obj.pos.is_valid() {
            return None;
        }
        let node = self.info.defining_node(object)?;
        let (pos, end) = self.ast.span(node);
        let name = self
            .ast
            .ident_name(node)
            .unwrap_or(&obj.name)
            .to_string();
        Some(IdentRef {
            node,
            name,
            object,
            pos,
            end,
            is_definition: true,
        })
    }

    /// All referencing occurrences of `object`, in file traversal order.
    /// The defining occurrence is never among them.
    pub fn referencing_idents(&self, object: ObjectId) -> Vec<IdentRef> {
        if self.info.object(object).is_none() {
            return Vec::new();
        }
        self.info
            .uses()
            .iter()
            .filter(|&&(_, o)| o == object)
            .map(|&(node, o)| {
                let (pos, end) = self.ast.span(node);
                let name = self
                    .ast
                    .ident_name(node)
                    .unwrap_or_default()
                    .to_string();
                IdentRef {
                    node,
                    name,
                    object: o,
                    pos,
                    end,
                    is_definition: false,
                }
            })
            .collect()
    }

    /// Identifier candidates on one line, cached. Cache entries are
    /// immutable once inserted; concurrent population of different lines
    /// proceeds independently.
    fn line_candidates(&self, unit: &SourceUnit, line: u32) -> Arc<Vec<LineCandidate>> {
        let key = (unit.file_index, line);
        if let Some(cached) = self.line_idents.lines.get(&key) {
            return cached.clone();
        }
        let built = Arc::new(self.collect_line_candidates(unit, line));
        self.line_idents
            .lines
            .entry(key)
            .or_insert(built)
            .clone()
    }

    fn collect_line_candidates(&self, unit: &SourceUnit, line: u32) -> Vec<LineCandidate> {
        let Some(file) = self.fileset.file(unit.file_index) else {
            return Vec::new();
        };
        let Some((lo_off, hi_off)) = file.line_range(line) else {
            return Vec::new();
        };
        let lo = file.pos(lo_off);
        let hi = Pos(file.base() + hi_off);

        let in_line = |pos: Pos| pos.is_valid() && lo <= pos && pos < hi;
        let mut out = Vec::new();

        let mut push_ident = |node: NodeId, object: ObjectId, is_definition: bool| {
            let Some(data) = self.ast.get(node) else {
                return;
            };
            if !in_line(data.pos) || self.ast.is_implicit(node) {
                return;
            }
            let Some(name) = self.ast.ident_name(node) else {
                return;
            };
            let Some(loc) = file.location(data.pos) else {
                return;
            };
            let width = data.end.value().saturating_sub(data.pos.value());
            out.push(LineCandidate {
                node,
                name: name.to_string(),
                object,
                pos: data.pos,
                end: data.end,
                start_col: loc.column,
                end_col: loc.column + width,
                is_definition,
            });
        };

        for &(node, object) in self.info.defs() {
            push_ident(node, object, true);
        }
        for &(node, object) in self.info.uses() {
            // An identifier whose definition is itself implicit stays
            // invisible on the referencing side too.
            let def_implicit = self
                .info
                .defining_node(object)
                .is_some_and(|d| self.ast.is_implicit(d));
            if def_implicit {
                continue;
            }
            push_ident(node, object, false);
        }

        // A branch keyword that resolves to a callable is clickable at
        // the keyword itself; synthesize a reference spanning it.
        for (node, object) in self.info.branch_targets() {
            let Some(data) = self.ast.get(node) else {
                continue;
            };
            if !in_line(data.pos) {
                continue;
            }
            let NodeKind::Branch { kind, .. } = &data.kind else {
                continue;
            };
            let keyword = kind.keyword();
            let Some(loc) = file.location(data.pos) else {
                continue;
            };
            out.push(LineCandidate {
                node,
                name: keyword.to_string(),
                object,
                pos: data.pos,
                end: Pos(data.pos.value() + keyword.len() as u32),
                start_col: loc.column,
                end_col: loc.column + keyword.len() as u32,
                is_definition: false,
            });
        }
        out
    }
}
