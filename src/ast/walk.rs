//! Enclosing-path queries over one file's AST.

use super::Ast;
use crate::types::{NodeId, Pos};

/// Traversal order for [`walk_enclosing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Leaf to root (the path's natural order).
    InnermostFirst,
    /// Root to leaf.
    OutermostFirst,
}

fn covers(ast: &Ast, id: NodeId, start: Pos, end: Pos) -> bool {
    match ast.get(id) {
        Some(node) => node.pos.is_valid() && node.pos <= start && end <= node.end,
        None => false,
    }
}

/// Ordered sequence of nodes enclosing the interval `[start, end]`,
/// innermost first. `start == end` is a point query and still resolves to
/// the innermost containing node, typically an identifier or leaf token.
///
/// When the interval is invalid the path is empty; when it is valid but
/// outside every construct in the file, the path holds just the root.
pub fn path_enclosing(ast: &Ast, root: NodeId, start: Pos, end: Pos) -> Vec<NodeId> {
    if !start.is_valid() || !end.is_valid() || end < start || ast.get(root).is_none() {
        return Vec::new();
    }
    let mut path = vec![root];
    if !covers(ast, root, start, end) {
        return path;
    }
    let mut cur = root;
    loop {
        let next = ast
            .children(cur)
            .into_iter()
            .find(|&c| covers(ast, c, start, end));
        match next {
            Some(c) => {
                path.push(c);
                cur = c;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

/// First node on `path` satisfying `pred`, visited in the requested
/// direction. Used to find the nearest enclosing node of a given variant
/// (nearest return statement, nearest function, nearest block).
pub fn walk_enclosing(
    path: &[NodeId],
    direction: Direction,
    mut pred: impl FnMut(NodeId) -> bool,
) -> Option<NodeId> {
    match direction {
        Direction::InnermostFirst => path.iter().copied().find(|&n| pred(n)),
        Direction::OutermostFirst => path.iter().rev().copied().find(|&n| pred(n)),
    }
}
