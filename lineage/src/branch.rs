//! Branch traversal.
//!
//! A branch is a maximal run of cells with one parent and at most one child.
//! It starts at a root or right after a division and ends at a leaf or right
//! before the next division. Branches are not stored; they are recovered by
//! walking the graph from any of their cells.

use crate::graph::{CellId, LineageGraph};

/// First cell of the branch containing `cell`.
///
/// Walks backward while the current cell has exactly one parent and that
/// parent has exactly one child.
pub fn branch_start(graph: &LineageGraph, cell: CellId) -> CellId {
    let mut current = cell;
    loop {
        let &[parent] = graph.incoming(current) else {
            return current;
        };
        if graph.outgoing(parent).len() != 1 {
            return current;
        }
        current = parent;
    }
}

/// Last cell of the branch containing `cell`.
///
/// Walks forward while the current cell has exactly one child.
pub fn branch_end(graph: &LineageGraph, cell: CellId) -> CellId {
    let mut current = cell;
    while let &[child] = graph.outgoing(current) {
        current = child;
    }
    current
}

pub fn is_branch_start(graph: &LineageGraph, cell: CellId) -> bool {
    branch_start(graph, cell) == cell
}
