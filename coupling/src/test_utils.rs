use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use glam::DVec3;
use lineage::{CellId, LineageGraph, RegisteredGraphs};

use crate::session::{CellListener, Session};

/// Cells of one fixture embryo.
///
/// ```text
/// root - mid -+- left - left_child
///             +- right
/// orphan
/// ```
#[derive(Debug, Clone, Copy)]
pub(crate) struct Embryo {
    pub root: CellId,
    pub mid: CellId,
    pub left: CellId,
    pub left_child: CellId,
    pub right: CellId,
    pub orphan: CellId,
}

fn embryo(name: &str) -> (LineageGraph, Embryo) {
    let mut graph = LineageGraph::new(name);
    let root = graph.add_cell(0, DVec3::ZERO, "AB");
    let mid = graph.add_cell(1, DVec3::X, "AB");
    let left = graph.add_cell(2, DVec3::new(1.0, 1.0, 0.0), "ABa");
    let left_child = graph.add_cell(3, DVec3::new(1.0, 2.0, 0.0), "ABa");
    let right = graph.add_cell(2, DVec3::new(1.0, -1.0, 0.0), "ABp");
    let orphan = graph.add_cell(0, DVec3::Z, "P1");
    graph.add_edge(root, mid).unwrap();
    graph.add_edge(mid, left).unwrap();
    graph.add_edge(left, left_child).unwrap();
    graph.add_edge(mid, right).unwrap();

    (
        graph,
        Embryo {
            root,
            mid,
            left,
            left_child,
            right,
            orphan,
        },
    )
}

/// Two sessions over twin embryos whose daughters are mapped crosswise.
/// The orphans are left unmapped.
pub(crate) struct Twins {
    pub session_a: Arc<Session>,
    pub session_b: Arc<Session>,
    pub graphs: RegisteredGraphs,
    pub a: Embryo,
    pub b: Embryo,
}

pub(crate) fn twins() -> Twins {
    let (graph_a, a) = embryo("A");
    let (graph_b, b) = embryo("B");
    let graph_a = Arc::new(graph_a);
    let graph_b = Arc::new(graph_b);

    let graphs = RegisteredGraphs::new(
        Arc::clone(&graph_a),
        Arc::clone(&graph_b),
        [(a.root, b.root), (a.left, b.right), (a.right, b.left)],
    )
    .unwrap();

    Twins {
        session_a: Arc::new(Session::new("session A", graph_a)),
        session_b: Arc::new(Session::new("session B", graph_b)),
        graphs,
        a,
        b,
    }
}

pub(crate) fn counting_listener() -> (Arc<AtomicUsize>, CellListener) {
    let count = Arc::new(AtomicUsize::new(0));
    let listener: CellListener = {
        let count = Arc::clone(&count);
        Arc::new(move |_| {
            count.fetch_add(1, Ordering::SeqCst);
        })
    };
    (count, listener)
}
