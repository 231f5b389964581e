use std::sync::Arc;

use hashbrown::HashMap;

use crate::branch::is_branch_start;
use crate::graph::{CellId, LineageGraph};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CorrespondenceError {
    #[error("Cell {cell} is not part of graph \"{graph}\"")]
    UnknownCell { graph: String, cell: CellId },
    #[error("Cell {cell} of graph \"{graph}\" is not the start of a branch")]
    NotBranchStart { graph: String, cell: CellId },
    #[error("Cell {0} of graph A is mapped more than once")]
    DuplicateSource(CellId),
    #[error("Cell {0} of graph B is the target of more than one mapping")]
    DuplicateTarget(CellId),
}

/// Two lineage graphs and a partial one-to-one mapping between their branches.
///
/// Keys are branch-start cells of graph A, values branch-start cells of graph B.
/// The mapping is produced by an external matching step and never changes
/// afterwards; clones and [`reversed`](Self::reversed) views share it.
#[derive(Debug, Clone)]
pub struct RegisteredGraphs {
    graph_a: Arc<LineageGraph>,
    graph_b: Arc<LineageGraph>,
    map_ab: Arc<HashMap<CellId, CellId>>,
    map_ba: Arc<HashMap<CellId, CellId>>,
}

impl RegisteredGraphs {
    pub fn new<P>(
        graph_a: Arc<LineageGraph>,
        graph_b: Arc<LineageGraph>,
        pairs: P,
    ) -> Result<Self, CorrespondenceError>
    where
        P: IntoIterator<Item = (CellId, CellId)>,
    {
        let mut map_ab = HashMap::new();
        let mut map_ba = HashMap::new();

        for (cell_a, cell_b) in pairs {
            validate_branch_start(&graph_a, cell_a)?;
            validate_branch_start(&graph_b, cell_b)?;

            if map_ab.insert(cell_a, cell_b).is_some() {
                return Err(CorrespondenceError::DuplicateSource(cell_a));
            }
            if map_ba.insert(cell_b, cell_a).is_some() {
                return Err(CorrespondenceError::DuplicateTarget(cell_b));
            }
        }

        tracing::debug!(
            "Correspondence between \"{}\" and \"{}\" with {} mapped branches",
            graph_a.name(),
            graph_b.name(),
            map_ab.len()
        );

        Ok(Self {
            graph_a,
            graph_b,
            map_ab: Arc::new(map_ab),
            map_ba: Arc::new(map_ba),
        })
    }

    pub fn graph_a(&self) -> &Arc<LineageGraph> {
        &self.graph_a
    }

    pub fn graph_b(&self) -> &Arc<LineageGraph> {
        &self.graph_b
    }

    /// Branch of graph B that corresponds to the branch starting at `cell_a`.
    pub fn get(&self, cell_a: CellId) -> Option<CellId> {
        self.map_ab.get(&cell_a).copied()
    }

    /// Same correspondence seen from graph B.
    pub fn reversed(&self) -> Self {
        Self {
            graph_a: Arc::clone(&self.graph_b),
            graph_b: Arc::clone(&self.graph_a),
            map_ab: Arc::clone(&self.map_ba),
            map_ba: Arc::clone(&self.map_ab),
        }
    }

    pub fn len(&self) -> usize {
        self.map_ab.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map_ab.is_empty()
    }

    /// Mapped pairs in the insertion order of graph A.
    pub fn iter(&self) -> impl Iterator<Item = (CellId, CellId)> + '_ {
        self.graph_a
            .cells()
            .filter_map(|cell| self.get(cell.id).map(|cell_b| (cell.id, cell_b)))
    }

    /// Pairs whose cells are roots in their respective graphs.
    pub fn paired_roots(&self) -> Vec<(CellId, CellId)> {
        self.iter()
            .filter(|&(cell_a, cell_b)| self.graph_a.is_root(cell_a) && self.graph_b.is_root(cell_b))
            .collect()
    }
}

fn validate_branch_start(graph: &LineageGraph, cell: CellId) -> Result<(), CorrespondenceError> {
    if !graph.contains(cell) {
        return Err(CorrespondenceError::UnknownCell {
            graph: graph.name().to_string(),
            cell,
        });
    }
    if !is_branch_start(graph, cell) {
        return Err(CorrespondenceError::NotBranchStart {
            graph: graph.name().to_string(),
            cell,
        });
    }

    Ok(())
}
