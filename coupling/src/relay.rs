use std::sync::Arc;

use lineage::{branch_start, CellId, RegisteredGraphs};

use crate::hook::SpotHook;
use crate::session::CellListener;

/// Forwards a cell of graph A to the corresponding branch of graph B.
///
/// The relay direction is fixed by the orientation of `graphs`; use
/// [`RegisteredGraphs::reversed`] for the way back.
pub struct BranchMapRelay {
    graphs: RegisteredGraphs,
    target: Arc<dyn SpotHook>,
}

impl BranchMapRelay {
    pub fn new(graphs: RegisteredGraphs, target: Arc<dyn SpotHook>) -> Self {
        Self { graphs, target }
    }

    /// Start of the mapped branch containing `cell`, if that branch is mapped.
    pub fn map(&self, cell: Option<CellId>) -> Option<CellId> {
        let start = branch_start(self.graphs.graph_a(), cell?);
        self.graphs.get(start)
    }

    pub fn relay(&self, cell: Option<CellId>) {
        let mapped = self.map(cell);
        tracing::debug!(
            "Relay \"{}\" -> \"{}\": {:?} -> {:?}",
            self.graphs.graph_a().name(),
            self.graphs.graph_b().name(),
            cell,
            mapped
        );

        self.target.set(mapped);
    }

    pub fn into_listener(self) -> CellListener {
        Arc::new(move |cell| self.relay(cell))
    }
}

impl std::fmt::Debug for BranchMapRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BranchMapRelay")
            .field("from", &self.graphs.graph_a().name())
            .field("to", &self.graphs.graph_b().name())
            .finish()
    }
}
