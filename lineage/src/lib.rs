pub mod branch;
pub mod graph;
pub mod registered_graphs;
pub mod tag_set;

pub use branch::{branch_end, branch_start, is_branch_start};
pub use graph::{Cell, CellId, Descendants, GraphError, LineageGraph};
pub use registered_graphs::{CorrespondenceError, RegisteredGraphs};
pub use tag_set::TagSet;
