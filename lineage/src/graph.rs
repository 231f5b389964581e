use glam::DVec3;
use hashbrown::{HashMap, HashSet};

use crate::tag_set::TagSet;
use common::id_type;

id_type!(CellId);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("Cell {0} does not belong to this graph")]
    UnknownCell(CellId),
    #[error("Cell {0} cannot be its own parent")]
    SelfLoop(CellId),
    #[error("Edge {parent} -> {child} already exists")]
    DuplicateEdge { parent: CellId, child: CellId },
    #[error("Tag set \"{0}\" already exists")]
    DuplicateTagSet(String),
    #[error("Tag set \"{0}\" does not exist")]
    UnknownTagSet(String),
    #[error("Tag set \"{tag_set}\" has no tag \"{label}\"")]
    UnknownTag { tag_set: String, label: String },
}

/// A tracked cell at one timepoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub id: CellId,
    pub timepoint: u32,
    pub position: DVec3,
    pub label: String,
}

#[derive(Debug, Clone, Default)]
struct Links {
    incoming: Vec<CellId>,
    outgoing: Vec<CellId>,
}

/// Forest of cells connected by parent -> child division edges.
///
/// Cells are kept in insertion order; every iteration over the graph follows
/// that order, which keeps registration results independent of hashing.
#[derive(Debug, Clone, Default)]
pub struct LineageGraph {
    name: String,
    cells: Vec<Cell>,
    links: Vec<Links>,
    index_by_id: HashMap<CellId, usize>,
    tag_sets: Vec<TagSet>,
}

impl LineageGraph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_cell(&mut self, timepoint: u32, position: DVec3, label: impl Into<String>) -> CellId {
        let id = CellId::unique();
        self.index_by_id.insert(id, self.cells.len());
        self.cells.push(Cell {
            id,
            timepoint,
            position,
            label: label.into(),
        });
        self.links.push(Links::default());

        id
    }

    pub fn add_edge(&mut self, parent: CellId, child: CellId) -> Result<(), GraphError> {
        let parent_idx = self.index_of(parent)?;
        let child_idx = self.index_of(child)?;
        if parent_idx == child_idx {
            return Err(GraphError::SelfLoop(parent));
        }
        if self.links[parent_idx].outgoing.contains(&child) {
            return Err(GraphError::DuplicateEdge { parent, child });
        }

        self.links[parent_idx].outgoing.push(child);
        self.links[child_idx].incoming.push(parent);

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, id: CellId) -> bool {
        self.index_by_id.contains_key(&id)
    }

    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.index_by_id.get(&id).map(|&idx| &self.cells[idx])
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter()
    }

    pub fn position(&self, id: CellId) -> Option<DVec3> {
        self.cell(id).map(|cell| cell.position)
    }

    /// Parents of `id`. Empty for roots and for cells outside the graph.
    pub fn incoming(&self, id: CellId) -> &[CellId] {
        self.index_by_id
            .get(&id)
            .map(|&idx| self.links[idx].incoming.as_slice())
            .unwrap_or_default()
    }

    /// Children of `id`. Empty for leaves and for cells outside the graph.
    pub fn outgoing(&self, id: CellId) -> &[CellId] {
        self.index_by_id
            .get(&id)
            .map(|&idx| self.links[idx].outgoing.as_slice())
            .unwrap_or_default()
    }

    pub fn is_root(&self, id: CellId) -> bool {
        self.contains(id) && self.incoming(id).is_empty()
    }

    pub fn roots(&self) -> impl Iterator<Item = CellId> + '_ {
        self.cells
            .iter()
            .zip(self.links.iter())
            .filter(|(_, links)| links.incoming.is_empty())
            .map(|(cell, _)| cell.id)
    }

    /// `id` followed by every cell reachable through outgoing edges, depth-first.
    pub fn descendants(&self, id: CellId) -> Descendants<'_> {
        let stack = if self.contains(id) { vec![id] } else { vec![] };
        Descendants {
            graph: self,
            stack,
            visited: HashSet::new(),
        }
    }

    pub fn max_timepoint(&self) -> Option<u32> {
        self.cells.iter().map(|cell| cell.timepoint).max()
    }

    pub fn num_timepoints(&self) -> usize {
        self.max_timepoint().map_or(0, |max| max as usize + 1)
    }

    pub fn add_tag_set<L>(&mut self, name: impl Into<String>, labels: L) -> Result<(), GraphError>
    where
        L: IntoIterator,
        L::Item: Into<String>,
    {
        let name = name.into();
        if self.tag_set(&name).is_some() {
            return Err(GraphError::DuplicateTagSet(name));
        }

        self.tag_sets.push(TagSet::new(name, labels));
        Ok(())
    }

    pub fn tag_set(&self, name: &str) -> Option<&TagSet> {
        self.tag_sets.iter().find(|tag_set| tag_set.name() == name)
    }

    pub fn tag_sets(&self) -> &[TagSet] {
        &self.tag_sets
    }

    pub fn tag_cell(&mut self, tag_set: &str, label: &str, cell: CellId) -> Result<(), GraphError> {
        if !self.contains(cell) {
            return Err(GraphError::UnknownCell(cell));
        }

        let set = self
            .tag_sets
            .iter_mut()
            .find(|set| set.name() == tag_set)
            .ok_or_else(|| GraphError::UnknownTagSet(tag_set.to_string()))?;

        set.assign(cell, label)
    }

    fn index_of(&self, id: CellId) -> Result<usize, GraphError> {
        self.index_by_id
            .get(&id)
            .copied()
            .ok_or(GraphError::UnknownCell(id))
    }
}

/// Depth-first walk over a cell and its descendants.
///
/// Children are visited in the order their edges were added. A cell reachable
/// along several paths is yielded once.
#[derive(Debug)]
pub struct Descendants<'a> {
    graph: &'a LineageGraph,
    stack: Vec<CellId>,
    visited: HashSet<CellId>,
}

impl Iterator for Descendants<'_> {
    type Item = CellId;

    fn next(&mut self) -> Option<CellId> {
        while let Some(id) = self.stack.pop() {
            if !self.visited.insert(id) {
                continue;
            }
            let graph = self.graph;
            self.stack.extend(graph.outgoing(id).iter().rev().copied());
            return Some(id);
        }

        None
    }
}
