use hashbrown::HashMap;

use crate::graph::{CellId, GraphError};

/// Named group of tags. A cell carries at most one tag of a tag set.
#[derive(Debug, Clone, Default)]
pub struct TagSet {
    name: String,
    labels: Vec<String>,
    // parallel to `labels`, cells in assignment order
    tagged: Vec<Vec<CellId>>,
    tag_by_cell: HashMap<CellId, usize>,
}

impl TagSet {
    /// Duplicate labels keep their first occurrence.
    pub fn new<L>(name: impl Into<String>, labels: L) -> Self
    where
        L: IntoIterator,
        L::Item: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for label in labels.into_iter().map(Into::into) {
            if !unique.contains(&label) {
                unique.push(label);
            }
        }

        Self {
            name: name.into(),
            tagged: vec![Vec::new(); unique.len()],
            labels: unique,
            tag_by_cell: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.label_index(label).is_some()
    }

    pub fn tag_of(&self, cell: CellId) -> Option<&str> {
        self.tag_by_cell
            .get(&cell)
            .map(|&idx| self.labels[idx].as_str())
    }

    /// Cells carrying `label`. Empty for unknown labels.
    pub fn cells_with_tag(&self, label: &str) -> &[CellId] {
        self.label_index(label)
            .map(|idx| self.tagged[idx].as_slice())
            .unwrap_or_default()
    }

    pub(crate) fn assign(&mut self, cell: CellId, label: &str) -> Result<(), GraphError> {
        let idx = self
            .label_index(label)
            .ok_or_else(|| GraphError::UnknownTag {
                tag_set: self.name.clone(),
                label: label.to_string(),
            })?;

        if let Some(previous) = self.tag_by_cell.insert(cell, idx) {
            self.tagged[previous].retain(|&tagged| tagged != cell);
        }
        self.tagged[idx].push(cell);

        Ok(())
    }

    fn label_index(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }
}
