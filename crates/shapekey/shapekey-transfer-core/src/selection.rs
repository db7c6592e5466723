//! Vertex selection used to gate which deltas are copied.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Set of vertex indices taken from the source mesh.
///
/// An empty index set means "all vertices": `Only` always holds at least one
/// index, whether built through `from_indices`, `from_mask` or serde.
/// Indices past the end of a mesh are ignored; a selection never changes
/// array length.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SelectionDoc", into = "SelectionDoc")]
pub enum VertexSelection {
    #[default]
    All,
    Only(SelectedIndices),
}

/// Non-empty, ordered vertex indices. Only constructible through
/// `VertexSelection`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedIndices(BTreeSet<usize>);

impl SelectedIndices {
    /// Number of indices, including any past the end of a mesh.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }
}

impl VertexSelection {
    /// Build from a set of indices. An empty set selects every vertex.
    pub fn from_indices<I>(indices: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let set: BTreeSet<usize> = indices.into_iter().collect();
        if set.is_empty() {
            VertexSelection::All
        } else {
            VertexSelection::Only(SelectedIndices(set))
        }
    }

    /// Build from a per-vertex selection flag array.
    pub fn from_mask(mask: &[bool]) -> Self {
        Self::from_indices(
            mask.iter()
                .enumerate()
                .filter_map(|(i, selected)| selected.then_some(i)),
        )
    }

    #[inline]
    pub fn is_all(&self) -> bool {
        matches!(self, VertexSelection::All)
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        match self {
            VertexSelection::All => true,
            VertexSelection::Only(set) => set.0.contains(&index),
        }
    }

    /// Number of selected indices that fall inside a mesh of `vertex_count`.
    pub fn len_within(&self, vertex_count: usize) -> usize {
        match self {
            VertexSelection::All => vertex_count,
            VertexSelection::Only(set) => set.0.range(..vertex_count).count(),
        }
    }
}

/// Wire form: `{"type":"All"}` or `{"type":"Only","indices":[..]}`.
#[derive(Serialize, Deserialize)]
#[serde(tag = "type", content = "indices")]
enum SelectionDoc {
    All,
    Only(BTreeSet<usize>),
}

impl From<SelectionDoc> for VertexSelection {
    fn from(doc: SelectionDoc) -> Self {
        match doc {
            SelectionDoc::All => VertexSelection::All,
            SelectionDoc::Only(set) => VertexSelection::from_indices(set),
        }
    }
}

impl From<VertexSelection> for SelectionDoc {
    fn from(selection: VertexSelection) -> Self {
        match selection {
            VertexSelection::All => SelectionDoc::All,
            VertexSelection::Only(set) => SelectionDoc::Only(set.0),
        }
    }
}
