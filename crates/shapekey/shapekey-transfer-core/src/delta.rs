//! Per-vertex displacement computation.

use glam::Vec3;

use crate::error::{Result, TransferError};
use crate::selection::VertexSelection;

/// Displacements of a deformed pose relative to its base pose.
///
/// Dense storage; excluded vertices hold `None` and must not be applied.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeltaField {
    deltas: Vec<Option<Vec3>>,
    computed: usize,
}

impl DeltaField {
    /// Vertex count the field was computed over.
    #[inline]
    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    /// Number of vertices that received a delta.
    #[inline]
    pub fn computed(&self) -> usize {
        self.computed
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<Vec3> {
        self.deltas.get(index).copied().flatten()
    }

    /// Iterate `(index, delta)` over computed vertices only.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Vec3)> + '_ {
        self.deltas
            .iter()
            .enumerate()
            .filter_map(|(i, d)| d.map(|d| (i, d)))
    }

    /// Write `base[i] + delta[i]` into `out` for every computed vertex.
    pub fn apply_onto(&self, base: &[Vec3], out: &mut [Vec3]) -> Result<usize> {
        if base.len() != self.len() || out.len() != self.len() {
            return Err(TransferError::invariant(format!(
                "delta field covers {} vertices, base has {}, output has {}",
                self.len(),
                base.len(),
                out.len()
            )));
        }
        for (i, delta) in self.iter() {
            out[i] = base[i] + delta;
        }
        Ok(self.computed)
    }
}

/// Compute `deformed[i] - base[i]` for every vertex admitted by `selection`.
///
/// Both slices come from the same mesh, so a length mismatch is an
/// `InvariantViolation` rather than a user error.
pub fn compute_delta(
    base: &[Vec3],
    deformed: &[Vec3],
    selection: &VertexSelection,
) -> Result<DeltaField> {
    if base.len() != deformed.len() {
        return Err(TransferError::invariant(format!(
            "base pose has {} vertices but deformed pose has {}",
            base.len(),
            deformed.len()
        )));
    }

    let mut computed = 0;
    let deltas = base
        .iter()
        .zip(deformed)
        .enumerate()
        .map(|(i, (b, d))| {
            if selection.contains(i) {
                computed += 1;
                Some(*d - *b)
            } else {
                None
            }
        })
        .collect();

    Ok(DeltaField { deltas, computed })
}
