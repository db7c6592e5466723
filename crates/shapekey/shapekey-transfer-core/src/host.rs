//! Host accessor traits.
//!
//! The engine never reaches into a scene graph. Hosts (a DCC add-on, an
//! importer, the in-memory `MemoryMesh`) implement these traits for one mesh
//! and hand the engine a source and a target.

use glam::Vec3;

use crate::driver::{DriverDefinition, DriverId, DriverKind, TargetField, TargetValue, VariableKind};
use crate::path::ChannelPath;
use crate::selection::VertexSelection;

/// Name of the channel holding the undeformed reference pose.
pub const BASIS: &str = "Basis";

/// Vertex data of a mesh.
pub trait MeshAccess {
    fn vertex_count(&self) -> usize;

    /// Current undeformed vertex positions, one per vertex.
    fn base_positions(&self) -> Vec<Vec3>;

    /// Vertices selected in the host UI. Read-only input.
    fn selected_vertex_indices(&self) -> VertexSelection;

    /// Ask the host to recompute geometry derived from the mesh.
    fn mark_dirty(&mut self);
}

/// Named deformation channels of a mesh.
pub trait ChannelStore {
    /// Channel names in insertion order; `"Basis"` first when present.
    fn channel_names(&self) -> Vec<String>;

    fn has_channel(&self, name: &str) -> bool {
        self.channel_positions(name).is_some()
    }

    fn channel_positions(&self, name: &str) -> Option<&[Vec3]>;

    /// Create a channel. Callers only invoke this for absent names.
    fn create_channel(&mut self, name: &str, initial: Vec<Vec3>);

    /// Replace the positions of an existing channel. Returns false when the
    /// channel is missing or the length differs from the vertex count.
    fn set_channel_positions(&mut self, name: &str, positions: Vec<Vec3>) -> bool;

    fn weight(&self, name: &str) -> Option<f32>;

    /// Returns false when the channel is missing.
    fn set_weight(&mut self, name: &str, weight: f32) -> bool;

    /// True when at least one channel other than `"Basis"` exists.
    fn has_deforming_channels(&self) -> bool {
        self.channel_names().iter().any(|n| n != BASIS)
    }
}

/// Driver definitions attached to a mesh's channels.
pub trait DriverStore {
    fn list_drivers(&self) -> Vec<(DriverId, DriverDefinition)>;

    /// Add an empty driver of `kind` on `path`.
    fn add_driver(&mut self, path: &ChannelPath, kind: DriverKind) -> DriverId;

    fn set_expression(&mut self, driver: DriverId, expression: &str);

    /// Append a variable; returns its index, or `None` if the driver is gone.
    fn add_variable(&mut self, driver: DriverId, name: &str, kind: VariableKind)
        -> Option<usize>;

    /// Number of target slots on a variable (zero if it does not exist).
    fn target_slots(&self, driver: DriverId, variable: usize) -> usize;

    /// Kind of an existing variable.
    fn variable_kind(&self, driver: DriverId, variable: usize) -> Option<VariableKind>;

    /// Whether a field of a target slot accepts assignment. Queried before
    /// every `set_target_field`; rejected fields are skipped.
    fn supports_field(
        &self,
        driver: DriverId,
        variable: usize,
        slot: usize,
        field: TargetField,
    ) -> bool {
        slot < self.target_slots(driver, variable)
            && self
                .variable_kind(driver, variable)
                .is_some_and(|kind| kind.supports_field(field))
    }

    fn set_target_field(&mut self, driver: DriverId, variable: usize, slot: usize, value: TargetValue);

    fn remove_driver(&mut self, driver: DriverId) -> bool;
}

/// Everything the engine needs from one mesh.
pub trait MeshHandle: MeshAccess + ChannelStore + DriverStore {}

impl<T: MeshAccess + ChannelStore + DriverStore + ?Sized> MeshHandle for T {}
