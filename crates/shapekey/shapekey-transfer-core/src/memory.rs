//! In-memory mesh implementing every host accessor.
//!
//! Serves as the reference host: tests, fixtures and benches drive the
//! engine through it. JSON layout:
//!
//! ```json
//! {
//!   "name": "Head",
//!   "vertices": [[0,0,0], [1,0,0]],
//!   "selected": [1],
//!   "channels": [
//!     { "name": "Basis" },
//!     { "name": "Smile", "weight": 0.5, "offsets": [{ "index": 1, "offset": [0,1,0] }] }
//!   ],
//!   "drivers": [{ "target_path": "key_blocks[\"Smile\"].value", "kind": "SCRIPTED", "expression": "var" }]
//! }
//! ```
//!
//! A channel without `positions` starts at the mesh vertices; `offsets`
//! are added on top.

use glam::Vec3;
use hashbrown::HashSet;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::driver::{
    DriverDefinition, DriverId, DriverKind, DriverVariable, TargetField, TargetValue, VariableKind,
};
use crate::host::{ChannelStore, DriverStore, MeshAccess, BASIS};
use crate::path::ChannelPath;
use crate::selection::VertexSelection;

#[derive(Clone, Debug, PartialEq)]
struct Channel {
    positions: Vec<Vec3>,
    weight: f32,
}

#[derive(Clone, Debug, Default)]
pub struct MemoryMesh {
    pub name: String,
    vertices: Vec<Vec3>,
    selected: Vec<usize>,
    channels: IndexMap<String, Channel>,
    drivers: Vec<(DriverId, DriverDefinition)>,
    next_driver: u32,
    restricted: HashSet<TargetField>,
    dirty: usize,
}

impl MemoryMesh {
    pub fn new(vertices: Vec<Vec3>) -> Self {
        Self {
            vertices,
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Add a channel (Basis goes first) and set its weight.
    pub fn with_channel(mut self, name: &str, positions: Vec<Vec3>, weight: f32) -> Self {
        self.create_channel(name, positions);
        self.set_weight(name, weight);
        self
    }

    pub fn with_driver(mut self, def: DriverDefinition) -> Self {
        self.push_driver(def);
        self
    }

    /// Mark vertices as selected in the host UI.
    pub fn select<I: IntoIterator<Item = usize>>(&mut self, indices: I) {
        self.selected = indices.into_iter().collect();
    }

    /// Replace the vertex array, e.g. after remeshing.
    pub fn set_vertices(&mut self, vertices: Vec<Vec3>) {
        self.vertices = vertices;
    }

    /// Make this host reject `field` on every variable target.
    pub fn restrict_field(&mut self, field: TargetField) {
        self.restricted.insert(field);
    }

    pub fn driver(&self, id: DriverId) -> Option<&DriverDefinition> {
        self.drivers
            .iter()
            .find_map(|(i, d)| if *i == id { Some(d) } else { None })
    }

    pub fn drivers(&self) -> impl Iterator<Item = &DriverDefinition> {
        self.drivers.iter().map(|(_, d)| d)
    }

    /// How many times the engine asked for a refresh.
    pub fn dirty_count(&self) -> usize {
        self.dirty
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    fn push_driver(&mut self, def: DriverDefinition) -> DriverId {
        let id = DriverId(self.next_driver);
        self.next_driver = self.next_driver.wrapping_add(1);
        self.drivers.push((id, def));
        id
    }

    fn driver_mut(&mut self, id: DriverId) -> Option<&mut DriverDefinition> {
        self.drivers
            .iter_mut()
            .find_map(|(i, d)| if *i == id { Some(d) } else { None })
    }

    fn variable(&self, id: DriverId, variable: usize) -> Option<&DriverVariable> {
        self.driver(id).and_then(|d| d.variables.get(variable))
    }
}

impl MeshAccess for MemoryMesh {
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn base_positions(&self) -> Vec<Vec3> {
        self.vertices.clone()
    }

    fn selected_vertex_indices(&self) -> VertexSelection {
        VertexSelection::from_indices(self.selected.iter().copied())
    }

    fn mark_dirty(&mut self) {
        self.dirty += 1;
    }
}

impl ChannelStore for MemoryMesh {
    fn channel_names(&self) -> Vec<String> {
        self.channels.keys().cloned().collect()
    }

    fn has_channel(&self, name: &str) -> bool {
        self.channels.contains_key(name)
    }

    fn channel_positions(&self, name: &str) -> Option<&[Vec3]> {
        self.channels.get(name).map(|c| c.positions.as_slice())
    }

    fn create_channel(&mut self, name: &str, initial: Vec<Vec3>) {
        let channel = Channel {
            positions: initial,
            weight: 0.0,
        };
        if name == BASIS {
            self.channels.shift_insert(0, name.to_string(), channel);
        } else {
            self.channels.insert(name.to_string(), channel);
        }
    }

    fn set_channel_positions(&mut self, name: &str, positions: Vec<Vec3>) -> bool {
        if positions.len() != self.vertices.len() {
            return false;
        }
        match self.channels.get_mut(name) {
            Some(c) => {
                c.positions = positions;
                true
            }
            None => false,
        }
    }

    fn weight(&self, name: &str) -> Option<f32> {
        self.channels.get(name).map(|c| c.weight)
    }

    fn set_weight(&mut self, name: &str, weight: f32) -> bool {
        match self.channels.get_mut(name) {
            Some(c) => {
                c.weight = weight;
                true
            }
            None => false,
        }
    }
}

impl DriverStore for MemoryMesh {
    fn list_drivers(&self) -> Vec<(DriverId, DriverDefinition)> {
        self.drivers.clone()
    }

    fn add_driver(&mut self, path: &ChannelPath, kind: DriverKind) -> DriverId {
        self.push_driver(DriverDefinition {
            target_path: path.to_string(),
            kind,
            ..Default::default()
        })
    }

    fn set_expression(&mut self, driver: DriverId, expression: &str) {
        if let Some(d) = self.driver_mut(driver) {
            d.expression = expression.to_string();
        }
    }

    fn add_variable(&mut self, driver: DriverId, name: &str, kind: VariableKind) -> Option<usize> {
        let d = self.driver_mut(driver)?;
        d.variables.push(DriverVariable::new(name, kind));
        Some(d.variables.len() - 1)
    }

    fn target_slots(&self, driver: DriverId, variable: usize) -> usize {
        self.variable(driver, variable)
            .map_or(0, |v| v.targets.len())
    }

    fn variable_kind(&self, driver: DriverId, variable: usize) -> Option<VariableKind> {
        self.variable(driver, variable).map(|v| v.kind)
    }

    fn supports_field(
        &self,
        driver: DriverId,
        variable: usize,
        slot: usize,
        field: TargetField,
    ) -> bool {
        !self.restricted.contains(&field)
            && slot < self.target_slots(driver, variable)
            && self
                .variable_kind(driver, variable)
                .is_some_and(|kind| kind.supports_field(field))
    }

    fn set_target_field(&mut self, driver: DriverId, variable: usize, slot: usize, value: TargetValue) {
        if let Some(target) = self
            .driver_mut(driver)
            .and_then(|d| d.variables.get_mut(variable))
            .and_then(|v| v.targets.get_mut(slot))
        {
            target.assign(value);
        }
    }

    fn remove_driver(&mut self, driver: DriverId) -> bool {
        let before = self.drivers.len();
        self.drivers.retain(|(id, _)| *id != driver);
        self.drivers.len() != before
    }
}

// ---------- serde document ----------

/// Per-vertex offset applied on top of a channel's starting positions.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct VertexOffset {
    index: usize,
    offset: Vec3,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct ChannelDoc {
    name: String,
    #[serde(default)]
    weight: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    positions: Option<Vec<Vec3>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    offsets: Vec<VertexOffset>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct MeshDoc {
    #[serde(default)]
    name: String,
    vertices: Vec<Vec3>,
    #[serde(default)]
    selected: Vec<usize>,
    #[serde(default)]
    channels: Vec<ChannelDoc>,
    #[serde(default)]
    drivers: Vec<DriverDefinition>,
}

impl From<MeshDoc> for MemoryMesh {
    fn from(doc: MeshDoc) -> Self {
        let mut mesh = MemoryMesh::new(doc.vertices).with_name(doc.name);
        mesh.selected = doc.selected;
        for ch in doc.channels {
            let mut positions = ch.positions.unwrap_or_else(|| mesh.vertices.clone());
            for off in &ch.offsets {
                if let Some(p) = positions.get_mut(off.index) {
                    *p += off.offset;
                }
            }
            mesh.create_channel(&ch.name, positions);
            mesh.set_weight(&ch.name, ch.weight);
        }
        for def in doc.drivers {
            mesh.push_driver(def);
        }
        mesh
    }
}

impl From<&MemoryMesh> for MeshDoc {
    fn from(mesh: &MemoryMesh) -> Self {
        MeshDoc {
            name: mesh.name.clone(),
            vertices: mesh.vertices.clone(),
            selected: mesh.selected.clone(),
            channels: mesh
                .channels
                .iter()
                .map(|(name, c)| ChannelDoc {
                    name: name.clone(),
                    weight: c.weight,
                    positions: Some(c.positions.clone()),
                    offsets: Vec::new(),
                })
                .collect(),
            drivers: mesh.drivers().cloned().collect(),
        }
    }
}

impl Serialize for MemoryMesh {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        MeshDoc::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MemoryMesh {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        MeshDoc::deserialize(deserializer).map(MemoryMesh::from)
    }
}
