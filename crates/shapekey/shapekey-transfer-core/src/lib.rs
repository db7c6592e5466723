//! Shape key transfer core (host-agnostic)
//!
//! Transfers per-vertex deformation channels ("shape keys") and the drivers
//! attached to their weights from a source mesh to a target mesh. Hosts
//! integrate by implementing the accessor traits in [`host`]; the engine
//! only reads and writes vertex arrays, weights and driver definitions.
//!
//! - [`delta`]: displacement of a deformed pose relative to its basis
//! - [`reconcile`]: create-or-reuse target channels, relative delta write, weights
//! - [`mirror`]: driver replacement on channels shared by both meshes
//! - [`ops`]: settings-driven operations with one user report each

pub mod config;
pub mod delta;
pub mod driver;
pub mod error;
pub mod host;
pub mod memory;
pub mod mirror;
pub mod ops;
pub mod path;
pub mod reconcile;
pub mod report;
pub mod selection;

// Re-exports for consumers (host adapters)
pub use config::{TransferMode, TransferSettings};
pub use delta::{compute_delta, DeltaField};
pub use driver::{
    DriverDefinition, DriverId, DriverKind, DriverVariable, TargetField, TargetValue,
    TransformSpace, TransformType, VariableKind, VariableTarget,
};
pub use error::{Result, TransferError};
pub use host::{ChannelStore, DriverStore, MeshAccess, MeshHandle, BASIS};
pub use memory::MemoryMesh;
pub use mirror::transfer_drivers;
pub use ops::{ChannelListing, Compatibility};
pub use path::ChannelPath;
pub use reconcile::{transfer_all_channels, transfer_channel};
pub use report::{
    DriverTransferSummary, LogReporter, RecordingReporter, ReportLevel, Reporter,
    TransferSummary, TransferWarning,
};
pub use selection::{SelectedIndices, VertexSelection};

pub use glam::Vec3;
