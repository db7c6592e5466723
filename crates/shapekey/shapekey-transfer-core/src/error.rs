//! Error types for shape key and driver transfer.
//!
//! Every variant is recoverable: operations abort at the point of detection
//! and the `Display` text is what hosts show to the user.

/// Errors raised by the transfer engine.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum TransferError {
    /// Source or target mesh was not provided.
    #[error("Source or target object not set")]
    MissingEndpoint,

    /// Source mesh has no deformation channels.
    #[error("Source object has no shape keys")]
    SourceHasNoChannels,

    /// Requested channel is absent on the source.
    #[error("Shape key '{name}' not found in source object")]
    ChannelNotFound { name: String },

    /// Full-data transfer requires identical vertex counts.
    #[error("Vertex count mismatch: Source has {source_count}, Target has {target_count}")]
    VertexCountMismatch {
        source_count: usize,
        target_count: usize,
    },

    /// Driver transfer needs named channels on the target.
    #[error("Target object has no shape keys")]
    TargetHasNoChannels,

    /// Driver transfer found no channel names shared by both meshes.
    #[error("No matching shape keys found between source and target objects")]
    NoMatchingChannels,

    /// An internal precondition was broken; indicates a bug or a host
    /// returning inconsistent data.
    #[error("Internal invariant violated: {reason}")]
    InvariantViolation { reason: String },

    /// A bulk transfer failed after some channels were already written.
    #[error("Transfer stopped after {processed} shape keys: {cause}")]
    PartialCompletion {
        processed: usize,
        #[source]
        cause: Box<TransferError>,
    },
}

impl TransferError {
    /// Build an `InvariantViolation`, asserting in debug builds.
    pub(crate) fn invariant(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        debug_assert!(false, "invariant violated: {reason}");
        TransferError::InvariantViolation { reason }
    }

    /// Number of channels written before the failure (zero unless partial).
    pub fn processed(&self) -> usize {
        match self {
            TransferError::PartialCompletion { processed, .. } => *processed,
            _ => 0,
        }
    }
}

pub type Result<T> = std::result::Result<T, TransferError>;
