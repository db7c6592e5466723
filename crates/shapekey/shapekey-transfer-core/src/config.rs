//! Per-target transfer settings.

use serde::{Deserialize, Serialize};

/// What a transfer writes to the target.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferMode {
    /// Relative position data; requires identical vertex counts.
    #[default]
    Full,
    /// Channel names and weights only; positions stay at the basis.
    NamesOnly,
}

impl TransferMode {
    pub(crate) fn describe(self) -> &'static str {
        match self {
            TransferMode::Full => "with full data",
            TransferMode::NamesOnly => "with names only",
        }
    }
}

/// Settings a host keeps for one target object.
///
/// Transitions are explicit: `disable` returns the reset configuration
/// instead of clearing fields as a side effect of flipping `enabled`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferSettings {
    pub enabled: bool,
    /// Host name of the source object.
    pub source: Option<String>,
    pub mode: TransferMode,
    /// Re-run the bulk transfer whenever the host calls `ops::auto_sync`.
    pub auto_transfer: bool,
    /// Gate full transfers by the source mesh's vertex selection.
    pub only_selected_vertices: bool,
}

impl TransferSettings {
    pub fn enable(self) -> Self {
        Self {
            enabled: true,
            ..self
        }
    }

    /// Deterministic reset configuration.
    pub fn disable(self) -> Self {
        Self::default()
    }

    pub fn with_source(self, source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            ..self
        }
    }

    pub fn with_mode(self, mode: TransferMode) -> Self {
        Self { mode, ..self }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
