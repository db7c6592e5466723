//! Driver definitions as copied between meshes.
//!
//! These are plain data: the engine never evaluates an expression or
//! resolves a variable target, it only reproduces them on the target mesh.

use serde::{Deserialize, Serialize};

/// Opaque handle to a driver inside a host's driver store.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct DriverId(pub u32);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DriverKind {
    Average,
    Sum,
    #[default]
    Scripted,
    Min,
    Max,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariableKind {
    #[default]
    SingleProp,
    Transforms,
    RotationDiff,
    LocDiff,
}

impl VariableKind {
    /// Number of target slots a variable of this kind carries.
    pub fn target_slots(self) -> usize {
        match self {
            VariableKind::SingleProp | VariableKind::Transforms => 1,
            VariableKind::RotationDiff | VariableKind::LocDiff => 2,
        }
    }

    /// Default capability table: which target fields a variable of this
    /// kind accepts.
    pub fn supports_field(self, field: TargetField) -> bool {
        use TargetField as F;
        match self {
            VariableKind::SingleProp => matches!(field, F::ReferencedObject | F::DataPath),
            VariableKind::Transforms => matches!(
                field,
                F::ReferencedObject | F::BonePath | F::TransformType | F::TransformSpace
            ),
            VariableKind::RotationDiff => matches!(field, F::ReferencedObject | F::BonePath),
            VariableKind::LocDiff => {
                matches!(field, F::ReferencedObject | F::BonePath | F::TransformSpace)
            }
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransformType {
    #[default]
    LocX,
    LocY,
    LocZ,
    RotX,
    RotY,
    RotZ,
    RotW,
    ScaleX,
    ScaleY,
    ScaleZ,
    ScaleAvg,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransformSpace {
    #[default]
    WorldSpace,
    TransformSpace,
    LocalSpace,
}

/// Fields of a variable target that are copied one by one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetField {
    ReferencedObject,
    BonePath,
    DataPath,
    TransformType,
    TransformSpace,
}

impl TargetField {
    pub const ALL: [TargetField; 5] = [
        TargetField::ReferencedObject,
        TargetField::BonePath,
        TargetField::DataPath,
        TargetField::TransformType,
        TargetField::TransformSpace,
    ];
}

/// A single field assignment on a variable target.
#[derive(Clone, Debug, PartialEq)]
pub enum TargetValue {
    ReferencedObject(Option<String>),
    BonePath(String),
    DataPath(String),
    TransformType(TransformType),
    TransformSpace(TransformSpace),
}

impl TargetValue {
    pub fn field(&self) -> TargetField {
        match self {
            TargetValue::ReferencedObject(_) => TargetField::ReferencedObject,
            TargetValue::BonePath(_) => TargetField::BonePath,
            TargetValue::DataPath(_) => TargetField::DataPath,
            TargetValue::TransformType(_) => TargetField::TransformType,
            TargetValue::TransformSpace(_) => TargetField::TransformSpace,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableTarget {
    #[serde(default)]
    pub referenced_object: Option<String>,
    #[serde(default)]
    pub bone_path: String,
    #[serde(default)]
    pub data_path: String,
    #[serde(default)]
    pub transform_type: TransformType,
    #[serde(default)]
    pub transform_space: TransformSpace,
}

impl VariableTarget {
    /// Read one field as an assignable value.
    pub fn value_of(&self, field: TargetField) -> TargetValue {
        match field {
            TargetField::ReferencedObject => {
                TargetValue::ReferencedObject(self.referenced_object.clone())
            }
            TargetField::BonePath => TargetValue::BonePath(self.bone_path.clone()),
            TargetField::DataPath => TargetValue::DataPath(self.data_path.clone()),
            TargetField::TransformType => TargetValue::TransformType(self.transform_type),
            TargetField::TransformSpace => TargetValue::TransformSpace(self.transform_space),
        }
    }

    pub fn assign(&mut self, value: TargetValue) {
        match value {
            TargetValue::ReferencedObject(v) => self.referenced_object = v,
            TargetValue::BonePath(v) => self.bone_path = v,
            TargetValue::DataPath(v) => self.data_path = v,
            TargetValue::TransformType(v) => self.transform_type = v,
            TargetValue::TransformSpace(v) => self.transform_space = v,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DriverVariable {
    pub name: String,
    #[serde(default)]
    pub kind: VariableKind,
    #[serde(default)]
    pub targets: Vec<VariableTarget>,
}

impl DriverVariable {
    /// A variable with the slot count its kind implies, all fields default.
    pub fn new(name: impl Into<String>, kind: VariableKind) -> Self {
        Self {
            name: name.into(),
            kind,
            targets: vec![VariableTarget::default(); kind.target_slots()],
        }
    }
}

/// A driver bound to a host data path (usually a channel weight path).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DriverDefinition {
    pub target_path: String,
    #[serde(default)]
    pub kind: DriverKind,
    #[serde(default)]
    pub expression: String,
    #[serde(default)]
    pub variables: Vec<DriverVariable>,
}
