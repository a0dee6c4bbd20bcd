use serde::Deserialize;

/// How a node's transform relates to its ancestors'.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HierarchyMode {
    /// Accumulate transforms from the scene root down.
    #[default]
    Composed,
    /// Apply only each node's own TRS. Matches scenes exported against the
    /// legacy importer.
    Isolated,
}

/// How node rotations are applied to positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationMode {
    /// Rotate by the quaternion directly.
    #[default]
    Quaternion,
    /// Decompose to Euler angles and rotate plane by plane in engine space.
    LegacyEuler,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    pub hierarchy: HierarchyMode,
    pub rotation: RotationMode,
    /// Carry normals through node rotation and scale.
    pub transform_normals: bool,
    /// Fail the whole import when a single primitive can't be decoded,
    /// instead of skipping that primitive.
    pub strict: bool,
    /// Upper bound on any accessor's element count.
    pub max_element_count: usize,
    /// Upper bound on node nesting below a scene root.
    pub max_depth: usize,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            hierarchy: HierarchyMode::Composed,
            rotation: RotationMode::Quaternion,
            transform_normals: true,
            strict: false,
            max_element_count: 1 << 24,
            max_depth: 256,
        }
    }
}

impl ImportOptions {
    /// Reproduces the legacy importer's output: isolated node transforms,
    /// Euler rotation, untransformed normals.
    pub fn legacy() -> Self {
        Self {
            hierarchy: HierarchyMode::Isolated,
            rotation: RotationMode::LegacyEuler,
            transform_normals: false,
            ..Self::default()
        }
    }

    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}
