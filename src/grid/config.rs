//! Per-cell configuration record

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::HexPosition;

/// Configuration of one hex cell: scenario type plus raw, namespaced parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HexGridConfig {
    pub position: HexPosition,
    /// Scenario builder identifier (e.g. "ocean", "mountain")
    #[serde(rename = "type")]
    pub kind: String,
    /// Raw parameters; only keys carrying the generation namespace reach builders
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

impl HexGridConfig {
    pub fn new(position: HexPosition, kind: impl Into<String>) -> Self {
        Self {
            position,
            kind: kind.into(),
            parameters: BTreeMap::new(),
        }
    }

    /// Add a raw parameter (builder pattern)
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn id(&self) -> String {
        self.position.id()
    }
}
