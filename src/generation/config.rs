//! Generation configuration and world definition files

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::Result;
use crate::grid::{HexGridConfig, HexGridIndex};
use crate::terrain::generator::TerrainParams;

/// Namespace token that marks cell parameters meant for builders
pub const GENERATION_NAMESPACE: &str = "g_";

/// World-wide constants every builder may consult
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConstants {
    pub sea_level: i32,
    pub ground_level: i32,
}

impl Default for WorldConstants {
    fn default() -> Self {
        Self {
            sea_level: 50,
            ground_level: 60,
        }
    }
}

/// Configuration for the terrain generation pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Random seed for noise fills and all per-cell randomness.
    pub seed: u32,
    /// Edge length of every (square) Flat.
    pub flat_size: usize,
    /// Sea level and ground level.
    pub world: WorldConstants,
    /// Terrain noise parameters.
    pub terrain: TerrainParams,
    /// Parameter prefix forwarded to builders (stripped on the way).
    pub namespace: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            flat_size: 256,
            world: WorldConstants::default(),
            terrain: TerrainParams::default(),
            namespace: GENERATION_NAMESPACE.to_string(),
        }
    }
}

impl GenerationConfig {
    /// Terrain parameters with the generation seed applied
    pub fn seeded_terrain(&self) -> TerrainParams {
        TerrainParams {
            seed: self.seed,
            ..self.terrain.clone()
        }
    }
}

/// A complete world: generation settings plus every cell's configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldDefinition {
    #[serde(default)]
    pub config: GenerationConfig,
    #[serde(default)]
    pub cells: Vec<HexGridConfig>,
}

impl WorldDefinition {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from file (sync)
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let definition = Self::from_json(&json)?;
        log::info!(
            "Loaded world definition {} ({} cells)",
            path.display(),
            definition.cells.len()
        );
        Ok(definition)
    }

    /// Save to file (sync)
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Index of all cells by position
    pub fn index(&self) -> HexGridIndex {
        HexGridIndex::from_configs(self.cells.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::HexPosition;

    #[test]
    fn test_default_config() {
        let cfg = GenerationConfig::default();
        assert_eq!(cfg.flat_size, 256);
        assert_eq!(cfg.world.sea_level, 50);
        assert_eq!(cfg.namespace, "g_");
        assert_eq!(cfg.seeded_terrain().seed, cfg.seed);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let def = WorldDefinition::from_json(
            r#"{ "config": { "seed": 7, "world": { "sea_level": 40 } },
                 "cells": [ { "position": { "q": 0, "r": 0 }, "type": "ocean" } ] }"#,
        )
        .unwrap();
        assert_eq!(def.config.seed, 7);
        assert_eq!(def.config.world.sea_level, 40);
        assert_eq!(def.config.world.ground_level, 60);
        assert_eq!(def.config.flat_size, 256);
        assert_eq!(def.index().get(HexPosition::new(0, 0)).map(|c| c.kind.as_str()), Some("ocean"));
    }

    #[test]
    fn test_malformed_json() {
        assert!(WorldDefinition::from_json("{ cells: ").is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("worlds/test.json");

        let def = WorldDefinition {
            config: GenerationConfig { seed: 99, flat_size: 64, ..Default::default() },
            cells: vec![
                HexGridConfig::new(HexPosition::new(0, 0), "island")
                    .with_parameter("g_landLevel", "-8"),
            ],
        };
        def.save(&path).unwrap();

        let loaded = WorldDefinition::load(&path).unwrap();
        assert_eq!(loaded, def);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = WorldDefinition::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, crate::core::Error::Io(_)));
    }
}
