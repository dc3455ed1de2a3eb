//! Position → configuration lookup with O(1) neighbor access

use std::collections::HashMap;

use super::{Direction, HexGridConfig, HexPosition};

/// The six neighbor slots of a cell, indexed by `Direction::index()`.
/// `None` is a valid state (world edge, undefined cell).
pub type NeighborConfigs<'a> = [Option<&'a HexGridConfig>; 6];

/// Index of all configured hex cells
#[derive(Clone, Debug, Default)]
pub struct HexGridIndex {
    cells: HashMap<HexPosition, HexGridConfig>,
}

impl HexGridIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from configurations; later duplicates replace earlier ones.
    pub fn from_configs(configs: impl IntoIterator<Item = HexGridConfig>) -> Self {
        let mut index = Self::new();
        for config in configs {
            if let Some(previous) = index.insert(config) {
                log::warn!("Duplicate configuration for cell {}, replaced", previous.position);
            }
        }
        index
    }

    /// Insert a configuration, returning the one it replaced
    pub fn insert(&mut self, config: HexGridConfig) -> Option<HexGridConfig> {
        self.cells.insert(config.position, config)
    }

    pub fn get(&self, position: HexPosition) -> Option<&HexGridConfig> {
        self.cells.get(&position)
    }

    pub fn contains(&self, position: HexPosition) -> bool {
        self.cells.contains_key(&position)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All configured positions, sorted for deterministic iteration
    pub fn positions(&self) -> Vec<HexPosition> {
        let mut positions: Vec<_> = self.cells.keys().copied().collect();
        positions.sort();
        positions
    }

    /// Configuration of the neighbor across `dir`
    pub fn neighbor(&self, position: HexPosition, dir: Direction) -> Option<&HexGridConfig> {
        self.get(position.neighbor(dir))
    }

    /// All six neighbor slots
    pub fn neighbors(&self, position: HexPosition) -> NeighborConfigs<'_> {
        let mut slots: NeighborConfigs<'_> = [None; 6];
        for dir in Direction::ALL {
            slots[dir.index()] = self.neighbor(position, dir);
        }
        slots
    }
}
