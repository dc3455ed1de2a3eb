//! Material indices and the per-Flat material palette

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Compact per-column material identifier
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct MaterialId(pub u8);

impl MaterialId {
    /// Column has never been painted; its level is not meaningful to neighbors
    pub const NOT_SET: Self = Self(0);
    pub const SAND: Self = Self(1);
    pub const GRASS: Self = Self(2);
    pub const STONE: Self = Self(3);
    pub const SNOW: Self = Self(4);
    pub const DIRT: Self = Self(5);
    pub const STREET: Self = Self(6);
    pub const TRACK: Self = Self(7);
    /// Grass transition painted beside roads
    pub const ROAD_EDGE: Self = Self(8);
    pub const WALL: Self = Self(9);
    pub const WOOD: Self = Self(10);
    /// Column has a valid level but may still be repainted freely
    pub const NOT_SET_MUTABLE: Self = Self(255);

    /// True unless the column was never touched
    pub fn is_set(self) -> bool {
        self != Self::NOT_SET
    }

    /// Street or track surface
    pub fn is_road(self) -> bool {
        self == Self::STREET || self == Self::TRACK
    }
}

/// Palette entry describing how a material is rendered
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialDef {
    /// Short name used in compound parameters (e.g. "grass")
    pub name: String,
    /// Block descriptor path
    pub path: String,
    /// Whether the material blends into its neighbors
    pub blend: bool,
}

impl MaterialDef {
    pub fn new(name: impl Into<String>, path: impl Into<String>, blend: bool) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            blend,
        }
    }
}

/// Material index → descriptor
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaterialPalette {
    entries: BTreeMap<MaterialId, MaterialDef>,
}

impl Default for MaterialPalette {
    fn default() -> Self {
        let mut palette = Self::empty();
        palette.register(MaterialId::SAND, MaterialDef::new("sand", "terrain/sand", true));
        palette.register(MaterialId::GRASS, MaterialDef::new("grass", "terrain/grass", true));
        palette.register(MaterialId::STONE, MaterialDef::new("stone", "terrain/stone", true));
        palette.register(MaterialId::SNOW, MaterialDef::new("snow", "terrain/snow", true));
        palette.register(MaterialId::DIRT, MaterialDef::new("dirt", "terrain/dirt", true));
        palette.register(MaterialId::STREET, MaterialDef::new("street", "road/cobblestone", false));
        palette.register(MaterialId::TRACK, MaterialDef::new("track", "road/gravel", false));
        palette.register(MaterialId::ROAD_EDGE, MaterialDef::new("road_edge", "terrain/grass_path", true));
        palette.register(MaterialId::WALL, MaterialDef::new("wall", "building/stone_wall", false));
        palette.register(MaterialId::WOOD, MaterialDef::new("wood", "building/planks", false));
        palette
    }
}

impl MaterialPalette {
    /// Palette without any registered material
    pub fn empty() -> Self {
        Self { entries: BTreeMap::new() }
    }

    /// Register or replace a material
    pub fn register(&mut self, id: MaterialId, def: MaterialDef) -> Option<MaterialDef> {
        self.entries.insert(id, def)
    }

    pub fn get(&self, id: MaterialId) -> Option<&MaterialDef> {
        self.entries.get(&id)
    }

    /// Case-insensitive lookup by material name
    pub fn by_name(&self, name: &str) -> Option<MaterialId> {
        self.entries
            .iter()
            .find(|(_, def)| def.name.eq_ignore_ascii_case(name.trim()))
            .map(|(id, _)| *id)
    }

    /// Display name, falling back to the numeric id
    pub fn name_of(&self, id: MaterialId) -> String {
        match id {
            MaterialId::NOT_SET => "not_set".to_string(),
            MaterialId::NOT_SET_MUTABLE => "not_set_mutable".to_string(),
            _ => self
                .get(id)
                .map(|def| def.name.clone())
                .unwrap_or_else(|| format!("#{}", id.0)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
