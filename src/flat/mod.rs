//! Flat: a hex cell's rectangular elevation + material buffer
//!
//! A Flat is owned and written by exactly one cell's pipeline. Other cells only
//! ever see it through a shared reference handed out by a `FlatLookup`.

pub mod material;

use std::collections::BTreeMap;

use glam::IVec2;
use serde::Serialize;

pub use material::{MaterialDef, MaterialId, MaterialPalette};

/// Highest storable elevation
pub const MAX_LEVEL: i32 = 255;

/// Extra-block descriptor for a water surface
pub const WATER_BLOCK: &str = "water";

/// Position of a sparse extra block. Ordered by column first so that all
/// blocks of one column form a contiguous range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ExtraPos {
    pub x: usize,
    pub z: usize,
    pub y: i32,
}

/// Summary of a Flat's contents
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FlatStats {
    pub min_level: u8,
    pub max_level: u8,
    pub mean_level: f32,
    pub extra_blocks: usize,
    /// Material name → column count
    pub materials: BTreeMap<String, usize>,
}

/// Elevation/material buffer of one hex cell
#[derive(Clone, Debug)]
pub struct Flat {
    size_x: usize,
    size_z: usize,
    mount_x: i32,
    mount_z: i32,
    levels: Vec<u8>,
    columns: Vec<MaterialId>,
    extra_blocks: BTreeMap<ExtraPos, String>,
    palette: MaterialPalette,
    groups: Option<Vec<Option<String>>>,
}

impl Flat {
    /// Create an empty Flat mounted at the world origin
    pub fn new(size_x: usize, size_z: usize) -> Self {
        Self {
            size_x,
            size_z,
            mount_x: 0,
            mount_z: 0,
            levels: vec![0; size_x * size_z],
            columns: vec![MaterialId::NOT_SET; size_x * size_z],
            extra_blocks: BTreeMap::new(),
            palette: MaterialPalette::default(),
            groups: None,
        }
    }

    /// Set the world-space origin (builder pattern)
    pub fn with_mount(mut self, mount_x: i32, mount_z: i32) -> Self {
        self.mount_x = mount_x;
        self.mount_z = mount_z;
        self
    }

    pub fn size_x(&self) -> usize {
        self.size_x
    }

    pub fn size_z(&self) -> usize {
        self.size_z
    }

    pub fn mount_x(&self) -> i32 {
        self.mount_x
    }

    pub fn mount_z(&self) -> i32 {
        self.mount_z
    }

    #[inline]
    fn index(&self, x: usize, z: usize) -> usize {
        debug_assert!(x < self.size_x && z < self.size_z, "({x}, {z}) outside flat");
        z * self.size_x + x
    }

    /// Whether a signed local coordinate lies inside the buffer
    pub fn is_inside(&self, x: i32, z: i32) -> bool {
        x >= 0 && z >= 0 && (x as usize) < self.size_x && (z as usize) < self.size_z
    }

    pub fn level(&self, x: usize, z: usize) -> u8 {
        self.levels[self.index(x, z)]
    }

    /// Checked read for signed coordinates
    pub fn level_at(&self, x: i32, z: i32) -> Option<u8> {
        self.is_inside(x, z).then(|| self.level(x as usize, z as usize))
    }

    /// Write an elevation, clamped to [0, 255]
    pub fn set_level(&mut self, x: usize, z: usize, level: i32) {
        let i = self.index(x, z);
        self.levels[i] = level.clamp(0, MAX_LEVEL) as u8;
    }

    /// Checked, clamped write for signed coordinates. Returns false when outside.
    pub fn set_level_at(&mut self, x: i32, z: i32, level: i32) -> bool {
        if !self.is_inside(x, z) {
            return false;
        }
        self.set_level(x as usize, z as usize, level);
        true
    }

    pub fn fill_level(&mut self, level: i32) {
        let level = level.clamp(0, MAX_LEVEL) as u8;
        self.levels.fill(level);
    }

    /// Raw elevation buffer, row-major by z
    pub fn levels(&self) -> &[u8] {
        &self.levels
    }

    pub fn material(&self, x: usize, z: usize) -> MaterialId {
        self.columns[self.index(x, z)]
    }

    pub fn material_at(&self, x: i32, z: i32) -> Option<MaterialId> {
        self.is_inside(x, z).then(|| self.material(x as usize, z as usize))
    }

    pub fn set_material(&mut self, x: usize, z: usize, material: MaterialId) {
        let i = self.index(x, z);
        self.columns[i] = material;
    }

    pub fn fill_material(&mut self, material: MaterialId) {
        self.columns.fill(material);
    }

    /// A column counts as set once any material (including the mutable sentinel) was painted
    pub fn is_set(&self, x: usize, z: usize) -> bool {
        self.material(x, z).is_set()
    }

    /// Level of a painted column, None when outside or never painted
    pub fn sample(&self, x: i32, z: i32) -> Option<u8> {
        if !self.is_inside(x, z) || !self.is_set(x as usize, z as usize) {
            return None;
        }
        Some(self.level(x as usize, z as usize))
    }

    pub fn palette(&self) -> &MaterialPalette {
        &self.palette
    }

    pub fn palette_mut(&mut self) -> &mut MaterialPalette {
        &mut self.palette
    }

    // --- Extra blocks ---

    pub fn set_extra_block(&mut self, x: usize, y: i32, z: usize, block: impl Into<String>) {
        self.extra_blocks.insert(ExtraPos { x, z, y }, block.into());
    }

    pub fn extra_block(&self, x: usize, y: i32, z: usize) -> Option<&str> {
        self.extra_blocks.get(&ExtraPos { x, z, y }).map(String::as_str)
    }

    /// All extra blocks of one column, bottom to top
    pub fn column_extra_blocks(&self, x: usize, z: usize) -> impl Iterator<Item = (i32, &str)> {
        let start = ExtraPos { x, z, y: i32::MIN };
        let end = ExtraPos { x, z, y: i32::MAX };
        self.extra_blocks
            .range(start..=end)
            .map(|(pos, block)| (pos.y, block.as_str()))
    }

    /// Whether any extra block with this descriptor exists in the column
    pub fn has_extra_block(&self, x: usize, z: usize, block: &str) -> bool {
        self.column_extra_blocks(x, z).any(|(_, b)| b == block)
    }

    /// Remove every extra block whose descriptor matches; returns the count removed
    pub fn remove_extra_blocks(&mut self, matches: impl Fn(&str) -> bool) -> usize {
        let before = self.extra_blocks.len();
        self.extra_blocks.retain(|_, block| !matches(block));
        before - self.extra_blocks.len()
    }

    pub fn extra_blocks(&self) -> impl Iterator<Item = (ExtraPos, &str)> {
        self.extra_blocks.iter().map(|(pos, block)| (*pos, block.as_str()))
    }

    pub fn extra_block_count(&self) -> usize {
        self.extra_blocks.len()
    }

    // --- Groups ---

    /// Tag a column as belonging to a logical feature
    pub fn set_group(&mut self, x: usize, z: usize, group: &str) {
        let i = self.index(x, z);
        let len = self.size_x * self.size_z;
        let groups = self.groups.get_or_insert_with(|| vec![None; len]);
        groups[i] = Some(group.to_string());
    }

    pub fn group(&self, x: usize, z: usize) -> Option<&str> {
        let groups = self.groups.as_ref()?;
        groups[self.index(x, z)].as_deref()
    }

    /// Columns tagged with `group`
    pub fn group_members(&self, group: &str) -> Vec<(usize, usize)> {
        let Some(groups) = &self.groups else {
            return Vec::new();
        };
        groups
            .iter()
            .enumerate()
            .filter(|(_, g)| g.as_deref() == Some(group))
            .map(|(i, _)| (i % self.size_x, i / self.size_x))
            .collect()
    }

    // --- Coordinate spaces ---

    pub fn local_to_world(&self, x: i32, z: i32) -> IVec2 {
        IVec2::new(self.mount_x + x, self.mount_z + z)
    }

    pub fn world_to_local(&self, world: IVec2) -> IVec2 {
        IVec2::new(world.x - self.mount_x, world.y - self.mount_z)
    }

    /// Summary statistics
    pub fn stats(&self) -> FlatStats {
        let min_level = self.levels.iter().copied().min().unwrap_or(0);
        let max_level = self.levels.iter().copied().max().unwrap_or(0);
        let sum: u64 = self.levels.iter().map(|&l| l as u64).sum();
        let mean_level = if self.levels.is_empty() {
            0.0
        } else {
            sum as f32 / self.levels.len() as f32
        };

        let mut counts: BTreeMap<MaterialId, usize> = BTreeMap::new();
        for &m in &self.columns {
            *counts.entry(m).or_default() += 1;
        }
        let materials = counts
            .into_iter()
            .map(|(id, n)| (self.palette.name_of(id), n))
            .collect();

        FlatStats {
            min_level,
            max_level,
            mean_level,
            extra_blocks: self.extra_blocks.len(),
            materials,
        }
    }
}
