//! Axial hex coordinates

use std::fmt;

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::Direction;
use crate::math::noise::hash_str;

/// Axial position of a hex cell (pointy-top layout, r grows south)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HexPosition {
    pub q: i32,
    pub r: i32,
}

impl HexPosition {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Position of the adjacent cell across `dir`
    pub fn neighbor(self, dir: Direction) -> HexPosition {
        let (dq, dr) = dir.axial_offset();
        HexPosition::new(self.q + dq, self.r + dr)
    }

    /// Stable cell identifier, also used as flat id
    pub fn id(self) -> String {
        format!("{}:{}", self.q, self.r)
    }

    /// World-space center of the cell's hexagon for a given Flat size.
    ///
    /// The hexagon circumradius is half the Flat width, so adjacent Flats
    /// overlap around their shared sides.
    pub fn world_center(self, flat_size: usize) -> Vec2 {
        let radius = flat_size as f32 * 0.5;
        let x = radius * 3f32.sqrt() * (self.q as f32 + self.r as f32 * 0.5);
        let z = radius * 1.5 * self.r as f32;
        Vec2::new(x, z)
    }

    /// World-space origin (min corner) of the cell's Flat
    pub fn flat_mount(self, flat_size: usize) -> IVec2 {
        let center = self.world_center(flat_size).round();
        let half = (flat_size / 2) as i32;
        IVec2::new(center.x as i32 - half, center.y as i32 - half)
    }

    /// Deterministic seed for this cell, mixed with a world seed and a salt
    /// (side index, declaration index, ...).
    pub fn seed(self, world_seed: u32, salt: u32) -> u32 {
        let mut h = hash_str(&self.id()) ^ world_seed.wrapping_mul(0x9E3779B9);
        h ^= salt.wrapping_mul(0x85EBCA6B);
        h = (h ^ (h >> 16)).wrapping_mul(0x45d9f3b);
        h ^ (h >> 16)
    }
}

impl fmt::Display for HexPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.q, self.r)
    }
}
