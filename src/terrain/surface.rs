//! Surface material selection by elevation relative to sea level

use crate::flat::{Flat, MaterialId};

/// Height-threshold material schemes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceProfile {
    /// Sand at or below sea level, grass above
    Lowland,
    /// Lowland plus stone above +20 and snow above +50
    Alpine,
    /// One material everywhere
    Uniform(MaterialId),
}

impl SurfaceProfile {
    /// Material for a column at `level`
    pub fn material_at(self, level: i32, sea_level: i32) -> MaterialId {
        let above = level - sea_level;
        match self {
            SurfaceProfile::Uniform(material) => material,
            SurfaceProfile::Lowland => {
                if above <= 0 {
                    MaterialId::SAND
                } else {
                    MaterialId::GRASS
                }
            }
            SurfaceProfile::Alpine => {
                if above <= 0 {
                    MaterialId::SAND
                } else if above > 50 {
                    MaterialId::SNOW
                } else if above > 20 {
                    MaterialId::STONE
                } else {
                    MaterialId::GRASS
                }
            }
        }
    }

    /// Assign materials to every column of a Flat
    pub fn paint(self, flat: &mut Flat, sea_level: i32) {
        for z in 0..flat.size_z() {
            for x in 0..flat.size_x() {
                let material = self.material_at(flat.level(x, z) as i32, sea_level);
                flat.set_material(x, z, material);
            }
        }
    }
}
