//! Coast scenario: shallow sea with a sandy, noise-edged shore along land sides

use glam::Vec2;

use crate::core::Result;
use crate::flat::{Flat, MaterialId};
use crate::generation::context::BuilderContext;
use crate::generation::params::Parameters;
use crate::grid::Direction;
use crate::math::{distance_to_segment, fractal_noise, value_noise, HexGeometry};

use super::{LandSettings, ScenarioBuilder};

const DEFAULTS: LandSettings = LandSettings::new(1, 2);
const DEFAULT_COAST_WIDTH: f32 = 40.0;

/// Inner share of the coastal band that becomes dry land
const NEAR_BAND: f32 = 0.55;

#[derive(Clone, Debug)]
pub struct CoastBuilder {
    land: LandSettings,
    coast_width: f32,
}

impl Default for CoastBuilder {
    fn default() -> Self {
        Self {
            land: DEFAULTS,
            coast_width: DEFAULT_COAST_WIDTH,
        }
    }
}

impl CoastBuilder {
    /// Sides facing a present, non-water neighbor
    fn land_sides(ctx: &BuilderContext<'_>) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|&dir| {
                ctx.has_neighbor(dir)
                    && ctx.neighbor_builder(dir).is_none_or(|builder| !builder.is_water())
            })
            .collect()
    }

    fn raise_shore(&self, flat: &mut Flat, sides: &[Direction], sea_level: i32, seed: u32) {
        let geometry = HexGeometry::for_flat(flat.size_x(), flat.size_z());
        let segments: Vec<(Vec2, Vec2)> = sides.iter().map(|&s| geometry.side_corners(s)).collect();
        let width = self.coast_width;

        for z in 0..flat.size_z() {
            for x in 0..flat.size_x() {
                let p = Vec2::new(x as f32, z as f32);
                let distance = segments
                    .iter()
                    .map(|&(a, b)| distance_to_segment(p, a, b))
                    .fold(f32::INFINITY, f32::min);
                if distance > width * 1.5 {
                    continue;
                }

                let world = flat.local_to_world(x as i32, z as i32);
                let (wx, wz) = (world.x as f32, world.y as f32);
                let perturbed = distance + fractal_noise(wx, wz, 32.0, seed) * width * 0.35;

                if perturbed < width * NEAR_BAND {
                    if value_noise(wx, wz, 9.0, seed ^ 0x5eed) > 0.5 {
                        flat.set_level(x, z, sea_level + self.land.land_level);
                        flat.set_material(x, z, MaterialId::GRASS);
                    } else {
                        flat.set_level(x, z, sea_level);
                        flat.set_material(x, z, MaterialId::SAND);
                    }
                } else if perturbed < width {
                    flat.set_level(x, z, sea_level);
                    flat.set_material(x, z, MaterialId::SAND);
                }
            }
        }
    }
}

impl ScenarioBuilder for CoastBuilder {
    fn name(&self) -> &'static str {
        "coast"
    }

    fn initialize(&mut self, parameters: &Parameters) -> Result<()> {
        self.land = LandSettings::from_parameters(parameters, DEFAULTS);
        self.coast_width = parameters.f32_clamped("coastWidth", DEFAULT_COAST_WIDTH, 1.0, 256.0);
        Ok(())
    }

    fn build_flat(&mut self, ctx: &mut BuilderContext<'_>) -> Result<()> {
        let sea = ctx.sea_level();
        ctx.flat.fill_level(sea - 1);
        ctx.flat.fill_material(MaterialId::SAND);

        let sides = Self::land_sides(ctx);
        let seed = ctx.world_seed();
        self.raise_shore(ctx.flat, &sides, sea, seed);
        log::debug!("Coast {} built with {} land sides", ctx.position(), sides.len());
        Ok(())
    }

    fn land_level(&self) -> i32 {
        self.land.land_level
    }

    fn land_offset(&self) -> i32 {
        self.land.land_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::context::test_support::Harness;
    use crate::grid::{HexGridConfig, HexPosition};

    fn build(configs: Vec<HexGridConfig>, center: HexPosition) -> Flat {
        let harness = Harness::new(configs);
        let mut flat = Flat::new(128, 128);
        let mut ctx = harness.context(center, &mut flat);
        let mut builder = CoastBuilder::default();
        builder.initialize(ctx.parameters()).unwrap();
        builder.build_flat(&mut ctx).unwrap();
        flat
    }

    #[test]
    fn test_no_land_sides_is_shallow_sea() {
        let center = HexPosition::new(0, 0);
        let flat = build(
            vec![
                HexGridConfig::new(center, "coast"),
                HexGridConfig::new(center.neighbor(Direction::East), "ocean"),
            ],
            center,
        );
        assert!(flat.levels().iter().all(|&l| l == 49));
    }

    #[test]
    fn test_land_side_raises_shore() {
        let center = HexPosition::new(0, 0);
        let flat = build(
            vec![
                HexGridConfig::new(center, "coast"),
                HexGridConfig::new(center.neighbor(Direction::East), "plains"),
                HexGridConfig::new(center.neighbor(Direction::West), "ocean"),
            ],
            center,
        );
        // Right on the east side the shore is dry
        let geometry = HexGeometry::for_flat(128, 128);
        let mid = geometry.side_midpoint(Direction::East);
        let level = flat.level(mid.x.floor() as usize, mid.y as usize) as i32;
        assert!(level >= 50, "shore level {level}");
        // The west side faces ocean and stays under water
        assert_eq!(flat.level(2, 64), 49);
        assert!(flat.levels().iter().all(|&l| (49..=51).contains(&(l as i32))));
    }
}
