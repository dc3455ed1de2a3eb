//! Ocean scenario: a noisy sea floor below sea level

use crate::core::Result;
use crate::flat::{Flat, MaterialId};
use crate::generation::config::WorldConstants;
use crate::generation::context::{BuilderContext, HeightSampler};
use crate::generation::params::Parameters;
use crate::grid::Direction;
use crate::math::HexGeometry;

use super::{LandSettings, ScenarioBuilder};

const DEFAULTS: LandSettings = LandSettings::new(-20, 5);

/// Depth of the band blended toward world height on open sides
pub const EDGE_TRANSITION: i32 = 30;

/// Ocean floor builder
#[derive(Clone, Debug)]
pub struct OceanBuilder {
    land: LandSettings,
    transition: i32,
}

impl Default for OceanBuilder {
    fn default() -> Self {
        Self {
            land: DEFAULTS,
            transition: EDGE_TRANSITION,
        }
    }
}

impl OceanBuilder {
    /// Floor base height, always below sea level
    fn base_height(&self, sea_level: i32) -> i32 {
        (sea_level + self.land.land_level).min(sea_level - 1)
    }
}

impl ScenarioBuilder for OceanBuilder {
    fn name(&self) -> &'static str {
        "ocean"
    }

    fn initialize(&mut self, parameters: &Parameters) -> Result<()> {
        self.land = LandSettings::from_parameters(parameters, DEFAULTS);
        self.transition = parameters.i32_or("edgeTransition", EDGE_TRANSITION).max(1);
        Ok(())
    }

    fn build_flat(&mut self, ctx: &mut BuilderContext<'_>) -> Result<()> {
        let base = self.base_height(ctx.sea_level());
        let seed = ctx.world_seed();
        ctx.base_fill().fill(ctx.flat, base, self.land.land_offset, seed);
        ctx.flat.fill_material(MaterialId::SAND);

        let geometry = ctx.geometry();
        let sampler = ctx.height_sampler();
        for side in Direction::ALL {
            if !ctx.has_neighbor(side) {
                blend_open_side(ctx.flat, &geometry, side, sampler, self.transition);
            }
        }
        log::debug!("Ocean {} built with floor base {}", ctx.position(), base);
        Ok(())
    }

    fn land_level(&self) -> i32 {
        self.land.land_level
    }

    fn land_offset(&self) -> i32 {
        self.land.land_offset
    }

    fn land_side_level(&self, _side: Direction, world: &WorldConstants) -> i32 {
        self.base_height(world.sea_level)
    }

    fn is_water(&self) -> bool {
        true
    }
}

/// Blend the band along `side` from the generated floor (inner edge) to the
/// world height sample (at the side), linear in normalized distance.
fn blend_open_side(
    flat: &mut Flat,
    geometry: &HexGeometry,
    side: Direction,
    sampler: &dyn HeightSampler,
    transition: i32,
) {
    let depth = transition as f32;
    for z in 0..flat.size_z() {
        for x in 0..flat.size_x() {
            let p = glam::Vec2::new(x as f32, z as f32);
            let distance = geometry.signed_distance_to_side(side, p);
            if distance > depth {
                continue;
            }
            let t = geometry.side_projection(side, p);
            if !(0.0..=1.0).contains(&t) {
                continue;
            }
            let weight = 1.0 - distance.max(0.0) / depth;
            let target = sampler.height_at(flat.local_to_world(x as i32, z as i32)) as f32;
            let current = flat.level(x, z) as f32;
            flat.set_level(x, z, (target * weight + current * (1.0 - weight)).round() as i32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::context::test_support::Harness;
    use crate::grid::{HexGridConfig, HexPosition};

    fn ocean_params() -> Parameters {
        Parameters::new().with("landLevel", "-10").with("landOffset", "7")
    }

    #[test]
    fn test_floor_range_when_surrounded() {
        // Every neighbor present: no edge treatment at all
        let center = HexPosition::new(0, 0);
        let mut configs = vec![HexGridConfig::new(center, "ocean")];
        for dir in Direction::ALL {
            configs.push(HexGridConfig::new(center.neighbor(dir), "ocean"));
        }
        let harness = Harness::new(configs);

        let mut flat = Flat::new(64, 64).with_mount(-32, -32);
        let mut ctx = harness.context(center, &mut flat);
        let mut builder = OceanBuilder::default();
        builder.initialize(&ocean_params()).unwrap();
        builder.build_flat(&mut ctx).unwrap();

        for z in 0..64 {
            for x in 0..64 {
                let level = flat.level(x, z) as i32;
                assert!((33..=47).contains(&level), "level {level} at ({x}, {z})");
                assert_eq!(flat.material(x, z), MaterialId::SAND);
            }
        }
    }

    #[test]
    fn test_open_sides_blend_toward_world_height() {
        let center = HexPosition::new(0, 0);
        let harness = Harness::new(vec![HexGridConfig::new(center, "ocean")]);

        let mut flat = Flat::new(128, 128).with_mount(-64, -64);
        let mut ctx = harness.context(center, &mut flat);
        let mut builder = OceanBuilder::default();
        builder.initialize(&ocean_params()).unwrap();
        builder.build_flat(&mut ctx).unwrap();

        // Interior, farther than the transition from every side: untouched floor
        let level = flat.level(64, 64) as i32;
        assert!((33..=47).contains(&level));

        // On the east side line the level follows the world sample
        let geometry = HexGeometry::for_flat(128, 128);
        let mid = geometry.side_midpoint(Direction::East);
        let (x, z) = (mid.x.floor() as usize, mid.y as usize);
        let world = flat.local_to_world(x as i32, z as i32);
        let expected = HeightSampler::height_at(&harness.terrain, world);
        let got = flat.level(x, z) as i32;
        assert!((got - expected).abs() <= 1, "got {got}, expected ~{expected}");
    }

    #[test]
    fn test_land_side_level_below_sea() {
        let mut builder = OceanBuilder::default();
        builder.initialize(&Parameters::new().with("landLevel", "5")).unwrap();
        let world = WorldConstants::default();
        assert_eq!(builder.land_side_level(Direction::East, &world), 49);
        assert!(builder.is_water());
    }
}
