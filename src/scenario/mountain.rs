//! Mountain scenario: high noisy terrain with optional ridges raised toward sides

use serde::Deserialize;

use crate::core::{Error, Result};
use crate::flat::{Flat, MAX_LEVEL};
use crate::generation::config::WorldConstants;
use crate::generation::context::BuilderContext;
use crate::generation::params::{parse_declarations, Declaration, Parameters};
use crate::grid::Direction;
use crate::math::{distance_to_segment, HexGeometry};
use crate::terrain::SurfaceProfile;

use super::{LandSettings, ScenarioBuilder};

const DEFAULTS: LandSettings = LandSettings::new(25, 20);
const DEFAULT_RIDGE_WIDTH: f32 = 100.0;

/// Ridge declaration: the side's edge is pulled up toward `level`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct Ridge {
    pub side: Direction,
    /// Absolute target level
    pub level: i32,
}

impl Declaration for Ridge {
    fn validate(&self) -> Result<()> {
        if !(0..=MAX_LEVEL).contains(&self.level) {
            return Err(Error::invalid("ridge.level", format!("{} outside 0..={}", self.level, MAX_LEVEL)));
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct MountainBuilder {
    land: LandSettings,
    ridges: Vec<Ridge>,
    ridge_width: f32,
}

impl Default for MountainBuilder {
    fn default() -> Self {
        Self {
            land: DEFAULTS,
            ridges: Vec::new(),
            ridge_width: DEFAULT_RIDGE_WIDTH,
        }
    }
}

impl MountainBuilder {
    pub fn ridges(&self) -> &[Ridge] {
        &self.ridges
    }

    /// Raise terrain toward each ridge by `(1 - d/width)²`; never lowers.
    pub fn apply_ridges(&self, flat: &mut Flat) {
        let geometry = HexGeometry::for_flat(flat.size_x(), flat.size_z());
        for ridge in &self.ridges {
            let (a, b) = geometry.side_corners(ridge.side);
            for z in 0..flat.size_z() {
                for x in 0..flat.size_x() {
                    let p = glam::Vec2::new(x as f32, z as f32);
                    let nd = distance_to_segment(p, a, b) / self.ridge_width;
                    if nd >= 1.0 {
                        continue;
                    }
                    let current = flat.level(x, z) as i32;
                    if ridge.level <= current {
                        continue;
                    }
                    let weight = (1.0 - nd) * (1.0 - nd);
                    let raised = current as f32 + (ridge.level - current) as f32 * weight;
                    flat.set_level(x, z, (raised.round() as i32).max(current));
                }
            }
            log::debug!("Ridge {} raised toward {}", ridge.side, ridge.level);
        }
    }
}

impl ScenarioBuilder for MountainBuilder {
    fn name(&self) -> &'static str {
        "mountain"
    }

    fn initialize(&mut self, parameters: &Parameters) -> Result<()> {
        self.land = LandSettings::from_parameters(parameters, DEFAULTS);
        self.ridge_width = parameters.f32_clamped("ridgeWidth", DEFAULT_RIDGE_WIDTH, 1.0, 1024.0);
        self.ridges = parameters
            .non_blank("ridge")
            .map(|raw| parse_declarations(raw, "ridge"))
            .unwrap_or_default();
        Ok(())
    }

    fn build_flat(&mut self, ctx: &mut BuilderContext<'_>) -> Result<()> {
        let sea = ctx.sea_level();
        let seed = ctx.world_seed();
        ctx.base_fill().fill(ctx.flat, sea + self.land.land_level, self.land.land_offset, seed);
        self.apply_ridges(ctx.flat);
        SurfaceProfile::Alpine.paint(ctx.flat, sea);
        log::debug!("Mountain {} built with {} ridges", ctx.position(), self.ridges.len());
        Ok(())
    }

    fn land_level(&self) -> i32 {
        self.land.land_level
    }

    fn land_offset(&self) -> i32 {
        self.land.land_offset
    }

    fn land_side_level(&self, side: Direction, world: &WorldConstants) -> i32 {
        self.ridges
            .iter()
            .find(|ridge| ridge.side == side)
            .map(|ridge| ridge.level)
            .unwrap_or(world.sea_level + self.land.land_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flat::MaterialId;
    use crate::generation::context::BaseFill;
    use crate::generation::context::test_support::Harness;
    use crate::grid::{HexGridConfig, HexPosition};

    fn east_ridge() -> Parameters {
        Parameters::new()
            .with("ridge", r#"[{"side": "EAST", "level": 100}]"#)
            .with("ridgeWidth", "200")
            .with("landLevel", "10")
            .with("landOffset", "2")
    }

    #[test]
    fn test_ridge_parsing_skips_bad_entries() {
        let mut builder = MountainBuilder::default();
        let params = Parameters::new().with(
            "ridge",
            r#"[{"side": "E", "level": 90}, {"side": "UP", "level": 90}, {"side": "W", "level": 400}]"#,
        );
        builder.initialize(&params).unwrap();
        assert_eq!(builder.ridges(), &[Ridge { side: Direction::East, level: 90 }]);

        builder.initialize(&Parameters::new().with("ridge", "{not json")).unwrap();
        assert!(builder.ridges().is_empty());
    }

    #[test]
    fn test_east_ridge_reaches_level() {
        let pos = HexPosition::new(0, 0);
        let harness = Harness::new(vec![HexGridConfig::new(pos, "mountain")]);
        let mut flat = Flat::new(256, 256);
        let mut ctx = harness.context(pos, &mut flat);
        let mut builder = MountainBuilder::default();
        builder.initialize(&east_ridge()).unwrap();

        // Terrain without the ridge pass, for comparison
        let mut plain = Flat::new(256, 256);
        harness.terrain.fill(&mut plain, 60, 2, harness.services().seed);

        builder.build_flat(&mut ctx).unwrap();
        assert_eq!(flat.level(239, 128), 100);
        assert_eq!(flat.level(5, 128), plain.level(5, 128));
        assert_eq!(flat.material(239, 128), MaterialId::STONE);
    }

    #[test]
    fn test_ridge_only_raises() {
        let mut builder = MountainBuilder::default();
        builder.initialize(&east_ridge()).unwrap();
        let mut flat = Flat::new(64, 64);
        for z in 0..64 {
            for x in 0..64 {
                flat.set_level(x, z, ((x * 7 + z * 3) % 160) as i32);
            }
        }
        let before = flat.clone();
        builder.apply_ridges(&mut flat);
        for z in 0..64 {
            for x in 0..64 {
                assert!(flat.level(x, z) >= before.level(x, z));
            }
        }
    }

    #[test]
    fn test_land_side_level_uses_ridge() {
        let mut builder = MountainBuilder::default();
        builder.initialize(&east_ridge()).unwrap();
        let world = WorldConstants::default();
        assert_eq!(builder.land_side_level(Direction::East, &world), 100);
        assert_eq!(builder.land_side_level(Direction::West, &world), 60);
    }
}
