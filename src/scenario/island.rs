//! Island scenario: ocean floor with one large and several small islands

use glam::Vec2;

use crate::core::Result;
use crate::flat::Flat;
use crate::generation::context::BuilderContext;
use crate::generation::params::Parameters;
use crate::math::{HexGeometry, SimpleRng};
use crate::terrain::SurfaceProfile;

use super::{LandSettings, ScenarioBuilder};

const DEFAULTS: LandSettings = LandSettings::new(-15, 4);

/// One circular island raised above the floor
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IslandShape {
    pub center: Vec2,
    pub radius: f32,
    /// Absolute summit level
    pub peak: i32,
}

impl IslandShape {
    /// Level at `p`, or None outside the island's radius
    pub fn level_at(&self, p: Vec2, sea_level: i32) -> Option<i32> {
        let t = p.distance(self.center) / self.radius;
        if t >= 1.0 {
            return None;
        }
        let falloff = 1.0 - t * t;
        Some(sea_level + (falloff * (self.peak - sea_level) as f32).round() as i32)
    }
}

/// Ocean floor builder with islands
#[derive(Clone, Debug)]
pub struct IslandBuilder {
    land: LandSettings,
    /// Summit height of the large island above sea level
    peak_height: i32,
    small_islands: usize,
}

impl Default for IslandBuilder {
    fn default() -> Self {
        Self {
            land: DEFAULTS,
            peak_height: 14,
            small_islands: 3,
        }
    }
}

impl IslandBuilder {
    /// Deterministic island layout for a buffer
    pub fn layout(&self, size_x: usize, size_z: usize, sea_level: i32, seed: u32) -> Vec<IslandShape> {
        let geometry = HexGeometry::for_flat(size_x, size_z);
        let mut rng = SimpleRng::new(seed as u64);
        let mut islands = Vec::with_capacity(self.small_islands + 1);

        let jitter = geometry.radius * 0.15;
        islands.push(IslandShape {
            center: geometry.center + Vec2::new(rng.range(-jitter, jitter), rng.range(-jitter, jitter)),
            radius: geometry.radius * rng.range(0.35, 0.45),
            peak: sea_level + self.peak_height,
        });

        for _ in 0..self.small_islands {
            let angle = rng.range(0.0, std::f32::consts::TAU);
            let distance = geometry.radius * rng.range(0.45, 0.7);
            islands.push(IslandShape {
                center: geometry.center + Vec2::new(angle.cos(), angle.sin()) * distance,
                radius: geometry.radius * rng.range(0.06, 0.12),
                peak: sea_level + rng.range_i32(2, (self.peak_height / 2).max(2)),
            });
        }
        islands
    }
}

impl ScenarioBuilder for IslandBuilder {
    fn name(&self) -> &'static str {
        "island"
    }

    fn initialize(&mut self, parameters: &Parameters) -> Result<()> {
        self.land = LandSettings::from_parameters(parameters, DEFAULTS);
        self.peak_height = parameters.i32_or("islandHeight", 14).clamp(1, 200);
        self.small_islands = parameters.usize_or("smallIslands", 3).min(32);
        Ok(())
    }

    fn build_flat(&mut self, ctx: &mut BuilderContext<'_>) -> Result<()> {
        let sea = ctx.sea_level();
        let base = (sea + self.land.land_level).min(sea - 1);
        let seed = ctx.world_seed();
        ctx.base_fill().fill(ctx.flat, base, self.land.land_offset, seed);

        let islands = self.layout(ctx.flat.size_x(), ctx.flat.size_z(), sea, ctx.seed(0));
        raise_islands(ctx.flat, &islands, sea);
        SurfaceProfile::Lowland.paint(ctx.flat, sea);
        log::debug!("Island {} built with {} islands", ctx.position(), islands.len());
        Ok(())
    }

    fn land_level(&self) -> i32 {
        self.land.land_level
    }

    fn land_offset(&self) -> i32 {
        self.land.land_offset
    }

    fn is_water(&self) -> bool {
        true
    }
}

fn raise_islands(flat: &mut Flat, islands: &[IslandShape], sea_level: i32) {
    for z in 0..flat.size_z() {
        for x in 0..flat.size_x() {
            let p = Vec2::new(x as f32, z as f32);
            let current = flat.level(x, z) as i32;
            let raised = islands
                .iter()
                .filter_map(|island| island.level_at(p, sea_level))
                .fold(current, i32::max);
            if raised > current {
                flat.set_level(x, z, raised);
            }
        }
    }
}
