//! Legacy seam blending by corner-height averaging

use glam::Vec2;

use crate::core::Result;
use crate::flat::Flat;
use crate::generation::context::BuilderContext;
use crate::generation::params::Parameters;
use crate::grid::{Corner, Direction};

use super::path::steps;
use super::ManipulatorBuilder;

const DEFAULT_DEPTH: i32 = 20;

/// Mean of the own sample and every neighbor sample; the own sample alone when
/// no neighbor contributes.
pub fn corner_average(own: i32, neighbors: &[i32]) -> i32 {
    if neighbors.is_empty() {
        return own;
    }
    let sum: i32 = own + neighbors.iter().sum::<i32>();
    (sum as f32 / (neighbors.len() + 1) as f32).round() as i32
}

/// What an edge point blends toward
#[derive(Clone, Copy, Debug, PartialEq)]
enum SideTarget {
    /// Corner interpolation, averaged with the neighbor's declared level when known
    Corners { declared: Option<i32> },
    /// Neighbor is configured but has no Flat yet
    Declared(i32),
}

impl SideTarget {
    fn at(self, corner_target: f32) -> f32 {
        match self {
            SideTarget::Corners { declared: Some(level) } => (corner_target + level as f32) * 0.5,
            SideTarget::Corners { declared: None } => corner_target,
            SideTarget::Declared(level) => level as f32,
        }
    }
}

#[derive(Clone, Debug)]
pub struct EdgeBlender {
    depth: i32,
}

impl Default for EdgeBlender {
    fn default() -> Self {
        Self { depth: DEFAULT_DEPTH }
    }
}

impl EdgeBlender {
    /// Averaged height of each corner, indexed by `Corner::index`.
    /// A neighbor without a built Flat contributes its declared land side level.
    pub fn corner_heights(ctx: &BuilderContext<'_>) -> [i32; 6] {
        let flat: &Flat = &*ctx.flat;
        let mut heights = [0; 6];
        for corner in Corner::ALL {
            let (x, z) = corner.local_position(flat.size_x(), flat.size_z());
            let own = flat.level(x, z) as i32;

            let (a, b) = corner.sides();
            let samples: Vec<i32> = [a, b]
                .into_iter()
                .filter_map(|side| match ctx.neighbor_flat(side) {
                    Some(neighbor) => {
                        let (nx, nz) = corner
                            .mirrored(side)
                            .local_position(neighbor.size_x(), neighbor.size_z());
                        Some(neighbor.level(nx, nz) as i32)
                    }
                    None => ctx.neighbor_land_level(side),
                })
                .collect();
            heights[corner.index()] = corner_average(own, &samples);
        }
        heights
    }

    /// Blend one side inward over `depth` toward its edge target
    fn blend_side(&self, flat: &mut Flat, side: Direction, heights: &[i32; 6], target: SideTarget) {
        let (ca, cb) = side.corners();
        let (ax, az) = ca.local_position(flat.size_x(), flat.size_z());
        let (bx, bz) = cb.local_position(flat.size_x(), flat.size_z());
        let a = Vec2::new(ax as f32, az as f32);
        let b = Vec2::new(bx as f32, bz as f32);
        let center = Vec2::new(flat.size_x() as f32 * 0.5, flat.size_z() as f32 * 0.5);
        let (ha, hb) = (heights[ca.index()] as f32, heights[cb.index()] as f32);

        for (edge, t) in steps(a, b) {
            let goal = target.at(ha + (hb - ha) * t);
            let inward = (center - edge).normalize_or_zero();
            for k in 0..self.depth {
                let p = (edge + inward * k as f32).round();
                let (x, z) = (p.x as usize, p.y as usize);
                if !flat.is_inside(p.x as i32, p.y as i32) {
                    continue;
                }
                let factor = 1.0 - k as f32 / self.depth as f32;
                let current = flat.level(x, z) as f32;
                flat.set_level(x, z, (goal * factor + current * (1.0 - factor)).round() as i32);
            }
        }
    }
}

impl ManipulatorBuilder for EdgeBlender {
    fn name(&self) -> &'static str {
        "edgeblend"
    }

    fn initialize(&mut self, parameters: &Parameters) -> Result<()> {
        self.depth = parameters.i32_or("edgeDepth", DEFAULT_DEPTH).clamp(1, 128);
        Ok(())
    }

    fn build(&mut self, ctx: &mut BuilderContext<'_>) -> Result<()> {
        let heights = Self::corner_heights(ctx);
        let mut blended = 0;
        for side in Direction::ALL {
            let declared = ctx.neighbor_land_level(side);
            let target = match (ctx.neighbor_flat(side), declared) {
                (Some(_), declared) => SideTarget::Corners { declared },
                (None, Some(level)) => SideTarget::Declared(level),
                (None, None) => continue,
            };
            self.blend_side(ctx.flat, side, &heights, target);
            blended += 1;
        }
        log::debug!("Edge blend {}: {} sides, corners {:?}", ctx.position(), blended, heights);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::context::test_support::Harness;
    use crate::grid::{HexGridConfig, HexPosition};

    #[test]
    fn test_corner_average() {
        assert_eq!(corner_average(42, &[]), 42);
        assert_eq!(corner_average(40, &[50]), 45);
        assert_eq!(corner_average(40, &[50, 60]), 50);
    }

    #[test]
    fn test_without_neighbors_nothing_changes() {
        let pos = HexPosition::new(0, 0);
        let harness = Harness::new(vec![HexGridConfig::new(pos, "plains")]);
        let mut flat = Flat::new(32, 32);
        for z in 0..32 {
            for x in 0..32 {
                flat.set_level(x, z, (x + z) as i32);
            }
        }
        let before = flat.clone();
        let mut ctx = harness.context(pos, &mut flat);
        assert_eq!(EdgeBlender::corner_heights(&ctx)[Corner::South.index()], 16 + 31);

        let mut blender = EdgeBlender::default();
        blender.initialize(&Parameters::new()).unwrap();
        blender.build(&mut ctx).unwrap();
        assert_eq!(flat.levels(), before.levels());
    }

    #[test]
    fn test_east_neighbor_pulls_edge() {
        let pos = HexPosition::new(0, 0);
        let east = pos.neighbor(Direction::East);
        let mut harness = Harness::new(vec![
            HexGridConfig::new(pos, "plains"),
            HexGridConfig::new(east, "plains"),
        ]);
        let mut neighbor = Flat::new(32, 32);
        neighbor.fill_level(80);
        harness.flats.insert(east, neighbor);

        let mut flat = Flat::new(32, 32);
        flat.fill_level(40);
        let mut ctx = harness.context(pos, &mut flat);
        let heights = EdgeBlender::corner_heights(&ctx);
        assert_eq!(heights[Corner::NorthEast.index()], 60);
        assert_eq!(heights[Corner::North.index()], 40);

        let mut blender = EdgeBlender::default();
        blender.initialize(&Parameters::new().with("edgeDepth", "8")).unwrap();
        blender.build(&mut ctx).unwrap();

        // Edge column takes the corner average (60) mixed with the declared plains level (55)
        assert_eq!(flat.level(31, 12), 58);
        assert_eq!(flat.level(16, 16), 40);
        assert!(flat.levels().iter().all(|&l| (40..=60).contains(&l)));
    }

    fn blend_toward_mountain(ridge: Option<&str>) -> Flat {
        let pos = HexPosition::new(0, 0);
        let east = pos.neighbor(Direction::East);
        let mut mountain = HexGridConfig::new(east, "mountain");
        if let Some(ridge) = ridge {
            mountain = mountain.with_parameter("g_ridge", ridge);
        }
        let harness = Harness::new(vec![HexGridConfig::new(pos, "plains"), mountain]);

        let mut flat = Flat::new(32, 32);
        flat.fill_level(40);
        let mut ctx = harness.context(pos, &mut flat);
        let mut blender = EdgeBlender::default();
        blender.initialize(&Parameters::new().with("edgeDepth", "8")).unwrap();
        blender.build(&mut ctx).unwrap();
        flat
    }

    #[test]
    fn test_unbuilt_neighbor_uses_declared_level() {
        // The neighbor's west side faces this cell
        let ridged = blend_toward_mountain(Some(r#"[{"side": "W", "level": 100}]"#));
        let plain = blend_toward_mountain(None);

        assert_eq!(ridged.level(31, 12), 100);
        assert_eq!(plain.level(31, 12), 75);
        assert!(ridged.level(28, 16) > plain.level(28, 16));
        assert_eq!(ridged.level(16, 16), 40);
        // West side has no neighbor at all
        assert_eq!(ridged.level(0, 16), 40);
    }
}
