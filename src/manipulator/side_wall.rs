//! Side-wall overlay: a wall along a whole hexagon side

use serde::Deserialize;

use crate::core::Result;
use crate::generation::context::BuilderContext;
use crate::generation::params::{parse_declarations, Declaration, Parameters};
use crate::grid::Direction;
use crate::math::HexGeometry;

use super::path::clamp_to_flat;
use super::wall::{raise_wall, stroke_pixels, WallStyle};
use super::ManipulatorBuilder;

/// `{ side, height, level, width, minimum, type, respectRoad, respectRiver }`
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SideWallDecl {
    pub side: Direction,
    #[serde(flatten)]
    pub style: WallStyle,
}

impl Declaration for SideWallDecl {
    fn validate(&self) -> Result<()> {
        self.style.validate()
    }
}

#[derive(Clone, Debug, Default)]
pub struct SideWallBuilder {
    walls: Vec<SideWallDecl>,
}

impl ManipulatorBuilder for SideWallBuilder {
    fn name(&self) -> &'static str {
        "sidewall"
    }

    fn initialize(&mut self, parameters: &Parameters) -> Result<()> {
        self.walls = parameters
            .non_blank("sideWall")
            .map(|raw| parse_declarations(raw, "side wall"))
            .unwrap_or_default();
        Ok(())
    }

    fn build(&mut self, ctx: &mut BuilderContext<'_>) -> Result<()> {
        let geometry = HexGeometry::for_flat(ctx.flat.size_x(), ctx.flat.size_z());
        for wall in &self.walls {
            // Inset by half the width so the stroke stays inside the hexagon
            let inset = geometry.inward_normal(wall.side) * (wall.style.width * 0.5 + 0.5);
            let (a, b) = geometry.side_corners(wall.side);
            let a = clamp_to_flat(ctx.flat, a + inset);
            let b = clamp_to_flat(ctx.flat, b + inset);
            let pixels = stroke_pixels(ctx.flat, a, b, wall.style.width);
            let raised = raise_wall(ctx.flat, &pixels, &wall.style);
            log::debug!("Side wall {} {}: {} columns", ctx.position(), wall.side, raised);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flat::{Flat, MaterialId};
    use crate::generation::context::test_support::Harness;
    use crate::grid::{HexGridConfig, HexPosition};

    #[test]
    fn test_west_side_wall() {
        let pos = HexPosition::new(0, 0);
        let harness = Harness::new(vec![HexGridConfig::new(pos, "plains")]);
        let mut flat = Flat::new(64, 64);
        flat.fill_level(50);
        flat.fill_material(MaterialId::GRASS);
        let mut ctx = harness.context(pos, &mut flat);

        let mut builder = SideWallBuilder::default();
        builder
            .initialize(&Parameters::new().with("sideWall", r#"[{"side": "WEST", "height": 6, "level": 60}]"#))
            .unwrap();
        builder.build(&mut ctx).unwrap();

        // West side line sits at x = 32 - 32·cos30° ≈ 4.3; the wall is inset from it
        let geometry = HexGeometry::for_flat(64, 64);
        let x = (geometry.side_midpoint(Direction::West).x + 2.0).round() as usize;
        assert_eq!(flat.level(x, 32), 66);
        assert_eq!(flat.material(x, 32), MaterialId::WALL);
        assert_eq!(flat.level(32, 32), 50);
    }
}
