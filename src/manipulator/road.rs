//! Road overlay: strokes from declared sides to the cell center

use serde::Deserialize;

use crate::core::{Error, Result};
use crate::flat::{Flat, MaterialId};
use crate::generation::context::BuilderContext;
use crate::generation::params::{parse_declarations, Declaration, Parameters};
use crate::grid::Direction;

use super::path::{disc, flat_center, steps, Anchor};
use super::ManipulatorBuilder;

/// Width of the transition ring around the road surface
const EDGE_RING: f32 = 1.5;
/// Widest accepted road stroke
pub const MAX_ROAD_WIDTH: f32 = 64.0;

/// Surface type of a road
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoadKind {
    #[default]
    Street,
    Track,
}

impl RoadKind {
    pub fn material(self) -> MaterialId {
        match self {
            RoadKind::Street => MaterialId::STREET,
            RoadKind::Track => MaterialId::TRACK,
        }
    }
}

/// `{ side, width, level, type }`
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RoadDecl {
    pub side: Direction,
    #[serde(default = "default_width")]
    pub width: f32,
    /// Absolute surface level; the terrain level is kept when absent
    #[serde(default)]
    pub level: Option<i32>,
    #[serde(default, rename = "type")]
    pub kind: RoadKind,
}

fn default_width() -> f32 {
    3.0
}

impl Declaration for RoadDecl {
    fn validate(&self) -> Result<()> {
        if !(self.width > 0.0 && self.width <= MAX_ROAD_WIDTH) {
            return Err(Error::invalid("road.width", format!("{} outside (0, {}]", self.width, MAX_ROAD_WIDTH)));
        }
        Ok(())
    }
}

/// Stroke of a road surface with its transition ring between two points.
///
/// `original` holds the levels before any road was drawn so the ring blends
/// against untouched terrain.
pub fn stroke_road(
    flat: &mut Flat,
    original: &[u8],
    from: glam::Vec2,
    to: glam::Vec2,
    width: f32,
    level: Option<i32>,
    material: MaterialId,
) {
    let half = width * 0.5;
    let size_x = flat.size_x();
    for (p, _) in steps(from, to) {
        for (x, z, _) in disc(flat, p, half) {
            if let Some(level) = level {
                flat.set_level(x, z, level);
            }
            flat.set_material(x, z, material);
        }
        for (x, z, d) in disc(flat, p, half + EDGE_RING) {
            if d <= half || flat.material(x, z).is_road() {
                continue;
            }
            if let Some(level) = level {
                let terrain = original[z * size_x + x] as i32;
                flat.set_level(x, z, (terrain + level) / 2);
            }
            flat.set_material(x, z, MaterialId::ROAD_EDGE);
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct RoadBuilder {
    roads: Vec<RoadDecl>,
}

impl RoadBuilder {
    pub fn roads(&self) -> &[RoadDecl] {
        &self.roads
    }
}

impl ManipulatorBuilder for RoadBuilder {
    fn name(&self) -> &'static str {
        "road"
    }

    fn initialize(&mut self, parameters: &Parameters) -> Result<()> {
        self.roads = parameters
            .non_blank("road")
            .map(|raw| parse_declarations(raw, "road"))
            .unwrap_or_default();
        Ok(())
    }

    fn build(&mut self, ctx: &mut BuilderContext<'_>) -> Result<()> {
        let original = ctx.flat.levels().to_vec();
        let center = flat_center(ctx.flat);
        for road in &self.roads {
            let Some(start) = Anchor::side(road.side).resolve(ctx.flat) else {
                continue;
            };
            stroke_road(ctx.flat, &original, start, center, road.width, road.level, road.kind.material());
            log::debug!("Road {} from {} ({:?})", ctx.position(), road.side, road.kind);
        }
        Ok(())
    }
}
