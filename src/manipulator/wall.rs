//! Wall overlay: straight strokes from a start point to route destinations

use std::collections::BTreeSet;

use glam::Vec2;
use serde::Deserialize;

use crate::core::{Error, Result};
use crate::flat::{Flat, MaterialId, WATER_BLOCK};
use crate::generation::context::BuilderContext;
use crate::generation::params::{parse_declarations, Declaration, Parameters};

use super::path::{clamp_to_flat, disc, flat_center, material_or, steps, Anchor};
use super::ManipulatorBuilder;

fn default_height() -> i32 {
    4
}

fn default_width() -> f32 {
    3.0
}

fn default_minimum() -> i32 {
    1
}

/// Shape and behavior shared by wall and side-wall strokes
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallStyle {
    /// Height above the wall base
    #[serde(default = "default_height")]
    pub height: i32,
    /// Lowest absolute base level
    #[serde(default)]
    pub level: i32,
    #[serde(default = "default_width")]
    pub width: f32,
    /// Clearance kept above the terrain
    #[serde(default = "default_minimum")]
    pub minimum: i32,
    /// Material name, `wall` when absent
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub respect_road: bool,
    #[serde(default)]
    pub respect_river: bool,
}

impl Default for WallStyle {
    fn default() -> Self {
        Self {
            height: default_height(),
            level: 0,
            width: default_width(),
            minimum: default_minimum(),
            kind: None,
            respect_road: false,
            respect_river: false,
        }
    }
}

impl WallStyle {
    pub fn validate(&self) -> Result<()> {
        if !(self.width > 0.0 && self.width <= 32.0) {
            return Err(Error::invalid("wall.width", format!("{} outside (0, 32]", self.width)));
        }
        if !(0..=255).contains(&self.height) {
            return Err(Error::invalid("wall.height", format!("{} outside 0..=255", self.height)));
        }
        Ok(())
    }

    /// Whether a column must be left open
    fn skips(&self, flat: &Flat, x: usize, z: usize) -> bool {
        (self.respect_road && flat.material(x, z).is_road())
            || (self.respect_river && flat.has_extra_block(x, z, WATER_BLOCK))
    }

    /// Top level of the wall over a column at `terrain`
    pub fn top(&self, terrain: i32) -> i32 {
        self.level.max(terrain + self.minimum) + self.height
    }
}

/// Pixels covered by a stroke of `width` from `from` to `to`
pub fn stroke_pixels(flat: &Flat, from: Vec2, to: Vec2, width: f32) -> BTreeSet<(usize, usize)> {
    let half = (width * 0.5).max(0.5);
    steps(from, to)
        .flat_map(|(p, _)| disc(flat, p, half))
        .map(|(x, z, _)| (x, z))
        .collect()
}

/// Raise the collected columns; tops are computed before any write
pub fn raise_wall(flat: &mut Flat, pixels: &BTreeSet<(usize, usize)>, style: &WallStyle) -> usize {
    let material = material_or(flat, style.kind.as_deref(), MaterialId::WALL);
    let tops: Vec<(usize, usize, i32)> = pixels
        .iter()
        .filter(|&&(x, z)| !style.skips(flat, x, z))
        .map(|&(x, z)| (x, z, style.top(flat.level(x, z) as i32)))
        .collect();
    for &(x, z, top) in &tops {
        flat.set_level(x, z, top);
        flat.set_material(x, z, material);
    }
    tops.len()
}

/// One wall destination
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct WallRoute {
    #[serde(flatten)]
    pub anchor: Anchor,
    #[serde(flatten)]
    pub style: WallStyle,
}

/// `{ lx, lz, route: [...] }`; the start defaults to the cell center
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct WallDecl {
    #[serde(default)]
    pub lx: Option<f32>,
    #[serde(default)]
    pub lz: Option<f32>,
    pub route: Vec<WallRoute>,
}

impl Declaration for WallDecl {
    fn validate(&self) -> Result<()> {
        if self.route.is_empty() {
            return Err(Error::invalid("wall.route", "empty route"));
        }
        for leg in &self.route {
            leg.anchor.validate("wall.route")?;
            leg.style.validate()?;
        }
        Ok(())
    }
}

impl WallDecl {
    fn start(&self, flat: &Flat) -> Vec2 {
        match (self.lx, self.lz) {
            (Some(x), Some(z)) => clamp_to_flat(flat, Vec2::new(x, z)),
            _ => flat_center(flat),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct WallBuilder {
    walls: Vec<WallDecl>,
}

impl WallBuilder {
    pub fn walls(&self) -> &[WallDecl] {
        &self.walls
    }
}

impl ManipulatorBuilder for WallBuilder {
    fn name(&self) -> &'static str {
        "wall"
    }

    fn initialize(&mut self, parameters: &Parameters) -> Result<()> {
        self.walls = parameters
            .non_blank("wall")
            .map(|raw| parse_declarations(raw, "wall"))
            .unwrap_or_default();
        Ok(())
    }

    fn build(&mut self, ctx: &mut BuilderContext<'_>) -> Result<()> {
        for wall in &self.walls {
            let start = wall.start(ctx.flat);
            for leg in &wall.route {
                let Some(end) = leg.anchor.resolve(ctx.flat) else {
                    continue;
                };
                let pixels = stroke_pixels(ctx.flat, start, end, leg.style.width);
                let raised = raise_wall(ctx.flat, &pixels, &leg.style);
                log::debug!("Wall {}: {} of {} columns raised", ctx.position(), raised, pixels.len());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::context::test_support::Harness;
    use crate::grid::{HexGridConfig, HexPosition};

    fn run(raw: &str, flat: &mut Flat) {
        let pos = HexPosition::new(0, 0);
        let harness = Harness::new(vec![HexGridConfig::new(pos, "plains")]);
        let mut ctx = harness.context(pos, flat);
        let mut builder = WallBuilder::default();
        builder.initialize(&Parameters::new().with("wall", raw)).unwrap();
        builder.build(&mut ctx).unwrap();
    }

    #[test]
    fn test_wall_top_formula() {
        let style = WallStyle { level: 58, ..WallStyle::default() };
        assert_eq!(style.top(50), 62);
        assert_eq!(style.top(60), 65);
    }

    #[test]
    fn test_wall_to_east_side() {
        let mut flat = Flat::new(32, 32);
        flat.fill_level(50);
        flat.fill_material(MaterialId::GRASS);
        run(r#"{"route": [{"side": "E", "height": 4, "width": 1}]}"#, &mut flat);

        assert_eq!(flat.level(16, 16), 55);
        assert_eq!(flat.level(24, 16), 55);
        assert_eq!(flat.material(24, 16), MaterialId::WALL);
        assert_eq!(flat.level(16, 20), 50);
    }

    #[test]
    fn test_wall_respects_road_and_river() {
        let mut flat = Flat::new(32, 32);
        flat.fill_level(50);
        flat.fill_material(MaterialId::GRASS);
        flat.set_material(20, 16, MaterialId::STREET);
        flat.set_extra_block(22, 50, 16, WATER_BLOCK);
        run(
            r#"{"lx": 10, "lz": 16, "route": [{"lx": 26, "lz": 16, "width": 1, "respectRoad": true, "respectRiver": true, "type": "wood"}]}"#,
            &mut flat,
        );
        assert_eq!(flat.level(20, 16), 50);
        assert_eq!(flat.level(22, 16), 50);
        assert_eq!(flat.level(21, 16), 55);
        assert_eq!(flat.material(21, 16), MaterialId::WOOD);
    }

    #[test]
    fn test_invalid_route_is_skipped() {
        let mut builder = WallBuilder::default();
        let params = Parameters::new().with(
            "wall",
            r#"[{"route": []}, {"route": [{"side": "E", "width": 0}]}, {"route": [{"side": "W"}]}]"#,
        );
        builder.initialize(&params).unwrap();
        assert_eq!(builder.walls().len(), 1);
    }
}
