//! Village overlay: plots and roads sharing a base level and material

use glam::Vec2;
use serde::Deserialize;

use crate::core::{Error, Result};
use crate::flat::MaterialId;
use crate::generation::context::BuilderContext;
use crate::generation::params::{parse_declarations, Declaration, Parameters};
use crate::math::nearest_point_on_segment;

use super::path::Anchor;
use super::plot::{apply_plots, PlotDecl};
use super::road::{stroke_road, RoadKind, MAX_ROAD_WIDTH};
use super::ManipulatorBuilder;

/// Width of the track joining a plot to the nearest road
const CONNECTOR_WIDTH: f32 = 2.0;

fn default_road_width() -> f32 {
    3.0
}

/// `{ from, to, width, type }`
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct VillageRoad {
    pub from: Anchor,
    pub to: Anchor,
    #[serde(default = "default_road_width")]
    pub width: f32,
    #[serde(default, rename = "type")]
    pub kind: RoadKind,
}

/// `{ level, material, plots: [...], roads: [...] }`
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct VillageDecl {
    #[serde(default)]
    pub level: Option<i32>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub plots: Vec<PlotDecl>,
    #[serde(default)]
    pub roads: Vec<VillageRoad>,
}

impl Declaration for VillageDecl {
    fn validate(&self) -> Result<()> {
        for plot in &self.plots {
            plot.validate()?;
        }
        for road in &self.roads {
            if !(road.width > 0.0 && road.width <= MAX_ROAD_WIDTH) {
                return Err(Error::invalid(
                    "village.road.width",
                    format!("{} outside (0, {}]", road.width, MAX_ROAD_WIDTH),
                ));
            }
            road.from.validate("village.road.from")?;
            road.to.validate("village.road.to")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default)]
pub struct VillageBuilder {
    villages: Vec<VillageDecl>,
}

impl VillageBuilder {
    pub fn villages(&self) -> &[VillageDecl] {
        &self.villages
    }
}

/// Nearest point over all segments
fn nearest_on_roads(p: Vec2, segments: &[(Vec2, Vec2)]) -> Option<Vec2> {
    segments
        .iter()
        .map(|&(a, b)| nearest_point_on_segment(p, a, b))
        .min_by(|u, v| u.distance_squared(p).total_cmp(&v.distance_squared(p)))
}

impl ManipulatorBuilder for VillageBuilder {
    fn name(&self) -> &'static str {
        "village"
    }

    fn initialize(&mut self, parameters: &Parameters) -> Result<()> {
        self.villages = parameters
            .non_blank("village")
            .map(|raw| parse_declarations(raw, "village"))
            .unwrap_or_default();
        Ok(())
    }

    fn build(&mut self, ctx: &mut BuilderContext<'_>) -> Result<()> {
        for village in &self.villages {
            let level = village.level.unwrap_or(ctx.ground_level());
            apply_plots(ctx.flat, &village.plots, level, village.material.as_deref());

            let segments: Vec<(Vec2, Vec2, &VillageRoad)> = village
                .roads
                .iter()
                .filter_map(|road| Some((road.from.resolve(ctx.flat)?, road.to.resolve(ctx.flat)?, road)))
                .collect();
            let lines: Vec<(Vec2, Vec2)> = segments.iter().map(|&(a, b, _)| (a, b)).collect();

            let original = ctx.flat.levels().to_vec();
            for plot in village.plots.iter().filter(|plot| plot.connect) {
                let Some(target) = nearest_on_roads(plot.center(), &lines) else {
                    break;
                };
                let start = plot.boundary_toward(target);
                let plot_level = plot.level.unwrap_or(level);
                stroke_road(ctx.flat, &original, start, target, CONNECTOR_WIDTH, Some(plot_level), MaterialId::TRACK);
            }
            for &(a, b, road) in &segments {
                stroke_road(ctx.flat, &original, a, b, road.width, Some(level), road.kind.material());
            }
            log::debug!(
                "Village {}: {} plots, {} roads",
                ctx.position(),
                village.plots.len(),
                segments.len()
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flat::Flat;
    use crate::generation::context::test_support::Harness;
    use crate::grid::{HexGridConfig, HexPosition};

    const VILLAGE: &str = r#"{
        "level": 55,
        "material": "dirt",
        "plots": [
            {"lx": 20, "lz": 12, "sizeX": 8, "sizeZ": 6, "groupId": "house-1"},
            {"lx": 44, "lz": 50, "size": 6, "level": 57, "material": "wood", "connect": false}
        ],
        "roads": [{"from": {"side": "W"}, "to": {"side": "E"}, "width": 3, "type": "street"}]
    }"#;

    fn run(raw: &str) -> (Flat, VillageBuilder) {
        let pos = HexPosition::new(0, 0);
        let harness = Harness::new(vec![HexGridConfig::new(pos, "village")]);
        let mut flat = Flat::new(64, 64);
        flat.fill_level(50);
        flat.fill_material(MaterialId::GRASS);
        let mut ctx = harness.context(pos, &mut flat);
        let mut builder = VillageBuilder::default();
        builder.initialize(&Parameters::new().with("village", raw)).unwrap();
        builder.build(&mut ctx).unwrap();
        (flat, builder)
    }

    #[test]
    fn test_village_layout() {
        let (flat, _) = run(VILLAGE);
        // Plot at the shared level and material
        assert_eq!(flat.level(20, 12), 55);
        assert_eq!(flat.material(20, 12), MaterialId::DIRT);
        assert_eq!(flat.group(18, 10), Some("house-1"));
        // Plot overrides
        assert_eq!(flat.level(44, 50), 57);
        assert_eq!(flat.material(44, 50), MaterialId::WOOD);
        // Main road across the middle
        assert_eq!(flat.material(32, 32), MaterialId::STREET);
        assert_eq!(flat.level(32, 32), 55);
        // Connector from the plot's south edge down to the road
        assert_eq!(flat.material(20, 24), MaterialId::TRACK);
        // The unconnected plot gets no connector
        assert_eq!(flat.material(44, 40), MaterialId::GRASS);
    }

    #[test]
    fn test_nearest_on_roads() {
        let lines = [
            (Vec2::new(0.0, 10.0), Vec2::new(20.0, 10.0)),
            (Vec2::new(0.0, 0.0), Vec2::new(0.0, 20.0)),
        ];
        assert_eq!(nearest_on_roads(Vec2::new(12.0, 4.0), &lines), Some(Vec2::new(12.0, 10.0)));
        assert_eq!(nearest_on_roads(Vec2::new(2.0, 4.0), &lines), Some(Vec2::new(0.0, 4.0)));
        assert_eq!(nearest_on_roads(Vec2::ONE, &[]), None);
    }

    #[test]
    fn test_bad_plot_drops_village() {
        let (_, builder) = run(r#"[{"plots": [{"lx": 1, "lz": 1}]}, {"level": 52}]"#);
        assert_eq!(builder.villages().len(), 1);
        assert_eq!(builder.villages()[0].level, Some(52));
    }

    #[test]
    fn test_oversized_road_drops_village() {
        let raw = r#"[
            {"roads": [{"from": {"side": "W"}, "to": {"side": "E"}, "width": 1e10}]},
            {"roads": [{"from": {"side": "W"}, "to": {"side": "E"}, "width": 0}]},
            {"level": 53, "roads": [{"from": {"side": "W"}, "to": {"side": "E"}, "width": 64}]}
        ]"#;
        let (flat, builder) = run(raw);
        assert_eq!(builder.villages().len(), 1);
        assert_eq!(builder.villages()[0].level, Some(53));
        assert_eq!(flat.level(32, 32), 53);
    }
}
