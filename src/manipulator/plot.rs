//! Plot overlay: flat rectangular or circular areas at a fixed level

use glam::Vec2;
use serde::Deserialize;

use crate::core::{Error, Result};
use crate::flat::{Flat, MaterialId};
use crate::generation::context::BuilderContext;
use crate::generation::params::{parse_declarations, Declaration, Parameters};

use super::path::material_or;
use super::ManipulatorBuilder;

/// Footprint of a plot around its center
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlotShape {
    Rect { half_x: f32, half_z: f32 },
    Circle { radius: f32 },
}

fn default_connect() -> bool {
    true
}

/// `{ lx, lz, sizeX/sizeZ | size, level, material, groupId }`.
/// `lx`/`lz` is the center; `size` alone makes a circle of that diameter.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotDecl {
    pub lx: f32,
    pub lz: f32,
    #[serde(default)]
    pub size_x: Option<f32>,
    #[serde(default)]
    pub size_z: Option<f32>,
    #[serde(default)]
    pub size: Option<f32>,
    #[serde(default)]
    pub level: Option<i32>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    /// Join the plot to the nearest village road
    #[serde(default = "default_connect")]
    pub connect: bool,
}

impl Declaration for PlotDecl {
    fn validate(&self) -> Result<()> {
        let Some(shape) = self.shape() else {
            return Err(Error::invalid("plot.size", "needs sizeX and sizeZ, or size"));
        };
        let extent = match shape {
            PlotShape::Rect { half_x, half_z } => half_x.min(half_z),
            PlotShape::Circle { radius } => radius,
        };
        if !(extent > 0.0 && extent <= 256.0) {
            return Err(Error::invalid("plot.size", format!("extent {} outside (0, 256]", extent)));
        }
        Ok(())
    }
}

impl PlotDecl {
    pub fn shape(&self) -> Option<PlotShape> {
        match (self.size_x, self.size_z, self.size) {
            (Some(sx), Some(sz), _) => Some(PlotShape::Rect { half_x: sx * 0.5, half_z: sz * 0.5 }),
            (_, _, Some(size)) => Some(PlotShape::Circle { radius: size * 0.5 }),
            _ => None,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.lx, self.lz)
    }

    pub fn covers(&self, p: Vec2) -> bool {
        let d = p - self.center();
        match self.shape() {
            Some(PlotShape::Rect { half_x, half_z }) => d.x.abs() <= half_x && d.y.abs() <= half_z,
            Some(PlotShape::Circle { radius }) => d.length() <= radius,
            None => false,
        }
    }

    /// Point on the plot outline closest to `target`
    pub fn boundary_toward(&self, target: Vec2) -> Vec2 {
        let c = self.center();
        match self.shape() {
            Some(PlotShape::Rect { half_x, half_z }) => {
                let half = Vec2::new(half_x, half_z);
                target.clamp(c - half, c + half)
            }
            Some(PlotShape::Circle { radius }) => {
                let d = target - c;
                c + d.normalize_or_zero() * radius.min(d.length())
            }
            None => c,
        }
    }

    /// Level the plot and paint it; returns the number of columns written
    pub fn apply(&self, flat: &mut Flat, level: i32, material: MaterialId) -> usize {
        let mut written = 0;
        for z in 0..flat.size_z() {
            for x in 0..flat.size_x() {
                if !self.covers(Vec2::new(x as f32, z as f32)) {
                    continue;
                }
                flat.set_level(x, z, level);
                flat.set_material(x, z, material);
                if let Some(group) = &self.group_id {
                    flat.set_group(x, z, group);
                }
                written += 1;
            }
        }
        written
    }
}

/// Apply plots with fallback level and material
pub fn apply_plots(flat: &mut Flat, plots: &[PlotDecl], level: i32, material: Option<&str>) {
    for plot in plots {
        let material = material_or(flat, plot.material.as_deref().or(material), MaterialId::DIRT);
        let written = plot.apply(flat, plot.level.unwrap_or(level), material);
        if written == 0 {
            log::debug!("Plot at ({}, {}) lies outside the flat", plot.lx, plot.lz);
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PlotBuilder {
    plots: Vec<PlotDecl>,
}

impl PlotBuilder {
    pub fn plots(&self) -> &[PlotDecl] {
        &self.plots
    }
}

impl ManipulatorBuilder for PlotBuilder {
    fn name(&self) -> &'static str {
        "plot"
    }

    fn initialize(&mut self, parameters: &Parameters) -> Result<()> {
        self.plots = parameters
            .non_blank("plot")
            .map(|raw| parse_declarations(raw, "plot"))
            .unwrap_or_default();
        Ok(())
    }

    fn build(&mut self, ctx: &mut BuilderContext<'_>) -> Result<()> {
        let level = ctx.ground_level();
        apply_plots(ctx.flat, &self.plots, level, None);
        log::debug!("Plots {}: {}", ctx.position(), self.plots.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::context::test_support::Harness;
    use crate::grid::{HexGridConfig, HexPosition};

    fn run(raw: &str, flat: &mut Flat) -> PlotBuilder {
        let pos = HexPosition::new(0, 0);
        let harness = Harness::new(vec![HexGridConfig::new(pos, "plains")]);
        let mut ctx = harness.context(pos, flat);
        let mut builder = PlotBuilder::default();
        builder.initialize(&Parameters::new().with("plot", raw)).unwrap();
        builder.build(&mut ctx).unwrap();
        builder
    }

    fn grass() -> Flat {
        let mut flat = Flat::new(32, 32);
        flat.fill_level(52);
        flat.fill_material(MaterialId::GRASS);
        flat
    }

    #[test]
    fn test_rect_and_circle_plots() {
        let mut flat = grass();
        run(
            r#"[{"lx": 16, "lz": 8, "sizeX": 10, "sizeZ": 6, "level": 58, "material": "stone", "groupId": "farm"},
                {"lx": 16, "lz": 24, "size": 8}]"#,
            &mut flat,
        );
        assert_eq!(flat.level(12, 6), 58);
        assert_eq!(flat.material(12, 6), MaterialId::STONE);
        assert_eq!(flat.group(12, 6), Some("farm"));
        assert_eq!(flat.level(22, 8), 52);

        // Defaults: ground level and dirt
        assert_eq!(flat.level(19, 24), 60);
        assert_eq!(flat.material(19, 24), MaterialId::DIRT);
        assert_eq!(flat.level(21, 24), 52);
    }

    #[test]
    fn test_plot_without_size_is_skipped() {
        let mut flat = grass();
        let builder = run(r#"[{"lx": 4, "lz": 4}, {"lx": 4, "lz": 4, "size": 2}]"#, &mut flat);
        assert_eq!(builder.plots().len(), 1);
    }

    #[test]
    fn test_boundary_toward() {
        let plot: PlotDecl = serde_json::from_str(r#"{"lx": 10, "lz": 10, "sizeX": 4, "sizeZ": 4}"#).unwrap();
        assert_eq!(plot.boundary_toward(Vec2::new(10.0, 30.0)), Vec2::new(10.0, 12.0));
        let circle: PlotDecl = serde_json::from_str(r#"{"lx": 0, "lz": 0, "size": 6}"#).unwrap();
        assert_eq!(circle.boundary_toward(Vec2::new(10.0, 0.0)), Vec2::new(3.0, 0.0));
    }
}
