//! River overlay: curved beds carved between endpoint pairs, with a water surface

use std::collections::HashMap;

use glam::Vec2;
use serde::Deserialize;

use crate::core::{Error, Result};
use crate::flat::{Flat, MaterialId, WATER_BLOCK};
use crate::generation::context::BuilderContext;
use crate::generation::params::{parse_declarations, Declaration, Parameters};
use crate::math::line_noise;

use super::path::{disc, lerp_opt, steps, Anchor};
use super::ManipulatorBuilder;

/// Width of the bank ring around the bed
const BANK: f32 = 2.0;
const RIVER_SALT: u32 = 0x7269;

/// One river endpoint
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RiverPoint {
    #[serde(flatten)]
    pub anchor: Anchor,
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_depth")]
    pub depth: i32,
    /// Water surface level; the terrain level is used when absent
    #[serde(default)]
    pub level: Option<i32>,
}

fn default_width() -> f32 {
    6.0
}

fn default_depth() -> i32 {
    3
}

fn default_meander() -> f32 {
    0.12
}

/// `{ from: [...], to: [...], groupId }`; every from is joined with every to
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiverDecl {
    pub from: Vec<RiverPoint>,
    pub to: Vec<RiverPoint>,
    #[serde(default)]
    pub group_id: Option<String>,
    /// Lateral curve amplitude as a share of the path length
    #[serde(default = "default_meander")]
    pub meander: f32,
}

impl Declaration for RiverDecl {
    fn validate(&self) -> Result<()> {
        if self.from.is_empty() || self.to.is_empty() {
            return Err(Error::invalid("river", "needs at least one from and one to"));
        }
        for point in self.from.iter().chain(&self.to) {
            point.anchor.validate("river.point")?;
            if !(point.width > 0.0 && point.width <= 128.0) {
                return Err(Error::invalid("river.width", format!("{} outside (0, 128]", point.width)));
            }
            if !(0..=64).contains(&point.depth) {
                return Err(Error::invalid("river.depth", format!("{} outside 0..=64", point.depth)));
            }
        }
        if !(0.0..=1.0).contains(&self.meander) {
            return Err(Error::invalid("river.meander", format!("{} outside 0..=1", self.meander)));
        }
        Ok(())
    }
}

/// Water surface lookup for one build: declared level, else a previously
/// recorded water surface, else the terrain before this build
struct Surface<'s> {
    previous: &'s HashMap<(usize, usize), i32>,
    original: &'s [u8],
    size_x: usize,
}

impl Surface<'_> {
    fn at(&self, x: usize, z: usize, declared: Option<i32>) -> i32 {
        declared
            .or_else(|| self.previous.get(&(x, z)).copied())
            .unwrap_or(self.original[z * self.size_x + x] as i32)
    }
}

#[derive(Clone, Debug, Default)]
pub struct RiverBuilder {
    rivers: Vec<RiverDecl>,
}

impl RiverBuilder {
    pub fn rivers(&self) -> &[RiverDecl] {
        &self.rivers
    }

    /// Carve one from→to pairing; records bed columns into `water`
    fn carve(
        flat: &mut Flat,
        surface: &Surface<'_>,
        (from, to): (&RiverPoint, &RiverPoint),
        decl: &RiverDecl,
        seed: u32,
        water: &mut HashMap<(usize, usize), i32>,
    ) {
        let (Some(a), Some(b)) = (from.anchor.resolve(flat), to.anchor.resolve(flat)) else {
            return;
        };
        let length = a.distance(b);
        let across = (b - a).normalize_or_zero().perp();

        for (p, t) in steps(a, b) {
            let envelope = (std::f32::consts::PI * t).sin();
            let offset = envelope * decl.meander * length * line_noise(t * length, seed);
            let center: Vec2 = p + across * offset;
            let half = (from.width + (to.width - from.width) * t) * 0.5;
            let depth = from.depth as f32 + (to.depth - from.depth) as f32 * t;
            let declared = lerp_opt(from.level, to.level, t);

            let (cx, cz) = (
                center.x.round().clamp(0.0, (flat.size_x() - 1) as f32) as usize,
                center.y.round().clamp(0.0, (flat.size_z() - 1) as f32) as usize,
            );
            let center_surface = surface.at(cx, cz, declared);

            for (x, z, d) in disc(flat, center, half + BANK) {
                let current = flat.level(x, z) as i32;
                if d <= half {
                    let level = surface.at(x, z, declared);
                    let carve = (depth * (1.0 - (d / half).powi(2))).round().max(1.0) as i32;
                    flat.set_level(x, z, current.min(level - carve));
                    flat.set_material(x, z, MaterialId::SAND);
                    if let Some(group) = &decl.group_id {
                        flat.set_group(x, z, group);
                    }
                    water
                        .entry((x, z))
                        .and_modify(|w| *w = (*w).min(level))
                        .or_insert(level);
                } else if !water.contains_key(&(x, z)) {
                    flat.set_level(x, z, current.min(center_surface + 1));
                    flat.set_material(x, z, MaterialId::DIRT);
                }
            }
        }
    }
}

impl ManipulatorBuilder for RiverBuilder {
    fn name(&self) -> &'static str {
        "river"
    }

    fn initialize(&mut self, parameters: &Parameters) -> Result<()> {
        self.rivers = parameters
            .non_blank("river")
            .map(|raw| parse_declarations(raw, "river"))
            .unwrap_or_default();
        Ok(())
    }

    fn build(&mut self, ctx: &mut BuilderContext<'_>) -> Result<()> {
        // Previous water surfaces survive a rebuild; the blocks themselves are redrawn
        let mut previous: HashMap<(usize, usize), i32> = HashMap::new();
        for (pos, block) in ctx.flat.extra_blocks() {
            if block == WATER_BLOCK {
                previous
                    .entry((pos.x, pos.z))
                    .and_modify(|y| *y = (*y).min(pos.y))
                    .or_insert(pos.y);
            }
        }
        let cleared = ctx.flat.remove_extra_blocks(|block| block == WATER_BLOCK);

        let original = ctx.flat.levels().to_vec();
        let surface = Surface {
            previous: &previous,
            original: &original,
            size_x: ctx.flat.size_x(),
        };

        let mut water = HashMap::new();
        let mut pairing = 0u32;
        for decl in &self.rivers {
            for from in &decl.from {
                for to in &decl.to {
                    let seed = ctx.seed(RIVER_SALT.wrapping_add(pairing));
                    Self::carve(ctx.flat, &surface, (from, to), decl, seed, &mut water);
                    pairing += 1;
                }
            }
        }

        for (&(x, z), &level) in &water {
            ctx.flat.set_extra_block(x, level, z, WATER_BLOCK);
        }
        log::debug!(
            "River {}: {} pairings, {} water columns ({} cleared)",
            ctx.position(),
            pairing,
            water.len(),
            cleared
        );
        Ok(())
    }
}
