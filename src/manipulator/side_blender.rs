//! Side seam blending by line sampling of the real neighbor Flat
//!
//! For each side with a neighbor Flat, an outer line (beyond the side) and an
//! inner line (inside the hexagon) are walked in parallel. Every outer point
//! samples the neighbor in world space and the height is faded inward toward
//! the paired inner point. Optional noise, shake and blur post-processing make
//! the seam look organic; all of it is seeded per cell and side.

use glam::Vec2;

use crate::core::Result;
use crate::flat::Flat;
use crate::generation::context::BuilderContext;
use crate::generation::params::Parameters;
use crate::grid::Direction;
use crate::math::{line_noise, smoothstep, HexGeometry, Rect, SimpleRng};

use super::path::steps;
use super::ManipulatorBuilder;

/// Inner line sits this many widths inside the side
pub const INNER_EXTENSION: f32 = 1.5;
/// Share of the inward travel over which the blend fades out
const INNER_FADE: f32 = 0.4;
const SHAKE_SALT: u32 = 0x5a4b;
/// Swaps per blended pixel at full shake strength
pub const SHAKE_DENSITY: f32 = 0.3;

/// Tuning knobs of the side blender
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlendSettings {
    /// Blend band width in pixels
    pub width: f32,
    /// Organic perturbation, 0.0..=1.0
    pub randomness: f32,
    /// Pixel-swap post-process strength, 0.0..=1.0
    pub shake: f32,
    /// Box blur radius, 0..=5
    pub blur: i32,
}

impl Default for BlendSettings {
    fn default() -> Self {
        Self {
            width: 20.0,
            randomness: 0.0,
            shake: 0.0,
            blur: 0,
        }
    }
}

impl BlendSettings {
    pub fn from_parameters(parameters: &Parameters) -> Self {
        let defaults = Self::default();
        Self {
            width: parameters.f32_clamped("blendWidth", defaults.width, 1.0, 128.0),
            randomness: parameters.f32_clamped("randomness", defaults.randomness, 0.0, 1.0),
            shake: parameters.f32_clamped("shakeStrength", defaults.shake, 0.0, 1.0),
            blur: parameters.f32_clamped("blurRadius", defaults.blur as f32, 0.0, 5.0).round() as i32,
        }
    }
}

/// Blend one side of `flat` toward `neighbor`.
///
/// Returns the bounds of every written pixel, None when nothing was sampled.
pub fn blend_side(
    flat: &mut Flat,
    neighbor: &Flat,
    side: Direction,
    settings: &BlendSettings,
    seed: u32,
) -> Option<Rect> {
    let geometry = HexGeometry::for_flat(flat.size_x(), flat.size_z());
    let (c1, c2) = geometry.side_corners(side);
    let radius = geometry.side_radius(side);
    let width = settings.width;
    let push = |corner: Vec2, by: f32| {
        geometry.center + (corner - geometry.center).normalize_or_zero() * (radius + by)
    };
    let (outer_a, outer_b) = (push(c1, width), push(c2, width));
    let (inner_a, inner_b) = (push(c1, -INNER_EXTENSION * width), push(c2, -INNER_EXTENSION * width));
    let normal = geometry.inward_normal(side);

    let mut rng = SimpleRng::new(seed as u64);
    let mut bounds: Option<Rect> = None;

    for (i, (outer, t)) in steps(outer_a, outer_b).enumerate() {
        let inner = inner_a.lerp(inner_b, t);
        let mut start = outer;
        if settings.randomness > 0.0 {
            start += normal * line_noise(i as f32, seed) * settings.randomness * width * 0.8;
        }

        let world = flat.local_to_world(start.x.round() as i32, start.y.round() as i32);
        let local = neighbor.world_to_local(world);
        let Some(target) = neighbor.sample(local.x, local.y) else {
            continue;
        };
        let target = target as f32;

        let exponent = if settings.randomness > 0.0 {
            1.0 + rng.range(-0.5, 0.5) * settings.randomness
        } else {
            1.0
        };

        for (p, s) in steps(start, inner) {
            let (x, z) = (p.x.round() as i32, p.y.round() as i32);
            if !flat.is_inside(x, z) {
                continue;
            }
            let mut factor = 1.0 - smoothstep(s).powf(exponent);
            if s > 1.0 - INNER_FADE {
                factor *= (1.0 - s) / INNER_FADE;
            }
            let current = flat.level(x as usize, z as usize) as f32;
            let mut height = target * factor + current * (1.0 - factor);
            if settings.randomness > 0.7 {
                height += rng.range_i32(-1, 1) as f32;
            }
            flat.set_level(x as usize, z as usize, height.round() as i32);

            match bounds.as_mut() {
                Some(b) => b.expand(x, z),
                None => bounds = Some(Rect::from_point(x, z)),
            }
        }
    }
    bounds
}

/// Swap random pixels with an adjacent pixel inside `bounds`
pub fn shake(flat: &mut Flat, bounds: Rect, strength: f32, seed: u32) {
    let Some(b) = bounds.clipped(flat.size_x(), flat.size_z()) else {
        return;
    };
    let count = (b.area() as f32 * strength * SHAKE_DENSITY) as usize;
    let mut rng = SimpleRng::new(seed as u64);
    for _ in 0..count {
        let x = rng.range_i32(b.min_x, b.max_x);
        let z = rng.range_i32(b.min_z, b.max_z);
        let nx = (x + rng.range_i32(-1, 1)).clamp(b.min_x, b.max_x);
        let nz = (z + rng.range_i32(-1, 1)).clamp(b.min_z, b.max_z);
        let (x, z, nx, nz) = (x as usize, z as usize, nx as usize, nz as usize);
        let a = flat.level(x, z);
        let c = flat.level(nx, nz);
        flat.set_level(x, z, c as i32);
        flat.set_level(nx, nz, a as i32);
    }
}

/// Square box blur of `radius` over `bounds` grown by the radius
pub fn box_blur(flat: &mut Flat, bounds: Rect, radius: i32) {
    if radius <= 0 {
        return;
    }
    let Some(b) = bounds.grown(radius).clipped(flat.size_x(), flat.size_z()) else {
        return;
    };
    let source = flat.levels().to_vec();
    let size_x = flat.size_x();
    for z in b.min_z..=b.max_z {
        for x in b.min_x..=b.max_x {
            let mut sum = 0u32;
            let mut n = 0u32;
            for dz in -radius..=radius {
                for dx in -radius..=radius {
                    let (sx, sz) = (x + dx, z + dz);
                    if flat.is_inside(sx, sz) {
                        sum += source[sz as usize * size_x + sx as usize] as u32;
                        n += 1;
                    }
                }
            }
            flat.set_level(x as usize, z as usize, (sum as f32 / n as f32).round() as i32);
        }
    }
}

/// Blends sides toward explicitly named (`flatE`, ...) or adjacent Flats
#[derive(Clone, Debug, Default)]
pub struct SideBlender {
    settings: BlendSettings,
    side_flats: [Option<String>; 6],
    /// Blend every side toward its adjacent cell when no id is named
    adjacent: bool,
}

impl SideBlender {
    pub fn settings(&self) -> &BlendSettings {
        &self.settings
    }

    fn neighbor<'a>(&self, ctx: &BuilderContext<'a>, side: Direction) -> Option<&'a Flat> {
        match &self.side_flats[side.index()] {
            Some(id) => {
                let flat = ctx.flat_by_id(id);
                if flat.is_none() {
                    log::warn!("Side flat '{}' for {} of {} not found", id, side, ctx.position());
                }
                flat
            }
            None if self.adjacent => ctx.neighbor_flat(side),
            None => None,
        }
    }
}

impl ManipulatorBuilder for SideBlender {
    fn name(&self) -> &'static str {
        "sideblend"
    }

    fn initialize(&mut self, parameters: &Parameters) -> Result<()> {
        self.settings = BlendSettings::from_parameters(parameters);
        for side in Direction::ALL {
            let key = format!("flat{}", side.short_name());
            self.side_flats[side.index()] = parameters.non_blank(&key).map(|id| id.trim().to_string());
        }
        self.adjacent = parameters.bool_or("sideBlend", false);
        Ok(())
    }

    fn build(&mut self, ctx: &mut BuilderContext<'_>) -> Result<()> {
        let mut bounds: Option<Rect> = None;
        for side in Direction::ALL {
            let Some(neighbor) = self.neighbor(ctx, side) else {
                continue;
            };
            let seed = ctx.seed(side.index() as u32);
            if let Some(b) = blend_side(ctx.flat, neighbor, side, &self.settings, seed) {
                bounds = Some(bounds.map_or(b, |all| all.merged(&b)));
            }
        }

        let Some(bounds) = bounds else {
            log::debug!("Side blend {}: nothing to blend", ctx.position());
            return Ok(());
        };
        if self.settings.shake > 0.0 {
            shake(ctx.flat, bounds, self.settings.shake, ctx.seed(SHAKE_SALT));
        }
        if self.settings.blur > 0 {
            box_blur(ctx.flat, bounds, self.settings.blur);
        }
        log::debug!("Side blend {}: region {:?}", ctx.position(), bounds);
        Ok(())
    }
}
