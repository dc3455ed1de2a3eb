//! Shared path geometry for overlay builders: endpoints, stepping, stamping

use glam::Vec2;
use serde::Deserialize;

use crate::core::{Error, Result};
use crate::flat::{Flat, MaterialId};
use crate::grid::Direction;
use crate::math::HexGeometry;

/// Path endpoint: a side of the hexagon or an absolute local coordinate
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct Anchor {
    #[serde(default)]
    pub side: Option<Direction>,
    #[serde(default)]
    pub lx: Option<f32>,
    #[serde(default)]
    pub lz: Option<f32>,
}

impl Anchor {
    pub fn side(side: Direction) -> Self {
        Self { side: Some(side), ..Self::default() }
    }

    pub fn local(lx: f32, lz: f32) -> Self {
        Self { side: None, lx: Some(lx), lz: Some(lz) }
    }

    pub fn validate(&self, what: &str) -> Result<()> {
        match (self.side, self.lx, self.lz) {
            (Some(_), _, _) | (None, Some(_), Some(_)) => Ok(()),
            _ => Err(Error::invalid(what, "needs a side or both lx and lz")),
        }
    }

    /// Local position; a side resolves to its midpoint pulled inside the buffer
    pub fn resolve(&self, flat: &Flat) -> Option<Vec2> {
        if let Some(side) = self.side {
            let geometry = HexGeometry::for_flat(flat.size_x(), flat.size_z());
            return Some(clamp_to_flat(flat, geometry.side_midpoint(side)));
        }
        Some(Vec2::new(self.lx?, self.lz?))
    }
}

/// Clamp a point into the buffer's pixel range
pub fn clamp_to_flat(flat: &Flat, p: Vec2) -> Vec2 {
    let max = Vec2::new(flat.size_x() as f32 - 1.0, flat.size_z() as f32 - 1.0);
    p.clamp(Vec2::ZERO, max.max(Vec2::ZERO))
}

/// Center of the buffer
pub fn flat_center(flat: &Flat) -> Vec2 {
    Vec2::new((flat.size_x() / 2) as f32, (flat.size_z() / 2) as f32)
}

/// Unit-length steps from `from` to `to`, both included, with their parameter t
pub fn steps(from: Vec2, to: Vec2) -> impl Iterator<Item = (Vec2, f32)> {
    let count = from.distance(to).ceil().max(1.0) as usize;
    (0..=count).map(move |i| {
        let t = i as f32 / count as f32;
        (from.lerp(to, t), t)
    })
}

/// Pixels within `radius` of `center` and their distance, clipped to the buffer
pub fn disc(flat: &Flat, center: Vec2, radius: f32) -> Vec<(usize, usize, f32)> {
    let mut pixels = Vec::new();
    if radius.is_nan() || radius < 0.0 || flat.size_x() == 0 || flat.size_z() == 0 {
        return pixels;
    }
    // Scan window clipped to the buffer before any integer conversion
    let span = |c: f32, size: usize| {
        let max = (size - 1) as f32;
        let lo = (c - radius).floor().clamp(0.0, max) as usize;
        let hi = (c + radius).ceil().clamp(0.0, max) as usize;
        lo..=hi
    };
    for z in span(center.y, flat.size_z()) {
        for x in span(center.x, flat.size_x()) {
            let d = Vec2::new(x as f32, z as f32).distance(center);
            if d <= radius {
                pixels.push((x, z, d));
            }
        }
    }
    pixels
}

/// Linear interpolation of optional per-endpoint values
pub fn lerp_opt(a: Option<i32>, b: Option<i32>, t: f32) -> Option<i32> {
    match (a, b) {
        (Some(a), Some(b)) => Some((a as f32 + (b - a) as f32 * t).round() as i32),
        (Some(v), None) | (None, Some(v)) => Some(v),
        (None, None) => None,
    }
}

/// Resolve a material name against the Flat's palette, with fallback
pub fn material_or(flat: &Flat, name: Option<&str>, fallback: MaterialId) -> MaterialId {
    match name {
        Some(name) => flat.palette().by_name(name).unwrap_or_else(|| {
            log::warn!("Unknown material '{}', using {}", name, flat.palette().name_of(fallback));
            fallback
        }),
        None => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_resolution() {
        let flat = Flat::new(100, 100);
        let east = Anchor::side(Direction::East).resolve(&flat).unwrap();
        assert!((east.x - (50.0 + 50.0 * 30f32.to_radians().cos())).abs() < 1e-3);
        assert!((east.y - 50.0).abs() < 1e-3);
        assert_eq!(Anchor::local(3.0, 4.0).resolve(&flat), Some(Vec2::new(3.0, 4.0)));
        assert!(Anchor::default().resolve(&flat).is_none());
        assert!(Anchor::default().validate("from").is_err());
    }

    #[test]
    fn test_anchor_json() {
        let a: Anchor = serde_json::from_str(r#"{"side": "NE"}"#).unwrap();
        assert_eq!(a, Anchor::side(Direction::NorthEast));
        let b: Anchor = serde_json::from_str(r#"{"lx": 5, "lz": 6.5}"#).unwrap();
        assert_eq!(b, Anchor::local(5.0, 6.5));
    }

    #[test]
    fn test_steps_cover_both_ends() {
        let pts: Vec<_> = steps(Vec2::ZERO, Vec2::new(4.0, 0.0)).collect();
        assert_eq!(pts.len(), 5);
        assert_eq!(pts[0], (Vec2::ZERO, 0.0));
        assert_eq!(pts[4], (Vec2::new(4.0, 0.0), 1.0));
        assert_eq!(steps(Vec2::ONE, Vec2::ONE).count(), 2);
    }

    #[test]
    fn test_disc_clips() {
        let flat = Flat::new(10, 10);
        let pixels = disc(&flat, Vec2::ZERO, 1.0);
        assert_eq!(pixels.len(), 3);
        assert_eq!(disc(&flat, Vec2::new(5.0, 5.0), 1.5).len(), 9);
    }

    #[test]
    fn test_disc_extreme_inputs_stay_in_buffer() {
        let flat = Flat::new(10, 10);
        assert_eq!(disc(&flat, Vec2::new(5.0, 5.0), 1e10).len(), 100);
        assert_eq!(disc(&flat, Vec2::new(5.0, 5.0), f32::INFINITY).len(), 100);
        assert!(disc(&flat, Vec2::new(1e12, -1e12), 3.0).is_empty());
        assert!(disc(&flat, Vec2::new(5.0, 5.0), f32::NAN).is_empty());
        assert!(disc(&flat, Vec2::new(5.0, 5.0), -2.0).is_empty());
    }

    #[test]
    fn test_lerp_opt() {
        assert_eq!(lerp_opt(Some(10), Some(20), 0.5), Some(15));
        assert_eq!(lerp_opt(None, Some(7), 0.2), Some(7));
        assert_eq!(lerp_opt(None, None, 0.5), None);
    }
}
