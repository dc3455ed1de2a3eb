//! Pointy-top hexagon geometry inscribed in a rectangular Flat
//!
//! Local coordinates: x grows east, z grows south. The hexagon is centered on
//! the buffer midpoint and its circumradius is half the buffer width.

use glam::Vec2;

use crate::grid::{Corner, Direction};

/// Hexagon placed inside a Flat's local coordinate space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HexGeometry {
    pub center: Vec2,
    pub radius: f32,
}

impl HexGeometry {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Geometry for a `size_x` x `size_z` buffer
    pub fn for_flat(size_x: usize, size_z: usize) -> Self {
        Self {
            center: Vec2::new(size_x as f32 * 0.5, size_z as f32 * 0.5),
            radius: size_x as f32 * 0.5,
        }
    }

    /// Vertex position of a corner
    pub fn corner(&self, corner: Corner) -> Vec2 {
        let angle = corner.angle_degrees().to_radians();
        self.center + Vec2::new(angle.cos(), angle.sin()) * self.radius
    }

    /// The two vertices bounding a side, in clockwise order
    pub fn side_corners(&self, side: Direction) -> (Vec2, Vec2) {
        let (a, b) = side.corners();
        (self.corner(a), self.corner(b))
    }

    pub fn side_midpoint(&self, side: Direction) -> Vec2 {
        let (a, b) = self.side_corners(side);
        (a + b) * 0.5
    }

    /// Unit vector pointing from the side toward the center
    pub fn inward_normal(&self, side: Direction) -> Vec2 {
        (self.center - self.side_midpoint(side)).normalize_or_zero()
    }

    /// Mean distance of the side's two corners to the center
    pub fn side_radius(&self, side: Direction) -> f32 {
        let (a, b) = self.side_corners(side);
        (a.distance(self.center) + b.distance(self.center)) * 0.5
    }

    /// Distance from `p` to the side's supporting line, positive inside the hexagon
    pub fn signed_distance_to_side(&self, side: Direction, p: Vec2) -> f32 {
        let (a, _) = self.side_corners(side);
        (p - a).dot(self.inward_normal(side))
    }

    /// Parameter of `p` projected on the side segment (0 at first corner, 1 at second)
    pub fn side_projection(&self, side: Direction, p: Vec2) -> f32 {
        let (a, b) = self.side_corners(side);
        let ab = b - a;
        let len_sq = ab.length_squared();
        if len_sq <= f32::EPSILON {
            return 0.0;
        }
        (p - a).dot(ab) / len_sq
    }

    /// Whether `p` lies inside (or on) the hexagon
    pub fn contains(&self, p: Vec2) -> bool {
        Direction::ALL
            .iter()
            .all(|&side| self.signed_distance_to_side(side, p) >= -0.5)
    }
}

/// Closest point to `p` on segment `a..b`
pub fn nearest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Euclidean distance from `p` to segment `a..b`
pub fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    p.distance(nearest_point_on_segment(p, a, b))
}

/// Hermite smoothstep on [0, 1]: 3t² − 2t³
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
