//! Mathematical utilities: hexagon geometry, bounds, deterministic noise

pub mod rect;
pub mod hex;
pub mod noise;

pub use rect::Rect;
pub use hex::{HexGeometry, distance_to_segment, nearest_point_on_segment, smoothstep};
pub use noise::{SimpleRng, fractal_noise, hash_2d, hash_str, line_noise, value_noise};
