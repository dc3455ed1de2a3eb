//! Hexgen - procedural terrain generation and seam blending for hexagonal voxel worlds

pub mod core;
pub mod math;
pub mod flat;
pub mod grid;
pub mod terrain;
pub mod generation;
pub mod scenario;
pub mod manipulator;
