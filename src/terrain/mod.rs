//! Procedural base terrain

pub mod generator;
pub use generator::{TerrainGenerator, TerrainParams};

pub mod surface;
pub use surface::SurfaceProfile;
