//! Hexagonal world grid: axial positions, side/corner addressing, and the
//! per-cell configuration index.

pub mod direction;
pub mod position;
pub mod config;
pub mod index;

pub use direction::{Corner, Direction};
pub use position::HexPosition;
pub use config::HexGridConfig;
pub use index::{HexGridIndex, NeighborConfigs};
