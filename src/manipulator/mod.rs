//! Manipulator builders: overlays and seam blending applied after base terrain
//!
//! Each manipulator is registered with the parameter keys that trigger it and
//! runs in registration order during the second generation phase.

pub mod path;
pub mod edge_blender;
pub mod side_blender;
pub mod road;
pub mod river;
pub mod wall;
pub mod side_wall;
pub mod plot;
pub mod village;

pub use edge_blender::EdgeBlender;
pub use side_blender::{BlendSettings, SideBlender};
pub use road::{RoadBuilder, RoadDecl, RoadKind};
pub use river::{RiverBuilder, RiverDecl};
pub use wall::{WallBuilder, WallDecl};
pub use side_wall::SideWallBuilder;
pub use plot::{PlotBuilder, PlotDecl};
pub use village::{VillageBuilder, VillageDecl};

use crate::core::Result;
use crate::generation::context::BuilderContext;
use crate::generation::params::Parameters;
use crate::generation::registry::BuilderRegistry;

/// Strategy that modifies an already generated Flat
pub trait ManipulatorBuilder: Send {
    /// Registry identifier
    fn name(&self) -> &'static str;

    /// Parse declarations from the cell's filtered parameters
    fn initialize(&mut self, parameters: &Parameters) -> Result<()>;

    /// Apply to `ctx.flat`
    fn build(&mut self, ctx: &mut BuilderContext<'_>) -> Result<()>;
}

const EDGE_BLEND_TRIGGERS: &[&str] = &["edgeBlend"];
const SIDE_BLEND_TRIGGERS: &[&str] = &["flatNW", "flatNE", "flatE", "flatSE", "flatSW", "flatW", "sideBlend"];

/// Register every built-in manipulator, in execution order
pub fn register_defaults(registry: &mut BuilderRegistry) {
    registry.register_manipulator("edgeblend", EDGE_BLEND_TRIGGERS, || Box::new(EdgeBlender::default()));
    registry.register_manipulator("sideblend", SIDE_BLEND_TRIGGERS, || Box::new(SideBlender::default()));
    registry.register_manipulator("road", &["road"], || Box::new(RoadBuilder::default()));
    registry.register_manipulator("river", &["river"], || Box::new(RiverBuilder::default()));
    registry.register_manipulator("wall", &["wall"], || Box::new(WallBuilder::default()));
    registry.register_manipulator("sidewall", &["sideWall"], || Box::new(SideWallBuilder::default()));
    registry.register_manipulator("plot", &["plot"], || Box::new(PlotBuilder::default()));
    registry.register_manipulator("village", &["village"], || Box::new(VillageBuilder::default()));
}
