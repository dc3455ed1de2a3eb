//! Scenario builders: strategies that produce a cell's base terrain
//!
//! Lifecycle: create (registry factory) → `initialize(parameters)` →
//! `build_flat(ctx)` → discard.

pub mod ocean;
pub mod island;
pub mod coast;
pub mod mountain;
pub mod basic;

pub use ocean::OceanBuilder;
pub use island::IslandBuilder;
pub use coast::CoastBuilder;
pub use mountain::{MountainBuilder, Ridge};
pub use basic::BasicScenario;

use crate::core::Result;
use crate::generation::config::WorldConstants;
use crate::generation::context::BuilderContext;
use crate::generation::params::Parameters;
use crate::generation::registry::BuilderRegistry;
use crate::grid::Direction;

/// Strategy filling a cell's Flat with a terrain scenario
pub trait ScenarioBuilder: Send {
    /// Registry identifier
    fn name(&self) -> &'static str;

    /// Parse tunables from the cell's filtered parameters
    fn initialize(&mut self, parameters: &Parameters) -> Result<()>;

    /// Populate `ctx.flat`
    fn build_flat(&mut self, ctx: &mut BuilderContext<'_>) -> Result<()>;

    /// Elevation relative to sea level
    fn land_level(&self) -> i32;

    /// Vertical variation magnitude
    fn land_offset(&self) -> i32;

    /// Absolute target elevation this scenario declares for a side
    fn land_side_level(&self, _side: Direction, world: &WorldConstants) -> i32 {
        world.sea_level + self.land_level()
    }

    /// Whether the scenario is open water (ocean, island)
    fn is_water(&self) -> bool {
        false
    }
}

/// `landLevel` / `landOffset` with scenario-specific defaults
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LandSettings {
    pub land_level: i32,
    pub land_offset: i32,
}

impl LandSettings {
    pub const fn new(land_level: i32, land_offset: i32) -> Self {
        Self { land_level, land_offset }
    }

    /// Override the defaults with `landLevel` / `landOffset` when present
    pub fn from_parameters(parameters: &Parameters, defaults: LandSettings) -> Self {
        Self {
            land_level: parameters.i32_or("landLevel", defaults.land_level),
            land_offset: parameters.i32_or("landOffset", defaults.land_offset).max(0),
        }
    }
}

/// Register every built-in scenario
pub fn register_defaults(registry: &mut BuilderRegistry) {
    registry.register_scenario("ocean", || Box::new(OceanBuilder::default()));
    registry.register_scenario("island", || Box::new(IslandBuilder::default()));
    registry.register_scenario("coast", || Box::new(CoastBuilder::default()));
    registry.register_scenario("mountain", || Box::new(MountainBuilder::default()));
    registry.register_scenario("plains", || Box::new(BasicScenario::plains()));
    registry.register_scenario("hills", || Box::new(BasicScenario::hills()));
    registry.register_scenario("forest", || Box::new(BasicScenario::forest()));
    registry.register_scenario("desert", || Box::new(BasicScenario::desert()));
    registry.register_scenario("heath", || Box::new(BasicScenario::heath()));
    registry.register_scenario("swamp", || Box::new(BasicScenario::swamp()));
    registry.register_scenario("city", || Box::new(BasicScenario::city()));
    registry.register_scenario("village", || Box::new(BasicScenario::village()));
}
