//! Builder context: everything a builder may see while generating one cell
//!
//! The context owns the only mutable borrow of the cell's Flat. Neighbor Flats
//! are reached through a `FlatLookup` and are always read-only.

use std::cell::OnceCell;
use std::collections::HashMap;

use glam::IVec2;

use super::config::WorldConstants;
use super::params::Parameters;
use super::registry::BuilderRegistry;
use crate::flat::Flat;
use crate::grid::{Direction, HexGridConfig, HexPosition, NeighborConfigs};
use crate::math::HexGeometry;
use crate::scenario::ScenarioBuilder;

/// Base noise-fill primitive: fills a Flat's elevation with `base ± variation`
pub trait BaseFill: Send + Sync {
    fn fill(&self, flat: &mut Flat, base_height: i32, variation: i32, seed: u32);
}

/// World-position height sampler, used where no neighbor cell exists
pub trait HeightSampler: Send + Sync {
    fn height_at(&self, world: IVec2) -> i32;
}

/// Read-only access to other cells' Flats
pub trait FlatLookup: Send + Sync {
    fn flat_at(&self, position: HexPosition) -> Option<&Flat>;
    fn flat_by_id(&self, id: &str) -> Option<&Flat>;
}

/// Lookup that knows no Flats (Phase 1 never reads neighbors)
pub struct NoFlats;

impl FlatLookup for NoFlats {
    fn flat_at(&self, _position: HexPosition) -> Option<&Flat> {
        None
    }

    fn flat_by_id(&self, _id: &str) -> Option<&Flat> {
        None
    }
}

/// Flats of a whole world keyed by cell position; ids are `HexPosition::id()`
#[derive(Clone, Debug, Default)]
pub struct FlatStore {
    flats: HashMap<HexPosition, Flat>,
    ids: HashMap<String, HexPosition>,
}

impl FlatStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, position: HexPosition, flat: Flat) -> Option<Flat> {
        self.ids.insert(position.id(), position);
        self.flats.insert(position, flat)
    }

    /// Register an additional identifier for a stored Flat
    pub fn alias(&mut self, id: impl Into<String>, position: HexPosition) {
        self.ids.insert(id.into(), position);
    }

    pub fn get(&self, position: HexPosition) -> Option<&Flat> {
        self.flats.get(&position)
    }

    pub fn len(&self) -> usize {
        self.flats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flats.is_empty()
    }

    /// Positions sorted for deterministic iteration
    pub fn positions(&self) -> Vec<HexPosition> {
        let mut positions: Vec<_> = self.flats.keys().copied().collect();
        positions.sort();
        positions
    }

    pub fn into_flats(self) -> HashMap<HexPosition, Flat> {
        self.flats
    }
}

impl FromIterator<(HexPosition, Flat)> for FlatStore {
    fn from_iter<I: IntoIterator<Item = (HexPosition, Flat)>>(iter: I) -> Self {
        let mut store = FlatStore::new();
        for (position, flat) in iter {
            store.insert(position, flat);
        }
        store
    }
}

impl FlatLookup for FlatStore {
    fn flat_at(&self, position: HexPosition) -> Option<&Flat> {
        self.flats.get(&position)
    }

    fn flat_by_id(&self, id: &str) -> Option<&Flat> {
        self.ids.get(id).and_then(|p| self.flats.get(p))
    }
}

/// Handles to the external collaborators of a generation pass
#[derive(Clone, Copy)]
pub struct Services<'a> {
    pub base_fill: &'a dyn BaseFill,
    pub height_sampler: &'a dyn HeightSampler,
    pub flats: &'a dyn FlatLookup,
    pub world: WorldConstants,
    /// World seed mixed into every per-cell seed
    pub seed: u32,
}

/// Per-cell aggregate passed to every builder
pub struct BuilderContext<'a> {
    /// The cell's own Flat, the only one a builder may write
    pub flat: &'a mut Flat,
    config: &'a HexGridConfig,
    parameters: Parameters,
    neighbors: NeighborConfigs<'a>,
    registry: &'a BuilderRegistry,
    services: Services<'a>,
    neighbor_builders: [OnceCell<Option<Box<dyn ScenarioBuilder>>>; 6],
}

impl<'a> BuilderContext<'a> {
    pub fn new(
        flat: &'a mut Flat,
        config: &'a HexGridConfig,
        neighbors: NeighborConfigs<'a>,
        registry: &'a BuilderRegistry,
        services: Services<'a>,
    ) -> Self {
        let parameters = registry.parameters_for(config);
        Self {
            flat,
            config,
            parameters,
            neighbors,
            registry,
            services,
            neighbor_builders: std::array::from_fn(|_| OnceCell::new()),
        }
    }

    pub fn config(&self) -> &'a HexGridConfig {
        self.config
    }

    pub fn position(&self) -> HexPosition {
        self.config.position
    }

    /// The cell's namespace-filtered parameters
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn world(&self) -> WorldConstants {
        self.services.world
    }

    pub fn sea_level(&self) -> i32 {
        self.services.world.sea_level
    }

    pub fn ground_level(&self) -> i32 {
        self.services.world.ground_level
    }

    /// World seed, for fills that must line up across cell borders
    pub fn world_seed(&self) -> u32 {
        self.services.seed
    }

    /// Deterministic seed for this cell and `salt`
    pub fn seed(&self, salt: u32) -> u32 {
        self.position().seed(self.services.seed, salt)
    }

    pub fn base_fill(&self) -> &'a dyn BaseFill {
        self.services.base_fill
    }

    pub fn height_sampler(&self) -> &'a dyn HeightSampler {
        self.services.height_sampler
    }

    /// Hexagon geometry of the own Flat
    pub fn geometry(&self) -> HexGeometry {
        HexGeometry::for_flat(self.flat.size_x(), self.flat.size_z())
    }

    pub fn neighbor_config(&self, dir: Direction) -> Option<&'a HexGridConfig> {
        self.neighbors[dir.index()]
    }

    pub fn has_neighbor(&self, dir: Direction) -> bool {
        self.neighbor_config(dir).is_some()
    }

    /// Initialized (not built) scenario builder of the neighbor across `dir`.
    /// Constructed on first use; None when the neighbor is absent or unresolvable.
    pub fn neighbor_builder(&self, dir: Direction) -> Option<&dyn ScenarioBuilder> {
        self.neighbor_builders[dir.index()]
            .get_or_init(|| {
                let config = self.neighbor_config(dir)?;
                let parameters = self.registry.parameters_for(config);
                self.registry.create_scenario_builder(&config.kind, &parameters)
            })
            .as_deref()
    }

    /// Level the neighbor across `dir` declares for the side it shares with us
    pub fn neighbor_land_level(&self, dir: Direction) -> Option<i32> {
        let world = self.world();
        self.neighbor_builder(dir)
            .map(|builder| builder.land_side_level(dir.opposite(), &world))
    }

    /// Read-only Flat of the neighbor across `dir`
    pub fn neighbor_flat(&self, dir: Direction) -> Option<&'a Flat> {
        self.services.flats.flat_at(self.position().neighbor(dir))
    }

    /// Read-only Flat by identifier
    pub fn flat_by_id(&self, id: &str) -> Option<&'a Flat> {
        self.services.flats.flat_by_id(id)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Shared fixtures for builder tests

    use super::*;
    use crate::grid::HexGridIndex;
    use crate::terrain::{TerrainGenerator, TerrainParams};

    /// Owns the collaborators a `BuilderContext` borrows
    pub struct Harness {
        pub registry: BuilderRegistry,
        pub terrain: TerrainGenerator,
        pub index: HexGridIndex,
        pub flats: FlatStore,
        pub world: WorldConstants,
    }

    impl Harness {
        pub fn new(configs: Vec<HexGridConfig>) -> Self {
            crate::core::logging::init();
            Self {
                registry: BuilderRegistry::default(),
                terrain: TerrainGenerator::new(TerrainParams::default()),
                index: HexGridIndex::from_configs(configs),
                flats: FlatStore::new(),
                world: WorldConstants::default(),
            }
        }

        pub fn services(&self) -> Services<'_> {
            Services {
                base_fill: &self.terrain,
                height_sampler: &self.terrain,
                flats: &self.flats,
                world: self.world,
                seed: 12345,
            }
        }

        /// Context for the cell at `position` writing into `flat`
        pub fn context<'a>(&'a self, position: HexPosition, flat: &'a mut Flat) -> BuilderContext<'a> {
            let config = self.index.get(position).expect("cell configured in harness");
            BuilderContext::new(
                flat,
                config,
                self.index.neighbors(position),
                &self.registry,
                self.services(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::Harness;
    use super::*;

    #[test]
    fn test_neighbor_slots_and_builders() {
        let center = HexPosition::new(0, 0);
        let harness = Harness::new(vec![
            HexGridConfig::new(center, "coast"),
            HexGridConfig::new(center.neighbor(Direction::East), "ocean")
                .with_parameter("g_landLevel", "-12"),
            HexGridConfig::new(center.neighbor(Direction::West), "no-such-scenario"),
        ]);
        let mut flat = Flat::new(16, 16);
        let ctx = harness.context(center, &mut flat);

        assert!(ctx.has_neighbor(Direction::East));
        assert!(!ctx.has_neighbor(Direction::NorthEast));
        assert!(ctx.has_neighbor(Direction::West));

        let east = ctx.neighbor_builder(Direction::East).expect("ocean builder");
        assert_eq!(east.name(), "ocean");
        assert_eq!(ctx.neighbor_land_level(Direction::East), Some(50 - 12));
        // Unknown type resolves to nothing rather than failing
        assert!(ctx.neighbor_builder(Direction::West).is_none());
        assert!(ctx.neighbor_builder(Direction::SouthEast).is_none());
    }

    #[test]
    fn test_parameters_are_filtered() {
        let pos = HexPosition::new(2, 2);
        let harness = Harness::new(vec![
            HexGridConfig::new(pos, "plains")
                .with_parameter("g_landLevel", "4")
                .with_parameter("label", "home"),
        ]);
        let mut flat = Flat::new(8, 8);
        let ctx = harness.context(pos, &mut flat);
        assert_eq!(ctx.parameters().get("landLevel"), Some("4"));
        assert!(!ctx.parameters().contains("label"));
        assert_eq!(ctx.sea_level(), 50);
        assert_ne!(ctx.seed(0), ctx.seed(1));
    }

    #[test]
    fn test_flat_store_lookup() {
        let mut store = FlatStore::new();
        let pos = HexPosition::new(1, -1);
        store.insert(pos, Flat::new(4, 4));
        store.alias("harbor", pos);

        assert!(store.flat_at(pos).is_some());
        assert!(store.flat_by_id("1:-1").is_some());
        assert!(store.flat_by_id("harbor").is_some());
        assert!(store.flat_by_id("0:0").is_none());
        assert!(NoFlats.flat_at(pos).is_none());
    }
}
