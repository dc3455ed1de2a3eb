//! World generation pipeline: scenario builders, then manipulators.
//!
//! The pipeline orchestrates:
//! 1. Phase 1: every cell's scenario builder fills its own Flat (parallel)
//! 2. Barrier: the Flats are frozen into a read-only `FlatStore`
//! 3. Phase 2: triggered manipulators blend and overlay each cell, reading
//!    neighbors from the store and writing only the cell's own copy (parallel)

pub mod config;
pub mod params;
pub mod context;
pub mod registry;

pub use config::{GenerationConfig, WorldConstants, WorldDefinition, GENERATION_NAMESPACE};
pub use params::{parse_declarations, Declaration, Parameters};
pub use context::{BaseFill, BuilderContext, FlatLookup, FlatStore, HeightSampler, NoFlats, Services};
pub use registry::{BuilderRegistry, ManipulatorFactory, ScenarioFactory};

use rayon::prelude::*;

use crate::core::{Error, Result};
use crate::flat::Flat;
use crate::grid::{HexGridIndex, HexPosition};
use crate::terrain::generator::TerrainGenerator;

/// Orchestrates both generation phases for a whole grid.
pub struct GenerationPipeline {
    config: GenerationConfig,
    terrain: TerrainGenerator,
    registry: BuilderRegistry,
}

impl GenerationPipeline {
    /// Create a new pipeline with the default builders.
    pub fn new(config: &GenerationConfig) -> Self {
        Self {
            config: config.clone(),
            terrain: TerrainGenerator::new(config.seeded_terrain()),
            registry: BuilderRegistry::with_namespace(&config.namespace),
        }
    }

    /// Replace the builder registry.
    pub fn with_registry(mut self, registry: BuilderRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Get a reference to the terrain generator.
    pub fn terrain(&self) -> &TerrainGenerator {
        &self.terrain
    }

    pub fn registry(&self) -> &BuilderRegistry {
        &self.registry
    }

    fn services<'a>(&'a self, flats: &'a dyn FlatLookup) -> Services<'a> {
        Services {
            base_fill: &self.terrain,
            height_sampler: &self.terrain,
            flats,
            world: self.config.world,
            seed: self.config.seed,
        }
    }

    /// Empty Flat mounted at the cell's world position
    pub fn new_flat(&self, position: HexPosition) -> Flat {
        let size = self.config.flat_size;
        let mount = position.flat_mount(size);
        Flat::new(size, size).with_mount(mount.x, mount.y)
    }

    /// Phase 1 for one cell. An unknown scenario leaves the Flat untouched.
    pub fn build_cell(&self, index: &HexGridIndex, position: HexPosition) -> Result<Flat> {
        let config = index
            .get(position)
            .ok_or_else(|| Error::Generation(format!("no cell configured at {}", position)))?;
        let mut flat = self.new_flat(position);
        {
            let mut ctx = BuilderContext::new(
                &mut flat,
                config,
                index.neighbors(position),
                &self.registry,
                self.services(&NoFlats),
            );
            if let Some(mut builder) = self.registry.create_scenario_builder(&config.kind, ctx.parameters()) {
                if let Err(e) = builder.build_flat(&mut ctx) {
                    log::warn!("Scenario '{}' failed for {}: {}", config.kind, position, e);
                }
            }
        }
        Ok(flat)
    }

    /// Phase 2 for one cell: run every triggered manipulator on a copy of the
    /// cell's Phase 1 Flat. Neighbors are read from `store`.
    pub fn manipulate_cell(
        &self,
        index: &HexGridIndex,
        store: &FlatStore,
        position: HexPosition,
    ) -> Result<Flat> {
        let config = index
            .get(position)
            .ok_or_else(|| Error::Generation(format!("no cell configured at {}", position)))?;
        let mut flat = store
            .get(position)
            .cloned()
            .ok_or_else(|| Error::Generation(format!("no flat built for {}", position)))?;
        {
            let mut ctx = BuilderContext::new(
                &mut flat,
                config,
                index.neighbors(position),
                &self.registry,
                self.services(store),
            );
            let parameters = ctx.parameters().clone();
            for id in self.registry.manipulators_for(&parameters) {
                let Some(mut builder) = self.registry.create_manipulator_builder(id, &parameters) else {
                    continue;
                };
                if let Err(e) = builder.build(&mut ctx) {
                    log::warn!("Manipulator '{}' failed for {}: {}", id, position, e);
                }
            }
        }
        Ok(flat)
    }

    /// Register `flatId` parameters as additional store identifiers
    fn register_aliases(&self, index: &HexGridIndex, store: &mut FlatStore) {
        for position in index.positions() {
            let Some(config) = index.get(position) else {
                continue;
            };
            if let Some(alias) = self.registry.parameters_for(config).non_blank("flatId") {
                store.alias(alias.trim(), position);
            }
        }
    }

    fn into_store(&self, index: &HexGridIndex, results: Vec<(HexPosition, Result<Flat>)>) -> FlatStore {
        let mut store: FlatStore = results
            .into_iter()
            .filter_map(|(position, result)| match result {
                Ok(flat) => Some((position, flat)),
                Err(e) => {
                    log::warn!("Cell {} skipped: {}", position, e);
                    None
                }
            })
            .collect();
        self.register_aliases(index, &mut store);
        store
    }

    /// Run Phase 1 for every cell of the grid.
    pub fn build_all(&self, index: &HexGridIndex) -> FlatStore {
        let positions = index.positions();
        let start = std::time::Instant::now();
        let results: Vec<_> = positions
            .par_iter()
            .map(|&position| (position, self.build_cell(index, position)))
            .collect();
        let store = self.into_store(index, results);
        log::info!(
            "Phase 1: built {} cells in {:.1}ms",
            store.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        store
    }

    /// Run Phase 2 for every cell against the frozen Phase 1 store.
    pub fn manipulate_all(&self, index: &HexGridIndex, store: &FlatStore) -> FlatStore {
        let positions = store.positions();
        let start = std::time::Instant::now();
        let results: Vec<_> = positions
            .par_iter()
            .map(|&position| (position, self.manipulate_cell(index, store, position)))
            .collect();
        let manipulated = self.into_store(index, results);
        log::info!(
            "Phase 2: manipulated {} cells in {:.1}ms",
            manipulated.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        manipulated
    }

    /// Generate every cell: Phase 1, barrier, Phase 2.
    pub fn generate(&self, index: &HexGridIndex) -> FlatStore {
        log::info!("Generating {} cells ({}x{} flats)...", index.len(), self.config.flat_size, self.config.flat_size);
        let phase1 = self.build_all(index);
        self.manipulate_all(index, &phase1)
    }

    /// Generate a whole world definition with this pipeline's settings
    pub fn generate_world(&self, world: &WorldDefinition) -> FlatStore {
        self.generate(&world.index())
    }
}
