//! Builder registry: string identifier → constructor
//!
//! Built once at start-up and passed into the pipeline; never global state.

use std::collections::HashMap;

use super::config::GENERATION_NAMESPACE;
use super::params::Parameters;
use crate::grid::HexGridConfig;
use crate::manipulator::{self, ManipulatorBuilder};
use crate::scenario::{self, ScenarioBuilder};

/// Constructor of an uninitialized scenario builder
pub type ScenarioFactory = fn() -> Box<dyn ScenarioBuilder>;

/// Constructor of an uninitialized manipulator builder
pub type ManipulatorFactory = fn() -> Box<dyn ManipulatorBuilder>;

struct ManipulatorEntry {
    id: &'static str,
    /// Parameter keys whose presence makes this manipulator run
    triggers: &'static [&'static str],
    factory: ManipulatorFactory,
}

/// Immutable table of every known scenario and manipulator
pub struct BuilderRegistry {
    namespace: String,
    scenarios: HashMap<String, ScenarioFactory>,
    /// Execution order is registration order
    manipulators: Vec<ManipulatorEntry>,
}

impl Default for BuilderRegistry {
    fn default() -> Self {
        let mut registry = Self::empty(GENERATION_NAMESPACE);
        scenario::register_defaults(&mut registry);
        manipulator::register_defaults(&mut registry);
        registry
    }
}

impl BuilderRegistry {
    /// Registry without any builders
    pub fn empty(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            scenarios: HashMap::new(),
            manipulators: Vec::new(),
        }
    }

    /// Default builders with a custom parameter namespace
    pub fn with_namespace(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            ..Self::default()
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Register a scenario; ids are case-insensitive
    pub fn register_scenario(&mut self, id: &str, factory: ScenarioFactory) {
        self.scenarios.insert(id.to_ascii_lowercase(), factory);
    }

    /// Register a manipulator, appended to the execution order
    pub fn register_manipulator(
        &mut self,
        id: &'static str,
        triggers: &'static [&'static str],
        factory: ManipulatorFactory,
    ) {
        self.manipulators.retain(|entry| entry.id != id);
        self.manipulators.push(ManipulatorEntry { id, triggers, factory });
    }

    pub fn resolve_scenario(&self, id: &str) -> Option<ScenarioFactory> {
        self.scenarios.get(&id.trim().to_ascii_lowercase()).copied()
    }

    pub fn resolve_manipulator(&self, id: &str) -> Option<ManipulatorFactory> {
        let id = id.trim();
        self.manipulators
            .iter()
            .find(|entry| entry.id.eq_ignore_ascii_case(id))
            .map(|entry| entry.factory)
    }

    /// Sorted scenario ids
    pub fn scenario_ids(&self) -> Vec<&str> {
        let mut ids: Vec<_> = self.scenarios.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Manipulator ids in execution order
    pub fn manipulator_ids(&self) -> Vec<&'static str> {
        self.manipulators.iter().map(|entry| entry.id).collect()
    }

    /// A cell's raw parameters filtered to this registry's namespace
    pub fn parameters_for(&self, config: &HexGridConfig) -> Parameters {
        Parameters::from_namespace(&config.parameters, &self.namespace)
    }

    /// Create and initialize a scenario builder.
    ///
    /// Unknown ids and initialization failures are logged and yield None.
    pub fn create_scenario_builder(
        &self,
        id: &str,
        parameters: &Parameters,
    ) -> Option<Box<dyn ScenarioBuilder>> {
        let Some(factory) = self.resolve_scenario(id) else {
            log::warn!("No scenario builder registered for '{}'", id);
            return None;
        };
        let mut builder = factory();
        match builder.initialize(parameters) {
            Ok(()) => Some(builder),
            Err(e) => {
                log::warn!("Scenario builder '{}' failed to initialize: {}", id, e);
                None
            }
        }
    }

    /// Create and initialize a manipulator builder.
    ///
    /// Unknown ids and initialization failures are logged and yield None.
    pub fn create_manipulator_builder(
        &self,
        id: &str,
        parameters: &Parameters,
    ) -> Option<Box<dyn ManipulatorBuilder>> {
        let Some(factory) = self.resolve_manipulator(id) else {
            log::warn!("No manipulator builder registered for '{}'", id);
            return None;
        };
        let mut builder = factory();
        match builder.initialize(parameters) {
            Ok(()) => Some(builder),
            Err(e) => {
                log::warn!("Manipulator builder '{}' failed to initialize: {}", id, e);
                None
            }
        }
    }

    /// Manipulators that apply to a cell, in execution order
    pub fn manipulators_for(&self, parameters: &Parameters) -> Vec<&'static str> {
        self.manipulators
            .iter()
            .filter(|entry| entry.triggers.iter().any(|key| parameters.contains(key)))
            .map(|entry| entry.id)
            .collect()
    }
}
