//! Plain noise-filled scenarios with a single surface material

use crate::core::Result;
use crate::flat::MaterialId;
use crate::generation::context::BuilderContext;
use crate::generation::params::Parameters;
use crate::terrain::SurfaceProfile;

use super::{LandSettings, ScenarioBuilder};

/// Scenario that fills `sea + landLevel ± landOffset` and paints one material
#[derive(Clone, Debug)]
pub struct BasicScenario {
    name: &'static str,
    defaults: LandSettings,
    land: LandSettings,
    material: MaterialId,
    /// Palette name overriding the default material
    material_name: Option<String>,
}

impl BasicScenario {
    pub const fn new(name: &'static str, defaults: LandSettings, material: MaterialId) -> Self {
        Self {
            name,
            defaults,
            land: defaults,
            material,
            material_name: None,
        }
    }

    pub const fn plains() -> Self {
        Self::new("plains", LandSettings::new(5, 3), MaterialId::GRASS)
    }

    pub const fn hills() -> Self {
        Self::new("hills", LandSettings::new(15, 12), MaterialId::GRASS)
    }

    pub const fn forest() -> Self {
        Self::new("forest", LandSettings::new(8, 5), MaterialId::DIRT)
    }

    pub const fn desert() -> Self {
        Self::new("desert", LandSettings::new(6, 4), MaterialId::SAND)
    }

    pub const fn heath() -> Self {
        Self::new("heath", LandSettings::new(7, 3), MaterialId::GRASS)
    }

    pub const fn swamp() -> Self {
        Self::new("swamp", LandSettings::new(1, 2), MaterialId::DIRT)
    }

    pub const fn city() -> Self {
        Self::new("city", LandSettings::new(6, 0), MaterialId::STONE)
    }

    pub const fn village() -> Self {
        Self::new("village", LandSettings::new(5, 1), MaterialId::GRASS)
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }
}

impl ScenarioBuilder for BasicScenario {
    fn name(&self) -> &'static str {
        self.name
    }

    fn initialize(&mut self, parameters: &Parameters) -> Result<()> {
        self.land = LandSettings::from_parameters(parameters, self.defaults);
        self.material_name = parameters.non_blank("material").map(str::to_string);
        Ok(())
    }

    fn build_flat(&mut self, ctx: &mut BuilderContext<'_>) -> Result<()> {
        let sea = ctx.sea_level();
        let seed = ctx.world_seed();
        ctx.base_fill().fill(ctx.flat, sea + self.land.land_level, self.land.land_offset, seed);
        if let Some(name) = &self.material_name {
            match ctx.flat.palette().by_name(name) {
                Some(material) => self.material = material,
                None => log::warn!("Unknown material '{}' for {}, keeping default", name, self.name),
            }
        }
        SurfaceProfile::Uniform(self.material).paint(ctx.flat, sea);
        Ok(())
    }

    fn land_level(&self) -> i32 {
        self.land.land_level
    }

    fn land_offset(&self) -> i32 {
        self.land.land_offset
    }
}
