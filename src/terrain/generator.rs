//! Noise-based base terrain: the hilly fill primitive and the world height sampler

use glam::IVec2;
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use crate::flat::{Flat, MaterialId};
use crate::generation::context::{BaseFill, HeightSampler};

/// Parameters controlling terrain noise
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    pub seed: u32,
    /// World blocks per noise unit; the fill primitive uses half of it
    pub scale: f32,
    pub base_height: f32,
    pub height_scale: f32,
    pub octaves: u32,
    pub persistence: f32,
    pub lacunarity: f32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            seed: 12345,
            scale: 100.0,
            base_height: 35.0,
            height_scale: 30.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

/// Fbm-backed height source shared by every scenario builder
pub struct TerrainGenerator {
    params: TerrainParams,
    noise: Fbm<Perlin>,
}

impl TerrainGenerator {
    pub fn new(params: TerrainParams) -> Self {
        let noise = Self::build_noise(&params, params.seed);
        Self { params, noise }
    }

    fn build_noise(params: &TerrainParams, seed: u32) -> Fbm<Perlin> {
        Fbm::<Perlin>::new(seed)
            .set_octaves(params.octaves as usize)
            .set_persistence(params.persistence as f64)
            .set_lacunarity(params.lacunarity as f64)
    }

    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    /// Noise in [-1, 1] at world position
    fn sample(noise: &Fbm<Perlin>, scale: f32, x: f32, z: f32) -> f64 {
        let nx = (x / scale) as f64;
        let nz = (z / scale) as f64;
        noise.get([nx, nz]).clamp(-1.0, 1.0)
    }

    /// World height in `[base_height, base_height + height_scale]`
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        let n = Self::sample(&self.noise, self.params.scale, x, z);
        let unit = (n * 0.5 + 0.5) as f32;
        self.params.base_height + unit * self.params.height_scale
    }
}

impl HeightSampler for TerrainGenerator {
    fn height_at(&self, world: IVec2) -> i32 {
        TerrainGenerator::height_at(self, world.x as f32, world.y as f32).round() as i32
    }
}

impl BaseFill for TerrainGenerator {
    /// Fill every column with `base ± variation` following world-space noise.
    /// Columns are marked `NOT_SET_MUTABLE`: their level is valid but no
    /// material has been chosen yet.
    fn fill(&self, flat: &mut Flat, base_height: i32, variation: i32, seed: u32) {
        let noise = Self::build_noise(&self.params, seed);
        let variation = variation.max(0) as f64;
        for z in 0..flat.size_z() {
            for x in 0..flat.size_x() {
                let world = flat.local_to_world(x as i32, z as i32);
                let n = Self::sample(&noise, self.params.scale * 0.5, world.x as f32, world.y as f32);
                let level = (base_height as f64 + n * variation).round() as i32;
                flat.set_level(x, z, level);
                flat.set_material(x, z, MaterialId::NOT_SET_MUTABLE);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_roundtrip_partial_json() {
        let params: TerrainParams = serde_json::from_str(r#"{"seed": 7, "octaves": 2}"#).unwrap();
        assert_eq!(params.seed, 7);
        assert_eq!(params.octaves, 2);
        assert_eq!(params.base_height, TerrainParams::default().base_height);
    }

    #[test]
    fn test_height_at_is_bounded_and_stable() {
        let terrain = TerrainGenerator::new(TerrainParams::default());
        for (x, z) in [(0.0, 0.0), (17.5, -3.0), (250.0, 90.0), (-128.0, 64.0)] {
            let h = terrain.height_at(x, z);
            assert_eq!(h, terrain.height_at(x, z));
            assert!((35.0..=65.0).contains(&h), "height {h} at ({x}, {z})");
        }
    }

    #[test]
    fn test_seed_changes_heights() {
        let a = TerrainGenerator::new(TerrainParams { seed: 1, ..Default::default() });
        let b = TerrainGenerator::new(TerrainParams { seed: 2, ..Default::default() });
        let differs = (0..16).any(|i| {
            let x = 13.7 * i as f32;
            a.height_at(x, x * 0.5) != b.height_at(x, x * 0.5)
        });
        assert!(differs);
    }

    #[test]
    fn test_fill_stays_within_variation() {
        let generator = TerrainGenerator::new(TerrainParams::default());
        let mut flat = Flat::new(32, 32).with_mount(-16, 40);
        generator.fill(&mut flat, 40, 7, 99);

        for z in 0..32 {
            for x in 0..32 {
                let level = flat.level(x, z) as i32;
                assert!((33..=47).contains(&level), "level {level} at ({x}, {z})");
                assert_eq!(flat.material(x, z), MaterialId::NOT_SET_MUTABLE);
            }
        }
    }

    #[test]
    fn test_fill_clamps_to_valid_range() {
        let generator = TerrainGenerator::new(TerrainParams::default());
        let mut flat = Flat::new(8, 8);
        generator.fill(&mut flat, 250, 40, 1);
        assert!(flat.levels().iter().all(|&l| l >= 210));
        generator.fill(&mut flat, 2, 40, 1);
        assert!(flat.levels().iter().all(|&l| l <= 42));
    }

    #[test]
    fn test_height_sampler_trait() {
        let generator = TerrainGenerator::new(TerrainParams::default());
        let sampler: &dyn HeightSampler = &generator;
        let h = sampler.height_at(IVec2::new(10, -20));
        assert!((35..=65).contains(&h));
    }
}
