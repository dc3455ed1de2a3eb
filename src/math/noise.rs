//! Deterministic hash-based noise and RNG
//!
//! Every random decision in generation flows through these helpers so that the
//! same seed always produces the same terrain.

/// Seeded generator for per-cell layout decisions (island placement, jitter)
#[derive(Clone, Debug)]
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed.wrapping_add(1) }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let mut h = (self.state >> 32) as u32;
        h = h.wrapping_mul(0x45d9f3b);
        h ^= h >> 16;
        h = h.wrapping_mul(0x45d9f3b);
        h ^= h >> 16;
        h
    }

    /// Uniform in `[0, 1)`
    pub fn next_float(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_float() * (max - min)
    }

    /// Inclusive on both ends
    pub fn range_i32(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        let span = (max - min + 1) as u32;
        min + (self.next_u32() % span) as i32
    }
}

/// Lattice hash of a world column, in `[0, 1]`
pub fn hash_2d(ix: i32, iz: i32, seed: u32) -> f32 {
    let mut h = (ix as u32).wrapping_mul(374761393)
        .wrapping_add((iz as u32).wrapping_mul(668265263))
        .wrapping_add(seed.wrapping_mul(1274126177));
    h = (h ^ (h >> 13)).wrapping_mul(1103515245);
    h = h ^ (h >> 16);
    (h & 0x7FFFFFFF) as f32 / 0x7FFFFFFF_u32 as f32
}

/// FNV-1a hash of a string, used to turn cell identifiers into seeds
pub fn hash_str(s: &str) -> u32 {
    let mut h: u32 = 0x811c9dc5;
    for b in s.bytes() {
        h ^= b as u32;
        h = h.wrapping_mul(0x01000193);
    }
    h
}

/// Bilinear value noise in `[0, 1]`; `scale` is the lattice spacing in blocks
pub fn value_noise(x: f32, z: f32, scale: f32, seed: u32) -> f32 {
    let sx = x / scale;
    let sz = z / scale;

    let ix = sx.floor() as i32;
    let iz = sz.floor() as i32;
    let fx = sx - sx.floor();
    let fz = sz - sz.floor();

    let fx = fx * fx * (3.0 - 2.0 * fx);
    let fz = fz * fz * (3.0 - 2.0 * fz);

    let h00 = hash_2d(ix, iz, seed);
    let h10 = hash_2d(ix + 1, iz, seed);
    let h01 = hash_2d(ix, iz + 1, seed);
    let h11 = hash_2d(ix + 1, iz + 1, seed);

    let a = h00 + (h10 - h00) * fx;
    let b = h01 + (h11 - h01) * fx;
    a + (b - a) * fz
}

/// Three-octave value noise remapped to [-1, 1].
pub fn fractal_noise(x: f32, z: f32, scale: f32, seed: u32) -> f32 {
    let n1 = value_noise(x, z, scale, seed);
    let n2 = value_noise(x, z, scale * 0.5, seed.wrapping_add(101));
    let n3 = value_noise(x, z, scale * 0.25, seed.wrapping_add(202));
    let n = n1 * 0.57 + n2 * 0.29 + n3 * 0.14;
    (n * 2.0 - 1.0).clamp(-1.0, 1.0)
}

/// One-dimensional organic wobble in [-1, 1]: layered sines plus a hashed jitter.
pub fn line_noise(s: f32, seed: u32) -> f32 {
    let phase = (seed % 1024) as f32 * 0.173;
    let waves = (s * 0.05 + phase).sin() * 0.5
        + (s * 0.13 + phase * 1.7).sin() * 0.3
        + (s * 0.31 + phase * 2.3).sin() * 0.12;
    let jitter = hash_2d(s.floor() as i32, 0, seed) * 2.0 - 1.0;
    (waves + jitter * 0.08).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut a = SimpleRng::new(42);
        let mut b = SimpleRng::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
        let mut c = SimpleRng::new(43);
        assert_ne!(SimpleRng::new(42).next_u32(), c.next_u32());
    }

    #[test]
    fn test_rng_ranges() {
        let mut rng = SimpleRng::new(7);
        for _ in 0..1000 {
            let f = rng.next_float();
            assert!((0.0..1.0).contains(&f));
            let r = rng.range(-2.0, 3.0);
            assert!((-2.0..3.0).contains(&r));
            let i = rng.range_i32(-1, 1);
            assert!((-1..=1).contains(&i));
        }
        assert_eq!(rng.range_i32(5, 5), 5);
    }

    #[test]
    fn test_hash_2d_range() {
        for i in -50..50 {
            let h = hash_2d(i, i * 7, 99);
            assert!((0.0..=1.0).contains(&h));
        }
        assert_eq!(hash_2d(3, 4, 5), hash_2d(3, 4, 5));
    }

    #[test]
    fn test_hash_str() {
        assert_eq!(hash_str("0:0"), hash_str("0:0"));
        assert_ne!(hash_str("0:0"), hash_str("0:1"));
    }

    #[test]
    fn test_noise_bounds() {
        for i in 0..200 {
            let x = i as f32 * 1.37;
            let z = i as f32 * 0.71;
            let v = value_noise(x, z, 8.0, 1);
            assert!((0.0..=1.0).contains(&v));
            let f = fractal_noise(x, z, 16.0, 1);
            assert!((-1.0..=1.0).contains(&f));
            let l = line_noise(x, 3);
            assert!((-1.0..=1.0).contains(&l));
        }
    }
}
