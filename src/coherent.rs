//! Coherent 2D noise primitives.
//!
//! The field generator only needs a smooth, deterministic function of two
//! coordinates that stays inside `[0, 1]`. [`PerlinSampler`] is the default.

use noise::{NoiseFn, Perlin};

/// A deterministic, stateless 2D noise function with output in `[0, 1]`.
pub trait CoherentNoise2D {
    fn sample(&self, x: f64, y: f64) -> f64;
}

/// Plain functions and closures work as primitives, mostly for tests.
impl<F> CoherentNoise2D for F
where
    F: Fn(f64, f64) -> f64,
{
    fn sample(&self, x: f64, y: f64) -> f64 {
        self(x, y)
    }
}

/// Lattice permutation seed used when none is given.
///
/// The per-call seed only moves octave offsets, so the lattice itself stays
/// fixed across generations.
pub const DEFAULT_LATTICE_SEED: u32 = 0;

/// Perlin gradient noise remapped from `[-1, 1]` to `[0, 1]`.
///
/// Integer lattice points always sample to exactly `0.5`.
#[derive(Clone, Debug)]
pub struct PerlinSampler {
    perlin: Perlin,
}

impl PerlinSampler {
    pub fn new() -> Self {
        Self::with_lattice_seed(DEFAULT_LATTICE_SEED)
    }

    pub fn with_lattice_seed(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
        }
    }
}

impl Default for PerlinSampler {
    fn default() -> Self {
        Self::new()
    }
}

/// Past 2^52 every `f64` is an integer, i.e. a lattice point.
const LATTICE_LIMIT: f64 = 4_503_599_627_370_496.0;

impl CoherentNoise2D for PerlinSampler {
    fn sample(&self, x: f64, y: f64) -> f64 {
        // Also catches NaN, which would otherwise reach the lattice hash.
        if !(x.abs() < LATTICE_LIMIT && y.abs() < LATTICE_LIMIT) {
            return 0.5;
        }
        let raw = self.perlin.get([x, y]);
        ((raw + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lattice_points_are_midpoint() {
        let sampler = PerlinSampler::new();
        for &(x, y) in &[(0.0, 0.0), (3.0, -7.0), (-100000.0, 42.0)] {
            assert_eq!(sampler.sample(x, y), 0.5);
        }
    }

    #[test]
    fn test_range_and_determinism() {
        let a = PerlinSampler::new();
        let b = PerlinSampler::new();
        for i in 0..500 {
            let x = i as f64 * 0.173 - 40.0;
            let y = i as f64 * -0.291 + 12.5;
            let v = a.sample(x, y);
            assert!((0.0..=1.0).contains(&v), "sample {v} out of range");
            assert_eq!(v, b.sample(x, y));
        }
    }

    #[test]
    fn test_out_of_range_coordinates() {
        let sampler = PerlinSampler::new();
        assert_eq!(sampler.sample(f64::INFINITY, 0.0), 0.5);
        assert_eq!(sampler.sample(1.5, f64::NAN), 0.5);
        assert_eq!(sampler.sample(1e300, -1e300), 0.5);
    }

    #[test]
    fn test_continuity() {
        let sampler = PerlinSampler::new();
        let base = sampler.sample(10.37, -4.21);
        let nudged = sampler.sample(10.37 + 1e-6, -4.21 + 1e-6);
        assert!((base - nudged).abs() < 1e-4);
    }

    #[test]
    fn test_closure_primitive() {
        let flat = |_x: f64, _y: f64| 0.25;
        assert_eq!(flat.sample(1.0, 2.0), 0.25);
    }
}
