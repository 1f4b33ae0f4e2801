//! Multi-octave noise field generation.
//!
//! [`generate`] turns a [`GenerationParameters`] bundle into a [`NoiseMap`]
//! normalized to `[0, 1]`. The generator is total: out-of-range parameters are
//! clamped for the duration of the call instead of being rejected. Callers that
//! prefer rejection can go through [`try_generate`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coherent::{CoherentNoise2D, PerlinSampler};
use crate::offsets::{octave_offsets, Offset2};
use crate::tilemap::Tilemap;

/// Generated heightmap, indexed `(x, y)`, every value in `[0, 1]`.
pub type NoiseMap = Tilemap<f32>;

/// Scale used whenever the requested scale is zero or negative.
pub const MIN_SCALE: f64 = 1e-4;

/// Smallest lacunarity the generator will use.
pub const MIN_LACUNARITY: f64 = 1.0;

// =============================================================================
// PARAMETERS
// =============================================================================

/// Input bundle for one generation call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParameters {
    /// Map width in cells
    pub width: i32,
    /// Map height in cells
    pub height: i32,
    /// Seed for octave offset derivation
    pub seed: i64,
    /// Zoom of the first octave (larger = broader features)
    pub scale: f64,
    /// Number of noise layers
    pub octave_count: i32,
    /// Amplitude decay per octave, conventionally 0.0-1.0
    pub persistence: f64,
    /// Frequency multiplier per octave
    pub lacunarity: f64,
    /// Translation applied to every octave
    pub offset: Offset2,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            seed: 0,
            scale: 25.0,
            octave_count: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            offset: Offset2::ZERO,
        }
    }
}

/// Parameters after clamping, as actually used by the generator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClampedParameters {
    pub width: usize,
    pub height: usize,
    pub seed: i64,
    pub scale: f64,
    pub octave_count: usize,
    pub persistence: f64,
    pub lacunarity: f64,
    pub offset: Offset2,
}

/// Why [`GenerationParameters::validate`] rejected a bundle.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    #[error("width must be at least 1, got {0}")]
    Width(i32),

    #[error("height must be at least 1, got {0}")]
    Height(i32),

    #[error("scale must be positive and finite, got {0}")]
    Scale(f64),

    #[error("octave count must not be negative, got {0}")]
    OctaveCount(i32),

    #[error("lacunarity must be finite and at least 1, got {0}")]
    Lacunarity(f64),

    #[error("persistence must be finite, got {0}")]
    Persistence(f64),

    #[error("offset must be finite, got ({}, {})", .0.x, .0.y)]
    Offset(Offset2),
}

impl GenerationParameters {
    /// Apply the generator's clamps without touching `self`.
    pub fn clamped(&self) -> ClampedParameters {
        let scale = if self.scale <= 0.0 { MIN_SCALE } else { self.scale };
        let lacunarity = if self.lacunarity < MIN_LACUNARITY {
            MIN_LACUNARITY
        } else {
            self.lacunarity
        };

        let clamped = ClampedParameters {
            width: self.width.max(1) as usize,
            height: self.height.max(1) as usize,
            seed: self.seed,
            scale,
            octave_count: self.octave_count.max(0) as usize,
            persistence: self.persistence,
            lacunarity,
            offset: self.offset,
        };

        if clamped.width as i32 != self.width
            || clamped.height as i32 != self.height
            || clamped.scale != self.scale
            || clamped.lacunarity != self.lacunarity
            || clamped.octave_count as i32 != self.octave_count
        {
            tracing::debug!(requested = ?self, effective = ?clamped, "clamped generation parameters");
        }

        clamped
    }

    /// Check every field against the range the generator would otherwise clamp to.
    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.width < 1 {
            return Err(ParameterError::Width(self.width));
        }
        if self.height < 1 {
            return Err(ParameterError::Height(self.height));
        }
        if !(self.scale > 0.0 && self.scale.is_finite()) {
            return Err(ParameterError::Scale(self.scale));
        }
        if self.octave_count < 0 {
            return Err(ParameterError::OctaveCount(self.octave_count));
        }
        if !(self.lacunarity >= MIN_LACUNARITY && self.lacunarity.is_finite()) {
            return Err(ParameterError::Lacunarity(self.lacunarity));
        }
        if !self.persistence.is_finite() {
            return Err(ParameterError::Persistence(self.persistence));
        }
        if !self.offset.is_finite() {
            return Err(ParameterError::Offset(self.offset));
        }
        Ok(())
    }
}

// =============================================================================
// GENERATION
// =============================================================================

/// Generate a normalized noise map with the default Perlin primitive.
pub fn generate(params: &GenerationParameters) -> NoiseMap {
    generate_with(params, &PerlinSampler::new())
}

/// Validate `params` first and refuse to clamp.
pub fn try_generate(params: &GenerationParameters) -> Result<NoiseMap, ParameterError> {
    params.validate()?;
    Ok(generate(params))
}

/// Generate a normalized noise map over any `[0, 1]` primitive.
///
/// Two passes: accumulate every octave per cell while tracking the raw range,
/// then inverse-lerp each cell from that range into `[0, 1]`. A flat raw field
/// (including zero octaves) normalizes to all zeros.
pub fn generate_with<N: CoherentNoise2D + ?Sized>(params: &GenerationParameters, noise: &N) -> NoiseMap {
    let p = params.clamped();
    let raw = accumulate_octaves(&p, noise);

    let (min_raw, max_raw) = raw_range(&raw);
    tracing::debug!(
        width = p.width,
        height = p.height,
        octaves = p.octave_count,
        min_raw,
        max_raw,
        "accumulated raw noise field"
    );

    normalize(&raw, min_raw, max_raw)
}

/// First pass: summed octaves per cell, before normalization.
fn accumulate_octaves<N: CoherentNoise2D + ?Sized>(p: &ClampedParameters, noise: &N) -> Tilemap<f64> {
    let offsets = octave_offsets(p.seed, p.octave_count, p.offset);

    // Centering keeps features in place when the grid is resized.
    let half_width = p.width as f64 / 2.0;
    let half_height = p.height as f64 / 2.0;

    let mut raw = Tilemap::new_with(p.width, p.height, 0.0f64);

    for y in 0..p.height {
        for x in 0..p.width {
            let mut amplitude = 1.0;
            let mut frequency = 1.0;
            let mut height = 0.0;

            for offset in &offsets {
                let sample_x = (x as f64 - half_width) / (p.scale * frequency) + offset.x;
                let sample_y = (y as f64 - half_height) / (p.scale * frequency) + offset.y;

                // [-1, 1] so octaves can cancel each other out
                let value = noise.sample(sample_x, sample_y) * 2.0 - 1.0;
                height += value * amplitude;

                amplitude *= p.persistence;
                frequency *= p.lacunarity;
            }

            raw.set(x, y, height);
        }
    }

    raw
}

/// Smallest and largest finite raw value; `(0, 0)` when there is none.
fn raw_range(raw: &Tilemap<f64>) -> (f64, f64) {
    let mut min_raw = f64::MAX;
    let mut max_raw = f64::MIN;

    for (_, _, &v) in raw.iter() {
        if !v.is_finite() {
            continue;
        }
        if v < min_raw {
            min_raw = v;
        }
        if v > max_raw {
            max_raw = v;
        }
    }

    if min_raw > max_raw {
        (0.0, 0.0)
    } else {
        (min_raw, max_raw)
    }
}

/// Second pass: inverse-lerp into `[0, 1]`.
fn normalize(raw: &Tilemap<f64>, min_raw: f64, max_raw: f64) -> NoiseMap {
    let mut map = Tilemap::new_with(raw.width, raw.height, 0.0f32);
    let range = max_raw - min_raw;

    if range <= 0.0 || !range.is_finite() {
        return map;
    }

    for (x, y, &v) in raw.iter() {
        let t = (v - min_raw) / range;
        if t.is_finite() {
            map.set(x, y, t.clamp(0.0, 1.0) as f32);
        }
    }

    map
}

// =============================================================================
// LEGACY SINGLE-OCTAVE VARIANT
// =============================================================================

/// The original single-octave map: raw primitive values at `(x / scale, y / scale)`.
///
/// Not equivalent to [`generate`] with one octave: there is no centering, no
/// seed, no `[-1, 1]` remap and no normalization pass. Kept for callers that
/// need outputs matching maps produced before octaves existed.
pub fn generate_simple(width: i32, height: i32, scale: f64) -> NoiseMap {
    generate_simple_with(width, height, scale, &PerlinSampler::new())
}

/// Legacy single-octave map over any `[0, 1]` primitive.
pub fn generate_simple_with<N: CoherentNoise2D + ?Sized>(
    width: i32,
    height: i32,
    scale: f64,
    noise: &N,
) -> NoiseMap {
    let width = width.max(1) as usize;
    let height = height.max(1) as usize;
    let scale = if scale <= 0.0 { MIN_SCALE } else { scale };

    let mut map = Tilemap::new_with(width, height, 0.0f32);
    for y in 0..height {
        for x in 0..width {
            let value = noise.sample(x as f64 / scale, y as f64 / scale);
            *map.get_mut(x, y) = value.clamp(0.0, 1.0) as f32;
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(width: i32, height: i32, seed: i64, octaves: i32) -> GenerationParameters {
        GenerationParameters {
            width,
            height,
            seed,
            scale: 10.0,
            octave_count: octaves,
            persistence: 0.5,
            lacunarity: 2.0,
            offset: Offset2::ZERO,
        }
    }

    #[test]
    fn test_clamps() {
        let p = GenerationParameters {
            width: -5,
            height: 0,
            scale: 0.0,
            octave_count: -3,
            lacunarity: 0.5,
            ..Default::default()
        }
        .clamped();

        assert_eq!(p.width, 1);
        assert_eq!(p.height, 1);
        assert_eq!(p.scale, MIN_SCALE);
        assert_eq!(p.octave_count, 0);
        assert_eq!(p.lacunarity, 1.0);
    }

    #[test]
    fn test_clamping_leaves_input_alone() {
        let original = GenerationParameters {
            scale: -1.0,
            ..Default::default()
        };
        let copy = original.clone();
        let _ = generate(&original);
        assert_eq!(original, copy);
    }

    #[test]
    fn test_zero_octaves_is_flat_zero() {
        let map = generate(&params(7, 5, 3, 0));
        assert_eq!(map.width, 7);
        assert_eq!(map.height, 5);
        assert!(map.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_constant_primitive_is_flat_zero() {
        let flat = |_x: f64, _y: f64| 0.8;
        let map = generate_with(&params(6, 6, 1, 5), &flat);
        assert!(map.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_normalized_range_hits_both_ends() {
        let map = generate(&params(32, 32, 9, 4));
        let (lo, hi) = map.min_max().unwrap();
        assert_eq!(lo, 0.0);
        assert_eq!(hi, 1.0);
    }

    #[test]
    fn test_sampling_is_centered() {
        for &(w, h) in &[(4, 6), (8, 10), (5, 3)] {
            let p = GenerationParameters {
                scale: 1.0,
                ..params(w, h, 77, 1)
            };
            let target = octave_offsets(77, 1, Offset2::ZERO)[0];
            let spike = move |x: f64, y: f64| if x == target.x && y == target.y { 1.0 } else { 0.0 };

            let map = generate_with(&p, &spike);
            let center = ((w / 2) as usize, (h / 2) as usize);

            if w % 2 == 0 && h % 2 == 0 {
                assert_eq!(*map.get(center.0, center.1), 1.0, "{w}x{h}");
                let ones = map.values().iter().filter(|&&v| v == 1.0).count();
                assert_eq!(ones, 1);
            } else {
                // Odd sizes put the center between cells, so nothing lands on it.
                assert!(map.values().iter().all(|&v| v == 0.0), "{w}x{h}");
            }
        }
    }

    #[test]
    fn test_raw_field_does_not_shift_when_resized() {
        let noise = PerlinSampler::new();
        let small = accumulate_octaves(&params(8, 8, 5, 3).clamped(), &noise);
        let large = accumulate_octaves(&params(16, 16, 5, 3).clamped(), &noise);

        // Cell (x, y) of the small map sits at (x + 4, y + 4) of the large one.
        for (x, y, &v) in small.iter() {
            assert_eq!(v, *large.get(x + 4, y + 4));
        }
    }

    #[test]
    fn test_octave_amplitudes_follow_persistence() {
        // Primitive is 1.0 everywhere, so each octave contributes +amplitude.
        let one = |_x: f64, _y: f64| 1.0;
        let p = GenerationParameters {
            persistence: 0.5,
            ..params(1, 1, 0, 3)
        };
        let raw = accumulate_octaves(&p.clamped(), &one);
        assert_eq!(*raw.get(0, 0), 1.0 + 0.5 + 0.25);
    }

    #[test]
    fn test_non_finite_persistence_still_produces_a_map() {
        let p = GenerationParameters {
            persistence: f64::NAN,
            ..params(4, 4, 2, 3)
        };
        let map = generate(&p);
        assert!(map.values().iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_validate_rejects_what_clamping_fixes() {
        let base = GenerationParameters::default();
        assert_eq!(base.validate(), Ok(()));

        let cases = [
            (GenerationParameters { width: 0, ..base.clone() }, ParameterError::Width(0)),
            (GenerationParameters { height: -2, ..base.clone() }, ParameterError::Height(-2)),
            (GenerationParameters { scale: 0.0, ..base.clone() }, ParameterError::Scale(0.0)),
            (GenerationParameters { octave_count: -1, ..base.clone() }, ParameterError::OctaveCount(-1)),
            (GenerationParameters { lacunarity: 0.5, ..base.clone() }, ParameterError::Lacunarity(0.5)),
        ];
        for (p, expected) in cases {
            assert_eq!(p.validate(), Err(expected));
        }

        let bad_offset = GenerationParameters {
            offset: Offset2::new(f64::INFINITY, 0.0),
            ..base
        };
        assert!(matches!(bad_offset.validate(), Err(ParameterError::Offset(_))));
    }

    #[test]
    fn test_try_generate_matches_generate_for_valid_input() {
        let p = params(5, 4, 11, 2);
        assert_eq!(try_generate(&p).unwrap(), generate(&p));
        assert!(try_generate(&GenerationParameters { scale: -1.0, ..p }).is_err());
    }

    #[test]
    fn test_simple_variant_is_raw_primitive() {
        let sampler = PerlinSampler::new();
        let map = generate_simple(6, 4, 2.5);
        for (x, y, &v) in map.iter() {
            assert_eq!(v, sampler.sample(x as f64 / 2.5, y as f64 / 2.5) as f32);
        }
        // Origin is a lattice point.
        assert_eq!(*map.get(0, 0), 0.5);
    }

    #[test]
    fn test_simple_variant_clamps() {
        let map = generate_simple(-1, 0, 0.0);
        assert_eq!((map.width, map.height), (1, 1));
    }
}
