//! Per-octave sampling offsets derived from a seed.
//!
//! Every octave samples the noise lattice at a different, seed-dependent
//! translation so stacked octaves do not line up.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Range the random part of each offset component is drawn from.
pub const OFFSET_RANGE: Range<i32> = -100_000..100_000;

/// A 2D translation in noise space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Offset2 {
    pub x: f64,
    pub y: f64,
}

impl Offset2 {
    pub const ZERO: Offset2 = Offset2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Offset2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Derive `count` octave offsets from `seed`, each shifted by `base`.
///
/// Draws happen x then y, octave 0 first. Changing that order changes every
/// offset after it, so it is fixed.
pub fn octave_offsets(seed: i64, count: usize, base: Offset2) -> Vec<Offset2> {
    if count == 0 {
        return Vec::new();
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed as u64);
    let mut offsets = Vec::with_capacity(count);

    for _ in 0..count {
        let x = rng.gen_range(OFFSET_RANGE) as f64 + base.x;
        let y = rng.gen_range(OFFSET_RANGE) as f64 + base.y;
        offsets.push(Offset2 { x, y });
    }

    tracing::trace!(seed, count, ?offsets, "derived octave offsets");
    offsets
}
