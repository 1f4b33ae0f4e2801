//! Seedable multi-octave noise heightmap generation
//!
//! Re-exports modules for use by binaries and tools.

pub mod ascii;
pub mod coherent;
pub mod config;
pub mod export;
pub mod noise_field;
pub mod offsets;
pub mod tilemap;

pub use coherent::{CoherentNoise2D, PerlinSampler};
pub use noise_field::{
    generate, generate_simple, generate_with, try_generate, GenerationParameters, NoiseMap,
    ParameterError,
};
pub use offsets::{octave_offsets, Offset2};
