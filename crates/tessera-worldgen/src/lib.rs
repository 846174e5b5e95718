//! Deterministic procedural terrain: layered height noise, caves, bedrock, biomes.
#![forbid(unsafe_code)]

pub mod config;
mod terrain;

pub use config::{Bedrock, Biomes, Caves, Fractal, HeightLayers, NoiseLayer, PaletteNames, WorldGenConfig};
pub use terrain::{Palette, TerrainGenerator};
