//! Block, texture, and biome lookup tables.
#![forbid(unsafe_code)]

pub mod biome;
pub mod config;
pub mod registry;
pub mod texture;
pub mod types;

pub use biome::{BiomeDef, BiomeKind};
pub use registry::{BlockRegistry, BlockType, MAX_BLOCK_ID};
pub use texture::TextureCatalog;
pub use types::{AIR, BlockId, TextureId};
