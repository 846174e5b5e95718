//! Fixed-size voxel storage and chunk coordinate helpers.
#![forbid(unsafe_code)]

mod coord;
mod grid;

pub use coord::{ChunkCoord, chunk_of, locate, resolve_local};
pub use grid::{LightRgb, VoxelGrid};

pub const SIZE_X: usize = 16;
pub const SIZE_Y: usize = 256;
pub const SIZE_Z: usize = 16;
pub const VOLUME: usize = SIZE_X * SIZE_Y * SIZE_Z;

/// Light levels for both sky and block light are clamped to `0..=MAX_LIGHT`.
pub const MAX_LIGHT: u8 = 15;
