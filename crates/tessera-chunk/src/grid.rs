use tessera_blocks::{AIR, BiomeKind, BlockId};

use crate::{ChunkCoord, MAX_LIGHT, SIZE_X, SIZE_Y, SIZE_Z, VOLUME};

/// Colored block light, each channel in `0..=15`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct LightRgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl LightRgb {
    pub const ZERO: LightRgb = LightRgb { r: 0, g: 0, b: 0 };

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub const fn splat(v: u8) -> Self {
        Self { r: v, g: v, b: v }
    }

    #[inline]
    pub fn max(self, other: LightRgb) -> LightRgb {
        LightRgb {
            r: self.r.max(other.r),
            g: self.g.max(other.g),
            b: self.b.max(other.b),
        }
    }

    #[inline]
    pub fn clamped(self) -> LightRgb {
        LightRgb {
            r: self.r.min(MAX_LIGHT),
            g: self.g.min(MAX_LIGHT),
            b: self.b.min(MAX_LIGHT),
        }
    }

    #[inline]
    pub fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    #[inline]
    pub fn from_channels(c: [u8; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }

    #[inline]
    pub fn is_dark(self) -> bool {
        self.r == 0 && self.g == 0 && self.b == 0
    }
}

/// Dense 16×256×16 block and light storage for one chunk column.
#[derive(Clone, Debug)]
pub struct VoxelGrid {
    pub coord: ChunkCoord,
    blocks: Vec<BlockId>,
    block_light: Vec<LightRgb>,
    sky_light: Vec<u8>,
    biomes: Vec<BiomeKind>,
}

impl VoxelGrid {
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            blocks: vec![AIR; VOLUME],
            block_light: vec![LightRgb::ZERO; VOLUME],
            sky_light: vec![0; VOLUME],
            biomes: vec![BiomeKind::default(); SIZE_X * SIZE_Z],
        }
    }

    #[inline]
    pub fn idx(x: usize, y: usize, z: usize) -> usize {
        assert!(
            x < SIZE_X && y < SIZE_Y && z < SIZE_Z,
            "local voxel ({x}, {y}, {z}) out of chunk bounds"
        );
        (y * SIZE_Z + z) * SIZE_X + x
    }

    #[inline]
    pub fn block(&self, x: usize, y: usize, z: usize) -> BlockId {
        self.blocks[Self::idx(x, y, z)]
    }

    #[inline]
    pub fn set_block(&mut self, x: usize, y: usize, z: usize, id: BlockId) {
        self.blocks[Self::idx(x, y, z)] = id;
    }

    #[inline]
    pub fn block_light(&self, x: usize, y: usize, z: usize) -> LightRgb {
        self.block_light[Self::idx(x, y, z)]
    }

    #[inline]
    pub fn set_block_light(&mut self, x: usize, y: usize, z: usize, light: LightRgb) {
        self.block_light[Self::idx(x, y, z)] = light.clamped();
    }

    #[inline]
    pub fn sky_light(&self, x: usize, y: usize, z: usize) -> u8 {
        self.sky_light[Self::idx(x, y, z)]
    }

    #[inline]
    pub fn set_sky_light(&mut self, x: usize, y: usize, z: usize, level: u8) {
        self.sky_light[Self::idx(x, y, z)] = level.min(MAX_LIGHT);
    }

    /// Per-channel max of block light and sky light.
    #[inline]
    pub fn combined_light(&self, x: usize, y: usize, z: usize) -> LightRgb {
        let i = Self::idx(x, y, z);
        self.block_light[i].max(LightRgb::splat(self.sky_light[i]))
    }

    #[inline]
    pub fn biome(&self, x: usize, z: usize) -> BiomeKind {
        assert!(x < SIZE_X && z < SIZE_Z, "local column ({x}, {z}) out of chunk bounds");
        self.biomes[z * SIZE_X + x]
    }

    #[inline]
    pub fn set_biome(&mut self, x: usize, z: usize, biome: BiomeKind) {
        assert!(x < SIZE_X && z < SIZE_Z, "local column ({x}, {z}) out of chunk bounds");
        self.biomes[z * SIZE_X + x] = biome;
    }

    /// Raw block ids in `(y * SIZE_Z + z) * SIZE_X + x` order.
    #[inline]
    pub fn blocks(&self) -> &[BlockId] {
        &self.blocks
    }

    /// Zeroes all sky and block light.
    pub fn clear_light(&mut self) {
        self.block_light.fill(LightRgb::ZERO);
        self.sky_light.fill(0);
    }

    #[inline]
    pub fn has_non_air(&self) -> bool {
        self.blocks.iter().any(|&b| b != AIR)
    }

    /// Highest non-air y in a column, if any.
    pub fn column_top(&self, x: usize, z: usize) -> Option<usize> {
        (0..SIZE_Y).rev().find(|&y| self.block(x, y, z) != AIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_grid_is_dark_air() {
        let g = VoxelGrid::new(ChunkCoord::column(3, -2));
        assert!(!g.has_non_air());
        assert_eq!(g.combined_light(5, 100, 5), LightRgb::ZERO);
        assert_eq!(g.biome(0, 15), BiomeKind::Plains);
    }

    #[test]
    fn combined_light_is_per_channel_max() {
        let mut g = VoxelGrid::new(ChunkCoord::default());
        g.set_block_light(1, 2, 3, LightRgb::new(12, 3, 0));
        g.set_sky_light(1, 2, 3, 7);
        assert_eq!(g.combined_light(1, 2, 3), LightRgb::new(12, 7, 7));
    }

    #[test]
    fn light_writes_are_clamped() {
        let mut g = VoxelGrid::new(ChunkCoord::default());
        g.set_sky_light(0, 0, 0, 40);
        g.set_block_light(0, 0, 0, LightRgb::new(200, 15, 16));
        assert_eq!(g.sky_light(0, 0, 0), 15);
        assert_eq!(g.block_light(0, 0, 0), LightRgb::splat(15));
    }

    #[test]
    fn set_block_round_trips_and_column_top() {
        let mut g = VoxelGrid::new(ChunkCoord::default());
        g.set_block(4, 70, 9, 3);
        g.set_block(4, 12, 9, 1);
        assert_eq!(g.block(4, 70, 9), 3);
        assert_eq!(g.column_top(4, 9), Some(70));
        assert_eq!(g.column_top(0, 0), None);
    }

    #[test]
    #[should_panic(expected = "out of chunk bounds")]
    fn out_of_range_local_panics() {
        let g = VoxelGrid::new(ChunkCoord::default());
        let _ = g.block(SIZE_X, 0, 0);
    }

    #[test]
    #[should_panic(expected = "out of chunk bounds")]
    fn out_of_range_height_panics() {
        let mut g = VoxelGrid::new(ChunkCoord::default());
        g.set_sky_light(0, SIZE_Y, 0, 1);
    }
}
