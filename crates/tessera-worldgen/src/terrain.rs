use std::error::Error;
use std::sync::Arc;

use fastnoise_lite::{FastNoiseLite, NoiseType};
use tessera_blocks::{AIR, BiomeKind, BlockId, BlockRegistry};
use tessera_chunk::{ChunkCoord, SIZE_X, SIZE_Y, SIZE_Z, VoxelGrid};

use crate::config::{Fractal, NoiseLayer, WorldGenConfig};

/// Block ids the generator writes, resolved once from registry names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    pub stone: BlockId,
    pub bedrock: BlockId,
    /// `(top, filler)` per biome, indexed by `BiomeKind as usize`.
    pub biome_blocks: [(BlockId, BlockId); 4],
}

impl Palette {
    pub fn resolve(cfg: &WorldGenConfig, reg: &BlockRegistry) -> Result<Self, Box<dyn Error>> {
        let lookup = |name: &str| -> Result<BlockId, Box<dyn Error>> {
            reg.id_by_name(name)
                .ok_or_else(|| format!("worldgen palette block `{name}` is not in the registry").into())
        };
        let mut biome_blocks = [(AIR, AIR); 4];
        for kind in BiomeKind::ALL {
            let def = kind.def();
            biome_blocks[kind as usize] = (lookup(def.top_block)?, lookup(def.filler_block)?);
        }
        Ok(Self {
            stone: lookup(&cfg.palette.stone)?,
            bedrock: lookup(&cfg.palette.bedrock)?,
            biome_blocks,
        })
    }
}

fn noise(seed: i32, frequency: f32) -> FastNoiseLite {
    let mut n = FastNoiseLite::with_seed(seed);
    n.set_noise_type(Some(NoiseType::OpenSimplex2));
    n.set_frequency(Some(frequency));
    n
}

fn fractal2(n: &FastNoiseLite, x: f32, z: f32, f: &Fractal) -> f32 {
    let mut amp = 1.0_f32;
    let mut freq = 1.0_f32;
    let mut sum = 0.0_f32;
    let mut max_amp = 0.0_f32;
    for _ in 0..f.octaves.max(1) {
        sum += n.get_noise_2d(x * freq, z * freq) * amp;
        max_amp += amp;
        amp *= f.persistence;
        freq *= f.lacunarity;
    }
    if max_amp > 0.0 { sum / max_amp } else { sum }
}

#[inline]
fn smoothstep(e0: f32, e1: f32, x: f32) -> f32 {
    let t = ((x - e0) / (e1 - e0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

struct Layer {
    noise: FastNoiseLite,
    params: NoiseLayer,
}

impl Layer {
    fn new(seed: i32, params: &NoiseLayer) -> Self {
        Self {
            noise: noise(seed, params.frequency),
            params: params.clone(),
        }
    }

    /// Fractal sample in roughly `[-1, 1]`.
    #[inline]
    fn sample(&self, x: f32, z: f32) -> f32 {
        fractal2(&self.noise, x, z, &self.params.fractal)
    }
}

/// Pure function of `(seed, config)` from world coordinates to terrain. Each
/// generation thread owns one; two generators with the same inputs produce
/// identical chunks.
pub struct TerrainGenerator {
    seed: i32,
    cfg: Arc<WorldGenConfig>,
    palette: Palette,
    continental: Layer,
    hills: Layer,
    ridges: Layer,
    peaks: Layer,
    warp_x: Layer,
    warp_z: Layer,
    caves: FastNoiseLite,
    bedrock: FastNoiseLite,
    temperature: FastNoiseLite,
    humidity: FastNoiseLite,
}

impl TerrainGenerator {
    pub fn new(seed: i32, cfg: Arc<WorldGenConfig>, palette: Palette) -> Self {
        let h = &cfg.height;
        let continental = Layer::new(seed, &h.continental);
        let hills = Layer::new(seed ^ 0x2F6B_11A3, &h.hills);
        let ridges = Layer::new(seed ^ 0x5A17_C0DE, &h.ridges);
        let peaks = Layer::new(seed ^ 0x0BAD_5EED, &h.peaks);
        let warp_x = Layer::new(seed ^ 99_173, &h.warp);
        let warp_z = Layer::new(seed ^ 77_291, &h.warp);
        let caves = noise(seed ^ 41_337, cfg.caves.frequency);
        let bedrock = noise(seed ^ 0x7E57_BED0, cfg.bedrock.frequency);
        let temperature = noise(seed ^ 0x1203_5F31, cfg.biomes.temperature_frequency);
        let humidity = noise(((seed as u32) ^ 0x92E3_A1B2u32) as i32, cfg.biomes.humidity_frequency);
        Self {
            seed,
            cfg,
            palette,
            continental,
            hills,
            ridges,
            peaks,
            warp_x,
            warp_z,
            caves,
            bedrock,
            temperature,
            humidity,
        }
    }

    /// Convenience for callers holding a registry: resolves the palette first.
    pub fn from_registry(
        seed: i32,
        cfg: Arc<WorldGenConfig>,
        reg: &BlockRegistry,
    ) -> Result<Self, Box<dyn Error>> {
        let palette = Palette::resolve(&cfg, reg)?;
        Ok(Self::new(seed, cfg, palette))
    }

    #[inline]
    pub fn seed(&self) -> i32 {
        self.seed
    }


    /// Climate at a column, both in `[0, 1]`.
    pub fn climate(&self, wx: i32, wz: i32) -> (f32, f32) {
        let (x, z) = (wx as f32, wz as f32);
        let t = (self.temperature.get_noise_2d(x, z) * 0.5 + 0.5).clamp(0.0, 1.0);
        let m = (self.humidity.get_noise_2d(x, z) * 0.5 + 0.5).clamp(0.0, 1.0);
        (t, m)
    }

    pub fn biome_at(&self, wx: i32, wz: i32) -> BiomeKind {
        let (t, m) = self.climate(wx, wz);
        BiomeKind::select(t, m)
    }

    /// Biome height offsets blended by climate distance so borders do not form cliffs.
    fn biome_offset(&self, t: f32, m: f32) -> f32 {
        let mut sum = 0.0;
        let mut weight = 0.0;
        for kind in BiomeKind::ALL {
            let d = kind.def();
            let dist2 = (d.temperature - t).powi(2) + (d.humidity - m).powi(2);
            let w = 1.0 / (dist2 * dist2 + 1e-4);
            sum += w * d.base_height as f32;
            weight += w;
        }
        sum / weight
    }

    /// Terrain surface y for a column: the y of the top block.
    pub fn surface_height(&self, wx: i32, wz: i32) -> i32 {
        let h = &self.cfg.height;
        let (x, z) = (wx as f32, wz as f32);
        let qx = x + self.warp_x.sample(x, z) * h.warp.amplitude;
        let qz = z + self.warp_z.sample(x + 5_200.0, z - 1_300.0) * h.warp.amplitude;

        let c = self.continental.sample(qx, qz);
        let hills = self.hills.sample(qx, qz);
        let ridge = 1.0 - self.ridges.sample(qx, qz).abs();
        let ridge = ridge * ridge;
        let peak = self.peaks.sample(qx, qz).max(0.0);
        let peak = peak * peak;
        // Ridges and peaks only rise where the continental layer is high.
        let mountains = smoothstep(-0.1, 0.5, c);

        let (t, m) = self.climate(wx, wz);
        let height = h.base_level
            + c * h.continental.amplitude
            + hills * h.hills.amplitude
            + ridge * h.ridges.amplitude * mountains
            + peak * h.peaks.amplitude * mountains
            + self.biome_offset(t, m);
        let lo = self.cfg.bedrock.ceiling + 2;
        (height.round() as i32).clamp(lo, SIZE_Y as i32 - 2)
    }

    /// Raw 3D cave noise, roughly `[-1, 1]`.
    pub fn cave_density(&self, wx: i32, wy: i32, wz: i32) -> f32 {
        let y = wy as f32 * self.cfg.caves.y_scale;
        let (x, z) = (wx as f32, wz as f32);
        let a = self.caves.get_noise_3d(x, y, z);
        let b = self.caves.get_noise_3d(x * 2.0 + 311.0, y * 2.0, z * 2.0 - 173.0);
        (a + 0.5 * b) / 1.5
    }

    /// Whether the voxel is carved out, given its column's surface height.
    /// Never carves inside the surface shell or within the floor margin.
    pub fn is_cave(&self, wx: i32, wy: i32, wz: i32, surface: i32) -> bool {
        let caves = &self.cfg.caves;
        if !caves.enable || wy <= caves.floor_margin || wy >= surface - self.cfg.height.surface_shell {
            return false;
        }
        let depth = (surface - wy) as f32;
        let bonus = caves.depth_bonus * (depth / caves.depth_range.max(1.0)).min(1.0);
        self.cave_density(wx, wy, wz) > caves.threshold - bonus
    }

    fn is_bedrock(&self, wx: i32, wy: i32, wz: i32) -> bool {
        if wy == 0 {
            return true;
        }
        let ceiling = self.cfg.bedrock.ceiling;
        if wy > ceiling {
            return false;
        }
        let n = self.bedrock.get_noise_3d(wx as f32, wy as f32, wz as f32) * 0.5 + 0.5;
        // Denser near the floor, thinning out towards the ceiling.
        n < 1.0 - wy as f32 / (ceiling + 1) as f32
    }

    /// Block at a voxel. Matches what [`TerrainGenerator::generate_chunk`] writes.
    pub fn block_at(&self, wx: i32, wy: i32, wz: i32) -> BlockId {
        let surface = self.surface_height(wx, wz);
        let biome = self.biome_at(wx, wz);
        self.block_in_column(wx, wy, wz, surface, biome)
    }

    fn block_in_column(&self, wx: i32, wy: i32, wz: i32, surface: i32, biome: BiomeKind) -> BlockId {
        if wy < 0 || wy > surface {
            return AIR;
        }
        if self.is_bedrock(wx, wy, wz) {
            return self.palette.bedrock;
        }
        let (top, filler) = self.palette.biome_blocks[biome as usize];
        if wy == surface {
            top
        } else if wy > surface - 1 - self.cfg.height.filler_depth {
            filler
        } else if self.is_cave(wx, wy, wz, surface) {
            AIR
        } else {
            self.palette.stone
        }
    }

    /// Fills a fresh chunk column. Light is left at zero.
    pub fn generate_chunk(&self, coord: ChunkCoord) -> VoxelGrid {
        let mut grid = VoxelGrid::new(coord);
        let (ox, _, oz) = coord.origin();
        for z in 0..SIZE_Z {
            for x in 0..SIZE_X {
                let (wx, wz) = (ox + x as i32, oz + z as i32);
                let surface = self.surface_height(wx, wz);
                let biome = self.biome_at(wx, wz);
                grid.set_biome(x, z, biome);
                for y in (0..=surface.min(SIZE_Y as i32 - 1)).rev() {
                    let id = self.block_in_column(wx, y, wz, surface, biome);
                    if id != AIR {
                        grid.set_block(x, y as usize, z, id);
                    }
                }
            }
        }
        log::trace!(target: "gen", "generated {:?}", coord);
        grid
    }
}
