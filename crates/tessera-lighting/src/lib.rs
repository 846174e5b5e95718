//! Sky and colored block light: full per-chunk rebuild, border stitching, and incremental edits.
#![forbid(unsafe_code)]

use std::collections::VecDeque;

use hashbrown::{HashMap, HashSet};
use tessera_blocks::{BlockId, BlockRegistry};
use tessera_chunk::{ChunkCoord, LightRgb, MAX_LIGHT, SIZE_X, SIZE_Y, SIZE_Z, VoxelGrid, locate};
use tessera_geom::Face;

mod update;

pub use update::update_from;

/// Chunks whose light changed during an operation. Callers mark each one dirty once.
pub type TouchedChunks = HashSet<ChunkCoord>;

pub(crate) type Pos = (i32, i32, i32);

/// Chunk lookup used by the propagation passes. Unloaded chunks return `None`
/// and propagation stops at their boundary.
pub trait ChunkAccess {
    fn chunk(&self, coord: ChunkCoord) -> Option<&VoxelGrid>;
    fn chunk_mut(&mut self, coord: ChunkCoord) -> Option<&mut VoxelGrid>;
}

impl ChunkAccess for HashMap<ChunkCoord, VoxelGrid> {
    #[inline]
    fn chunk(&self, coord: ChunkCoord) -> Option<&VoxelGrid> {
        self.get(&coord)
    }

    #[inline]
    fn chunk_mut(&mut self, coord: ChunkCoord) -> Option<&mut VoxelGrid> {
        self.get_mut(&coord)
    }
}

/// A lone grid sees only itself; everything outside is unloaded.
impl ChunkAccess for VoxelGrid {
    #[inline]
    fn chunk(&self, coord: ChunkCoord) -> Option<&VoxelGrid> {
        (self.coord == coord).then_some(self)
    }

    #[inline]
    fn chunk_mut(&mut self, coord: ChunkCoord) -> Option<&mut VoxelGrid> {
        if self.coord == coord { Some(self) } else { None }
    }
}

/// Block light a voxel of `id` emits: `emission * color / 255` per channel, clamped to 15.
pub fn emitter_light(reg: &BlockRegistry, id: BlockId) -> LightRgb {
    let e = u32::from(reg.emission(id));
    if e == 0 {
        return LightRgb::ZERO;
    }
    let [r, g, b] = reg.light_color(id);
    let ch = |c: u8| (e * u32::from(c) / 255).min(u32::from(MAX_LIGHT)) as u8;
    LightRgb::new(ch(r), ch(g), ch(b))
}

/// Next sky level when light leaves a voxel through `face`. Full sunlight falls
/// straight down without decay; every other step loses one level.
#[inline]
pub(crate) fn sky_step(level: u8, face: Face) -> u8 {
    if face == Face::Down && level == MAX_LIGHT {
        MAX_LIGHT
    } else {
        level.saturating_sub(1)
    }
}

#[inline]
pub(crate) fn step(p: Pos, face: Face) -> Pos {
    let (dx, dy, dz) = face.delta();
    (p.0 + dx, p.1 + dy, p.2 + dz)
}

#[inline]
pub(crate) fn block_id_at<A: ChunkAccess + ?Sized>(a: &A, p: Pos) -> Option<BlockId> {
    let (c, x, y, z) = locate(p.0, p.1, p.2)?;
    a.chunk(c).map(|g| g.block(x, y, z))
}

#[inline]
pub(crate) fn sky_at<A: ChunkAccess + ?Sized>(a: &A, p: Pos) -> Option<u8> {
    let (c, x, y, z) = locate(p.0, p.1, p.2)?;
    a.chunk(c).map(|g| g.sky_light(x, y, z))
}

#[inline]
pub(crate) fn block_light_at<A: ChunkAccess + ?Sized>(a: &A, p: Pos) -> Option<LightRgb> {
    let (c, x, y, z) = locate(p.0, p.1, p.2)?;
    a.chunk(c).map(|g| g.block_light(x, y, z))
}

pub(crate) fn set_sky<A: ChunkAccess + ?Sized>(a: &mut A, p: Pos, level: u8, touched: &mut TouchedChunks) {
    let Some((c, x, y, z)) = locate(p.0, p.1, p.2) else {
        return;
    };
    if let Some(g) = a.chunk_mut(c) {
        g.set_sky_light(x, y, z, level);
        touched.insert(c);
    }
}

pub(crate) fn set_block_light<A: ChunkAccess + ?Sized>(
    a: &mut A,
    p: Pos,
    light: LightRgb,
    touched: &mut TouchedChunks,
) {
    let Some((c, x, y, z)) = locate(p.0, p.1, p.2) else {
        return;
    };
    if let Some(g) = a.chunk_mut(c) {
        g.set_block_light(x, y, z, light);
        touched.insert(c);
    }
}

/// Flood sky light outward from every queued voxel, keeping the larger of the
/// existing and propagated level. Solid voxels never receive sky light.
pub(crate) fn propagate_sky<A: ChunkAccess + ?Sized>(
    a: &mut A,
    reg: &BlockRegistry,
    queue: &mut VecDeque<Pos>,
    touched: &mut TouchedChunks,
) {
    while let Some(p) = queue.pop_front() {
        let Some(level) = sky_at(a, p) else { continue };
        if level <= 1 {
            continue;
        }
        for face in Face::ALL {
            let n = step(p, face);
            let Some((c, x, y, z)) = locate(n.0, n.1, n.2) else {
                continue;
            };
            let Some(g) = a.chunk_mut(c) else { continue };
            if reg.is_solid(g.block(x, y, z)) {
                continue;
            }
            let nl = sky_step(level, face);
            if nl > g.sky_light(x, y, z) {
                g.set_sky_light(x, y, z, nl);
                touched.insert(c);
                queue.push_back(n);
            }
        }
    }
}

/// Per-channel block light flood; each step loses one level in every direction.
pub(crate) fn propagate_block<A: ChunkAccess + ?Sized>(
    a: &mut A,
    reg: &BlockRegistry,
    queue: &mut VecDeque<Pos>,
    touched: &mut TouchedChunks,
) {
    while let Some(p) = queue.pop_front() {
        let Some(light) = block_light_at(a, p) else { continue };
        if light.r <= 1 && light.g <= 1 && light.b <= 1 {
            continue;
        }
        let next = LightRgb::new(
            light.r.saturating_sub(1),
            light.g.saturating_sub(1),
            light.b.saturating_sub(1),
        );
        for face in Face::ALL {
            let n = step(p, face);
            let Some((c, x, y, z)) = locate(n.0, n.1, n.2) else {
                continue;
            };
            let Some(g) = a.chunk_mut(c) else { continue };
            if reg.is_solid(g.block(x, y, z)) {
                continue;
            }
            let cur = g.block_light(x, y, z);
            let merged = cur.max(next);
            if merged != cur {
                g.set_block_light(x, y, z, merged);
                touched.insert(c);
                queue.push_back(n);
            }
        }
    }
}

/// Recomputes all light inside `grid` from scratch, treating everything outside
/// the chunk as unloaded. Use [`stitch_chunk_borders`] afterwards to exchange
/// light with loaded neighbors.
pub fn rebuild_chunk(grid: &mut VoxelGrid, reg: &BlockRegistry) {
    grid.clear_light();
    let (ox, _, oz) = grid.coord.origin();

    // Lowest directly sunlit y per column; SIZE_Y when the top voxel is solid.
    let mut lit_floor = vec![SIZE_Y; SIZE_X * SIZE_Z];
    for z in 0..SIZE_Z {
        for x in 0..SIZE_X {
            for y in (0..SIZE_Y).rev() {
                if reg.is_solid(grid.block(x, y, z)) {
                    break;
                }
                grid.set_sky_light(x, y, z, MAX_LIGHT);
                lit_floor[z * SIZE_X + x] = y;
            }
        }
    }

    // Only sunlit voxels beside a darker neighbor column can spread further.
    let mut sky_queue = VecDeque::new();
    for z in 0..SIZE_Z {
        for x in 0..SIZE_X {
            let floor = lit_floor[z * SIZE_X + x];
            let mut deepest = floor;
            let neighbors = [
                (x.wrapping_sub(1), z),
                (x + 1, z),
                (x, z.wrapping_sub(1)),
                (x, z + 1),
            ];
            for (nx, nz) in neighbors {
                if nx < SIZE_X && nz < SIZE_Z {
                    deepest = deepest.max(lit_floor[nz * SIZE_X + nx]);
                }
            }
            for y in floor..deepest.min(SIZE_Y) {
                sky_queue.push_back((ox + x as i32, y as i32, oz + z as i32));
            }
        }
    }

    let mut block_queue = VecDeque::new();
    for y in 0..SIZE_Y {
        for z in 0..SIZE_Z {
            for x in 0..SIZE_X {
                let light = emitter_light(reg, grid.block(x, y, z));
                if !light.is_dark() {
                    grid.set_block_light(x, y, z, light);
                    block_queue.push_back((ox + x as i32, y as i32, oz + z as i32));
                }
            }
        }
    }
    let emitters = block_queue.len();

    let mut touched = TouchedChunks::new();
    propagate_sky(grid, reg, &mut sky_queue, &mut touched);
    propagate_block(grid, reg, &mut block_queue, &mut touched);
    log::trace!(target: "light", "rebuilt {:?} ({} emitters)", grid.coord, emitters);
}

/// Exchanges light across the four vertical faces between `coord` and each loaded
/// neighbor. Light only increases here, so chunks lit in isolation converge to
/// the same values a joint rebuild would produce.
pub fn stitch_chunk_borders<A: ChunkAccess + ?Sized>(
    a: &mut A,
    reg: &BlockRegistry,
    coord: ChunkCoord,
) -> TouchedChunks {
    let mut touched = TouchedChunks::new();
    if a.chunk(coord).is_none() {
        return touched;
    }
    let (ox, _, oz) = coord.origin();
    let sx = SIZE_X as i32;
    let sz = SIZE_Z as i32;
    let mut sky_queue = VecDeque::new();
    let mut block_queue = VecDeque::new();
    for n in coord.horizontal_neighbors() {
        if a.chunk(n).is_none() {
            continue;
        }
        // (inside, outside) local offsets along the shared face.
        let pairs: Vec<(Pos, Pos)> = match (n.cx - coord.cx, n.cz - coord.cz) {
            (1, 0) => (0..sz).map(|z| ((sx - 1, 0, z), (sx, 0, z))).collect(),
            (-1, 0) => (0..sz).map(|z| ((0, 0, z), (-1, 0, z))).collect(),
            (0, 1) => (0..sx).map(|x| ((x, 0, sz - 1), (x, 0, sz))).collect(),
            _ => (0..sx).map(|x| ((x, 0, 0), (x, 0, -1))).collect(),
        };
        for y in 0..SIZE_Y as i32 {
            for &(inside, outside) in &pairs {
                for local in [inside, outside] {
                    let p = (ox + local.0, y, oz + local.2);
                    if sky_at(a, p).is_some_and(|l| l > 1) {
                        sky_queue.push_back(p);
                    }
                    if block_light_at(a, p).is_some_and(|l| l.r > 1 || l.g > 1 || l.b > 1) {
                        block_queue.push_back(p);
                    }
                }
            }
        }
    }
    propagate_sky(a, reg, &mut sky_queue, &mut touched);
    propagate_block(a, reg, &mut block_queue, &mut touched);
    touched
}

#[cfg(test)]
mod tests;
