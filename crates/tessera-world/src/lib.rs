//! Loaded chunk index, dirty tracking, entities, and world-space queries.
#![forbid(unsafe_code)]

use std::sync::{Arc, Mutex};

use hashbrown::HashMap;
use tessera_blocks::{BlockId, BlockRegistry};
use tessera_chunk::{ChunkCoord, LightRgb, SIZE_X, SIZE_Y, SIZE_Z, VoxelGrid, chunk_of, locate};
use tessera_geom::{Aabb, Vec3};
use tessera_lighting::{TouchedChunks, stitch_chunk_borders, update_from};

mod dirty;
mod entity;
mod raycast;

use dirty::DirtyQueue;
pub use entity::{Entity, EntityId};
pub use raycast::{CLIP_STEP, RayHit};

/// Sparse map of loaded chunks plus the bookkeeping around them.
///
/// Only one thread mutates a `World`: generated chunks arrive through
/// [`World::insert_chunk`] and edits through [`World::set_block`]. The dirty
/// queue sits behind its own lock so a render thread can drain it through a
/// shared reference.
pub struct World {
    chunks: HashMap<ChunkCoord, VoxelGrid>,
    dirty: Mutex<DirtyQueue>,
    entities: Vec<Entity>,
    next_entity: u64,
    reg: Arc<BlockRegistry>,
}

impl World {
    pub fn new(reg: Arc<BlockRegistry>) -> Self {
        Self {
            chunks: HashMap::new(),
            dirty: Mutex::new(DirtyQueue::default()),
            entities: Vec::new(),
            next_entity: 1,
            reg,
        }
    }

    #[inline]
    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.reg
    }

    #[inline]
    pub fn has_chunk(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    #[inline]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&VoxelGrid> {
        self.chunks.get(&coord)
    }

    #[inline]
    pub fn chunk_mut(&mut self, coord: ChunkCoord) -> Option<&mut VoxelGrid> {
        self.chunks.get_mut(&coord)
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn loaded_chunks(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.chunks.keys().copied()
    }

    /// Returns the chunk at `coord`, inserting an empty unlit one if absent.
    /// An existing chunk is returned untouched.
    pub fn create_chunk(&mut self, coord: ChunkCoord) -> &mut VoxelGrid {
        self.chunks.entry(coord).or_insert_with(|| {
            log::debug!("created empty chunk {:?}", coord);
            VoxelGrid::new(coord)
        })
    }

    /// Admits a generated, already-lit chunk. Light is exchanged with loaded
    /// neighbors and every chunk whose mesh may have changed is marked dirty.
    pub fn insert_chunk(&mut self, grid: VoxelGrid) {
        let coord = grid.coord;
        if self.chunks.insert(coord, grid).is_some() {
            log::warn!("replaced already loaded chunk {:?}", coord);
        }
        let touched = stitch_chunk_borders(&mut self.chunks, &self.reg, coord);
        self.mark_dirty(coord);
        for n in coord.horizontal_neighbors() {
            if self.has_chunk(n) {
                self.mark_dirty(n);
            }
        }
        self.mark_touched(&touched);
        log::debug!(
            "inserted chunk {:?}; {} loaded, {} relit by stitching",
            coord,
            self.chunks.len(),
            touched.len()
        );
    }

    /// Queues the chunk containing the given world voxel for remeshing.
    pub fn mark_chunk_dirty(&self, wx: i32, wy: i32, wz: i32) {
        self.mark_dirty(chunk_of(wx, wy, wz));
    }

    pub fn mark_dirty(&self, coord: ChunkCoord) {
        self.dirty.lock().unwrap().push(coord);
    }

    fn mark_touched(&self, touched: &TouchedChunks) {
        let mut dirty = self.dirty.lock().unwrap();
        for &c in touched {
            dirty.push(c);
        }
    }

    /// Empties the dirty queue in the order chunks were marked.
    pub fn drain_dirty(&self) -> Vec<ChunkCoord> {
        self.dirty.lock().unwrap().drain()
    }

    pub fn pop_dirty(&self) -> Option<ChunkCoord> {
        self.dirty.lock().unwrap().pop()
    }

    pub fn dirty_len(&self) -> usize {
        self.dirty.lock().unwrap().len()
    }

    /// Block at a world voxel, or `None` when its chunk is not loaded or `wy`
    /// is outside the world.
    pub fn block_at(&self, wx: i32, wy: i32, wz: i32) -> Option<BlockId> {
        let (c, x, y, z) = locate(wx, wy, wz)?;
        self.chunks.get(&c).map(|g| g.block(x, y, z))
    }

    pub fn combined_light_at(&self, wx: i32, wy: i32, wz: i32) -> Option<LightRgb> {
        let (c, x, y, z) = locate(wx, wy, wz)?;
        self.chunks.get(&c).map(|g| g.combined_light(x, y, z))
    }

    /// Collision view of a voxel. Unloaded chunks and everything below the
    /// world floor count as solid so nothing falls out of the world; above the
    /// build limit is open air.
    pub fn is_solid_at(&self, wx: i32, wy: i32, wz: i32) -> bool {
        if wy < 0 {
            return true;
        }
        if wy >= SIZE_Y as i32 {
            return false;
        }
        match self.block_at(wx, wy, wz) {
            Some(id) => self.reg.is_solid(id),
            None => true,
        }
    }

    /// Writes a block and relights around it. Returns `false` (and changes
    /// nothing) when the voxel's chunk is not loaded.
    pub fn set_block(&mut self, wx: i32, wy: i32, wz: i32, id: BlockId) -> bool {
        let Some((coord, x, y, z)) = locate(wx, wy, wz) else {
            return false;
        };
        let Some(grid) = self.chunks.get_mut(&coord) else {
            return false;
        };
        grid.set_block(x, y, z, id);

        let touched = update_from(&mut self.chunks, &self.reg, wx, wy, wz);
        self.mark_dirty(coord);
        // Faces on the shared border of a neighbor depend on this voxel.
        let mut border = Vec::with_capacity(2);
        if x == 0 {
            border.push(coord.offset(-1, 0, 0));
        } else if x == SIZE_X - 1 {
            border.push(coord.offset(1, 0, 0));
        }
        if z == 0 {
            border.push(coord.offset(0, 0, -1));
        } else if z == SIZE_Z - 1 {
            border.push(coord.offset(0, 0, 1));
        }
        for n in border {
            if self.has_chunk(n) {
                self.mark_dirty(n);
            }
        }
        self.mark_touched(&touched);
        true
    }

    /// True when `aabb` overlaps any solid voxel, using the collision view of
    /// [`World::is_solid_at`].
    pub fn intersects_block(&self, aabb: &Aabb) -> bool {
        let (lo, hi) = aabb.voxel_range();
        for y in lo.1..=hi.1 {
            for z in lo.2..=hi.2 {
                for x in lo.0..=hi.0 {
                    if self.is_solid_at(x, y, z) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// First solid, loaded voxel along a ray within `max_distance`. Unloaded
    /// chunks are passed through since they cannot be edited.
    pub fn clip(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        raycast::march(origin, direction, max_distance, |x, y, z| {
            self.block_at(x, y, z).filter(|&id| self.reg.is_solid(id))
        })
    }

    pub fn spawn_entity(&mut self, position: Vec3, half_extents: Vec3) -> EntityId {
        let id = EntityId(self.next_entity);
        self.next_entity += 1;
        self.entities.push(Entity {
            id,
            position,
            half_extents,
        });
        id
    }

    pub fn despawn_entity(&mut self, id: EntityId) -> Option<Entity> {
        let idx = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.swap_remove(idx))
    }

    #[inline]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }
}
