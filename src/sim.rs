use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use hashbrown::HashMap;
use rayon::prelude::*;
use tessera_blocks::{AIR, BlockId, BlockRegistry};
use tessera_chunk::{ChunkCoord, VoxelGrid};
use tessera_geom::{Aabb, Vec3};
use tessera_mesh_cpu::{ChunkMesh, build_chunk_mesh};
use tessera_runtime::{ChunkManager, ChunkManagerConfig};
use tessera_world::{EntityId, World};
use tessera_worldgen::WorldGenConfig;

use crate::viewer::Viewer;

const REACH: f32 = 8.0;

#[derive(Default, Debug, Clone, Copy)]
pub struct TickStats {
    pub arrived: usize,
    pub queued: usize,
    pub edits: usize,
    pub meshed: usize,
    pub mesh_ms: f32,
}

pub struct Sim {
    pub world: World,
    pub manager: ChunkManager,
    pub viewer: Viewer,
    pub meshes: HashMap<ChunkCoord, ChunkMesh>,
    viewer_entity: EntityId,
    place_block: Option<BlockId>,
    edit_every: u32,
    tick: u32,
    dig_next: bool,
    arrived: Vec<VoxelGrid>,
    world_config_path: PathBuf,
    worldgen_rx: Option<Receiver<()>>,
}

impl Sim {
    pub fn new(
        reg: Arc<BlockRegistry>,
        worldgen: Arc<WorldGenConfig>,
        cfg: ChunkManagerConfig,
        speed: f32,
        edit_every: u32,
        world_config_path: PathBuf,
    ) -> Result<Self, Box<dyn Error>> {
        let mut world = World::new(reg.clone());
        let manager = ChunkManager::start(reg.clone(), worldgen, cfg)?;
        let viewer = Viewer::new(Vec3::new(8.5, 200.0, 8.5), speed);
        let viewer_entity = world.spawn_entity(viewer.position, Viewer::HALF_EXTENTS);
        let place_block = reg.id_by_name("glowstone");
        if place_block.is_none() {
            log::warn!("no glowstone block registered; edits will only dig");
        }
        Ok(Self {
            world,
            manager,
            viewer,
            meshes: HashMap::new(),
            viewer_entity,
            place_block,
            edit_every,
            tick: 0,
            dig_next: true,
            arrived: Vec::new(),
            world_config_path,
            worldgen_rx: None,
        })
    }

    pub fn set_worldgen_events(&mut self, rx: Receiver<()>) {
        self.worldgen_rx = Some(rx);
    }

    /// One simulation step: stream, integrate, edit, remesh.
    pub fn step(&mut self, dt: f32) -> TickStats {
        let mut stats = TickStats::default();
        self.process_worldgen_file_events();

        stats.queued = self.manager.update(self.viewer.position, &self.world);
        stats.arrived = self.manager.drain_finished(&mut self.arrived);
        for grid in self.arrived.drain(..) {
            self.world.insert_chunk(grid);
        }

        if self.tick == 0 || !self.viewer.step(dt, &self.world) {
            self.viewer.settle(&self.world);
        }
        if let Some(e) = self.world.entity_mut(self.viewer_entity) {
            e.position = self.viewer.position;
        }

        if self.edit_every > 0 && self.tick > 0 && self.tick % self.edit_every == 0 && self.edit() {
            stats.edits += 1;
        }

        let start = Instant::now();
        stats.meshed = self.remesh_dirty();
        stats.mesh_ms = start.elapsed().as_secs_f32() * 1000.0;
        self.tick += 1;
        stats
    }

    /// Alternates between digging the targeted block and placing a light
    /// against it.
    fn edit(&mut self) -> bool {
        let Some(hit) = self.world.clip(self.viewer.eye(), self.viewer.forward(), REACH) else {
            return false;
        };
        let dig = self.dig_next || self.place_block.is_none();
        self.dig_next = !self.dig_next;
        if dig {
            let (x, y, z) = hit.voxel;
            let changed = self.world.set_block(x, y, z, AIR);
            if changed {
                log::debug!("dug block {} at ({x},{y},{z})", hit.block);
            }
            return changed;
        }
        let (x, y, z) = hit.adjacent();
        let Some(id) = self.place_block else {
            return false;
        };
        let cell = Aabb::voxel(x, y, z);
        if cell.intersects(&self.viewer.aabb()) {
            return false;
        }
        let changed = self.world.set_block(x, y, z, id);
        if changed {
            log::debug!("placed light at ({x},{y},{z})");
        }
        changed
    }

    /// Rebuilds meshes for every dirty chunk in parallel. Chunks whose mesh
    /// comes back empty or whose data is gone drop their old mesh.
    fn remesh_dirty(&mut self) -> usize {
        let dirty = self.world.drain_dirty();
        if dirty.is_empty() {
            return 0;
        }
        let world = &self.world;
        let reg = world.registry().as_ref();
        let built: Vec<(ChunkCoord, Option<ChunkMesh>)> = dirty
            .par_iter()
            .map(|&coord| (coord, build_chunk_mesh(world, reg, coord)))
            .collect();
        let n = built.len();
        for (coord, mesh) in built {
            match mesh {
                Some(m) if !m.is_empty() => {
                    self.meshes.insert(coord, m);
                }
                _ => {
                    self.meshes.remove(&coord);
                }
            }
        }
        n
    }

    pub fn process_worldgen_file_events(&mut self) {
        let Some(rx) = &self.worldgen_rx else {
            return;
        };
        if rx.try_iter().count() == 0 {
            return;
        }
        let path = self.world_config_path.as_path();
        if !path.exists() {
            log::warn!("worldgen config missing: {}", path.display());
            return;
        }
        let reloaded = WorldGenConfig::load_from_path(path)
            .and_then(|cfg| self.manager.update_worldgen_config(Arc::new(cfg)));
        match reloaded {
            Ok(()) => {
                log::info!("worldgen config reloaded from {}", path.display());
                log::info!("Existing chunks unchanged; new gen uses updated params");
            }
            Err(e) => log::warn!("worldgen config reload failed ({}): {}", path.display(), e),
        }
    }

    pub fn tick(&self) -> u32 {
        self.tick
    }

    pub fn total_faces(&self) -> usize {
        self.meshes.values().map(|m| m.face_count()).sum()
    }
}

/// Sleeps off the rest of a fixed-rate tick.
pub fn pace(tick_start: Instant, rate: u32) {
    if rate == 0 {
        return;
    }
    let budget = Duration::from_secs_f64(1.0 / f64::from(rate));
    if let Some(rest) = budget.checked_sub(tick_start.elapsed()) {
        std::thread::sleep(rest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets;

    fn bundled_sim(edit_every: u32) -> Sim {
        let root = assets::resolve_assets_root(Some(env!("CARGO_MANIFEST_DIR").to_string()));
        let reg = BlockRegistry::load_from_paths(assets::textures_path(&root), assets::blocks_path(&root)).unwrap();
        let worldgen = WorldGenConfig::load_from_path(assets::worldgen_path(&root)).unwrap();
        Sim::new(
            Arc::new(reg),
            Arc::new(worldgen),
            ChunkManagerConfig {
                seed: 7,
                render_distance: 1,
                workers: Some(2),
            },
            4.0,
            edit_every,
            assets::worldgen_path(&root),
        )
        .unwrap()
    }

    fn run_until_loaded(sim: &mut Sim) {
        let deadline = Instant::now() + Duration::from_secs(60);
        while sim.world.chunk_count() < 5 || sim.manager.pending() > 0 {
            assert!(Instant::now() < deadline, "streaming timed out");
            sim.step(0.0);
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn streams_and_meshes_around_the_viewer() {
        let mut sim = bundled_sim(0);
        run_until_loaded(&mut sim);
        sim.step(0.0);
        assert_eq!(sim.world.chunk_count(), 5);
        assert!(sim.meshes.contains_key(&ChunkCoord::column(0, 0)));
        assert!(sim.total_faces() > 0);
        assert_eq!(sim.world.dirty_len(), 0);
        assert!(!sim.world.intersects_block(&sim.viewer.aabb()));
    }

    #[test]
    fn edits_alternate_dig_and_place() {
        let mut sim = bundled_sim(0);
        run_until_loaded(&mut sim);
        let stone = sim.world.registry().id_by_name("stone").unwrap();
        let glow = sim.world.registry().id_by_name("glowstone").unwrap();

        // Look straight along +X at a stone four blocks ahead of the eye.
        sim.viewer.pitch = 0.0;
        let (ex, ey, ez) = sim.viewer.eye().voxel();
        for dx in 1..=3 {
            sim.world.set_block(ex + dx, ey, ez, AIR);
        }
        assert!(sim.world.set_block(ex + 4, ey, ez, stone));

        assert!(sim.edit());
        assert_eq!(sim.world.block_at(ex + 4, ey, ez), Some(AIR));
        assert!(sim.world.dirty_len() > 0);

        assert!(sim.world.set_block(ex + 4, ey, ez, stone));
        assert!(sim.edit());
        assert_eq!(sim.world.block_at(ex + 3, ey, ez), Some(glow));
        assert!(!sim.world.combined_light_at(ex + 2, ey, ez).unwrap().is_dark());

        // Back to digging: the ray now stops at the placed light.
        assert!(sim.edit());
        assert_eq!(sim.world.block_at(ex + 3, ey, ez), Some(AIR));
    }
}
