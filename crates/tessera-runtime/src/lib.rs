//! Background chunk generation: a prioritized worker pool feeding a single-writer world.
#![forbid(unsafe_code)]

mod scheduler;

use std::error::Error;
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, unbounded};
use tessera_blocks::BlockRegistry;
use tessera_chunk::{ChunkCoord, VoxelGrid, chunk_of};
use tessera_geom::Vec3;
use tessera_lighting::rebuild_chunk;
use tessera_world::World;
use tessera_worldgen::{Palette, TerrainGenerator, WorldGenConfig};

pub use scheduler::GenerationTask;
use scheduler::{Scheduler, Shared};

/// Workers to start for a machine with `hint` hardware threads: half of what
/// is left after reserving two for the main and render threads, at least one.
/// Upper bound on the streaming radius, in chunks.
pub const MAX_RENDER_DISTANCE: i32 = 512;

pub fn default_worker_count(hint: usize) -> usize {
    (hint.saturating_sub(2).max(1) / 2).max(1)
}

#[derive(Clone, Debug)]
pub struct ChunkManagerConfig {
    pub seed: i32,
    /// Streaming radius in chunks (circular on the XZ plane).
    pub render_distance: i32,
    /// Overrides [`default_worker_count`] when set.
    pub workers: Option<usize>,
}

/// Generates chunks around a moving viewer on a fixed pool of threads.
///
/// Workers never touch the [`World`]. Finished, already-lit chunks wait in a
/// handoff channel until the owner calls [`ChunkManager::drain_finished`] and
/// inserts them.
pub struct ChunkManager {
    shared: Shared,
    results: Receiver<VoxelGrid>,
    workers: Vec<JoinHandle<()>>,
    reg: Arc<BlockRegistry>,
    render_distance: i32,
    last_center: Option<ChunkCoord>,
}

impl ChunkManager {
    /// Resolves the terrain palette and spawns the worker threads.
    pub fn start(
        reg: Arc<BlockRegistry>,
        worldgen: Arc<WorldGenConfig>,
        cfg: ChunkManagerConfig,
    ) -> Result<Self, Box<dyn Error>> {
        let palette = Palette::resolve(&worldgen, &reg)?;
        let count = cfg.workers.unwrap_or_else(|| {
            let hint = thread::available_parallelism().map(|n| n.get()).unwrap_or(4);
            default_worker_count(hint)
        });
        let count = count.max(1);
        let shared: Shared = Arc::new((
            Mutex::new(Scheduler::new(worldgen.clone(), palette.clone())),
            Condvar::new(),
        ));
        let (tx, results) = unbounded::<VoxelGrid>();

        let mut workers = Vec::with_capacity(count);
        for i in 0..count {
            let shared = shared.clone();
            let tx = tx.clone();
            let reg = reg.clone();
            let generator = TerrainGenerator::new(cfg.seed, worldgen.clone(), palette.clone());
            let handle = thread::Builder::new()
                .name(format!("tessera-gen-{i}"))
                .spawn(move || worker_loop(shared, tx, reg, generator))?;
            workers.push(handle);
        }
        let render_distance = cfg.render_distance.clamp(0, MAX_RENDER_DISTANCE);
        if render_distance != cfg.render_distance {
            log::warn!(
                "render distance {} clamped to {}",
                cfg.render_distance,
                render_distance
            );
        }
        log::info!(
            "chunk manager started: {} workers, render distance {}",
            count,
            render_distance
        );
        Ok(Self {
            shared,
            results,
            workers,
            reg,
            render_distance,
            last_center: None,
        })
    }

    #[inline]
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    #[inline]
    pub fn render_distance(&self) -> i32 {
        self.render_distance
    }

    /// Queues every missing column within the render distance of the viewer's
    /// chunk. Does nothing while the viewer stays in the same chunk. Returns
    /// the number of newly queued chunks.
    pub fn update(&mut self, viewer: Vec3, world: &World) -> usize {
        let (wx, _, wz) = viewer.voxel();
        let center = chunk_of(wx, 0, wz);
        if self.last_center == Some(center) {
            return 0;
        }
        self.last_center = Some(center);

        let r = self.render_distance;
        let (lock, cvar) = &*self.shared;
        let mut s = lock.lock().unwrap();
        s.recenter(center);
        let mut queued = 0;
        for dz in -r..=r {
            for dx in -r..=r {
                let d2 = dx * dx + dz * dz;
                if d2 > r * r {
                    continue;
                }
                let coord = center.offset(dx, 0, dz);
                if world.has_chunk(coord) || s.in_flight.contains(&coord) {
                    continue;
                }
                s.push(coord, -d2);
                queued += 1;
            }
        }
        drop(s);
        if queued > 0 {
            cvar.notify_all();
            log::debug!(target: "gen", "queued {} chunks around {:?}", queued, center);
        }
        queued
    }

    /// Moves every finished chunk into `out`. Returns how many were moved.
    pub fn drain_finished(&mut self, out: &mut Vec<VoxelGrid>) -> usize {
        let start = out.len();
        out.extend(self.results.try_iter());
        self.release(&out[start..]);
        out.len() - start
    }

    /// Like [`ChunkManager::drain_finished`], but waits up to `timeout` for the
    /// first chunk when none is ready.
    pub fn drain_finished_timeout(&mut self, out: &mut Vec<VoxelGrid>, timeout: Duration) -> usize {
        let start = out.len();
        match self.results.recv_timeout(timeout) {
            Ok(grid) => out.push(grid),
            Err(_) => return 0,
        }
        out.extend(self.results.try_iter());
        self.release(&out[start..]);
        out.len() - start
    }

    fn release(&self, grids: &[VoxelGrid]) {
        if grids.is_empty() {
            return;
        }
        let mut s = self.shared.0.lock().unwrap();
        for g in grids {
            s.in_flight.remove(&g.coord);
        }
    }

    /// Chunks requested but not yet drained: queued, generating, or finished.
    pub fn pending(&self) -> usize {
        self.shared.0.lock().unwrap().in_flight.len()
    }

    /// Chunks still waiting for a worker.
    pub fn queued(&self) -> usize {
        self.shared.0.lock().unwrap().heap.len()
    }

    /// Swaps in new terrain parameters. Chunks generated from now on use them;
    /// chunks already loaded or mid-generation are unaffected.
    pub fn update_worldgen_config(&self, worldgen: Arc<WorldGenConfig>) -> Result<(), Box<dyn Error>> {
        let palette = Palette::resolve(&worldgen, &self.reg)?;
        let mut s = self.shared.0.lock().unwrap();
        s.set_worldgen(worldgen, palette);
        log::info!("worldgen config updated (version {})", s.version);
        Ok(())
    }

    /// Stops all workers and waits for them to exit. Queued tasks are dropped.
    pub fn shutdown(&mut self) {
        if self.workers.is_empty() {
            return;
        }
        {
            let (lock, cvar) = &*self.shared;
            lock.lock().unwrap().shutdown = true;
            cvar.notify_all();
        }
        for handle in self.workers.drain(..) {
            let name = handle.thread().name().unwrap_or("worker").to_string();
            if handle.join().is_err() {
                log::error!("{name} panicked");
            }
        }
        log::info!("chunk manager stopped");
    }
}

impl Drop for ChunkManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(shared: Shared, tx: Sender<VoxelGrid>, reg: Arc<BlockRegistry>, mut generator: TerrainGenerator) {
    let mut version = 0u64;
    loop {
        let (task, reload) = {
            let (lock, cvar) = &*shared;
            let mut s = lock.lock().unwrap();
            while s.heap.is_empty() && !s.shutdown {
                s = cvar.wait(s).unwrap();
            }
            if s.shutdown {
                break;
            }
            let Some(task) = s.heap.pop() else { continue };
            let reload = (s.version != version).then(|| (s.version, s.worldgen.clone(), s.palette.clone()));
            (task, reload)
        };
        if let Some((v, cfg, palette)) = reload {
            generator = TerrainGenerator::new(generator.seed(), cfg, palette);
            version = v;
        }
        let mut grid = generator.generate_chunk(task.coord);
        rebuild_chunk(&mut grid, &reg);
        if tx.send(grid).is_err() {
            break;
        }
    }
    log::debug!(target: "gen", "{} exiting", thread::current().name().unwrap_or("worker"));
}
