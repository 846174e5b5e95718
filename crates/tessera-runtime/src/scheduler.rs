use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::{Arc, Condvar, Mutex};

use hashbrown::HashSet;
use tessera_chunk::ChunkCoord;
use tessera_worldgen::{Palette, WorldGenConfig};

/// A chunk waiting to be generated. Larger `priority` pops first; equal
/// priorities pop in submission order.
#[derive(Clone, Copy, Debug)]
pub struct GenerationTask {
    pub coord: ChunkCoord,
    pub priority: i32,
    pub seq: u64,
}

impl PartialEq for GenerationTask {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl Eq for GenerationTask {}

impl PartialOrd for GenerationTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GenerationTask {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Work queue and in-flight set share one lock so "already requested?" and
/// "enqueue" happen atomically.
pub(crate) struct Scheduler {
    pub(crate) heap: BinaryHeap<GenerationTask>,
    /// Requested and not yet drained by the owner.
    pub(crate) in_flight: HashSet<ChunkCoord>,
    pub(crate) next_seq: u64,
    pub(crate) shutdown: bool,
    pub(crate) version: u64,
    pub(crate) worldgen: Arc<WorldGenConfig>,
    pub(crate) palette: Palette,
}

pub(crate) type Shared = Arc<(Mutex<Scheduler>, Condvar)>;

impl Scheduler {
    pub(crate) fn new(worldgen: Arc<WorldGenConfig>, palette: Palette) -> Self {
        Self {
            heap: BinaryHeap::new(),
            in_flight: HashSet::new(),
            next_seq: 0,
            shutdown: false,
            version: 0,
            worldgen,
            palette,
        }
    }

    pub(crate) fn push(&mut self, coord: ChunkCoord, priority: i32) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.in_flight.insert(coord);
        self.heap.push(GenerationTask { coord, priority, seq });
    }

    /// Re-scores queued tasks against a new viewer chunk.
    pub(crate) fn recenter(&mut self, center: ChunkCoord) {
        if self.heap.is_empty() {
            return;
        }
        let tasks = std::mem::take(&mut self.heap).into_vec();
        self.heap = tasks
            .into_iter()
            .map(|mut t| {
                t.priority = -(t.coord.planar_distance_sq(center).min(i64::from(i32::MAX)) as i32);
                t
            })
            .collect();
    }

    pub(crate) fn set_worldgen(&mut self, worldgen: Arc<WorldGenConfig>, palette: Palette) {
        self.worldgen = worldgen;
        self.palette = palette;
        self.version += 1;
    }
}
