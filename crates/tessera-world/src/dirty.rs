use std::collections::VecDeque;

use hashbrown::HashSet;
use tessera_chunk::ChunkCoord;

/// FIFO of chunks awaiting a remesh. A coordinate is queued at most once at a time.
#[derive(Default, Debug)]
pub(crate) struct DirtyQueue {
    order: VecDeque<ChunkCoord>,
    queued: HashSet<ChunkCoord>,
}

impl DirtyQueue {
    pub(crate) fn push(&mut self, coord: ChunkCoord) -> bool {
        if !self.queued.insert(coord) {
            return false;
        }
        self.order.push_back(coord);
        true
    }

    pub(crate) fn pop(&mut self) -> Option<ChunkCoord> {
        let c = self.order.pop_front()?;
        self.queued.remove(&c);
        Some(c)
    }

    pub(crate) fn drain(&mut self) -> Vec<ChunkCoord> {
        self.queued.clear();
        self.order.drain(..).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }
}
