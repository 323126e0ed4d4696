use std::hash::BuildHasherDefault;
use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::RwLock;
use rustc_hash::FxHasher;
use strata_core::{Chunk, ChunkPos, ChunkState};
use strata_worldgen_core::ChunkView;

/// An error returned by the [`ChunkStore`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No chunk is stored at this position.
    #[error("chunk {0} is not in the store")]
    MissingChunk(ChunkPos),
    /// A chunk is already stored at this position.
    #[error("chunk {0} is already in the store")]
    AlreadyPresent(ChunkPos),
    /// The position is outside of the generated world.
    #[error("chunk {0} is outside of the generated world")]
    OutOfBounds(ChunkPos),
}

/// A shared collection of chunks, each behind its own lock.
///
/// # Locking
///
/// Building a [`ChunkView`] requires locking a whole ring of chunks at once. Chunks are always
/// locked in ascending [`ChunkPos`] order, which prevents two threads decorating overlapping
/// rings from deadlocking.
#[derive(Default)]
pub struct ChunkStore {
    chunks: RwLock<HashMap<ChunkPos, Arc<RwLock<Chunk>>, BuildHasherDefault<FxHasher>>>,
}

impl ChunkStore {
    /// Creates a new empty [`ChunkStore`].
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a chunk into the store.
    ///
    /// # Errors
    ///
    /// Chunks are never replaced: if a chunk is already stored at the same position, the store
    /// is left unchanged and [`StoreError::AlreadyPresent`] is returned.
    pub fn insert(&self, chunk: Chunk) -> Result<(), StoreError> {
        let pos = chunk.pos();
        match self.chunks.write().entry(pos) {
            hashbrown::hash_map::Entry::Occupied(_) => Err(StoreError::AlreadyPresent(pos)),
            hashbrown::hash_map::Entry::Vacant(e) => {
                e.insert(Arc::new(RwLock::new(chunk)));
                Ok(())
            }
        }
    }

    /// Returns the chunk stored at `pos`.
    #[inline]
    pub fn get(&self, pos: ChunkPos) -> Option<Arc<RwLock<Chunk>>> {
        self.chunks.read().get(&pos).cloned()
    }

    /// Whether a chunk is stored at `pos`.
    #[inline]
    pub fn contains(&self, pos: ChunkPos) -> bool {
        self.chunks.read().contains_key(&pos)
    }

    /// Returns the state of the chunk stored at `pos`.
    pub fn state(&self, pos: ChunkPos) -> Option<ChunkState> {
        self.get(pos).map(|c| c.read().state())
    }

    /// Returns a copy of the chunk stored at `pos`.
    pub fn snapshot(&self, pos: ChunkPos) -> Option<Chunk> {
        self.get(pos).map(|c| c.read().clone())
    }

    /// Whether every chunk within `radius` of `center` is stored and went through the first pass.
    pub fn is_ring_generated(&self, center: ChunkPos, radius: u32) -> bool {
        let map = self.chunks.read();
        center.iter_ring(radius).all(|pos| {
            map.get(&pos)
                .is_some_and(|c| c.read().state() != ChunkState::Empty)
        })
    }

    /// Returns the number of stored chunks.
    #[inline]
    pub fn len(&self) -> usize {
        self.chunks.read().len()
    }

    /// Whether the store contains no chunk.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chunks.read().is_empty()
    }

    /// Returns the positions of every stored chunk, in ascending order.
    pub fn positions(&self) -> Vec<ChunkPos> {
        let mut ret: Vec<ChunkPos> = self.chunks.read().keys().copied().collect();
        ret.sort_unstable();
        ret
    }

    /// Locks the chunk at `center` for writing and its ring of neighbors for reading, then calls
    /// `f` with a [`ChunkView`] over them.
    ///
    /// # Errors
    ///
    /// Fails with [`StoreError::MissingChunk`] if any chunk of the ring is not stored, and with
    /// [`StoreError::OutOfBounds`] if `center` is not in bounds (see [`ChunkPos::is_in_bounds`]).
    /// Nothing is locked in either case.
    #[profiling::function]
    pub fn with_view<R>(
        &self,
        center: ChunkPos,
        radius: u32,
        f: impl FnOnce(&mut ChunkView) -> R,
    ) -> Result<R, StoreError> {
        if !center.is_in_bounds() {
            return Err(StoreError::OutOfBounds(center));
        }

        // Collect the handles first so that the map itself is not locked while waiting on chunks.
        let ring = {
            let map = self.chunks.read();
            center
                .iter_ring(radius)
                .map(|pos| map.get(&pos).cloned().ok_or(StoreError::MissingChunk(pos)))
                .collect::<Result<Vec<_>, _>>()?
        };

        // `iter_ring` yields positions in ascending order, and the target sits in the middle.
        let split = ring.len() / 2;
        let before = ring[..split].iter().map(|c| c.read_arc()).collect::<Vec<_>>();
        let mut target = ring[split].write_arc();
        let after = ring[split + 1..].iter().map(|c| c.read_arc()).collect::<Vec<_>>();

        let mut view = ChunkView::new(&mut target, radius);
        for neighbor in before.iter().chain(after.iter()) {
            view.insert_neighbor(neighbor);
        }

        Ok(f(&mut view))
    }

    /// Hints the store that chunks far from `center` are unlikely to be used anymore, and can
    /// therefore be unloaded.
    #[profiling::function]
    pub fn request_cleanup(&self, center: ChunkPos, h_radius: u32, v_radius: u32) {
        let mut guard = self.chunks.write();
        let before = guard.len();
        guard.retain(|pos, _| {
            pos.horizontal_distance(center) <= h_radius && pos.y.abs_diff(center.y) <= v_radius
        });
        log::debug!("unloaded {} chunks around {center}", before - guard.len());
    }
}
