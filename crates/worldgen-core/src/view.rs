use glam::IVec3;
use strata_core::utility::chunk_and_local_pos;
use strata_core::{BlockId, Chunk, ChunkPos};

/// A window over a target chunk and the ring of chunks around it.
///
/// The target chunk is borrowed mutably and neighbors immutably: writes made through a view can
/// only ever land in the target chunk.
///
/// # Layout
///
/// The ring is a cube of `2 * radius + 1` chunks per side, centered on the target. Neighbors are
/// attached one by one with [`ChunkView::insert_neighbor`].
pub struct ChunkView<'a> {
    /// The chunk being decorated.
    target: &'a mut Chunk,
    /// The radius of the ring, in chunks.
    radius: u32,
    /// One slot per chunk of the ring. The slot of the target is always `None`.
    neighbors: Vec<Option<&'a Chunk>>,
}

impl<'a> ChunkView<'a> {
    /// Creates a new [`ChunkView`] centered on `target`, with no neighbor attached yet.
    pub fn new(target: &'a mut Chunk, radius: u32) -> Self {
        let side = 2 * radius as usize + 1;
        Self {
            target,
            radius,
            neighbors: vec![None; side * side * side],
        }
    }

    /// Returns the position of the target chunk.
    #[inline]
    pub fn center(&self) -> ChunkPos {
        self.target.pos()
    }

    /// Returns the radius of the ring.
    #[inline]
    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Returns the target chunk.
    #[inline]
    pub fn target(&self) -> &Chunk {
        &*self.target
    }

    /// Returns the target chunk mutably.
    #[inline]
    pub(crate) fn target_mut(&mut self) -> &mut Chunk {
        &mut *self.target
    }

    /// Returns the slot index of `pos`, if it is part of the ring.
    fn slot(&self, pos: ChunkPos) -> Option<usize> {
        let center = self.center();
        if center.chebyshev_distance(pos) > self.radius {
            return None;
        }

        let r = self.radius as i32;
        let side = 2 * r + 1;
        let d = pos.as_ivec3() - center.as_ivec3() + IVec3::splat(r);
        Some(((d.x * side + d.y) * side + d.z) as usize)
    }

    /// Attaches a neighbor to the view.
    ///
    /// Returns `false` (and does nothing) if `chunk` is not part of the ring, or if it is at the
    /// position of the target.
    pub fn insert_neighbor(&mut self, chunk: &'a Chunk) -> bool {
        if chunk.pos() == self.center() {
            return false;
        }

        match self.slot(chunk.pos()) {
            Some(slot) => {
                self.neighbors[slot] = Some(chunk);
                true
            }
            None => false,
        }
    }

    /// Returns an iterator over the positions of the neighbors of the target, in ascending order.
    pub fn ring(&self) -> impl '_ + Iterator<Item = ChunkPos> {
        let center = self.center();
        center
            .iter_ring(self.radius)
            .filter(move |&pos| pos != center)
    }

    /// Returns an iterator over the ring positions for which no chunk was attached.
    pub fn missing_neighbors(&self) -> impl '_ + Iterator<Item = ChunkPos> {
        self.ring().filter(|&pos| self.chunk(pos).is_none())
    }

    /// Returns an iterator over the attached neighbors.
    pub fn neighbors(&self) -> impl '_ + Iterator<Item = &Chunk> {
        self.neighbors.iter().filter_map(|&c| c)
    }

    /// Returns the chunk at `pos`, if it is the target or an attached neighbor.
    pub fn chunk(&self, pos: ChunkPos) -> Option<&Chunk> {
        if pos == self.center() {
            Some(&*self.target)
        } else {
            self.slot(pos).and_then(|slot| self.neighbors[slot])
        }
    }

    /// Returns the block at the provided world-space position.
    ///
    /// Returns [`None`] if the chunk containing the position is not available through the view.
    pub fn get_block(&self, pos: IVec3) -> Option<BlockId> {
        let (chunk, local) = chunk_and_local_pos(pos);
        Some(self.chunk(chunk)?.get_block(local))
    }

    /// Sets the block at the provided world-space position.
    ///
    /// Returns whether the block was written. Positions outside of the target chunk are never
    /// written.
    pub fn set_block(&mut self, pos: IVec3, block: BlockId) -> bool {
        match self.center().checked_local_pos(pos) {
            Some(local) => {
                self.target.set_block(local, block);
                true
            }
            None => false,
        }
    }

    /// Places a decoration block at the provided world-space position.
    ///
    /// The block is only written inside the target chunk, and only if the block currently
    /// stored there can be replaced by it (see [`BlockId::can_be_decorated_with`]). Because that
    /// relation is a strict priority, the final content of a position does not depend on the
    /// order in which overlapping decorations were placed.
    pub fn place_decoration(&mut self, pos: IVec3, block: BlockId) -> bool {
        let Some(local) = self.center().checked_local_pos(pos) else {
            return false;
        };

        if self.target.get_block(local).can_be_decorated_with(block) {
            self.target.set_block(local, block);
            true
        } else {
            false
        }
    }
}
