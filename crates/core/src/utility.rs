//! Utility functions for the core library.

use glam::IVec3;

use crate::{ChunkPos, LocalPos};

/// Splits a world-space block position into the position of its chunk and its local position
/// within that chunk.
#[inline]
pub fn chunk_and_local_pos(pos: IVec3) -> (ChunkPos, LocalPos) {
    (ChunkPos::from_world_pos(pos), LocalPos::from_world_pos(pos))
}
