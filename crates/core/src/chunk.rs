use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::ops::{Index, IndexMut};

use bytemuck::Zeroable;
use glam::{IVec2, IVec3};

use crate::BlockId;

const X_MASK: u16 = 0b1111;
const Z_MASK: u16 = 0b1111 << 4;
const Y_MASK: u16 = 0b111_1111 << 8;

/// A local block position within a [`Chunk`].
///
/// # Representation
///
/// Internally, this type is represented by a single index that is guaranteed to be less than
/// [`Chunk::SIZE`].
///
/// The formula to convert between a local position and its index is:
///
/// ```text
/// index = x + z * Chunk::SIDE_X + y * Chunk::SIDE_X * Chunk::SIDE_Z
/// ```
///
/// Blocks of the same horizontal layer are contiguous, and the blocks of a column are
/// [`Chunk::LAYER`] indices apart.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalPos(u16);

impl LocalPos {
    /// Creates a new [`LocalPos`] from the given index.
    ///
    /// # Safety
    ///
    /// The index must be less than [`Chunk::SIZE`].
    #[inline]
    pub const unsafe fn new_unchecked(index: usize) -> Self {
        Self(index as u16)
    }

    /// Creates a new [`LocalPos`] from the given index, if it is in bounds.
    #[inline]
    pub const fn new(index: usize) -> Option<Self> {
        if index < Chunk::SIZE {
            Some(Self(index as u16))
        } else {
            None
        }
    }

    /// Creates a new [`LocalPos`] from the given coordinates without checking if they are
    /// in bounds.
    ///
    /// # Safety
    ///
    /// This function assumes that the coordinates are within the bounds of a chunk.
    #[inline]
    pub const unsafe fn from_xyz_unchecked(x: i32, y: i32, z: i32) -> Self {
        Self((x | z << 4 | y << 8) as u16)
    }

    /// Creates a new [`LocalPos`] from the given coordinates, if they are in bounds.
    #[inline]
    pub fn checked_from_xyz(x: i32, y: i32, z: i32) -> Option<Self> {
        if (0..Chunk::SIDE_X).contains(&x)
            && (0..Chunk::SIDE_Y).contains(&y)
            && (0..Chunk::SIDE_Z).contains(&z)
        {
            // SAFETY:
            //  We just made sure that the coordinates were in bounds.
            Some(unsafe { Self::from_xyz_unchecked(x, y, z) })
        } else {
            None
        }
    }

    /// Creates a new [`LocalPos`] from the given coordinates.
    ///
    /// # Panics
    ///
    /// This function panics if any of the provided coordinates are out of bounds.
    #[track_caller]
    pub fn from_xyz(x: i32, y: i32, z: i32) -> Self {
        match Self::checked_from_xyz(x, y, z) {
            Some(pos) => pos,
            None => panic!("local position out of bounds: ({x}, {y}, {z})"),
        }
    }

    /// Returns the position of the provided world-space block within the chunk that contains it.
    #[inline]
    pub fn from_world_pos(pos: IVec3) -> Self {
        let x = pos.x.rem_euclid(Chunk::SIDE_X);
        let y = pos.y.rem_euclid(Chunk::SIDE_Y);
        let z = pos.z.rem_euclid(Chunk::SIDE_Z);
        // SAFETY:
        //  `rem_euclid` always returns a value in `0..rhs`.
        unsafe { Self::from_xyz_unchecked(x, y, z) }
    }

    /// Returns the X coordinate of the position.
    #[inline]
    pub const fn x(self) -> i32 {
        (self.0 & X_MASK) as i32
    }

    /// Returns the Y coordinate of the position.
    #[inline]
    pub const fn y(self) -> i32 {
        ((self.0 & Y_MASK) >> 8) as i32
    }

    /// Returns the Z coordinate of the position.
    #[inline]
    pub const fn z(self) -> i32 {
        ((self.0 & Z_MASK) >> 4) as i32
    }

    /// Returns the position as a [`IVec3`].
    #[inline]
    pub fn to_ivec3(self) -> IVec3 {
        IVec3::new(self.x(), self.y(), self.z())
    }

    /// Returns the index of the block within the chunk.
    ///
    /// The returned index is guaranteed to be less than [`Chunk::SIZE`].
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the index of the column that contains this position.
    ///
    /// The returned index is guaranteed to be less than [`Chunk::COLUMNS`].
    #[inline]
    pub const fn column_index(self) -> usize {
        (self.0 & (X_MASK | Z_MASK)) as usize
    }

    /// Returns an iterator over all the [`LocalPos`] instances that have a Y coordinate equal to
    /// the provided one.
    ///
    /// # Panics
    ///
    /// This function panics if `y` is out of bounds.
    #[track_caller]
    pub fn iter_layer(y: i32) -> impl Clone + ExactSizeIterator<Item = Self> {
        assert!((0..Chunk::SIDE_Y).contains(&y));
        let base = (y as u16) << 8;
        (0..Chunk::LAYER as u16).map(move |i| Self(base | i))
    }

    /// Returns an iterator over all the [`LocalPos`] instances in the column of this position,
    /// from bottom to top.
    #[inline]
    pub fn iter_column(self) -> impl Clone + DoubleEndedIterator<Item = Self> {
        let base = self.0 & (X_MASK | Z_MASK);
        (0..Chunk::SIDE_Y as u16).map(move |y| Self(base | y << 8))
    }

    /// Returns an iterator over all the [`LocalPos`] instances in the chunk, in index order.
    #[inline]
    pub fn iter_all() -> impl Clone + ExactSizeIterator<Item = Self> {
        (0..Chunk::SIZE as u16).map(Self)
    }
}

impl Debug for LocalPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalPos")
            .field("x", &self.x())
            .field("y", &self.y())
            .field("z", &self.z())
            .finish()
    }
}

/// A simple wrapper around a static array that can be indexed with a [`LocalPos`] with
/// no bound checking.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Zeroable)]
#[repr(transparent)]
struct ChunkStore<T>([T; Chunk::SIZE]);

impl<T> Index<LocalPos> for ChunkStore<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: LocalPos) -> &Self::Output {
        // SAFETY:
        //  A `LocalPos` is always less than `Chunk::SIZE`.
        unsafe { self.0.get_unchecked(index.index()) }
    }
}

impl<T> IndexMut<LocalPos> for ChunkStore<T> {
    #[inline]
    fn index_mut(&mut self, index: LocalPos) -> &mut Self::Output {
        // SAFETY:
        //  A `LocalPos` is always less than `Chunk::SIZE`.
        unsafe { self.0.get_unchecked_mut(index.index()) }
    }
}

/// The generation state of a [`Chunk`].
///
/// States are ordered: a chunk only ever moves forward through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChunkState {
    /// The chunk has been allocated, but no generation pass has been applied to it.
    #[default]
    Empty,
    /// The first pass completed. The content of the chunk only depends on its own position.
    ///
    /// Reads of the chunk are provisional until it reaches [`ChunkState::Decorated`].
    Generated,
    /// The second pass completed. The chunk will not be modified by generation anymore.
    Decorated,
}

/// Caches the highest terrain block of each column of a [`Chunk`].
///
/// Decorations (see [`BlockId::is_decoration`]), air and water are ignored.
#[derive(Clone, PartialEq, Eq)]
pub struct HeightMap([i16; Chunk::COLUMNS]);

impl HeightMap {
    /// A height map in which every column is empty.
    pub const EMPTY: Self = Self([-1; Chunk::COLUMNS]);

    /// Returns the local Y coordinate of the highest terrain block of the provided column.
    ///
    /// Columns are indexed with [`LocalPos::column_index`].
    #[inline]
    pub fn get(&self, column: usize) -> Option<i32> {
        match self.0[column] {
            -1 => None,
            y => Some(y as i32),
        }
    }

    /// Returns the local Y coordinate of the highest terrain block at local `(x, z)`.
    #[inline]
    pub fn get_xz(&self, x: i32, z: i32) -> Option<i32> {
        self.get(LocalPos::from_xyz(x, 0, z).column_index())
    }
}

impl Debug for HeightMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let filled = self.0.iter().filter(|&&y| y >= 0).count();
        f.debug_struct("HeightMap")
            .field("filled_columns", &filled)
            .finish()
    }
}

/// Represents the content of a chunk.
///
/// # Remarks
///
/// Storage is allocated lazily: a chunk that was never written to does not hold any block
/// buffer and behaves as if filled with [`BlockId::Air`].
#[derive(Clone)]
pub struct Chunk {
    /// The position of the chunk in the world.
    pos: ChunkPos,
    /// How far along the generation pipeline the chunk is.
    state: ChunkState,
    /// The inner blocks of the chunk.
    blocks: Option<Box<ChunkStore<BlockId>>>,
    /// A cache of the highest terrain block of every column.
    height_map: HeightMap,
}

impl Chunk {
    /// The size of a chunk along the X axis, in blocks.
    pub const SIDE_X: i32 = 16;
    /// The size of a chunk along the Y axis, in blocks.
    pub const SIDE_Y: i32 = 128;
    /// The size of a chunk along the Z axis, in blocks.
    pub const SIDE_Z: i32 = 16;

    /// The size of the chunk as an [`IVec3`].
    pub const EXTENT: IVec3 = IVec3::new(Self::SIDE_X, Self::SIDE_Y, Self::SIDE_Z);

    /// The number of blocks in a horizontal layer of the chunk.
    pub const LAYER: usize = (Self::SIDE_X * Self::SIDE_Z) as usize;

    /// The number of columns in a chunk. Equal to [`Chunk::LAYER`].
    pub const COLUMNS: usize = Self::LAYER;

    /// The total size of a chunk, in blocks.
    pub const SIZE: usize = Self::LAYER * Self::SIDE_Y as usize;

    /// Creates a new empty [`Chunk`] for the provided position.
    #[inline]
    pub fn new(pos: ChunkPos) -> Self {
        Self {
            pos,
            state: ChunkState::Empty,
            blocks: None,
            height_map: HeightMap::EMPTY,
        }
    }

    /// Returns the position of the chunk.
    #[inline]
    pub fn pos(&self) -> ChunkPos {
        self.pos
    }

    /// Returns the generation state of the chunk.
    #[inline]
    pub fn state(&self) -> ChunkState {
        self.state
    }

    /// Sets the generation state of the chunk.
    ///
    /// # Remarks
    ///
    /// This is meant to be called by the generation pipeline only. Downstream consumers should
    /// treat the state as read-only.
    #[inline]
    pub fn set_state(&mut self, state: ChunkState) {
        self.state = state;
    }

    /// Returns the block at the provided position.
    #[inline]
    pub fn get_block(&self, pos: LocalPos) -> BlockId {
        match &self.blocks {
            Some(data) => data[pos],
            None => BlockId::Air,
        }
    }

    /// Sets the block at the provided position.
    ///
    /// # Remarks
    ///
    /// Setting air in a chunk that was never written to does not allocate.
    #[inline]
    pub fn set_block(&mut self, pos: LocalPos, block: BlockId) {
        match &mut self.blocks {
            Some(data) => data[pos] = block,
            None if block == BlockId::Air => (),
            None => self.blocks.get_or_insert_with(bytemuck::zeroed_box)[pos] = block,
        }
    }

    /// Returns the block at the provided world-space position, or [`None`] if the position is
    /// not part of this chunk.
    #[inline]
    pub fn get_block_world(&self, pos: IVec3) -> Option<BlockId> {
        self.pos.checked_local_pos(pos).map(|p| self.get_block(p))
    }

    /// Replaces every block of the chunk with `block`.
    pub fn fill(&mut self, block: BlockId) {
        if block == BlockId::Air {
            self.blocks = None;
        } else {
            self.blocks
                .get_or_insert_with(bytemuck::zeroed_box)
                .0
                .fill(block);
        }
    }

    /// Returns whether the chunk only contains air.
    #[inline]
    pub fn is_empty(&self) -> bool {
        match self.blocks.as_ref() {
            Some(data) => data.0.iter().all(|&id| id == BlockId::Air),
            None => true,
        }
    }

    /// Returns the first decoration block of the chunk (see [`BlockId::is_decoration`]), in
    /// index order.
    pub fn find_decoration(&self) -> Option<(LocalPos, BlockId)> {
        let data = self.blocks.as_ref()?;
        LocalPos::iter_all()
            .map(|pos| (pos, data[pos]))
            .find(|(_, id)| id.is_decoration())
    }

    /// Counts the number of blocks of each kind, indexed by `BlockId as usize`.
    pub fn block_counts(&self) -> [u32; BlockId::COUNT] {
        let mut ret = [0; BlockId::COUNT];
        match &self.blocks {
            Some(data) => data.0.iter().for_each(|&id| ret[id as usize] += 1),
            None => ret[BlockId::Air as usize] = Chunk::SIZE as u32,
        }
        ret
    }

    /// Returns the cached height map of the chunk.
    ///
    /// The cache is only as fresh as the last call to [`Chunk::update_height_map`].
    #[inline]
    pub fn height_map(&self) -> &HeightMap {
        &self.height_map
    }

    /// Recomputes the height map of the chunk from its blocks.
    pub fn update_height_map(&mut self) {
        let Some(data) = &self.blocks else {
            self.height_map = HeightMap::EMPTY;
            return;
        };

        for column in LocalPos::iter_layer(0) {
            let top = column
                .iter_column()
                .rev()
                .find(|&pos| data[pos].is_terrain())
                .map_or(-1, |pos| pos.y() as i16);
            self.height_map.0[column.column_index()] = top;
        }
    }

    /// Returns the content of the chunk as one byte per block, in index order.
    pub fn to_bytes(&self) -> Vec<u8> {
        match &self.blocks {
            Some(data) => data.0.iter().map(|&id| id as u8).collect(),
            None => vec![BlockId::Air as u8; Chunk::SIZE],
        }
    }

    /// Returns a stable hash of the blocks of the chunk.
    ///
    /// Two chunks with the same content always produce the same checksum, on any platform and
    /// across process restarts.
    pub fn checksum(&self) -> u64 {
        const_fnv1a_hash::fnv1a_hash_64(&self.to_bytes(), None)
    }
}

impl PartialEq for Chunk {
    fn eq(&self, other: &Self) -> bool {
        if self.pos != other.pos {
            return false;
        }

        match (&self.blocks, &other.blocks) {
            (Some(a), Some(b)) => a.0 == b.0,
            (Some(data), None) | (None, Some(data)) => data.0.iter().all(|&id| id == BlockId::Air),
            (None, None) => true,
        }
    }
}

impl Eq for Chunk {}

impl Debug for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let air = self.block_counts()[BlockId::Air as usize];
        f.debug_struct("Chunk")
            .field("pos", &self.pos)
            .field("state", &self.state)
            .field("non_air", &(Chunk::SIZE as u32 - air))
            .finish()
    }
}

/// The 3D position of a chunk in the world.
///
/// # Ordering
///
/// Positions are ordered lexicographically by `(x, y, z)`. This total order is used to acquire
/// chunk locks in a consistent order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChunkPos {
    /// The X coordinate of the chunk.
    pub x: i32,
    /// The Y coordinate of the chunk.
    pub y: i32,
    /// The Z coordinate of the chunk.
    pub z: i32,
}

impl ChunkPos {
    /// The largest absolute X or Z coordinate of a chunk that can be generated.
    ///
    /// World-space coordinates of such chunks, and of their direct neighbors, fit in an `i32`
    /// with room to spare.
    pub const MAX_HORIZONTAL: i32 = 1 << 26;
    /// The largest absolute Y coordinate of a chunk that can be generated.
    pub const MAX_VERTICAL: i32 = 1 << 22;

    /// Creates a new [`ChunkPos`] from the provided coordinates.
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Converts the provided world-space block position into the position of the chunk that
    /// contains it.
    #[inline]
    pub const fn from_world_pos(pos: IVec3) -> Self {
        Self {
            x: pos.x.div_euclid(Chunk::SIDE_X),
            y: pos.y.div_euclid(Chunk::SIDE_Y),
            z: pos.z.div_euclid(Chunk::SIDE_Z),
        }
    }

    /// Whether the chunk lies within [`ChunkPos::MAX_HORIZONTAL`] and [`ChunkPos::MAX_VERTICAL`].
    #[inline]
    pub const fn is_in_bounds(self) -> bool {
        self.x.unsigned_abs() <= Self::MAX_HORIZONTAL as u32
            && self.z.unsigned_abs() <= Self::MAX_HORIZONTAL as u32
            && self.y.unsigned_abs() <= Self::MAX_VERTICAL as u32
    }

    /// Returns the world-space position of the block with the lowest coordinates in the chunk.
    ///
    /// The result only fits in an [`IVec3`] for chunks that are in bounds (see
    /// [`ChunkPos::is_in_bounds`]).
    #[inline]
    pub const fn origin(self) -> IVec3 {
        IVec3::new(
            self.x * Chunk::SIDE_X,
            self.y * Chunk::SIDE_Y,
            self.z * Chunk::SIDE_Z,
        )
    }

    /// Returns the world-space position of the block with the highest coordinates in the chunk.
    #[inline]
    pub fn max_block(self) -> IVec3 {
        self.origin() + Chunk::EXTENT - IVec3::ONE
    }

    /// Returns a 2D vector that contains the X and Z coordinates of the chunk.
    #[inline]
    pub const fn xz(self) -> IVec2 {
        IVec2::new(self.x, self.z)
    }

    /// Returns the chunk position as an [`IVec3`].
    #[inline]
    pub const fn as_ivec3(self) -> IVec3 {
        IVec3::new(self.x, self.y, self.z)
    }

    /// Returns the position offset by the provided amount of chunks.
    #[inline]
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Computes the squared distance between two chunk positions.
    ///
    /// Saturates at [`u64::MAX`] instead of overflowing.
    #[inline]
    pub fn distance_squared(self, other: Self) -> u64 {
        let sq = |a: i32, b: i32| (a.abs_diff(b) as u64).saturating_mul(a.abs_diff(b) as u64);
        sq(self.x, other.x)
            .saturating_add(sq(self.y, other.y))
            .saturating_add(sq(self.z, other.z))
    }

    /// Returns the largest per-axis distance between two chunk positions.
    #[inline]
    pub fn chebyshev_distance(self, other: Self) -> u32 {
        self.x
            .abs_diff(other.x)
            .max(self.y.abs_diff(other.y))
            .max(self.z.abs_diff(other.z))
    }

    /// Returns the largest distance between two chunk positions along the X and Z axes.
    #[inline]
    pub fn horizontal_distance(self, other: Self) -> u32 {
        self.x.abs_diff(other.x).max(self.z.abs_diff(other.z))
    }

    /// If the provided `world_pos` is part of the chunk with this position, returns its
    /// local position within that chunk.
    pub fn checked_local_pos(self, world_pos: IVec3) -> Option<LocalPos> {
        let origin = self.origin();

        let x = world_pos.x.checked_sub(origin.x)?;
        let y = world_pos.y.checked_sub(origin.y)?;
        let z = world_pos.z.checked_sub(origin.z)?;

        LocalPos::checked_from_xyz(x, y, z)
    }

    /// Returns an iterator over every chunk position within `radius` chunks of this one (on all
    /// three axes), including this one.
    ///
    /// Positions are yielded in ascending order.
    pub fn iter_ring(self, radius: u32) -> impl Clone + Iterator<Item = ChunkPos> {
        let r = radius as i32;
        (-r..=r).flat_map(move |dx| {
            (-r..=r).flat_map(move |dy| (-r..=r).map(move |dz| self.offset(dx, dy, dz)))
        })
    }
}

impl Hash for ChunkPos {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        #[cfg(target_pointer_width = "64")]
        {
            state.write_usize((self.x as u32 as usize) << 32 | self.y as u32 as usize);
            state.write_i32(self.z);
        }

        #[cfg(target_pointer_width = "32")]
        {
            self.x.hash(state);
            self.y.hash(state);
            self.z.hash(state);
        }
    }
}

impl Display for ChunkPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl From<IVec3> for ChunkPos {
    #[inline]
    fn from(value: IVec3) -> Self {
        Self::new(value.x, value.y, value.z)
    }
}

impl From<(i32, i32, i32)> for ChunkPos {
    #[inline]
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self::new(x, y, z)
    }
}
