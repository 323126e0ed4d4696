//! Block structures, such as trees, described in RON files.
//!
//! # Format
//!
//! ```ron
//! (
//!     name: "shrub",
//!     min: (-1, 0, -1),
//!     max: (1, 1, 1),
//!     edits: [
//!         Block(position: (0, 0, 0), block: Log),
//!         Fill(min: (-1, 1, -1), max: (1, 1, 1), block: Leaves),
//!     ],
//! )
//! ```
//!
//! Positions are relative to the origin of the structure, and every edit must lie within
//! `min..=max`.

use glam::IVec3;
use smallvec::SmallVec;
use strata_core::BlockId;

/// An error that occurs when loading a [`Structure`].
#[derive(Debug, thiserror::Error)]
pub enum StructureError {
    /// The RON document is malformed.
    #[error("failed to parse structure: {0}")]
    Parse(#[from] ron::error::SpannedError),
    /// `min` is greater than `max` on some axis.
    #[error("structure `{name}` has inverted bounds {min} > {max}")]
    InvertedBounds { name: String, min: IVec3, max: IVec3 },
    /// An edit writes outside of the bounds of the structure.
    #[error("edit #{index} of structure `{name}` is out of bounds")]
    EditOutOfBounds { name: String, index: usize },
}

/// An edition that a structure can apply.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub enum StructureEdit {
    /// Writes a single block.
    Block {
        /// The position of the block, relative to the structure's origin.
        position: IVec3,
        /// The block that must be inserted.
        block: BlockId,
    },
    /// Writes the same block to every position of an inclusive box.
    Fill {
        min: IVec3,
        max: IVec3,
        block: BlockId,
    },
}

impl StructureEdit {
    /// Returns the inclusive bounds written by the edit.
    pub fn bounds(&self) -> (IVec3, IVec3) {
        match *self {
            StructureEdit::Block { position, .. } => (position, position),
            StructureEdit::Fill { min, max, .. } => (min, max),
        }
    }
}

/// A structure that's made of [`StructureEdit`]s.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Structure {
    /// The name of the structure, for debugging purposes.
    pub name: String,
    /// The minimum bound of the structure.
    pub min: IVec3,
    /// The maximum bound of the structure.
    pub max: IVec3,
    /// The editions that the structure applies, in order.
    pub edits: Vec<StructureEdit>,
}

impl Structure {
    /// Parses and validates a structure from a RON document.
    pub fn from_ron(source: &str) -> Result<Self, StructureError> {
        let structure: Structure = ron::from_str(source)?;
        structure.validate()?;
        Ok(structure)
    }

    /// Makes sure the bounds are consistent and that every edit lies within them.
    pub fn validate(&self) -> Result<(), StructureError> {
        if self.min.cmpgt(self.max).any() {
            return Err(StructureError::InvertedBounds {
                name: self.name.clone(),
                min: self.min,
                max: self.max,
            });
        }

        for (index, edit) in self.edits.iter().enumerate() {
            let (min, max) = edit.bounds();
            if min.cmpgt(max).any() || min.cmplt(self.min).any() || max.cmpgt(self.max).any() {
                return Err(StructureError::EditOutOfBounds {
                    name: self.name.clone(),
                    index,
                });
            }
        }

        Ok(())
    }

    /// Returns the height of the structure, in blocks.
    #[inline]
    pub fn height(&self) -> i32 {
        self.max.y - self.min.y + 1
    }

    /// Returns the largest horizontal distance between the origin and a block of the structure.
    #[inline]
    pub fn horizontal_reach(&self) -> i32 {
        self.min.x.abs().max(self.max.x.abs()).max(self.min.z.abs()).max(self.max.z.abs())
    }

    /// Calls `f` with every block written by the structure, with positions relative to its
    /// origin. `Fill` edits are expanded.
    pub fn for_each_block(&self, mut f: impl FnMut(IVec3, BlockId)) {
        for edit in &self.edits {
            match *edit {
                StructureEdit::Block { position, block } => f(position, block),
                StructureEdit::Fill { min, max, block } => {
                    for x in min.x..=max.x {
                        for y in min.y..=max.y {
                            for z in min.z..=max.z {
                                f(IVec3::new(x, y, z), block);
                            }
                        }
                    }
                }
            }
        }
    }

    /// Collects the blocks of the structure that intersect the provided world-space box, once
    /// the structure is placed at `origin`.
    pub fn blocks_in(
        &self,
        origin: IVec3,
        box_min: IVec3,
        box_max: IVec3,
    ) -> SmallVec<[(IVec3, BlockId); 32]> {
        let mut ret = SmallVec::new();
        if (origin + self.max).cmplt(box_min).any() || (origin + self.min).cmpgt(box_max).any() {
            return ret;
        }
        self.for_each_block(|pos, block| {
            let pos = origin + pos;
            if pos.cmpge(box_min).all() && pos.cmple(box_max).all() {
                ret.push((pos, block));
            }
        });
        ret
    }
}

/// Includes a structure by parsing it from a `.ron` file at construction time.
///
/// The path is relative to the file invoking the macro, like [`include_str!`].
#[macro_export]
macro_rules! include_structure {
    ($path:literal) => {
        $crate::Structure::from_ron(::core::include_str!($path))
    };
}
