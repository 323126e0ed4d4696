use bytemuck::{Contiguous, Zeroable};

/// A block identifier.
///
/// This enumeration defines what blocks are authorized to exist in a generated world.
///
/// # Remarks
///
/// If, in the future, we need to support modding and custom blocks, we will need to remove this
/// type in favor of a more flexible system.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Contiguous)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum BlockId {
    #[default]
    Air,
    Stone,
    Dirt,
    Grass,
    Sand,
    Sandstone,
    Gravel,
    Water,
    Snow,
    CoalOre,
    IronOre,
    GoldOre,
    DiamondOre,
    Log,
    Leaves,
    Cactus,
}

// SAFETY:
//  The block with ID 0 is `BlockId::Air`, which is valid.
unsafe impl Zeroable for BlockId {}

impl BlockId {
    /// The total number of [`BlockId`] instances.
    pub const COUNT: usize = <Self as Contiguous>::MAX_VALUE as usize + 1;

    /// Returns the [`BlockInfo`] instance associated with this [`BlockId`].
    #[inline]
    pub fn info(self) -> &'static BlockInfo {
        const fn terrain(name: &'static str) -> BlockInfo {
            BlockInfo {
                name,
                solid: true,
                decoration: None,
            }
        }

        const fn decoration(name: &'static str, priority: u8) -> BlockInfo {
            BlockInfo {
                name,
                solid: true,
                decoration: Some(priority),
            }
        }

        static INFOS: [BlockInfo; BlockId::COUNT] = [
            BlockInfo {
                name: "air",
                solid: false,
                decoration: None,
            },
            terrain("stone"),
            terrain("dirt"),
            terrain("grass"),
            terrain("sand"),
            terrain("sandstone"),
            terrain("gravel"),
            BlockInfo {
                name: "water",
                solid: false,
                decoration: None,
            },
            terrain("snow"),
            terrain("coal_ore"),
            terrain("iron_ore"),
            terrain("gold_ore"),
            terrain("diamond_ore"),
            decoration("log", 2),
            decoration("leaves", 1),
            decoration("cactus", 2),
        ];

        &INFOS[self as usize]
    }

    /// Returns an iterator over all the [`BlockId`] instances, in index order.
    pub fn iter_all() -> impl Clone + ExactSizeIterator<Item = Self> {
        // SAFETY:
        //  Every value in `0..COUNT` is a valid discriminant.
        (0..Self::COUNT as u8).map(|i| unsafe { std::mem::transmute::<u8, BlockId>(i) })
    }

    /// Returns the name of the block.
    #[inline]
    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// Whether the block is solid ground (or a solid decoration).
    #[inline]
    pub fn is_solid(self) -> bool {
        self.info().solid
    }

    /// Whether the block can only be placed by the decoration pass.
    #[inline]
    pub fn is_decoration(self) -> bool {
        self.info().decoration.is_some()
    }

    /// Whether the block belongs to the terrain laid out by the first generation pass.
    ///
    /// Air and water are not terrain, and neither are decorations.
    #[inline]
    pub fn is_terrain(self) -> bool {
        self.is_solid() && !self.is_decoration()
    }

    /// Returns whether a decoration `new` may overwrite the block currently stored at some
    /// position.
    ///
    /// Air is always replaced. A decoration replaces another decoration only if its priority is
    /// strictly higher. Anything else is never replaced, which makes the final content of a
    /// position independent of the order in which decorations were placed.
    pub fn can_be_decorated_with(self, new: BlockId) -> bool {
        let Some(new_priority) = new.info().decoration else {
            return false;
        };

        match self.info().decoration {
            _ if self == BlockId::Air => true,
            Some(old_priority) => new_priority > old_priority,
            None => false,
        }
    }
}

/// Stores static information about a block.
///
/// An instance of this type can be obtained by calling the [`info`] method of a
/// [`BlockId`].
///
/// [`info`]: BlockId::info
#[derive(Debug)]
pub struct BlockInfo {
    /// A stable, human-readable name.
    pub name: &'static str,
    /// Whether entities would collide with the block.
    pub solid: bool,
    /// When set, the block is a decoration with the provided placement priority.
    pub decoration: Option<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iter_all_matches_count() {
        assert_eq!(BlockId::iter_all().len(), BlockId::COUNT);
        assert_eq!(BlockId::iter_all().last(), Some(BlockId::Cactus));
    }

    #[test]
    fn decoration_priority() {
        assert!(BlockId::Air.can_be_decorated_with(BlockId::Leaves));
        assert!(BlockId::Leaves.can_be_decorated_with(BlockId::Log));
        assert!(!BlockId::Log.can_be_decorated_with(BlockId::Leaves));
        assert!(!BlockId::Log.can_be_decorated_with(BlockId::Cactus));
        assert!(!BlockId::Stone.can_be_decorated_with(BlockId::Log));
        assert!(!BlockId::Air.can_be_decorated_with(BlockId::Stone));
    }

    #[test]
    fn terrain_classification() {
        assert!(BlockId::Stone.is_terrain());
        assert!(!BlockId::Water.is_terrain());
        assert!(!BlockId::Log.is_terrain());
        assert!(BlockId::Log.is_solid());
    }
}
