use glam::IVec3;
use serde::{Deserialize, Serialize};
use strata_core::BlockId;
use strata_worldgen_core::{Biome, ChunkGenerator, ChunkView, GenContext, GeneratorError, Passes};
use strata_worldgen_structure::{include_structure, Structure, StructureError};

/// The salt used to decide which columns get a tree.
const SALT: u64 = const_fnv1a_hash::fnv1a_hash_str_64("tree_decorator");

/// The kinds of trees the decorator knows how to plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TreeKind {
    Oak,
    Pine,
    Cactus,
}

impl TreeKind {
    /// Returns the tree growing in `biome`, along with the probability for a column to host one.
    fn of(biome: Biome) -> (Self, f32) {
        match biome {
            Biome::Plains => (Self::Oak, 0.004),
            Biome::Forest => (Self::Oak, 0.04),
            Biome::Desert => (Self::Cactus, 0.01),
            Biome::Snow => (Self::Pine, 0.02),
            Biome::Mountains => (Self::Pine, 0.005),
        }
    }

    /// Whether the tree may take root on `block`.
    fn grows_on(self, block: BlockId) -> bool {
        match self {
            Self::Oak => block == BlockId::Grass,
            Self::Pine => matches!(block, BlockId::Grass | BlockId::Snow),
            Self::Cactus => block == BlockId::Sand,
        }
    }
}

/// Configuration of the [`TreeDecorator`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TreeConfig {
    /// A multiplier applied to the per-biome tree probabilities.
    pub density: f32,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self { density: 1.0 }
    }
}

/// Plants trees on the surface during the second pass.
///
/// # Placement
///
/// A tree is rooted at a block if the column hash of the position passes the probability of the
/// biome, the block is ground the tree grows on, and the block above it is either air or a
/// decoration. None of those conditions can be changed by the second pass itself, so the same
/// trees are found whichever chunk is decorated first.
///
/// Trees may overhang chunk borders: the decorator scans the columns of the neighbors within the
/// reach of its templates and only writes the part of each tree that lies in the target.
#[derive(Debug, Clone)]
pub struct TreeDecorator {
    density: f32,
    oak: Structure,
    pine: Structure,
    cactus: Structure,
}

impl TreeDecorator {
    /// Creates a new [`TreeDecorator`] with the built-in templates.
    pub fn new(density: f32) -> Result<Self, StructureError> {
        Ok(Self {
            density,
            oak: include_structure!("../structures/oak_tree.ron")?,
            pine: include_structure!("../structures/pine_tree.ron")?,
            cactus: include_structure!("../structures/cactus.ron")?,
        })
    }

    fn template(&self, kind: TreeKind) -> &Structure {
        match kind {
            TreeKind::Oak => &self.oak,
            TreeKind::Pine => &self.pine,
            TreeKind::Cactus => &self.cactus,
        }
    }

    fn templates(&self) -> [&Structure; 3] {
        [&self.oak, &self.pine, &self.cactus]
    }

    /// The largest horizontal distance between a root and a block of its tree.
    fn reach(&self) -> i32 {
        self.templates()
            .iter()
            .map(|s| s.horizontal_reach())
            .max()
            .unwrap_or(0)
    }

    /// Whether the column at `(x, z)` hosts a tree, and which one.
    fn tree_at(&self, ctx: &GenContext, x: i32, z: i32) -> Result<Option<TreeKind>, GeneratorError> {
        let (kind, probability) = TreeKind::of(ctx.biome_at(x, z)?);

        // 24 high bits give a uniform value in [0, 1).
        let roll = (ctx.column_hash(x, z, SALT) >> 40) as f32 * (1.0 / (1u32 << 24) as f32);
        Ok((roll < probability * self.density).then_some(kind))
    }
}

impl ChunkGenerator for TreeDecorator {
    fn name(&self) -> &str {
        "tree_decorator"
    }

    #[inline]
    fn passes(&self) -> Passes {
        Passes::SECOND
    }

    #[inline]
    fn halo(&self) -> u32 {
        1
    }

    #[profiling::function]
    fn decorate(&self, view: &mut ChunkView, ctx: &GenContext) -> Result<(), GeneratorError> {
        let center = view.center();
        let min = center.origin();
        let max = center.max_block();
        let reach = self.reach();

        for x in min.x - reach..=max.x + reach {
            for z in min.z - reach..=max.z + reach {
                let Some(kind) = self.tree_at(ctx, x, z)? else {
                    continue;
                };
                let template = self.template(kind);

                // Only roots whose tree intersects the target matter.
                for y in min.y - template.max.y..=max.y - template.min.y {
                    let root = IVec3::new(x, y, z);
                    if !view.get_block(root).is_some_and(|b| kind.grows_on(b)) {
                        continue;
                    }
                    let above = view.get_block(root + IVec3::Y);
                    if !above.is_some_and(|b| b == BlockId::Air || b.is_decoration()) {
                        continue;
                    }

                    for (pos, block) in template.blocks_in(root, min, max) {
                        view.place_decoration(pos, block);
                    }
                }
            }
        }

        Ok(())
    }

    fn debug_info(&self, buf: &mut String) {
        use std::fmt::Write;
        let _ = write!(buf, "tree_decorator (density {})", self.density);
    }
}
