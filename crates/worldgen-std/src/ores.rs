use glam::IVec3;
use serde::{Deserialize, Serialize};
use strata_core::{BlockId, Chunk, LocalPos};
use strata_rng::Rng;
use strata_worldgen_core::{ChunkGenerator, GenContext, GeneratorError};

/// The salt used to derive the vein random number generators.
const SALT: u64 = const_fnv1a_hash::fnv1a_hash_str_64("ore_seeder");

/// Describes how a single kind of ore is distributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OreVein {
    /// The ore block.
    pub block: BlockId,
    /// The number of veins attempted per chunk.
    pub attempts: u32,
    /// The number of steps of the random walk of each vein.
    pub size: u32,
    /// The lowest world-space Y coordinate a vein may start at.
    pub min_y: i32,
    /// The highest world-space Y coordinate a vein may start at.
    pub max_y: i32,
}

impl OreVein {
    /// Creates a new [`OreVein`].
    #[inline]
    pub const fn new(block: BlockId, attempts: u32, size: u32, min_y: i32, max_y: i32) -> Self {
        Self {
            block,
            attempts,
            size,
            min_y,
            max_y,
        }
    }
}

/// Replaces stone with ores along short random walks.
///
/// # Dependencies
///
/// Must run after terrain shaping and caves: only [`BlockId::Stone`] is replaced. Veins never
/// cross chunk boundaries, so the result only depends on the chunk itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OreSeeder {
    pub veins: Vec<OreVein>,
}

impl Default for OreSeeder {
    fn default() -> Self {
        Self {
            veins: Self::default_veins(),
        }
    }
}

impl OreSeeder {
    /// Creates a new [`OreSeeder`].
    #[inline]
    pub fn new(veins: Vec<OreVein>) -> Self {
        Self { veins }
    }

    /// The usual distribution of ores: the rarer the ore, the deeper it is found.
    pub fn default_veins() -> Vec<OreVein> {
        vec![
            OreVein::new(BlockId::CoalOre, 20, 12, 5, 120),
            OreVein::new(BlockId::IronOre, 12, 8, 5, 64),
            OreVein::new(BlockId::GoldOre, 4, 6, 5, 32),
            OreVein::new(BlockId::DiamondOre, 2, 4, 1, 16),
        ]
    }

    /// Runs the random walk of a single vein starting at `start` (in chunk-local coordinates).
    ///
    /// The same number of random values is drawn whether or not the walk leaves the chunk, so
    /// that clipping never shifts the sequence of the following veins.
    fn walk(chunk: &mut Chunk, rng: &mut impl Rng, vein: &OreVein, start: IVec3) {
        const STEPS: [IVec3; 6] = [
            IVec3::X,
            IVec3::NEG_X,
            IVec3::Y,
            IVec3::NEG_Y,
            IVec3::Z,
            IVec3::NEG_Z,
        ];

        let mut cur = start;
        for _ in 0..vein.size {
            if let Some(pos) = LocalPos::checked_from_xyz(cur.x, cur.y, cur.z) {
                if chunk.get_block(pos) == BlockId::Stone {
                    chunk.set_block(pos, vein.block);
                }
            }
            cur += STEPS[rng.next_below(STEPS.len() as u32) as usize];
        }
    }
}

impl ChunkGenerator for OreSeeder {
    fn name(&self) -> &str {
        "ore_seeder"
    }

    #[profiling::function]
    fn generate(&self, chunk: &mut Chunk, ctx: &GenContext) -> Result<(), GeneratorError> {
        if chunk.is_empty() {
            return Ok(());
        }

        let pos = chunk.pos();
        let origin_y = pos.origin().y;

        for (i, vein) in self.veins.iter().enumerate() {
            let mut rng = ctx.rng(pos, SALT ^ i as u64);
            for _ in 0..vein.attempts {
                let x = rng.next_below(Chunk::SIDE_X as u32) as i32;
                let z = rng.next_below(Chunk::SIDE_Z as u32) as i32;
                let y = rng.next_i32_in(vein.min_y, vein.max_y) - origin_y;
                Self::walk(chunk, &mut rng, vein, IVec3::new(x, y, z));
            }
        }

        Ok(())
    }

    fn debug_info(&self, buf: &mut String) {
        use std::fmt::Write;
        let _ = write!(buf, "ore_seeder (");
        for (i, vein) in self.veins.iter().enumerate() {
            if i != 0 {
                buf.push_str(", ");
            }
            let _ = write!(buf, "{} x{}", vein.block.name(), vein.attempts);
        }
        buf.push(')');
    }
}
