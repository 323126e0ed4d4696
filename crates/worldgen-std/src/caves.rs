use serde::{Deserialize, Serialize};
use strata_core::{BlockId, Chunk, LocalPos};
use strata_rng::noises::Perlin3;
use strata_rng::{DefaultRng, FromRng, Noise, Rng};
use strata_worldgen_core::{ChunkGenerator, GenContext, GeneratorError};

/// A cave generator that does not carve anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoCaves;

impl ChunkGenerator for NoCaves {
    fn name(&self) -> &str {
        "no_caves"
    }
}

/// The salt used to derive the cave noises from the world seed.
const SALT: u64 = const_fnv1a_hash::fnv1a_hash_str_64("noise_caves");

/// Carves "spaghetti" tunnels where two independent 3D noises are both close to zero.
///
/// # Dependencies
///
/// Must run after terrain shaping: only natural terrain blocks are carved, and a block directly
/// under water is never carved, which keeps oceans from draining. Running it on an empty chunk
/// does nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NoiseCaves {
    /// How close to zero both noises must be for a block to be carved.
    pub threshold: f32,
    /// The frequency of the noises. Lower values make longer tunnels.
    pub frequency: f32,
    /// The lowest world-space Y coordinate that may be carved.
    pub min_y: i32,
    /// The highest world-space Y coordinate that may be carved.
    pub max_y: i32,
}

impl Default for NoiseCaves {
    fn default() -> Self {
        Self {
            threshold: 0.08,
            frequency: 1.0 / 32.0,
            min_y: 1,
            max_y: 120,
        }
    }
}

impl NoiseCaves {
    /// Whether the block may be removed by a cave.
    #[inline]
    fn is_carvable(block: BlockId) -> bool {
        matches!(
            block,
            BlockId::Stone
                | BlockId::Dirt
                | BlockId::Grass
                | BlockId::Sand
                | BlockId::Sandstone
                | BlockId::Gravel
                | BlockId::Snow
        )
    }
}

impl ChunkGenerator for NoiseCaves {
    fn name(&self) -> &str {
        "noise_caves"
    }

    #[profiling::function]
    fn generate(&self, chunk: &mut Chunk, ctx: &GenContext) -> Result<(), GeneratorError> {
        if chunk.is_empty() {
            return Ok(());
        }

        let origin = chunk.pos().origin();
        let local_min = (self.min_y - origin.y).max(0);
        let local_max = (self.max_y - origin.y).min(Chunk::SIDE_Y - 1);
        if local_min > local_max {
            return Ok(());
        }

        let mut rng = DefaultRng::from_seed(ctx.seed().hash_coords(SALT, &[]));
        let [a, b] = <[Perlin3; 2]>::from_rng(&mut rng);

        // Walk each column from the top so that the "under water" check sees the original block
        // above rather than a freshly carved one.
        for column in LocalPos::iter_layer(0) {
            let mut above = None;
            for pos in column.iter_column().rev() {
                let block = chunk.get_block(pos);
                let under_water = above == Some(BlockId::Water);
                above = Some(block);

                if pos.y() < local_min || pos.y() > local_max {
                    continue;
                }
                if under_water || !Self::is_carvable(block) {
                    continue;
                }

                let p = (origin + pos.to_ivec3()).as_vec3() * self.frequency;
                let p = [p.x, p.y, p.z];
                if a.sample(p).abs() < self.threshold && b.sample(p).abs() < self.threshold {
                    chunk.set_block(pos, BlockId::Air);
                }
            }
        }

        Ok(())
    }

    fn debug_info(&self, buf: &mut String) {
        use std::fmt::Write;
        let _ = write!(
            buf,
            "noise_caves (threshold {}, y {}..={})",
            self.threshold, self.min_y, self.max_y
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FixedBiomeProvider, FlatTerrain};
    use strata_core::ChunkPos;
    use strata_worldgen_core::WorldSeed;

    fn ctx_parts() -> (WorldSeed, FixedBiomeProvider) {
        (WorldSeed::from_u64(42), FixedBiomeProvider::new(0.5, 0.5))
    }

    #[test]
    fn empty_chunk_is_left_alone() {
        let (seed, provider) = ctx_parts();
        let ctx = GenContext::new(seed, &provider);
        let mut chunk = Chunk::new(ChunkPos::new(0, 0, 0));
        NoiseCaves::default().generate(&mut chunk, &ctx).unwrap();
        assert!(chunk.is_empty());
        assert_eq!(chunk, Chunk::new(ChunkPos::new(0, 0, 0)));
    }

    #[test]
    fn carves_only_within_range() {
        let (seed, provider) = ctx_parts();
        let ctx = GenContext::new(seed, &provider);
        let caves = NoiseCaves {
            min_y: 10,
            max_y: 40,
            ..NoiseCaves::default()
        };

        let mut chunk = Chunk::new(ChunkPos::new(0, 0, 0));
        FlatTerrain { sea_level: 64 }.generate(&mut chunk, &ctx).unwrap();
        caves.generate(&mut chunk, &ctx).unwrap();

        for pos in LocalPos::iter_all() {
            if chunk.get_block(pos) == BlockId::Air && pos.y() < 64 {
                assert!((10..=40).contains(&pos.y()));
            }
        }
    }

    #[test]
    fn never_carves_under_water() {
        let (seed, provider) = ctx_parts();
        let ctx = GenContext::new(seed, &provider);
        let caves = NoiseCaves {
            threshold: 2.0,
            ..NoiseCaves::default()
        };

        let mut chunk = Chunk::new(ChunkPos::new(0, 0, 0));
        for pos in LocalPos::iter_all() {
            let block = match pos.y() {
                0..=49 => BlockId::Stone,
                50 => BlockId::Sand,
                51..=63 => BlockId::Water,
                _ => BlockId::Air,
            };
            chunk.set_block(pos, block);
        }
        caves.generate(&mut chunk, &ctx).unwrap();

        for column in LocalPos::iter_layer(50) {
            assert_eq!(chunk.get_block(column), BlockId::Sand);
        }
        // Everything else within range is carved with such a threshold.
        assert_eq!(chunk.get_block(LocalPos::from_xyz(0, 20, 0)), BlockId::Air);
    }
}
