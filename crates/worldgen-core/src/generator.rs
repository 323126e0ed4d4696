use strata_core::{Chunk, ChunkPos};
use strata_rng::{DefaultRng, Rng};

use crate::{Biome, BiomeProvider, ChunkView, Climate, GeneratorError, WorldSeed};

bitflags::bitflags! {
    /// The passes a [`ChunkGenerator`] takes part in.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Passes: u8 {
        /// The generator implements [`ChunkGenerator::generate`].
        const FIRST = 1 << 0;
        /// The generator implements [`ChunkGenerator::decorate`].
        const SECOND = 1 << 1;
    }
}

/// A stage of the generation pipeline.
///
/// # Purity
///
/// Both [`generate`] and [`decorate`] must be pure functions of the current content of the
/// chunk(s) they are given, of the chunk position, and of the [`GenContext`]. In particular,
/// they may not use wall-clock time, global mutable state, or randomness that is not derived
/// from the context.
///
/// # Ordering
///
/// Generators run in registration order, and each one observes the blocks left by the previous
/// ones. Implementations should document what they expect to have run before them.
///
/// [`generate`]: ChunkGenerator::generate
/// [`decorate`]: ChunkGenerator::decorate
pub trait ChunkGenerator: Send + Sync {
    /// A stable name identifying the generator within a pipeline.
    fn name(&self) -> &str;

    /// The passes this generator takes part in.
    #[inline]
    fn passes(&self) -> Passes {
        Passes::FIRST
    }

    /// The radius (in chunks) of the neighborhood [`ChunkGenerator::decorate`] reads.
    #[inline]
    fn halo(&self) -> u32 {
        0
    }

    /// Runs the first pass over `chunk`.
    ///
    /// Only the chunk itself is available: other chunks may not exist yet.
    fn generate(&self, chunk: &mut Chunk, ctx: &GenContext) -> Result<(), GeneratorError> {
        let _ = (chunk, ctx);
        Ok(())
    }

    /// Runs the second pass over the target chunk of `view`.
    fn decorate(&self, view: &mut ChunkView, ctx: &GenContext) -> Result<(), GeneratorError> {
        let _ = (view, ctx);
        Ok(())
    }

    /// Prints debug information about the generator using the provided buffer.
    fn debug_info(&self, buf: &mut String) {
        buf.push_str(self.name());
    }
}

/// The session state made available to generators.
///
/// This is an explicit replacement for global state: everything a generator is allowed to
/// depend on, beside the chunk itself, is reachable from here.
#[derive(Clone, Copy)]
pub struct GenContext<'a> {
    seed: WorldSeed,
    biomes: &'a dyn BiomeProvider,
}

impl<'a> GenContext<'a> {
    /// Creates a new [`GenContext`].
    #[inline]
    pub fn new(seed: WorldSeed, biomes: &'a dyn BiomeProvider) -> Self {
        Self { seed, biomes }
    }

    /// Returns the seed of the world.
    #[inline]
    pub fn seed(&self) -> WorldSeed {
        self.seed
    }

    /// Returns the climate at the provided block column.
    ///
    /// # Errors
    ///
    /// Fails with [`GeneratorError::InvalidBiomeData`] if the biome provider returned values
    /// outside of the `[0, 1]` range.
    pub fn climate_at(&self, x: i32, z: i32) -> Result<Climate, GeneratorError> {
        let climate = self.biomes.climate_at(x, z);
        if climate.is_valid() {
            Ok(climate)
        } else {
            Err(GeneratorError::InvalidBiomeData {
                x,
                z,
                temperature: climate.temperature,
                humidity: climate.humidity,
            })
        }
    }

    /// Returns the biome at the provided block column.
    ///
    /// # Errors
    ///
    /// See [`GenContext::climate_at`].
    #[inline]
    pub fn biome_at(&self, x: i32, z: i32) -> Result<Biome, GeneratorError> {
        self.climate_at(x, z).map(Biome::from_climate)
    }

    /// Returns a random number generator seeded from the world seed, a chunk position and a
    /// `salt` unique to the caller.
    #[inline]
    pub fn rng(&self, pos: ChunkPos, salt: u64) -> DefaultRng {
        DefaultRng::from_seed(self.seed.hash_coords(salt, &[pos.x, pos.y, pos.z]))
    }

    /// Returns a hash of the world seed, a block column and a `salt` unique to the caller.
    #[inline]
    pub fn column_hash(&self, x: i32, z: i32, salt: u64) -> u64 {
        self.seed.hash_coords(salt, &[x, z])
    }
}
