use glam::IVec3;
use strata_core::{BlockId, ChunkPos};

/// An error that occurs when the [`ChunkGeneratorManager`] is misconfigured.
///
/// [`ChunkGeneratorManager`]: crate::ChunkGeneratorManager
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A chunk has already been generated; the configuration is frozen.
    #[error("generation has already started, the world configuration can no longer change")]
    GenerationStarted,
    /// The same generator (or one with the same name) is already registered.
    #[error("generator `{0}` is already registered")]
    DuplicateGenerator(String),
    /// No world seed was set before generating.
    #[error("no world seed was set")]
    MissingSeed,
    /// No biome provider was set before generating.
    #[error("no biome provider was set")]
    MissingBiomeProvider,
}

/// An error returned by a single [`ChunkGenerator`].
///
/// [`ChunkGenerator`]: crate::ChunkGenerator
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeneratorError {
    /// The biome provider returned a climate outside of the `[0, 1]` range.
    #[error("invalid biome data at ({x}, {z}): temperature = {temperature}, humidity = {humidity}")]
    InvalidBiomeData {
        x: i32,
        z: i32,
        temperature: f32,
        humidity: f32,
    },
    /// A first-pass generator wrote a block reserved to the second pass.
    #[error("decoration block {block:?} written at {at} during the first pass")]
    DecorationInFirstPass { block: BlockId, at: IVec3 },
    /// Any other failure.
    #[error("{0}")]
    Custom(String),
}

/// An error returned by a generation pass.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A generator failed. The chunk was not modified.
    #[error("generator `{generator}` failed on chunk {pos}")]
    Generator {
        pos: ChunkPos,
        generator: String,
        #[source]
        source: GeneratorError,
    },
    /// The chunk lies outside of the generated world (see [`ChunkPos::is_in_bounds`]).
    #[error("chunk {0} is outside of the generated world")]
    OutOfBounds(ChunkPos),
    #[error("the second pass of chunk {pos} was given a view centered on {view}")]
    ViewMismatch { pos: ChunkPos, view: ChunkPos },
    #[error("chunk {0} did not go through the first pass")]
    ChunkNotGenerated(ChunkPos),
    #[error("chunk {0} has already been decorated")]
    AlreadyDecorated(ChunkPos),
    #[error("the view has a radius of {radius} but the pipeline requires {required}")]
    ViewTooSmall { radius: u32, required: u32 },
    #[error("neighbor {0} is missing from the view")]
    MissingNeighbor(ChunkPos),
    #[error("neighbor {0} did not go through the first pass")]
    NeighborNotGenerated(ChunkPos),
}
