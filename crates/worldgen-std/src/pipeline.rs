use std::sync::Arc;

use strata_worldgen_core::{BiomeProvider, ChunkGeneratorManager, ConfigError, WorldSeed};
use strata_worldgen_structure::StructureError;

use crate::{
    BiomeConfig, FixedBiomeProvider, FlatTerrain, NoCaves, NoiseTerrain, OreSeeder,
    StandardBiomeProvider, TerrainKind, TreeDecorator, WorldGenConfig,
};

/// An error that occurs when assembling a pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Structure(#[from] StructureError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Builds the biome provider described by `config`.
pub fn build_biome_provider(config: &BiomeConfig, seed: WorldSeed) -> Arc<dyn BiomeProvider> {
    match *config {
        BiomeConfig::Standard => Arc::new(StandardBiomeProvider::new(seed)),
        BiomeConfig::Fixed {
            temperature,
            humidity,
        } => Arc::new(FixedBiomeProvider::new(temperature, humidity)),
    }
}

/// Builds a configured [`ChunkGeneratorManager`] running the pipeline described by `config`.
///
/// Generators are registered in the order terrain, caves, ores, trees. Disabled stages are
/// either skipped or replaced by a no-op generator.
pub fn build_manager(
    config: &WorldGenConfig,
    seed: WorldSeed,
) -> Result<ChunkGeneratorManager, PipelineError> {
    let mut manager = ChunkGeneratorManager::new();
    manager.set_world_seed(seed)?;
    manager.set_world_biome_provider(build_biome_provider(&config.biomes, seed))?;

    match config.terrain {
        TerrainKind::Flat => manager.register_chunk_generator(Arc::new(FlatTerrain {
            sea_level: config.sea_level,
        }))?,
        TerrainKind::Noise => manager.register_chunk_generator(Arc::new(NoiseTerrain {
            sea_level: config.sea_level,
        }))?,
    }

    match config.caves {
        Some(caves) => manager.register_chunk_generator(Arc::new(caves))?,
        None => manager.register_chunk_generator(Arc::new(NoCaves))?,
    }

    if !config.ores.is_empty() {
        manager.register_chunk_generator(Arc::new(OreSeeder::new(config.ores.clone())))?;
    }

    if let Some(trees) = config.trees {
        manager.register_chunk_generator(Arc::new(TreeDecorator::new(trees.density)?))?;
    }

    log::debug!(
        "built a pipeline of {} generators (halo {})",
        manager.base_chunk_generators().len(),
        manager.required_halo(),
    );
    Ok(manager)
}
