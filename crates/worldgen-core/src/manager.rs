use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use strata_core::{Chunk, ChunkPos, ChunkState};

use crate::{
    BiomeProvider, ChunkGenerator, ChunkView, ConfigError, GenContext, GenerationError,
    GeneratorError, Passes, WorldSeed,
};

/// Turns chunk positions into generated, then decorated, chunks.
///
/// # Lifecycle
///
/// The manager is first configured through `&mut self` methods: [`set_world_seed`],
/// [`set_world_biome_provider`] and [`register_chunk_generator`]. Once the first chunk is
/// generated, the configuration is frozen and those methods fail with
/// [`ConfigError::GenerationStarted`].
///
/// Generation itself only needs `&self`, and the manager may be shared between threads.
///
/// [`set_world_seed`]: ChunkGeneratorManager::set_world_seed
/// [`set_world_biome_provider`]: ChunkGeneratorManager::set_world_biome_provider
/// [`register_chunk_generator`]: ChunkGeneratorManager::register_chunk_generator
#[derive(Default)]
pub struct ChunkGeneratorManager {
    /// The seed of the world.
    seed: Option<WorldSeed>,
    /// The biome provider shared by every generator.
    biome_provider: Option<Arc<dyn BiomeProvider>>,
    /// The registered generators, in registration order.
    generators: Vec<Arc<dyn ChunkGenerator>>,
    /// Whether a pass has been requested already.
    started: AtomicBool,
}

impl ChunkGeneratorManager {
    /// Creates a new unconfigured [`ChunkGeneratorManager`].
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails if generation has already started.
    fn ensure_configurable(&self, what: &str) -> Result<(), ConfigError> {
        if self.is_generation_started() {
            log::warn!("rejected attempt to change the {what} after generation started");
            Err(ConfigError::GenerationStarted)
        } else {
            Ok(())
        }
    }

    /// Sets the seed of the world.
    ///
    /// # Errors
    ///
    /// Fails with [`ConfigError::GenerationStarted`] if a chunk has already been requested.
    pub fn set_world_seed(&mut self, seed: WorldSeed) -> Result<(), ConfigError> {
        self.ensure_configurable("world seed")?;
        log::debug!("world seed set to {seed}");
        self.seed = Some(seed);
        Ok(())
    }

    /// Sets the biome provider of the world.
    ///
    /// # Errors
    ///
    /// Fails with [`ConfigError::GenerationStarted`] if a chunk has already been requested.
    pub fn set_world_biome_provider(
        &mut self,
        provider: Arc<dyn BiomeProvider>,
    ) -> Result<(), ConfigError> {
        self.ensure_configurable("biome provider")?;
        log::debug!("biome provider set");
        self.biome_provider = Some(provider);
        Ok(())
    }

    /// Appends a generator to the pipeline.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::GenerationStarted`] if a chunk has already been requested.
    ///
    /// - [`ConfigError::DuplicateGenerator`] if this exact generator, or one with the same name,
    ///   is already registered.
    ///
    /// The pipeline is left unchanged on error.
    pub fn register_chunk_generator(
        &mut self,
        generator: Arc<dyn ChunkGenerator>,
    ) -> Result<(), ConfigError> {
        self.ensure_configurable("generator pipeline")?;

        let duplicate = self.generators.iter().any(|g| {
            std::ptr::addr_eq(Arc::as_ptr(g), Arc::as_ptr(&generator)) || g.name() == generator.name()
        });

        if duplicate {
            log::warn!("generator `{}` is already registered", generator.name());
            return Err(ConfigError::DuplicateGenerator(generator.name().to_owned()));
        }

        log::debug!(
            "registered generator #{} `{}` ({:?})",
            self.generators.len(),
            generator.name(),
            generator.passes(),
        );
        self.generators.push(generator);
        Ok(())
    }

    /// Returns the registered generators, in registration order.
    #[inline]
    pub fn base_chunk_generators(&self) -> &[Arc<dyn ChunkGenerator>] {
        &self.generators
    }

    /// Returns the seed of the world, if one was set.
    #[inline]
    pub fn world_seed(&self) -> Option<WorldSeed> {
        self.seed
    }

    /// Whether a pass has been requested already, freezing the configuration.
    #[inline]
    pub fn is_generation_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    /// Returns the smallest view radius accepted by [`ChunkGeneratorManager::second_pass_chunk`].
    pub fn required_halo(&self) -> u32 {
        self.generators
            .iter()
            .filter(|g| g.passes().contains(Passes::SECOND))
            .map(|g| g.halo())
            .max()
            .unwrap_or(0)
    }

    /// Builds the context passed to generators, freezing the configuration.
    fn context(&self) -> Result<GenContext<'_>, ConfigError> {
        let seed = self.seed.ok_or(ConfigError::MissingSeed)?;
        let biomes = self
            .biome_provider
            .as_deref()
            .ok_or(ConfigError::MissingBiomeProvider)?;
        self.started.store(true, Ordering::Release);
        Ok(GenContext::new(seed, biomes))
    }

    /// Runs the first pass for the chunk at `pos`.
    ///
    /// Every first-pass generator is applied in registration order on a fresh chunk. The
    /// returned chunk is in the [`ChunkState::Generated`] state.
    ///
    /// # Determinism
    ///
    /// The result only depends on the configuration of the manager and on `pos`. In particular,
    /// it does not depend on which chunks were generated before.
    ///
    /// # Errors
    ///
    /// - [`GenerationError::OutOfBounds`] if `pos` is outside of the generated world (see
    ///   [`ChunkPos::is_in_bounds`]). No generator runs.
    ///
    /// - [`GenerationError::Generator`] if a generator fails, or if it writes a decoration block
    ///   (see [`BlockId::is_decoration`]). The partially generated chunk is discarded.
    ///
    /// [`BlockId::is_decoration`]: strata_core::BlockId::is_decoration
    #[profiling::function]
    pub fn generate_chunk(&self, pos: ChunkPos) -> Result<Chunk, GenerationError> {
        if !pos.is_in_bounds() {
            return Err(GenerationError::OutOfBounds(pos));
        }

        let ctx = self.context()?;
        let mut chunk = Chunk::new(pos);

        for generator in self.first_pass() {
            profiling::scope!("generate", generator.name());
            let fail = |source| GenerationError::Generator {
                pos,
                generator: generator.name().to_owned(),
                source,
            };

            generator.generate(&mut chunk, &ctx).map_err(fail)?;

            // Decorations belong to the second pass only.
            if let Some((local, block)) = chunk.find_decoration() {
                return Err(fail(GeneratorError::DecorationInFirstPass {
                    block,
                    at: pos.origin() + local.to_ivec3(),
                }));
            }
        }

        chunk.update_height_map();
        chunk.set_state(ChunkState::Generated);
        log::trace!("generated chunk {pos}");
        Ok(chunk)
    }

    /// Runs the second pass for the chunk at `pos`, which must be the target of `view`.
    ///
    /// Every chunk of the ring of the view must be attached and must have gone through the
    /// first pass. The second pass may only run once per chunk: on success, the target moves
    /// to the [`ChunkState::Decorated`] state and further calls are rejected with
    /// [`GenerationError::AlreadyDecorated`].
    ///
    /// # Errors
    ///
    /// On error, the target chunk is left exactly as it was before the call.
    #[profiling::function]
    pub fn second_pass_chunk(
        &self,
        pos: ChunkPos,
        view: &mut ChunkView,
    ) -> Result<(), GenerationError> {
        if !pos.is_in_bounds() {
            return Err(GenerationError::OutOfBounds(pos));
        }

        if view.center() != pos {
            return Err(GenerationError::ViewMismatch {
                pos,
                view: view.center(),
            });
        }

        match view.target().state() {
            ChunkState::Empty => return Err(GenerationError::ChunkNotGenerated(pos)),
            ChunkState::Decorated => return Err(GenerationError::AlreadyDecorated(pos)),
            ChunkState::Generated => (),
        }

        let required = self.required_halo();
        if view.radius() < required {
            return Err(GenerationError::ViewTooSmall {
                radius: view.radius(),
                required,
            });
        }

        if let Some(missing) = view.missing_neighbors().next() {
            return Err(GenerationError::MissingNeighbor(missing));
        }

        if let Some(neighbor) = view.neighbors().find(|c| c.state() == ChunkState::Empty) {
            return Err(GenerationError::NeighborNotGenerated(neighbor.pos()));
        }

        let ctx = self.context()?;
        let backup = view.target().clone();

        for generator in self.second_pass() {
            profiling::scope!("decorate", generator.name());
            if let Err(source) = generator.decorate(view, &ctx) {
                *view.target_mut() = backup;
                return Err(GenerationError::Generator {
                    pos,
                    generator: generator.name().to_owned(),
                    source,
                });
            }
        }

        let target = view.target_mut();
        target.update_height_map();
        target.set_state(ChunkState::Decorated);
        log::trace!("decorated chunk {pos}");
        Ok(())
    }

    fn first_pass(&self) -> impl '_ + Iterator<Item = &Arc<dyn ChunkGenerator>> {
        self.generators
            .iter()
            .filter(|g| g.passes().contains(Passes::FIRST))
    }

    fn second_pass(&self) -> impl '_ + Iterator<Item = &Arc<dyn ChunkGenerator>> {
        self.generators
            .iter()
            .filter(|g| g.passes().contains(Passes::SECOND))
    }

    /// Prints debug information about the pipeline using the provided buffer.
    pub fn debug_info(&self, buf: &mut String) {
        use std::fmt::Write;

        match self.seed {
            Some(seed) => {
                let _ = writeln!(buf, "Seed: {seed}");
            }
            None => buf.push_str("Seed: <unset>\n"),
        }

        for (i, generator) in self.generators.iter().enumerate() {
            let _ = write!(buf, "#{i} ");
            generator.debug_info(buf);
            buf.push('\n');
        }
    }
}
