//! This crate defines the two-pass chunk generation pipeline shared by every world generator.
//!
//! # Overview
//!
//! A [`ChunkGeneratorManager`] owns the [`WorldSeed`], the [`BiomeProvider`] and an ordered list
//! of [`ChunkGenerator`]s. Chunks go through two passes:
//!
//! 1. [`ChunkGeneratorManager::generate_chunk`] runs every first-pass generator over a fresh
//!    chunk. This pass only depends on the position of the chunk, which means chunks may be
//!    generated in any order and from any thread.
//!
//! 2. [`ChunkGeneratorManager::second_pass_chunk`] runs every second-pass generator through a
//!    [`ChunkView`], which can read the neighbors of the chunk but only write to the chunk
//!    itself.

mod biome;
pub use biome::*;

mod error;
pub use error::*;

mod generator;
pub use generator::*;

mod manager;
pub use manager::*;

mod seed;
pub use seed::*;

mod view;
pub use view::*;
