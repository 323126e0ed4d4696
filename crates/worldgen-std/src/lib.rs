//! The standard world generator.
//!
//! This crate provides the generators, biome providers and storage a world needs on top of the
//! pipeline defined by `strata-worldgen-core`. The usual pipeline, in registration order, is:
//!
//! 1. [`NoiseTerrain`] (or [`FlatTerrain`]) lays out stone, soil and water.
//! 2. [`NoiseCaves`] (or [`NoCaves`]) carves tunnels through the terrain.
//! 3. [`OreSeeder`] replaces some of the remaining stone with ores.
//! 4. [`TreeDecorator`] plants trees during the second pass.
//!
//! [`build_manager`] assembles that pipeline from a [`WorldGenConfig`].

mod caves;
mod climate;
mod config;
mod ores;
mod pipeline;
mod store;
mod terrain;
mod trees;

pub use caves::*;
pub use climate::*;
pub use config::*;
pub use ores::*;
pub use pipeline::*;
pub use store::*;
pub use terrain::*;
pub use trees::*;
