//! This crate defines the core content of Strata, such as [`BlockId`], [`Chunk`] and other
//! common constructs shared by the generation pipeline.

mod block;
pub use block::*;

mod chunk;
pub use chunk::*;

pub mod utility;
