//! Continuous noise functions.

mod perlin;
pub use perlin::*;

mod fbm;
pub use fbm::*;
