//! Pseudo-random number generators.

mod xoshiro256plusplus;
pub use xoshiro256plusplus::*;
