use crate::utility::{splitmix64, GOLDEN_GAMMA};
use crate::Rng;

/// A general-purpose pseudo-random number generator.
///
/// This number generator is based on the [xoshiro256++][source].
///
/// [source]: https://prng.di.unimi.it/xoshiro256plusplus.c
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Xoshiro256PlusPlus {
    s: [u64; 4],
}

impl Rng for Xoshiro256PlusPlus {
    fn from_seed(seed: u64) -> Self
    where
        Self: Sized,
    {
        let s = std::array::from_fn(|i| {
            splitmix64(seed.wrapping_add(GOLDEN_GAMMA.wrapping_mul(i as u64)))
        });
        Self { s }
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        let [a, b, c, d] = &mut self.s;

        let ret = a.wrapping_add(*d).rotate_left(23).wrapping_add(*a);

        let t = *b << 17;

        *c ^= *a;
        *d ^= *b;
        *b ^= *c;
        *a ^= *d;

        *c ^= t;

        *d = d.rotate_left(45);

        ret
    }
}
