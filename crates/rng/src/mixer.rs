use std::ops::BitXor;

use crate::{FromRng, Noise, Rng};

/// Contains the state required to mix `N` numbers into a single well-distributed one.
///
/// This is the building block of every position-keyed random decision: mixing the same inputs
/// always yields the same output.
#[derive(Debug, Clone)]
pub struct Mixer<const N: usize> {
    /// The initial value used to hash the input numbers.
    pub init: u64,
    /// A bunch of odd numbers used to multiply the input numbers with.
    pub multipliers: [u64; N],
}

impl<const N: usize> FromRng for Mixer<N> {
    fn from_rng(rng: &mut impl Rng) -> Self {
        Self {
            init: rng.next_u64(),
            // Odd multipliers are invertible modulo 2^64, which keeps the mapping bijective.
            multipliers: std::array::from_fn(|_| rng.next_u64() | 1),
        }
    }
}

impl<const N: usize> Mixer<N> {
    /// Mixes the provided input numbers into a single one.
    pub fn mix_u64(&self, input: [u64; N]) -> u64 {
        self.mix_impl(input.into_iter())
    }

    /// Mixes the provided input numbers into a single one.
    pub fn mix_i32(&self, input: [i32; N]) -> u64 {
        self.mix_impl(input.into_iter().map(|x| x as u32 as u64))
    }

    fn mix_impl(&self, input: impl Iterator<Item = u64>) -> u64 {
        let mut ret = self.init;
        for (t, p) in input.zip(self.multipliers) {
            ret = ret.rotate_left(5).bitxor(t).wrapping_mul(p);
        }
        crate::utility::splitmix64(ret)
    }
}

impl<const N: usize> Noise<[i32; N]> for Mixer<N> {
    type Output = u64;

    #[inline]
    fn sample(&self, input: [i32; N]) -> Self::Output {
        self.mix_i32(input)
    }
}
