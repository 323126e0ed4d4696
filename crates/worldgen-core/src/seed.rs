use std::fmt::Display;
use std::str::FromStr;

use strata_rng::utility::splitmix64;

/// The seed of a world.
///
/// Every random decision made during generation derives from this value and the coordinates
/// involved, so two worlds with the same seed are identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct WorldSeed(u64);

impl WorldSeed {
    /// Creates a seed from a raw integer.
    #[inline]
    pub const fn from_u64(value: u64) -> Self {
        Self(value)
    }

    /// Creates a seed by hashing the provided string.
    ///
    /// The hash is stable across platforms and process restarts.
    #[inline]
    pub const fn from_str_hashed(s: &str) -> Self {
        Self(const_fnv1a_hash::fnv1a_hash_str_64(s))
    }

    /// Parses a user-provided seed.
    ///
    /// Surrounding whitespace is ignored. Integers (signed or not) are used as-is. Anything else
    /// is hashed with [`WorldSeed::from_str_hashed`].
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        if let Ok(value) = trimmed.parse::<u64>() {
            Self(value)
        } else if let Ok(value) = trimmed.parse::<i64>() {
            Self(value as u64)
        } else {
            Self::from_str_hashed(trimmed)
        }
    }

    /// Returns a seed picked from system entropy.
    pub fn random() -> Self {
        Self(strata_rng::system::entropy())
    }

    /// Returns the raw value of the seed.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Hashes the seed with a `salt` and a list of coordinates.
    ///
    /// This is the root of every position-keyed random decision.
    pub fn hash_coords(self, salt: u64, coords: &[i32]) -> u64 {
        let mut h = splitmix64(self.0 ^ splitmix64(salt));
        for &c in coords {
            h = splitmix64(h ^ c as u32 as u64);
        }
        h
    }
}

impl Display for WorldSeed {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl From<u64> for WorldSeed {
    #[inline]
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl FromStr for WorldSeed {
    type Err = std::convert::Infallible;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}
