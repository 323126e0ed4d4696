use strata_rng::noises::{Fbm, Perlin2};
use strata_rng::{DefaultRng, FromRng, Noise, Rng};
use strata_worldgen_core::{BiomeProvider, Climate, WorldSeed};

/// The salt used to derive the seed of a [`StandardBiomeProvider`] from the world seed.
const SALT: u64 = const_fnv1a_hash::fnv1a_hash_str_64("standard_biomes");

/// The standard [`BiomeProvider`] implementation.
///
/// Temperature and humidity are two independent fractal noises, mapped to the `[0, 1]` range.
#[derive(Debug, Clone)]
pub struct StandardBiomeProvider {
    temperature: Fbm<Perlin2, 4>,
    humidity: Fbm<Perlin2, 4>,
}

impl StandardBiomeProvider {
    /// The frequency of the temperature map. Climate zones are a few hundred blocks wide.
    pub const TEMPERATURE_FREQUENCY: f32 = 1.0 / 512.0;
    /// The frequency of the humidity map.
    pub const HUMIDITY_FREQUENCY: f32 = 1.0 / 384.0;
    /// How much the noise is stretched before being clamped to `[0, 1]`.
    ///
    /// Fractal noise rarely reaches its extremes; this makes the rarer biomes show up.
    pub const CONTRAST: f32 = 1.6;

    /// Creates a provider for the provided world seed.
    pub fn new(seed: WorldSeed) -> Self {
        let mut rng = DefaultRng::from_seed(seed.hash_coords(SALT, &[]));
        Self::from_rng(&mut rng)
    }

    #[inline]
    fn remap(value: f32) -> f32 {
        (value * Self::CONTRAST * 0.5 + 0.5).clamp(0.0, 1.0)
    }
}

impl FromRng for StandardBiomeProvider {
    fn from_rng(rng: &mut impl Rng) -> Self {
        Self {
            temperature: Fbm::new(FromRng::from_rng(rng), Self::TEMPERATURE_FREQUENCY),
            humidity: Fbm::new(FromRng::from_rng(rng), Self::HUMIDITY_FREQUENCY),
        }
    }
}

impl BiomeProvider for StandardBiomeProvider {
    #[inline]
    fn temperature_at(&self, x: i32, z: i32) -> f32 {
        Self::remap(self.temperature.sample([x as f32, z as f32]))
    }

    #[inline]
    fn humidity_at(&self, x: i32, z: i32) -> f32 {
        Self::remap(self.humidity.sample([x as f32, z as f32]))
    }
}

/// A [`BiomeProvider`] that returns the same climate everywhere.
///
/// # Remarks
///
/// The climate is not validated, which makes it possible to exercise the failure path of
/// generators.
#[derive(Debug, Clone, Copy)]
pub struct FixedBiomeProvider {
    pub climate: Climate,
}

impl FixedBiomeProvider {
    /// Creates a new [`FixedBiomeProvider`].
    #[inline]
    pub const fn new(temperature: f32, humidity: f32) -> Self {
        Self {
            climate: Climate::new(temperature, humidity),
        }
    }
}

impl BiomeProvider for FixedBiomeProvider {
    #[inline]
    fn temperature_at(&self, _x: i32, _z: i32) -> f32 {
        self.climate.temperature
    }

    #[inline]
    fn humidity_at(&self, _x: i32, _z: i32) -> f32 {
        self.climate.humidity
    }

    #[inline]
    fn climate_at(&self, _x: i32, _z: i32) -> Climate {
        self.climate
    }
}
