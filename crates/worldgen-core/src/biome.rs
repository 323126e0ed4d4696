/// A biome classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Biome {
    Mountains,
    Snow,
    Desert,
    Forest,
    Plains,
}

impl Biome {
    /// Every biome, in declaration order.
    pub const ALL: [Biome; 5] = [
        Biome::Mountains,
        Biome::Snow,
        Biome::Desert,
        Biome::Forest,
        Biome::Plains,
    ];

    /// Classifies a climate.
    ///
    /// The climate is expected to be valid (see [`Climate::is_valid`]).
    pub fn from_climate(Climate {
        temperature: t,
        humidity: h,
    }: Climate) -> Self {
        if t >= 0.5 && h < 0.3 {
            Biome::Desert
        } else if (0.3..=0.6).contains(&h) && t >= 0.5 {
            Biome::Plains
        } else if t <= 0.3 && h > 0.5 {
            Biome::Snow
        } else if (0.2..=0.6).contains(&h) && t < 0.5 {
            Biome::Mountains
        } else {
            Biome::Forest
        }
    }
}

/// The climate at some horizontal position.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Climate {
    /// The temperature, from `0.0` (frozen) to `1.0` (scorching).
    pub temperature: f32,
    /// The humidity, from `0.0` (arid) to `1.0` (soaked).
    pub humidity: f32,
}

impl Climate {
    /// Creates a new [`Climate`].
    #[inline]
    pub const fn new(temperature: f32, humidity: f32) -> Self {
        Self {
            temperature,
            humidity,
        }
    }

    /// Whether both values are in the `[0, 1]` range.
    #[inline]
    pub fn is_valid(&self) -> bool {
        (0.0..=1.0).contains(&self.temperature) && (0.0..=1.0).contains(&self.humidity)
    }
}

/// Maps horizontal world coordinates to a climate, and thus to a [`Biome`].
///
/// # Purity
///
/// Implementations must be pure functions of their input (and of whatever seed they were built
/// with). They are shared between every generation thread.
pub trait BiomeProvider: Send + Sync {
    /// Returns the temperature at the provided block column.
    fn temperature_at(&self, x: i32, z: i32) -> f32;

    /// Returns the humidity at the provided block column.
    fn humidity_at(&self, x: i32, z: i32) -> f32;

    /// Returns the climate at the provided block column.
    #[inline]
    fn climate_at(&self, x: i32, z: i32) -> Climate {
        Climate::new(self.temperature_at(x, z), self.humidity_at(x, z))
    }

    /// Returns the biome at the provided block column.
    #[inline]
    fn biome_at(&self, x: i32, z: i32) -> Biome {
        Biome::from_climate(self.climate_at(x, z))
    }
}
