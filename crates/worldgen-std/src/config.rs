use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strata_worldgen_core::WorldSeed;

use crate::{NoiseCaves, OreSeeder, OreVein, TreeConfig};

/// An error that occurs when loading a [`WorldGenConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    /// The configuration file could not be read.
    #[error("failed to read `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The configuration is not valid RON, or does not describe a [`WorldGenConfig`].
    #[error("invalid world configuration: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// The shape of the terrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TerrainKind {
    /// Stone below the sea level, air above.
    Flat,
    /// Biome-blended hills, with water below the sea level.
    #[default]
    Noise,
}

/// Where the climate of the world comes from.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum BiomeConfig {
    /// Temperature and humidity noises seeded from the world seed.
    #[default]
    Standard,
    /// The same climate everywhere.
    Fixed { temperature: f32, humidity: f32 },
}

/// Describes the generation pipeline of a world.
///
/// Every field is optional in the RON representation and falls back to the standard pipeline.
///
/// ```ron
/// (
///     seed: Some("hello"),
///     terrain: Flat,
///     caves: None,
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldGenConfig {
    /// The seed of the world. A random seed is picked when absent.
    pub seed: Option<String>,
    /// The world-space Y coordinate of the sea level.
    pub sea_level: i32,
    pub terrain: TerrainKind,
    /// Cave parameters. No caves are carved when absent.
    pub caves: Option<NoiseCaves>,
    /// The ore veins, in seeding order.
    pub ores: Vec<OreVein>,
    /// Tree parameters. No trees are planted when absent.
    pub trees: Option<TreeConfig>,
    pub biomes: BiomeConfig,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            seed: None,
            sea_level: 64,
            terrain: TerrainKind::Noise,
            caves: Some(NoiseCaves::default()),
            ores: OreSeeder::default_veins(),
            trees: Some(TreeConfig::default()),
            biomes: BiomeConfig::Standard,
        }
    }
}

impl WorldGenConfig {
    /// Parses a configuration from a RON document.
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigLoadError> {
        Ok(ron::from_str(source)?)
    }

    /// Loads a configuration from a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
            path: path.to_owned(),
            source,
        })?;
        let config = Self::from_ron_str(&source)?;
        log::debug!("loaded world configuration from `{}`", path.display());
        Ok(config)
    }

    /// Serializes the configuration to a pretty RON document.
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Returns the seed of the world, if one is configured.
    pub fn world_seed(&self) -> Option<WorldSeed> {
        self.seed.as_deref().map(WorldSeed::parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips() {
        let config = WorldGenConfig::default();
        let text = config.to_ron().unwrap();
        assert_eq!(WorldGenConfig::from_ron_str(&text).unwrap(), config);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config = WorldGenConfig::from_ron_str(r#"(seed: Some("42"), terrain: Flat, caves: None)"#)
            .unwrap();
        assert_eq!(config.world_seed(), Some(WorldSeed::from_u64(42)));
        assert_eq!(config.terrain, TerrainKind::Flat);
        assert_eq!(config.caves, None);
        assert_eq!(config.sea_level, 64);
        assert_eq!(config.ores, OreSeeder::default_veins());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(matches!(
            WorldGenConfig::from_ron_str("(sea_level: 10, mountains: true)"),
            Err(ConfigLoadError::Parse(_))
        ));
    }

    #[test]
    fn missing_file() {
        let err = WorldGenConfig::load("/this/path/does/not/exist.ron").unwrap_err();
        assert!(matches!(err, ConfigLoadError::Io { .. }));
    }
}
