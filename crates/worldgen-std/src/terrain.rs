use glam::IVec2;
use serde::{Deserialize, Serialize};
use strata_core::{BlockId, Chunk, LocalPos};
use strata_rng::noises::{Fbm, Perlin2};
use strata_rng::utility::floor_i32;
use strata_rng::{DefaultRng, FromRng, Noise, Rng};
use strata_worldgen_core::{Biome, ChunkGenerator, GenContext, GeneratorError};

/// Fills everything below `sea_level` with stone.
///
/// # Dependencies
///
/// Reads nothing; every block of the chunk is overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatTerrain {
    /// The world-space Y coordinate of the first air layer.
    pub sea_level: i32,
}

impl ChunkGenerator for FlatTerrain {
    fn name(&self) -> &str {
        "flat_terrain"
    }

    #[profiling::function]
    fn generate(&self, chunk: &mut Chunk, _ctx: &GenContext) -> Result<(), GeneratorError> {
        let origin_y = chunk.pos().origin().y;
        let local_sea = self.sea_level - origin_y;

        if local_sea <= 0 {
            chunk.fill(BlockId::Air);
        } else if local_sea >= Chunk::SIDE_Y {
            chunk.fill(BlockId::Stone);
        } else {
            chunk.fill(BlockId::Air);
            for y in 0..local_sea {
                for pos in LocalPos::iter_layer(y) {
                    chunk.set_block(pos, BlockId::Stone);
                }
            }
        }

        Ok(())
    }
}

/// The terrain parameters of a biome.
#[derive(Debug, Clone, Copy)]
struct BiomeTerrain {
    /// The average height of the terrain, relative to the sea level.
    base: f32,
    /// How far the terrain may deviate from `base`.
    amplitude: f32,
    /// The block found at the top of each column.
    surface: BlockId,
    /// The block found right under the surface.
    filler: BlockId,
    /// The number of filler blocks under the surface.
    filler_depth: i32,
}

impl BiomeTerrain {
    fn of(biome: Biome) -> Self {
        match biome {
            Biome::Plains => Self {
                base: 3.0,
                amplitude: 6.0,
                surface: BlockId::Grass,
                filler: BlockId::Dirt,
                filler_depth: 3,
            },
            Biome::Forest => Self {
                base: 5.0,
                amplitude: 9.0,
                surface: BlockId::Grass,
                filler: BlockId::Dirt,
                filler_depth: 4,
            },
            Biome::Desert => Self {
                base: 2.0,
                amplitude: 5.0,
                surface: BlockId::Sand,
                filler: BlockId::Sandstone,
                filler_depth: 5,
            },
            Biome::Snow => Self {
                base: 6.0,
                amplitude: 10.0,
                surface: BlockId::Snow,
                filler: BlockId::Dirt,
                filler_depth: 3,
            },
            Biome::Mountains => Self {
                base: 24.0,
                amplitude: 30.0,
                surface: BlockId::Stone,
                filler: BlockId::Stone,
                filler_depth: 1,
            },
        }
    }
}

/// The salt used to derive the height noise from the world seed.
const HEIGHT_SALT: u64 = const_fnv1a_hash::fnv1a_hash_str_64("noise_terrain");

/// The distance between two height samples. Heights in between are interpolated.
const LATTICE: i32 = 4;

/// The number of lattice points along one side of a chunk, borders included.
const LATTICE_SIDE: usize = (Chunk::SIDE_X / LATTICE) as usize + 1;

/// The distance between two climate samples used to blend biome parameters.
const CLIMATE_SPACING: i32 = 8;

/// Mountains taller than this (relative to the sea level) are capped with snow.
const SNOW_LINE: i32 = 40;

/// A biome-blended height field.
///
/// # Dependencies
///
/// Reads nothing; every block of the chunk is overwritten. Fails with
/// [`GeneratorError::InvalidBiomeData`] if the biome provider returns an invalid climate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoiseTerrain {
    /// The world-space Y coordinate of the water surface.
    pub sea_level: i32,
}

impl NoiseTerrain {
    /// The frequency of the height noise.
    pub const FREQUENCY: f32 = 1.0 / 128.0;

    /// Builds the height noise for the provided world.
    fn height_noise(ctx: &GenContext) -> Fbm<Perlin2, 4> {
        let mut rng = DefaultRng::from_seed(ctx.seed().hash_coords(HEIGHT_SALT, &[]));
        Fbm::new(FromRng::from_rng(&mut rng), Self::FREQUENCY)
    }

    /// Computes the height of the terrain at a lattice point, blending the parameters of the
    /// biomes around it.
    fn lattice_height(
        &self,
        noise: &Fbm<Perlin2, 4>,
        ctx: &GenContext,
        pos: IVec2,
    ) -> Result<f32, GeneratorError> {
        let mut base = 0.0;
        let mut amplitude = 0.0;

        for dx in -1..=1 {
            for dz in -1..=1 {
                let biome = ctx.biome_at(pos.x + dx * CLIMATE_SPACING, pos.y + dz * CLIMATE_SPACING)?;
                let params = BiomeTerrain::of(biome);
                base += params.base;
                amplitude += params.amplitude;
            }
        }

        let n = noise.sample([pos.x as f32, pos.y as f32]);
        Ok(self.sea_level as f32 + (base + amplitude * n) / 9.0)
    }

    /// Computes the surface height of every column of the chunk, indexed like
    /// [`LocalPos::column_index`].
    #[profiling::function]
    fn height_stage(&self, chunk_xz: IVec2, ctx: &GenContext) -> Result<[i32; Chunk::COLUMNS], GeneratorError> {
        let noise = Self::height_noise(ctx);
        let origin = chunk_xz * IVec2::new(Chunk::SIDE_X, Chunk::SIDE_Z);
        let lattice_origin = origin.div_euclid(IVec2::splat(LATTICE));

        let mut lattice = [[0.0f32; LATTICE_SIDE]; LATTICE_SIDE];
        for (i, row) in lattice.iter_mut().enumerate() {
            for (j, h) in row.iter_mut().enumerate() {
                let p = (lattice_origin + IVec2::new(i as i32, j as i32)) * LATTICE;
                *h = self.lattice_height(&noise, ctx, p)?;
            }
        }

        #[inline]
        fn interpolate(a: f32, b: f32, x: f32) -> f32 {
            let x2 = x * x;
            let f = 3.0 * x2 - 2.0 * x2 * x;
            a * (1.0 - f) + b * f
        }

        let mut ret = [0; Chunk::COLUMNS];
        for pos in LocalPos::iter_layer(0) {
            let (i, fx) = (pos.x() / LATTICE, pos.x() % LATTICE);
            let (j, fz) = (pos.z() / LATTICE, pos.z() % LATTICE);
            let (i, j) = (i as usize, j as usize);

            let x = fx as f32 * (1.0 / LATTICE as f32);
            let z = fz as f32 * (1.0 / LATTICE as f32);

            ret[pos.column_index()] = floor_i32(interpolate(
                interpolate(lattice[i][j], lattice[i + 1][j], x),
                interpolate(lattice[i][j + 1], lattice[i + 1][j + 1], x),
                z,
            ));
        }

        Ok(ret)
    }
}

impl ChunkGenerator for NoiseTerrain {
    fn name(&self) -> &str {
        "noise_terrain"
    }

    #[profiling::function]
    fn generate(&self, chunk: &mut Chunk, ctx: &GenContext) -> Result<(), GeneratorError> {
        let chunk_pos = chunk.pos();
        let origin = chunk_pos.origin();
        let heights = self.height_stage(chunk_pos.xz(), ctx)?;

        for column in LocalPos::iter_layer(0) {
            let x = origin.x + column.x();
            let z = origin.z + column.z();
            let height = heights[column.column_index()];
            let params = BiomeTerrain::of(ctx.biome_at(x, z)?);

            let underwater = height < self.sea_level;
            let surface = if underwater {
                if height >= self.sea_level - 3 {
                    BlockId::Sand
                } else {
                    BlockId::Gravel
                }
            } else if params.surface == BlockId::Stone && height >= self.sea_level + SNOW_LINE {
                BlockId::Snow
            } else {
                params.surface
            };

            for pos in column.iter_column() {
                let y = origin.y + pos.y();
                let block = if y > height {
                    if y < self.sea_level {
                        BlockId::Water
                    } else {
                        BlockId::Air
                    }
                } else if y == height {
                    surface
                } else if y > height - params.filler_depth - 1 {
                    params.filler
                } else {
                    BlockId::Stone
                };
                chunk.set_block(pos, block);
            }
        }

        Ok(())
    }

    fn debug_info(&self, buf: &mut String) {
        use std::fmt::Write;
        let _ = write!(buf, "noise_terrain (sea level {})", self.sea_level);
    }
}
