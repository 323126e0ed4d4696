use proptest::prelude::*;
use strata_core::ChunkPos;
use strata_worldgen_core::{Biome, BiomeProvider, Climate, GenContext, WorldSeed};

struct Constant(Climate);

impl BiomeProvider for Constant {
    fn temperature_at(&self, _: i32, _: i32) -> f32 {
        self.0.temperature
    }

    fn humidity_at(&self, _: i32, _: i32) -> f32 {
        self.0.humidity
    }
}

proptest! {
    #[test]
    fn integer_seeds_parse_to_themselves(value in any::<u64>()) {
        prop_assert_eq!(WorldSeed::parse(&value.to_string()), WorldSeed::from_u64(value));
        prop_assert_eq!(value.to_string().parse::<WorldSeed>().ok(), Some(WorldSeed::from_u64(value)));
    }

    #[test]
    fn coordinate_hashes_depend_on_every_input(seed in any::<u64>(), salt in any::<u64>(), x in any::<i32>(), z in any::<i32>()) {
        let s = WorldSeed::from_u64(seed);
        let h = s.hash_coords(salt, &[x, z]);
        prop_assert_eq!(h, s.hash_coords(salt, &[x, z]));
        prop_assert_ne!(h, s.hash_coords(salt, &[x.wrapping_add(1), z]));
        prop_assert_ne!(h, s.hash_coords(salt, &[x, z.wrapping_add(1)]));
        prop_assert_ne!(h, WorldSeed::from_u64(seed ^ 1).hash_coords(salt, &[x, z]));
    }

    #[test]
    fn climates_in_range_classify(t in 0.0f32..=1.0, h in 0.0f32..=1.0) {
        let provider = Constant(Climate::new(t, h));
        let ctx = GenContext::new(WorldSeed::from_u64(0), &provider);
        let biome = ctx.biome_at(0, 0).unwrap();
        prop_assert!(Biome::ALL.contains(&biome));
    }

    #[test]
    fn climates_out_of_range_fail(t in 1.001f32..10.0, h in 0.0f32..=1.0) {
        let provider = Constant(Climate::new(t, h));
        let ctx = GenContext::new(WorldSeed::from_u64(0), &provider);
        prop_assert!(ctx.biome_at(3, -7).is_err());
    }

    #[test]
    fn chunk_rngs_are_independent(seed in any::<u64>(), x in -1000..1000i32, z in -1000..1000i32) {
        use strata_rng::Rng;
        let provider = Constant(Climate::new(0.5, 0.5));
        let ctx = GenContext::new(WorldSeed::from_u64(seed), &provider);
        let a = ctx.rng(ChunkPos::new(x, 0, z), 1).next_u64();
        prop_assert_eq!(a, ctx.rng(ChunkPos::new(x, 0, z), 1).next_u64());
        prop_assert_ne!(a, ctx.rng(ChunkPos::new(x, 0, z), 2).next_u64());
    }
}
