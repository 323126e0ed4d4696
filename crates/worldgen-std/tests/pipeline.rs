use std::sync::Arc;

use strata_core::{BlockId, Chunk, ChunkPos, ChunkState, LocalPos};
use strata_worldgen_core::{ChunkGenerator, ChunkGeneratorManager, GenerationError, WorldSeed};
use strata_worldgen_std::{
    build_manager, BiomeConfig, FixedBiomeProvider, FlatTerrain, NoCaves, NoiseCaves,
    NoiseTerrain, TerrainKind, WorldGenConfig,
};

fn manager(seed: u64, generators: Vec<Arc<dyn ChunkGenerator>>) -> ChunkGeneratorManager {
    let mut m = ChunkGeneratorManager::new();
    m.set_world_seed(WorldSeed::from_u64(seed)).unwrap();
    m.set_world_biome_provider(Arc::new(FixedBiomeProvider::new(0.6, 0.4)))
        .unwrap();
    for g in generators {
        m.register_chunk_generator(g).unwrap();
    }
    m
}

fn flat_world() -> ChunkGeneratorManager {
    manager(42, vec![Arc::new(FlatTerrain { sea_level: 64 }), Arc::new(NoCaves)])
}

#[test]
fn flat_world_is_stone_below_sea_level() {
    let chunk = flat_world().generate_chunk(ChunkPos::new(0, 0, 0)).unwrap();
    assert_eq!(chunk.state(), ChunkState::Generated);

    for pos in LocalPos::iter_all() {
        let expected = if pos.y() < 64 {
            BlockId::Stone
        } else {
            BlockId::Air
        };
        assert_eq!(chunk.get_block(pos), expected, "at {:?}", pos.to_ivec3());
    }

    let again = flat_world().generate_chunk(ChunkPos::new(0, 0, 0)).unwrap();
    assert_eq!(chunk.to_bytes(), again.to_bytes());
}

#[test]
fn cave_order_matters() {
    let caves = NoiseCaves {
        threshold: 0.2,
        ..NoiseCaves::default()
    };
    let terrain = NoiseTerrain { sea_level: 64 };
    let pos = ChunkPos::new(1, 0, -2);

    let terrain_only = manager(7, vec![Arc::new(terrain)]).generate_chunk(pos).unwrap();
    let carved = manager(7, vec![Arc::new(terrain), Arc::new(caves)])
        .generate_chunk(pos)
        .unwrap();
    let swapped = manager(7, vec![Arc::new(caves), Arc::new(terrain)])
        .generate_chunk(pos)
        .unwrap();

    // Carving before the terrain exists does nothing: the terrain overwrites every block.
    assert_eq!(swapped, terrain_only);
    assert_ne!(carved, terrain_only);

    // Carving after the terrain only ever removes blocks.
    for pos in LocalPos::iter_all() {
        let before = terrain_only.get_block(pos);
        let after = carved.get_block(pos);
        assert!(after == before || after == BlockId::Air);
    }
}

#[test]
fn caves_on_empty_chunks_do_nothing() {
    let m = manager(3, vec![Arc::new(NoiseCaves::default())]);
    let chunk = m.generate_chunk(ChunkPos::new(0, 0, 0)).unwrap();
    assert!(chunk.is_empty());
}

#[test]
fn standard_pipeline_is_deterministic() {
    let config = WorldGenConfig::default();
    let a = build_manager(&config, WorldSeed::parse("determinism")).unwrap();
    let b = build_manager(&config, WorldSeed::parse("determinism")).unwrap();

    for pos in [ChunkPos::new(0, 0, 0), ChunkPos::new(-3, 0, 5), ChunkPos::new(2, -1, 0)] {
        let x = a.generate_chunk(pos).unwrap();
        let y = b.generate_chunk(pos).unwrap();
        assert_eq!(x.checksum(), y.checksum());
        assert_eq!(x, y);
    }
}

/// Checksums recorded from earlier runs. Any change means worlds saved by a previous build would
/// no longer match freshly generated chunks.
#[test]
fn standard_pipeline_matches_recorded_checksums() {
    let m = build_manager(&WorldGenConfig::default(), WorldSeed::from_u64(42)).unwrap();
    for (pos, checksum) in [
        (ChunkPos::new(0, 0, 0), 0x4026_bd7e_b18b_3ad0),
        (ChunkPos::new(3, 0, -2), 0xa10b_5c30_e300_0095),
        (ChunkPos::new(-5, 0, 7), 0xd5fb_b52d_80f2_211a),
        (ChunkPos::new(0, -1, 0), 0x0aaa_4542_bbbc_a325),
    ] {
        let chunk = m.generate_chunk(pos).unwrap();
        assert_eq!(chunk.checksum(), checksum, "chunk {pos}");
    }
}

#[test]
fn flat_world_matches_recorded_checksums() {
    let m = flat_world();
    for (pos, checksum) in [
        (ChunkPos::new(0, 0, 0), 0x3dbd_41bd_4854_6325),
        (ChunkPos::new(0, -1, 0), 0x0aaa_4542_bbbc_a325),
        (ChunkPos::new(0, 1, 0), 0x8f69_55bf_94ec_2325),
    ] {
        assert_eq!(m.generate_chunk(pos).unwrap().checksum(), checksum, "chunk {pos}");
    }
}

#[test]
fn flat_world_rejects_chunks_outside_the_world() {
    let m = flat_world();
    let pos = ChunkPos::new(200_000_000, 0, 0);
    assert_eq!(m.generate_chunk(pos), Err(GenerationError::OutOfBounds(pos)));

    let edge = m
        .generate_chunk(ChunkPos::new(ChunkPos::MAX_HORIZONTAL, 0, 0))
        .unwrap();
    assert_eq!(edge.to_bytes(), m.generate_chunk(ChunkPos::new(0, 0, 0)).unwrap().to_bytes());
}

#[test]
fn standard_pipeline_reaches_the_edge_of_the_world() {
    let m = build_manager(&WorldGenConfig::default(), WorldSeed::from_u64(42)).unwrap();
    for pos in [
        ChunkPos::new(ChunkPos::MAX_HORIZONTAL, 0, -ChunkPos::MAX_HORIZONTAL),
        ChunkPos::new(-ChunkPos::MAX_HORIZONTAL, ChunkPos::MAX_VERTICAL, 0),
    ] {
        assert_eq!(m.generate_chunk(pos).unwrap().state(), ChunkState::Generated);
    }
}

#[test]
fn first_pass_has_no_decorations() {
    let m = build_manager(&WorldGenConfig::default(), WorldSeed::from_u64(5)).unwrap();
    for pos in ChunkPos::new(0, 0, 0).iter_ring(1).filter(|p| p.y == 0) {
        let chunk = m.generate_chunk(pos).unwrap();
        let counts = chunk.block_counts();
        for block in [BlockId::Log, BlockId::Leaves, BlockId::Cactus] {
            assert_eq!(counts[block as usize], 0);
        }
    }
}

#[test]
fn invalid_climate_names_the_generator() {
    let config = WorldGenConfig {
        biomes: BiomeConfig::Fixed {
            temperature: 1.5,
            humidity: 0.5,
        },
        ..WorldGenConfig::default()
    };
    let m = build_manager(&config, WorldSeed::from_u64(1)).unwrap();
    let pos = ChunkPos::new(4, 0, 4);

    match m.generate_chunk(pos) {
        Err(GenerationError::Generator {
            pos: at, generator, ..
        }) => {
            assert_eq!(at, pos);
            assert_eq!(generator, "noise_terrain");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn flat_config() {
    let config = WorldGenConfig::from_ron_str(
        r#"(
            seed: Some("42"),
            terrain: Flat,
            caves: None,
            ores: [],
            trees: None,
        )"#,
    )
    .unwrap();
    assert_eq!(config.terrain, TerrainKind::Flat);

    let seed = config.world_seed().unwrap();
    let from_config = build_manager(&config, seed).unwrap();
    let by_hand = flat_world();
    assert_eq!(
        from_config.generate_chunk(ChunkPos::new(0, 0, 0)).unwrap(),
        by_hand.generate_chunk(ChunkPos::new(0, 0, 0)).unwrap(),
    );
}

#[test]
fn deep_chunks_are_solid() {
    let m = build_manager(&WorldGenConfig::default(), WorldSeed::from_u64(9)).unwrap();
    let chunk: Chunk = m.generate_chunk(ChunkPos::new(0, -2, 0)).unwrap();
    assert!(!chunk.is_empty());
    assert_eq!(chunk.block_counts()[BlockId::Air as usize], 0);
    assert_eq!(chunk.block_counts()[BlockId::Water as usize], 0);
}
