use std::sync::Arc;

use glam::IVec3;
use strata_core::{BlockId, Chunk, ChunkPos, ChunkState, LocalPos};
use strata_worldgen_core::{
    BiomeProvider, ChunkGenerator, ChunkGeneratorManager, ChunkView, ConfigError, GenContext,
    GenerationError, GeneratorError, Passes, WorldSeed,
};

struct Temperate;

impl BiomeProvider for Temperate {
    fn temperature_at(&self, _: i32, _: i32) -> f32 {
        0.6
    }

    fn humidity_at(&self, _: i32, _: i32) -> f32 {
        0.4
    }
}

struct Broken;

impl BiomeProvider for Broken {
    fn temperature_at(&self, _: i32, _: i32) -> f32 {
        2.0
    }

    fn humidity_at(&self, _: i32, _: i32) -> f32 {
        0.4
    }
}

/// Fills every block below world `y = 8` with stone, and sprinkles a seeded block above.
struct Ground;

impl ChunkGenerator for Ground {
    fn name(&self) -> &str {
        "ground"
    }

    fn generate(&self, chunk: &mut Chunk, ctx: &GenContext) -> Result<(), GeneratorError> {
        ctx.climate_at(0, 0)?;
        let origin = chunk.pos().origin();
        for pos in LocalPos::iter_all() {
            if origin.y + pos.y() < 8 {
                chunk.set_block(pos, BlockId::Stone);
            }
        }
        let mut rng = ctx.rng(chunk.pos(), 1);
        let x = strata_rng::Rng::next_below(&mut rng, 16) as i32;
        chunk.set_block(LocalPos::from_xyz(x, 8, 0), BlockId::Dirt);
        Ok(())
    }
}

/// Puts a log on top of every dirt block of the target, and leaves in the neighboring columns.
struct Shrubs;

impl ChunkGenerator for Shrubs {
    fn name(&self) -> &str {
        "shrubs"
    }

    fn passes(&self) -> Passes {
        Passes::SECOND
    }

    fn halo(&self) -> u32 {
        1
    }

    fn decorate(&self, view: &mut ChunkView, _: &GenContext) -> Result<(), GeneratorError> {
        let origin = view.center().origin();
        for x in -1..=16 {
            let root = origin + IVec3::new(x, 8, 0);
            if view.get_block(root) == Some(BlockId::Dirt) {
                view.place_decoration(root + IVec3::Y, BlockId::Log);
                view.place_decoration(root + IVec3::new(1, 1, 0), BlockId::Leaves);
                view.place_decoration(root + IVec3::new(-1, 1, 0), BlockId::Leaves);
            }
        }
        Ok(())
    }
}

/// Plants a log during the first pass.
struct EarlyLog;

impl ChunkGenerator for EarlyLog {
    fn name(&self) -> &str {
        "early_log"
    }

    fn generate(&self, chunk: &mut Chunk, _: &GenContext) -> Result<(), GeneratorError> {
        chunk.set_block(LocalPos::from_xyz(2, 9, 3), BlockId::Log);
        Ok(())
    }
}

/// Writes garbage, then fails.
struct Faulty;

impl ChunkGenerator for Faulty {
    fn name(&self) -> &str {
        "faulty"
    }

    fn passes(&self) -> Passes {
        Passes::FIRST | Passes::SECOND
    }

    fn generate(&self, chunk: &mut Chunk, _: &GenContext) -> Result<(), GeneratorError> {
        chunk.fill(BlockId::Gravel);
        Err(GeneratorError::Custom("nope".into()))
    }

    fn decorate(&self, view: &mut ChunkView, _: &GenContext) -> Result<(), GeneratorError> {
        let origin = view.center().origin();
        view.set_block(origin, BlockId::Gravel);
        Err(GeneratorError::Custom("nope".into()))
    }
}

fn manager(generators: Vec<Arc<dyn ChunkGenerator>>) -> ChunkGeneratorManager {
    let mut m = ChunkGeneratorManager::new();
    m.set_world_seed(WorldSeed::from_u64(42)).unwrap();
    m.set_world_biome_provider(Arc::new(Temperate)).unwrap();
    for g in generators {
        m.register_chunk_generator(g).unwrap();
    }
    m
}

fn generate_ring(m: &ChunkGeneratorManager, center: ChunkPos, radius: u32) -> Vec<Chunk> {
    center
        .iter_ring(radius)
        .map(|pos| m.generate_chunk(pos).unwrap())
        .collect()
}

/// Runs the second pass on the chunk at `center`, which must be part of `chunks`.
fn decorate(
    m: &ChunkGeneratorManager,
    chunks: &mut [Chunk],
    center: ChunkPos,
) -> Result<(), GenerationError> {
    let index = chunks.iter().position(|c| c.pos() == center).unwrap();
    let (before, rest) = chunks.split_at_mut(index);
    let (target, after) = rest.split_first_mut().unwrap();
    let mut view = ChunkView::new(target, 1);
    for neighbor in before.iter().chain(after.iter()) {
        view.insert_neighbor(neighbor);
    }
    m.second_pass_chunk(center, &mut view)
}

#[test]
fn duplicate_registration_is_rejected() {
    let ground: Arc<dyn ChunkGenerator> = Arc::new(Ground);
    let mut m = manager(vec![ground.clone()]);

    assert_eq!(
        m.register_chunk_generator(ground),
        Err(ConfigError::DuplicateGenerator("ground".into()))
    );
    assert_eq!(
        m.register_chunk_generator(Arc::new(Ground)),
        Err(ConfigError::DuplicateGenerator("ground".into()))
    );
    assert_eq!(m.base_chunk_generators().len(), 1);
}

#[test]
fn registry_keeps_registration_order() {
    let m = manager(vec![Arc::new(Ground), Arc::new(Shrubs), Arc::new(Faulty)]);
    let names: Vec<_> = m.base_chunk_generators().iter().map(|g| g.name()).collect();
    assert_eq!(names, ["ground", "shrubs", "faulty"]);
    assert_eq!(m.required_halo(), 1);
}

#[test]
fn configuration_is_frozen_after_generation() {
    let mut m = manager(vec![Arc::new(Ground)]);
    m.generate_chunk(ChunkPos::new(0, 0, 0)).unwrap();

    assert!(m.is_generation_started());
    assert_eq!(
        m.set_world_seed(WorldSeed::from_u64(1)),
        Err(ConfigError::GenerationStarted)
    );
    assert_eq!(
        m.set_world_biome_provider(Arc::new(Temperate)),
        Err(ConfigError::GenerationStarted)
    );
    assert_eq!(
        m.register_chunk_generator(Arc::new(Shrubs)),
        Err(ConfigError::GenerationStarted)
    );
    assert_eq!(m.base_chunk_generators().len(), 1);
    assert_eq!(m.world_seed(), Some(WorldSeed::from_u64(42)));
}

#[test]
fn missing_configuration() {
    let mut m = ChunkGeneratorManager::new();
    assert_eq!(
        m.generate_chunk(ChunkPos::new(0, 0, 0)),
        Err(GenerationError::Config(ConfigError::MissingSeed))
    );
    m.set_world_seed(WorldSeed::from_u64(0)).unwrap();
    assert_eq!(
        m.generate_chunk(ChunkPos::new(0, 0, 0)),
        Err(GenerationError::Config(ConfigError::MissingBiomeProvider))
    );
    assert!(!m.is_generation_started());
}

#[test]
fn empty_pipeline_generates_air() {
    let m = manager(Vec::new());
    let chunk = m.generate_chunk(ChunkPos::new(3, 1, -3)).unwrap();
    assert!(chunk.is_empty());
    assert_eq!(chunk.state(), ChunkState::Generated);
}

#[test]
fn generation_is_position_independent() {
    let m = manager(vec![Arc::new(Ground)]);
    let a = m.generate_chunk(ChunkPos::new(5, 0, 5)).unwrap();
    let b = m.generate_chunk(ChunkPos::new(3, 0, 3)).unwrap();

    let m = manager(vec![Arc::new(Ground)]);
    let b2 = m.generate_chunk(ChunkPos::new(3, 0, 3)).unwrap();
    let a2 = m.generate_chunk(ChunkPos::new(5, 0, 5)).unwrap();

    assert_eq!(a, a2);
    assert_eq!(b, b2);
    assert_eq!(a.checksum(), a2.checksum());
}

#[test]
fn generator_failure_discards_the_chunk() {
    let m = manager(vec![Arc::new(Faulty)]);
    let err = m.generate_chunk(ChunkPos::new(1, 2, 3)).unwrap_err();
    assert_eq!(
        err,
        GenerationError::Generator {
            pos: ChunkPos::new(1, 2, 3),
            generator: "faulty".into(),
            source: GeneratorError::Custom("nope".into()),
        }
    );
}

#[test]
fn invalid_biome_data_is_reported() {
    let mut m = ChunkGeneratorManager::new();
    m.set_world_seed(WorldSeed::from_u64(42)).unwrap();
    m.set_world_biome_provider(Arc::new(Broken)).unwrap();
    m.register_chunk_generator(Arc::new(Ground)).unwrap();

    match m.generate_chunk(ChunkPos::new(0, 0, 0)) {
        Err(GenerationError::Generator {
            generator, source, ..
        }) => {
            assert_eq!(generator, "ground");
            assert!(matches!(source, GeneratorError::InvalidBiomeData { .. }));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn first_pass_has_no_decorations() {
    let m = manager(vec![Arc::new(Ground), Arc::new(Shrubs)]);
    let chunk = m.generate_chunk(ChunkPos::new(0, 0, 0)).unwrap();
    assert!(LocalPos::iter_all().all(|p| !chunk.get_block(p).is_decoration()));
}

#[test]
fn first_pass_rejects_decoration_blocks() {
    let m = manager(vec![Arc::new(Ground), Arc::new(EarlyLog)]);
    let pos = ChunkPos::new(1, 0, -1);
    assert_eq!(
        m.generate_chunk(pos),
        Err(GenerationError::Generator {
            pos,
            generator: "early_log".into(),
            source: GeneratorError::DecorationInFirstPass {
                block: BlockId::Log,
                at: IVec3::new(18, 9, -13),
            },
        })
    );
}

#[test]
fn chunks_outside_the_world_are_rejected() {
    let m = manager(vec![Arc::new(Ground), Arc::new(Shrubs)]);

    let edge = ChunkPos::new(
        ChunkPos::MAX_HORIZONTAL,
        -ChunkPos::MAX_VERTICAL,
        -ChunkPos::MAX_HORIZONTAL,
    );
    let chunk = m.generate_chunk(edge).unwrap();
    assert_eq!(
        chunk.block_counts()[BlockId::Stone as usize],
        Chunk::SIZE as u32 - 1
    );

    for pos in [
        ChunkPos::new(200_000_000, 0, 0),
        ChunkPos::new(ChunkPos::MAX_HORIZONTAL + 1, 0, 0),
        ChunkPos::new(0, ChunkPos::MAX_VERTICAL + 1, 0),
        ChunkPos::new(0, 0, i32::MIN),
    ] {
        assert_eq!(m.generate_chunk(pos), Err(GenerationError::OutOfBounds(pos)));

        let mut chunk = Chunk::new(pos);
        chunk.set_state(ChunkState::Generated);
        let mut view = ChunkView::new(&mut chunk, 1);
        assert_eq!(
            m.second_pass_chunk(pos, &mut view),
            Err(GenerationError::OutOfBounds(pos))
        );
    }
}

#[test]
fn second_pass_runs_once() {
    let m = manager(vec![Arc::new(Ground), Arc::new(Shrubs)]);
    let center = ChunkPos::new(0, 0, 0);
    let mut chunks = generate_ring(&m, center, 1);

    decorate(&m, &mut chunks, center).unwrap();
    let decorated = chunks.iter().find(|c| c.pos() == center).unwrap().clone();
    assert_eq!(decorated.state(), ChunkState::Decorated);
    assert!(LocalPos::iter_all().any(|p| decorated.get_block(p) == BlockId::Log));

    assert_eq!(
        decorate(&m, &mut chunks, center),
        Err(GenerationError::AlreadyDecorated(center))
    );
    let again = chunks.iter().find(|c| c.pos() == center).unwrap();
    assert_eq!(again, &decorated);
}

#[test]
fn second_pass_rejects_mismatched_view() {
    let m = manager(vec![Arc::new(Ground), Arc::new(Shrubs)]);
    let center = ChunkPos::new(0, 0, 0);
    let mut chunk = m.generate_chunk(center).unwrap();
    let mut view = ChunkView::new(&mut chunk, 1);

    assert_eq!(
        m.second_pass_chunk(ChunkPos::new(1, 0, 0), &mut view),
        Err(GenerationError::ViewMismatch {
            pos: ChunkPos::new(1, 0, 0),
            view: center,
        })
    );
}

#[test]
fn second_pass_rejects_ungenerated_target() {
    let m = manager(vec![Arc::new(Ground), Arc::new(Shrubs)]);
    let center = ChunkPos::new(0, 0, 0);
    let mut chunks = generate_ring(&m, center, 1);
    let index = chunks.iter().position(|c| c.pos() == center).unwrap();
    chunks[index] = Chunk::new(center);

    assert_eq!(
        decorate(&m, &mut chunks, center),
        Err(GenerationError::ChunkNotGenerated(center))
    );
}

#[test]
fn second_pass_rejects_small_views() {
    let m = manager(vec![Arc::new(Ground), Arc::new(Shrubs)]);
    let center = ChunkPos::new(0, 0, 0);
    let mut chunk = m.generate_chunk(center).unwrap();
    let mut view = ChunkView::new(&mut chunk, 0);

    assert_eq!(
        m.second_pass_chunk(center, &mut view),
        Err(GenerationError::ViewTooSmall {
            radius: 0,
            required: 1,
        })
    );
}

#[test]
fn second_pass_rejects_missing_neighbors() {
    let m = manager(vec![Arc::new(Ground), Arc::new(Shrubs)]);
    let center = ChunkPos::new(0, 0, 0);
    let mut chunk = m.generate_chunk(center).unwrap();
    let mut view = ChunkView::new(&mut chunk, 1);

    assert_eq!(
        m.second_pass_chunk(center, &mut view),
        Err(GenerationError::MissingNeighbor(ChunkPos::new(-1, -1, -1)))
    );
}

#[test]
fn second_pass_rejects_ungenerated_neighbors() {
    let m = manager(vec![Arc::new(Ground), Arc::new(Shrubs)]);
    let center = ChunkPos::new(0, 0, 0);
    let mut chunks = generate_ring(&m, center, 1);
    let empty = ChunkPos::new(1, 0, 0);
    let index = chunks.iter().position(|c| c.pos() == empty).unwrap();
    chunks[index] = Chunk::new(empty);

    assert_eq!(
        decorate(&m, &mut chunks, center),
        Err(GenerationError::NeighborNotGenerated(empty))
    );
    let target = chunks.iter().find(|c| c.pos() == center).unwrap();
    assert_eq!(target.state(), ChunkState::Generated);
}

#[test]
fn failing_decorator_leaves_the_target_unchanged() {
    struct FaultyDecorator;

    impl ChunkGenerator for FaultyDecorator {
        fn name(&self) -> &str {
            "faulty-decorator"
        }

        fn passes(&self) -> Passes {
            Passes::SECOND
        }

        fn decorate(&self, view: &mut ChunkView, ctx: &GenContext) -> Result<(), GeneratorError> {
            Faulty.decorate(view, ctx)
        }
    }

    let m = manager(vec![
        Arc::new(Ground),
        Arc::new(Shrubs),
        Arc::new(FaultyDecorator),
    ]);
    let center = ChunkPos::new(0, 0, 0);
    let mut chunks = generate_ring(&m, center, 1);
    let before = chunks.iter().find(|c| c.pos() == center).unwrap().clone();

    let err = decorate(&m, &mut chunks, center).unwrap_err();
    assert!(matches!(
        err,
        GenerationError::Generator { ref generator, .. } if generator == "faulty-decorator"
    ));

    let after = chunks.iter().find(|c| c.pos() == center).unwrap();
    assert_eq!(after, &before);
    assert_eq!(after.state(), ChunkState::Generated);
}

#[test]
fn decoration_does_not_depend_on_neighbor_order() {
    let m = manager(vec![Arc::new(Ground), Arc::new(Shrubs)]);
    let center = ChunkPos::new(0, 0, 0);
    let east = ChunkPos::new(1, 0, 0);

    let mut a = generate_ring(&m, center, 2);
    decorate(&m, &mut a, center).unwrap();
    decorate(&m, &mut a, east).unwrap();

    let mut b = generate_ring(&m, center, 2);
    decorate(&m, &mut b, east).unwrap();
    decorate(&m, &mut b, center).unwrap();

    for pos in [center, east] {
        let ca = a.iter().find(|c| c.pos() == pos).unwrap();
        let cb = b.iter().find(|c| c.pos() == pos).unwrap();
        assert_eq!(ca, cb);
    }
}

#[test]
fn threaded_generation_matches_sequential() {
    let m = manager(vec![Arc::new(Ground)]);
    let positions: Vec<_> = ChunkPos::new(0, 0, 0).iter_ring(2).collect();
    let sequential: Vec<_> = positions
        .iter()
        .map(|&p| m.generate_chunk(p).unwrap().checksum())
        .collect();

    let threaded: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = positions
            .iter()
            .rev()
            .map(|&p| {
                let m = &m;
                s.spawn(move || m.generate_chunk(p).unwrap().checksum())
            })
            .collect();
        let mut out: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        out.reverse();
        out
    });

    assert_eq!(sequential, threaded);
}
