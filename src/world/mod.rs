use std::sync::Arc;

use glam::IVec3;
use strata_core::{BlockId, ChunkPos, ChunkState};
use strata_workers::{Priority, TaskPool, Worker};
use strata_worldgen_core::{ChunkGeneratorManager, GenerationError};
use strata_worldgen_std::{ChunkStore, StoreError};

/// A job executed by a [`WorldWorker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    /// Runs the first pass of a chunk and inserts it into the store.
    Generate(ChunkPos),
    /// Runs the second pass of a stored chunk.
    Decorate(ChunkPos),
}

impl Job {
    /// Returns the position of the chunk the job works on.
    #[inline]
    pub fn pos(self) -> ChunkPos {
        match self {
            Job::Generate(pos) | Job::Decorate(pos) => pos,
        }
    }
}

/// An error produced by a [`Job`].
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Runs the passes of the pipeline on behalf of the [`World`].
struct WorldWorker {
    manager: Arc<ChunkGeneratorManager>,
    store: Arc<ChunkStore>,
    halo: u32,
}

impl Worker for WorldWorker {
    type Input = Job;
    type Output = (Job, Result<(), JobError>);

    fn run(&mut self, job: Job) -> Self::Output {
        let result = match job {
            Job::Generate(pos) => self
                .manager
                .generate_chunk(pos)
                .map_err(JobError::from)
                .and_then(|chunk| Ok(self.store.insert(chunk)?)),
            Job::Decorate(pos) => self
                .store
                .with_view(pos, self.halo, |view| self.manager.second_pass_chunk(pos, view))
                .map_err(JobError::from)
                .and_then(|r| Ok(r?)),
        };
        (job, result)
    }
}

/// The chunks requested by a caller, in chunk coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// The chunk at the center of the region.
    pub center: ChunkPos,
    /// The horizontal radius of the region, in chunks.
    pub radius: u32,
    /// The lowest chunk layer of the region.
    pub min_y: i32,
    /// The highest chunk layer of the region.
    pub max_y: i32,
}

impl Region {
    /// Returns the positions of every chunk of the region, in ascending order.
    pub fn positions(&self) -> Vec<ChunkPos> {
        self.expanded(0).positions()
    }

    /// Whether `pos` is part of the region.
    pub fn contains(&self, pos: ChunkPos) -> bool {
        pos.horizontal_distance(self.center) <= self.radius
            && (self.min_y..=self.max_y).contains(&pos.y)
    }

    /// Returns the region grown by `margin` chunks on every side.
    pub fn expanded(&self, margin: u32) -> ExpandedRegion {
        let r = (self.radius + margin) as i32;
        let m = margin as i32;
        let c = self.center;
        ExpandedRegion {
            min: IVec3::new(c.x - r, self.min_y - m, c.z - r),
            max: IVec3::new(c.x + r, self.max_y + m, c.z + r),
        }
    }
}

/// An inclusive box of chunk positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandedRegion {
    min: IVec3,
    max: IVec3,
}

impl ExpandedRegion {
    /// Returns the positions of every chunk of the box, in ascending order.
    pub fn positions(&self) -> Vec<ChunkPos> {
        let mut ret = Vec::new();
        for x in self.min.x..=self.max.x {
            for y in self.min.y..=self.max.y {
                for z in self.min.z..=self.max.z {
                    ret.push(ChunkPos::new(x, y, z));
                }
            }
        }
        ret
    }
}

/// What happened while generating a [`Region`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// The number of chunks that went through the first pass.
    pub generated: usize,
    /// The number of chunks that went through the second pass.
    pub decorated: usize,
    /// The number of chunks of the region that could not be completed.
    pub failed: usize,
    /// The number of blocks of each kind in the chunks of the region.
    pub histogram: [u64; BlockId::COUNT],
    /// A hash of the content of every chunk of the region, in ascending position order.
    pub checksum: u64,
}

/// Drives both passes of a [`ChunkGeneratorManager`] over regions of the world, using a pool of
/// worker threads.
pub struct World {
    manager: Arc<ChunkGeneratorManager>,
    store: Arc<ChunkStore>,
    task_pool: TaskPool<Job, (Job, Result<(), JobError>)>,
}

impl World {
    /// Creates a new [`World`] with `worker_count` threads.
    pub fn new(manager: ChunkGeneratorManager, worker_count: usize) -> Self {
        let manager = Arc::new(manager);
        let store = Arc::new(ChunkStore::new());
        let halo = manager.required_halo();

        let task_pool = strata_workers::start((0..worker_count.max(1)).map(|_| WorldWorker {
            manager: Arc::clone(&manager),
            store: Arc::clone(&store),
            halo,
        }));

        Self {
            manager,
            store,
            task_pool,
        }
    }

    /// Returns the chunks generated so far.
    #[inline]
    pub fn store(&self) -> &ChunkStore {
        &self.store
    }

    /// Runs `jobs` on the task pool, closest to `center` first, and waits for them.
    ///
    /// Returns the number of jobs that succeeded and the positions of the jobs that failed.
    fn run(&self, center: ChunkPos, jobs: impl IntoIterator<Item = Job>) -> (usize, Vec<ChunkPos>) {
        self.task_pool.submit_batch(jobs.into_iter().map(|job| {
            let d = job.pos().distance_squared(center).min(Priority::MAX as u64);
            (job, -(d as Priority))
        }));
        self.task_pool.wait_idle();

        let mut ok = 0;
        let mut failed = Vec::new();
        for (job, result) in self.task_pool.fetch_results() {
            match result {
                Ok(()) => ok += 1,
                Err(err) => {
                    log::error!("{job:?} failed: {err}");
                    failed.push(job.pos());
                }
            }
        }
        (ok, failed)
    }

    /// Generates, then decorates, every chunk of `region`.
    ///
    /// The first pass also runs on the margin of chunks the second pass needs around the region.
    /// Failures are logged and do not stop the rest of the region. Only the chunks of the region
    /// itself are counted in [`Report::failed`]: a failure in the margin shows up as the skipped
    /// second pass of the chunks next to it.
    #[profiling::function]
    pub fn generate_region(&self, region: Region) -> Report {
        let halo = self.manager.required_halo();

        let to_generate = region
            .expanded(halo)
            .positions()
            .into_iter()
            .filter(|&pos| !self.store.contains(pos))
            .map(Job::Generate);
        let (generated, failed_first) = self.run(region.center, to_generate);
        let failed_first = failed_first
            .into_iter()
            .filter(|&pos| region.contains(pos))
            .count();
        log::info!("first pass: {generated} chunks generated");

        let positions = region.positions();
        let (to_decorate, skipped): (Vec<ChunkPos>, Vec<ChunkPos>) = positions
            .iter()
            .copied()
            .filter(|&pos| self.store.state(pos) == Some(ChunkState::Generated))
            .partition(|&pos| self.store.is_ring_generated(pos, halo));
        for pos in &skipped {
            log::warn!("skipping the second pass of {pos}: some neighbors are missing");
        }
        let (decorated, failed_second) =
            self.run(region.center, to_decorate.into_iter().map(Job::Decorate));
        log::info!("second pass: {decorated} chunks decorated");

        let mut histogram = [0u64; BlockId::COUNT];
        let mut bytes = Vec::with_capacity(positions.len() * 20);
        for pos in positions {
            let Some(chunk) = self.store.snapshot(pos) else {
                continue;
            };
            for (total, count) in histogram.iter_mut().zip(chunk.block_counts()) {
                *total += count as u64;
            }
            bytes.extend_from_slice(&pos.x.to_le_bytes());
            bytes.extend_from_slice(&pos.y.to_le_bytes());
            bytes.extend_from_slice(&pos.z.to_le_bytes());
            bytes.extend_from_slice(&chunk.checksum().to_le_bytes());
        }

        Report {
            generated,
            decorated,
            failed: failed_first + failed_second.len() + skipped.len(),
            histogram,
            checksum: const_fnv1a_hash::fnv1a_hash_64(&bytes, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::Chunk;
    use strata_worldgen_core::{ChunkGenerator, GenContext, GeneratorError, WorldSeed};
    use strata_worldgen_std::{
        build_manager, FixedBiomeProvider, FlatTerrain, TreeDecorator, WorldGenConfig,
    };

    fn region() -> Region {
        Region {
            center: ChunkPos::new(0, 0, 0),
            radius: 1,
            min_y: 0,
            max_y: 0,
        }
    }

    #[test]
    fn region_is_generated_and_decorated() {
        let manager = build_manager(&WorldGenConfig::default(), WorldSeed::from_u64(8)).unwrap();
        let world = World::new(manager, 2);
        let report = world.generate_region(region());

        assert_eq!(report.generated, 5 * 5 * 3);
        assert_eq!(report.decorated, 9);
        assert_eq!(report.failed, 0);
        assert_eq!(
            report.histogram.iter().sum::<u64>(),
            9 * strata_core::Chunk::SIZE as u64
        );
    }

    #[test]
    fn thread_count_does_not_change_the_world() {
        let config = WorldGenConfig::default();
        let one = World::new(build_manager(&config, WorldSeed::from_u64(8)).unwrap(), 1)
            .generate_region(region());
        let four = World::new(build_manager(&config, WorldSeed::from_u64(8)).unwrap(), 4)
            .generate_region(region());
        assert_eq!(one, four);
    }

    /// Fails on every chunk more than one chunk away from the origin along X.
    struct NarrowWorld;

    impl ChunkGenerator for NarrowWorld {
        fn name(&self) -> &str {
            "narrow_world"
        }

        fn generate(&self, chunk: &mut Chunk, _: &GenContext) -> Result<(), GeneratorError> {
            if chunk.pos().x.abs() > 1 {
                Err(GeneratorError::Custom("out of the narrow world".into()))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn failures_in_the_margin_are_not_counted() {
        let mut manager = ChunkGeneratorManager::new();
        manager.set_world_seed(WorldSeed::from_u64(8)).unwrap();
        manager
            .set_world_biome_provider(Arc::new(FixedBiomeProvider::new(0.6, 0.4)))
            .unwrap();
        manager
            .register_chunk_generator(Arc::new(FlatTerrain { sea_level: 64 }))
            .unwrap();
        manager.register_chunk_generator(Arc::new(NarrowWorld)).unwrap();
        manager
            .register_chunk_generator(Arc::new(TreeDecorator::new(1.0).unwrap()))
            .unwrap();

        let report = World::new(manager, 2).generate_region(region());

        // The columns x = -2 and x = 2 of the 5 x 5 x 3 margin fail.
        assert_eq!(report.generated, 3 * 5 * 3);
        // Only the x = 0 row of the region has a complete ring; the x = -1 and x = 1 rows are
        // the only region chunks that could not be completed.
        assert_eq!(report.decorated, 3);
        assert_eq!(report.failed, 6);
    }

    #[test]
    fn region_membership() {
        let region = Region {
            center: ChunkPos::new(4, 0, -4),
            radius: 1,
            min_y: -1,
            max_y: 0,
        };
        assert!(region.contains(ChunkPos::new(5, -1, -3)));
        assert!(!region.contains(ChunkPos::new(6, 0, -4)));
        assert!(!region.contains(ChunkPos::new(4, 1, -4)));
        assert_eq!(
            region.positions().len(),
            region.positions().iter().filter(|&&p| region.contains(p)).count()
        );
    }
}
