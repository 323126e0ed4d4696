use std::process::ExitCode;

use clap::Parser;
use strata_core::{BlockId, ChunkPos};
use strata_worldgen_core::WorldSeed;
use strata_worldgen_std::{build_manager, WorldGenConfig};

mod cli;
mod panic;
mod world;

use self::world::{Region, World};

fn main() -> ExitCode {
    let args = cli::Args::parse();
    strata_log::init(strata_log::level_from_verbosity(args.verbose));
    panic::install_custom_panic_hook();

    let config = match &args.config {
        Some(path) => match WorldGenConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                log::error!("{err}");
                return ExitCode::FAILURE;
            }
        },
        None => WorldGenConfig::default(),
    };

    let seed = args
        .seed
        .as_deref()
        .map(WorldSeed::parse)
        .or_else(|| config.world_seed())
        .unwrap_or_else(WorldSeed::random);
    log::info!("world seed: {seed}");

    let manager = match build_manager(&config, seed) {
        Ok(manager) => manager,
        Err(err) => {
            log::error!("failed to build the generation pipeline: {err}");
            return ExitCode::FAILURE;
        }
    };

    if log::log_enabled!(log::Level::Debug) {
        let mut buf = String::new();
        manager.debug_info(&mut buf);
        log::debug!("pipeline:\n{buf}");
    }

    let region = Region {
        center: ChunkPos::new(0, 0, 0),
        radius: args.radius,
        min_y: args.min_y.min(args.max_y),
        max_y: args.max_y.max(args.min_y),
    };

    let worker_count = args.worker_count();
    log::info!("starting {worker_count} workers");
    let world = World::new(manager, worker_count);

    let start = quanta::Instant::now();
    let report = world.generate_region(region);
    let elapsed = start.elapsed();

    log::info!(
        "{} chunks generated, {} decorated in {:.2?} ({} stored)",
        report.generated,
        report.decorated,
        elapsed,
        world.store().len(),
    );
    for block in BlockId::iter_all() {
        let count = report.histogram[block as usize];
        if count != 0 {
            log::info!("{:>12} {count}", block.name());
        }
    }
    log::info!("checksum: {:016x}", report.checksum);

    if report.failed != 0 {
        log::warn!("{} chunks could not be completed", report.failed);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
