use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::Parser;

/// Generates a region of a world and reports what it contains.
///
/// Values passed on the command line override the ones found in the configuration file.
#[derive(Parser, Debug)]
#[command(name = "strata", version, about = "Deterministic voxel world generation")]
pub struct Args {
    /// Path to a RON world configuration. The standard pipeline is used when absent.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// The world seed. Integers are used as-is, anything else is hashed.
    #[arg(long)]
    pub seed: Option<String>,

    /// The horizontal radius of the region, in chunks.
    #[arg(long, default_value_t = 4)]
    pub radius: u32,

    /// The lowest chunk layer of the region.
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    pub min_y: i32,

    /// The highest chunk layer of the region.
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub max_y: i32,

    /// The number of worker threads. Defaults to the available parallelism.
    #[arg(long)]
    pub threads: Option<NonZeroUsize>,

    /// Increases the verbosity of the logs. May be repeated.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Returns the number of worker threads to start.
    pub fn worker_count(&self) -> usize {
        self.threads
            .or_else(|| std::thread::available_parallelism().ok())
            .map_or(4, NonZeroUsize::get)
    }
}
