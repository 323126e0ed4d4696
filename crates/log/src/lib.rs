//! A simple logging backend for the needs of Strata.
//!
//! Library crates of the workspace only depend on the [`log`] facade. Executables call [`init`]
//! once at startup to route every record to the standard error stream.

use log::{LevelFilter, Log, Metadata, Record};

mod std;

/// The logger installed by [`init`].
struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    #[inline]
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            std::log(record);
        }
    }

    fn flush(&self) {}
}

/// Installs the Strata logger as the global [`log`] backend.
///
/// Records more verbose than `level` are discarded.
///
/// # Remarks
///
/// Calling this function more than once only updates the maximum level.
pub fn init(level: LevelFilter) {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}

/// Converts a verbosity count (as in `-v`, `-vv`, ...) into a [`LevelFilter`].
///
/// No flag means [`LevelFilter::Info`].
pub fn level_from_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
