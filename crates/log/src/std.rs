use log::{Level, Record};
use std::io::Write;

/// Logs a record to the standard error stream.
pub fn log(record: &Record) {
    let prefix = match record.level() {
        Level::Error => "\x1B[1;31mERROR\x1B[0m  ",
        Level::Warn => "\x1B[1;33mWARNING\x1B[0m",
        Level::Info => "\x1B[1;34mINFO\x1B[0m   ",
        Level::Debug => "\x1B[1;36mDEBUG\x1B[0m  ",
        Level::Trace => "\x1B[1;30mTRACE\x1B[0m  ",
    };

    let message = record.args();
    let file = record.file().unwrap_or("<unknown>");
    let line = record.line().unwrap_or(0);

    let _ = writeln!(
        std::io::stderr().lock(),
        "{prefix}{message} \x1B[2;90m(at {file}:{line})\x1B[0m"
    );
}
