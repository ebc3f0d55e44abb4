// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Program setup functions.

use std::io::Write;

use env_logger::Builder;
use log::LevelFilter;

/// Sets up `env_logger` with the format "LEVEL\tmessage" (e.g. "WARN\tsomething
/// went wrong").
///
/// Log levels:
/// Error: Failed files and program errors.
/// Warn: File removal.
/// Info: Narration of each file (hidden when `silent`).
/// Debug: Every candidate date tag.
/// Trace: `ExifTool` output.
pub fn configure_logging(silent: bool, verbosity: u8) {
  Builder::new()
    .filter_level(log_level(silent, verbosity))
    .format(|buf, record| {
      let style = buf.default_level_style(record.level());
      writeln!(buf, "{style}{}{style:#}\t{}", record.level(), record.args())
    })
    .init();
}

fn log_level(silent: bool, verbosity: u8) -> LevelFilter {
  match (silent, verbosity) {
    (true, _) => LevelFilter::Warn,
    (false, 0) => LevelFilter::Info,
    (false, 1) => LevelFilter::Debug,
    (false, _) => LevelFilter::Trace,
  }
}
