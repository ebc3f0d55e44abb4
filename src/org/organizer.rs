// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Batch driver for one sort pass over the source directory.

use std::{io, path::Path};

use indicatif::{ProgressBar, ProgressStyle};

use super::{Placer, SimulationLedger};
use crate::{
  config::{FailurePolicy, SortConfig},
  error::Error,
  io::MetadataSource,
  prim::MetadataRecord,
};

/// One pass of sorting: scanning the source, placing every file, then
/// cleaning up. Each stage lives in its own `stage_*` module.
pub struct Organizer<'a> {
  pub(super) config:  &'a SortConfig,
  pub(super) placer:  Placer<'a>,
  pub(super) ledger:  Option<SimulationLedger>,
  pub(super) records: Vec<MetadataRecord>,
}

impl<'a> Organizer<'a> {
  /// Prepares a pass. The source directory must exist.
  pub fn new(config: &'a SortConfig) -> Result<Self, Error> {
    if !config.src_dir.is_dir() {
      return Err(Error::SourceMissing(config.src_dir.clone()));
    }

    Ok(Self {
      config,
      placer: Placer::new(config),
      ledger: config.simulate.then(SimulationLedger::default),
      records: Vec::new(),
    })
  }

  /// Runs every stage, returning the number of files seen.
  pub fn run(mut self, source: &mut impl MetadataSource) -> Result<usize, Error> {
    self.remove_ignored_files()?;
    self.scan(source)?;

    let count = self.records.len();
    self.sort_files()?;
    self.remove_empty_dirs()?;

    if let Some(ledger) = &self.ledger {
      log::info!(
        "Simulation complete: {} destinations planned, no files changed.",
        ledger.claimed_count()
      );
    }

    Ok(count)
  }

  /// Applies the failure policy to a file-level result. Skipped failures are
  /// logged, fatal errors always propagate.
  pub(super) fn check(&self, result: Result<(), Error>) -> Result<(), Error> {
    match result {
      Err(e) if !e.is_fatal() && self.config.on_error == FailurePolicy::Skip => {
        log::error!("{e} Skipping.");
        Ok(())
      }
      r => r,
    }
  }

  /// Progress bar shown instead of narration in silent mode.
  pub(super) fn make_progress_bar(&self, total: usize) -> Option<ProgressBar> {
    if !self.config.silent {
      return None;
    }

    let bar = ProgressBar::new(total as u64);
    bar.set_style(
      ProgressStyle::with_template("[{bar:20}] {pos} of {len}")
        .map(|s| s.progress_chars("= "))
        .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    Some(bar)
  }
}

/// Sorts everything in `config.src_dir` into `config.dest_dir`, reading
/// metadata from `source`. Returns the number of files seen.
pub fn sort_photos(config: &SortConfig, source: &mut impl MetadataSource) -> Result<usize, Error> {
  let count = Organizer::new(config)?.run(source)?;
  log::info!("{count} files processed.");
  Ok(count)
}

/// Converts a directory walk error into a file system error.
pub(super) fn walk_error(root: &Path, e: walkdir::Error) -> Error {
  let path = e.path().unwrap_or(root).to_path_buf();
  Error::fs("scan", path, io::Error::from(e))
}
