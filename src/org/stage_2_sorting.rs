// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Stage 2: Placing each file by its oldest date.

use super::Organizer;
use crate::{
  config::TransferMode,
  error::Error,
  io,
  prim::{self, MetadataRecord},
};

const SIMULATION_MARKER: &str = " (TEST - no files are being moved/copied)";

impl Organizer<'_> {
  /// Sorts every scanned file, in the order metadata was returned.
  pub fn sort_files(&mut self) -> Result<(), Error> {
    let records = std::mem::take(&mut self.records);
    let total = records.len();
    let progress = self.make_progress_bar(total);

    for (i, record) in records.iter().enumerate() {
      if let Some(progress) = &progress {
        progress.inc(1);
      }

      let result = self.sort_file(record, i + 1, total);
      self.check(result)?;
    }

    if let Some(progress) = progress {
      progress.finish();
    }

    Ok(())
  }

  fn sort_file(&mut self, record: &MetadataRecord, index: usize, total: usize) -> Result<(), Error> {
    let config = self.config;
    let src = record.source_file.as_path();

    log::info!(
      "[{index}/{total}]{} {}",
      if config.simulate { SIMULATION_MARKER } else { "" },
      src.display()
    );

    let resolved = record.get_oldest_timestamp(&config.policy);
    let Some(date_time) = resolved.value else {
      log::info!("{record}: No valid dates found. Leaving in place.");
      return Ok(());
    };

    let file_name = record.file_name().unwrap_or_default();

    if let Some(pattern) = config.ignore.find_match(file_name) {
      if config.remove_ignored_files {
        log::warn!("{record}: Matches ignore pattern `{pattern}`. Removing.");
        if !config.simulate {
          io::remove_file(src)?;
        }
      } else {
        log::info!("{record}: Matches ignore pattern `{pattern}`. Skipping.");
      }
      return Ok(());
    }

    if record.is_hidden() {
      log::info!("{record}: Hidden file. Skipping.");
      return Ok(());
    }

    log::info!("\tDate/Time: {date_time}");
    log::info!("\tCorresponding tags: {}", resolved.source_tags.join(", "));

    let date_time = prim::adjust_for_day_begins(date_time, config.day_begins);

    let decision = self.placer.place(src, date_time, self.ledger.as_ref())?;

    log::info!(
      "\tDestination ({}): {}",
      match config.mode {
        TransferMode::Move => "move",
        TransferMode::Copy => "copy",
      },
      decision.destination.display()
    );
    log::info!("\tAction: {}", decision.action);

    self.placer.execute(src, &decision, self.ledger.as_mut())
  }
}
