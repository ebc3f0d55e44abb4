// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Stage 1: Removing ignored files and reading metadata.

use walkdir::WalkDir;

use super::{Organizer, organizer::walk_error};
use crate::{error::Error, io, io::MetadataSource};

impl Organizer<'_> {
  /// Deletes files matching the ignore list before `ExifTool` ever sees them.
  /// Only done for recursive runs with `remove_ignored_files` set. Top level
  /// files are handled while sorting instead.
  pub fn remove_ignored_files(&self) -> Result<(), Error> {
    let config = self.config;
    if !config.recursive || !config.remove_ignored_files || config.ignore.is_empty() {
      return Ok(());
    }

    log::info!("Removing ignored files.");

    for entry in WalkDir::new(&config.src_dir) {
      let entry = entry.map_err(|e| walk_error(&config.src_dir, e))?;
      if !entry.file_type().is_file() {
        continue;
      }

      let Some(pattern) = config.ignore.find_match(entry.file_name()) else {
        continue;
      };

      log::warn!(
        "{}: Matches ignore pattern `{pattern}`. Removing.",
        entry.path().display()
      );

      if !config.simulate {
        self.check(io::remove_file(entry.path()))?;
      }
    }

    Ok(())
  }

  /// Reads metadata for every file to be sorted.
  pub fn scan(&mut self, source: &mut impl MetadataSource) -> Result<(), Error> {
    log::info!(
      "Reading metadata with ExifTool. May take a while for a large number of files."
    );

    self.records = source.read_metadata(&self.config.src_dir, &self.config.policy, self.config.recursive)?;

    log::debug!("Found {} files.", self.records.len());

    Ok(())
  }
}
