// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Stage 3: Removing directories left empty.

use std::{
  collections::HashSet,
  fs,
  path::{Path, PathBuf},
};

use walkdir::WalkDir;

use super::{Organizer, organizer::walk_error};
use crate::{error::Error, io};

impl Organizer<'_> {
  /// Removes every directory under the source that holds no files, deepest
  /// first. The source directory itself is kept. When simulating, removals
  /// are only reported.
  pub fn remove_empty_dirs(&self) -> Result<(), Error> {
    let config = self.config;
    if !config.remove_empty_dirs {
      return Ok(());
    }

    log::info!("Removing empty directories.");

    let mut removed = HashSet::new();

    for entry in WalkDir::new(&config.src_dir).min_depth(1).contents_first(true) {
      let entry = entry.map_err(|e| walk_error(&config.src_dir, e))?;
      if !entry.file_type().is_dir() {
        continue;
      }

      let dir = entry.into_path();
      if !is_empty(&dir, &removed)? {
        continue;
      }

      log::info!("{}: Removing empty directory.", dir.display());

      if !config.simulate {
        self.check(io::remove_dir(&dir))?;
      }

      removed.insert(dir);
    }

    Ok(())
  }
}

/// Whether `dir` has no entries other than directories already removed.
fn is_empty(dir: &Path, removed: &HashSet<PathBuf>) -> Result<bool, Error> {
  let read_error = |e: std::io::Error| Error::fs("read directory", dir, e);

  for entry in fs::read_dir(dir).map_err(read_error)? {
    if !removed.contains(&entry.map_err(read_error)?.path()) {
      return Ok(false);
    }
  }

  Ok(true)
}
