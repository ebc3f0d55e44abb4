// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Error type shared by configuration, the `ExifTool` session and file
//! operations.

use std::{
  io,
  path::{Path, PathBuf},
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("{}: Source directory does not exist.", .0.display())]
  SourceMissing(PathBuf),

  #[error("Invalid date format `{0}`.")]
  InvalidTemplate(String),

  #[error("Unknown locale `{0}`.")]
  InvalidLocale(String),

  #[error("Day begins hour must be between 0 and 23 (got {0}).")]
  InvalidDayBegins(u32),

  #[error("Invalid ignore pattern `{pattern}` ({source}).")]
  InvalidIgnorePattern {
    pattern: String,
    #[source]
    source:  globset::Error,
  },

  #[error("Only one of groups or tags may be used exclusively.")]
  ConflictingFilters,

  #[error("ExifTool: {0}")]
  ExifTool(String),

  #[error("Failed to set up interrupt handler ({0}).")]
  Interrupt(#[from] ctrlc::Error),

  #[error("{}: Failed to {action}{} ({source}).", .path.display(), describe_destination(.destination.as_deref()))]
  Filesystem {
    action:      &'static str,
    path:        PathBuf,
    destination: Option<PathBuf>,
    #[source]
    source:      io::Error,
  },
}

impl Error {
  /// Builds a `Filesystem` error for an operation on a single path.
  pub fn fs(action: &'static str, path: impl AsRef<Path>, source: io::Error) -> Self {
    Self::Filesystem {
      action,
      path: path.as_ref().to_path_buf(),
      destination: None,
      source,
    }
  }

  /// Builds a `Filesystem` error for an operation from `path` to
  /// `destination`.
  pub fn fs_to(
    action: &'static str,
    path: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    source: io::Error,
  ) -> Self {
    Self::Filesystem {
      action,
      path: path.as_ref().to_path_buf(),
      destination: Some(destination.as_ref().to_path_buf()),
      source,
    }
  }

  /// Fatal errors end a watch session. Everything else only fails the pass
  /// (or, with `FailurePolicy::Skip`, the single file).
  pub fn is_fatal(&self) -> bool {
    !matches!(self, Self::Filesystem { .. })
  }
}

fn describe_destination(destination: Option<&Path>) -> String {
  destination.map_or_else(String::new, |d| format!(" to {}", d.display()))
}
