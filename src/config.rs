// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Validated configuration for a sort run.

use std::path::PathBuf;

use chrono::{
  Locale,
  format::{Item, StrftimeItems},
};
use clap::ValueEnum;

use crate::{
  Args,
  error::Error,
  prim::{FilterPolicy, IgnoreList},
};

/// Folder template used when none is given: `2020/05-May`.
pub const DEFAULT_SORT_FORMAT: &str = "%Y/%m-%b";

/// Group ignored for dates when none are given. `File` dates describe the
/// copy on disk, not the capture.
pub const DEFAULT_IGNORED_GROUP: &str = "File";

/// Latest hour `--day-begins` accepts.
const DAY_BEGINS_MAX: u32 = 23;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
  Move,
  Copy,
}

/// What to do when a single file fails to be placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum FailurePolicy {
  /// Stop the batch at the first failure.
  #[default]
  Abort,
  /// Log the failure and continue with the next file.
  Skip,
}

#[derive(Debug, Clone)]
pub struct SortConfig {
  pub src_dir:              PathBuf,
  pub dest_dir:             PathBuf,
  pub recursive:            bool,
  pub mode:                 TransferMode,
  pub simulate:             bool,
  pub silent:               bool,
  pub sort_format:          String,
  pub rename_format:        Option<String>,
  pub remove_duplicates:    bool,
  pub day_begins:           u32,
  pub policy:               FilterPolicy,
  pub ignore:               IgnoreList,
  pub remove_ignored_files: bool,
  pub remove_empty_dirs:    bool,
  pub locale:               Option<Locale>,
  pub on_error:             FailurePolicy,
}

impl SortConfig {
  /// Configuration with the command line defaults: move files into
  /// `%Y/%m-%b` folders, removing identical duplicates.
  pub fn new(src_dir: impl Into<PathBuf>, dest_dir: impl Into<PathBuf>) -> Self {
    Self {
      src_dir:              src_dir.into(),
      dest_dir:             dest_dir.into(),
      recursive:            false,
      mode:                 TransferMode::Move,
      simulate:             false,
      silent:               false,
      sort_format:          DEFAULT_SORT_FORMAT.to_string(),
      rename_format:        None,
      remove_duplicates:    true,
      day_begins:           0,
      policy:               FilterPolicy::default(),
      ignore:               IgnoreList::default(),
      remove_ignored_files: false,
      remove_empty_dirs:    false,
      locale:               None,
      on_error:             FailurePolicy::Abort,
    }
  }

  /// Checks everything that can be checked before touching any file.
  pub fn validate(&self) -> Result<(), Error> {
    if self.day_begins > DAY_BEGINS_MAX {
      return Err(Error::InvalidDayBegins(self.day_begins));
    }

    validate_template(&self.sort_format)?;
    if let Some(rename_format) = &self.rename_format {
      validate_template(rename_format)?;
    }

    Ok(())
  }
}

impl TryFrom<Args> for SortConfig {
  type Error = Error;

  fn try_from(args: Args) -> Result<Self, Error> {
    let policy = FilterPolicy::new(
      args.ignore_groups,
      args.ignore_tags,
      args.use_only_groups,
      args.use_only_tags,
    )?;

    let ignore = match &args.ignore {
      Some(list) => IgnoreList::parse(list)?,
      None => IgnoreList::default(),
    };

    let locale = args.set_locale.as_deref().map(parse_locale).transpose()?;

    let config = Self {
      src_dir: args.src_dir,
      dest_dir: args.dest_dir,
      recursive: args.recursive,
      mode: if args.copy {
        TransferMode::Copy
      } else {
        TransferMode::Move
      },
      simulate: args.test,
      silent: args.silent,
      sort_format: args.sort,
      rename_format: args.rename,
      remove_duplicates: !args.keep_duplicates,
      day_begins: args.day_begins,
      policy,
      ignore,
      remove_ignored_files: args.remove_ignored_files,
      remove_empty_dirs: args.remove_empty_dirs,
      locale,
      on_error: args.on_error,
    };

    config.validate()?;

    Ok(config)
  }
}

/// Parses a locale name such as `fr_FR`. An encoding suffix (`fr_FR.UTF-8`)
/// is accepted and dropped.
pub fn parse_locale(name: &str) -> Result<Locale, Error> {
  let base = name.split_once('.').map_or(name, |(base, _)| base);
  Locale::try_from(base).map_err(|_| Error::InvalidLocale(name.to_string()))
}

/// Rejects templates with unknown or malformed `%` specifiers.
pub fn validate_template(template: &str) -> Result<(), Error> {
  if StrftimeItems::new(template).any(|item| matches!(item, Item::Error)) {
    Err(Error::InvalidTemplate(template.to_string()))
  } else {
    Ok(())
  }
}
