// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Deciding where a file goes, and moving or copying it there.

use std::{
  collections::HashMap,
  ffi::OsString,
  fmt::{self, Display, Formatter, Write},
  path::{Path, PathBuf},
};

use chrono::{Locale, NaiveDateTime};

use crate::{
  config::{SortConfig, TransferMode},
  error::Error,
  io,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
  Move,
  Copy,
  /// An identical file is at the destination. Moving replaces it.
  OverwriteIdentical,
  /// An identical file is at the destination. Nothing to copy.
  SkipIdenticalCopy,
  /// The name was taken by a different file, so a `_N` suffix was added.
  RenameAndMove,
  RenameAndCopy,
  /// The destination is the source file itself.
  AlreadyInPlace,
}

impl Display for Action {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    let s = match self {
      Action::Move => "move",
      Action::Copy => "copy",
      Action::OverwriteIdentical => "overwrite identical file",
      Action::SkipIdenticalCopy => "skip identical file",
      Action::RenameAndMove => "rename & move",
      Action::RenameAndCopy => "rename & copy",
      Action::AlreadyInPlace => "already in place",
    };
    write!(f, "{s}")
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementDecision {
  pub destination: PathBuf,
  pub action:      Action,
}

/// Destinations claimed during a simulated batch, each mapped to the source
/// file that claimed it. Stands in for the destination directory, which is
/// never touched when simulating.
#[derive(Debug, Default)]
pub struct SimulationLedger {
  claimed: HashMap<PathBuf, PathBuf>,
}

impl SimulationLedger {
  /// Gets the source file that claimed `destination`, if any.
  pub fn claimant(&self, destination: &Path) -> Option<&Path> {
    self.claimed.get(destination).map(PathBuf::as_path)
  }

  pub fn record(&mut self, destination: PathBuf, source: PathBuf) {
    self.claimed.insert(destination, source);
  }

  pub fn claimed_count(&self) -> usize {
    self.claimed.len()
  }
}

/// Computes destinations from timestamps and carries out the transfers.
pub struct Placer<'a> {
  config: &'a SortConfig,
}

impl<'a> Placer<'a> {
  pub fn new(config: &'a SortConfig) -> Self {
    Self { config }
  }

  /// Decides where `src` goes for `date_time`. Without a ledger, missing
  /// destination directories are created. With one, nothing on disk changes
  /// and collisions are checked against the ledger instead.
  pub fn place(
    &self,
    src: &Path,
    date_time: NaiveDateTime,
    ledger: Option<&SimulationLedger>,
  ) -> Result<PlacementDecision, Error> {
    let dir = self.make_dir(date_time)?;
    if ledger.is_none() {
      io::create_dirs(&dir)?;
    }

    let (stem, ext) = self.make_file_name(src, date_time)?;
    let copy = self.config.mode == TransferMode::Copy;

    let mut suffix = 0;
    loop {
      let mut name = stem.clone();
      if suffix > 0 {
        name.push(format!("_{suffix}"));
      }
      name.push(&ext);
      let destination = dir.join(name);

      if io::same_file(src, &destination) {
        return Ok(PlacementDecision {
          destination,
          action: Action::AlreadyInPlace,
        });
      }

      let occupant = match ledger {
        Some(ledger) => ledger.claimant(&destination).map(Path::to_path_buf),
        None => destination.is_file().then(|| destination.clone()),
      };

      let Some(occupant) = occupant else {
        let action = match (copy, suffix > 0) {
          (false, false) => Action::Move,
          (false, true) => Action::RenameAndMove,
          (true, false) => Action::Copy,
          (true, true) => Action::RenameAndCopy,
        };
        return Ok(PlacementDecision {
          destination,
          action,
        });
      };

      if self.config.remove_duplicates && io::files_identical(src, &occupant)? {
        let action = if copy {
          Action::SkipIdenticalCopy
        } else {
          Action::OverwriteIdentical
        };
        return Ok(PlacementDecision {
          destination,
          action,
        });
      }

      suffix += 1;
      log::debug!(
        "{}: Name already taken, trying suffix `_{suffix}`.",
        destination.display()
      );
    }
  }

  /// Carries out `decision` for `src`. With a ledger, only records the
  /// destination as claimed.
  pub fn execute(
    &self,
    src: &Path,
    decision: &PlacementDecision,
    ledger: Option<&mut SimulationLedger>,
  ) -> Result<(), Error> {
    if let Some(ledger) = ledger {
      ledger.record(decision.destination.clone(), src.to_path_buf());
      return Ok(());
    }

    let dst = &decision.destination;
    match decision.action {
      Action::Move | Action::RenameAndMove | Action::OverwriteIdentical => io::move_file(src, dst),
      Action::Copy | Action::RenameAndCopy => io::copy_file(src, dst),
      Action::SkipIdenticalCopy | Action::AlreadyInPlace => Ok(()),
    }
  }

  /// Destination directory: the rendered sort template split on `/`, under
  /// the destination root.
  fn make_dir(&self, date_time: NaiveDateTime) -> Result<PathBuf, Error> {
    let rendered = render(&self.config.sort_format, date_time, self.config.locale)?;

    Ok(
      rendered
        .split('/')
        .filter(|s| !s.is_empty())
        .fold(self.config.dest_dir.clone(), |dir, s| dir.join(s)),
    )
  }

  /// Splits the destination file name into stem and extension (with its
  /// dot, or empty). The extension always comes from `src`.
  fn make_file_name(&self, src: &Path, date_time: NaiveDateTime) -> Result<(OsString, OsString), Error> {
    let ext = src.extension().map_or_else(OsString::new, |e| {
      let mut ext = OsString::from(".");
      ext.push(e);
      ext
    });

    let stem = match &self.config.rename_format {
      Some(rename_format) => OsString::from(render(rename_format, date_time, self.config.locale)?),
      None => src.file_stem().map(OsString::from).unwrap_or_default(),
    };

    Ok((stem, ext))
  }
}

/// Formats `date_time` with a strftime template, using month and day names
/// from `locale` when set. Times are UTC, so offset specifiers (`%z`, `%Z`)
/// render as UTC too.
pub fn render(template: &str, date_time: NaiveDateTime, locale: Option<Locale>) -> Result<String, Error> {
  let mut rendered = String::new();

  let date_time = date_time.and_utc();
  let result = match locale {
    Some(locale) => write!(rendered, "{}", date_time.format_localized(template, locale)),
    None => write!(rendered, "{}", date_time.format(template)),
  };

  result.map_err(|_| Error::InvalidTemplate(template.to_string()))?;

  Ok(rendered)
}
