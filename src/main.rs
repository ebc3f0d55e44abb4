// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Sorts photos and videos into folders by the date they were taken, using
//! `ExifTool` to read their metadata.

mod config;
mod error;
mod io;
mod org;
mod prim;
mod setup;
mod watch;

#[cfg(test)]
mod testing;

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::{
  config::{DEFAULT_IGNORED_GROUP, DEFAULT_SORT_FORMAT, FailurePolicy, SortConfig},
  error::Error,
  io::ExifTool,
};

/// Sort files (primarily photos and videos) into folders by date and time.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
  /// Source directory.
  src_dir: PathBuf,

  /// Destination directory.
  dest_dir: PathBuf,

  /// Search the source directory recursively.
  #[arg(short, long)]
  recursive: bool,

  /// Copy files instead of moving them.
  #[arg(short, long)]
  copy: bool,

  /// Show a progress bar instead of describing each file.
  #[arg(short, long)]
  silent: bool,

  /// Verbosity level. 1: List all date tags per file. 2: Show `ExifTool`
  /// output.
  #[arg(short, action = ArgAction::Count)]
  verbose: u8,

  /// Run without moving or copying anything, to see what would happen.
  #[arg(short, long)]
  test: bool,

  /// Destination folder structure, as a strftime template. Use `/` for
  /// nested folders.
  #[arg(long, default_value = DEFAULT_SORT_FORMAT)]
  sort: String,

  /// Rename files with this strftime template. The extension is kept.
  #[arg(long)]
  rename: Option<String>,

  /// Keep identical files, renaming them like any other name collision.
  #[arg(long)]
  keep_duplicates: bool,

  /// Hour at which a new day begins. Earlier files count as the previous day.
  #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..=23))]
  day_begins: u32,

  /// Tag groups never used for dates.
  #[arg(long, num_args = 1.., default_value = DEFAULT_IGNORED_GROUP)]
  ignore_groups: Vec<String>,

  /// Tags never used for dates (e.g. `EXIF:CreateDate`).
  #[arg(long, num_args = 1..)]
  ignore_tags: Vec<String>,

  /// Only use dates from these groups.
  #[arg(long, num_args = 1..)]
  use_only_groups: Option<Vec<String>>,

  /// Only use dates from these tags.
  #[arg(long, num_args = 1..)]
  use_only_tags: Option<Vec<String>>,

  /// Comma-separated file name patterns to ignore (e.g. `.*,*.db`).
  #[arg(long)]
  ignore: Option<String>,

  /// Delete files matching `--ignore` instead of skipping them.
  #[arg(long)]
  remove_ignored_files: bool,

  /// Remove directories left empty in the source.
  #[arg(long)]
  remove_empty_dirs: bool,

  /// Read new file names from stdin, sorting after each burst of activity.
  #[arg(short, long)]
  watch: bool,

  /// Locale for month and day names (e.g. `fr_FR`).
  #[arg(long)]
  set_locale: Option<String>,

  /// What to do when a single file fails.
  #[arg(long, value_enum, default_value_t = FailurePolicy::Abort)]
  on_error: FailurePolicy,

  /// `ExifTool` executable.
  #[arg(long, default_value = "exiftool")]
  exiftool: PathBuf,
}

fn main() {
  let args = Args::parse();
  setup::configure_logging(args.silent, args.verbose);

  if let Err(e) = run(args) {
    log::error!("{e}");
    std::process::exit(1);
  }
}

fn run(args: Args) -> Result<(), Error> {
  let watch_mode = args.watch;
  let executable = args.exiftool.clone();
  let config = SortConfig::try_from(args)?;
  let mut exiftool = ExifTool::open(&executable)?;

  if config.simulate {
    log::info!("Running in test mode. No files will be moved or copied.");
  }

  if watch_mode {
    watch::watch_stdin(|| org::sort_photos(&config, &mut exiftool))
  } else {
    org::sort_photos(&config, &mut exiftool).map(|_| ())
  }
}
