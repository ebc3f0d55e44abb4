// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Reading metadata and manipulating files.

mod exiftool;
mod functions;

use std::path::Path;

pub use exiftool::*;
pub use functions::*;

use crate::{
  error::Error,
  prim::{FilterPolicy, MetadataRecord},
};

/// Something that can read date metadata for all files in a directory.
pub trait MetadataSource {
  /// Reads one record per file in `dir` (and subdirectories, if `recursive`),
  /// restricted to the tags `policy` asks for.
  fn read_metadata(
    &mut self,
    dir: &Path,
    policy: &FilterPolicy,
    recursive: bool,
  ) -> Result<Vec<MetadataRecord>, Error>;
}
