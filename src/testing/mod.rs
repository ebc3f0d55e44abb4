// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Test-only utilities.

mod asserts;
mod dates;
mod test_dir;

use std::path::Path;

pub use dates::*;
pub use test_dir::*;

pub use crate::{assert_contents, assert_dir, assert_err, record, test_dir, test_path};
use crate::{
  error::Error,
  io::MetadataSource,
  prim::{FilterPolicy, MetadataRecord},
};

pub fn type_of<T>(_: T) -> &'static str {
  std::any::type_name::<T>()
}

/// Metadata known up front, standing in for `ExifTool`.
///
/// Only records for files that still exist under the requested directory are
/// returned, so files moved by an earlier pass drop out like they would with
/// a real scan.
pub struct StaticMetadata(pub Vec<MetadataRecord>);

impl MetadataSource for StaticMetadata {
  fn read_metadata(
    &mut self,
    dir: &Path,
    _policy: &FilterPolicy,
    recursive: bool,
  ) -> Result<Vec<MetadataRecord>, Error> {
    Ok(
      self
        .0
        .iter()
        .filter(|r| r.source_file.is_file())
        .filter(|r| {
          if recursive {
            r.source_file.starts_with(dir)
          } else {
            r.source_file.parent() == Some(dir)
          }
        })
        .cloned()
        .collect(),
    )
  }
}

/// Builds a `MetadataRecord` the way `ExifTool` would report it.
#[macro_export]
macro_rules! record {
  ($path:expr $(, $key:literal: $value:tt)* $(,)?) => {
    serde_json::from_value::<$crate::prim::MetadataRecord>(
      serde_json::json!({
        "SourceFile": $path,
        $(
          $key: $value,
        )*
      })
    ).unwrap()
  }
}
