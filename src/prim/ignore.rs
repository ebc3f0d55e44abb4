// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! File name patterns for files that should never be sorted.

use std::path::Path;

use globset::{Glob, GlobMatcher};

use crate::error::Error;

/// A list of glob patterns (e.g. `.*,*.db`) matched against file names.
#[derive(Debug, Clone, Default)]
pub struct IgnoreList {
  patterns: Vec<(String, GlobMatcher)>,
}

impl IgnoreList {
  /// Parses a comma-separated list of globs. Empty entries are skipped.
  pub fn parse(list: &str) -> Result<Self, Error> {
    let mut patterns = Vec::new();

    for pattern in list.split(',').filter(|p| !p.is_empty()) {
      let glob = Glob::new(pattern).map_err(|source| Error::InvalidIgnorePattern {
        pattern: pattern.to_string(),
        source,
      })?;
      patterns.push((pattern.to_string(), glob.compile_matcher()));
    }

    Ok(Self { patterns })
  }

  pub fn is_empty(&self) -> bool {
    self.patterns.is_empty()
  }

  /// Returns the first pattern matching `file_name`, if any. Names need not
  /// be valid UTF-8.
  pub fn find_match(&self, file_name: impl AsRef<Path>) -> Option<&str> {
    let file_name = file_name.as_ref();
    self
      .patterns
      .iter()
      .find(|(_, m)| m.is_match(file_name))
      .map(|(p, _)| p.as_str())
  }
}
