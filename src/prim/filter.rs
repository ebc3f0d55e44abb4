// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Which tags may be used as a date source.

use std::collections::BTreeSet;

use crate::error::Error;

/// Restricts date lookup to a set of groups or a set of tags. The restriction
/// is applied by `ExifTool` when reading metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OnlyFilter {
  Groups(BTreeSet<String>),
  Tags(BTreeSet<String>),
}

/// Tag filtering for date lookup. Exclusions are bypassed whenever `only` is
/// set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPolicy {
  pub ignored_groups: BTreeSet<String>,
  pub ignored_tags:   BTreeSet<String>,
  pub only:           Option<OnlyFilter>,
}

impl FilterPolicy {
  /// Builds a policy from command line lists. At most one of `only_groups`
  /// and `only_tags` may be given.
  pub fn new(
    ignored_groups: impl IntoIterator<Item = String>,
    ignored_tags: impl IntoIterator<Item = String>,
    only_groups: Option<Vec<String>>,
    only_tags: Option<Vec<String>>,
  ) -> Result<Self, Error> {
    let only = match (only_groups, only_tags) {
      (Some(_), Some(_)) => return Err(Error::ConflictingFilters),
      (Some(groups), None) => Some(OnlyFilter::Groups(groups.into_iter().collect())),
      (None, Some(tags)) => Some(OnlyFilter::Tags(tags.into_iter().collect())),
      (None, None) => None,
    };

    Ok(Self {
      ignored_groups: ignored_groups.into_iter().collect(),
      ignored_tags: ignored_tags.into_iter().collect(),
      only,
    })
  }

  /// Whether `tag` (group-qualified, e.g. `EXIF:CreateDate`) was excluded by
  /// the user.
  pub fn is_ignored(&self, tag: &str) -> bool {
    if self.only.is_some() {
      return false;
    }

    self.ignored_tags.contains(tag) || self.ignored_groups.contains(super::tag_group(tag))
  }
}

#[cfg(test)]
mod test_is_ignored {
  use super::*;

  fn policy(groups: &[&str], tags: &[&str], only_tags: Option<&[&str]>) -> FilterPolicy {
    FilterPolicy::new(
      groups.iter().map(ToString::to_string),
      tags.iter().map(ToString::to_string),
      None,
      only_tags.map(|t| t.iter().map(ToString::to_string).collect()),
    )
    .unwrap()
  }

  #[test]
  fn ignores_group() {
    let p = policy(&["File"], &[], None);

    assert!(p.is_ignored("File:FileModifyDate"));
    assert!(!p.is_ignored("EXIF:CreateDate"));
  }

  #[test]
  fn ignores_tag() {
    let p = policy(&[], &["EXIF:CreateDate"], None);

    assert!(p.is_ignored("EXIF:CreateDate"));
    assert!(!p.is_ignored("EXIF:DateTimeOriginal"));
  }

  #[test]
  fn bypasses_ignores_when_only_is_set() {
    let p = policy(&["File"], &["EXIF:CreateDate"], Some(&["EXIF:CreateDate"]));

    assert!(!p.is_ignored("File:FileModifyDate"));
    assert!(!p.is_ignored("EXIF:CreateDate"));
  }
}
