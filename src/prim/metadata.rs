// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! `ExifTool` metadata records, and selection of the oldest date among their
//! tags.

use core::fmt;
use std::{
  borrow::Cow,
  collections::BTreeMap,
  ffi::OsStr,
  fmt::{Display, Formatter},
  path::PathBuf,
};

use chrono::NaiveDateTime;
use serde::Deserialize;

use super::{FilterPolicy, parse_date_time};

/// Groups that never hold capture dates.
const GROUPS_IGNORED: [&str; 1] = ["ICC_Profile"];

/// Tags that never hold capture dates. `XMP:HistoryWhen` records edits.
const TAGS_IGNORED: [&str; 1] = ["XMP:HistoryWhen"];

/// A raw tag value as `ExifTool` reports it in JSON.
///
/// With `-a`, `ExifTool` reports repeated tags as lists, oldest first.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
  Text(String),
  Number(serde_json::Number),
  List(Vec<TagValue>),
  Other(serde_json::Value),
}

impl TagValue {
  /// Gets the value as text, using the first element of lists.
  pub fn as_text(&self) -> Option<Cow<'_, str>> {
    match self {
      TagValue::Text(s) => Some(Cow::Borrowed(s)),
      TagValue::Number(n) => Some(Cow::Owned(n.to_string())),
      TagValue::List(l) => l.first()?.as_text(),
      TagValue::Other(_) => None,
    }
  }
}

impl Display for TagValue {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    match self {
      TagValue::Text(s) => write!(f, "{s}"),
      TagValue::Number(n) => write!(f, "{n}"),
      TagValue::List(l) => {
        write!(f, "[")?;
        for (i, v) in l.iter().enumerate() {
          if i > 0 {
            write!(f, ", ")?;
          }
          write!(f, "{v}")?;
        }
        write!(f, "]")
      }
      TagValue::Other(v) => write!(f, "{v}"),
    }
  }
}

/// Metadata for one file, as returned by `ExifTool` with `-j -G`.
///
/// Tags are keyed by group-qualified names (e.g. `EXIF:CreateDate`) and kept
/// in lexicographic order, which fixes the order ties are reported in.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct MetadataRecord {
  #[serde(rename = "SourceFile")]
  pub source_file: PathBuf,

  #[serde(flatten)]
  pub tags: BTreeMap<String, TagValue>,
}

/// The oldest date found in a record, and every tag holding exactly that
/// date.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResolvedTimestamp {
  pub value:       Option<NaiveDateTime>,
  pub source_tags: Vec<String>,
}

impl MetadataRecord {
  /// Finds the oldest valid date among all tags that `policy` permits.
  /// Location tags (anything containing `GPS`) are never used.
  pub fn get_oldest_timestamp(&self, policy: &FilterPolicy) -> ResolvedTimestamp {
    let mut oldest = ResolvedTimestamp::default();

    log::debug!("{self}: All relevant tags:");

    for (tag, value) in &self.tags {
      if TAGS_IGNORED.contains(&tag.as_str())
        || GROUPS_IGNORED.contains(&super::tag_group(tag))
        || policy.is_ignored(tag)
        || tag.contains("GPS")
      {
        continue;
      }

      log::debug!("\t{tag}, {value}");

      let Some(date_time) = value.as_text().as_deref().and_then(parse_date_time) else {
        continue;
      };

      match oldest.value {
        Some(v) if date_time > v => {}
        Some(v) if date_time == v => oldest.source_tags.push(tag.clone()),
        _ => {
          oldest.value = Some(date_time);
          oldest.source_tags = vec![tag.clone()];
        }
      }
    }

    oldest
  }

  /// The file name of the source file, if it has one.
  pub fn file_name(&self) -> Option<&OsStr> {
    self.source_file.file_name()
  }

  /// Whether the source file's name starts with a dot.
  pub fn is_hidden(&self) -> bool {
    self.file_name().is_some_and(|n| n.as_encoded_bytes().starts_with(b"."))
  }
}

impl Display for MetadataRecord {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "{}", self.source_file.display())
  }
}
