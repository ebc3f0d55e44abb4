// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Primitive types for metadata records, date & time values and the filters
//! applied to them.

mod conv;
mod filter;
mod ignore;
mod metadata;

pub use conv::*;
pub use filter::*;
pub use ignore::*;
pub use metadata::*;

/// Gets the group of a group-qualified tag (e.g. `EXIF` for
/// `EXIF:CreateDate`). Unqualified tags are their own group.
pub fn tag_group(tag: &str) -> &str {
  tag.split_once(':').map_or(tag, |(group, _)| group)
}

#[cfg(test)]
mod test_tag_group {
  use super::*;

  #[test]
  fn splits_at_first_colon() {
    assert_eq!(tag_group("EXIF:CreateDate"), "EXIF");
    assert_eq!(tag_group("XMP:XMP-exif:DateTimeOriginal"), "XMP");
  }

  #[test]
  fn returns_unqualified_tag() {
    assert_eq!(tag_group("CreateDate"), "CreateDate");
  }
}
