// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Functions for manipulating files.

use std::{
  fs::{self, File},
  io::{self, BufReader, ErrorKind, Read},
  path::Path,
};

use filetime::FileTime;

use crate::error::Error;

/// Buffer size for file comparison.
const COMPARE_CHUNK: usize = 64 * 1024;

/// Copies `src` to `dst`, keeping permissions and access & modification
/// times.
pub fn copy_file(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> Result<(), Error> {
  let (src, dst) = (src.as_ref(), dst.as_ref());

  fs::copy(src, dst).map_err(|e| Error::fs_to("copy", src, dst, e))?;

  let metadata = fs::metadata(src).map_err(|e| Error::fs("read metadata of", src, e))?;
  filetime::set_file_times(
    dst,
    FileTime::from_last_access_time(&metadata),
    FileTime::from_last_modification_time(&metadata),
  )
  .map_err(|e| Error::fs("set file times of", dst, e))
}

/// Creates `dir` and all missing parents. Existing directories are fine.
pub fn create_dirs(dir: impl AsRef<Path>) -> Result<(), Error> {
  fs::create_dir_all(dir.as_ref()).map_err(|e| Error::fs("create directory", dir, e))
}

/// Returns whether `a` and `b` have identical contents, byte for byte.
pub fn files_identical(a: impl AsRef<Path>, b: impl AsRef<Path>) -> Result<bool, Error> {
  let (a, b) = (a.as_ref(), b.as_ref());
  let compare_error = |e: io::Error| Error::fs_to("compare", a, b, e);

  let len_a = fs::metadata(a).map_err(compare_error)?.len();
  let len_b = fs::metadata(b).map_err(compare_error)?.len();
  if len_a != len_b {
    return Ok(false);
  }

  let mut reader_a = BufReader::new(File::open(a).map_err(compare_error)?);
  let mut reader_b = BufReader::new(File::open(b).map_err(compare_error)?);
  let mut chunk_a = vec![0; COMPARE_CHUNK];
  let mut chunk_b = vec![0; COMPARE_CHUNK];

  loop {
    let read_a = read_chunk(&mut reader_a, &mut chunk_a).map_err(compare_error)?;
    let read_b = read_chunk(&mut reader_b, &mut chunk_b).map_err(compare_error)?;

    if read_a != read_b || chunk_a[..read_a] != chunk_b[..read_b] {
      return Ok(false);
    }
    if read_a == 0 {
      return Ok(true);
    }
  }
}

/// Moves `src` to `dst`, replacing `dst` if it exists. Falls back to copy &
/// remove when `dst` is on another file system.
pub fn move_file(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> Result<(), Error> {
  let (src, dst) = (src.as_ref(), dst.as_ref());

  match fs::rename(src, dst) {
    Ok(()) => Ok(()),
    Err(e) if e.kind() == ErrorKind::CrossesDevices => {
      log::debug!("{}: Moving across file systems.", src.display());
      copy_file(src, dst)?;
      remove_file(src)
    }
    Err(e) => Err(Error::fs_to("move", src, dst, e)),
  }
}

/// Returns whether `a` and `b` name the same existing file, however they are
/// spelled.
pub fn same_file(a: impl AsRef<Path>, b: impl AsRef<Path>) -> bool {
  match (fs::canonicalize(a), fs::canonicalize(b)) {
    (Ok(a), Ok(b)) => a == b,
    _ => false,
  }
}

/// Removes an empty directory.
pub fn remove_dir(dir: impl AsRef<Path>) -> Result<(), Error> {
  fs::remove_dir(dir.as_ref()).map_err(|e| Error::fs("remove directory", dir, e))
}

pub fn remove_file(file: impl AsRef<Path>) -> Result<(), Error> {
  fs::remove_file(file.as_ref()).map_err(|e| Error::fs("remove", file, e))
}

/// Fills `buf` as far as possible, returning the number of bytes read. Only
/// returns less than `buf.len()` at the end of the file.
fn read_chunk(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
  let mut filled = 0;
  while filled < buf.len() {
    match reader.read(&mut buf[filled..]) {
      Ok(0) => break,
      Ok(n) => filled += n,
      Err(e) if e.kind() == ErrorKind::Interrupted => {}
      Err(e) => return Err(e),
    }
  }
  Ok(filled)
}
