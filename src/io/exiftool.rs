// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Long-running `ExifTool` process, driven with `-stay_open`.

use std::{
  ffi::{OsStr, OsString},
  io::{BufRead, BufReader, Write},
  path::Path,
  process::{Child, ChildStdin, ChildStdout, Command, Stdio},
};

use regex::Regex;

use super::MetadataSource;
use crate::{
  error::Error,
  prim::{FilterPolicy, MetadataRecord, OnlyFilter},
};

/// `ExifTool` prints this after the output of each `-execute`.
const SENTINEL: &str = "{ready}";

/// Minimum supported version of `ExifTool`, for `-time:all` and `-stay_open`.
const EXIFTOOL_MIN_VERSION: (u32, u32) = (10, 0);

/// Output as JSON, keep duplicate tags, prefix tags with their group.
const READ_ARGS: [&str; 3] = ["-j", "-a", "-G"];

/// A running `ExifTool` process. Commands are written to its stdin, one
/// argument per line, and responses are read until the sentinel.
///
/// The process is told to exit when this is dropped.
pub struct ExifTool {
  child:  Child,
  stdin:  ChildStdin,
  stdout: BufReader<ChildStdout>,
}

impl ExifTool {
  /// Starts `executable` in `-stay_open` mode and checks its version.
  pub fn open(executable: impl AsRef<OsStr>) -> Result<Self, Error> {
    let executable = executable.as_ref();

    let mut child = Command::new(executable)
      .args(["-stay_open", "True", "-@", "-"])
      .stdin(Stdio::piped())
      .stdout(Stdio::piped())
      .spawn()
      .map_err(|e| Error::ExifTool(format!("Failed to start {} ({e}).", Path::new(executable).display())))?;

    let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
      return Err(Error::ExifTool("Failed to open pipes.".to_string()));
    };

    let mut exiftool = Self {
      child,
      stdin,
      stdout: BufReader::new(stdout),
    };

    version_check(&exiftool.execute(["-ver"])?, EXIFTOOL_MIN_VERSION)?;

    Ok(exiftool)
  }

  /// Runs one command, returning its stdout without the sentinel.
  pub fn execute<I: IntoIterator<Item = S>, S: AsRef<OsStr>>(
    &mut self,
    args: I,
  ) -> Result<Vec<u8>, Error> {
    let mut request = Vec::new();
    for arg in args {
      request.extend_from_slice(arg.as_ref().as_encoded_bytes());
      request.push(b'\n');
    }
    request.extend_from_slice(b"-execute\n");

    self
      .stdin
      .write_all(&request)
      .and_then(|()| self.stdin.flush())
      .map_err(|e| Error::ExifTool(format!("Failed to send command ({e}).")))?;

    let stdout = read_until_sentinel(&mut self.stdout, SENTINEL)
      .map_err(|e| Error::ExifTool(format!("Failed to read response ({e}).")))?;

    log::trace!("ExifTool output:\n{}", String::from_utf8_lossy(&stdout));

    Ok(stdout)
  }
}

impl Drop for ExifTool {
  fn drop(&mut self) {
    let closed = self
      .stdin
      .write_all(b"-stay_open\nFalse\n")
      .and_then(|()| self.stdin.flush());

    if let Err(e) = closed {
      log::warn!("Failed to stop ExifTool ({e}). Killing it.");
      let _ = self.child.kill();
    }

    if let Err(e) = self.child.wait() {
      log::warn!("Failed to wait for ExifTool to exit ({e}).");
    }
  }
}

impl MetadataSource for ExifTool {
  fn read_metadata(
    &mut self,
    dir: &Path,
    policy: &FilterPolicy,
    recursive: bool,
  ) -> Result<Vec<MetadataRecord>, Error> {
    let stdout = self.execute(make_read_args(dir, policy, recursive))?;
    Ok(parse_vec(&stdout))
  }
}

/// Builds the arguments for reading date tags from `dir`. When the policy
/// restricts lookup to some tags or groups, only those are requested.
pub fn make_read_args(dir: &Path, policy: &FilterPolicy, recursive: bool) -> Vec<OsString> {
  let mut args = READ_ARGS.map(OsString::from).to_vec();

  match &policy.only {
    Some(OnlyFilter::Tags(tags)) => args.extend(tags.iter().map(|t| OsString::from(format!("-{t}")))),
    Some(OnlyFilter::Groups(groups)) => {
      args.extend(groups.iter().map(|g| OsString::from(format!("-{g}:Time:All"))));
    }
    None => args.push(OsString::from("-time:all")),
  }

  if recursive {
    args.push(OsString::from("-r"));
  }

  args.push(dir.as_os_str().to_os_string());

  args
}

/// Parses `ExifTool`'s JSON output into records. Empty or malformed output
/// (e.g. no files found) is reported and treated as no files.
fn parse_vec(stdout: &[u8]) -> Vec<MetadataRecord> {
  if stdout.iter().all(u8::is_ascii_whitespace) {
    log::warn!("No files to parse.");
    return Vec::new();
  }

  serde_json::from_slice(stdout).unwrap_or_else(|e| {
    log::warn!(
      "Failed to parse ExifTool output as metadata ({e}).\nstdout:\n{}",
      String::from_utf8_lossy(stdout)
    );
    Vec::new()
  })
}

/// Reads lines from `reader` until one ends with `sentinel`, returning
/// everything before the sentinel with trailing whitespace removed.
fn read_until_sentinel(reader: &mut impl BufRead, sentinel: &str) -> std::io::Result<Vec<u8>> {
  let mut output = Vec::new();

  loop {
    let start = output.len();
    if reader.read_until(b'\n', &mut output)? == 0 {
      return Err(std::io::Error::new(
        std::io::ErrorKind::UnexpectedEof,
        "ExifTool exited before completing the response",
      ));
    }

    if output[start..].trim_ascii_end().ends_with(sentinel.as_bytes()) {
      let end = output.trim_ascii_end().len() - sentinel.len();
      output.truncate(end);
      output.truncate(output.trim_ascii_end().len());
      return Ok(output);
    }
  }
}

/// Returns whether `version` is as new or newer than `version_required_min`,
/// where `version` is from `ExifTool`'s stdout.
fn version_check(version: &[u8], version_required_min: (u32, u32)) -> Result<(), Error> {
  let version = String::from_utf8_lossy(version);
  let re = Regex::new(r"^(\d+)\.(\d+)").expect("Version regex is valid.");

  let Some(caps) = re.captures(version.trim()) else {
    return Err(Error::ExifTool(format!(
      "Unexpected version string: \"{version}\""
    )));
  };

  let (Ok(major), Ok(minor)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>()) else {
    return Err(Error::ExifTool(format!("Unexpected version: {version}")));
  };

  if (major, minor) >= version_required_min {
    Ok(())
  } else {
    Err(Error::ExifTool(format!(
      "Version {major}.{minor} is too old (needs {}.{} or newer).",
      version_required_min.0, version_required_min.1
    )))
  }
}


#[cfg(test)]
mod test_parse_vec {
  use super::*;

  #[test]
  fn parses_records() {
    let stdout = br#"[{
      "SourceFile": "/photos/image.jpg",
      "EXIF:CreateDate": "2020:05:01 10:00:00",
      "File:FileSize": 1024
    }]"#;

    let records = parse_vec(stdout);

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].source_file, Path::new("/photos/image.jpg"));
    assert_eq!(records[0].tags.len(), 2);
  }

  #[test]
  fn returns_empty_for_empty_output() {
    assert!(parse_vec(b"").is_empty());
    assert!(parse_vec(b"\n").is_empty());
  }

  #[test]
  fn returns_empty_for_malformed_output() {
    assert!(parse_vec(b"Error: File not found - /photos").is_empty());
  }

  #[test]
  fn returns_empty_if_source_file_missing() {
    assert!(parse_vec(br#"[{ "EXIF:CreateDate": "2020:05:01 10:00:00" }]"#).is_empty());
  }
}


#[cfg(test)]
mod test_version_check {
  use super::*;

  #[test]
  fn does_not_treat_minor_as_fraction() {
    assert!(version_check(b"10.3", (10, 29)).is_err());
  }

  #[test]
  fn fails_older_major() {
    assert!(version_check(b"9.99", (10, 0)).is_err());
  }

  #[test]
  fn fails_older_minor() {
    assert!(version_check(b"10.28", (10, 29)).is_err());
  }

  #[test]
  fn fails_garbage() {
    assert!(version_check(b"not a version", (10, 0)).is_err());
  }

  #[test]
  fn passes_equal() {
    assert!(version_check(b"10.0", (10, 0)).is_ok());
  }

  #[test]
  fn passes_newer_with_trailing_newline() {
    assert!(version_check(b"13.30\n", (10, 0)).is_ok());
  }
}
