// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Watch mode: sorting again whenever new file names arrive on stdin and
//! input has been idle for a while.

use std::{
  io::{self, BufRead},
  path::PathBuf,
  sync::mpsc::{self, Receiver, RecvTimeoutError},
  thread,
  time::Duration,
};

use crate::error::Error;

/// How long input must be quiet before a pass runs.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
  /// One line of input, naming a new file.
  Line(String),
  /// Ctrl-C.
  Interrupt,
  EndOfInput,
}

/// Watches stdin for new file names, running `pass` after each burst of
/// activity. Returns once input ends or Ctrl-C is pressed.
pub fn watch_stdin(pass: impl FnMut() -> Result<usize, Error>) -> Result<(), Error> {
  let (tx, rx) = mpsc::channel();

  let interrupt = tx.clone();
  ctrlc::set_handler(move || {
    let _ = interrupt.send(WatchEvent::Interrupt);
  })?;

  thread::spawn(move || {
    for line in io::stdin().lock().lines() {
      let Ok(line) = line else {
        break;
      };
      if tx.send(WatchEvent::Line(line)).is_err() {
        return;
      }
    }
    let _ = tx.send(WatchEvent::EndOfInput);
  });

  log::info!("Watching for new files on stdin.");

  watch(&rx, IDLE_TIMEOUT, pass)
}

/// Accumulates existing file names from `events`. Whenever no event arrives
/// within `idle` and names are pending, runs `pass` and starts over.
///
/// Errors from `pass` are logged and watching continues, unless they are
/// fatal. At end of input, pending names get one last pass.
pub fn watch(
  events: &Receiver<WatchEvent>,
  idle: Duration,
  mut pass: impl FnMut() -> Result<usize, Error>,
) -> Result<(), Error> {
  let mut pending: Vec<PathBuf> = Vec::new();

  loop {
    match events.recv_timeout(idle) {
      Ok(WatchEvent::Line(line)) => {
        let path = PathBuf::from(line.trim_end_matches('\r'));
        if path.as_os_str().is_empty() {
          continue;
        }

        if path.exists() {
          log::info!("{}: New file present.", path.display());
          pending.push(path);
        } else {
          log::debug!("{}: Does not exist. Ignoring.", path.display());
        }
      }
      Ok(WatchEvent::Interrupt) => {
        log::info!("Interrupted. Stopping.");
        return Ok(());
      }
      Ok(WatchEvent::EndOfInput) | Err(RecvTimeoutError::Disconnected) => {
        if !pending.is_empty() {
          run_pass(&mut pass, pending.len())?;
        }
        log::info!("End of input. Stopping.");
        return Ok(());
      }
      Err(RecvTimeoutError::Timeout) => {
        log::debug!("No activity detected.");
        if !pending.is_empty() {
          run_pass(&mut pass, pending.len())?;
          pending.clear();
        }
      }
    }
  }
}

fn run_pass(pass: &mut impl FnMut() -> Result<usize, Error>, pending: usize) -> Result<(), Error> {
  log::info!("Sorting files ({pending} new).");

  match pass() {
    Ok(_) => {
      log::info!("Done!");
      Ok(())
    }
    Err(e) if e.is_fatal() => Err(e),
    Err(e) => {
      log::error!("{e}");
      Ok(())
    }
  }
}
