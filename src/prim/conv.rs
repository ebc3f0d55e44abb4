use chrono::{NaiveDate, NaiveDateTime, TimeDelta, Timelike};

/// Hour assigned to date-only values, so that they don't sort as midnight.
const DEFAULT_HOUR: u32 = 12;

/// Converts an `ExifTool` date & time string to a `NaiveDateTime` in UTC, if
/// it is one. Accepts `YYYY:MM:DD`, optionally followed by whitespace and
/// `HH:MM[:SS[.fff]]`, optionally followed by `Z`, `+HH:MM` or `-HH:MM`.
///
/// Returns `None` for anything else. Most tags aren't dates, so this is not an
/// error condition.
pub fn parse_date_time(date_time: &str) -> Option<NaiveDateTime> {
  let mut elements = date_time.split_whitespace();

  let (year, month, day) = parse_date(elements.next()?)?;

  let mut hour = DEFAULT_HOUR;
  let mut minute = 0;
  let mut second = 0;
  let mut offset = None;

  if let Some(time) = elements.next() {
    let (time, zone) = match time.find(['+', '-', 'Z']) {
      Some(i) => (&time[..i], Some((&time[i..=i], &time[i + 1..]))),
      None => (time, None),
    };

    let time = time.split(':').collect::<Vec<_>>();
    match time.as_slice() {
      [h, m, s] => {
        hour = h.parse().ok()?;
        minute = m.parse().ok()?;
        second = s.split('.').next()?.parse().ok()?;
      }
      [h, m] => {
        hour = h.parse().ok()?;
        minute = m.parse().ok()?;
      }
      _ => {}
    }

    // Malformed offsets (e.g. `+0200`) are ignored rather than rejected.
    if let Some((sign, zone)) = zone {
      if let [zone_hour, zone_minute] = zone.split(':').collect::<Vec<_>>().as_slice() {
        let zone_hour = zone_hour.parse::<i64>().ok()?;
        let zone_minute = zone_minute.parse::<i64>().ok()?;
        let delta =
          TimeDelta::try_hours(zone_hour)?.checked_add(&TimeDelta::try_minutes(zone_minute)?)?;
        offset = match sign {
          "+" => Some(delta),
          "-" => Some(-delta),
          _ => None,
        };
      }
    }
  }

  let date_time = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;

  match offset {
    Some(offset) => date_time.checked_sub_signed(offset),
    None => Some(date_time),
  }
}

/// Parses `YYYY:MM:DD`. Rejects time-only values such as `12:30:01.5`, and
/// zero years, which `ExifTool` uses for unset dates (`0000:00:00`).
fn parse_date(date: &str) -> Option<(i32, u32, u32)> {
  if date.contains('.') {
    return None;
  }

  let parts = date.split(':').collect::<Vec<_>>();
  let [year, month, day] = parts.as_slice() else {
    return None;
  };

  if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
    return None;
  }

  let year = year.parse::<i32>().ok().filter(|y| *y > 0)?;

  Some((year, month.parse().ok()?, day.parse().ok()?))
}

/// Moves `date_time` into the previous day if it is earlier than
/// `day_begins` (0-23), so late nights are grouped with the evening before.
/// Only used for classification; the shift is `hour + 1` hours.
pub fn adjust_for_day_begins(date_time: NaiveDateTime, day_begins: u32) -> NaiveDateTime {
  if date_time.hour() >= day_begins {
    return date_time;
  }

  log::info!(
    "Moving this file to the previous day for classification purposes (day begins at {day_begins}:00)."
  );
  date_time - TimeDelta::hours(i64::from(date_time.hour()) + 1)
}


#[cfg(test)]
mod test_parse_date_time {
  use super::*;
  use crate::testing::*;

  #[test]
  fn parses_date_and_time() {
    assert_eq!(
      parse_date_time("2020:01:15 10:30:45"),
      Some(make_date(2020, 1, 15, 10, 30, 45))
    );
  }

  #[test]
  fn parses_surrounding_whitespace() {
    assert_eq!(
      parse_date_time("  2020:01:15   10:30:45 \n"),
      Some(make_date(2020, 1, 15, 10, 30, 45))
    );
  }

  #[test]
  fn defaults_to_midday_without_time() {
    assert_eq!(
      parse_date_time("2020:01:15"),
      Some(make_date(2020, 1, 15, 12, 0, 0))
    );
  }

  #[test]
  fn parses_time_without_seconds() {
    assert_eq!(
      parse_date_time("2020:01:15 10:30"),
      Some(make_date(2020, 1, 15, 10, 30, 0))
    );
  }

  #[test]
  fn discards_subseconds() {
    assert_eq!(
      parse_date_time("2020:01:15 10:30:45.999"),
      Some(make_date(2020, 1, 15, 10, 30, 45))
    );
  }

  #[test]
  fn keeps_midday_for_unrecognized_time_shape() {
    assert_eq!(
      parse_date_time("2020:01:15 10"),
      Some(make_date(2020, 1, 15, 12, 0, 0))
    );
  }

  #[test]
  fn normalizes_positive_offset_to_utc() {
    assert_eq!(
      parse_date_time("2020:01:15 10:30:00+02:00"),
      parse_date_time("2020:01:15 08:30:00Z")
    );
  }

  #[test]
  fn normalizes_negative_offset_to_utc() {
    assert_eq!(
      parse_date_time("2020:01:15 22:15:00-05:30"),
      Some(make_date(2020, 1, 16, 3, 45, 0))
    );
  }

  #[test]
  fn treats_z_as_utc() {
    assert_eq!(
      parse_date_time("2020:01:15 08:30:00Z"),
      Some(make_date(2020, 1, 15, 8, 30, 0))
    );
  }

  #[test]
  fn ignores_malformed_offset() {
    assert_eq!(
      parse_date_time("2020:01:15 10:30:00+0200"),
      Some(make_date(2020, 1, 15, 10, 30, 0))
    );
  }

  #[test]
  fn rejects_empty() {
    assert_eq!(parse_date_time(""), None);
    assert_eq!(parse_date_time("   "), None);
  }

  #[test]
  fn rejects_zero_year() {
    assert_eq!(parse_date_time("0000:00:00 00:00:00"), None);
  }

  #[test]
  fn rejects_short_year() {
    assert_eq!(parse_date_time("20:01:15 10:30:00"), None);
  }

  #[test]
  fn rejects_time_only() {
    assert_eq!(parse_date_time("10:30:45.50"), None);
    assert_eq!(parse_date_time("10:30:45"), None);
  }

  #[test]
  fn rejects_decimal_in_date() {
    assert_eq!(parse_date_time("2020:01:15.5"), None);
  }

  #[test]
  fn rejects_wrong_component_count() {
    assert_eq!(parse_date_time("2020:01"), None);
    assert_eq!(parse_date_time("2020:01:15:01"), None);
    assert_eq!(parse_date_time("2020:01:"), None);
  }

  #[test]
  fn rejects_non_numeric_components() {
    assert_eq!(parse_date_time("abcd:01:15"), None);
    assert_eq!(parse_date_time("2020:ab:15"), None);
    assert_eq!(parse_date_time("2020:01:15 aa:30:00"), None);
    assert_eq!(parse_date_time("2020:01:15 10:30:00+aa:00"), None);
  }

  #[test]
  fn rejects_overflowing_offset() {
    assert_eq!(
      parse_date_time("2020:01:15 10:30:00+2562047788015:153722867280912"),
      None
    );
    assert_eq!(parse_date_time("2020:01:15 10:30:00-99999999999:00"), None);
  }

  #[test]
  fn rejects_impossible_dates() {
    assert_eq!(parse_date_time("2020:13:01 00:00:00"), None);
    assert_eq!(parse_date_time("2020:01:32 00:00:00"), None);
    assert_eq!(parse_date_time("2019:02:29 00:00:00"), None);
    assert_eq!(parse_date_time("2020:01:15 24:00:00"), None);
  }

  #[test]
  fn rejects_non_dates() {
    assert_eq!(parse_date_time("Canon EOS RP"), None);
    assert_eq!(parse_date_time("1/250"), None);
  }
}
