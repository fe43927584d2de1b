//! Deadline text form
//!
//! Whole-minute offsets use plain RFC 3339 (`Z` for UTC), the same text Go's
//! `time.Time` produces. RFC 3339 has no room for offset seconds, so offsets
//! carrying them are written as `+HH:MM:SS`; every `FixedOffset` round-trips.

use super::EncodeError;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, SecondsFormat, TimeZone};

const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Length of a `+HH:MM:SS` offset suffix
const SECONDS_OFFSET_LEN: usize = 9;

/// Reject deadlines whose year has no four-digit RFC 3339 form
pub(crate) fn check_deadline(deadline: &DateTime<FixedOffset>) -> Result<(), EncodeError> {
    let year = deadline.year();
    if !(0..=9999).contains(&year) {
        return Err(EncodeError::DeadlineOutOfRange { year });
    }
    Ok(())
}

pub(crate) fn format_deadline(deadline: &DateTime<FixedOffset>) -> String {
    let offset = deadline.offset().local_minus_utc();
    if offset % 60 == 0 {
        return deadline.to_rfc3339_opts(SecondsFormat::AutoSi, true);
    }

    let sign = if offset < 0 { '-' } else { '+' };
    let abs = offset.unsigned_abs();
    format!(
        "{}{sign}{:02}:{:02}:{:02}",
        deadline.naive_local().format(NAIVE_FORMAT),
        abs / 3600,
        abs / 60 % 60,
        abs % 60
    )
}

pub(crate) fn parse_deadline(text: &str) -> Result<DateTime<FixedOffset>, String> {
    if let Ok(deadline) = DateTime::parse_from_rfc3339(text) {
        return Ok(deadline);
    }
    parse_seconds_offset(text).ok_or_else(|| format!("invalid deadline '{text}'"))
}

fn parse_seconds_offset(text: &str) -> Option<DateTime<FixedOffset>> {
    let split = text.len().checked_sub(SECONDS_OFFSET_LEN)?;
    let (local, offset) = (text.get(..split)?, text.get(split..)?);

    let sign = match offset.as_bytes().first()? {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let mut parts = offset[1..].split(':');
    let mut total = 0i32;
    for (scale, max) in [(3600, 23), (60, 59), (1, 59)] {
        let part = parts.next()?;
        if part.len() != 2 {
            return None;
        }
        let value: i32 = part.parse().ok()?;
        if value > max {
            return None;
        }
        total += value * scale;
    }
    if parts.next().is_some() {
        return None;
    }

    let offset = FixedOffset::east_opt(sign * total)?;
    let naive = NaiveDateTime::parse_from_str(local, NAIVE_FORMAT).ok()?;
    offset.from_local_datetime(&naive).single()
}
