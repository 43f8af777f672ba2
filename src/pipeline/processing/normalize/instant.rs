//! Resolve date/time tokens into +09:00 instants.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;

use super::text::unify_date_separators;
use crate::common::constants::KST_OFFSET_SECS;
use crate::domain::Instant;

/// The fixed civil zone every instant is expressed in.
pub static KST: Lazy<FixedOffset> =
    Lazy::new(|| FixedOffset::east_opt(KST_OFFSET_SECS).expect("+09:00 is a valid offset"));

// +0900 -> +09:00, only at the very end of the token
static COMPACT_OFFSET: Lazy<Regex> = Lazy::new(|| Regex::new(r"([+-]\d{2})(\d{2})$").unwrap());

// listings write "through the end of the day" as 24:00
static LATE_MIDNIGHT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[T ]24:00(?::00)?$").unwrap());

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%d %H:%M%:z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Time-of-day applied when a token carries a date only.
pub fn time_of_day((hour, minute): (u32, u32)) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

/// Attach the fixed offset to a naive value.
pub fn assume_kst(naive: NaiveDateTime) -> Option<Instant> {
    KST.from_local_datetime(&naive).single()
}

/// Express any offset-bearing value in +09:00.
pub fn to_kst<Tz: TimeZone>(value: DateTime<Tz>) -> Instant {
    value.with_timezone(&*KST)
}

/// Parse a whole token (`2025-10-10`, `2025.10.10 09:00`, `2025-10-10T09:00:00+0900`, ...).
///
/// A bare date gets `default_time`. Returns `None` when no accepted format matches.
pub fn parse_instant(text: &str, default_time: NaiveTime) -> Option<Instant> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let unified = unify_date_separators(trimmed);
    let token = COMPACT_OFFSET.replace(&unified, "${1}:${2}");
    let token = LATE_MIDNIGHT.replace(&token, " 23:59");

    if let Ok(dt) = DateTime::parse_from_rfc3339(&token) {
        return Some(to_kst(dt));
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&token, format) {
            return Some(to_kst(dt));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&token, format) {
            return assume_kst(naive);
        }
    }
    NaiveDate::parse_from_str(&token, DATE_FORMAT)
        .ok()
        .and_then(|date| assume_kst(date.and_time(default_time)))
}

/// Combine a date token with an optional time token.
///
/// The default time only applies when no usable time token was extracted; an explicit
/// `00:00` stays `00:00`. A time that does not parse falls back to the bare date.
pub fn build(date_token: &str, time_token: Option<&str>, default_time: NaiveTime) -> Option<Instant> {
    time_token
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .and_then(|time| parse_instant(&format!("{} {}", date_token.trim(), time), default_time))
        .or_else(|| parse_instant(date_token, default_time))
}

/// ISO-8601 with seconds precision and an explicit `+09:00`.
pub fn to_iso(instant: &Instant) -> String {
    to_kst(*instant).to_rfc3339_opts(SecondsFormat::Secs, false)
}
