//! Lifecycle phase and D-day countdown.
//!
//! Everything here is relative to a civil `today` in +09:00 that the caller captures once
//! per batch through a [`Clock`] and passes down explicitly.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::instant::{to_kst, KST};
use crate::common::constants::{
    KST_OFFSET_SECS, STATUS_BEFORE, STATUS_CLOSED, STATUS_OPEN, TODAY_LITERALS,
};
use crate::common::error::{NormalizeError, Result};
use crate::domain::{DdayToken, Instant, Phase};

/// Source of the reference "now".
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;

    /// Civil date in +09:00.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall clock, expressed in +09:00.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        to_kst(Utc::now())
    }
}

/// Frozen clock for tests and `--today` overrides.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Instant);

impl FixedClock {
    /// Noon of `date` in +09:00, well away from any day boundary.
    pub fn on(date: NaiveDate) -> Self {
        let noon = date.and_hms_opt(12, 0, 0).unwrap_or_default();
        let utc = noon - chrono::Duration::seconds(i64::from(KST_OFFSET_SECS));
        Self(DateTime::from_naive_utc_and_offset(utc, *KST))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Instant {
        self.0
    }
}

/// Parse a `YYYY-MM-DD` reference date such as a `--today` override.
pub fn parse_reference_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|_| NormalizeError::InvalidDate(text.to_string()))
}

/// Phase plus countdown tokens for one posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub phase: Phase,
    /// Smart countdown: to the start before opening, to the end while open, past the end after.
    pub dday: Option<DdayToken>,
    pub dday_to_start: Option<DdayToken>,
    pub dday_to_end: Option<DdayToken>,
}

/// Classify a posting against `today`.
///
/// Rules, first match wins:
/// 1. start known and today before its date: `before`, `D-<days to start>`
/// 2. end known, today on/before its date, start unknown or reached: `open`, `D-<days to end>`
/// 3. end known and today after its date: `closed`, `D+<days past end>`
/// 4. start reached, no end (rolling): `open`, no countdown
/// 5. otherwise `unknown`, no countdown
pub fn classify(start: Option<&Instant>, end: Option<&Instant>, today: NaiveDate) -> Classification {
    let start_day = start.map(|s| s.with_timezone(&*KST).date_naive());
    let end_day = end.map(|e| e.with_timezone(&*KST).date_naive());

    let (phase, dday) = match (start_day, end_day) {
        (Some(s), _) if today < s => (Phase::Before, Some(DdayToken::between(today, s))),
        (_, Some(e)) if today <= e => (Phase::Open, Some(DdayToken::between(today, e))),
        (_, Some(e)) => (Phase::Closed, Some(DdayToken::between(today, e))),
        (Some(_), None) => (Phase::Open, None),
        (None, None) => (Phase::Unknown, None),
    };

    Classification {
        phase,
        dday,
        dday_to_start: start_day.map(|s| DdayToken::between(today, s)),
        dday_to_end: end_day.map(|e| DdayToken::between(today, e)),
    }
}

/// Validate a countdown string supplied by the source.
///
/// Tokens matching `D-<n>`/`D+<n>` are kept verbatim; "today" literals become `D-0`;
/// anything else is `None` and the caller recomputes.
pub fn parse_dday_hint(text: &str) -> Option<DdayToken> {
    let trimmed = text.trim();
    if let Some(token) = DdayToken::parse(trimmed) {
        return Some(token);
    }
    let lowered = trimmed.to_lowercase();
    TODAY_LITERALS
        .iter()
        .any(|literal| lowered == *literal)
        .then(DdayToken::today)
}

/// Map a source status label onto a phase, if it is one we know.
pub fn phase_from_status(status: &str) -> Option<Phase> {
    let compact: String = status.split_whitespace().collect::<String>().to_lowercase();
    let known = |labels: &[&str]| labels.iter().any(|l| compact == *l);
    if known(STATUS_OPEN) {
        Some(Phase::Open)
    } else if known(STATUS_CLOSED) {
        Some(Phase::Closed)
    } else if known(STATUS_BEFORE) {
        Some(Phase::Before)
    } else {
        None
    }
}
