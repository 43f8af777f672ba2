use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, FixedOffset};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A point in time pinned to the +09:00 civil zone.
pub type Instant = DateTime<FixedOffset>;

/// Loosely-structured record handed over by a collector.
///
/// Keys are source-dependent aliases; values are strings or absent. Blank strings are
/// kept as-is here and treated as absent by [`RawRecord::first_present`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: HashMap<String, String>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and adapters.
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        self.fields.insert(key.to_string(), value.to_string());
    }

    /// Convert a JSON value into a raw record.
    ///
    /// `null` and nested arrays/objects are dropped, numbers and booleans are kept in
    /// their string form. Anything that is not an object yields an empty record.
    pub fn from_json(value: &Value) -> Self {
        let mut record = Self::new();
        if let Some(obj) = value.as_object() {
            for (key, v) in obj {
                let text = match v {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    Value::Null | Value::Array(_) | Value::Object(_) => continue,
                };
                record.fields.insert(key.clone(), text);
            }
        }
        record
    }

    /// Trimmed value of `key`, if present and non-blank.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// First non-blank value among `keys`, in order.
    pub fn first_present(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.get(key))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<&CanonicalRecord> for RawRecord {
    fn from(record: &CanonicalRecord) -> Self {
        let mut raw = RawRecord::new().with("title", &record.title);
        for (key, value) in [
            ("start_dt", &record.start_dt),
            ("end_dt", &record.end_dt),
            ("dday", &record.dday.as_ref().map(|d| d.to_string())),
            ("detail_url", &record.detail_url),
        ] {
            if let Some(v) = value {
                raw.insert(key, v);
            }
        }
        raw
    }
}

/// Ordered pair of optional instants. `start` may be after `end`; that is reported,
/// never corrected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<Instant>,
    pub end: Option<Instant>,
}

impl DateRange {
    pub fn new(start: Option<Instant>, end: Option<Instant>) -> Self {
        Self { start, end }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// True when both sides are present and the end precedes the start.
    pub fn is_inverted(&self) -> bool {
        matches!((self.start, self.end), (Some(s), Some(e)) if e < s)
    }
}

/// Lifecycle phase of a posting relative to the reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Before,
    Open,
    Closed,
    Unknown,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Before => "before",
            Phase::Open => "open",
            Phase::Closed => "closed",
            Phase::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static DDAY_GRAMMAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^D[+-][0-9]+$").unwrap());

/// Countdown token: `D-<n>` (n days ahead) or `D+<n>` (n days past).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DdayToken(String);

impl DdayToken {
    pub fn until(days: u64) -> Self {
        Self(format!("D-{days}"))
    }

    pub fn since(days: u64) -> Self {
        Self(format!("D+{days}"))
    }

    pub fn today() -> Self {
        Self::until(0)
    }

    /// Signed distance from `today` to `target`: `D-n` on or before, `D+n` after.
    pub fn between(today: chrono::NaiveDate, target: chrono::NaiveDate) -> Self {
        let days = (target - today).num_days();
        if days >= 0 {
            Self::until(days.unsigned_abs())
        } else {
            Self::since(days.unsigned_abs())
        }
    }

    /// Accept a token that already matches `^D[+-][0-9]+$` (ASCII digits only), verbatim.
    pub fn parse(text: &str) -> Option<Self> {
        DDAY_GRAMMAR
            .is_match(text)
            .then(|| Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DdayToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The five-field record persisted for the downstream UI.
///
/// Field order is the serialization order; every key is always written, absent values
/// as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub title: String,
    pub start_dt: Option<String>,
    pub end_dt: Option<String>,
    pub dday: Option<DdayToken>,
    pub detail_url: Option<String>,
}
