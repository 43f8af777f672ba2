//! Extract a (start, end) pair from period text.
//!
//! Matching is driven by [`RANGE_PATTERNS`], an ordered table of `(name, regex, extractor)`
//! entries evaluated against cleaned text. A new date dialect is one more row here (or one
//! more rewrite in the cleaner); classification never changes.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::trace;

use super::instant::{build, time_of_day};
use super::text::analyze;
use crate::common::constants::{END_OF_DAY, START_OF_DAY};
use crate::domain::DateRange;

/// Date/time tokens pulled out of one side of a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SideTokens<'t> {
    pub date: &'t str,
    pub time: Option<&'t str>,
}

/// Raw token pair produced by a pattern, before instants are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RangeTokens<'t> {
    pub start: Option<SideTokens<'t>>,
    pub end: Option<SideTokens<'t>>,
}

pub type Extractor = for<'t> fn(&Captures<'t>) -> RangeTokens<'t>;

/// One row of the pattern table.
pub struct RangePattern {
    pub name: &'static str,
    pub regex: Regex,
    pub extract: Extractor,
}

const DATE: &str = r"\d{4}-\d{2}-\d{2}";
const TIME: &str = r"\d{2}:\d{2}(?::\d{2})?";
// short annotation between a start and the separator, e.g. `부터` or `(접수)`
const GAP: &str = r"[^\d~]{0,12}?";

fn side<'t>(caps: &Captures<'t>, date: &str, time: &str) -> Option<SideTokens<'t>> {
    caps.name(date).map(|d| SideTokens {
        date: d.as_str(),
        time: caps.name(time).map(|t| t.as_str()),
    })
}

fn extract_range<'t>(caps: &Captures<'t>) -> RangeTokens<'t> {
    RangeTokens {
        start: side(caps, "sdate", "stime"),
        end: side(caps, "edate", "etime"),
    }
}

fn extract_end_only<'t>(caps: &Captures<'t>) -> RangeTokens<'t> {
    RangeTokens {
        start: None,
        end: side(caps, "edate", "etime"),
    }
}

fn extract_single<'t>(caps: &Captures<'t>) -> RangeTokens<'t> {
    RangeTokens {
        start: side(caps, "sdate", "stime"),
        end: None,
    }
}

/// Ordered pattern table; the first matching row wins.
pub static RANGE_PATTERNS: Lazy<Vec<RangePattern>> = Lazy::new(|| {
    let start = format!(r"(?P<sdate>{DATE})(?:\s*T?\s*(?P<stime>{TIME}))?");
    let end = format!(r"(?P<edate>{DATE})(?:\s*T?\s*(?P<etime>{TIME}))?");
    vec![
        RangePattern {
            name: "range",
            regex: Regex::new(&format!(r"{start}{GAP}[~-]\s*{end}")).unwrap(),
            extract: extract_range,
        },
        RangePattern {
            name: "end_only",
            regex: Regex::new(&format!(r"^[^\d]*~\s*{end}")).unwrap(),
            extract: extract_end_only,
        },
        RangePattern {
            name: "single",
            regex: Regex::new(&start).unwrap(),
            extract: extract_single,
        },
    ]
});

static FIRST_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?P<sdate>{DATE})(?:\s*T?\s*(?P<stime>{TIME}))?")).unwrap()
});

/// Run the pattern table over already-cleaned text.
pub fn match_tokens(cleaned: &str) -> Option<(&'static str, RangeTokens<'_>)> {
    RANGE_PATTERNS.iter().find_map(|pattern| {
        pattern
            .regex
            .captures(cleaned)
            .map(|caps| (pattern.name, (pattern.extract)(&caps)))
    })
}

fn resolve(tokens: RangeTokens<'_>) -> DateRange {
    let start = tokens
        .start
        .and_then(|s| build(s.date, s.time, time_of_day(START_OF_DAY)));
    // a bare end date means "through the end of that day"
    let end = tokens
        .end
        .and_then(|e| build(e.date, e.time, time_of_day(END_OF_DAY)));
    DateRange::new(start, end)
}

/// Parse free-form period text into a [`DateRange`]. Never fails.
///
/// Rolling postings (`상시`, `채용시마감`) keep only their first date, as the start; the
/// end stays absent. Inverted ranges are returned as parsed.
pub fn parse_range(text: &str) -> DateRange {
    let cleaned = analyze(text);
    if cleaned.text.is_empty() {
        return DateRange::empty();
    }

    if cleaned.open_ended {
        let tokens = FIRST_DATE
            .captures(&cleaned.text)
            .map(|caps| extract_single(&caps))
            .unwrap_or_default();
        trace!(text = %cleaned.text, "rolling posting, end left open");
        return resolve(tokens);
    }

    match match_tokens(&cleaned.text) {
        Some((name, tokens)) => {
            trace!(pattern = name, text = %cleaned.text, "period text matched");
            resolve(tokens)
        }
        None => DateRange::empty(),
    }
}
