//! Noise removal for free-form period text.
//!
//! Collectors hand over strings such as `2025.10.24(금) 09:00 ~ 2025.11.03(월) 23:59 까지`.
//! Cleaning brings every dialect down to `YYYY-MM-DD[ HH:MM] ~ YYYY-MM-DD[ HH:MM]` so the
//! range patterns only have to know one date shape.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::common::constants::{QUALIFIER_PHRASES, ROLLING_PHRASES};

/// Cleaned text plus what was learned before the qualifiers were stripped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CleanedText {
    pub text: String,
    /// A rolling qualifier (`상시`, `채용시마감`, ...) was present.
    pub open_ended: bool,
}

// 2025.10.24 / 2025/10/24 / 2025. 10. 24. / 2025-10-24
static DOTTED_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{4})(?:\s*[./]\s*|-)(\d{1,2})(?:\s*[./]\s*|-)(\d{1,2})(?:\s*\.)?").unwrap()
});

// 2025년 10월 24일
static KOREAN_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{4})\s*년\s*(\d{1,2})\s*월\s*(\d{1,2})\s*일").unwrap()
});

static SHORT_HOUR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(^|[^\d:])(\d):(\d{2})").unwrap());

static WAVE_DASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"[～〜∼–—]").unwrap());

static WEEKDAY_ANNOTATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\(\s*(?:[월화수목금토일](?:요일)?|mon|tue|wed|thu|fri|sat|sun)[a-z]*\.?\s*\)",
    )
    .unwrap()
});

// `채용 시 마감` shows up with arbitrary inner spacing
static SPACED_UNTIL_FILLED: Lazy<Regex> = Lazy::new(|| Regex::new(r"채용\s*시\s*마감").unwrap());

// parenthesized notes never make a posting rolling
static PARENTHESIZED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([^)]*\)").unwrap());

static EMPTY_PARENS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(\s*\)").unwrap());

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

fn pad_date(caps: &Captures) -> String {
    format!("{}-{:0>2}-{:0>2}", &caps[1], &caps[2], &caps[3])
}

/// Bring `.`/`/`-separated and Korean-unit dates to `YYYY-MM-DD`, leaving other dots alone.
pub fn unify_date_separators(raw: &str) -> String {
    let text = KOREAN_DATE.replace_all(raw, pad_date);
    DOTTED_DATE.replace_all(&text, pad_date).into_owned()
}

/// Full cleaning pass, reporting whether the posting is rolling.
pub fn analyze(raw: &str) -> CleanedText {
    if raw.trim().is_empty() {
        return CleanedText::default();
    }

    // (a) separators
    let text = unify_date_separators(raw);
    let text = WAVE_DASH.replace_all(&text, "~");
    let text = SHORT_HOUR.replace_all(&text, "${1}0${2}:${3}");

    // (b) weekday annotations
    let text = WEEKDAY_ANNOTATION.replace_all(&text, " ");

    // (c) qualifiers; rolling status must be read before it is stripped
    let mut text = SPACED_UNTIL_FILLED.replace_all(&text, "채용시마감").into_owned();
    let unbracketed = PARENTHESIZED.replace_all(&text, " ");
    let open_ended = ROLLING_PHRASES.iter().any(|p| unbracketed.contains(p));
    for phrase in QUALIFIER_PHRASES {
        text = text.replace(phrase, " ");
    }
    let text = EMPTY_PARENS.replace_all(&text, " ");

    // (d) whitespace
    let text = WHITESPACE.replace_all(&text, " ").trim().to_string();

    CleanedText { text, open_ended }
}

/// Pure, total cleaning. Returns `""` for empty input.
pub fn clean(raw: &str) -> String {
    analyze(raw).text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_dotted_range_with_weekdays() {
        assert_eq!(
            clean("2025.10.24(금) 09:00 ~ 2025.11.03(월) 23:59"),
            "2025-10-24 09:00 ~ 2025-11-03 23:59"
        );
    }

    #[test]
    fn test_clean_slashes_and_padding() {
        assert_eq!(clean("2025/9/1 ~ 2025/9/30"), "2025-09-01 ~ 2025-09-30");
        assert_eq!(clean("2025. 10. 24. ~ 2025. 10. 31."), "2025-10-24 ~ 2025-10-31");
    }

    #[test]
    fn test_clean_korean_units() {
        assert_eq!(clean("2025년 10월 1일 ~ 2025년 10월 15일"), "2025-10-01 ~ 2025-10-15");
    }

    #[test]
    fn test_clean_strips_qualifiers() {
        assert_eq!(clean("2025-10-31 23:00 까지"), "2025-10-31 23:00");
        assert_eq!(clean("2025.10.31 접수마감"), "2025-10-31");
        assert_eq!(clean("2025.10.10 ~ 채용 시 마감"), "2025-10-10 ~");
    }

    #[test]
    fn test_clean_wave_dash_and_short_hour() {
        assert_eq!(clean("2025-10-01 9:00 ～ 2025-10-02 18:00"), "2025-10-01 09:00 ~ 2025-10-02 18:00");
    }

    #[test]
    fn test_clean_keeps_non_weekday_parentheses() {
        assert_eq!(clean("간호사(정규직)"), "간호사(정규직)");
    }

    #[test]
    fn test_analyze_detects_rolling() {
        let cleaned = analyze("2025-10-10 ~ 상시채용");
        assert!(cleaned.open_ended);
        assert_eq!(cleaned.text, "2025-10-10 ~");

        assert!(!analyze("2025-10-10 ~ 2025-10-20 마감").open_ended);
    }

    #[test]
    fn test_bracketed_rolling_note_does_not_open_end() {
        for raw in ["2025.10.10 ~ 2025.10.19 (상시)", "2025.10.10 ~ 2025.10.19 (채용시 마감)"] {
            let cleaned = analyze(raw);
            assert!(!cleaned.open_ended, "{raw}");
            assert_eq!(cleaned.text, "2025-10-10 ~ 2025-10-19");
        }
    }

    #[test]
    fn test_clean_empty_and_whitespace() {
        assert_eq!(clean(""), "");
        assert_eq!(clean("   \t "), "");
        assert_eq!(analyze("  "), CleanedText::default());
    }
}
