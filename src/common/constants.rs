//! Field alias tables, fixed times and vocabulary shared across the normalizer.
//! Alias lists are ordered: the first non-blank value wins.

// Canonical record aliases
pub const TITLE_KEYS: &[&str] = &["title", "subject", "name"];
pub const DETAIL_URL_KEYS: &[&str] = &["detail_url", "url", "link"];
pub const START_KEY: &str = "start_dt";
pub const END_KEY: &str = "end_dt";
pub const PERIOD_KEYS: &[&str] = &["period_text", "date_text", "period", "date"];

// Hint keys: consulted, validated, never copied blindly
pub const DDAY_KEYS: &[&str] = &["dday", "deadline_text"];
pub const STATUS_KEY: &str = "status";

/// Every instant in the system carries this offset (KST, UTC+9).
pub const KST_OFFSET_SECS: i32 = 9 * 3600;

// Default time-of-day for bare dates
pub const START_OF_DAY: (u32, u32) = (0, 0);
pub const END_OF_DAY: (u32, u32) = (23, 59);

/// Source countdown strings that mean "closes today"; all normalize to `D-0`.
pub const TODAY_LITERALS: &[&str] = &["오늘", "오늘마감", "d-day"];

/// Qualifiers stripped from period text, longest first so `접수마감` wins over `마감`.
pub const QUALIFIER_PHRASES: &[&str] = &[
    "채용시마감",
    "상시채용",
    "접수마감",
    "상시",
    "마감",
    "까지",
];

/// Qualifiers that mark a rolling posting with no end date.
pub const ROLLING_PHRASES: &[&str] = &["상시채용", "채용시마감", "상시"];

// Source status vocabulary mapped onto lifecycle phases
pub const STATUS_OPEN: &[&str] = &["접수중", "진행중", "모집중", "open"];
pub const STATUS_CLOSED: &[&str] = &["접수마감", "채용마감", "마감", "종료", "closed"];
pub const STATUS_BEFORE: &[&str] = &["접수예정", "예정", "before"];

// Batch I/O defaults
pub const DEFAULT_OUTPUT_DIR: &str = "normalized";
pub const DEFAULT_INPUT_EXTENSION: &str = "json";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
