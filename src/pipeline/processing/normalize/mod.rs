pub mod dday;
pub mod instant;
pub mod range;
pub mod text;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::common::constants::{
    DDAY_KEYS, DETAIL_URL_KEYS, END_KEY, END_OF_DAY, PERIOD_KEYS, START_KEY, START_OF_DAY,
    STATUS_KEY, TITLE_KEYS,
};
use crate::domain::{CanonicalRecord, DateRange, DdayToken, Instant, RawRecord};

use self::dday::{classify, parse_dday_hint, phase_from_status, Classification};
use self::instant::{parse_instant, time_of_day, to_iso};
use self::range::parse_range;

/// A canonical record together with what the normalizer learned producing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedRecord {
    /// The persisted five-field record
    pub record: CanonicalRecord,
    /// Normalization metadata (phase, dday provenance, warnings)
    pub normalization: NormalizationMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizationMetadata {
    /// Phase and countdown tokens computed against the batch reference date
    pub classification: Classification,
    /// Where the emitted dday came from
    pub dday_source: DdaySource,
    /// Data-quality notes; never fatal
    pub warnings: Vec<NormalizationWarning>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DdaySource {
    /// A valid token supplied by the source, kept verbatim
    Source,
    /// Computed from the resolved instants
    Computed,
    /// Nothing to compute from
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationWarning {
    /// No title alias was present; emitted with an empty title
    MissingTitle,
    /// The source dday did not match the token grammar and was recomputed
    DdayDiscarded,
    /// Both instants present and end precedes start; passed through as-is
    InvertedRange,
    /// Period text was present but yielded no instant
    UnparsedPeriod,
    /// The source status label disagrees with the computed phase
    StatusMismatch,
}

impl DdaySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DdaySource::Source => "source",
            DdaySource::Computed => "computed",
            DdaySource::None => "none",
        }
    }
}

impl NormalizationWarning {
    pub fn as_str(&self) -> &'static str {
        match self {
            NormalizationWarning::MissingTitle => "missing_title",
            NormalizationWarning::DdayDiscarded => "dday_discarded",
            NormalizationWarning::InvertedRange => "inverted_range",
            NormalizationWarning::UnparsedPeriod => "unparsed_period",
            NormalizationWarning::StatusMismatch => "status_mismatch",
        }
    }
}

/// Seam between batch handling and the per-record rules.
pub trait Normalizer: Send + Sync {
    /// Map one raw record onto the canonical schema, keeping the metadata. Never fails.
    fn normalize_detailed(&self, raw: &RawRecord) -> NormalizedRecord;

    fn normalize(&self, raw: &RawRecord) -> CanonicalRecord {
        self.normalize_detailed(raw).record
    }
}

/// Default normalizer: alias tables, explicit-over-derived instants, validated dday.
///
/// The reference date is bound at construction so that every record in a batch is
/// classified against the same `today`.
#[derive(Debug, Clone, Copy)]
pub struct RecordNormalizer {
    today: NaiveDate,
}

impl RecordNormalizer {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    /// Explicit `start_dt`/`end_dt` win; missing sides are filled from the first period
    /// alias present.
    fn resolve_range(&self, raw: &RawRecord, warnings: &mut Vec<NormalizationWarning>) -> DateRange {
        let explicit = DateRange::new(
            raw.get(START_KEY)
                .and_then(|s| parse_instant(s, time_of_day(START_OF_DAY))),
            raw.get(END_KEY)
                .and_then(|s| parse_instant(s, time_of_day(END_OF_DAY))),
        );
        if explicit.start.is_some() && explicit.end.is_some() {
            return explicit;
        }

        let Some(period) = raw.first_present(PERIOD_KEYS) else {
            return explicit;
        };
        let derived = parse_range(period);
        if derived.is_empty() {
            debug!(period, "period text yielded no dates");
            warnings.push(NormalizationWarning::UnparsedPeriod);
        }

        DateRange::new(
            explicit.start.or(derived.start),
            explicit.end.or(derived.end),
        )
    }

    fn resolve_dday(
        &self,
        raw: &RawRecord,
        classification: &Classification,
        warnings: &mut Vec<NormalizationWarning>,
    ) -> (Option<DdayToken>, DdaySource) {
        if let Some(hint) = raw.first_present(DDAY_KEYS) {
            match parse_dday_hint(hint) {
                Some(token) => return (Some(token), DdaySource::Source),
                None => {
                    debug!(hint, "discarding malformed dday");
                    warnings.push(NormalizationWarning::DdayDiscarded);
                }
            }
        }
        match &classification.dday {
            Some(token) => (Some(token.clone()), DdaySource::Computed),
            None => (None, DdaySource::None),
        }
    }
}

fn iso(instant: Option<&Instant>) -> Option<String> {
    instant.map(to_iso)
}

impl Normalizer for RecordNormalizer {
    fn normalize_detailed(&self, raw: &RawRecord) -> NormalizedRecord {
        let mut warnings = Vec::new();

        let title = match raw.first_present(TITLE_KEYS) {
            Some(title) => title.to_string(),
            None => {
                warnings.push(NormalizationWarning::MissingTitle);
                String::new()
            }
        };
        let detail_url = raw.first_present(DETAIL_URL_KEYS).map(str::to_string);

        let range = self.resolve_range(raw, &mut warnings);
        if range.is_inverted() {
            warnings.push(NormalizationWarning::InvertedRange);
        }

        let classification = classify(range.start.as_ref(), range.end.as_ref(), self.today);
        let (dday, dday_source) = self.resolve_dday(raw, &classification, &mut warnings);

        if let Some(status) = raw.get(STATUS_KEY) {
            if phase_from_status(status).is_some_and(|hinted| hinted != classification.phase) {
                debug!(status, phase = %classification.phase, "status label disagrees with dates");
                warnings.push(NormalizationWarning::StatusMismatch);
            }
        }

        NormalizedRecord {
            record: CanonicalRecord {
                title,
                start_dt: iso(range.start.as_ref()),
                end_dt: iso(range.end.as_ref()),
                dday,
                detail_url,
            },
            normalization: NormalizationMetadata {
                classification,
                dday_source,
                warnings,
            },
        }
    }
}

/// One-shot convenience for callers that only need the canonical record.
pub fn normalize(raw: &RawRecord, today: NaiveDate) -> CanonicalRecord {
    RecordNormalizer::new(today).normalize(raw)
}
