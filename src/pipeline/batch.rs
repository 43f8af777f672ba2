use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::domain::{CanonicalRecord, RawRecord};
use crate::pipeline::processing::normalize::{NormalizedRecord, Normalizer};

/// Counts for one artifact's worth of records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub total: usize,
    /// Keyed by phase name (`before`, `open`, ...)
    pub phases: BTreeMap<String, usize>,
    /// Keyed by dday source (`source`, `computed`, `none`)
    pub dday_sources: BTreeMap<String, usize>,
    /// Keyed by warning name; a record with two warnings counts twice
    pub warnings: BTreeMap<String, usize>,
}

impl BatchReport {
    fn tally(&mut self, record: &NormalizedRecord) {
        let meta = &record.normalization;
        self.total += 1;
        *self
            .phases
            .entry(meta.classification.phase.as_str().to_string())
            .or_default() += 1;
        *self
            .dday_sources
            .entry(meta.dday_source.as_str().to_string())
            .or_default() += 1;
        for warning in &meta.warnings {
            *self.warnings.entry(warning.as_str().to_string()).or_default() += 1;
        }
    }

    pub fn phase_count(&self, phase: &str) -> usize {
        self.phases.get(phase).copied().unwrap_or(0)
    }

    pub fn warning_count(&self, warning: &str) -> usize {
        self.warnings.get(warning).copied().unwrap_or(0)
    }

    pub fn from_records(records: &[NormalizedRecord]) -> Self {
        let mut report = Self::default();
        for record in records {
            report.tally(record);
        }
        report
    }
}

/// Output of one batch: records in input order plus the report.
#[derive(Debug, Clone)]
pub struct BatchOutput {
    pub records: Vec<NormalizedRecord>,
    pub report: BatchReport,
}

impl BatchOutput {
    pub fn canonical(&self) -> Vec<CanonicalRecord> {
        self.records.iter().map(|r| r.record.clone()).collect()
    }
}

/// Applies a [`Normalizer`] to every record of an artifact.
pub struct BatchRunner<N: Normalizer> {
    normalizer: N,
    parallel: bool,
}

impl<N: Normalizer> BatchRunner<N> {
    pub fn new(normalizer: N) -> Self {
        Self {
            normalizer,
            parallel: true,
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Normalize `records`, preserving their order.
    pub fn run(&self, records: &[RawRecord]) -> BatchOutput {
        let normalized: Vec<NormalizedRecord> = if self.parallel {
            records
                .par_iter()
                .map(|raw| self.normalizer.normalize_detailed(raw))
                .collect()
        } else {
            records
                .iter()
                .map(|raw| self.normalizer.normalize_detailed(raw))
                .collect()
        };

        let report = BatchReport::from_records(&normalized);
        debug!(
            total = report.total,
            parallel = self.parallel,
            "batch normalized"
        );

        BatchOutput {
            records: normalized,
            report,
        }
    }
}
