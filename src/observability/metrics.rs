//! Metrics for the normalization pipeline.
//!
//! Recording goes through the `metrics` facade only. With no recorder installed every call
//! is a no-op; embedding applications can install whichever exporter they run.

use std::fmt;

/// All metric names used by the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    NormalizeRecordsProcessed,
    NormalizeDdaySource,
    NormalizeWarnings,
    NormalizeBatchesProcessed,
    NormalizeBatchSize,
    NormalizeArtifactsWritten,
    NormalizeArtifactsSkipped,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::NormalizeRecordsProcessed => "hospital_jobs_normalize_records_processed_total",
            MetricName::NormalizeDdaySource => "hospital_jobs_normalize_dday_source_total",
            MetricName::NormalizeWarnings => "hospital_jobs_normalize_warnings_total",
            MetricName::NormalizeBatchesProcessed => "hospital_jobs_normalize_batches_processed_total",
            MetricName::NormalizeBatchSize => "hospital_jobs_normalize_batch_size",
            MetricName::NormalizeArtifactsWritten => "hospital_jobs_normalize_artifacts_written_total",
            MetricName::NormalizeArtifactsSkipped => "hospital_jobs_normalize_artifacts_skipped_total",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub mod normalize {
    use super::MetricName;

    /// Record one normalized record under its phase
    pub fn record_normalized(phase: &str) {
        ::metrics::counter!(MetricName::NormalizeRecordsProcessed.as_str(), "phase" => phase.to_string())
            .increment(1);
    }

    /// Record where a record's dday came from
    pub fn dday_resolved(source: &str) {
        ::metrics::counter!(MetricName::NormalizeDdaySource.as_str(), "source" => source.to_string())
            .increment(1);
    }

    /// Record a data-quality warning
    pub fn warning_logged(warning: &str) {
        ::metrics::counter!(MetricName::NormalizeWarnings.as_str(), "warning_type" => warning.to_string())
            .increment(1);
    }

    /// Record that a batch was processed
    pub fn batch_processed(batch_size: usize) {
        ::metrics::histogram!(MetricName::NormalizeBatchSize.as_str()).record(batch_size as f64);
        ::metrics::counter!(MetricName::NormalizeBatchesProcessed.as_str()).increment(1);
    }

    pub fn artifact_written() {
        ::metrics::counter!(MetricName::NormalizeArtifactsWritten.as_str()).increment(1);
    }

    /// Record an artifact that was skipped, labelled by reason
    pub fn artifact_skipped(reason: &str) {
        ::metrics::counter!(MetricName::NormalizeArtifactsSkipped.as_str(), "reason" => reason.to_string())
            .increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names_are_prefixed() {
        for name in [
            MetricName::NormalizeRecordsProcessed,
            MetricName::NormalizeDdaySource,
            MetricName::NormalizeWarnings,
            MetricName::NormalizeBatchesProcessed,
            MetricName::NormalizeBatchSize,
            MetricName::NormalizeArtifactsWritten,
            MetricName::NormalizeArtifactsSkipped,
        ] {
            assert!(name.to_string().starts_with("hospital_jobs_normalize_"));
        }
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        normalize::record_normalized("open");
        normalize::batch_processed(3);
        normalize::artifact_skipped("not_a_sequence");
    }
}
