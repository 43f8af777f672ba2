use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::app::ports::{InputSourcePort, NormalizeOutputPort};
use crate::common::error::{NormalizeError, Result};
use crate::domain::RawRecord;
use crate::observability::metrics;
use crate::pipeline::batch::{BatchOutput, BatchReport, BatchRunner};
use crate::pipeline::processing::normalize::dday::Clock;
use crate::pipeline::processing::normalize::RecordNormalizer;

/// Outcome of one artifact that was normalized and written.
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub report: BatchReport,
}

/// An artifact left untouched, with the reason.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedArtifact {
    pub input: PathBuf,
    pub reason: String,
}

/// Result of one invocation over a set of targets.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Reference date every record was classified against
    pub today: NaiveDate,
    pub written: Vec<ArtifactOutcome>,
    pub skipped: Vec<SkippedArtifact>,
}

impl RunSummary {
    pub fn records_written(&self) -> usize {
        self.written.iter().map(|a| a.report.total).sum()
    }
}

/// Use case for normalizing raw job-posting artifacts into canonical records
pub struct NormalizeUseCase {
    input: Box<dyn InputSourcePort>,
    output: Box<dyn NormalizeOutputPort>,
    clock: Box<dyn Clock>,
    parallel: bool,
}

impl NormalizeUseCase {
    pub fn new(
        input: Box<dyn InputSourcePort>,
        output: Box<dyn NormalizeOutputPort>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            input,
            output,
            clock,
            parallel: true,
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Normalize every artifact reachable from `targets`.
    ///
    /// Unreadable, invalid or non-list artifacts are skipped with a warning. A failure to
    /// write output aborts the run.
    pub fn run(&self, targets: &[PathBuf]) -> Result<RunSummary> {
        let today = self.clock.today();
        let runner = BatchRunner::new(RecordNormalizer::new(today)).with_parallel(self.parallel);
        let artifacts = self.input.discover(targets);
        info!(%today, artifacts = artifacts.len(), "starting normalization run");

        let mut summary = RunSummary {
            today,
            written: Vec::new(),
            skipped: Vec::new(),
        };

        for path in artifacts {
            let batch = match self.load_and_normalize(&runner, &path) {
                Ok(batch) => batch,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping artifact");
                    metrics::normalize::artifact_skipped(skip_reason(&e));
                    summary.skipped.push(SkippedArtifact {
                        input: path,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let output = self.output.write_artifact(&artifact_name(&path), &batch.canonical())?;
            metrics::normalize::artifact_written();
            info!(
                input = %path.display(),
                output = %output.display(),
                records = batch.report.total,
                "normalized artifact"
            );
            summary.written.push(ArtifactOutcome {
                input: path,
                output,
                report: batch.report,
            });
        }

        info!(
            written = summary.written.len(),
            skipped = summary.skipped.len(),
            records = summary.records_written(),
            "normalization run finished"
        );
        Ok(summary)
    }

    fn load_and_normalize(
        &self,
        runner: &BatchRunner<RecordNormalizer>,
        path: &Path,
    ) -> Result<BatchOutput> {
        let text = self.input.read(path)?;
        let Value::Array(items) = serde_json::from_str::<Value>(&text)? else {
            return Err(NormalizeError::NotASequence {
                path: path.to_path_buf(),
            });
        };

        let raws: Vec<RawRecord> = items.iter().map(RawRecord::from_json).collect();
        let batch = runner.run(&raws);
        record_batch_metrics(&batch);
        Ok(batch)
    }
}

fn record_batch_metrics(batch: &BatchOutput) {
    for record in &batch.records {
        let meta = &record.normalization;
        metrics::normalize::record_normalized(meta.classification.phase.as_str());
        metrics::normalize::dday_resolved(meta.dday_source.as_str());
        for warning in &meta.warnings {
            metrics::normalize::warning_logged(warning.as_str());
        }
    }
    metrics::normalize::batch_processed(batch.records.len());
}

fn skip_reason(error: &NormalizeError) -> &'static str {
    match error {
        NormalizeError::NotASequence { .. } => "not_a_sequence",
        NormalizeError::Json(_) => "invalid_json",
        NormalizeError::Io(_) => "unreadable",
        _ => "other",
    }
}

/// Output artifacts are named after the input's file stem.
fn artifact_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CanonicalRecord, Instant};
    use crate::pipeline::processing::normalize::dday::FixedClock;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct CountingClock {
        inner: FixedClock,
        reads: Arc<AtomicUsize>,
    }

    impl Clock for CountingClock {
        fn now(&self) -> Instant {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.now()
        }
    }

    struct MockInput {
        files: HashMap<PathBuf, String>,
    }

    impl InputSourcePort for MockInput {
        fn discover(&self, targets: &[PathBuf]) -> Vec<PathBuf> {
            targets.to_vec()
        }

        fn read(&self, path: &Path) -> Result<String> {
            self.files.get(path).cloned().ok_or_else(|| {
                NormalizeError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"))
            })
        }
    }

    #[derive(Clone, Default)]
    struct MockOutput {
        written: Arc<Mutex<Vec<(String, Vec<CanonicalRecord>)>>>,
    }

    impl NormalizeOutputPort for MockOutput {
        fn write_artifact(&self, name: &str, records: &[CanonicalRecord]) -> Result<PathBuf> {
            self.written
                .lock()
                .unwrap()
                .push((name.to_string(), records.to_vec()));
            Ok(PathBuf::from(format!("{name}.json")))
        }
    }

    fn use_case(files: &[(&str, &str)], output: MockOutput) -> NormalizeUseCase {
        let input = MockInput {
            files: files
                .iter()
                .map(|(p, body)| (PathBuf::from(p), body.to_string()))
                .collect(),
        };
        let today = NaiveDate::from_ymd_opt(2025, 10, 15).unwrap();
        NormalizeUseCase::new(Box::new(input), Box::new(output), Box::new(FixedClock::on(today)))
    }

    #[test]
    fn test_normalize_use_case() {
        let output = MockOutput::default();
        let written = output.written.clone();
        let uc = use_case(
            &[(
                "in/snuh.json",
                r#"[{"title": "간호사", "period_text": "2025-10-10 ~ 2025-10-19", "url": "https://x"}]"#,
            )],
            output,
        );

        let summary = uc.run(&[PathBuf::from("in/snuh.json")]).unwrap();
        assert_eq!(summary.written.len(), 1);
        assert_eq!(summary.records_written(), 1);
        assert_eq!(summary.written[0].output, PathBuf::from("snuh.json"));

        let written = written.lock().unwrap();
        assert_eq!(written[0].0, "snuh");
        assert_eq!(written[0].1[0].dday.as_ref().map(|d| d.as_str()), Some("D-4"));
        assert_eq!(written[0].1[0].detail_url.as_deref(), Some("https://x"));
    }

    #[test]
    fn test_bad_artifacts_are_skipped_and_run_continues() {
        let output = MockOutput::default();
        let written = output.written.clone();
        let uc = use_case(
            &[
                ("a.json", r#"{"title": "not a list"}"#),
                ("b.json", "[not json"),
                ("c.json", r#"[{"title": "ok"}, 42]"#),
            ],
            output,
        );

        let targets: Vec<PathBuf> = ["a.json", "b.json", "missing.json", "c.json"]
            .iter()
            .map(PathBuf::from)
            .collect();
        let summary = uc.with_parallel(false).run(&targets).unwrap();

        assert_eq!(summary.skipped.len(), 3);
        assert!(summary.skipped[0].reason.contains("not a list"));
        assert_eq!(summary.written.len(), 1);

        let written = written.lock().unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].0, "c");
        assert_eq!(written[0].1.len(), 2);
        assert_eq!(written[0].1[1].title, "");
    }

    #[test]
    fn test_clock_is_read_once_per_run() {
        let input = MockInput {
            files: [
                ("a.json", r#"[{"title": "a", "period_text": "2025-10-10 ~ 2025-10-19"}]"#),
                ("b.json", r#"[{"title": "b", "end_dt": "2025-10-31"}, {"title": "c"}]"#),
                ("c.json", r#"[{"title": "d", "period_text": "2025-10-20 ~ 상시"}]"#),
            ]
            .iter()
            .map(|(p, body)| (PathBuf::from(p), body.to_string()))
            .collect(),
        };
        let reads = Arc::new(AtomicUsize::new(0));
        let clock = CountingClock {
            inner: FixedClock::on(NaiveDate::from_ymd_opt(2025, 10, 15).unwrap()),
            reads: reads.clone(),
        };
        let uc = NormalizeUseCase::new(
            Box::new(input),
            Box::new(MockOutput::default()),
            Box::new(clock),
        );

        let targets: Vec<PathBuf> = ["a.json", "b.json", "c.json"].iter().map(PathBuf::from).collect();
        let summary = uc.run(&targets).unwrap();

        assert_eq!(summary.written.len(), 3);
        assert_eq!(summary.records_written(), 4);
        assert_eq!(reads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_artifact_name_uses_stem() {
        assert_eq!(artifact_name(Path::new("/data/raw/sungmo.json")), "sungmo");
        assert_eq!(artifact_name(Path::new("archive.tar.json")), "archive.tar");
    }
}
