use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use hospital_jobs::app::normalize_use_case::NormalizeUseCase;
use hospital_jobs::infra::input_source_adapter::FsInputSourceAdapter;
use hospital_jobs::infra::normalize_output_adapter::FileNormalizeOutputAdapter;
use hospital_jobs::pipeline::processing::normalize::dday::FixedClock;
use serde_json::{json, Value};
use tempfile::tempdir;

fn use_case(out_dir: PathBuf) -> NormalizeUseCase {
    let today = NaiveDate::from_ymd_opt(2025, 10, 15).unwrap();
    NormalizeUseCase::new(
        Box::new(FsInputSourceAdapter::new("json")),
        Box::new(FileNormalizeOutputAdapter::new(out_dir)),
        Box::new(FixedClock::on(today)),
    )
}

#[test]
fn test_directory_run_writes_one_artifact_per_input() -> Result<()> {
    let temp_dir = tempdir()?;
    let input = temp_dir.path().join("raw");
    let output = temp_dir.path().join("normalized");
    fs::create_dir_all(&input)?;

    fs::write(
        input.join("snuh.json"),
        serde_json::to_string(&json!([
            {
                "title": "2026년도 신규간호사 채용",
                "period_text": "2025.10.10(금) 10:00 ~ 2025.10.19(일)",
                "link": "https://example.org/notice/1"
            },
            {
                "subject": "약사 상시 모집",
                "date": "2025-10-01 ~ 상시채용"
            }
        ]))?,
    )?;
    fs::write(input.join("broken.json"), r#"{"items": []}"#)?;
    fs::write(input.join("readme.md"), "ignored")?;

    let summary = use_case(output.clone()).run(&[input.clone()])?;

    assert_eq!(summary.written.len(), 1);
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(summary.skipped[0].input, input.join("broken.json"));
    assert!(!output.join("broken.json").exists());

    let text = fs::read_to_string(output.join("snuh.json"))?;
    assert!(text.contains("신규간호사"), "non-ASCII must be written literally");
    assert!(text.contains("\n  {\n    \"title\""), "two-space indentation");

    let records: Value = serde_json::from_str(&text)?;
    assert_eq!(
        records,
        json!([
            {
                "title": "2026년도 신규간호사 채용",
                "start_dt": "2025-10-10T10:00:00+09:00",
                "end_dt": "2025-10-19T23:59:00+09:00",
                "dday": "D-4",
                "detail_url": "https://example.org/notice/1"
            },
            {
                "title": "약사 상시 모집",
                "start_dt": "2025-10-01T00:00:00+09:00",
                "end_dt": null,
                "dday": null,
                "detail_url": null
            }
        ])
    );

    let report = &summary.written[0].report;
    assert_eq!(report.total, 2);
    assert_eq!(report.phase_count("open"), 2);
    Ok(())
}

#[test]
fn test_rerunning_on_output_is_stable() -> Result<()> {
    let temp_dir = tempdir()?;
    let input = temp_dir.path().join("jungang.json");
    fs::write(
        &input,
        serde_json::to_string(&json!([
            {"title": "임상병리사", "period_text": "2025.09.20 ~ 2025.10.05 18:00", "dday": "D+10"},
            {"title": "조리원", "end_dt": "2025-10-31"}
        ]))?,
    )?;

    let first_out = temp_dir.path().join("first");
    let second_out = temp_dir.path().join("second");
    use_case(first_out.clone()).run(&[input])?;
    use_case(second_out.clone())
        .with_parallel(false)
        .run(&[first_out.join("jungang.json")])?;

    assert_eq!(
        fs::read_to_string(first_out.join("jungang.json"))?,
        fs::read_to_string(second_out.join("jungang.json"))?
    );
    Ok(())
}

#[test]
fn test_missing_targets_are_ignored() -> Result<()> {
    let temp_dir = tempdir()?;
    let summary = use_case(temp_dir.path().join("out")).run(&[temp_dir.path().join("nope")])?;
    assert!(summary.written.is_empty());
    assert!(summary.skipped.is_empty());
    Ok(())
}
