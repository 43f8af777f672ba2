use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use hospital_jobs::app::normalize_use_case::NormalizeUseCase;
use hospital_jobs::config::Config;
use hospital_jobs::infra::input_source_adapter::FsInputSourceAdapter;
use hospital_jobs::infra::normalize_output_adapter::FileNormalizeOutputAdapter;
use hospital_jobs::logging::init_logging;
use hospital_jobs::pipeline::processing::normalize::dday::{
    classify, parse_reference_date, Clock, FixedClock, SystemClock,
};
use hospital_jobs::pipeline::processing::normalize::instant::to_iso;
use hospital_jobs::pipeline::processing::normalize::range::{match_tokens, parse_range};
use hospital_jobs::pipeline::processing::normalize::text::analyze;

#[derive(Parser)]
#[command(name = "hospital_jobs")]
#[command(about = "Normalize hospital recruitment postings into canonical records")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize JSON artifacts (files, or directories of files)
    Normalize {
        /// Input files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Directory for normalized output (overrides config)
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Extension of input files picked up from directories (overrides config)
        #[arg(long)]
        extension: Option<String>,
        /// Reference date, YYYY-MM-DD, instead of the current date in +09:00
        #[arg(long)]
        today: Option<String>,
        /// Normalize records one at a time
        #[arg(long)]
        sequential: bool,
    },
    /// Show how a single period string is cleaned, parsed and classified
    Inspect {
        /// Period text, e.g. "2025.10.24(금) 09:00 ~ 2025.11.03(월) 23:59"
        text: String,
        /// Reference date, YYYY-MM-DD
        #[arg(long)]
        today: Option<String>,
    },
}

fn clock_for(today: Option<&str>) -> Result<Box<dyn Clock>> {
    Ok(match today {
        Some(text) => Box::new(FixedClock::on(parse_reference_date(text)?)),
        None => Box::new(SystemClock),
    })
}

fn run_normalize(
    config: &Config,
    paths: Vec<PathBuf>,
    output_dir: Option<PathBuf>,
    extension: Option<String>,
    today: Option<String>,
    sequential: bool,
) -> Result<()> {
    let output_dir = output_dir.unwrap_or_else(|| config.normalize.output_dir.clone());
    let extension = extension.unwrap_or_else(|| config.normalize.extension.clone());
    let parallel = config.normalize.parallel && !sequential;

    let use_case = NormalizeUseCase::new(
        Box::new(FsInputSourceAdapter::new(&extension)),
        Box::new(FileNormalizeOutputAdapter::new(&output_dir)),
        clock_for(today.as_deref())?,
    )
    .with_parallel(parallel);

    let summary = use_case
        .run(&paths)
        .with_context(|| format!("failed writing to {}", output_dir.display()))?;

    println!("\n📊 Normalization results (today = {}):", summary.today);
    for artifact in &summary.written {
        println!(
            "   ✅ {} -> {} ({} records)",
            artifact.input.display(),
            artifact.output.display(),
            artifact.report.total
        );
        for (phase, count) in &artifact.report.phases {
            println!("      {phase}: {count}");
        }
    }
    for skipped in &summary.skipped {
        println!("   ⚠️  {} skipped: {}", skipped.input.display(), skipped.reason);
    }
    println!(
        "   Total: {} artifacts written, {} skipped, {} records",
        summary.written.len(),
        summary.skipped.len(),
        summary.records_written()
    );
    Ok(())
}

fn run_inspect(text: &str, today: Option<String>) -> Result<()> {
    let today = clock_for(today.as_deref())?.today();
    let cleaned = analyze(text);
    let pattern = if cleaned.open_ended {
        "rolling"
    } else {
        match_tokens(&cleaned.text).map(|(name, _)| name).unwrap_or("none")
    };
    let range = parse_range(text);
    let classification = classify(range.start.as_ref(), range.end.as_ref(), today);
    let show = |value: Option<String>| value.unwrap_or_else(|| "null".to_string());

    println!("cleaned:       {}", cleaned.text);
    println!("pattern:       {pattern}");
    println!("start_dt:      {}", show(range.start.as_ref().map(to_iso)));
    println!("end_dt:        {}", show(range.end.as_ref().map(to_iso)));
    println!("today:         {today}");
    println!("phase:         {}", classification.phase);
    println!("dday:          {}", show(classification.dday.map(|d| d.to_string())));
    println!("dday_to_start: {}", show(classification.dday_to_start.map(|d| d.to_string())));
    println!("dday_to_end:   {}", show(classification.dday_to_end.map(|d| d.to_string())));
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    dotenv::dotenv().ok();
    let config = Config::load().context("failed to load configuration")?;
    init_logging(&config.logging.dir)?;

    match cli.command {
        Commands::Normalize {
            paths,
            output_dir,
            extension,
            today,
            sequential,
        } => {
            info!(targets = paths.len(), "normalize requested");
            run_normalize(&config, paths, output_dir, extension, today, sequential)
        }
        Commands::Inspect { text, today } => run_inspect(&text, today),
    }
}
