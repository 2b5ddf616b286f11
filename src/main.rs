/*!
 * Command-line interface for codescribe
 */

use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use codescribe::config::{Args, Config};
use codescribe::report::{CollectionReport, ReportFormat, Reporter};
use codescribe::service::{DocumentService, HttpDocumentService};
use codescribe::writer::DocumentWriter;
use codescribe::{Collection, Collector, Result};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("CodeScribe Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    let config = Config::from_args(args)?;
    config.validate()?;

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {pos} files {wide_msg:.dim.white}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    progress.enable_steady_tick(Duration::from_millis(100));
    progress.set_prefix("📂 Collecting code files");

    let start_time = Instant::now();
    let outcome = collect_and_generate(&config, &progress);
    progress.finish_and_clear();

    let Some(mut report) = outcome? else {
        println!("No code files found to document.");
        return Ok(());
    };

    report.duration = start_time.elapsed();
    Reporter::new(ReportFormat::ConsoleTable).print_report(&report);

    Ok(())
}

/// Collect the project and, unless this is a dry run, generate and write the
/// documentation. Returns `None` when no file qualified.
fn collect_and_generate(config: &Config, progress: &ProgressBar) -> Result<Option<CollectionReport>> {
    let collector = Collector::new(config.policy.clone()).follow_symlinks(config.follow_symlinks);

    let mut collection = Collection::default();
    for item in collector.records(&config.target_dir)? {
        match item {
            Ok(record) => {
                progress.inc(1);
                progress.set_message(record.relative_path().display().to_string());
                collection.records.push(record);
            }
            Err(e) => collection.warnings.push(e),
        }
    }

    if collection.is_empty() {
        return Ok(None);
    }

    let mut report =
        CollectionReport::from_collection(config.target_dir.display().to_string(), &collection);

    if config.dry_run {
        info!("dry run, skipping documentation service");
        return Ok(Some(report));
    }

    progress.set_prefix("🧠 Generating documentation");
    progress.set_message(config.endpoint.clone());

    let service = HttpDocumentService::new(config.endpoint.as_str(), config.timeout)?;
    let document = service.generate(&collection.records)?;

    let writer = DocumentWriter::new(&config.output_file);
    let output_file = writer.write(&document)?;
    report.output_file = Some(output_file.display().to_string());

    if config.open_document {
        if let Err(e) = open::that(output_file) {
            warn!(path = %output_file.display(), "could not open documentation: {}", e);
        }
    }

    Ok(Some(report))
}
