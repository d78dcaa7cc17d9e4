use anyhow::Result;
use clap::{ArgAction, Parser, ValueEnum};
use sortphotos_core::{
    sort_photos, ExistingTarget, FailurePolicy, MoveStatus, PathTemplate, RunReport, SkipReason,
    SortOptions, DEFAULT_TEMPLATE,
};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "sortphotos", version)]
#[command(about = "Moves photos into folders named after the date they were taken")]
struct Cli {
    /// Folder to scan, recursively, for photos
    origin: PathBuf,
    /// Root of the sorted tree; defaults to ORIGIN
    destination: Option<PathBuf>,
    /// strftime-style path pattern; `%original_filename` is replaced by the file name
    #[arg(short, long, default_value = DEFAULT_TEMPLATE)]
    pattern: String,
    /// Only report what would be moved
    #[arg(long, default_value_t = false)]
    dry_run: bool,
    /// Replace files already present at the destination
    #[arg(long, default_value_t = false)]
    overwrite: bool,
    /// Stop at the first failed move and exit with an error
    #[arg(long, default_value_t = false)]
    strict: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    #[arg(short, long, default_value_t = false, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    PathTemplate::parse(&cli.pattern)?;

    let options = SortOptions {
        template: cli.pattern,
        dry_run: cli.dry_run,
        existing_target: if cli.overwrite {
            ExistingTarget::Overwrite
        } else {
            ExistingTarget::Fail
        },
        failure_policy: if cli.strict {
            FailurePolicy::Abort
        } else {
            FailurePolicy::Continue
        },
        ..SortOptions::new(cli.origin).with_destination(cli.destination)
    };

    let report = sort_photos(&options)?;

    match cli.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => print_table(&report),
    }

    if report.summary.aborted {
        anyhow::bail!(
            "stopped after a failed move; {} file(s) were not attempted",
            report.summary.not_attempted
        );
    }
    if report.summary.failed > 0 {
        warn!("{} file(s) could not be moved", report.summary.failed);
    }
    if options.dry_run {
        info!("dry run: no files were changed, run without --dry-run to apply");
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, _) => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_table(report: &RunReport) {
    if !report.origin_found {
        println!("{} is not a folder, nothing to sort", report.origin_root.display());
    }
    println!("origin -> destination (status)");
    for outcome in &report.outcomes {
        println!(
            "{} -> {} ({})",
            outcome.origin.display(),
            outcome.destination.display(),
            status_label(outcome.status)
        );
    }

    for skipped in &report.skipped {
        println!(
            "{} (skipped: {})",
            skipped.path.display(),
            skip_label(skipped.reason)
        );
    }

    let s = &report.summary;
    println!(
        "\nsummary: moved={} would_move={} unchanged={} skipped={} failed={} not_attempted={}",
        s.moved, s.would_move, s.unchanged, s.skipped, s.failed, s.not_attempted
    );
}

fn status_label(status: MoveStatus) -> &'static str {
    match status {
        MoveStatus::Moved => "moved",
        MoveStatus::DryRun => "dry-run",
        MoveStatus::Unchanged => "unchanged",
        MoveStatus::Failed => "failed",
        MoveStatus::NotAttempted => "not attempted",
    }
}

fn skip_label(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::Unreadable => "unreadable",
        SkipReason::NoCaptureTime => "no date",
        SkipReason::MalformedCaptureTime => "malformed date",
    }
}
