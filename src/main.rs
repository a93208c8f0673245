mod data;
mod report;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use data::loader::load_file;
use report::{context, summary};

#[derive(Parser, Debug)]
#[command(name = "telemetry-triage")]
#[command(about = "Diagnose vehicle physics issues from telemetry logs", long_about = None)]
struct Args {
    /// Telemetry log file (.csv, .json or .parquet)
    file: PathBuf,

    /// Print summary statistics
    #[arg(long)]
    summary: bool,

    /// Show context around detected problems
    #[arg(long)]
    context: bool,

    /// Show telemetry around a specific time (seconds)
    #[arg(long, value_name = "TIME")]
    around: Option<f64>,

    /// Half-width of the time window used by --around (seconds)
    #[arg(long, default_value_t = data::detect::CONTEXT_WINDOW)]
    window: f64,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    if !args.file.exists() {
        eprintln!("Error: File not found: {}", args.file.display());
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let log = load_file(&args.file)?;
    log::info!(
        "Loaded {} samples with columns {:?}",
        log.len(),
        log.column_names()
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();

    // Default to summary + context when no report is selected.
    let run_all = !args.summary && !args.context && args.around.is_none();

    if args.summary || run_all {
        summary::print_summary(&log, &mut out)?;
    }

    if args.context || run_all {
        context::print_problem_context(&log, &mut out)?;
    }

    if let Some(time) = args.around {
        context::print_around_time(&log, time, args.window, &mut out)?;
    }

    Ok(())
}
