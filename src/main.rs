use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use phototime::phototime_core::dates::{DISPLAY_FORMAT, display_in, system_offset};
use phototime::phototime_core::report::{format_report, format_summary};
use phototime::phototime_core::{
    Cli, Commands, CorrectionRequest, FsTimestampWriter, MatchConfig, apply_batch, apply_one,
    scan_and_reconcile,
};
use simplelog::{CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, WriteLogger};
use std::fs::File;
use std::io::{self, Write};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize loggers
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        LevelFilter::Warn,
        Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )];

    if cli.log {
        loggers.push(WriteLogger::new(
            cli.log_level,
            Config::default(),
            File::create("phototime.log")?,
        ));
    }

    CombinedLogger::init(loggers)?;

    // Resolve the local zone while still single-threaded.
    system_offset();

    match cli.command {
        Commands::Scan {
            dir,
            output,
            matching,
        } => {
            let config = MatchConfig::from_args(&matching)?;
            let result = scan_and_reconcile(&dir, &config)?;
            println!("{}", format_report(&result, &output, config.zone));
        }

        Commands::Fix {
            dir,
            dry_run,
            yes,
            matching,
        } => {
            let config = MatchConfig::from_args(&matching)?;
            let result = scan_and_reconcile(&dir, &config)?;
            let requests = result.corrections();

            if requests.is_empty() {
                println!("{}", format_summary(&result));
                println!("\nNo timestamps need fixing.");
                if !result.is_clean() {
                    println!("No sidecar found for {} files:", result.unmatched.len());
                    for entry in &result.unmatched {
                        println!("  - {}", entry.path.display());
                    }
                }
                return Ok(());
            }

            if dry_run {
                println!("[DRY RUN] Would update {} files:", requests.len());
                for pair in &result.incorrect {
                    println!(
                        "  {} -> {}",
                        pair.media_path.display(),
                        display_in(pair.sidecar_captured_at, config.zone, DISPLAY_FORMAT)
                    );
                }
                return Ok(());
            }

            if !yes && !confirm(requests.len())? {
                println!("No files changed.");
                return Ok(());
            }

            let summary = run_batch(&requests)?;

            println!("\nFix complete!");
            println!("  {} files updated", summary.succeeded());
            if summary.failed > 0 {
                println!("  {} files failed (run with --log for details)", summary.failed);
            }

            let after = scan_and_reconcile(&dir, &config)?;
            println!("\n{}", format_summary(&after));
        }

        Commands::Set { file, epoch_millis } => {
            apply_one(&FsTimestampWriter, &CorrectionRequest::new(&file, epoch_millis))?;
            println!("Updated {}", file.display());
        }
    }

    Ok(())
}

fn confirm(count: usize) -> Result<bool> {
    print!("\nSet timestamps on {} files? [Y/n]: ", count);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().to_lowercase() != "n")
}

/// Apply corrections on a worker thread while the progress bar follows the channel.
fn run_batch(requests: &[CorrectionRequest]) -> Result<phototime::phototime_core::BatchSummary> {
    let bar_style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?;
    let bar = ProgressBar::new(requests.len() as u64).with_style(bar_style);
    bar.set_message("Fixing timestamps");

    let (progress_tx, progress_rx) = crossbeam_channel::unbounded::<usize>();

    let summary = std::thread::scope(|s| {
        let worker = s.spawn(move || apply_batch(&FsTimestampWriter, requests, &progress_tx));
        for done in progress_rx.iter() {
            bar.set_position(done as u64);
        }
        worker.join()
    })
    .map_err(|_| anyhow::anyhow!("Correction worker panicked"))?;

    bar.finish_with_message("Timestamps updated");
    Ok(summary)
}
