//! Analyze command - judge the laps of a recorded flight.

use std::path::{Path, PathBuf};
use std::time::Duration;

use console::style;
use flightcheck::compliance::{analyze, FlightReport, PositionSample};
use flightcheck::config::ConfigFile;
use flightcheck::plot::{save_charts, ChartStyle};
use flightcheck::report::{render_text, to_json};
use flightcheck::tlog::{TlogReader, TlogStats};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use super::common::{resolve_policy, resolve_rules, UnclosedArg};
use crate::error::CliError;

/// Samples between spinner message updates.
const PROGRESS_INTERVAL: usize = 1000;

/// Arguments for the analyze command.
pub struct AnalyzeArgs {
    pub tlog: PathBuf,
    pub ceiling: Option<f64>,
    pub unclosed: Option<UnclosedArg>,
    pub json: bool,
    pub plot_dir: Option<PathBuf>,
}

/// Run the analyze command.
pub fn run(args: AnalyzeArgs, config: &ConfigFile) -> Result<(), CliError> {
    // CLI > config > defaults
    let rules = resolve_rules(config, args.ceiling)?;
    let policy = resolve_policy(config, args.unclosed);

    let (samples, stats) = decode(&args.tlog)?;
    info!(
        path = %args.tlog.display(),
        messages = stats.messages,
        positions = stats.positions,
        parse_errors = stats.parse_errors,
        skipped_bytes = stats.skipped_bytes,
        "Telemetry decoded"
    );

    let report = analyze(samples, rules, policy);

    if args.json {
        println!("{}", to_json(&report)?);
    } else {
        print_text(&report);
    }

    if let Some(dir) = args.plot_dir {
        write_charts(&report, &dir, args.json)?;
    }

    Ok(())
}

/// Decode every position sample, with a spinner on interactive terminals.
fn decode(path: &Path) -> Result<(Vec<PositionSample>, TlogStats), CliError> {
    let mut reader = TlogReader::open(path)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Decoding {}", path.display()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let mut samples = Vec::new();
    for sample in reader.by_ref() {
        let sample = match sample {
            Ok(sample) => sample,
            Err(e) => {
                spinner.finish_and_clear();
                return Err(e.into());
            }
        };
        samples.push(sample);
        if samples.len() % PROGRESS_INTERVAL == 0 {
            spinner.set_message(format!(
                "Decoding {} ({} samples)",
                path.display(),
                samples.len()
            ));
        }
    }

    spinner.finish_and_clear();
    Ok((samples, reader.stats()))
}

fn print_text(report: &FlightReport) {
    for line in render_text(report).lines() {
        println!("{}", colorize(line));
    }
}

/// Color verdict lines; plain text passes through.
fn colorize(line: &str) -> String {
    if line.contains("[ SUCCESS ]") {
        style(line).green().to_string()
    } else if line.contains("[ FAILED") {
        style(line).red().to_string()
    } else if line.contains("[ INCOMPLETE ]") || line.starts_with("[!]") {
        style(line).yellow().to_string()
    } else {
        line.to_string()
    }
}

fn write_charts(report: &FlightReport, dir: &Path, json: bool) -> Result<(), CliError> {
    if !report.has_data() {
        warn!("No flight data, skipping charts");
        return Ok(());
    }

    let files = save_charts(report, dir, &ChartStyle::default())?;
    // Keep stdout machine-readable in JSON mode
    if json {
        eprintln!("Charts written to {}", dir.display());
    } else {
        println!();
        println!("Altitude chart:   {}", files.altitude.display());
        println!("Trajectory chart: {}", files.trajectory.display());
    }
    Ok(())
}
