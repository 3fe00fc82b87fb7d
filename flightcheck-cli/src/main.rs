//! FlightCheck CLI - Command-line interface
//!
//! Analyzes MAVLink telemetry logs for lap compliance, generates demo logs,
//! and manages the configuration file.

mod commands;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use console::style;

use commands::analyze::AnalyzeArgs;
use commands::common::{load_config, resolve_config_path, UnclosedArg};
use commands::config::ConfigCommands;
use commands::generate::GenerateArgs;
use error::CliError;
use flightcheck::logging::init_logging;

#[derive(Debug, Parser)]
#[command(name = "flightcheck", version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to the per-user config.ini)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze a telemetry log and print the lap report
    Analyze {
        /// Path to the .tlog file
        tlog: PathBuf,

        /// Altitude ceiling in meters (overrides config)
        #[arg(long, value_name = "METERS")]
        ceiling: Option<f64>,

        /// What to do with a lap still open at the end of the log
        #[arg(long, value_enum)]
        unclosed: Option<UnclosedArg>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Write altitude and trajectory charts to this directory
        #[arg(long, value_name = "DIR")]
        plot_dir: Option<PathBuf>,
    },

    /// Write the three-lap demo mission as a .tlog file
    Generate {
        /// Output .tlog path
        output: PathBuf,
    },

    /// Manage the configuration file
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = resolve_config_path(cli.config.as_deref());
    let config = match (&cli.command, load_config(&config_path)) {
        (_, Ok(config)) => config,
        // Config commands must still work on a broken file
        (Commands::Config(_), Err(e)) => {
            eprintln!("{} {}", style("Warning:").yellow().bold(), e);
            Default::default()
        }
        (_, Err(e)) => return Err(e),
    };

    let mut logging = config.to_logging();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    let _guard = init_logging(&logging)?;
    tracing::debug!(
        version = flightcheck::VERSION,
        config = %config_path.display(),
        "flightcheck starting"
    );

    match cli.command {
        Commands::Analyze {
            tlog,
            ceiling,
            unclosed,
            json,
            plot_dir,
        } => commands::analyze::run(
            AnalyzeArgs {
                tlog,
                ceiling,
                unclosed,
                json,
                plot_dir,
            },
            &config,
        ),
        Commands::Generate { output } => commands::generate::run(GenerateArgs { output }),
        Commands::Config(command) => commands::config::run(command, &config_path),
    }
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from([
            "flightcheck",
            "analyze",
            "flight.tlog",
            "--ceiling",
            "90",
            "--unclosed",
            "incomplete",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Commands::Analyze {
                tlog,
                ceiling,
                unclosed,
                json,
                plot_dir,
            } => {
                assert_eq!(tlog, PathBuf::from("flight.tlog"));
                assert_eq!(ceiling, Some(90.0));
                assert_eq!(unclosed, Some(UnclosedArg::Incomplete));
                assert!(json);
                assert!(plot_dir.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let cli =
            Cli::try_parse_from(["flightcheck", "config", "path", "--config", "x.ini"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("x.ini")));
        assert!(matches!(cli.command, Commands::Config(ConfigCommands::Path)));
    }

    #[test]
    fn test_unknown_unclosed_policy_is_rejected() {
        assert!(Cli::try_parse_from([
            "flightcheck",
            "analyze",
            "flight.tlog",
            "--unclosed",
            "keep",
        ])
        .is_err());
    }
}
