//! Generate command - write the demo mission as a telemetry log.

use std::path::PathBuf;

use flightcheck::scenario::demo_mission;
use flightcheck::tlog::write_tlog;
use tracing::info;

use crate::error::CliError;

/// Arguments for the generate command.
pub struct GenerateArgs {
    pub output: PathBuf,
}

/// Run the generate command.
pub fn run(args: GenerateArgs) -> Result<(), CliError> {
    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let samples = demo_mission();
    let records = write_tlog(&args.output, &samples)?;
    info!(path = %args.output.display(), records, "Demo mission written");

    println!("Wrote {} records to {}", records, args.output.display());
    println!();
    println!("Analyze it with:");
    println!("  flightcheck analyze {}", args.output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flightcheck::tlog::read_tlog;

    #[test]
    fn test_generate_creates_readable_log() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out").join("demo.tlog");

        run(GenerateArgs {
            output: output.clone(),
        })
        .unwrap();

        let (samples, _) = read_tlog(&output).unwrap();
        assert!(!samples.is_empty());
    }
}
