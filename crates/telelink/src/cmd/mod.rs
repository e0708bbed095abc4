use clap::{Args, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod emit;
pub mod run;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read frames from a link and print decoded telemetry.
    Run(RunArgs),
    /// Write synthetic encoded frames (test feed).
    Emit(EmitArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Run(args) => run::run(args, format),
        Command::Emit(args) => emit::run(args),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Serial device or capture file to read; `-` reads stdin.
    #[arg(env = "PORT", default_value = "/dev/ttyACM0")]
    pub port: PathBuf,
    /// Longest wait for a single read before checking for shutdown (e.g. 500ms, 1s).
    #[arg(long, default_value = "500ms")]
    pub read_timeout: String,
    /// Line speed when PORT is a serial terminal.
    #[arg(long, default_value = "115200")]
    pub baud: u32,
    /// Maximum bytes per read.
    #[arg(long, default_value = "256")]
    pub chunk_size: usize,
    /// Exit after printing N records.
    #[arg(long)]
    pub count: Option<u64>,
    /// Log every rejected frame at warn level.
    #[arg(long)]
    pub report_rejects: bool,
}

#[derive(Args, Debug)]
pub struct EmitArgs {
    /// Number of frames to write.
    #[arg(long, short = 'n', default_value = "10")]
    pub count: u32,
    /// Station identifier (at most 16 bytes).
    #[arg(long, default_value = "telelink")]
    pub id: String,
    /// Timestamp of the first frame, seconds since epoch. Default: now.
    #[arg(long)]
    pub start: Option<u32>,
    /// Corrupt the checksum-covered payload of every K-th frame.
    #[arg(long, value_name = "K")]
    pub corrupt_every: Option<u32>,
    /// Insert N garbage bytes before every frame (at most 4096).
    #[arg(long, value_name = "N", default_value = "0")]
    pub noise: usize,
    /// Write to this file instead of stdout.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub(crate) fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "ms")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration("300").unwrap(), Duration::from_millis(300));
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert!(parse_duration("0ms").is_err());
        assert!(parse_duration("").is_err());
        assert!(parse_duration("fast").is_err());
    }
}
