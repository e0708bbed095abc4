use std::fmt;
use std::io;

use telelink_frame::FormatError;
use telelink_ingest::{IngestError, SinkError};
use telelink_source::SourceError;

// Exit codes follow sysexits-style grouping.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const SOURCE_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const SINK_ERROR: i32 = 74;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error, fallback: i32) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut => TIMEOUT,
        _ => fallback,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn source_error(context: &str, err: SourceError) -> CliError {
    match err {
        SourceError::Open { path, source } | SourceError::Configure { path, source } => {
            io_error(&format!("{context}: {}", path.display()), source, SOURCE_ERROR)
        }
        SourceError::Io(source) => io_error(context, source, SOURCE_ERROR),
        SourceError::Cancelled | SourceError::Closed => {
            CliError::new(FAILURE, format!("{context}: {err}"))
        }
    }
}

pub fn sink_error(context: &str, err: SinkError) -> CliError {
    match err {
        SinkError::Io(source) => io_error(context, source, SINK_ERROR),
        SinkError::Json(_) => CliError::new(INTERNAL, format!("{context}: {err}")),
        SinkError::Closed(_) => CliError::new(SINK_ERROR, format!("{context}: {err}")),
    }
}

pub fn format_error(context: &str, err: FormatError) -> CliError {
    match err {
        FormatError::InvalidFrameSize { .. } => CliError::new(USAGE, format!("{context}: {err}")),
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}

pub fn ingest_error(context: &str, err: IngestError) -> CliError {
    match err {
        IngestError::Source(err) => source_error(context, err),
        IngestError::Sink(err) => sink_error(context, err),
        IngestError::NotRunning(_) => CliError::new(INTERNAL, format!("{context}: {err}")),
    }
}
