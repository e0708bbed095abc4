use std::path::PathBuf;

/// Errors that end a byte source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Failed to open the device or file.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The device opened but its line settings could not be applied.
    #[error("failed to configure {path}: {source}")]
    Configure {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An I/O error occurred while reading.
    #[error("source I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The read was cancelled before data arrived.
    #[error("read cancelled")]
    Cancelled,

    /// The source reached end of input.
    #[error("source closed (end of input)")]
    Closed,
}

pub type Result<T> = std::result::Result<T, SourceError>;
