use crate::ingest::LoopState;

/// Errors raised by a record sink.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// Writing the record failed.
    #[error("sink I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing the record failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The sink no longer accepts records.
    #[error("sink closed: {0}")]
    Closed(String),
}

/// Errors that end an ingest loop.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The byte source failed, was cancelled or reached end of input.
    #[error("source error: {0}")]
    Source(#[from] telelink_source::SourceError),

    /// Publishing a record failed.
    #[error("sink error: {0}")]
    Sink(#[from] SinkError),

    /// The loop already reached a terminal state.
    #[error("ingest loop is not running ({0:?})")]
    NotRunning(LoopState),
}

impl IngestError {
    /// True when the loop ended because its cancellation token fired.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, IngestError::Source(telelink_source::SourceError::Cancelled))
    }

    /// True when the source ran out of input.
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, IngestError::Source(telelink_source::SourceError::Closed))
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
