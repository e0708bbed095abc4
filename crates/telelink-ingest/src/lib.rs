//! Telemetry ingestion: byte source → frame extractor → decoder → sink.
//!
//! [`IngestLoop`] owns one [`FrameExtractor`](telelink_frame::FrameExtractor)
//! per stream and processes chunks strictly in order. Frames that fail
//! validation are skipped; source and sink failures end the loop.

pub mod error;
pub mod ingest;
pub mod sink;
pub mod stats;

pub use error::{IngestError, Result, SinkError};
pub use ingest::{IngestLoop, LoopState};
pub use sink::{CollectSink, RecordSink};
pub use stats::IngestStats;
