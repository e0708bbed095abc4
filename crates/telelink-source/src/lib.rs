//! Byte-chunk sources for telemetry links.
//!
//! The framing layer only needs "the next chunk of bytes, or an error". This
//! crate defines that capability ([`ByteSource`]) and a reader-backed
//! implementation usable with serial device nodes, capture files and stdin.
//! Terminals are switched to raw mode on open.
//!
//! Reads are bounded by a timeout so callers can observe cancellation
//! between pulls.

pub mod error;
pub mod reader;
pub mod traits;
pub mod tty;

pub use error::{Result, SourceError};
pub use reader::{ReaderSource, SourceConfig};
pub use tokio_util::sync::CancellationToken;
pub use traits::ByteSource;
pub use tty::{DEFAULT_BAUD_RATE, SUPPORTED_BAUD_RATES};
