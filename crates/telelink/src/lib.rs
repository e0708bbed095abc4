//! Binary telemetry link gateway.
//!
//! telelink pulls bytes from a serial link (or a capture file), recovers
//! fixed-size frames from arbitrary alignment, validates their CRC-16 and
//! decodes them into typed telemetry records.
//!
//! # Crate Structure
//!
//! - [`frame`] — Checksum, frame extraction, decoding and encoding
//! - [`source`] — Cancellable byte-chunk sources
//! - [`ingest`] — The pull/decode/publish loop and record sinks

/// Re-export frame types.
pub mod frame {
    pub use telelink_frame::*;
}

/// Re-export source types.
pub mod source {
    pub use telelink_source::*;
}

/// Re-export ingest types.
pub mod ingest {
    pub use telelink_ingest::*;
}
