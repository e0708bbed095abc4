//! Fixed-size telemetry frame synchronization and decoding.
//!
//! Frames arrive over an unreliable byte link with no alignment guarantees.
//! Every frame is [`FRAME_SIZE`] bytes:
//! - A 2-byte marker (`0xAA 0x55`) for stream synchronization
//! - A fixed little-endian field layout (see [`layout`])
//! - A trailing little-endian CRC-16/ARC over everything before it
//!
//! [`FrameExtractor`] reassembles frames from arbitrary chunks,
//! [`decode_frame`] validates and decodes them into [`Telemetry`].

pub mod checksum;
pub mod codec;
pub mod error;
pub mod extractor;
pub mod layout;
pub mod telemetry;

#[cfg(feature = "async")]
pub mod async_codec;

pub use checksum::crc16;
pub use codec::{decode_frame, encode_frame, BinaryDecoder, Frame, FrameDecoder};
pub use error::{FormatError, Result};
pub use extractor::{FrameConfig, FrameExtractor, Frames};
pub use layout::{FRAME_SIZE, ID_LEN, MARKER};
pub use telemetry::Telemetry;

#[cfg(feature = "async")]
pub use async_codec::TelemetryCodec;
