use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};
use tracing::debug;

use crate::codec::{encode_frame, BinaryDecoder, FrameDecoder};
use crate::extractor::FrameExtractor;
use crate::telemetry::Telemetry;

/// `tokio_util` codec yielding decoded [`Telemetry`] records.
///
/// Frames that fail validation are skipped and counted, never surfaced as
/// errors, so a `FramedRead` keeps going across corruption.
#[derive(Debug, Default)]
pub struct TelemetryCodec {
    extractor: FrameExtractor,
    decoder: BinaryDecoder,
    rejected: u64,
}

impl TelemetryCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extractor(extractor: FrameExtractor) -> Self {
        Self {
            extractor,
            ..Self::default()
        }
    }

    /// Frames dropped because they failed validation.
    pub fn rejected(&self) -> u64 {
        self.rejected
    }
}

impl Decoder for TelemetryCodec {
    type Item = Telemetry;
    type Error = std::io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let chunk = src.split();
        self.extractor.push(&chunk);

        while let Some(frame) = self.extractor.next_frame() {
            match self.decoder.decode(&frame) {
                Ok(record) => return Ok(Some(record)),
                Err(err) => {
                    self.rejected = self.rejected.saturating_add(1);
                    debug!(kind = err.kind(), %err, "skipping invalid frame");
                }
            }
        }
        Ok(None)
    }
}

impl Encoder<&Telemetry> for TelemetryCodec {
    type Error = std::io::Error;

    fn encode(&mut self, item: &Telemetry, dst: &mut BytesMut) -> Result<(), Self::Error> {
        encode_frame(item, dst)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::FRAME_SIZE;

    fn record(packet_count: u32) -> Telemetry {
        Telemetry {
            id: "codec".to_string(),
            packet_count,
            ..Telemetry::default()
        }
    }

    #[test]
    fn decodes_across_partial_buffers() {
        let mut codec = TelemetryCodec::new();
        let mut wire = BytesMut::new();
        codec.encode(&record(1), &mut wire).unwrap();

        let mut src = BytesMut::from(&wire[..10]);
        assert!(codec.decode(&mut src).unwrap().is_none());
        assert!(src.is_empty());

        src.extend_from_slice(&wire[10..]);
        assert_eq!(codec.decode(&mut src).unwrap(), Some(record(1)));
    }

    #[test]
    fn skips_corrupt_frames() {
        let mut codec = TelemetryCodec::new();
        let mut wire = BytesMut::new();
        codec.encode(&record(1), &mut wire).unwrap();
        codec.encode(&record(2), &mut wire).unwrap();
        wire[FRAME_SIZE / 2] ^= 0x80;

        let mut src = wire;
        assert_eq!(codec.decode(&mut src).unwrap(), Some(record(2)));
        assert_eq!(codec.rejected(), 1);
        assert!(codec.decode(&mut src).unwrap().is_none());
    }

    #[test]
    fn yields_buffered_frames_on_later_calls() {
        let mut codec = TelemetryCodec::new();
        let mut src = BytesMut::new();
        for n in 0..3 {
            codec.encode(&record(n), &mut src).unwrap();
        }

        let mut counters = Vec::new();
        while let Some(item) = codec.decode(&mut src).unwrap() {
            counters.push(item.packet_count);
        }
        assert_eq!(counters, vec![0, 1, 2]);
    }

    #[test]
    fn encode_rejects_unencodable_record() {
        let mut codec = TelemetryCodec::new();
        let mut dst = BytesMut::new();
        let bad = Telemetry {
            id: "x".repeat(32),
            ..Telemetry::default()
        };
        let err = codec.encode(&bad, &mut dst).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    }
}
