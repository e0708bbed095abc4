use serde::Serialize;
use telelink_frame::FormatError;

/// Counters maintained by an [`IngestLoop`](crate::IngestLoop).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    /// Chunks pulled from the source, empty ones included.
    pub chunks: u64,
    /// Bytes pulled from the source.
    pub bytes: u64,
    /// Candidate frames cut by the extractor.
    pub frames: u64,
    /// Records handed to the sink.
    pub published: u64,
    pub rejected_length: u64,
    pub rejected_marker: u64,
    pub rejected_checksum: u64,
    /// Rejections outside the length/marker/checksum kinds, from custom decoders.
    pub rejected_other: u64,
    /// Bytes dropped by the extractor while searching for a marker.
    pub discarded_bytes: u64,
}

impl IngestStats {
    /// Total frames rejected by the decoder.
    pub fn rejected(&self) -> u64 {
        self.rejected_length + self.rejected_marker + self.rejected_checksum + self.rejected_other
    }

    pub(crate) fn record_reject(&mut self, err: &FormatError) {
        let counter = match err {
            FormatError::InvalidLength { .. } => &mut self.rejected_length,
            FormatError::InvalidMarker { .. } => &mut self.rejected_marker,
            FormatError::ChecksumMismatch { .. } => &mut self.rejected_checksum,
            _ => &mut self.rejected_other,
        };
        *counter = counter.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_are_counted_per_kind() {
        let mut stats = IngestStats::default();
        stats.record_reject(&FormatError::InvalidLength {
            actual: 3,
            expected: 60,
        });
        stats.record_reject(&FormatError::InvalidMarker { found: [0, 0] });
        stats.record_reject(&FormatError::ChecksumMismatch {
            expected: 1,
            computed: 2,
        });
        stats.record_reject(&FormatError::ChecksumMismatch {
            expected: 3,
            computed: 4,
        });

        assert_eq!(stats.rejected_length, 1);
        assert_eq!(stats.rejected_marker, 1);
        assert_eq!(stats.rejected_checksum, 2);
        assert_eq!(stats.rejected_other, 0);
        assert_eq!(stats.rejected(), 4);
    }

    #[test]
    fn non_wire_errors_are_not_counted_as_checksum() {
        let mut stats = IngestStats::default();
        stats.record_reject(&FormatError::IdentifierTooLong { len: 20, max: 16 });
        stats.record_reject(&FormatError::InvalidFrameSize { size: 1, min: 2 });

        assert_eq!(stats.rejected_checksum, 0);
        assert_eq!(stats.rejected_other, 2);
        assert_eq!(stats.rejected(), 2);
    }

    #[test]
    fn serializes_to_json() {
        let stats = IngestStats {
            published: 2,
            ..IngestStats::default()
        };
        let value = serde_json::to_value(stats).unwrap();
        assert_eq!(value["published"], 2);
        assert_eq!(value["rejected_checksum"], 0);
    }
}
