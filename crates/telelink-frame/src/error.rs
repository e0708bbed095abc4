/// Errors raised while validating, decoding or encoding a frame.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// The candidate frame does not have the expected length.
    #[error("invalid frame length ({actual} bytes, expected {expected})")]
    InvalidLength { actual: usize, expected: usize },

    /// The first two bytes are not the synchronization marker.
    #[error("invalid frame marker {found:02x?} (expected 0xAA 0x55)")]
    InvalidMarker { found: [u8; 2] },

    /// The trailing checksum does not match the frame contents.
    #[error("checksum mismatch (frame carries {expected:#06x}, computed {computed:#06x})")]
    ChecksumMismatch { expected: u16, computed: u16 },

    /// The identifier does not fit in its fixed-width slot.
    #[error("identifier too long ({len} bytes, max {max})")]
    IdentifierTooLong { len: usize, max: usize },

    /// The identifier contains a NUL byte, which terminates the slot on decode.
    #[error("identifier contains a NUL byte at position {position}")]
    IdentifierContainsNul { position: usize },

    /// The configured frame size cannot hold the marker.
    #[error("frame size {size} below minimum {min}")]
    InvalidFrameSize { size: usize, min: usize },
}

impl FormatError {
    /// Stable short label for counters and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            FormatError::InvalidLength { .. } => "length",
            FormatError::InvalidMarker { .. } => "marker",
            FormatError::ChecksumMismatch { .. } => "checksum",
            FormatError::IdentifierTooLong { .. } | FormatError::IdentifierContainsNul { .. } => {
                "identifier"
            }
            FormatError::InvalidFrameSize { .. } => "config",
        }
    }
}

pub type Result<T> = std::result::Result<T, FormatError>;
