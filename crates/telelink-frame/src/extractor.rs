use bytes::{Buf, BytesMut};
use tracing::trace;

use crate::codec::Frame;
use crate::error::{FormatError, Result};
use crate::layout::{FRAME_SIZE, MARKER};

/// Extractor configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameConfig {
    /// Exact length of every frame, marker and checksum included.
    pub frame_size: usize,
    /// Synchronization marker at the start of every frame.
    pub marker: [u8; 2],
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            frame_size: FRAME_SIZE,
            marker: MARKER,
        }
    }
}

/// Reassembles fixed-size frames from a byte stream of arbitrary chunking.
///
/// Bytes are retained across [`feed`](Self::feed) calls until they either
/// become part of a frame or can no longer start one. The leftmost marker
/// always wins; bytes before it are dropped as garbage. When no marker is
/// buffered only the last byte is kept, since it may be the first half of a
/// marker split across chunks.
///
/// Whenever scanning stops the buffer holds at most one byte, or a marker
/// followed by fewer than `frame_size - 2` bytes.
#[derive(Debug)]
pub struct FrameExtractor {
    buf: BytesMut,
    config: FrameConfig,
    discarded: u64,
}

impl FrameExtractor {
    /// Create an extractor for the default frame layout.
    pub fn new() -> Self {
        Self::from_valid_config(FrameConfig::default())
    }

    /// Create an extractor with an explicit frame size and marker.
    pub fn with_config(config: FrameConfig) -> Result<Self> {
        let min = config.marker.len();
        if config.frame_size < min {
            return Err(FormatError::InvalidFrameSize {
                size: config.frame_size,
                min,
            });
        }
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: FrameConfig) -> Self {
        Self {
            buf: BytesMut::with_capacity(4 * config.frame_size),
            config,
            discarded: 0,
        }
    }

    /// Append a chunk and iterate over the frames that became complete.
    ///
    /// The iterator is lazy: frames it does not yield stay buffered and come
    /// out, in order, on the next call.
    pub fn feed(&mut self, chunk: &[u8]) -> Frames<'_> {
        self.push(chunk);
        Frames { extractor: self }
    }

    /// Append a chunk without scanning.
    pub fn push(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Cut the next complete frame out of the buffer, if there is one.
    pub fn next_frame(&mut self) -> Option<Frame> {
        let Some(start) = find_marker(&self.buf, self.config.marker) else {
            if self.buf.len() > 1 {
                let garbage = self.buf.len() - 1;
                self.discard(garbage);
            }
            return None;
        };

        if start > 0 {
            self.discard(start);
        }

        if self.buf.len() < self.config.frame_size {
            return None;
        }

        let frame = self.buf.split_to(self.config.frame_size).freeze();
        trace!(size = frame.len(), "frame extracted");
        Some(Frame::new(frame))
    }

    /// Number of bytes currently retained.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Total bytes dropped as garbage since construction.
    pub fn discarded(&self) -> u64 {
        self.discarded
    }

    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    /// Drop all retained bytes.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    fn discard(&mut self, count: usize) {
        trace!(count, "discarding unsynchronized bytes");
        self.buf.advance(count);
        self.discarded = self.discarded.saturating_add(count as u64);
    }
}

impl Default for FrameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Frames completed by a [`FrameExtractor::feed`] call.
#[derive(Debug)]
pub struct Frames<'a> {
    extractor: &'a mut FrameExtractor,
}

impl Iterator for Frames<'_> {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        self.extractor.next_frame()
    }
}

fn find_marker(buf: &[u8], marker: [u8; 2]) -> Option<usize> {
    buf.windows(2).position(|pair| pair == marker)
}
