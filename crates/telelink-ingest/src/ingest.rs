use telelink_frame::{FormatError, FrameDecoder, FrameExtractor};
use telelink_source::{ByteSource, CancellationToken, SourceError};
use tracing::{debug, info, warn};

use crate::error::{IngestError, Result};
use crate::sink::RecordSink;
use crate::stats::IngestStats;

/// Lifecycle of an [`IngestLoop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Pulling chunks and publishing records.
    Running,
    /// The source failed, was cancelled, ran dry or the record limit was hit.
    Stopped,
    /// The sink failed.
    Failed,
}

type RejectHook = Box<dyn FnMut(&FormatError) + Send>;

/// Drives byte source → extractor → decoder → sink, one chunk at a time.
///
/// Frames that fail validation are dropped and the loop carries on; the next
/// marker resynchronizes the stream. Source errors (cancellation and end of
/// input included) move the loop to [`LoopState::Stopped`], sink errors to
/// [`LoopState::Failed`], and are returned to the caller.
pub struct IngestLoop<S, D, K> {
    source: S,
    extractor: FrameExtractor,
    decoder: D,
    sink: K,
    state: LoopState,
    stats: IngestStats,
    record_limit: Option<u64>,
    on_reject: Option<RejectHook>,
}

impl<S, D, K> IngestLoop<S, D, K>
where
    S: ByteSource,
    D: FrameDecoder,
    K: RecordSink,
{
    /// Create a loop using the default frame layout.
    pub fn new(source: S, decoder: D, sink: K) -> Self {
        Self {
            source,
            extractor: FrameExtractor::new(),
            decoder,
            sink,
            state: LoopState::Running,
            stats: IngestStats::default(),
            record_limit: None,
            on_reject: None,
        }
    }

    /// Replace the extractor, e.g. to use a custom frame size or marker.
    pub fn with_extractor(mut self, extractor: FrameExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Stop [`run`](Self::run) successfully after `limit` published records.
    pub fn with_record_limit(mut self, limit: u64) -> Self {
        self.record_limit = Some(limit);
        self
    }

    /// Invoke `hook` for every frame the decoder rejects.
    ///
    /// Rejected frames are still skipped; the hook only observes them.
    pub fn on_reject<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&FormatError) + Send + 'static,
    {
        self.on_reject = Some(Box::new(hook));
        self
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn stats(&self) -> IngestStats {
        self.stats
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Consume the loop and return its source, decoder and sink.
    pub fn into_parts(self) -> (S, D, K) {
        (self.source, self.decoder, self.sink)
    }

    /// Run one pull/feed/decode/publish cycle.
    ///
    /// Returns the number of records published by this cycle.
    pub fn step(&mut self, cancel: &CancellationToken) -> Result<usize> {
        if self.state != LoopState::Running {
            return Err(IngestError::NotRunning(self.state));
        }
        if cancel.is_cancelled() {
            self.state = LoopState::Stopped;
            return Err(SourceError::Cancelled.into());
        }

        let chunk = match self.source.read(cancel) {
            Ok(chunk) => chunk,
            Err(err) => {
                self.state = LoopState::Stopped;
                debug!(%err, "byte source ended");
                return Err(err.into());
            }
        };
        self.stats.chunks = self.stats.chunks.saturating_add(1);
        self.stats.bytes = self.stats.bytes.saturating_add(chunk.len() as u64);

        let mut published = 0usize;
        for frame in self.extractor.feed(&chunk) {
            self.stats.frames = self.stats.frames.saturating_add(1);

            let record = match self.decoder.decode(&frame) {
                Ok(record) => record,
                Err(err) => {
                    self.stats.record_reject(&err);
                    debug!(kind = err.kind(), %err, "skipping invalid frame");
                    if let Some(hook) = self.on_reject.as_mut() {
                        hook(&err);
                    }
                    continue;
                }
            };

            if let Err(err) = self.sink.publish(record) {
                self.state = LoopState::Failed;
                warn!(%err, "record sink failed");
                return Err(err.into());
            }
            self.stats.published = self.stats.published.saturating_add(1);
            published += 1;

            if self
                .record_limit
                .is_some_and(|limit| self.stats.published >= limit)
            {
                break;
            }
        }
        self.stats.discarded_bytes = self.extractor.discarded();

        Ok(published)
    }

    /// Step until the source or sink ends the loop, or the record limit is hit.
    ///
    /// Only the record limit produces `Ok`.
    pub fn run(&mut self, cancel: &CancellationToken) -> Result<()> {
        info!("ingest loop started");
        loop {
            if self.limit_reached() {
                self.state = LoopState::Stopped;
                info!(published = self.stats.published, "record limit reached");
                return Ok(());
            }

            if let Err(err) = self.step(cancel) {
                info!(
                    state = ?self.state,
                    published = self.stats.published,
                    rejected = self.stats.rejected(),
                    %err,
                    "ingest loop ended"
                );
                return Err(err);
            }
        }
    }

    fn limit_reached(&self) -> bool {
        self.record_limit
            .is_some_and(|limit| self.stats.published >= limit)
    }
}
