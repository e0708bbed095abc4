use std::io::{ErrorKind, Read};
use std::path::Path;
use std::sync::mpsc::{sync_channel, Receiver, RecvTimeoutError, SyncSender};
use std::thread;
use std::time::Duration;

use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{Result, SourceError};
use crate::traits::ByteSource;
use crate::tty;

const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(500);
const DEFAULT_CHUNK_SIZE: usize = 256;
const DEFAULT_QUEUE_DEPTH: usize = 16;
const RETRY_BACKOFF: Duration = Duration::from_millis(10);

/// Configuration for [`ReaderSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceConfig {
    /// Longest a single [`ByteSource::read`] call waits for data.
    pub read_timeout: Duration,
    /// Maximum bytes per underlying read.
    pub chunk_size: usize,
    /// Chunks buffered between the reader thread and the consumer.
    pub queue_depth: usize,
    /// Line speed applied when the opened path is a terminal.
    pub baud_rate: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            read_timeout: DEFAULT_READ_TIMEOUT,
            chunk_size: DEFAULT_CHUNK_SIZE,
            queue_depth: DEFAULT_QUEUE_DEPTH,
            baud_rate: tty::DEFAULT_BAUD_RATE,
        }
    }
}

/// Byte source backed by any blocking [`Read`].
///
/// A dedicated thread performs the blocking reads and hands chunks over a
/// bounded channel, so [`read`](ByteSource::read) can give up after
/// `read_timeout` and let the caller check for cancellation. Dropping the
/// source detaches the thread; it exits on its next completed read.
#[derive(Debug)]
pub struct ReaderSource {
    rx: Receiver<std::io::Result<Bytes>>,
    config: SourceConfig,
    closed: bool,
}

impl ReaderSource {
    /// Start reading from `reader` on a background thread.
    pub fn new<R>(reader: R, config: SourceConfig) -> Result<Self>
    where
        R: Read + Send + 'static,
    {
        let (tx, rx) = sync_channel(config.queue_depth.max(1));
        let chunk_size = config.chunk_size.max(1);

        thread::Builder::new()
            .name("telelink-reader".to_string())
            .spawn(move || pump(reader, tx, chunk_size))?;

        Ok(Self {
            rx,
            config,
            closed: false,
        })
    }

    /// Open a device node or capture file.
    ///
    /// Terminals are switched to raw 8N1 at `config.baud_rate` before the
    /// first read; other files are read as-is.
    pub fn open(path: impl AsRef<Path>, config: SourceConfig) -> Result<Self> {
        let path = path.as_ref();
        let file = tty::open_device(path).map_err(|source| SourceError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let is_tty = tty::configure_raw(&file, config.baud_rate).map_err(|source| {
            SourceError::Configure {
                path: path.to_path_buf(),
                source,
            }
        })?;
        if is_tty {
            debug!(
                path = %path.display(),
                baud = config.baud_rate,
                "opened serial line in raw mode"
            );
        } else {
            debug!(path = %path.display(), "opened byte source");
        }
        Self::new(file, config)
    }

    /// Read from standard input.
    pub fn stdin(config: SourceConfig) -> Result<Self> {
        Self::new(std::io::stdin(), config)
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }
}

impl ByteSource for ReaderSource {
    fn read(&mut self, cancel: &CancellationToken) -> Result<Bytes> {
        if cancel.is_cancelled() {
            return Err(SourceError::Cancelled);
        }
        if self.closed {
            return Err(SourceError::Closed);
        }

        match self.rx.recv_timeout(self.config.read_timeout) {
            Ok(Ok(chunk)) => Ok(chunk),
            Ok(Err(err)) => {
                self.closed = true;
                Err(SourceError::Io(err))
            }
            Err(RecvTimeoutError::Timeout) => {
                if cancel.is_cancelled() {
                    Err(SourceError::Cancelled)
                } else {
                    Ok(Bytes::new())
                }
            }
            Err(RecvTimeoutError::Disconnected) => {
                self.closed = true;
                Err(SourceError::Closed)
            }
        }
    }
}

fn pump<R: Read>(mut reader: R, tx: SyncSender<std::io::Result<Bytes>>, chunk_size: usize) {
    let mut chunk = vec![0u8; chunk_size];
    loop {
        let read = match reader.read(&mut chunk) {
            Ok(n) => n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                thread::sleep(RETRY_BACKOFF);
                continue;
            }
            Err(err) => {
                warn!(%err, "byte source read failed");
                let _ = tx.send(Err(err));
                return;
            }
        };

        if read == 0 {
            debug!("byte source reached end of input");
            return;
        }

        if tx.send(Ok(Bytes::copy_from_slice(&chunk[..read]))).is_err() {
            debug!("byte source consumer dropped");
            return;
        }
    }
}
