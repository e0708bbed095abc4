use bytes::Bytes;
use tokio_util::sync::CancellationToken;

use crate::error::Result;

/// A source of byte chunks with no size or alignment guarantees.
///
/// Implementations should return promptly once `cancel` fires, and may return
/// zero-length chunks (for example when a read timeout elapses).
pub trait ByteSource {
    fn read(&mut self, cancel: &CancellationToken) -> Result<Bytes>;
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn read(&mut self, cancel: &CancellationToken) -> Result<Bytes> {
        (**self).read(cancel)
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read(&mut self, cancel: &CancellationToken) -> Result<Bytes> {
        (**self).read(cancel)
    }
}
