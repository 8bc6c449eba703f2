use alloc::sync::Arc;
use std::io;

use thiserror::Error;

/// Failure of a [`RuneReader`](crate::RuneReader) operation.
///
/// Apart from [`Io`](ReadError::Io), every variant signals misuse of the reader
/// by its caller, or input that cannot fit the configured lookback.
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum ReadError {
    #[error("nothing has been read yet")]
    NothingRead,

    #[error("cannot back up past the start of the stream")]
    BackupPastStart,

    #[error("character {index} was evicted from the lookback window (oldest retained: {offset})")]
    Evicted { index: usize, offset: usize },

    #[error("character index {index} is out of bounds (length {len})")]
    OutOfBounds { index: usize, len: usize },

    #[error("stream exceeds the limit of {limit} characters")]
    Overflow { limit: usize },

    #[error("read failed: {0}")]
    Io(Arc<io::Error>),
}

impl From<io::Error> for ReadError {
    #[inline]
    fn from(value: io::Error) -> Self {
        Self::Io(Arc::new(value))
    }
}
