//! Character streams with mark, slice and backup.
//!
//! A [`RuneReader`] hands out one `char` at a time and can step back over the
//! characters it still retains. [`mark`](RuneReader::mark) pins the start of a
//! span at the most recently returned character, and [`slice`](RuneReader::slice)
//! copies everything from there up to the cursor.
//!
//! - [`StrReader`]: reads an in-memory string. Lookback is unlimited.
//! - [`StreamReader`]: decodes UTF-8 from an [`io::Read`](std::io::Read) into a
//!   [`RuneBuffer`]. Lookback is bounded by [`ReaderConfig::max_lookback`].

// -----------------------------------------------------------------------------
// Modules

mod error;
mod rune_buffer;
mod str_reader;
mod stream;

// -----------------------------------------------------------------------------
// Exports

pub use error::ReadError;
pub use rune_buffer::RuneBuffer;
pub use str_reader::StrReader;
pub use stream::StreamReader;

// -----------------------------------------------------------------------------
// RuneReader

/// A backtracking character stream.
///
/// The cursor counts the characters returned so far, minus those stepped back over.
///
/// # Examples
///
/// ```
/// use vc_scan::reader::{RuneReader, StrReader};
///
/// let mut reader = StrReader::new("true,");
/// assert_eq!(reader.next().unwrap(), Some('t'));
/// reader.mark();
///
/// while let Some(c) = reader.next().unwrap() {
///     if c == ',' {
///         reader.backup().unwrap();
///         break;
///     }
/// }
///
/// assert_eq!(reader.slice().unwrap(), "true");
/// assert_eq!(reader.peek(), Some('e'));
/// ```
pub trait RuneReader {
    /// Returns the next character, or `None` at the end of the stream.
    fn next(&mut self) -> Result<Option<char>, ReadError>;

    /// Returns the character immediately before the cursor.
    ///
    /// `None` before the first read.
    fn peek(&self) -> Option<char>;

    /// Moves the cursor back by one character.
    ///
    /// Fails at the start of the stream or when the previous character
    /// is no longer retained.
    fn backup(&mut self) -> Result<(), ReadError>;

    /// Starts a span at the most recently returned character.
    fn mark(&mut self);

    /// Copies the span from the mark to the cursor.
    fn slice(&self) -> Result<String, ReadError>;

    /// Returns `true` once every character has been returned and the
    /// source is known to be exhausted.
    fn done(&self) -> bool;
}

impl<R: RuneReader + ?Sized> RuneReader for &mut R {
    #[inline]
    fn next(&mut self) -> Result<Option<char>, ReadError> {
        (**self).next()
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        (**self).peek()
    }

    #[inline]
    fn backup(&mut self) -> Result<(), ReadError> {
        (**self).backup()
    }

    #[inline]
    fn mark(&mut self) {
        (**self).mark();
    }

    #[inline]
    fn slice(&self) -> Result<String, ReadError> {
        (**self).slice()
    }

    #[inline]
    fn done(&self) -> bool {
        (**self).done()
    }
}

// -----------------------------------------------------------------------------
// ReaderConfig

/// Configuration of a [`StreamReader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Maximum number of characters kept for backup and slicing.
    ///
    /// Once this many characters are buffered, the oldest is evicted for
    /// every new one. A marked span longer than this cannot be sliced.
    pub max_lookback: usize,
}

impl ReaderConfig {
    pub const DEFAULT_MAX_LOOKBACK: usize = 4096;
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_lookback: Self::DEFAULT_MAX_LOOKBACK,
        }
    }
}
