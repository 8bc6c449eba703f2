use std::io::{self, Read};

use crate::reader::{ReadError, ReaderConfig, RuneBuffer, RuneReader};

const CHUNK: usize = 64;

/// A [`RuneReader`] decoding UTF-8 from an [`io::Read`].
///
/// Bytes are pulled in small chunks and decoded one character at a time.
/// Invalid input yields U+FFFD and skips a single byte. Decoded characters
/// are kept in a [`RuneBuffer`], so backup and slicing only reach
/// [`ReaderConfig::max_lookback`] characters behind the newest one.
///
/// # Examples
///
/// ```
/// use vc_scan::reader::{ReaderConfig, RuneReader, StreamReader};
///
/// let mut reader = StreamReader::new(&b"h\xc3\xa9"[..], ReaderConfig::default());
/// assert_eq!(reader.next().unwrap(), Some('h'));
/// assert_eq!(reader.next().unwrap(), Some('é'));
/// assert_eq!(reader.next().unwrap(), None);
/// assert!(reader.done());
/// ```
pub struct StreamReader<R> {
    inner: R,
    bytes: [u8; CHUNK],
    start: usize,
    end: usize,
    eof: bool,
    runes: RuneBuffer,
    cursor: usize,
    mark: usize,
}

impl<R> StreamReader<R> {
    pub fn new(inner: R, config: ReaderConfig) -> Self {
        Self {
            inner,
            bytes: [0; CHUNK],
            start: 0,
            end: 0,
            eof: false,
            runes: RuneBuffer::new(config.max_lookback),
            cursor: 0,
            mark: 0,
        }
    }

    /// Number of characters before the cursor.
    #[inline]
    pub fn position(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn buffer(&self) -> &RuneBuffer {
        &self.runes
    }

    #[inline]
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> StreamReader<R> {
    /// Refills the byte window, keeping undecoded bytes at the front.
    fn fill(&mut self) -> Result<(), ReadError> {
        self.bytes.copy_within(self.start..self.end, 0);
        self.end -= self.start;
        self.start = 0;

        loop {
            match self.inner.read(&mut self.bytes[self.end..]) {
                Ok(0) => self.eof = true,
                Ok(n) => self.end += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
            return Ok(());
        }
    }

    fn decode(&mut self) -> Result<Option<char>, ReadError> {
        loop {
            let pending = &self.bytes[self.start..self.end];
            let Some(&first) = pending.first() else {
                if self.eof {
                    return Ok(None);
                }
                self.fill()?;
                continue;
            };

            let width = utf8_width(first);
            if width == 0 {
                self.start += 1;
                return Ok(Some(char::REPLACEMENT_CHARACTER));
            }

            if pending.len() < width {
                if self.eof {
                    self.start += 1;
                    return Ok(Some(char::REPLACEMENT_CHARACTER));
                }
                self.fill()?;
                continue;
            }

            return match core::str::from_utf8(&pending[..width]) {
                Ok(s) => {
                    self.start += width;
                    Ok(s.chars().next())
                }
                Err(_) => {
                    self.start += 1;
                    Ok(Some(char::REPLACEMENT_CHARACTER))
                }
            };
        }
    }
}

/// Expected length of the sequence led by `byte`, or 0 if it cannot lead one.
#[inline]
fn utf8_width(byte: u8) -> usize {
    match byte {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

impl<R: Read> RuneReader for StreamReader<R> {
    fn next(&mut self) -> Result<Option<char>, ReadError> {
        if self.cursor < self.runes.len() {
            let c = self.runes.get(self.cursor)?;
            self.cursor += 1;
            return Ok(Some(c));
        }

        let Some(c) = self.decode()? else {
            return Ok(None);
        };
        self.runes.push(c)?;
        self.cursor += 1;
        Ok(Some(c))
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        let index = self.cursor.checked_sub(1)?;
        self.runes.get(index).ok()
    }

    fn backup(&mut self) -> Result<(), ReadError> {
        let index = self
            .cursor
            .checked_sub(1)
            .ok_or(ReadError::BackupPastStart)?;
        if index < self.runes.offset() {
            return Err(ReadError::Evicted {
                index,
                offset: self.runes.offset(),
            });
        }
        self.cursor = index;
        Ok(())
    }

    #[inline]
    fn mark(&mut self) {
        self.mark = self.cursor.saturating_sub(1);
    }

    fn slice(&self) -> Result<String, ReadError> {
        if self.cursor == 0 {
            return Err(ReadError::NothingRead);
        }
        self.runes.slice(self.mark, self.cursor)
    }

    #[inline]
    fn done(&self) -> bool {
        self.eof && self.start == self.end && self.cursor == self.runes.len()
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Read};

    use proptest::prelude::*;

    use super::StreamReader;
    use crate::reader::{ReadError, ReaderConfig, RuneReader};

    /// Hands out at most `step` bytes per call and fails every other call
    /// with `Interrupted`.
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
        interrupt: bool,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.interrupt = !self.interrupt;
            if self.interrupt {
                return Err(io::ErrorKind::Interrupted.into());
            }
            let n = self.step.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    fn collect(reader: &mut impl RuneReader) -> String {
        let mut out = String::new();
        while let Some(c) = reader.next().unwrap() {
            out.push(c);
        }
        out
    }

    #[test]
    fn split_sequences_and_interrupts() {
        let text = "añ€😀z";
        let mut reader = StreamReader::new(
            Trickle {
                data: text.as_bytes(),
                step: 1,
                interrupt: false,
            },
            ReaderConfig::default(),
        );
        assert_eq!(collect(&mut reader), text);
        assert!(reader.done());
    }

    #[test]
    fn invalid_bytes_become_replacement() {
        let data: &[u8] = b"a\xff\xe2\x82b\xf0";
        let mut reader = StreamReader::new(data, ReaderConfig::default());
        assert_eq!(collect(&mut reader), "a\u{FFFD}\u{FFFD}\u{FFFD}b\u{FFFD}");
    }

    #[test]
    fn bounded_lookback() {
        let config = ReaderConfig { max_lookback: 4 };
        let mut reader = StreamReader::new(&b"abcdefgh"[..], config);
        for _ in 0..6 {
            reader.next().unwrap();
        }

        reader.mark();
        reader.next().unwrap();
        assert_eq!(reader.slice().unwrap(), "fg");

        for _ in 0..4 {
            reader.backup().unwrap();
        }
        assert_eq!(reader.position(), 3);
        // `c` has been evicted.
        assert_eq!(reader.peek(), None);
        assert!(matches!(reader.backup(), Err(ReadError::Evicted { .. })));

        // Characters stepped back over are replayed from the buffer.
        assert_eq!(collect(&mut reader), "defgh");
    }

    #[test]
    fn io_errors_are_shared() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("disk on fire"))
            }
        }

        let mut reader = StreamReader::new(Broken, ReaderConfig::default());
        let err = reader.next().unwrap_err();
        let copy = err.clone();
        assert!(matches!(copy, ReadError::Io(_)));
        assert!(err.to_string().contains("disk on fire"));
    }

    proptest! {
        #[test]
        fn matches_str_chars(text in "\\PC{0,200}", step in 1_usize..9) {
            let mut reader = StreamReader::new(
                Trickle { data: text.as_bytes(), step, interrupt: false },
                ReaderConfig { max_lookback: 8 },
            );
            prop_assert_eq!(collect(&mut reader), text);
        }
    }
}
