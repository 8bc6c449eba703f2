use alloc::borrow::Cow;
use alloc::string::{String, ToString};

use crate::reader::{ReadError, RuneReader};

/// A [`RuneReader`] over an in-memory string.
///
/// Every character stays addressable, so backup and slicing are unbounded.
#[derive(Debug, Clone)]
pub struct StrReader<'a> {
    text: Cow<'a, str>,
    /// Byte offset of the cursor.
    pos: usize,
    /// Byte offset of the span start.
    mark: usize,
}

impl<'a> StrReader<'a> {
    #[inline]
    pub fn new(text: impl Into<Cow<'a, str>>) -> Self {
        Self {
            text: text.into(),
            pos: 0,
            mark: 0,
        }
    }

    /// Decodes `bytes` as UTF-8, replacing invalid sequences with U+FFFD.
    ///
    /// Borrows when `bytes` is valid.
    #[inline]
    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        Self::new(String::from_utf8_lossy(bytes))
    }

    /// The text not yet returned.
    #[inline]
    pub fn remaining(&self) -> &str {
        &self.text[self.pos..]
    }

    /// Byte offset of the cursor.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl RuneReader for StrReader<'_> {
    fn next(&mut self) -> Result<Option<char>, ReadError> {
        let c = self.text[self.pos..].chars().next();
        if let Some(c) = c {
            self.pos += c.len_utf8();
        }
        Ok(c)
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.text[..self.pos].chars().next_back()
    }

    fn backup(&mut self) -> Result<(), ReadError> {
        let c = self.peek().ok_or(ReadError::BackupPastStart)?;
        self.pos -= c.len_utf8();
        Ok(())
    }

    fn mark(&mut self) {
        self.mark = self.pos - self.peek().map_or(0, char::len_utf8);
    }

    fn slice(&self) -> Result<String, ReadError> {
        if self.pos == 0 {
            return Err(ReadError::NothingRead);
        }
        self.text
            .get(self.mark..self.pos)
            .map(ToString::to_string)
            .ok_or(ReadError::OutOfBounds {
                index: self.mark,
                len: self.pos,
            })
    }

    #[inline]
    fn done(&self) -> bool {
        self.pos == self.text.len()
    }
}

#[cfg(test)]
mod tests {
    use super::StrReader;
    use crate::reader::{ReadError, RuneReader};

    #[test]
    fn multibyte_backup_and_slice() {
        let mut reader = StrReader::new("aé😀b");
        assert_eq!(reader.peek(), None);
        assert!(matches!(reader.slice(), Err(ReadError::NothingRead)));

        assert_eq!(reader.next().unwrap(), Some('a'));
        assert_eq!(reader.next().unwrap(), Some('é'));
        reader.mark();
        assert_eq!(reader.next().unwrap(), Some('😀'));
        assert_eq!(reader.slice().unwrap(), "é😀");

        reader.backup().unwrap();
        assert_eq!(reader.peek(), Some('é'));
        assert_eq!(reader.next().unwrap(), Some('😀'));
        assert_eq!(reader.next().unwrap(), Some('b'));
        assert!(reader.done());
        assert_eq!(reader.next().unwrap(), None);
    }

    #[test]
    fn backup_past_start() {
        let mut reader = StrReader::new("x");
        assert!(matches!(reader.backup(), Err(ReadError::BackupPastStart)));
        reader.next().unwrap();
        reader.backup().unwrap();
        assert!(reader.backup().is_err());
    }

    #[test]
    fn lossy_bytes() {
        let mut reader = StrReader::from_bytes(b"a\xffb");
        assert_eq!(reader.next().unwrap(), Some('a'));
        assert_eq!(reader.next().unwrap(), Some('\u{FFFD}'));
        assert_eq!(reader.remaining(), "b");
    }
}
