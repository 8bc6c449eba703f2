use alloc::string::String;
use alloc::vec::Vec;

use crate::reader::ReadError;

/// Character storage addressed by a logical index.
///
/// The buffer grows until it holds `max` characters. From then on it is
/// circular: each push overwrites the oldest slot and advances
/// [`offset`](RuneBuffer::offset), the number of evicted characters.
///
/// Logical indices in `offset..len` are addressable.
///
/// # Examples
///
/// ```
/// use vc_scan::reader::RuneBuffer;
///
/// let mut buf = RuneBuffer::new(3);
/// for c in "abcd".chars() {
///     buf.push(c).unwrap();
/// }
///
/// assert_eq!(buf.len(), 4);
/// assert_eq!(buf.offset(), 1);
/// assert!(buf.get(0).is_err());
/// assert_eq!(buf.slice(1, 4).unwrap(), "bcd");
/// ```
#[derive(Debug, Clone)]
pub struct RuneBuffer {
    runes: Vec<char>,
    cap: usize,
    max: usize,
    offset: usize,
    len: usize,
    limit: usize,
}

impl RuneBuffer {
    const INITIAL_CAPACITY: usize = 16;
    const LIMIT: usize = i32::MAX as usize;

    /// Creates an empty buffer holding at most `max` characters.
    ///
    /// A `max` of zero is treated as one.
    pub fn new(max: usize) -> Self {
        let max = max.max(1);
        let cap = Self::INITIAL_CAPACITY.min(max);
        Self {
            runes: Vec::with_capacity(cap),
            cap,
            max,
            offset: 0,
            len: 0,
            limit: Self::LIMIT,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Appends a character, evicting the oldest one when full.
    ///
    /// Fails with [`ReadError::Overflow`] once the logical length reaches the limit.
    /// The buffer is unchanged on failure.
    pub fn push(&mut self, c: char) -> Result<(), ReadError> {
        if self.len >= self.limit {
            return Err(ReadError::Overflow { limit: self.limit });
        }

        if self.runes.len() < self.max {
            if self.runes.len() == self.cap {
                self.grow();
            }
            self.runes.push(c);
        } else {
            self.runes[self.len % self.max] = c;
            self.offset += 1;
        }

        self.len += 1;
        Ok(())
    }

    fn grow(&mut self) {
        let next = if self.cap < self.max / 2 {
            2 * self.cap + 1
        } else {
            self.max
        };
        self.runes.reserve_exact(next - self.runes.len());
        self.cap = next;
    }

    /// Returns the character at a logical index.
    pub fn get(&self, index: usize) -> Result<char, ReadError> {
        self.check(index)?;
        Ok(self.runes[index % self.max])
    }

    /// Copies the characters in `start..end`.
    pub fn slice(&self, start: usize, end: usize) -> Result<String, ReadError> {
        if start < self.offset {
            return Err(ReadError::Evicted {
                index: start,
                offset: self.offset,
            });
        }
        if end > self.len || start > end {
            return Err(ReadError::OutOfBounds {
                index: end.max(start),
                len: self.len,
            });
        }
        Ok((start..end).map(|i| self.runes[i % self.max]).collect())
    }

    fn check(&self, index: usize) -> Result<(), ReadError> {
        if index < self.offset {
            Err(ReadError::Evicted {
                index,
                offset: self.offset,
            })
        } else if index >= self.len {
            Err(ReadError::OutOfBounds {
                index,
                len: self.len,
            })
        } else {
            Ok(())
        }
    }

    /// Number of characters pushed so far, evicted ones included.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of characters evicted so far.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Current physical capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.cap
    }

    #[inline]
    pub fn max(&self) -> usize {
        self.max
    }

    /// Returns `true` once the buffer has started evicting.
    #[inline]
    pub fn is_circular(&self) -> bool {
        self.runes.len() == self.max && self.len > self.max
    }
}

#[cfg(test)]
mod tests {
    use super::RuneBuffer;
    use crate::reader::ReadError;

    #[test]
    fn growth_policy() {
        let mut buf = RuneBuffer::new(100);
        assert_eq!(buf.capacity(), 16);

        let mut caps = vec![];
        for _ in 0..100 {
            buf.push('x').unwrap();
            if caps.last() != Some(&buf.capacity()) {
                caps.push(buf.capacity());
            }
        }
        // 67 is past half of the maximum, so the next step jumps to it.
        assert_eq!(caps, [16, 33, 67, 100]);
        assert!(!buf.is_circular());
    }

    #[test]
    fn small_max_starts_at_max() {
        let buf = RuneBuffer::new(4);
        assert_eq!(buf.capacity(), 4);
        assert_eq!(RuneBuffer::new(0).max(), 1);
    }

    #[test]
    fn circular_eviction() {
        let mut buf = RuneBuffer::new(4);
        for c in "abcdefg".chars() {
            buf.push(c).unwrap();
        }

        assert!(buf.is_circular());
        assert_eq!(buf.len(), 7);
        assert_eq!(buf.offset(), 3);
        assert_eq!(buf.capacity(), 4);

        assert_eq!(buf.get(3).unwrap(), 'd');
        assert_eq!(buf.get(6).unwrap(), 'g');
        assert!(matches!(
            buf.get(2),
            Err(ReadError::Evicted {
                index: 2,
                offset: 3
            })
        ));
        assert!(matches!(buf.get(7), Err(ReadError::OutOfBounds { .. })));

        assert_eq!(buf.slice(3, 7).unwrap(), "defg");
        assert_eq!(buf.slice(5, 5).unwrap(), "");
        assert!(buf.slice(1, 7).is_err());
        assert!(buf.slice(5, 8).is_err());
    }

    #[test]
    fn overflow_is_fatal() {
        let mut buf = RuneBuffer::new(2).with_limit(3);
        for c in "abc".chars() {
            buf.push(c).unwrap();
        }
        assert!(matches!(buf.push('d'), Err(ReadError::Overflow { limit: 3 })));
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.get(2).unwrap(), 'c');
    }
}
