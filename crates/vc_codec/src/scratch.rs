use core::fmt;

/// A fixed 64-byte formatting workspace.
///
/// Codecs format numbers here before handing the bytes to a renderer.
/// Writing more than 64 bytes fails with [`fmt::Error`].
///
/// ```
/// use core::fmt::Write;
/// use vc_codec::Scratch;
///
/// let mut scratch = Scratch::new();
/// write!(scratch, "{}", -42_i64).unwrap();
/// assert_eq!(scratch.as_str(), "-42");
///
/// scratch.clear();
/// assert!(write!(scratch, "{:>65}", 'x').is_err());
/// ```
#[derive(Clone)]
pub struct Scratch {
    buf: [u8; Self::CAPACITY],
    len: usize,
}

impl Scratch {
    pub const CAPACITY: usize = 64;

    #[inline]
    pub const fn new() -> Self {
        Self {
            buf: [0; Self::CAPACITY],
            len: 0,
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        // Only whole `str`s are ever written.
        core::str::from_utf8(self.as_bytes()).unwrap_or_default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for Scratch {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Write for Scratch {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let end = self.len + s.len();
        if end > Self::CAPACITY {
            return Err(fmt::Error);
        }
        self.buf[self.len..end].copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }
}

impl fmt::Debug for Scratch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Scratch").field(&self.as_str()).finish()
    }
}
