use core::fmt;

// -----------------------------------------------------------------------------
// ScanCode

/// A structural event reported by the [`Scanner`](crate::Scanner).
///
/// Every Begin code is immediately followed by its End code, so
/// [`reflection`](ScanCode::reflection) maps between them by a fixed offset.
///
/// ```
/// use vc_scan::ScanCode;
///
/// assert_eq!(ScanCode::StructBegin.reflection(), Some(ScanCode::StructEnd));
/// assert_eq!(ScanCode::ArrayEnd.reflection(), Some(ScanCode::ArrayBegin));
/// assert_eq!(ScanCode::Scanning.reflection(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ScanCode {
    /// A character was consumed without completing an event.
    Scanning = 0,
    KeyBegin = 1,
    KeyEnd = 2,
    LiteralBegin = 3,
    LiteralEnd = 4,
    StructBegin = 5,
    StructEnd = 6,
    MapBegin = 7,
    MapEnd = 8,
    ArrayBegin = 9,
    ArrayEnd = 10,
    /// The input is exhausted.
    ToEnd = 11,
    /// The scan failed.
    Error = 12,
}

impl ScanCode {
    const ALL: [ScanCode; 13] = [
        Self::Scanning,
        Self::KeyBegin,
        Self::KeyEnd,
        Self::LiteralBegin,
        Self::LiteralEnd,
        Self::StructBegin,
        Self::StructEnd,
        Self::MapBegin,
        Self::MapEnd,
        Self::ArrayBegin,
        Self::ArrayEnd,
        Self::ToEnd,
        Self::Error,
    ];

    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        if (value as usize) < Self::ALL.len() {
            Some(Self::ALL[value as usize])
        } else {
            None
        }
    }

    #[inline]
    pub const fn is_begin(self) -> bool {
        matches!(
            self,
            Self::KeyBegin | Self::LiteralBegin | Self::StructBegin | Self::MapBegin | Self::ArrayBegin
        )
    }

    #[inline]
    pub const fn is_end(self) -> bool {
        matches!(
            self,
            Self::KeyEnd | Self::LiteralEnd | Self::StructEnd | Self::MapEnd | Self::ArrayEnd
        )
    }

    /// Returns `true` for the Begin code of an object or array.
    #[inline]
    pub const fn is_container(self) -> bool {
        matches!(self, Self::StructBegin | Self::MapBegin | Self::ArrayBegin)
    }

    /// The paired counterpart of a Begin or End code.
    #[inline]
    pub const fn reflection(self) -> Option<Self> {
        if self.is_begin() {
            Self::from_u8(self as u8 + 1)
        } else if self.is_end() {
            Self::from_u8(self as u8 - 1)
        } else {
            None
        }
    }
}

impl fmt::Display for ScanCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// -----------------------------------------------------------------------------
// LiteralKind

/// How the most recently opened literal is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    String,
    /// A number without a fraction or exponent.
    Int,
    Float,
    Bool,
    Null,
}

#[cfg(test)]
mod tests {
    use super::ScanCode;

    #[test]
    fn reflection_is_an_involution() {
        for code in ScanCode::ALL {
            match code.reflection() {
                Some(other) => {
                    assert_ne!(code, other);
                    assert_eq!(other.reflection(), Some(code));
                    assert_eq!(code.is_begin(), other.is_end());
                    assert_eq!((code as u8).abs_diff(other as u8), 1);
                }
                None => assert!(!code.is_begin() && !code.is_end()),
            }
        }
    }

    #[test]
    fn discriminants_round_trip() {
        for (index, code) in ScanCode::ALL.into_iter().enumerate() {
            assert_eq!(code as usize, index);
            assert_eq!(ScanCode::from_u8(index as u8), Some(code));
        }
        assert_eq!(ScanCode::from_u8(13), None);
    }
}
