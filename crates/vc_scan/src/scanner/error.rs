use thiserror::Error;

use crate::reader::ReadError;
use crate::scanner::ScanCode;

// -----------------------------------------------------------------------------
// ScanErrorKind

/// Coarse classification of a [`ScanError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanErrorKind {
    /// A malformed token.
    Lexical,
    /// Tokens that are well formed but nested incorrectly.
    Structural,
    /// A limit was exceeded or the underlying stream failed.
    Resource,
}

// -----------------------------------------------------------------------------
// ScanError

/// A fatal scanning failure.
///
/// Once returned, the scanner is halted and every further call returns a
/// copy of the same error.
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum ScanError {
    #[error("invalid character {found:?} {context} (offset {offset})")]
    InvalidChar {
        found: char,
        context: &'static str,
        offset: usize,
    },

    #[error("invalid character {found:?} in literal {keyword} (expecting {expected:?}, offset {offset})")]
    InvalidKeyword {
        found: char,
        keyword: &'static str,
        expected: char,
        offset: usize,
    },

    #[error("unexpected end of input {context}")]
    UnexpectedEnd { context: &'static str },

    #[error("invalid number literal {text:?}")]
    InvalidNumber { text: String },

    #[error("malformed string literal {text:?}")]
    InvalidString { text: String },

    #[error("closer {found} does not match open {top}")]
    Mismatched { found: ScanCode, top: ScanCode },

    #[error("closer {found} without a matching opener")]
    Underflow { found: ScanCode },

    #[error("{code} cannot follow {}", .top.map_or("the top level", |_| "the current context"))]
    Inconsistent {
        code: ScanCode,
        top: Option<ScanCode>,
    },

    #[error("expected a value, found {0}")]
    ExpectedValue(ScanCode),

    #[error("nesting exceeds the limit of {limit}")]
    TooDeep { limit: usize },

    #[error(transparent)]
    Read(#[from] ReadError),
}

impl ScanError {
    pub fn kind(&self) -> ScanErrorKind {
        match self {
            Self::InvalidChar { .. }
            | Self::InvalidKeyword { .. }
            | Self::UnexpectedEnd { .. }
            | Self::InvalidNumber { .. }
            | Self::InvalidString { .. } => ScanErrorKind::Lexical,
            Self::Mismatched { .. }
            | Self::Underflow { .. }
            | Self::Inconsistent { .. }
            | Self::ExpectedValue(_) => ScanErrorKind::Structural,
            Self::TooDeep { .. } | Self::Read(_) => ScanErrorKind::Resource,
        }
    }
}
