use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use std::io;

use thiserror::Error;
use vc_reflect::Reflect;
use vc_reflect::info::TypeInfo;
use vc_reflect::ops::ScalarError;
use vc_scan::{ReadError, ScanCode, ScanError, ScanErrorKind};

// -----------------------------------------------------------------------------
// ErrorClass

/// What went wrong, broadly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// A malformed token in the input.
    Lexical,
    /// Well-formed tokens nested incorrectly.
    Structural,
    /// A type that cannot be encoded, or input that does not fit the target type.
    Type,
    /// A failing sink or source, or an exceeded limit.
    Resource,
    /// A broken engine invariant.
    Internal,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Lexical => "lexical",
            Self::Structural => "structural",
            Self::Type => "type",
            Self::Resource => "resource",
            Self::Internal => "internal",
        })
    }
}

// -----------------------------------------------------------------------------
// PathSegment

/// One step from a value to a nested value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Field(&'static str),
    Index(usize),
    Key(String),
}

impl From<&'static str> for PathSegment {
    #[inline]
    fn from(value: &'static str) -> Self {
        Self::Field(value)
    }
}

impl From<usize> for PathSegment {
    #[inline]
    fn from(value: usize) -> Self {
        Self::Index(value)
    }
}

impl From<String> for PathSegment {
    #[inline]
    fn from(value: String) -> Self {
        Self::Key(value)
    }
}

/// Renders segments stored innermost first as ` at a.b[2]`.
struct AtPath<'a>(&'a [PathSegment]);

impl fmt::Display for AtPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return Ok(());
        }
        f.write_str(" at ")?;
        for (i, segment) in self.0.iter().rev().enumerate() {
            match segment {
                PathSegment::Field(name) if i == 0 => f.write_str(name)?,
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
                PathSegment::Key(key) => write!(f, "[{key:?}]")?,
            }
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// CodecError

/// The failure of a marshal or unmarshal call.
///
/// Composite codecs prepend the field, index or key they were working on
/// while the error propagates, so the final error locates the failing value.
///
/// ```
/// use vc_codec::{CodecError, ErrorClass};
///
/// let err = CodecError::type_error("unsupported float value NaN")
///     .within(2_usize)
///     .within("ratios");
///
/// assert_eq!(err.class(), ErrorClass::Type);
/// assert_eq!(err.to_string(), "type error at ratios[2]: unsupported float value NaN");
/// ```
#[derive(Debug, Clone, Error)]
#[error("{class} error{at}: {message}", at = AtPath(.path))]
pub struct CodecError {
    class: ErrorClass,
    message: String,
    /// Innermost first.
    path: Vec<PathSegment>,
}

impl CodecError {
    pub fn new(class: ErrorClass, message: impl Into<String>) -> Self {
        Self {
            class,
            message: message.into(),
            path: Vec::new(),
        }
    }

    #[inline]
    pub fn lexical(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Lexical, message)
    }

    #[inline]
    pub fn structural(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Structural, message)
    }

    #[inline]
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Type, message)
    }

    #[inline]
    pub fn resource(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Resource, message)
    }

    #[inline]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, message)
    }

    /// A codec built for `info` was handed a value of another type.
    pub(crate) fn invoked_on(info: &TypeInfo, found: &dyn Reflect) -> Self {
        Self::internal(format!(
            "codec of `{}` invoked on `{}`",
            info.type_path(),
            found.type_path()
        ))
    }

    /// The input holds a different kind of value than `info` accepts.
    pub(crate) fn expected(what: &str, info: &TypeInfo, found: ScanCode) -> Self {
        Self::type_error(format!(
            "expected {what} for `{}`, found {found}",
            info.type_path()
        ))
    }

    pub(crate) fn unexpected(code: ScanCode) -> Self {
        Self::structural(format!("unexpected {code}"))
    }

    /// Records that the error happened inside `segment`.
    #[must_use]
    pub fn within(mut self, segment: impl Into<PathSegment>) -> Self {
        self.path.push(segment.into());
        self
    }

    #[inline]
    pub fn class(&self) -> ErrorClass {
        self.class
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The location of the failing value, outermost first.
    pub fn path(&self) -> impl Iterator<Item = &PathSegment> {
        self.path.iter().rev()
    }
}

impl From<ScanError> for CodecError {
    fn from(value: ScanError) -> Self {
        let class = match value.kind() {
            ScanErrorKind::Lexical => ErrorClass::Lexical,
            ScanErrorKind::Structural => ErrorClass::Structural,
            ScanErrorKind::Resource => ErrorClass::Resource,
        };
        Self::new(class, value.to_string())
    }
}

impl From<ReadError> for CodecError {
    #[inline]
    fn from(value: ReadError) -> Self {
        Self::resource(value.to_string())
    }
}

impl From<io::Error> for CodecError {
    #[inline]
    fn from(value: io::Error) -> Self {
        Self::resource(value.to_string())
    }
}

impl From<fmt::Error> for CodecError {
    #[inline]
    fn from(_: fmt::Error) -> Self {
        Self::resource("formatting failed")
    }
}

impl From<ScalarError> for CodecError {
    #[inline]
    fn from(value: ScalarError) -> Self {
        Self::type_error(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};

    use vc_scan::Scanner;

    use super::{CodecError, ErrorClass, PathSegment};

    #[test]
    fn path_rendering() {
        let err = CodecError::structural("boom")
            .within(String::from("k"))
            .within(0_usize)
            .within("items")
            .within("outer");
        assert_eq!(err.to_string(), r#"structural error at outer.items[0]["k"]: boom"#);
        assert_eq!(err.path().next(), Some(&PathSegment::Field("outer")));

        assert_eq!(CodecError::internal("x").to_string(), "internal error: x");
    }

    #[test]
    fn scan_errors_keep_their_class() {
        let err: CodecError = Scanner::from_text("]").resume().unwrap_err().into();
        assert_eq!(err.class(), ErrorClass::Structural);

        let err: CodecError = Scanner::from_text("[tx]").next_value().unwrap_err().into();
        assert_eq!(err.class(), ErrorClass::Lexical);
    }
}
