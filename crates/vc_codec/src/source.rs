use alloc::string::String;

use vc_reflect::Value;
use vc_scan::{LiteralKind, RuneReader, ScanCode, Scanner};

use crate::CodecError;

/// The decode-side input: a stream of scan codes.
///
/// A decoder is invoked while the source is positioned on the Begin code of
/// its value, which [`peek`](Source::peek) reports, and must consume the
/// value through the matching End code.
pub trait Source {
    /// The innermost open context, without advancing.
    fn peek(&self) -> ScanCode;

    /// The kind of the literal currently open, if any.
    fn peek_literal(&self) -> Option<LiteralKind>;

    /// Advances by one step.
    fn next_code(&mut self) -> Result<ScanCode, CodecError>;

    /// Advances to the next significant code.
    fn resume(&mut self) -> Result<ScanCode, CodecError>;

    /// Consumes one whole value.
    fn next_value(&mut self) -> Result<Value, CodecError>;

    /// Consumes one whole value and returns its source text.
    fn next_string(&mut self) -> Result<String, CodecError>;

    /// Called once with the error that aborted a top-level unmarshal.
    fn report(&mut self, err: &CodecError) {
        log::debug!("unmarshal failed: {err}");
    }

    /// Returns `true` when positioned on a `null` literal.
    fn at_null(&self) -> bool {
        self.peek() == ScanCode::LiteralBegin && self.peek_literal() == Some(LiteralKind::Null)
    }
}

impl<R: RuneReader> Source for Scanner<R> {
    #[inline]
    fn peek(&self) -> ScanCode {
        Scanner::peek(self)
    }

    #[inline]
    fn peek_literal(&self) -> Option<LiteralKind> {
        Scanner::peek_literal(self)
    }

    #[inline]
    fn next_code(&mut self) -> Result<ScanCode, CodecError> {
        Ok(Scanner::next_code(self)?)
    }

    #[inline]
    fn resume(&mut self) -> Result<ScanCode, CodecError> {
        Ok(Scanner::resume(self)?)
    }

    #[inline]
    fn next_value(&mut self) -> Result<Value, CodecError> {
        Ok(Scanner::next_value(self)?)
    }

    #[inline]
    fn next_string(&mut self) -> Result<String, CodecError> {
        Ok(Scanner::next_string(self)?)
    }

    fn report(&mut self, err: &CodecError) {
        log::debug!("unmarshal failed at offset {}: {err}", self.offset());
    }
}

#[cfg(test)]
mod tests {
    use vc_scan::{ScanCode, Scanner};

    use super::Source;

    #[test]
    fn null_detection() {
        let mut scanner = Scanner::from_text("[null, 1]");
        let src: &mut dyn Source = &mut scanner;

        assert_eq!(src.resume().unwrap(), ScanCode::ArrayBegin);
        assert!(!src.at_null());
        assert_eq!(src.resume().unwrap(), ScanCode::LiteralBegin);
        assert!(src.at_null());
        assert!(src.next_value().unwrap().is_null());
        assert_eq!(src.resume().unwrap(), ScanCode::LiteralBegin);
        assert!(!src.at_null());
        assert_eq!(src.next_string().unwrap(), "1");
    }
}
