//! A pull-based scanner for JSON text.
//!
//! [`Scanner`] reads characters from a [`RuneReader`] one at a time and reports
//! structural events as [`ScanCode`]s. A stack of open containers checks that
//! every closer matches its opener and tells object keys apart from values.
//!
//! Callers either walk the events with [`next_code`](Scanner::next_code) and
//! [`resume`](Scanner::resume), or materialize whole values with
//! [`next_value`](Scanner::next_value) and [`next_string`](Scanner::next_string).
//!
//! Only strict JSON is accepted: a single top-level object or array, no trailing
//! commas, no comments.

// -----------------------------------------------------------------------------
// Modules

mod code;
mod error;
mod lexer;
mod literal;

// -----------------------------------------------------------------------------
// Exports

pub use code::{LiteralKind, ScanCode};
pub use error::{ScanError, ScanErrorKind};

// -----------------------------------------------------------------------------
// Scanner

use alloc::string::String;
use alloc::vec::Vec;
use std::io;

use vc_reflect::{Object, Value};

use crate::reader::{ReaderConfig, RuneReader, StrReader, StreamReader};
use lexer::State;

/// Configuration of a [`Scanner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    /// Maximum number of simultaneously open objects and arrays.
    pub max_depth: usize,
    /// Used by [`Scanner::from_reader`].
    pub reader: ReaderConfig,
}

impl ScanConfig {
    pub const DEFAULT_MAX_DEPTH: usize = 512;
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            reader: ReaderConfig::default(),
        }
    }
}

/// A JSON scanner over a [`RuneReader`].
///
/// A scanner parses a single input and halts on the first error.
///
/// # Examples
///
/// ```
/// use vc_scan::{LiteralKind, ScanCode, Scanner};
///
/// let mut scanner = Scanner::from_text(r#"{"x": null}"#);
/// assert_eq!(scanner.resume().unwrap(), ScanCode::StructBegin);
/// assert_eq!(scanner.resume().unwrap(), ScanCode::KeyBegin);
/// assert_eq!(scanner.next_string().unwrap(), r#""x""#);
///
/// assert_eq!(scanner.resume().unwrap(), ScanCode::LiteralBegin);
/// assert_eq!(scanner.peek_literal(), Some(LiteralKind::Null));
/// assert!(scanner.next_value().unwrap().is_null());
/// ```
pub struct Scanner<R> {
    reader: R,
    config: ScanConfig,
    state: State,
    stack: Vec<ScanCode>,
    /// Open containers.
    depth: usize,
    literal: LiteralKind,
    last: ScanCode,
    /// Characters consumed.
    offset: usize,
    capture: Option<String>,
    error: Option<ScanError>,
}

impl<'a> Scanner<StrReader<'a>> {
    /// Scans an in-memory string with the default configuration.
    #[inline]
    pub fn from_text(text: &'a str) -> Self {
        Self::new(StrReader::new(text))
    }
}

impl<R: io::Read> Scanner<StreamReader<R>> {
    /// Scans UTF-8 text from a byte stream.
    ///
    /// Lookback is bounded by `config.reader`, so a single literal
    /// longer than `max_lookback` characters fails to scan.
    #[inline]
    pub fn from_reader(inner: R, config: ScanConfig) -> Self {
        Self::with_config(StreamReader::new(inner, config.reader), config)
    }
}

impl<R: RuneReader> Scanner<R> {
    #[inline]
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, ScanConfig::default())
    }

    pub fn with_config(reader: R, config: ScanConfig) -> Self {
        Self {
            reader,
            config,
            state: State::ExpectRoot,
            stack: Vec::new(),
            depth: 0,
            literal: LiteralKind::Null,
            last: ScanCode::Scanning,
            offset: 0,
            capture: None,
            error: None,
        }
    }

    #[inline]
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Number of characters consumed so far.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of open objects and arrays.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The error that halted the scanner, if any.
    #[inline]
    pub fn error(&self) -> Option<&ScanError> {
        self.error.as_ref()
    }

    #[inline]
    pub fn into_reader(self) -> R {
        self.reader
    }

    fn read(&mut self) -> Result<Option<char>, ScanError> {
        let c = self.reader.next()?;
        if let Some(c) = c {
            self.offset += 1;
            if let Some(capture) = &mut self.capture {
                capture.push(c);
            }
        }
        Ok(c)
    }

    fn unread(&mut self) -> Result<(), ScanError> {
        self.reader.backup()?;
        self.offset -= 1;
        if let Some(capture) = &mut self.capture {
            capture.pop();
        }
        Ok(())
    }

    /// Halts the scanner.
    fn fail(&mut self, err: ScanError) -> ScanError {
        log::debug!("scan halted at offset {}: {err}", self.offset);
        self.state = State::Failed;
        self.last = ScanCode::Error;
        self.error = Some(err.clone());
        err
    }

    #[inline]
    fn check(&self) -> Result<(), ScanError> {
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Consumes one character and returns the resulting code.
    ///
    /// Most characters yield [`ScanCode::Scanning`]. At the end of the input
    /// [`ScanCode::ToEnd`] is returned, on every call.
    pub fn next_code(&mut self) -> Result<ScanCode, ScanError> {
        self.check()?;
        match self.lex().and_then(|raw| self.settle(raw)) {
            Ok(code) => {
                self.last = code;
                Ok(code)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Advances to the next code other than [`ScanCode::Scanning`].
    pub fn resume(&mut self) -> Result<ScanCode, ScanError> {
        loop {
            let code = self.next_code()?;
            if code != ScanCode::Scanning {
                return Ok(code);
            }
        }
    }

    /// Returns the innermost open context without advancing.
    ///
    /// [`ScanCode::Error`] after a failure, [`ScanCode::ToEnd`] at the end
    /// of the input and [`ScanCode::Scanning`] outside any container.
    pub fn peek(&self) -> ScanCode {
        if self.error.is_some() {
            ScanCode::Error
        } else if self.state == State::End {
            ScanCode::ToEnd
        } else {
            self.stack.last().copied().unwrap_or(ScanCode::Scanning)
        }
    }

    /// The kind of the literal currently open, if positioned on one.
    pub fn peek_literal(&self) -> Option<LiteralKind> {
        match self.peek() {
            ScanCode::LiteralBegin | ScanCode::KeyBegin => Some(self.literal),
            _ => None,
        }
    }

    /// Returns the Begin code of the value to consume next.
    ///
    /// Uses the value just opened, if any, and advances otherwise.
    fn value_begin(&mut self) -> Result<ScanCode, ScanError> {
        self.check()?;
        if self.state.in_literal() {
            return Ok(self.stack.last().copied().unwrap_or(ScanCode::LiteralBegin));
        }
        if self.last.is_begin() {
            return Ok(self.last);
        }
        match self.resume()? {
            code if code.is_begin() => Ok(code),
            code => Err(self.fail(ScanError::ExpectedValue(code))),
        }
    }

    /// Consumes one complete value and converts it.
    ///
    /// Objects keep the last value of a duplicated key, at the position of its
    /// first occurrence.
    pub fn next_value(&mut self) -> Result<Value, ScanError> {
        let code = self.value_begin()?;
        self.value_from(code)
    }

    /// Consumes one complete value and returns its source text.
    ///
    /// String literals keep their quotes and escapes.
    pub fn next_string(&mut self) -> Result<String, ScanError> {
        match self.value_begin()? {
            ScanCode::KeyBegin | ScanCode::LiteralBegin => self.finish_literal(),
            code @ (ScanCode::StructBegin | ScanCode::MapBegin | ScanCode::ArrayBegin) => {
                let opener = if code == ScanCode::ArrayBegin { '[' } else { '{' };
                self.capture = Some(String::from(opener));
                let skipped = self.skip_container();
                let text = self.capture.take().unwrap_or_default();
                skipped.map(|()| text)
            }
            code => Err(self.fail(ScanError::ExpectedValue(code))),
        }
    }

    fn value_from(&mut self, code: ScanCode) -> Result<Value, ScanError> {
        match code {
            ScanCode::KeyBegin | ScanCode::LiteralBegin => {
                let kind = self.literal;
                let text = self.finish_literal()?;
                literal::literal_value(kind, &text).map_err(|err| self.fail(err))
            }
            ScanCode::StructBegin | ScanCode::MapBegin => self.object_value(code),
            ScanCode::ArrayBegin => self.array_value(),
            code => Err(self.fail(ScanError::ExpectedValue(code))),
        }
    }

    /// Scans to the end of the open literal and returns its text.
    fn finish_literal(&mut self) -> Result<String, ScanError> {
        loop {
            match self.next_code()? {
                ScanCode::Scanning => {}
                ScanCode::LiteralEnd | ScanCode::KeyEnd => break,
                code => {
                    let top = self.stack.last().copied();
                    return Err(self.fail(ScanError::Inconsistent { code, top }));
                }
            }
        }
        self.reader.slice().map_err(|err| self.fail(err.into()))
    }

    fn object_value(&mut self, open: ScanCode) -> Result<Value, ScanError> {
        let mut object = Object::new();
        loop {
            match self.resume()? {
                ScanCode::KeyBegin => {
                    let text = self.finish_literal()?;
                    let key = literal::unquote(&text).map_err(|err| self.fail(err))?;
                    let value = self.next_value()?;
                    object.insert(key, value);
                }
                code if open.reflection() == Some(code) => return Ok(Value::Object(object)),
                code => {
                    return Err(self.fail(ScanError::Inconsistent {
                        code,
                        top: Some(open),
                    }));
                }
            }
        }
    }

    fn array_value(&mut self) -> Result<Value, ScanError> {
        let mut items = Vec::new();
        loop {
            match self.resume()? {
                ScanCode::ArrayEnd => return Ok(Value::Array(items)),
                code if code.is_begin() => items.push(self.value_from(code)?),
                code => {
                    return Err(self.fail(ScanError::Inconsistent {
                        code,
                        top: Some(ScanCode::ArrayBegin),
                    }));
                }
            }
        }
    }

    /// Scans through the End code of the container just opened.
    fn skip_container(&mut self) -> Result<(), ScanError> {
        let mut open = 1_usize;
        while open > 0 {
            let code = self.next_code()?;
            if code.is_container() {
                open += 1;
            } else if matches!(
                code,
                ScanCode::StructEnd | ScanCode::MapEnd | ScanCode::ArrayEnd
            ) {
                open -= 1;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec::Vec;

    use proptest::prelude::*;
    use vc_reflect::Value;

    use super::{LiteralKind, ScanCode, ScanConfig, ScanError, ScanErrorKind, Scanner};
    use crate::reader::ReaderConfig;

    fn codes(text: &str) -> Result<Vec<ScanCode>, ScanError> {
        let mut scanner = Scanner::from_text(text);
        let mut out = Vec::new();
        loop {
            let code = scanner.resume()?;
            out.push(code);
            if code == ScanCode::ToEnd {
                return Ok(out);
            }
        }
    }

    fn value(text: &str) -> Result<Value, ScanError> {
        Scanner::from_text(text).next_value()
    }

    #[test]
    fn event_sequence() {
        use ScanCode::*;

        assert_eq!(
            codes(r#"{"a": [1, true], "b": {}}"#).unwrap(),
            [
                StructBegin,
                KeyBegin,
                KeyEnd,
                ArrayBegin,
                LiteralBegin,
                LiteralEnd,
                LiteralBegin,
                LiteralEnd,
                ArrayEnd,
                KeyBegin,
                KeyEnd,
                StructBegin,
                StructEnd,
                StructEnd,
                ToEnd,
            ]
        );
    }

    #[test]
    fn end_is_idempotent() {
        let mut scanner = Scanner::from_text(" [] \n");
        assert_eq!(scanner.resume().unwrap(), ScanCode::ArrayBegin);
        assert_eq!(scanner.resume().unwrap(), ScanCode::ArrayEnd);
        for _ in 0..3 {
            assert_eq!(scanner.resume().unwrap(), ScanCode::ToEnd);
            assert_eq!(scanner.peek(), ScanCode::ToEnd);
        }

        assert_eq!(codes("").unwrap(), [ScanCode::ToEnd]);
    }

    #[test]
    fn materialized_values() {
        let v = value(r#"{"k": 1, "s": "a\nb", "k": [2.5, null, false], "u": 18446744073709551615}"#)
            .unwrap();
        let object = v.as_object().unwrap();

        assert_eq!(object.keys().collect::<Vec<_>>(), ["k", "s", "u"]);
        assert_eq!(
            object.get("k"),
            Some(&Value::Array(vec![
                Value::Float(2.5),
                Value::Null,
                Value::Bool(false)
            ]))
        );
        assert_eq!(v.get("s").and_then(Value::as_str), Some("a\nb"));
        assert_eq!(v.get("u"), Some(&Value::Uint(u64::MAX)));
    }

    #[test]
    fn raw_strings() {
        let mut scanner = Scanner::from_text(r#"{"raw": {"a": [1, 2]}, "n": -3.0e1, "s": "x\"y"}"#);
        assert_eq!(scanner.resume().unwrap(), ScanCode::StructBegin);

        let mut pairs = Vec::new();
        while scanner.resume().unwrap() == ScanCode::KeyBegin {
            let key = scanner.next_value().unwrap();
            pairs.push((key.as_str().unwrap().to_string(), scanner.next_string().unwrap()));
        }

        assert_eq!(
            pairs,
            [
                ("raw".to_string(), r#"{"a": [1, 2]}"#.to_string()),
                ("n".to_string(), "-3.0e1".to_string()),
                ("s".to_string(), r#""x\"y""#.to_string()),
            ]
        );
        assert_eq!(scanner.resume().unwrap(), ScanCode::ToEnd);
    }

    #[test]
    fn null_stands_in_for_a_value() {
        let mut scanner = Scanner::from_text(r#"[null, {}]"#);
        assert_eq!(scanner.resume().unwrap(), ScanCode::ArrayBegin);
        assert_eq!(scanner.resume().unwrap(), ScanCode::LiteralBegin);
        assert_eq!(scanner.peek(), ScanCode::LiteralBegin);
        assert_eq!(scanner.peek_literal(), Some(LiteralKind::Null));
        assert_eq!(scanner.next_value().unwrap(), Value::Null);

        assert_eq!(scanner.resume().unwrap(), ScanCode::StructBegin);
        assert_eq!(scanner.peek_literal(), None);
    }

    #[test]
    fn closers_never_underflow() {
        for text in ["]", "}", "{}}", "[] ]"] {
            let err = codes(text).unwrap_err();
            assert!(matches!(err, ScanError::Underflow { .. }), "{text}: {err}");
            assert_eq!(err.kind(), ScanErrorKind::Structural);
        }

        let err = codes("[1}").unwrap_err();
        assert!(matches!(
            err,
            ScanError::Mismatched {
                found: ScanCode::StructEnd,
                top: ScanCode::ArrayBegin
            }
        ));
    }

    #[test]
    fn literal_outside_container() {
        for text in [r#""x""#, "12", "true"] {
            let err = codes(text).unwrap_err();
            assert!(matches!(err, ScanError::Inconsistent { top: None, .. }), "{text}");
            assert_eq!(err.kind(), ScanErrorKind::Structural);
        }
    }

    #[test]
    fn truncated_keyword_names_the_character() {
        let err = value(r#"{"a": tru}"#).unwrap_err();
        assert!(matches!(
            err,
            ScanError::InvalidKeyword {
                found: '}',
                keyword: "true",
                expected: 'e',
                offset: 9,
            }
        ));
        assert_eq!(err.kind(), ScanErrorKind::Lexical);
        assert!(err.to_string().contains("'}'"));
    }

    #[test]
    fn lexical_errors() {
        for text in [
            "[-]",
            "[1.]",
            "[1e]",
            "[01]",
            "[1,]",
            r#"{"a" 1}"#,
            r#"{"a": 1,}"#,
            r#"["\x"]"#,
            r#"["\u12g4"]"#,
            "[\"a\u{1}\"]",
            "{} x",
            "[nul",
        ] {
            let err = codes(text).unwrap_err();
            assert_eq!(err.kind(), ScanErrorKind::Lexical, "{text}: {err}");
        }
    }

    #[test]
    fn errors_are_sticky() {
        let mut scanner = Scanner::from_text("[1,]");
        let err = scanner.next_value().unwrap_err();
        assert_eq!(scanner.peek(), ScanCode::Error);
        assert_eq!(scanner.next_code().unwrap_err().to_string(), err.to_string());
        assert!(scanner.next_value().is_err());
        assert!(scanner.error().is_some());
    }

    #[test]
    fn depth_limit() {
        let config = ScanConfig {
            max_depth: 2,
            ..ScanConfig::default()
        };
        let mut ok = Scanner::from_reader(&b"[[1]]"[..], config);
        assert!(ok.next_value().is_ok());

        let mut deep = Scanner::from_reader(&b"[[[1]]]"[..], config);
        let err = deep.next_value().unwrap_err();
        assert!(matches!(err, ScanError::TooDeep { limit: 2 }));
        assert_eq!(err.kind(), ScanErrorKind::Resource);
    }

    #[test]
    fn stream_lookback_bounds_literals() {
        let config = ScanConfig {
            reader: ReaderConfig { max_lookback: 6 },
            ..ScanConfig::default()
        };

        let mut short = Scanner::from_reader(&br#"[1, "abcd", 333, {"k": true}]"#[..], config);
        let v = short.next_value().unwrap();
        assert_eq!(v.as_array().unwrap().len(), 4);

        let mut long = Scanner::from_reader(&br#"["abcdefghijkl"]"#[..], config);
        let err = long.next_value().unwrap_err();
        assert_eq!(err.kind(), ScanErrorKind::Resource);
    }

    proptest! {
        #[test]
        fn integers_round_trip(n in any::<i64>()) {
            prop_assert_eq!(value(&format!("[{n}]")).unwrap(), Value::Array(vec![Value::Int(n)]));
        }

        #[test]
        fn floats_round_trip(f in any::<f64>().prop_filter("finite", |f| f.is_finite())) {
            let v = value(&format!("[{f:?}]")).unwrap();
            prop_assert_eq!(v, Value::Array(vec![Value::Float(f)]));
        }
    }
}
