//! Conversion of literal text into [`Value`]s.

use vc_reflect::Value;

use crate::scanner::{LiteralKind, ScanError};

pub(super) fn literal_value(kind: LiteralKind, text: &str) -> Result<Value, ScanError> {
    match kind {
        LiteralKind::String => unquote(text).map(Value::String),
        LiteralKind::Int => parse_int(text),
        LiteralKind::Float => parse_float(text),
        LiteralKind::Bool => Ok(Value::Bool(text == "true")),
        LiteralKind::Null => Ok(Value::Null),
    }
}

/// `i64` when it fits, then `u64`, then `f64`.
fn parse_int(text: &str) -> Result<Value, ScanError> {
    if let Ok(v) = text.parse::<i64>() {
        Ok(Value::Int(v))
    } else if let Ok(v) = text.parse::<u64>() {
        Ok(Value::Uint(v))
    } else {
        parse_float(text)
    }
}

fn parse_float(text: &str) -> Result<Value, ScanError> {
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Value::Float(v)),
        _ => Err(ScanError::InvalidNumber { text: text.into() }),
    }
}

/// Strips the quotes of a string literal and resolves its escapes.
///
/// A `\u` high surrogate followed by a `\u` low surrogate combine into one
/// character. Any other surrogate becomes U+FFFD.
pub(super) fn unquote(text: &str) -> Result<String, ScanError> {
    let malformed = || ScanError::InvalidString { text: text.into() };

    let inner = text
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or_else(malformed)?;

    if !inner.contains('\\') {
        return Ok(inner.into());
    }

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let c = match chars.next().ok_or_else(malformed)? {
            '"' => '"',
            '\\' => '\\',
            '/' => '/',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'u' => {
                let unit = hex4(chars.as_str()).ok_or_else(malformed)?;
                chars.nth(3);
                decode_unit(unit, &mut chars)
            }
            _ => return Err(malformed()),
        };
        out.push(c);
    }
    Ok(out)
}

fn decode_unit(unit: u16, chars: &mut core::str::Chars<'_>) -> char {
    if (0xD800..0xDC00).contains(&unit) {
        let rest = chars.as_str();
        if let Some(low) = rest.strip_prefix("\\u").and_then(hex4)
            && (0xDC00..0xE000).contains(&low)
        {
            chars.nth(5);
            let c = 0x10000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
            return char::from_u32(c).unwrap_or(char::REPLACEMENT_CHARACTER);
        }
    }
    char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER)
}

fn hex4(s: &str) -> Option<u16> {
    let digits = s.get(..4)?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use vc_reflect::Value;

    use super::{literal_value, unquote};
    use crate::scanner::LiteralKind;

    #[test]
    fn escapes() {
        assert_eq!(unquote(r#""plain""#).unwrap(), "plain");
        assert_eq!(unquote(r#""a\"b\\c\/d\n\t""#).unwrap(), "a\"b\\c/d\n\t");
        assert_eq!(unquote(r#""é中""#).unwrap(), "é中");
        assert!(unquote("unquoted").is_err());
    }

    #[test]
    fn surrogates() {
        assert_eq!(unquote(r#""\ud83d\ude00!""#).unwrap(), "😀!");
        assert_eq!(unquote(r#""\ud83dx""#).unwrap(), "\u{FFFD}x");
        assert_eq!(unquote(r#""\ude00""#).unwrap(), "\u{FFFD}");
        // A high surrogate followed by another high surrogate.
        assert_eq!(unquote(r#""\ud83d\ud83d""#).unwrap(), "\u{FFFD}\u{FFFD}");
    }

    #[test]
    fn numbers() {
        assert_eq!(literal_value(LiteralKind::Int, "-12").unwrap(), Value::Int(-12));
        assert_eq!(
            literal_value(LiteralKind::Int, "18446744073709551615").unwrap(),
            Value::Uint(u64::MAX)
        );
        assert_eq!(
            literal_value(LiteralKind::Int, "100000000000000000000").unwrap(),
            Value::Float(1e20)
        );
        assert_eq!(literal_value(LiteralKind::Float, "1.5e3").unwrap(), Value::Float(1500.0));
        assert!(literal_value(LiteralKind::Float, "1e400").is_err());
    }
}
