use crate::{CodecError, Renderer};

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Passes `text` to `write` in chunks, with JSON backslash escapes applied.
///
/// Quotes, backslashes and control characters are escaped. Everything else,
/// non-ASCII included, is passed through.
pub fn write_escaped<E>(
    text: &str,
    mut write: impl FnMut(&[u8]) -> Result<(), E>,
) -> Result<(), E> {
    let bytes = text.as_bytes();
    let mut unicode = *b"\\u0000";
    let mut start = 0;

    for (index, &byte) in bytes.iter().enumerate() {
        let escape: &[u8] = match byte {
            b'"' => b"\\\"",
            b'\\' => b"\\\\",
            b'\n' => b"\\n",
            b'\r' => b"\\r",
            b'\t' => b"\\t",
            0x08 => b"\\b",
            0x0c => b"\\f",
            0x00..=0x1f => {
                unicode[4] = HEX[usize::from(byte >> 4)];
                unicode[5] = HEX[usize::from(byte & 0xf)];
                &unicode
            }
            _ => continue,
        };
        if start < index {
            write(&bytes[start..index])?;
        }
        write(escape)?;
        start = index + 1;
    }

    if start < bytes.len() {
        write(&bytes[start..])?;
    }
    Ok(())
}

/// Writes `text` as a quoted, escaped string literal.
pub fn write_quoted(sink: &mut dyn Renderer, text: &str) -> Result<(), CodecError> {
    sink.write(b"\"")?;
    write_escaped(text, |chunk| sink.write(chunk))?;
    sink.write(b"\"")
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::string::String;
    use alloc::vec::Vec;
    use core::convert::Infallible;

    use super::write_escaped;

    fn escaped(text: &str) -> (String, usize) {
        let mut out = Vec::new();
        let mut chunks = 0;
        write_escaped(text, |chunk| {
            chunks += 1;
            out.extend_from_slice(chunk);
            Ok::<_, Infallible>(())
        })
        .unwrap();
        (String::from_utf8(out).unwrap(), chunks)
    }

    #[test]
    fn escapes() {
        assert_eq!(escaped("plain text").0, "plain text");
        assert_eq!(escaped("plain text").1, 1);
        assert_eq!(escaped("").1, 0);
        assert_eq!(escaped("a\"b\\c").0, r#"a\"b\\c"#);
        assert_eq!(escaped("\n\r\t\u{8}\u{c}").0, r"\n\r\t\b\f");
        assert_eq!(escaped("\u{0}\u{1f}").0, r"\u0000\u001f");
        assert_eq!(escaped("héllo ☃ \u{1F600}").0, "héllo ☃ \u{1F600}");
    }

    #[test]
    fn output_is_valid_json() {
        let text = "tab\there \"quoted\" \u{7} back\\slash é";
        let (out, _) = escaped(text);
        let parsed: String = serde_json::from_str(&format!("\"{out}\"")).unwrap();
        assert_eq!(parsed, text);
    }
}
