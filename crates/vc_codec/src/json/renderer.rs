use alloc::string::String;
use alloc::vec::Vec;
use std::io;

use crate::text::write_escaped;
use crate::{CodecError, ElementId, Renderer};

/// A [`Renderer`] producing JSON text.
///
/// Output is compact unless an indent is configured, in which case every
/// element goes on its own line.
///
/// ```
/// use vc_codec::{ElementId, JsonRenderer, Renderer};
///
/// let mut out = JsonRenderer::with_indent(Vec::new(), "  ");
/// out.start_map().unwrap();
/// out.start_element(ElementId::Name("a")).unwrap();
/// out.write(b"1").unwrap();
/// out.stop_element(ElementId::Name("a")).unwrap();
/// out.stop_map().unwrap();
///
/// assert_eq!(out.into_inner(), b"{\n  \"a\": 1\n}");
/// ```
#[derive(Debug)]
pub struct JsonRenderer<W> {
    writer: W,
    indent: Option<String>,
    /// Elements written so far, per open container.
    frames: Vec<usize>,
}

impl<W: io::Write> JsonRenderer<W> {
    /// A compact renderer.
    #[inline]
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            indent: None,
            frames: Vec::new(),
        }
    }

    /// An indented renderer using `indent` once per nesting level.
    #[inline]
    pub fn with_indent(writer: W, indent: impl Into<String>) -> Self {
        Self {
            indent: Some(indent.into()),
            ..Self::new(writer)
        }
    }

    #[inline]
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    #[inline]
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Flushes the underlying writer.
    pub fn flush(&mut self) -> Result<(), CodecError> {
        Ok(self.writer.flush()?)
    }

    #[inline]
    fn put(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        Ok(self.writer.write_all(bytes)?)
    }

    fn newline(&mut self) -> Result<(), CodecError> {
        if let Some(indent) = &self.indent {
            self.writer.write_all(b"\n")?;
            for _ in 0..self.frames.len() {
                self.writer.write_all(indent.as_bytes())?;
            }
        }
        Ok(())
    }

    fn open(&mut self, token: &[u8]) -> Result<(), CodecError> {
        self.put(token)?;
        self.frames.push(0);
        Ok(())
    }

    fn close(&mut self, token: &[u8]) -> Result<(), CodecError> {
        match self.frames.pop() {
            Some(0) => {}
            Some(_) => self.newline()?,
            None => return Err(CodecError::internal("unbalanced container close")),
        }
        self.put(token)
    }
}

impl<W: io::Write> Renderer for JsonRenderer<W> {
    #[inline]
    fn write(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        self.put(bytes)
    }

    #[inline]
    fn write_nil(&mut self) -> Result<(), CodecError> {
        self.put(b"null")
    }

    fn start_struct(&mut self) -> Result<(), CodecError> {
        self.open(b"{")
    }

    fn stop_struct(&mut self) -> Result<(), CodecError> {
        self.close(b"}")
    }

    fn start_map(&mut self) -> Result<(), CodecError> {
        self.open(b"{")
    }

    fn stop_map(&mut self) -> Result<(), CodecError> {
        self.close(b"}")
    }

    fn start_array(&mut self) -> Result<(), CodecError> {
        self.open(b"[")
    }

    fn stop_array(&mut self) -> Result<(), CodecError> {
        self.close(b"]")
    }

    fn start_element(&mut self, id: ElementId<'_>) -> Result<(), CodecError> {
        let Some(count) = self.frames.last_mut() else {
            return Err(CodecError::internal("element outside of a container"));
        };
        *count += 1;
        if *count > 1 {
            self.writer.write_all(b",")?;
        }
        self.newline()?;

        if let ElementId::Name(name) = id {
            let colon: &[u8] = if self.indent.is_some() { b"\": " } else { b"\":" };
            self.put(b"\"")?;
            write_escaped(name, |chunk| self.writer.write_all(chunk))?;
            self.put(colon)?;
        }
        Ok(())
    }

    #[inline]
    fn stop_element(&mut self, _: ElementId<'_>) -> Result<(), CodecError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;
    use std::io;

    use super::JsonRenderer;
    use crate::{ElementId, ErrorClass, Renderer};

    fn text(out: JsonRenderer<Vec<u8>>) -> String {
        String::from_utf8(out.into_inner()).unwrap()
    }

    #[test]
    fn nested_pretty_output() {
        let mut out = JsonRenderer::with_indent(Vec::new(), "  ");
        out.start_struct().unwrap();
        out.start_element(ElementId::Name("list")).unwrap();
        out.start_array().unwrap();
        for i in 0..2 {
            out.start_element(ElementId::Index(i)).unwrap();
            out.write(if i == 0 { b"1" } else { b"2" }).unwrap();
            out.stop_element(ElementId::Index(i)).unwrap();
        }
        out.stop_array().unwrap();
        out.stop_element(ElementId::Name("list")).unwrap();
        out.start_element(ElementId::Name("empty")).unwrap();
        out.start_map().unwrap();
        out.stop_map().unwrap();
        out.stop_element(ElementId::Name("empty")).unwrap();
        out.stop_struct().unwrap();

        assert_eq!(text(out), "{\n  \"list\": [\n    1,\n    2\n  ],\n  \"empty\": {}\n}");
    }

    #[test]
    fn names_are_escaped() {
        let mut out = JsonRenderer::new(Vec::new());
        out.start_map().unwrap();
        out.start_element(ElementId::Name("a\"b")).unwrap();
        out.write_nil().unwrap();
        out.stop_map().unwrap();
        assert_eq!(text(out), r#"{"a\"b":null}"#);
    }

    #[test]
    fn misuse_is_an_internal_error() {
        let mut out = JsonRenderer::new(Vec::new());
        assert_eq!(
            out.start_element(ElementId::Index(0)).unwrap_err().class(),
            ErrorClass::Internal
        );
        assert_eq!(out.stop_array().unwrap_err().class(), ErrorClass::Internal);
    }

    struct Broken;

    impl io::Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writer_failures_are_resource_errors() {
        let mut out = JsonRenderer::new(Broken);
        let err = out.start_array().unwrap_err();
        assert_eq!(err.class(), ErrorClass::Resource);
        assert!(err.message().contains("disk full"));
    }
}
