use crate::CodecError;

/// Identifies the element that is about to be written inside a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementId<'a> {
    /// A position in an array.
    Index(usize),
    /// A field of a struct or a key of a map.
    Name(&'a str),
}

/// The encode-side sink.
///
/// Encoders call the `start_*` and `stop_*` hooks in balanced pairs, and
/// surround every container element with [`start_element`] and
/// [`stop_element`]. Literals arrive already rendered through [`write`].
///
/// [`start_element`]: Renderer::start_element
/// [`stop_element`]: Renderer::stop_element
/// [`write`]: Renderer::write
pub trait Renderer {
    /// Writes rendered literal text.
    fn write(&mut self, bytes: &[u8]) -> Result<(), CodecError>;

    /// Writes the absence of a value.
    fn write_nil(&mut self) -> Result<(), CodecError>;

    fn start_struct(&mut self) -> Result<(), CodecError>;

    fn stop_struct(&mut self) -> Result<(), CodecError>;

    fn start_map(&mut self) -> Result<(), CodecError>;

    fn stop_map(&mut self) -> Result<(), CodecError>;

    fn start_array(&mut self) -> Result<(), CodecError>;

    fn stop_array(&mut self) -> Result<(), CodecError>;

    fn start_element(&mut self, id: ElementId<'_>) -> Result<(), CodecError>;

    fn stop_element(&mut self, id: ElementId<'_>) -> Result<(), CodecError>;

    /// Called once with the error that aborted a top-level marshal.
    fn report(&mut self, err: &CodecError) {
        log::debug!("marshal failed: {err}");
    }
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    #[inline]
    fn write(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        (**self).write(bytes)
    }

    #[inline]
    fn write_nil(&mut self) -> Result<(), CodecError> {
        (**self).write_nil()
    }

    #[inline]
    fn start_struct(&mut self) -> Result<(), CodecError> {
        (**self).start_struct()
    }

    #[inline]
    fn stop_struct(&mut self) -> Result<(), CodecError> {
        (**self).stop_struct()
    }

    #[inline]
    fn start_map(&mut self) -> Result<(), CodecError> {
        (**self).start_map()
    }

    #[inline]
    fn stop_map(&mut self) -> Result<(), CodecError> {
        (**self).stop_map()
    }

    #[inline]
    fn start_array(&mut self) -> Result<(), CodecError> {
        (**self).start_array()
    }

    #[inline]
    fn stop_array(&mut self) -> Result<(), CodecError> {
        (**self).stop_array()
    }

    #[inline]
    fn start_element(&mut self, id: ElementId<'_>) -> Result<(), CodecError> {
        (**self).start_element(id)
    }

    #[inline]
    fn stop_element(&mut self, id: ElementId<'_>) -> Result<(), CodecError> {
        (**self).stop_element(id)
    }

    #[inline]
    fn report(&mut self, err: &CodecError) {
        (**self).report(err);
    }
}
