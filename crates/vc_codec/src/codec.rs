//! Encoder and decoder function types and the contexts they run in.

use alloc::sync::Arc;

use vc_reflect::Reflect;
use vc_reflect::info::TypeInfo;

use crate::{CodecError, Marshaller, Renderer, Scratch, Source, Unmarshaller};

// -----------------------------------------------------------------------------
// Function types

/// Converts a value of one specific type into renderer events.
pub type Encoder = Arc<
    dyn Fn(&mut EncodeCx<'_>, &mut dyn Renderer, &dyn Reflect) -> Result<(), CodecError>
        + Send
        + Sync,
>;

/// Fills a value of one specific type from a source.
pub type Decoder = Arc<
    dyn Fn(&mut DecodeCx<'_>, &mut dyn Source, &mut dyn Reflect) -> Result<(), CodecError>
        + Send
        + Sync,
>;

/// Builds the encoder of a type on a cache miss.
///
/// The function must not block indefinitely: every thread that invokes the
/// type's codec while it is being built waits for it.
pub type EncodeDispatch =
    Arc<dyn Fn(&Marshaller, &'static TypeInfo) -> Result<Encoder, CodecError> + Send + Sync>;

/// Builds the decoder of a type on a cache miss.
///
/// See [`EncodeDispatch`] for the blocking precondition.
pub type DecodeDispatch =
    Arc<dyn Fn(&Unmarshaller, &'static TypeInfo) -> Result<Decoder, CodecError> + Send + Sync>;

/// Wraps a closure as an [`Encoder`].
#[inline]
pub fn encoder(
    f: impl Fn(&mut EncodeCx<'_>, &mut dyn Renderer, &dyn Reflect) -> Result<(), CodecError>
    + Send
    + Sync
    + 'static,
) -> Encoder {
    Arc::new(f)
}

/// Wraps a closure as a [`Decoder`].
#[inline]
pub fn decoder(
    f: impl Fn(&mut DecodeCx<'_>, &mut dyn Source, &mut dyn Reflect) -> Result<(), CodecError>
    + Send
    + Sync
    + 'static,
) -> Decoder {
    Arc::new(f)
}

// -----------------------------------------------------------------------------
// EncodeCx

/// State shared by the encoders of one marshal call.
pub struct EncodeCx<'a> {
    pub scratch: Scratch,
    marshaller: &'a Marshaller,
}

impl<'a> EncodeCx<'a> {
    #[inline]
    pub fn new(marshaller: &'a Marshaller) -> Self {
        Self {
            scratch: Scratch::new(),
            marshaller,
        }
    }

    /// The engine running this call.
    #[inline]
    pub fn marshaller(&self) -> &'a Marshaller {
        self.marshaller
    }

    /// Invokes `encoder` on `value`.
    #[inline]
    pub fn encode(
        &mut self,
        encoder: &Encoder,
        sink: &mut dyn Renderer,
        value: &dyn Reflect,
    ) -> Result<(), CodecError> {
        #[cfg(feature = "debug")]
        log::trace!("encode `{}`", value.type_path());
        encoder(self, sink, value)
    }

    /// Looks up the encoder of the value's own type and invokes it.
    pub fn encode_dyn(
        &mut self,
        sink: &mut dyn Renderer,
        value: &dyn Reflect,
    ) -> Result<(), CodecError> {
        let encoder = self.marshaller.find_encoder(value.reflect_type_info());
        self.encode(&encoder, sink, value)
    }
}

// -----------------------------------------------------------------------------
// DecodeCx

/// State shared by the decoders of one unmarshal call.
pub struct DecodeCx<'a> {
    pub scratch: Scratch,
    unmarshaller: &'a Unmarshaller,
}

impl<'a> DecodeCx<'a> {
    #[inline]
    pub fn new(unmarshaller: &'a Unmarshaller) -> Self {
        Self {
            scratch: Scratch::new(),
            unmarshaller,
        }
    }

    /// The engine running this call.
    #[inline]
    pub fn unmarshaller(&self) -> &'a Unmarshaller {
        self.unmarshaller
    }

    /// Invokes `decoder` on `value`.
    #[inline]
    pub fn decode(
        &mut self,
        decoder: &Decoder,
        src: &mut dyn Source,
        value: &mut dyn Reflect,
    ) -> Result<(), CodecError> {
        #[cfg(feature = "debug")]
        log::trace!("decode `{}`", value.type_path());
        decoder(self, src, value)
    }

    /// Looks up the decoder of the value's own type and invokes it.
    pub fn decode_dyn(
        &mut self,
        src: &mut dyn Source,
        value: &mut dyn Reflect,
    ) -> Result<(), CodecError> {
        let decoder = self.unmarshaller.find_decoder(value.reflect_type_info());
        self.decode(&decoder, src, value)
    }
}
