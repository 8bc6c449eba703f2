//! JSON on top of the text dispatch functions.

// -----------------------------------------------------------------------------
// Modules

mod renderer;

// -----------------------------------------------------------------------------
// Exports

pub use renderer::JsonRenderer;

// -----------------------------------------------------------------------------
// Json

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use std::io;

use vc_reflect::Reflect;
use vc_reflect::info::Typed;
use vc_reflect::registry::TypeRegistry;
use vc_scan::reader::StrReader;
use vc_scan::{ScanConfig, Scanner};

use crate::{CodecError, Marshaller, Unmarshaller, text};

/// A marshaller and unmarshaller pair for JSON.
///
/// Both halves cache codecs, so one `Json` should be reused for many calls.
/// It can be shared between threads.
///
/// # Examples
///
/// ```
/// use vc_codec::Json;
/// use vc_reflect::derive::Reflect;
///
/// #[derive(Reflect, Default, Debug, PartialEq)]
/// struct Config {
///     pub name: String,
///     pub retries: Option<u8>,
///     pub tags: Vec<String>,
/// }
///
/// let json = Json::new();
/// let config: Config = json.from_str(r#"{"name": "api", "tags": ["a", "b"]}"#).unwrap();
/// assert_eq!(config.retries, None);
///
/// let text = json.to_string(&config).unwrap();
/// assert_eq!(text, r#"{"name":"api","retries":null,"tags":["a","b"]}"#);
/// ```
pub struct Json {
    marshaller: Marshaller,
    unmarshaller: Unmarshaller,
    config: ScanConfig,
}

impl Json {
    pub const PRETTY_INDENT: &'static str = "  ";

    /// A JSON engine without custom-type contracts.
    #[inline]
    pub fn new() -> Self {
        Self::with_registry(TypeRegistry::empty())
    }

    /// A JSON engine honoring the contracts registered in `registry`.
    pub fn with_registry(registry: TypeRegistry) -> Self {
        Self {
            marshaller: Marshaller::new(text::encode_dispatch).with_registry(registry.clone()),
            unmarshaller: Unmarshaller::new(text::decode_dispatch).with_registry(registry),
            config: ScanConfig::default(),
        }
    }

    /// Replaces the configuration used to scan input.
    #[must_use]
    pub fn with_config(mut self, config: ScanConfig) -> Self {
        self.config = config;
        self
    }

    #[inline]
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    #[inline]
    pub fn marshaller(&self) -> &Marshaller {
        &self.marshaller
    }

    #[inline]
    pub fn unmarshaller(&self) -> &Unmarshaller {
        &self.unmarshaller
    }

    /// Writes `value` as compact JSON.
    pub fn to_writer<W: io::Write>(&self, writer: W, value: &dyn Reflect) -> Result<(), CodecError> {
        let mut out = JsonRenderer::new(writer);
        self.marshaller.marshal(&mut out, value)?;
        out.flush()
    }

    pub fn to_vec(&self, value: &dyn Reflect) -> Result<Vec<u8>, CodecError> {
        let mut out = JsonRenderer::new(Vec::new());
        self.marshaller.marshal(&mut out, value)?;
        Ok(out.into_inner())
    }

    pub fn to_string(&self, value: &dyn Reflect) -> Result<String, CodecError> {
        into_string(self.to_vec(value)?)
    }

    /// Renders `value` with [`PRETTY_INDENT`](Self::PRETTY_INDENT) per level.
    pub fn to_string_pretty(&self, value: &dyn Reflect) -> Result<String, CodecError> {
        let mut out = JsonRenderer::with_indent(Vec::new(), Self::PRETTY_INDENT);
        self.marshaller.marshal(&mut out, value)?;
        into_string(out.into_inner())
    }

    /// Decodes a new `T` from `text`.
    pub fn from_str<T: Typed + Default>(&self, text: &str) -> Result<T, CodecError> {
        let mut value = T::default();
        self.decode_str_into(text, &mut value)?;
        Ok(value)
    }

    /// Decodes a new `T` from UTF-8 bytes read from `reader`.
    pub fn from_reader<T: Typed + Default, R: io::Read>(&self, reader: R) -> Result<T, CodecError> {
        let mut value = T::default();
        self.decode_reader_into(reader, &mut value)?;
        Ok(value)
    }

    /// Decodes `text` into an existing value.
    ///
    /// Fields absent from the input keep their current values.
    pub fn decode_str_into(&self, text: &str, target: &mut dyn Reflect) -> Result<(), CodecError> {
        let mut scanner = Scanner::with_config(StrReader::new(text), self.config);
        self.unmarshaller.unmarshal(&mut scanner, target)
    }

    /// Decodes UTF-8 bytes read from `reader` into an existing value.
    pub fn decode_reader_into<R: io::Read>(
        &self,
        reader: R,
        target: &mut dyn Reflect,
    ) -> Result<(), CodecError> {
        let mut scanner = Scanner::from_reader(reader, self.config);
        self.unmarshaller.unmarshal(&mut scanner, target)
    }
}

impl Default for Json {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

fn into_string(bytes: Vec<u8>) -> Result<String, CodecError> {
    String::from_utf8(bytes).map_err(|err| CodecError::internal(err.to_string()))
}
