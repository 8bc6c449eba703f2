use alloc::format;
use alloc::sync::Arc;

use vc_reflect::Reflect;
use vc_reflect::info::TypeInfo;
use vc_reflect::registry::TypeRegistry;
use vc_scan::ScanCode;

use crate::cache::{Codec, CodecCache, Gate};
use crate::codec::{DecodeDispatch, decoder};
use crate::contract::{contract_decoder, indirect_contract_decoder};
use crate::{CodecError, DecodeCx, Decoder, Source};

impl Codec for Decoder {
    fn stub(info: &'static TypeInfo, gate: Arc<Gate>) -> Self {
        decoder(move |cx, src, value| {
            gate.wait(info)?;
            let real = cx.unmarshaller().find_decoder(info);
            cx.decode(&real, src, value)
        })
    }

    fn failing(err: CodecError) -> Self {
        decoder(move |_, _, _| Err(err.clone()))
    }
}

/// The decode half of the codec engine.
///
/// Mirrors [`Marshaller`](crate::Marshaller): decoders are built from
/// registered contracts or the dispatch function and cached per type.
///
/// # Examples
///
/// ```
/// use vc_codec::{Unmarshaller, text};
/// use vc_scan::Scanner;
///
/// let unmarshaller = Unmarshaller::new(text::decode_dispatch);
/// let mut target: Vec<i64> = Vec::new();
/// unmarshaller
///     .unmarshal(&mut Scanner::from_text("[1, -2, 3]"), &mut target)
///     .unwrap();
///
/// assert_eq!(target, [1, -2, 3]);
/// ```
pub struct Unmarshaller {
    cache: CodecCache<Decoder>,
    dispatch: DecodeDispatch,
    registry: TypeRegistry,
}

impl Unmarshaller {
    /// Creates an unmarshaller with an empty registry.
    pub fn new(
        dispatch: impl Fn(&Unmarshaller, &'static TypeInfo) -> Result<Decoder, CodecError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            cache: CodecCache::new(),
            dispatch: Arc::new(dispatch),
            registry: TypeRegistry::empty(),
        }
    }

    /// Replaces the registry consulted for custom-type contracts.
    ///
    /// Types already cached keep their decoders.
    #[must_use]
    pub fn with_registry(mut self, registry: TypeRegistry) -> Self {
        self.registry = registry;
        self
    }

    #[inline]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Returns the decoder of `info`, building it on first use.
    pub fn find_decoder(&self, info: &'static TypeInfo) -> Decoder {
        self.cache.get_or_build(info, || self.build(info))
    }

    fn build(&self, info: &'static TypeInfo) -> Result<Decoder, CodecError> {
        if let Some(decoder) = contract_decoder(&self.registry, info) {
            return Ok(decoder);
        }
        if let Some(decoder) = indirect_contract_decoder(&self.registry, info) {
            return Ok(decoder);
        }
        (self.dispatch)(self, info)
    }

    /// Decodes one top-level value from `src` into `target`.
    ///
    /// The source must hold exactly one value. On error `target` may be
    /// partially filled; the error is passed to [`Source::report`].
    pub fn unmarshal(&self, src: &mut dyn Source, target: &mut dyn Reflect) -> Result<(), CodecError> {
        self.unmarshal_inner(src, target)
            .inspect_err(|err| src.report(err))
    }

    fn unmarshal_inner(
        &self,
        src: &mut dyn Source,
        target: &mut dyn Reflect,
    ) -> Result<(), CodecError> {
        match src.resume()? {
            code if code.is_begin() => {}
            ScanCode::ToEnd => return Err(CodecError::structural("unexpected end of input")),
            code => return Err(CodecError::structural(format!("unexpected {code}"))),
        }

        let decoder = self.find_decoder(target.reflect_type_info());
        let mut cx = DecodeCx::new(self);
        cx.decode(&decoder, src, target)?;

        match src.resume()? {
            ScanCode::ToEnd => Ok(()),
            code => Err(CodecError::structural(format!(
                "unexpected {code} after the top-level value"
            ))),
        }
    }

    /// Number of types in the cache.
    #[inline]
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// The error a cached failing decoder of `info` reports.
    ///
    /// `None` if the decoder was built, is still being built, or was never
    /// requested.
    pub fn cached_failure(&self, info: &TypeInfo) -> Option<CodecError> {
        self.cache.failure(info)
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec::Vec;

    use vc_reflect::derive::Reflect;
    use vc_reflect::info::TypeInfo;
    use vc_scan::Scanner;

    use crate::codec::decoder;
    use crate::{CodecError, ErrorClass, Unmarshaller, text};

    #[derive(Reflect, Default, Debug, PartialEq)]
    struct Tree {
        pub label: String,
        pub children: Vec<Tree>,
        pub parent: Option<Box<Tree>>,
    }

    fn decode<T: vc_reflect::Reflect + Default>(
        unmarshaller: &Unmarshaller,
        text: &str,
    ) -> Result<T, CodecError> {
        let mut target = T::default();
        unmarshaller.unmarshal(&mut Scanner::from_text(text), &mut target)?;
        Ok(target)
    }

    #[test]
    fn recursive_types_decode() {
        let unmarshaller = Unmarshaller::new(text::decode_dispatch);
        let tree: Tree = decode(
            &unmarshaller,
            r#"{"label": "root", "children": [{"label": "leaf", "children": []}], "parent": null}"#,
        )
        .unwrap();

        assert_eq!(tree.label, "root");
        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].label, "leaf");
        assert!(tree.parent.is_none());
    }

    #[test]
    fn top_level_must_be_one_value() {
        let unmarshaller = Unmarshaller::new(text::decode_dispatch);

        let err = decode::<Vec<u8>>(&unmarshaller, "").unwrap_err();
        assert_eq!(err.class(), ErrorClass::Structural);

        let err = decode::<Vec<u8>>(&unmarshaller, "[1] [2]").unwrap_err();
        assert_eq!(err.class(), ErrorClass::Lexical);

        let err = decode::<Vec<u8>>(&unmarshaller, "[1").unwrap_err();
        assert_eq!(err.class(), ErrorClass::Lexical);
    }

    #[test]
    fn custom_decoder_function() {
        let unmarshaller = Unmarshaller::new(|u: &Unmarshaller, info: &'static TypeInfo| {
            if info.is::<u32>() {
                return Ok(decoder(|_, src, value| {
                    let text = src.next_string()?;
                    let parsed = u32::from_str_radix(text.trim_matches('"'), 16)
                        .map_err(|err| CodecError::type_error(format!("{err}")))?;
                    if let Some(slot) = value.downcast_mut::<u32>() {
                        *slot = parsed;
                    }
                    Ok(())
                }));
            }
            text::decode_dispatch(u, info)
        });

        let values: Vec<u32> = decode(&unmarshaller, r#"["ff", "10"]"#).unwrap();
        assert_eq!(values, [255, 16]);
    }
}
