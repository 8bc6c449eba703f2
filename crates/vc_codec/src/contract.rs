//! Custom-type contracts.
//!
//! A type can take over its own encoding by implementing one of the traits
//! below and registering the matching type trait in the engine's
//! [`TypeRegistry`]:
//!
//! | Trait         | Type trait            | Effect                                      |
//! |---------------|-----------------------|---------------------------------------------|
//! | [`Encode`]    | [`TypeTraitEncode`]   | Replaces the encoder.                       |
//! | [`Decode`]    | [`TypeTraitDecode`]   | Replaces the decoder.                       |
//! | [`FieldMap`]  | [`TypeTraitFieldMap`] | Encodes and decodes as a name to value map. |
//! | [`TextCodec`] | [`TypeTraitText`]     | Encodes and decodes as a string literal.    |
//!
//! Contracts are checked in that order, first for the type itself and then,
//! for pointers and optionals, for the type they wrap. Only types without a
//! contract reach the dispatch function.
//!
//! # Examples
//!
//! ```
//! use vc_codec::contract::{TextCodec, TypeTraitText};
//! use vc_codec::{CodecError, Json};
//! use vc_reflect::derive::Reflect;
//! use vc_reflect::registry::TypeRegistry;
//!
//! #[derive(Reflect, Default, Debug, PartialEq)]
//! struct Rgb {
//!     pub r: u8,
//!     pub g: u8,
//!     pub b: u8,
//! }
//!
//! impl TextCodec for Rgb {
//!     fn to_text(&self) -> Result<String, CodecError> {
//!         Ok(format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b))
//!     }
//!
//!     fn from_text(&mut self, text: &str) -> Result<(), CodecError> {
//!         let hex = text.strip_prefix('#').filter(|hex| hex.len() == 6);
//!         let channel = |i: usize| {
//!             hex.and_then(|hex| u8::from_str_radix(&hex[i..i + 2], 16).ok())
//!                 .ok_or_else(|| CodecError::type_error(format!("invalid color {text:?}")))
//!         };
//!         (self.r, self.g, self.b) = (channel(0)?, channel(2)?, channel(4)?);
//!         Ok(())
//!     }
//! }
//!
//! let mut registry = TypeRegistry::new();
//! registry.register_type_trait::<Rgb, TypeTraitText>();
//! let json = Json::with_registry(registry);
//!
//! let colors = vec![Rgb { r: 255, g: 0, b: 16 }];
//! let text = json.to_string(&colors).unwrap();
//! assert_eq!(text, r##"["#ff0010"]"##);
//! assert_eq!(json.from_str::<Vec<Rgb>>(&text).unwrap(), colors);
//! ```

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use vc_reflect::Reflect;
use vc_reflect::info::{Typed, TypeInfo};
use vc_reflect::ops::{ReflectMut, ReflectRef};
use vc_reflect::registry::{FromType, TypeRegistry};
use vc_scan::ScanCode;

use crate::codec::{decoder, encoder};
use crate::text::{begin_value, skip_value, write_quoted};
use crate::{CodecError, DecodeCx, Decoder, ElementId, EncodeCx, Encoder, Renderer, Source};

// -----------------------------------------------------------------------------
// Traits

/// A type that renders itself.
pub trait Encode: Reflect {
    fn encode(&self, cx: &mut EncodeCx<'_>, sink: &mut dyn Renderer) -> Result<(), CodecError>;
}

/// A type that reads itself.
///
/// Called while `src` is positioned on the Begin code of the value.
pub trait Decode: Reflect {
    fn decode(&mut self, cx: &mut DecodeCx<'_>, src: &mut dyn Source) -> Result<(), CodecError>;
}

/// A type whose logical fields differ from its declared ones.
pub trait FieldMap: Reflect {
    /// The fields to encode, in order.
    fn fields(&self) -> Vec<(&str, &dyn Reflect)>;

    /// The field to decode a key into. Unknown keys are skipped.
    fn field_mut(&mut self, name: &str) -> Option<&mut dyn Reflect>;
}

/// A type represented by a string literal.
pub trait TextCodec: Reflect {
    fn to_text(&self) -> Result<String, CodecError>;

    fn from_text(&mut self, text: &str) -> Result<(), CodecError>;
}

// -----------------------------------------------------------------------------
// Type traits

/// Registry entry for [`Encode`].
#[derive(Clone)]
pub struct TypeTraitEncode {
    func: fn(&dyn Reflect, &mut EncodeCx<'_>, &mut dyn Renderer) -> Result<(), CodecError>,
}

fn encode_as<T: Typed + Encode>(
    value: &dyn Reflect,
    cx: &mut EncodeCx<'_>,
    sink: &mut dyn Renderer,
) -> Result<(), CodecError> {
    match value.downcast_ref::<T>() {
        Some(value) => value.encode(cx, sink),
        None => Err(CodecError::invoked_on(T::type_info(), value)),
    }
}

impl<T: Typed + Encode> FromType<T> for TypeTraitEncode {
    fn from_type() -> Self {
        Self {
            func: encode_as::<T>,
        }
    }
}

impl TypeTraitEncode {
    #[inline]
    pub fn encode(
        &self,
        value: &dyn Reflect,
        cx: &mut EncodeCx<'_>,
        sink: &mut dyn Renderer,
    ) -> Result<(), CodecError> {
        (self.func)(value, cx, sink)
    }
}

/// Registry entry for [`Decode`].
#[derive(Clone)]
pub struct TypeTraitDecode {
    func: fn(&mut dyn Reflect, &mut DecodeCx<'_>, &mut dyn Source) -> Result<(), CodecError>,
}

fn decode_as<T: Typed + Decode>(
    value: &mut dyn Reflect,
    cx: &mut DecodeCx<'_>,
    src: &mut dyn Source,
) -> Result<(), CodecError> {
    if !value.is::<T>() {
        return Err(CodecError::invoked_on(T::type_info(), value));
    }
    match value.downcast_mut::<T>() {
        Some(value) => value.decode(cx, src),
        None => Err(CodecError::internal("downcast failed")),
    }
}

impl<T: Typed + Decode> FromType<T> for TypeTraitDecode {
    fn from_type() -> Self {
        Self {
            func: decode_as::<T>,
        }
    }
}

impl TypeTraitDecode {
    #[inline]
    pub fn decode(
        &self,
        value: &mut dyn Reflect,
        cx: &mut DecodeCx<'_>,
        src: &mut dyn Source,
    ) -> Result<(), CodecError> {
        (self.func)(value, cx, src)
    }
}

/// Registry entry for [`FieldMap`].
#[derive(Clone)]
pub struct TypeTraitFieldMap {
    get_fields: for<'a> fn(&'a dyn Reflect) -> Option<Vec<(&'a str, &'a dyn Reflect)>>,
    get_field_mut: for<'a> fn(&'a mut dyn Reflect, &str) -> Option<Option<&'a mut dyn Reflect>>,
}

fn fields_of<T: Typed + FieldMap>(value: &dyn Reflect) -> Option<Vec<(&str, &dyn Reflect)>> {
    value.downcast_ref::<T>().map(T::fields)
}

fn field_mut_of<'a, T: Typed + FieldMap>(
    value: &'a mut dyn Reflect,
    name: &str,
) -> Option<Option<&'a mut dyn Reflect>> {
    value.downcast_mut::<T>().map(|value| value.field_mut(name))
}

impl<T: Typed + FieldMap> FromType<T> for TypeTraitFieldMap {
    fn from_type() -> Self {
        Self {
            get_fields: fields_of::<T>,
            get_field_mut: field_mut_of::<T>,
        }
    }
}

impl TypeTraitFieldMap {
    /// The logical fields, or `None` if `value` is not of the registered type.
    #[inline]
    pub fn fields<'a>(&self, value: &'a dyn Reflect) -> Option<Vec<(&'a str, &'a dyn Reflect)>> {
        (self.get_fields)(value)
    }

    /// The field named `name`, or `None` if `value` is not of the registered type.
    #[inline]
    pub fn field_mut<'a>(
        &self,
        value: &'a mut dyn Reflect,
        name: &str,
    ) -> Option<Option<&'a mut dyn Reflect>> {
        (self.get_field_mut)(value, name)
    }
}

/// Registry entry for [`TextCodec`].
#[derive(Clone)]
pub struct TypeTraitText {
    to_text: fn(&dyn Reflect) -> Option<Result<String, CodecError>>,
    from_text: fn(&mut dyn Reflect, &str) -> Option<Result<(), CodecError>>,
}

fn to_text_of<T: Typed + TextCodec>(value: &dyn Reflect) -> Option<Result<String, CodecError>> {
    value.downcast_ref::<T>().map(T::to_text)
}

fn from_text_of<T: Typed + TextCodec>(
    value: &mut dyn Reflect,
    text: &str,
) -> Option<Result<(), CodecError>> {
    value.downcast_mut::<T>().map(|value| value.from_text(text))
}

impl<T: Typed + TextCodec> FromType<T> for TypeTraitText {
    fn from_type() -> Self {
        Self {
            to_text: to_text_of::<T>,
            from_text: from_text_of::<T>,
        }
    }
}

impl TypeTraitText {
    /// Renders `value`, or returns `None` if it is not of the registered type.
    #[inline]
    pub fn to_text(&self, value: &dyn Reflect) -> Option<Result<String, CodecError>> {
        (self.to_text)(value)
    }

    /// Parses into `value`, or returns `None` if it is not of the registered type.
    #[inline]
    pub fn from_text(&self, value: &mut dyn Reflect, text: &str) -> Option<Result<(), CodecError>> {
        (self.from_text)(value, text)
    }
}

// -----------------------------------------------------------------------------
// Encoders

/// The encoder provided by a contract of `info`'s own type.
pub(crate) fn contract_encoder(registry: &TypeRegistry, info: &'static TypeInfo) -> Option<Encoder> {
    let type_id = info.type_id();
    if let Some(contract) = registry.get_type_trait::<TypeTraitEncode>(type_id) {
        let contract = contract.clone();
        return Some(encoder(move |cx, sink, value| contract.encode(value, cx, sink)));
    }
    if let Some(contract) = registry.get_type_trait::<TypeTraitFieldMap>(type_id) {
        let contract = contract.clone();
        return Some(encoder(move |cx, sink, value| {
            let fields = contract.fields(value).ok_or_else(|| CodecError::invoked_on(info, value))?;
            sink.start_struct()?;
            for (name, field) in fields {
                sink.start_element(ElementId::Name(name))?;
                cx.encode_dyn(sink, field)
                    .map_err(|err| err.within(String::from(name)))?;
                sink.stop_element(ElementId::Name(name))?;
            }
            sink.stop_struct()
        }));
    }
    if let Some(contract) = registry.get_type_trait::<TypeTraitText>(type_id) {
        let contract = contract.clone();
        return Some(encoder(move |_, sink, value| {
            let text = contract.to_text(value).ok_or_else(|| CodecError::invoked_on(info, value))??;
            write_quoted(sink, &text)
        }));
    }
    None
}

/// For pointers and optionals, the contract encoder of the wrapped type.
pub(crate) fn indirect_contract_encoder(
    registry: &TypeRegistry,
    info: &'static TypeInfo,
) -> Option<Encoder> {
    let inner = contract_encoder(registry, info.indirect_info()?)?;
    Some(encoder(move |cx, sink, value| match value.reflect_ref() {
        ReflectRef::Pointer(pointer) => cx.encode(&inner, sink, pointer.pointee()),
        ReflectRef::Optional(optional) => match optional.get() {
            Some(some) => cx.encode(&inner, sink, some),
            None => sink.write_nil(),
        },
        _ => Err(CodecError::invoked_on(info, value)),
    }))
}

// -----------------------------------------------------------------------------
// Decoders

/// The decoder provided by a contract of `info`'s own type.
pub(crate) fn contract_decoder(registry: &TypeRegistry, info: &'static TypeInfo) -> Option<Decoder> {
    let type_id = info.type_id();
    if let Some(contract) = registry.get_type_trait::<TypeTraitDecode>(type_id) {
        let contract = contract.clone();
        return Some(decoder(move |cx, src, value| contract.decode(value, cx, src)));
    }
    if let Some(contract) = registry.get_type_trait::<TypeTraitFieldMap>(type_id) {
        let contract = contract.clone();
        return Some(decoder(move |cx, src, value| {
            if src.at_null() {
                return skip_value(src);
            }
            if !matches!(src.peek(), ScanCode::StructBegin | ScanCode::MapBegin) {
                return Err(CodecError::expected("an object", info, src.peek()));
            }
            loop {
                match src.resume()? {
                    ScanCode::KeyBegin => {}
                    ScanCode::StructEnd | ScanCode::MapEnd => return Ok(()),
                    code => return Err(CodecError::unexpected(code)),
                }
                let key = src.next_value()?;
                let name = key.as_str().unwrap_or_default();
                let field = contract
                    .field_mut(value, name)
                    .ok_or_else(|| CodecError::internal(format!(
                        "codec of `{}` invoked on another type",
                        info.type_path()
                    )))?;
                match field {
                    Some(field) => {
                        begin_value(src)?;
                        cx.decode_dyn(src, field)
                            .map_err(|err| err.within(String::from(name)))?;
                    }
                    None => skip_value(src)?,
                }
            }
        }));
    }
    if let Some(contract) = registry.get_type_trait::<TypeTraitText>(type_id) {
        let contract = contract.clone();
        return Some(decoder(move |_, src, value| {
            if src.peek() != ScanCode::LiteralBegin {
                return Err(CodecError::expected("a string", info, src.peek()));
            }
            let literal = src.next_value()?;
            let text = literal
                .as_str()
                .ok_or_else(|| CodecError::type_error(format!(
                    "expected a string for `{}`, found {literal:?}",
                    info.type_path()
                )))?;
            contract.from_text(value, text).ok_or_else(|| CodecError::invoked_on(info, value))?
        }));
    }
    None
}

/// For pointers and optionals, the contract decoder of the wrapped type.
pub(crate) fn indirect_contract_decoder(
    registry: &TypeRegistry,
    info: &'static TypeInfo,
) -> Option<Decoder> {
    let inner = contract_decoder(registry, info.indirect_info()?)?;
    Some(decoder(move |cx, src, value| match value.reflect_mut() {
        ReflectMut::Pointer(pointer) => cx.decode(&inner, src, pointer.pointee_mut()),
        ReflectMut::Optional(optional) => {
            if src.at_null() {
                optional.set_none();
                skip_value(src)
            } else {
                cx.decode(&inner, src, optional.get_or_insert_default())
            }
        }
        other => Err(CodecError::invoked_on(info, other.into_reflect())),
    }))
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::format;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use vc_reflect::derive::Reflect;

    use super::*;
    use crate::{ErrorClass, Json};

    /// Encoded as `1` or `0`.
    #[derive(Reflect, Default, Debug, PartialEq)]
    struct Switch {
        pub on: bool,
    }

    impl Encode for Switch {
        fn encode(&self, _: &mut EncodeCx<'_>, sink: &mut dyn Renderer) -> Result<(), CodecError> {
            sink.write(if self.on { b"1" } else { b"0" })
        }
    }

    impl Decode for Switch {
        fn decode(&mut self, _: &mut DecodeCx<'_>, src: &mut dyn Source) -> Result<(), CodecError> {
            let value = src.next_value()?;
            self.on = match value.as_i64() {
                Some(0) => false,
                Some(1) => true,
                _ => {
                    return Err(CodecError::type_error(format!(
                        "expected 0 or 1, found {}",
                        value.describe()
                    )));
                }
            };
            Ok(())
        }
    }

    #[derive(Reflect, Default, Debug, PartialEq)]
    struct Person {
        pub first: String,
        pub last: String,
        pub age: u8,
    }

    impl FieldMap for Person {
        fn fields(&self) -> Vec<(&str, &dyn Reflect)> {
            vec![("givenName", &self.first), ("familyName", &self.last), ("age", &self.age)]
        }

        fn field_mut(&mut self, name: &str) -> Option<&mut dyn Reflect> {
            match name {
                "givenName" => Some(&mut self.first),
                "familyName" => Some(&mut self.last),
                "age" => Some(&mut self.age),
                _ => None,
            }
        }
    }

    #[derive(Reflect, Default, Debug, PartialEq)]
    struct Version {
        pub major: u32,
        pub minor: u32,
    }

    impl TextCodec for Version {
        fn to_text(&self) -> Result<String, CodecError> {
            Ok(format!("{}.{}", self.major, self.minor))
        }

        fn from_text(&mut self, text: &str) -> Result<(), CodecError> {
            let parsed = text
                .split_once('.')
                .and_then(|(major, minor)| Some((major.parse().ok()?, minor.parse().ok()?)));
            let Some((major, minor)) = parsed else {
                return Err(CodecError::type_error(format!("invalid version {text:?}")));
            };
            (self.major, self.minor) = (major, minor);
            Ok(())
        }
    }

    #[derive(Reflect, Default, Debug, PartialEq)]
    struct Manifest {
        pub switch: Switch,
        pub author: Person,
        pub version: Version,
        pub previous: Option<Box<Version>>,
        pub history: Vec<Version>,
    }

    fn json() -> Json {
        let mut registry = TypeRegistry::new();
        registry.register_type_trait::<Switch, TypeTraitEncode>();
        registry.register_type_trait::<Switch, TypeTraitDecode>();
        registry.register_type_trait::<Person, TypeTraitFieldMap>();
        registry.register_type_trait::<Version, TypeTraitText>();
        Json::with_registry(registry)
    }

    fn manifest() -> Manifest {
        Manifest {
            switch: Switch { on: true },
            author: Person {
                first: String::from("Grace"),
                last: String::from("Hopper"),
                age: 85,
            },
            version: Version { major: 1, minor: 2 },
            previous: Some(Box::new(Version { major: 1, minor: 1 })),
            history: vec![Version { major: 0, minor: 9 }],
        }
    }

    #[test]
    fn contracts_replace_reflection() {
        let json = json();
        let text = json.to_string(&manifest()).unwrap();
        assert_eq!(
            text,
            concat!(
                r#"{"switch":1,"#,
                r#""author":{"givenName":"Grace","familyName":"Hopper","age":85},"#,
                r#""version":"1.2","previous":"1.1","history":["0.9"]}"#,
            )
        );
        assert_eq!(json.from_str::<Manifest>(&text).unwrap(), manifest());
    }

    #[test]
    fn pointer_contracts_handle_null() {
        let json = json();
        let mut value = manifest();
        json.decode_str_into(r#"{"previous": null}"#, &mut value)
            .unwrap();
        assert_eq!(value.previous, None);

        let text = json.to_string(&value).unwrap();
        assert!(text.contains(r#""previous":null"#), "{text}");

        json.decode_str_into(r#"{"previous": "3.4"}"#, &mut value)
            .unwrap();
        assert_eq!(value.previous, Some(Box::new(Version { major: 3, minor: 4 })));
    }

    #[test]
    fn field_maps_skip_unknown_keys() {
        let json = json();
        let person: Person = json
            .from_str(r#"{"first": "x", "familyName": "Lovelace", "age": 36}"#)
            .unwrap();
        assert_eq!(person.first, "");
        assert_eq!(person.last, "Lovelace");
        assert_eq!(person.age, 36);
    }

    #[test]
    fn contract_errors_carry_paths() {
        let json = json();

        let err = json
            .from_str::<Manifest>(r#"{"author": {"age": 999}}"#)
            .unwrap_err();
        assert_eq!(err.class(), ErrorClass::Type);
        // Field map names are dynamic, so they render as keys.
        assert!(err.to_string().starts_with(r#"type error at author["age"]: "#), "{err}");

        let err = json
            .from_str::<Manifest>(r#"{"history": ["1.0", "one"]}"#)
            .unwrap_err();
        assert_eq!(err.to_string(), r#"type error at history[1]: invalid version "one""#);

        let err = json.from_str::<Manifest>(r#"{"switch": 2}"#).unwrap_err();
        assert_eq!(err.to_string(), "type error at switch: expected 0 or 1, found integer");

        let err = json.from_str::<Manifest>(r#"{"version": 12}"#).unwrap_err();
        assert_eq!(err.class(), ErrorClass::Type);
    }

    #[test]
    fn unregistered_types_use_reflection() {
        let json = Json::new();
        let text = json.to_string(&Version { major: 2, minor: 0 }).unwrap();
        assert_eq!(text, r#"{"major":2,"minor":0}"#);
    }
}
