use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use vc_reflect::info::TypeInfo;
use vc_reflect::ops::{List, ReflectMut, ScalarRef};
use vc_reflect::Value;
use vc_scan::ScanCode;

use super::{begin_value, skip_value};
use crate::codec::decoder;
use crate::{CodecError, DecodeCx, Decoder, FieldSet, RawText, Source, Unmarshaller};

/// Builds the text decoder of `info`.
///
/// Supports the same types as [`encode_dispatch`](super::encode_dispatch).
pub fn decode_dispatch(u: &Unmarshaller, info: &'static TypeInfo) -> Result<Decoder, CodecError> {
    match info {
        TypeInfo::Scalar(_) => Ok(decoder(move |_, src, value| {
            let ReflectMut::Scalar(scalar) = value.reflect_mut() else {
                return Err(CodecError::invoked_on(info, value));
            };
            if src.peek() != ScanCode::LiteralBegin {
                return Err(CodecError::expected("a literal", info, src.peek()));
            }
            let literal = src.next_value()?;
            let scalar_ref = match &literal {
                Value::Bool(flag) => ScalarRef::Bool(*flag),
                Value::Int(int) => ScalarRef::Int(*int),
                Value::Uint(uint) => ScalarRef::Uint(*uint),
                Value::Float(float) => ScalarRef::Float(*float),
                Value::String(text) => ScalarRef::Str(text),
                _ => {
                    return Err(CodecError::type_error(format!(
                        "cannot decode null into `{}`",
                        info.type_path()
                    )));
                }
            };
            Ok(scalar.set_scalar(scalar_ref)?)
        })),
        TypeInfo::Opaque(_) if info.is::<RawText>() => Ok(decoder(move |_, src, value| {
            let text = src.next_string()?;
            match value.downcast_mut::<RawText>() {
                Some(raw) => {
                    raw.0 = text;
                    Ok(())
                }
                None => Err(CodecError::invoked_on(info, value)),
            }
        })),
        TypeInfo::Opaque(_) if info.is::<()>() => Ok(decoder(move |_, src, _| {
            if src.at_null() {
                skip_value(src)
            } else {
                Err(CodecError::expected("null", info, src.peek()))
            }
        })),
        TypeInfo::Opaque(_) => Err(CodecError::type_error(format!(
            "unsupported type `{}`",
            info.type_path()
        ))),
        TypeInfo::Pointer(pointer) => {
            let inner = u.find_decoder(pointer.pointee_info());
            Ok(decoder(move |cx, src, value| match value.reflect_mut() {
                ReflectMut::Pointer(pointer) => cx.decode(&inner, src, pointer.pointee_mut()),
                other => Err(CodecError::invoked_on(info, other.into_reflect())),
            }))
        }
        TypeInfo::Optional(optional) => {
            let inner = u.find_decoder(optional.some_info());
            Ok(decoder(move |cx, src, value| match value.reflect_mut() {
                ReflectMut::Optional(optional) if src.at_null() => {
                    optional.set_none();
                    skip_value(src)
                }
                ReflectMut::Optional(optional) => {
                    cx.decode(&inner, src, optional.get_or_insert_default())
                }
                other => Err(CodecError::invoked_on(info, other.into_reflect())),
            }))
        }
        TypeInfo::Dynamic(_) => Ok(decoder(move |_, src, value| match value.reflect_mut() {
            ReflectMut::Dynamic(dynamic) => {
                *dynamic = src.next_value()?;
                Ok(())
            }
            other => Err(CodecError::invoked_on(info, other.into_reflect())),
        })),
        TypeInfo::List(list) => {
            let bytes = list.item_info().is::<u8>();
            let inner = u.find_decoder(list.item_info());
            Ok(decoder(move |cx, src, value| {
                let ReflectMut::List(list) = value.reflect_mut() else {
                    return Err(CodecError::invoked_on(info, value));
                };
                if src.at_null() {
                    list.clear();
                    return skip_value(src);
                }
                if bytes && src.peek() == ScanCode::LiteralBegin {
                    return decode_bytes(src, list, info);
                }
                decode_list(cx, src, list, &inner, info)
            }))
        }
        TypeInfo::Array(array) => {
            let inner = u.find_decoder(array.item_info());
            Ok(decoder(move |cx, src, value| {
                let ReflectMut::Array(array) = value.reflect_mut() else {
                    return Err(CodecError::invoked_on(info, value));
                };
                if src.peek() != ScanCode::ArrayBegin {
                    return Err(CodecError::expected("an array", info, src.peek()));
                }
                let mut index = 0;
                loop {
                    match src.resume()? {
                        ScanCode::ArrayEnd => return Ok(()),
                        code if code.is_begin() => {}
                        code => return Err(CodecError::unexpected(code)),
                    }
                    // Elements past the end are discarded.
                    match array.get_mut(index) {
                        Some(item) => cx
                            .decode(&inner, src, item)
                            .map_err(|err| err.within(index))?,
                        None => skip_value(src)?,
                    }
                    index += 1;
                }
            }))
        }
        TypeInfo::Map(map) => {
            let key_info = map.key_info();
            if !key_info.is::<String>() {
                return Err(CodecError::type_error(format!(
                    "unsupported map key type `{}` in `{}`, keys must be `String`",
                    key_info.type_path(),
                    info.type_path()
                )));
            }
            let inner = u.find_decoder(map.value_info());
            Ok(decoder(move |cx, src, value| {
                let ReflectMut::Map(map) = value.reflect_mut() else {
                    return Err(CodecError::invoked_on(info, value));
                };
                if src.at_null() {
                    map.clear();
                    return skip_value(src);
                }
                expect_object(src, info)?;
                while let Some(key) = next_key(src)? {
                    begin_value(src)?;
                    let Some(item) = map.get_or_insert_default(&key) else {
                        return Err(CodecError::internal(format!(
                            "map `{}` refused key {key:?}",
                            info.type_path()
                        )));
                    };
                    cx.decode(&inner, src, item)
                        .map_err(|err| err.within(key))?;
                }
                Ok(())
            }))
        }
        TypeInfo::Struct(structure) => {
            let fields = FieldSet::resolve(structure);
            let decoders: Vec<Decoder> = fields
                .iter()
                .map(|field| u.find_decoder(field.type_info()))
                .collect();
            Ok(decoder(move |cx, src, value| {
                if src.at_null() {
                    return skip_value(src);
                }
                expect_object(src, info)?;
                while let Some(key) = next_key(src)? {
                    let Some(index) = fields.position(&key) else {
                        skip_value(src)?;
                        continue;
                    };
                    let field = &fields[index];
                    begin_value(src)?;
                    let Some(item) = field.get_mut(value) else {
                        return Err(CodecError::invoked_on(info, value));
                    };
                    cx.decode(&decoders[index], src, item)
                        .map_err(|err| err.within(field.name()))?;
                }
                Ok(())
            }))
        }
    }
}

fn expect_object(src: &dyn Source, info: &'static TypeInfo) -> Result<(), CodecError> {
    match src.peek() {
        ScanCode::StructBegin | ScanCode::MapBegin => Ok(()),
        found => Err(CodecError::expected("an object", info, found)),
    }
}

/// Reads the next key of an open object, or `None` at its end.
fn next_key(src: &mut dyn Source) -> Result<Option<String>, CodecError> {
    match src.resume()? {
        ScanCode::KeyBegin => match src.next_value()? {
            Value::String(key) => Ok(Some(key)),
            other => Err(CodecError::structural(format!("object key {other:?} is not a string"))),
        },
        ScanCode::StructEnd | ScanCode::MapEnd => Ok(None),
        code => Err(CodecError::unexpected(code)),
    }
}

fn decode_list(
    cx: &mut DecodeCx<'_>,
    src: &mut dyn Source,
    list: &mut dyn List,
    inner: &Decoder,
    info: &'static TypeInfo,
) -> Result<(), CodecError> {
    if src.peek() != ScanCode::ArrayBegin {
        return Err(CodecError::expected("an array", info, src.peek()));
    }
    list.clear();
    let mut index = 0;
    loop {
        match src.resume()? {
            ScanCode::ArrayEnd => return Ok(()),
            code if code.is_begin() => {}
            code => return Err(CodecError::unexpected(code)),
        }
        let item = list.push_default();
        cx.decode(inner, src, item).map_err(|err| err.within(index))?;
        index += 1;
    }
}

fn decode_bytes(
    src: &mut dyn Source,
    list: &mut dyn List,
    info: &'static TypeInfo,
) -> Result<(), CodecError> {
    let literal = src.next_value()?;
    let Some(text) = literal.as_str() else {
        return Err(CodecError::type_error(format!(
            "expected a base64 string for `{}`, found {literal:?}",
            info.type_path()
        )));
    };
    let bytes = STANDARD.decode(text).map_err(|err| {
        CodecError::type_error(format!("invalid base64 for `{}`: {err}", info.type_path()))
    })?;

    if let Err(bytes) = list.set_bytes(bytes) {
        list.clear();
        for byte in bytes {
            let ReflectMut::Scalar(item) = list.push_default().reflect_mut() else {
                return Err(CodecError::internal(format!(
                    "items of `{}` are not scalars",
                    info.type_path()
                )));
            };
            item.set_scalar(ScalarRef::Uint(u64::from(byte)))?;
        }
    }
    Ok(())
}
