use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use vc_reflect::info::{ScalarKind, TypeInfo};
use vc_reflect::ops::{ReflectRef, ScalarRef};
use vc_reflect::{Reflect, Value};

use super::{write_f32, write_f64, write_quoted};
use crate::codec::encoder;
use crate::{CodecError, ElementId, EncodeCx, Encoder, FieldSet, Marshaller, RawText, Renderer};

/// Builds the text encoder of `info`.
///
/// Opaque types other than [`RawText`] and `()` are unsupported, as are
/// maps whose keys are not `String`.
pub fn encode_dispatch(m: &Marshaller, info: &'static TypeInfo) -> Result<Encoder, CodecError> {
    match info {
        TypeInfo::Scalar(scalar) => Ok(scalar_encoder(info, scalar.scalar_kind())),
        TypeInfo::Opaque(_) if info.is::<RawText>() => Ok(encoder(move |_, sink, value| {
            match value.downcast_ref::<RawText>() {
                Some(raw) => sink.write(raw.as_str().as_bytes()),
                None => Err(CodecError::invoked_on(info, value)),
            }
        })),
        TypeInfo::Opaque(_) if info.is::<()>() => Ok(encoder(|_, sink, _| sink.write_nil())),
        TypeInfo::Opaque(_) => Err(CodecError::type_error(format!(
            "unsupported type `{}`",
            info.type_path()
        ))),
        TypeInfo::Pointer(pointer) => {
            let inner = m.find_encoder(pointer.pointee_info());
            Ok(encoder(move |cx, sink, value| match value.reflect_ref() {
                ReflectRef::Pointer(pointer) => cx.encode(&inner, sink, pointer.pointee()),
                _ => Err(CodecError::invoked_on(info, value)),
            }))
        }
        TypeInfo::Optional(optional) => {
            let inner = m.find_encoder(optional.some_info());
            Ok(encoder(move |cx, sink, value| match value.reflect_ref() {
                ReflectRef::Optional(optional) => match optional.get() {
                    Some(some) => cx.encode(&inner, sink, some),
                    None => sink.write_nil(),
                },
                _ => Err(CodecError::invoked_on(info, value)),
            }))
        }
        TypeInfo::Dynamic(_) => Ok(encoder(move |cx, sink, value| match value.reflect_ref() {
            ReflectRef::Dynamic(dynamic) => encode_value(cx, sink, dynamic),
            _ => Err(CodecError::invoked_on(info, value)),
        })),
        TypeInfo::List(list) if list.item_info().is::<u8>() => Ok(bytes_encoder(info)),
        TypeInfo::List(list) => {
            let inner = m.find_encoder(list.item_info());
            Ok(encoder(move |cx, sink, value| {
                let ReflectRef::List(list) = value.reflect_ref() else {
                    return Err(CodecError::invoked_on(info, value));
                };
                let items = (0..list.len()).filter_map(|index| list.get(index));
                encode_items(cx, sink, &inner, items)
            }))
        }
        TypeInfo::Array(array) => {
            let inner = m.find_encoder(array.item_info());
            Ok(encoder(move |cx, sink, value| {
                let ReflectRef::Array(array) = value.reflect_ref() else {
                    return Err(CodecError::invoked_on(info, value));
                };
                let items = (0..array.len()).filter_map(|index| array.get(index));
                encode_items(cx, sink, &inner, items)
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
            let inner = m.find_encoder(map.value_info());
            Ok(encoder(move |cx, sink, value| {
                let ReflectRef::Map(map) = value.reflect_ref() else {
                    return Err(CodecError::invoked_on(info, value));
                };
                let mut entries: Vec<(&str, &dyn Reflect)> = map
                    .entries()
                    .into_iter()
                    .filter_map(|(key, item)| Some((key.downcast_ref::<String>()?.as_str(), item)))
                    .collect();
                entries.sort_unstable_by(|a, b| a.0.cmp(b.0));

                sink.start_map()?;
                for (key, item) in entries {
                    encode_element(cx, sink, &inner, ElementId::Name(key), item)
                        .map_err(|err| err.within(String::from(key)))?;
                }
                sink.stop_map()
            }))
        }
        TypeInfo::Struct(structure) => {
            let fields = FieldSet::resolve(structure);
            let encoders: Vec<Encoder> = fields
                .iter()
                .map(|field| m.find_encoder(field.type_info()))
                .collect();
            Ok(encoder(move |cx, sink, value| {
                if !matches!(value.reflect_ref(), ReflectRef::Struct(_)) {
                    return Err(CodecError::invoked_on(info, value));
                }
                sink.start_struct()?;
                for (field, inner) in fields.iter().zip(&encoders) {
                    let Some(item) = field.get(value) else {
                        continue;
                    };
                    encode_element(cx, sink, inner, ElementId::Name(field.name()), item)
                        .map_err(|err| err.within(field.name()))?;
                }
                sink.stop_struct()
            }))
        }
    }
}

fn scalar_encoder(info: &'static TypeInfo, kind: ScalarKind) -> Encoder {
    encoder(move |cx, sink, value| {
        let ReflectRef::Scalar(scalar) = value.reflect_ref() else {
            return Err(CodecError::invoked_on(info, value));
        };
        let out = &mut cx.scratch;
        out.clear();
        match scalar.scalar_ref() {
            ScalarRef::Bool(flag) => return sink.write(if flag { b"true" } else { b"false" }),
            ScalarRef::Int(int) => write!(out, "{int}")?,
            ScalarRef::Uint(uint) => write!(out, "{uint}")?,
            ScalarRef::Float(float) if kind == ScalarKind::F32 => write_f32(out, float as f32)?,
            ScalarRef::Float(float) => write_f64(out, float)?,
            ScalarRef::Char(c) => return write_quoted(sink, c.encode_utf8(&mut [0; 4])),
            ScalarRef::Str(text) => return write_quoted(sink, text),
        }
        sink.write(out.as_bytes())
    })
}

fn bytes_encoder(info: &'static TypeInfo) -> Encoder {
    encoder(move |_, sink, value| {
        let ReflectRef::List(list) = value.reflect_ref() else {
            return Err(CodecError::invoked_on(info, value));
        };
        let encoded = match list.as_bytes() {
            Some(bytes) => STANDARD.encode(bytes),
            None => {
                let bytes: Vec<u8> = (0..list.len())
                    .filter_map(|index| list.get(index)?.downcast_ref::<u8>().copied())
                    .collect();
                STANDARD.encode(bytes)
            }
        };
        sink.write(b"\"")?;
        sink.write(encoded.as_bytes())?;
        sink.write(b"\"")
    })
}

fn encode_element(
    cx: &mut EncodeCx<'_>,
    sink: &mut dyn Renderer,
    encoder: &Encoder,
    id: ElementId<'_>,
    value: &dyn Reflect,
) -> Result<(), CodecError> {
    sink.start_element(id)?;
    cx.encode(encoder, sink, value)?;
    sink.stop_element(id)
}

fn encode_items<'a>(
    cx: &mut EncodeCx<'_>,
    sink: &mut dyn Renderer,
    encoder: &Encoder,
    items: impl Iterator<Item = &'a dyn Reflect>,
) -> Result<(), CodecError> {
    sink.start_array()?;
    for (index, item) in items.enumerate() {
        encode_element(cx, sink, encoder, ElementId::Index(index), item)
            .map_err(|err| err.within(index))?;
    }
    sink.stop_array()
}

/// Encodes a self-describing value. Object keys keep their insertion order.
fn encode_value(
    cx: &mut EncodeCx<'_>,
    sink: &mut dyn Renderer,
    value: &Value,
) -> Result<(), CodecError> {
    let out = &mut cx.scratch;
    out.clear();
    match value {
        Value::Null => return sink.write_nil(),
        Value::Bool(flag) => return sink.write(if *flag { b"true" } else { b"false" }),
        Value::Int(int) => write!(out, "{int}")?,
        Value::Uint(uint) => write!(out, "{uint}")?,
        Value::Float(float) => write_f64(out, *float)?,
        Value::String(text) => return write_quoted(sink, text),
        Value::Array(items) => {
            sink.start_array()?;
            for (index, item) in items.iter().enumerate() {
                let id = ElementId::Index(index);
                sink.start_element(id)?;
                encode_value(cx, sink, item).map_err(|err| err.within(index))?;
                sink.stop_element(id)?;
            }
            return sink.stop_array();
        }
        Value::Object(object) => {
            sink.start_map()?;
            for (key, item) in object.iter() {
                let id = ElementId::Name(key);
                sink.start_element(id)?;
                encode_value(cx, sink, item).map_err(|err| err.within(String::from(key)))?;
                sink.stop_element(id)?;
            }
            return sink.stop_map();
        }
    }
    sink.write(out.as_bytes())
}
