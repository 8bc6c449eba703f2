#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod cache;
mod error;
mod fields;
mod marshal;
mod raw;
mod render;
mod scratch;
mod source;
mod unmarshal;

pub mod codec;
pub mod contract;
pub mod json;
pub mod text;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use codec::{DecodeCx, DecodeDispatch, Decoder, EncodeCx, EncodeDispatch, Encoder};
pub use error::{CodecError, ErrorClass, PathSegment};
pub use fields::{FieldSet, ResolvedField};
pub use json::{Json, JsonRenderer};
pub use marshal::Marshaller;
pub use raw::RawText;
pub use render::{ElementId, Renderer};
pub use scratch::Scratch;
pub use source::Source;
pub use unmarshal::Unmarshaller;
