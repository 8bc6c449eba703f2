#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use vc_codec as codec;
pub use vc_reflect as reflect;
pub use vc_scan as scan;
pub use vc_utils as utils;

pub use vc_codec::{CodecError, ErrorClass, Json};
pub use vc_reflect::derive::Reflect;
