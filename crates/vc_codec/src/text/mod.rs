//! Dispatch functions for JSON-like text formats.
//!
//! [`encode_dispatch`] and [`decode_dispatch`] give every built-in kind a
//! text representation:
//!
//! | Kind                 | Text                                                   |
//! |----------------------|--------------------------------------------------------|
//! | `bool`, integers     | `true`, `false`, decimal digits                        |
//! | `f32`, `f64`         | shortest round-trip form, see [`write_f64`]            |
//! | `char`, `String`     | quoted, backslash escaped                              |
//! | `Vec<u8>`            | quoted standard base64                                 |
//! | `Vec<T>`, `[T; N]`   | an array of elements                                   |
//! | maps                 | an object, keys in sorted order; keys must be `String` |
//! | structs              | an object of the resolved fields                       |
//! | `Box<T>`             | the pointee                                            |
//! | `Option<T>`          | the value, or nil for `None`                           |
//! | [`Value`]            | itself                                                 |
//! | [`RawText`]          | verbatim                                               |
//! | `()`                 | nil                                                    |
//!
//! Decoding `null` gives `None` for an option, empties a list or map,
//! leaves a struct unchanged and is a type error for a scalar.
//!
//! [`Value`]: vc_reflect::Value
//! [`RawText`]: crate::RawText

// -----------------------------------------------------------------------------
// Modules

mod decode;
mod encode;
mod number;
mod string;

// -----------------------------------------------------------------------------
// Exports

pub use decode::decode_dispatch;
pub use encode::encode_dispatch;
pub use number::{write_f32, write_f64};
pub use string::{write_escaped, write_quoted};

use vc_scan::ScanCode;

use crate::{CodecError, Source};

/// Consumes the current or next value without decoding it.
#[inline]
pub fn skip_value(src: &mut dyn Source) -> Result<(), CodecError> {
    src.next_string().map(drop)
}

/// Advances to the Begin code of the next value.
pub fn begin_value(src: &mut dyn Source) -> Result<ScanCode, CodecError> {
    match src.resume()? {
        code if code.is_begin() => Ok(code),
        code => Err(CodecError::unexpected(code)),
    }
}
