//! `Reflect` implementations for built-in types.
//!
//! - Scalars: `bool`, `i8..i64`, `isize`, `u8..u64`, `usize`, `f32`, `f64`, `char`, `String`.
//! - `Box<T>` as a pointer, `Option<T>` as an optional.
//! - `Vec<T>` as a list, `[T; N]` as an array.
//! - `std` and `hashbrown` `HashMap<K, V, S>` and `BTreeMap<K, V>` as maps.
//! - [`Value`](crate::Value) as the dynamic kind, `()` as opaque.
//!
//! Types that must be created during decoding (`Option` contents, list items,
//! map values) require `Default`.

mod array;
mod dynamic;
mod list;
mod map;
mod opaque;
mod pointer;
mod scalar;
