//! Static type descriptors.
//!
//! ## Menu
//!
//! - [`Type`]: a `TypeId` plus the type path, compared by id.
//! - [`ReflectKind`] / [`ScalarKind`]: the shape of a type.
//! - [`TypeInfo`]: a tagged enum over the per-kind infos:
//!     - [`ScalarInfo`]: `bool`, integers, floats, `char`, `String`.
//!     - [`PointerInfo`]: owning pointers such as `Box<T>`.
//!     - [`OptionalInfo`]: `Option<T>`.
//!     - [`DynamicInfo`]: self-describing values, see [`Value`](crate::Value).
//!     - [`ListInfo`] / [`ArrayInfo`]: `Vec<T>` and `[T; N]`.
//!     - [`MapInfo`]: string-keyed maps.
//!     - [`StructInfo`]: structs with [`NamedField`]s.
//!     - [`OpaqueInfo`]: types with no visible structure.
//! - [`Typed`]: obtain the static `TypeInfo` of a type.
//! - [`NonGenericTypeInfoCell`] / [`GenericTypeInfoCell`]: static storage used by `Typed` impls.
//!
//! Every nested type is stored as `fn() -> &'static TypeInfo` and resolved on demand,
//! so a type may refer to itself through a pointer or an option.

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod container_info;
mod kind;
mod struct_info;
mod ty;
mod type_info;
mod typed;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericTypeInfoCell, NonGenericTypeInfoCell};
pub use container_info::{ArrayInfo, ListInfo, MapInfo};
pub use container_info::{DynamicInfo, OpaqueInfo, OptionalInfo, PointerInfo, ScalarInfo};
pub use kind::{ReflectKind, ScalarKind};
pub use struct_info::{NamedField, StructInfo};
pub use ty::Type;
pub use type_info::{ReflectKindError, TypeInfo};
pub use typed::Typed;
