//! Kind-specific access to reflected values.
//!
//! [`ReflectRef`] and [`ReflectMut`] are obtained from
//! [`Reflect::reflect_ref`](crate::Reflect::reflect_ref) and
//! [`Reflect::reflect_mut`](crate::Reflect::reflect_mut). Each variant carries
//! one of the traits below.
//!
//! - [`Scalar`]: read and assign primitives through [`ScalarRef`].
//! - [`Pointer`]: the pointee of an owning pointer.
//! - [`Optional`]: `Option<T>`, with [`get_or_insert_default`](Optional::get_or_insert_default).
//! - [`List`] / [`Array`]: indexed sequences; lists can grow and expose a byte fast path.
//! - [`Map`]: entries, plus insertion by string key.
//! - [`Struct`]: fields by name or declaration index.

// -----------------------------------------------------------------------------
// Modules

mod array_ops;
mod list_ops;
mod map_ops;
mod pointer_ops;
mod reflect_ref;
mod scalar_ops;
mod struct_ops;

// -----------------------------------------------------------------------------
// Exports

pub use array_ops::Array;
pub use list_ops::List;
pub use map_ops::Map;
pub use pointer_ops::{Optional, Pointer};
pub use reflect_ref::{ReflectMut, ReflectRef};
pub use scalar_ops::{Scalar, ScalarError, ScalarRef};
pub use struct_ops::Struct;
