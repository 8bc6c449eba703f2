use crate::Reflect;
use crate::info::TypeInfo;

/// Static access to the [`TypeInfo`] of a type.
///
/// Implemented for the built-in types and by `#[derive(Reflect)]`.
/// Implementations store the info in a [`NonGenericTypeInfoCell`] or,
/// for generic types, a [`GenericTypeInfoCell`].
///
/// [`NonGenericTypeInfoCell`]: crate::info::NonGenericTypeInfoCell
/// [`GenericTypeInfoCell`]: crate::info::GenericTypeInfoCell
pub trait Typed: Reflect {
    fn type_info() -> &'static TypeInfo;
}
