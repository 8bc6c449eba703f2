use crate::info::Typed;

/// Builds a [`TypeTrait`](crate::registry::TypeTrait) for the concrete type `T`.
///
/// # Example
///
/// ```
/// use vc_reflect::info::Typed;
/// use vc_reflect::registry::{FromType, TypeRegistry};
///
/// #[derive(Clone)]
/// struct DisplayName(&'static str);
///
/// impl<T: Typed> FromType<T> for DisplayName {
///     fn from_type() -> Self {
///         DisplayName(T::type_info().ty().ident())
///     }
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register_type_trait::<u32, DisplayName>();
///
/// let name = registry.get_type_trait::<DisplayName>(core::any::TypeId::of::<u32>());
/// assert_eq!(name.unwrap().0, "u32");
/// ```
pub trait FromType<T: Typed> {
    fn from_type() -> Self;
}
