use alloc::string::String;
use core::any::TypeId;

use vc_utils::TypeIdMap;

use crate::info::Typed;
use crate::registry::{FromType, TypeMeta, TypeTrait};
use crate::Value;

// -----------------------------------------------------------------------------
// TypeRegistry

/// A store of [`TypeMeta`], keyed by [`TypeId`].
///
/// # Example
///
/// ```
/// use core::any::TypeId;
/// use vc_reflect::registry::TypeRegistry;
///
/// let registry = TypeRegistry::new();
/// let meta = registry.get(TypeId::of::<String>()).unwrap();
/// assert!(meta.ty().is::<String>());
/// ```
#[derive(Clone)]
pub struct TypeRegistry {
    type_meta_table: TypeIdMap<TypeMeta>,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Creates a registry without any type.
    #[inline]
    pub fn empty() -> Self {
        Self {
            type_meta_table: TypeIdMap::new(),
        }
    }

    /// Creates a registry with the scalar types, `()` and [`Value`] registered.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register::<()>();
        registry.register::<bool>();
        registry.register::<char>();
        registry.register::<u8>();
        registry.register::<u16>();
        registry.register::<u32>();
        registry.register::<u64>();
        registry.register::<usize>();
        registry.register::<i8>();
        registry.register::<i16>();
        registry.register::<i32>();
        registry.register::<i64>();
        registry.register::<isize>();
        registry.register::<f32>();
        registry.register::<f64>();
        registry.register::<String>();
        registry.register::<Value>();
        registry
    }

    /// Registers `T` if absent, returning whether it was inserted.
    pub fn register<T: Typed>(&mut self) -> bool {
        self.type_meta_table
            .try_insert(TypeId::of::<T>(), TypeMeta::of::<T>)
    }

    /// Registers `T` if needed, then inserts `D` built from `T` into its meta.
    ///
    /// An existing `D` for `T` is replaced.
    pub fn register_type_trait<T: Typed, D: TypeTrait + FromType<T>>(&mut self) {
        self.register::<T>();
        if let Some(meta) = self.type_meta_table.get_mut(&TypeId::of::<T>()) {
            meta.insert_trait(D::from_type());
        }
    }

    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.type_meta_table.contains(&type_id)
    }

    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&TypeMeta> {
        self.type_meta_table.get(&type_id)
    }

    #[inline]
    pub fn get_mut(&mut self, type_id: TypeId) -> Option<&mut TypeMeta> {
        self.type_meta_table.get_mut(&type_id)
    }

    /// Returns trait `D` of the type `type_id`, if both are registered.
    #[inline]
    pub fn get_type_trait<D: TypeTrait>(&self, type_id: TypeId) -> Option<&D> {
        self.get(type_id).and_then(TypeMeta::get_trait::<D>)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.type_meta_table.len()
    }

    /// All registered metas in arbitrary order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TypeMeta> {
        self.type_meta_table.values()
    }
}

#[cfg(test)]
mod tests {
    use core::any::TypeId;

    use super::TypeRegistry;
    use crate::info::Typed;
    use crate::registry::FromType;

    #[derive(Clone, Debug, PartialEq)]
    struct Kind(crate::info::ReflectKind);

    impl<T: Typed> FromType<T> for Kind {
        fn from_type() -> Self {
            Kind(T::type_info().kind())
        }
    }

    #[test]
    fn registers_traits_for_new_types() {
        let mut registry = TypeRegistry::empty();
        assert_eq!(registry.len(), 0);
        registry.register_type_trait::<Option<u8>, Kind>();

        assert!(registry.contains(TypeId::of::<Option<u8>>()));
        assert_eq!(
            registry.get_type_trait::<Kind>(TypeId::of::<Option<u8>>()),
            Some(&Kind(crate::info::ReflectKind::Optional))
        );
        assert_eq!(registry.get_type_trait::<Kind>(TypeId::of::<u8>()), None);
    }

    #[test]
    fn register_is_idempotent() {
        let mut registry = TypeRegistry::new();
        let before = registry.len();
        assert!(!registry.register::<i32>());
        assert_eq!(registry.len(), before);
    }
}
