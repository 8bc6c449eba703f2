use alloc::boxed::Box;
use core::any::TypeId;
use core::ops::Deref;

use vc_utils::TypeIdMap;

use crate::info::{Type, TypeInfo, Typed};
use crate::registry::TypeTrait;

// -----------------------------------------------------------------------------
// TypeMeta

/// The [`TypeInfo`] of one type and its table of [`TypeTrait`]s.
///
/// # Example
///
/// ```
/// use vc_reflect::registry::TypeMeta;
///
/// #[derive(Clone, PartialEq, Debug)]
/// struct Tag(u8);
///
/// let mut meta = TypeMeta::of::<String>();
/// meta.insert_trait(Tag(3));
///
/// assert_eq!(meta.get_trait::<Tag>(), Some(&Tag(3)));
/// assert!(meta.ty().is::<String>());
/// ```
pub struct TypeMeta {
    type_info: &'static TypeInfo,
    trait_table: TypeIdMap<Box<dyn TypeTrait>>,
}

impl TypeMeta {
    /// Creates a meta for `T` with no traits.
    #[inline]
    pub fn of<T: Typed>() -> Self {
        Self {
            type_info: T::type_info(),
            trait_table: TypeIdMap::new(),
        }
    }

    #[inline(always)]
    pub const fn type_info(&self) -> &'static TypeInfo {
        self.type_info
    }

    #[inline]
    pub const fn ty(&self) -> &'static Type {
        self.type_info.ty()
    }

    #[inline]
    pub const fn type_id(&self) -> TypeId {
        self.type_info.type_id()
    }

    /// Inserts or replaces a trait.
    #[inline]
    pub fn insert_trait<T: TypeTrait>(&mut self, data: T) {
        self.trait_table.insert(TypeId::of::<T>(), Box::new(data));
    }

    #[inline]
    pub fn get_trait<T: TypeTrait>(&self) -> Option<&T> {
        self.trait_table
            .get(&TypeId::of::<T>())
            .and_then(|data| data.deref().downcast_ref())
    }

    #[inline]
    pub fn has_trait<T: TypeTrait>(&self) -> bool {
        self.trait_table.contains(&TypeId::of::<T>())
    }

    /// Removes a trait, returning whether it was present.
    #[inline]
    pub fn remove_trait<T: TypeTrait>(&mut self) -> bool {
        self.trait_table.remove(&TypeId::of::<T>()).is_some()
    }

    #[inline]
    pub fn trait_len(&self) -> usize {
        self.trait_table.len()
    }
}

impl Clone for TypeMeta {
    fn clone(&self) -> Self {
        let mut trait_table = TypeIdMap::with_capacity(self.trait_len());
        for (id, data) in self.trait_table.iter() {
            trait_table.insert(*id, data.deref().clone_type_trait());
        }
        Self {
            type_info: self.type_info,
            trait_table,
        }
    }
}
