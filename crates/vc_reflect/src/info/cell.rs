//! Static storage for [`TypeInfo`].
//!
//! A `static` inside a generic function is shared by every instantiation,
//! so generic types key their info by [`TypeId`] in a [`GenericTypeInfoCell`].

use alloc::boxed::Box;
use core::any::TypeId;
use std::sync::{OnceLock, PoisonError, RwLock};

use vc_utils::TypeIdMap;

use crate::info::TypeInfo;

// -----------------------------------------------------------------------------
// NonGenericTypeInfoCell

/// Storage for the [`TypeInfo`] of one non-generic type.
///
/// ```
/// use vc_reflect::info::{NonGenericTypeInfoCell, OpaqueInfo, TypeInfo};
///
/// struct Marker;
///
/// fn marker_info() -> &'static TypeInfo {
///     static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///     CELL.get_or_init(|| TypeInfo::Opaque(OpaqueInfo::new::<Marker>()))
/// }
///
/// assert!(core::ptr::eq(marker_info(), marker_info()));
/// ```
pub struct NonGenericTypeInfoCell(OnceLock<TypeInfo>);

impl NonGenericTypeInfoCell {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns the stored info, initializing it with `f` on first use.
    #[inline]
    pub fn get_or_init<F>(&self, f: F) -> &TypeInfo
    where
        F: FnOnce() -> TypeInfo,
    {
        self.0.get_or_init(f)
    }
}

// -----------------------------------------------------------------------------
// GenericTypeInfoCell

/// Storage for the [`TypeInfo`] of every instantiation of a generic type.
///
/// Entries are leaked and live for the rest of the program.
pub struct GenericTypeInfoCell(RwLock<TypeIdMap<&'static TypeInfo>>);

impl GenericTypeInfoCell {
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::new()))
    }

    /// Returns the info stored for `G`, inserting the result of `f` on first use.
    ///
    /// `f` must not call back into the same cell.
    pub fn get_or_insert<G: 'static>(&self, f: impl FnOnce() -> TypeInfo) -> &'static TypeInfo {
        let type_id = TypeId::of::<G>();

        if let Some(info) = self
            .0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
        {
            return *info;
        }

        let mut table = self.0.write().unwrap_or_else(PoisonError::into_inner);
        *table.get_or_insert(type_id, || &*Box::leak(Box::new(f())))
    }
}

impl Default for GenericTypeInfoCell {
    fn default() -> Self {
        Self::new()
    }
}
