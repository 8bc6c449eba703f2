use core::any::{Any, TypeId};
use core::fmt;

use crate::info::{ReflectKind, TypeInfo};
use crate::ops::{ReflectMut, ReflectRef};

// -----------------------------------------------------------------------------
// Reflect

/// Object-safe access to a value whose type is only known at runtime.
///
/// Codecs hold values as `&dyn Reflect`, look up a codec by
/// [`reflect_type_info`](Reflect::reflect_type_info), then reach the data through
/// the kind-specific view returned by [`reflect_ref`](Reflect::reflect_ref) or
/// [`reflect_mut`](Reflect::reflect_mut).
///
/// Prefer `#[derive(Reflect)]` for structs. Built-in impls cover scalars,
/// `Box`, `Option`, `Vec`, arrays, maps, `()` and [`Value`](crate::Value).
///
/// # Examples
///
/// ```
/// use vc_reflect::{Reflect, ops::ReflectRef};
///
/// let value: &dyn Reflect = &vec![1_u8, 2, 3];
/// let ReflectRef::List(list) = value.reflect_ref() else { unreachable!() };
///
/// assert_eq!(list.len(), 3);
/// assert_eq!(list.as_bytes(), Some(&[1_u8, 2, 3][..]));
/// ```
pub trait Reflect: Any + Send + Sync {
    /// Returns the static type info of the underlying type.
    fn reflect_type_info(&self) -> &'static TypeInfo;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn as_reflect(&self) -> &dyn Reflect;

    fn as_reflect_mut(&mut self) -> &mut dyn Reflect;

    /// Returns an immutable view matching the type's kind.
    fn reflect_ref(&self) -> ReflectRef<'_>;

    /// Returns a mutable view matching the type's kind.
    fn reflect_mut(&mut self) -> ReflectMut<'_>;

    #[inline]
    fn reflect_kind(&self) -> ReflectKind {
        self.reflect_type_info().kind()
    }
}

impl dyn Reflect {
    /// The [`TypeId`] of the underlying type.
    #[inline]
    pub fn ty_id(&self) -> TypeId {
        self.reflect_type_info().type_id()
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.reflect_type_info().type_path()
    }

    #[inline]
    pub fn is<T: Reflect>(&self) -> bool {
        self.as_any().is::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Reflect>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    #[inline]
    pub fn downcast_mut<T: Reflect>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

impl fmt::Debug for dyn Reflect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reflect({})", self.type_path())
    }
}

/// Implements the `as_*` casts of [`Reflect`] for a sized type.
macro_rules! impl_reflect_cast {
    () => {
        #[inline(always)]
        fn as_any(&self) -> &dyn ::core::any::Any {
            self
        }

        #[inline(always)]
        fn as_any_mut(&mut self) -> &mut dyn ::core::any::Any {
            self
        }

        #[inline(always)]
        fn as_reflect(&self) -> &dyn $crate::Reflect {
            self
        }

        #[inline(always)]
        fn as_reflect_mut(&mut self) -> &mut dyn $crate::Reflect {
            self
        }
    };
}

pub(crate) use impl_reflect_cast;
