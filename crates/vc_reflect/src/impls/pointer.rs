use alloc::boxed::Box;

use crate::Reflect;
use crate::info::{GenericTypeInfoCell, OptionalInfo, PointerInfo, TypeInfo, Typed};
use crate::ops::{Optional, Pointer, ReflectMut, ReflectRef};
use crate::reflection::impl_reflect_cast;

// -----------------------------------------------------------------------------
// Box<T>

impl<T: Typed> Typed for Box<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Pointer(PointerInfo::new::<Self, T>()))
    }
}

impl<T: Typed> Reflect for Box<T> {
    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        <Self as Typed>::type_info()
    }

    impl_reflect_cast!();

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Pointer(self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Pointer(self)
    }
}

impl<T: Typed> Pointer for Box<T> {
    #[inline]
    fn pointee(&self) -> &dyn Reflect {
        &**self
    }

    #[inline]
    fn pointee_mut(&mut self) -> &mut dyn Reflect {
        &mut **self
    }
}

// -----------------------------------------------------------------------------
// Option<T>

impl<T: Typed + Default> Typed for Option<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Optional(OptionalInfo::new::<Self, T>()))
    }
}

impl<T: Typed + Default> Reflect for Option<T> {
    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        <Self as Typed>::type_info()
    }

    impl_reflect_cast!();

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Optional(self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Optional(self)
    }
}

impl<T: Typed + Default> Optional for Option<T> {
    #[inline]
    fn get(&self) -> Option<&dyn Reflect> {
        self.as_ref().map(|v| v as &dyn Reflect)
    }

    #[inline]
    fn get_mut(&mut self) -> Option<&mut dyn Reflect> {
        self.as_mut().map(|v| v as &mut dyn Reflect)
    }

    fn get_or_insert_default(&mut self) -> &mut dyn Reflect {
        self.get_or_insert_with(T::default)
    }

    #[inline]
    fn set_none(&mut self) {
        *self = None;
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;

    use crate::Reflect;
    use crate::ops::{Optional, ReflectMut, ReflectRef};

    #[test]
    fn box_exposes_pointee() {
        let value = Box::new(5_u16);
        let ReflectRef::Pointer(pointer) = value.reflect_ref() else {
            panic!("Box is a pointer");
        };
        assert_eq!(pointer.pointee().downcast_ref::<u16>(), Some(&5));
    }

    #[test]
    fn option_inserts_default() {
        let mut value: Option<Box<i32>> = None;
        let ReflectMut::Optional(optional) = value.reflect_mut() else {
            panic!("Option is optional");
        };
        let inner = optional.get_or_insert_default();
        assert!(inner.is::<Box<i32>>());
        assert_eq!(value, Some(Box::new(0)));

        Optional::set_none(&mut value);
        assert_eq!(value, None);
    }
}
