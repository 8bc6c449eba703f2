use alloc::vec::Vec;
use core::any::Any;

use crate::Reflect;
use crate::info::{GenericTypeInfoCell, ListInfo, TypeInfo, Typed};
use crate::ops::{List, ReflectMut, ReflectRef};
use crate::reflection::impl_reflect_cast;

impl<T: Typed + Default> Typed for Vec<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::List(ListInfo::new::<Self, T>()))
    }
}

impl<T: Typed + Default> Reflect for Vec<T> {
    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        <Self as Typed>::type_info()
    }

    impl_reflect_cast!();

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::List(self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::List(self)
    }
}

impl<T: Typed + Default> List for Vec<T> {
    #[inline]
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        self.as_slice().get(index).map(|v| v as &dyn Reflect)
    }

    #[inline]
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
        self.as_mut_slice()
            .get_mut(index)
            .map(|v| v as &mut dyn Reflect)
    }

    fn push_default(&mut self) -> &mut dyn Reflect {
        self.push(T::default());
        let last = self.as_slice().len() - 1;
        &mut self.as_mut_slice()[last]
    }

    #[inline]
    fn clear(&mut self) {
        Vec::clear(self);
    }

    fn as_bytes(&self) -> Option<&[u8]> {
        let any: &dyn Any = self;
        any.downcast_ref::<Vec<u8>>().map(Vec::as_slice)
    }

    fn set_bytes(&mut self, bytes: Vec<u8>) -> Result<(), Vec<u8>> {
        let any: &mut dyn Any = self;
        match any.downcast_mut::<Vec<u8>>() {
            Some(target) => {
                *target = bytes;
                Ok(())
            }
            None => Err(bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use crate::ops::List;

    #[test]
    fn push_default_appends() {
        let mut list: Vec<String> = Vec::new();
        List::push_default(&mut list);
        assert_eq!(list, [String::new()]);
    }

    #[test]
    fn byte_fast_path_only_for_u8() {
        let bytes = vec![1_u8, 2];
        assert_eq!(List::as_bytes(&bytes), Some(&[1_u8, 2][..]));

        let words = vec![1_u16, 2];
        assert_eq!(List::as_bytes(&words), None);

        let mut target: Vec<u8> = Vec::new();
        List::set_bytes(&mut target, vec![9, 9]).unwrap();
        assert_eq!(target, [9, 9]);

        let mut other: Vec<i8> = Vec::new();
        assert_eq!(List::set_bytes(&mut other, vec![1]), Err(vec![1]));
    }
}
