use alloc::borrow::ToOwned;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::hash::{BuildHasher, Hash};
use std::collections::HashMap;

use vc_utils::hash::hashbrown::HashMap as HashbrownMap;

use crate::Reflect;
use crate::info::{GenericTypeInfoCell, MapInfo, TypeInfo, Typed};
use crate::ops::{Map, ReflectMut, ReflectRef};
use crate::reflection::impl_reflect_cast;

macro_rules! impl_reflect_map {
    ($map:ident < K, V $(, $extra:ident)* > where $($bounds:tt)*) => {
        impl<K, V $(, $extra)*> Typed for $map<K, V $(, $extra)*>
        where
            $($bounds)*
        {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| TypeInfo::Map(MapInfo::new::<Self, K, V>()))
            }
        }

        impl<K, V $(, $extra)*> Reflect for $map<K, V $(, $extra)*>
        where
            $($bounds)*
        {
            #[inline]
            fn reflect_type_info(&self) -> &'static TypeInfo {
                <Self as Typed>::type_info()
            }

            impl_reflect_cast!();

            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                ReflectRef::Map(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> ReflectMut<'_> {
                ReflectMut::Map(self)
            }
        }

        impl<K, V $(, $extra)*> Map for $map<K, V $(, $extra)*>
        where
            $($bounds)*
        {
            #[inline]
            fn len(&self) -> usize {
                $map::len(self)
            }

            fn entries(&self) -> Vec<(&dyn Reflect, &dyn Reflect)> {
                self.iter()
                    .map(|(key, value)| (key as &dyn Reflect, value as &dyn Reflect))
                    .collect()
            }

            fn get(&self, key: &str) -> Option<&dyn Reflect> {
                let any: &dyn Any = self;
                any.downcast_ref::<$map<String, V $(, $extra)*>>()?
                    .get(key)
                    .map(|value| value as &dyn Reflect)
            }

            fn get_or_insert_default(&mut self, key: &str) -> Option<&mut dyn Reflect> {
                let any: &mut dyn Any = self;
                let map = any.downcast_mut::<$map<String, V $(, $extra)*>>()?;
                let value = map.entry(key.to_owned()).or_insert_with(V::default);
                Some(value as &mut dyn Reflect)
            }

            #[inline]
            fn clear(&mut self) {
                $map::clear(self);
            }
        }
    };
}

impl_reflect_map!(HashMap<K, V, S> where
    K: Typed + Eq + Hash,
    V: Typed + Default,
    S: BuildHasher + Default + Send + Sync + 'static,
);

impl_reflect_map!(HashbrownMap<K, V, S> where
    K: Typed + Eq + Hash,
    V: Typed + Default,
    S: BuildHasher + Default + Send + Sync + 'static,
);

impl_reflect_map!(BTreeMap<K, V> where
    K: Typed + Ord,
    V: Typed + Default,
);

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use std::collections::HashMap;

    use crate::Reflect;
    use crate::info::Typed;
    use crate::ops::{Map, ReflectMut};

    #[test]
    fn string_keys_insert_by_name() {
        let mut map: BTreeMap<String, i32> = BTreeMap::new();
        let ReflectMut::Map(view) = map.reflect_mut() else {
            panic!("BTreeMap is a map");
        };
        view.get_or_insert_default("a").unwrap();
        assert!(view.get("a").unwrap().is::<i32>());
        assert_eq!(map.get("a"), Some(&0));
    }

    #[test]
    fn other_keys_refuse_names() {
        let mut map: HashMap<u32, i32> = HashMap::new();
        map.insert(1, 2);
        assert!(Map::get_or_insert_default(&mut map, "1").is_none());
        assert_eq!(Map::entries(&map).len(), 1);
        assert!(
            HashMap::<u32, i32>::type_info()
                .as_map()
                .unwrap()
                .key_info()
                .is::<u32>()
        );
    }
}
