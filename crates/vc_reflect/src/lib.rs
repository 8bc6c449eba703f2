#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// Derived impls name `::vc_reflect`, which must also resolve inside this crate.
extern crate self as vc_reflect;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod impls;
mod reflection;
mod value;

pub mod info;
pub mod ops;
pub mod registry;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use reflection::Reflect;
pub use value::{Object, Value};
pub use vc_reflect_derive as derive;

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec::Vec;

    use crate::Reflect;
    use crate::derive::Reflect;
    use crate::info::{ReflectKind, Typed};
    use crate::ops::{ReflectMut, ReflectRef};

    #[derive(Reflect, Default)]
    struct Base {
        pub id: u32,
    }

    #[derive(Reflect, Default)]
    struct Node {
        pub name: String,
        #[reflect(embed)]
        pub base: Base,
        pub next: Option<Box<Node>>,
        hidden: Vec<u8>,
    }

    #[derive(Reflect, Default)]
    struct Wrapper<T: Typed + Default> {
        pub inner: T,
    }

    #[test]
    fn derived_struct_info() {
        let info = Node::type_info().as_struct().unwrap();
        assert_eq!(info.field_len(), 4);

        let base = info.field("base").unwrap();
        assert!(base.is_embedded());
        assert!(base.type_info().is::<Base>());

        let hidden = info.field_at(3).unwrap();
        assert_eq!(hidden.name(), "hidden");
        assert!(!hidden.is_exported());

        // The self reference resolves lazily.
        let next = info.field("next").unwrap().type_info();
        let boxed = next.as_optional().unwrap().some_info();
        assert!(core::ptr::eq(
            boxed.as_pointer().unwrap().pointee_info(),
            Node::type_info()
        ));
    }

    #[test]
    fn derived_field_access() {
        let mut node = Node {
            name: "a".into(),
            hidden: vec![1],
            ..Default::default()
        };

        let ReflectMut::Struct(view) = node.reflect_mut() else {
            panic!("derived struct");
        };
        *view.field_mut("name").unwrap().downcast_mut::<String>().unwrap() = "b".into();
        assert!(view.field_at_mut(9).is_none());
        assert_eq!(view.field_len(), 4);
        assert_eq!(node.name, "b");

        let ReflectRef::Struct(view) = node.reflect_ref() else {
            panic!("derived struct");
        };
        assert_eq!(view.field("hidden").unwrap().downcast_ref::<Vec<u8>>(), Some(&vec![1]));
    }

    #[test]
    fn generic_derive_keeps_instantiations_apart() {
        let a = Wrapper::<u8>::type_info();
        let b = Wrapper::<String>::type_info();
        assert!(!core::ptr::eq(a, b));
        assert_eq!(a.kind(), ReflectKind::Struct);
        assert!(
            b.as_struct()
                .unwrap()
                .field("inner")
                .unwrap()
                .type_info()
                .is::<String>()
        );
    }
}
