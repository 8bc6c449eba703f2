//! Derive macro for `vc_reflect`.
//!
//! See [`Reflect`].
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static REFLECT_ATTRIBUTE_NAME: &str = "reflect";

// -----------------------------------------------------------------------------
// Modules

mod expand;
mod parse;

// -----------------------------------------------------------------------------
// Macros

/// # Struct Reflection
///
/// `#[derive(Reflect)]` implements `Typed`, `Reflect` and `Struct` for a struct
/// with named fields. Tuple structs, unit structs and enums are rejected.
///
/// Every field type must implement `Typed`.
///
/// ## Exported Fields
///
/// Only `pub` fields are exported. Codecs skip the others on both encode and decode,
/// but they remain reachable through the `Struct` trait.
///
/// ## Embedded Fields
///
/// `#[reflect(embed)]` marks a field as an anonymous member. When its type is
/// itself a struct, codecs promote its fields into the outer struct; a field
/// declared at a shallower level hides a promoted field of the same name.
///
/// ```rust, ignore
/// #[derive(Reflect, Default)]
/// struct Meta {
///     pub id: u64,
/// }
///
/// #[derive(Reflect, Default)]
/// struct Post {
///     #[reflect(embed)]
///     pub meta: Meta,
///     pub title: String,
/// }
/// // Encoded as {"id": .., "title": ..}
/// ```
///
/// ## Crate Path
///
/// Generated code refers to `::vc_reflect`. When the crate is only reachable
/// through a re-export, name it at the type level:
///
/// ```rust, ignore
/// #[derive(Reflect)]
/// #[reflect(crate = "vc_serial::reflect")]
/// struct Foo { /* ... */ }
/// ```
///
/// ## Generics
///
/// Generic structs are supported. A `Typed` bound is added for every field type,
/// and type info is stored per instantiation.
#[proc_macro_derive(Reflect, attributes(reflect))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match parse::ReflectStruct::from_ast(&ast) {
        Ok(info) => expand::impl_struct(&info).into(),
        Err(err) => err.into_compile_error().into(),
    }
}
