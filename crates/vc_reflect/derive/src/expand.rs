use proc_macro2::TokenStream;
use quote::quote;

use crate::parse::ReflectStruct;

/// Implement `Typed`, `Reflect` and `Struct` for a struct.
pub(crate) fn impl_struct(info: &ReflectStruct) -> TokenStream {
    let vc_reflect = &info.crate_path;
    let ident = &info.ast.ident;

    let mut generics = info.ast.generics.clone();
    if info.is_generic() {
        let where_clause = generics.make_where_clause();
        for field in &info.fields {
            let ty = field.ty;
            where_clause
                .predicates
                .push(syn::parse_quote!(#ty: #vc_reflect::info::Typed));
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let typed_tokens = impl_typed(info);

    let names: Vec<String> = info.fields.iter().map(|f| f.ident.to_string()).collect();
    let members: Vec<_> = info.fields.iter().map(|f| f.ident).collect();
    let indices: Vec<usize> = (0..info.fields.len()).collect();
    let field_len = info.fields.len();

    quote! {
        impl #impl_generics #vc_reflect::info::Typed for #ident #ty_generics #where_clause {
            #typed_tokens
        }

        impl #impl_generics #vc_reflect::Reflect for #ident #ty_generics #where_clause {
            #[inline]
            fn reflect_type_info(&self) -> &'static #vc_reflect::info::TypeInfo {
                <Self as #vc_reflect::info::Typed>::type_info()
            }

            #[inline(always)]
            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            #[inline(always)]
            fn as_any_mut(&mut self) -> &mut dyn ::core::any::Any {
                self
            }

            #[inline(always)]
            fn as_reflect(&self) -> &dyn #vc_reflect::Reflect {
                self
            }

            #[inline(always)]
            fn as_reflect_mut(&mut self) -> &mut dyn #vc_reflect::Reflect {
                self
            }

            #[inline]
            fn reflect_ref(&self) -> #vc_reflect::ops::ReflectRef<'_> {
                #vc_reflect::ops::ReflectRef::Struct(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> #vc_reflect::ops::ReflectMut<'_> {
                #vc_reflect::ops::ReflectMut::Struct(self)
            }
        }

        impl #impl_generics #vc_reflect::ops::Struct for #ident #ty_generics #where_clause {
            fn field(&self, name: &str) -> ::core::option::Option<&dyn #vc_reflect::Reflect> {
                match name {
                    #( #names => ::core::option::Option::Some(&self.#members as &dyn #vc_reflect::Reflect), )*
                    _ => ::core::option::Option::None,
                }
            }

            fn field_mut(&mut self, name: &str) -> ::core::option::Option<&mut dyn #vc_reflect::Reflect> {
                match name {
                    #( #names => ::core::option::Option::Some(&mut self.#members as &mut dyn #vc_reflect::Reflect), )*
                    _ => ::core::option::Option::None,
                }
            }

            fn field_at(&self, index: usize) -> ::core::option::Option<&dyn #vc_reflect::Reflect> {
                match index {
                    #( #indices => ::core::option::Option::Some(&self.#members as &dyn #vc_reflect::Reflect), )*
                    _ => ::core::option::Option::None,
                }
            }

            fn field_at_mut(&mut self, index: usize) -> ::core::option::Option<&mut dyn #vc_reflect::Reflect> {
                match index {
                    #( #indices => ::core::option::Option::Some(&mut self.#members as &mut dyn #vc_reflect::Reflect), )*
                    _ => ::core::option::Option::None,
                }
            }

            #[inline]
            fn field_len(&self) -> usize {
                #field_len
            }
        }
    }
}

/// The body of `Typed::type_info`.
fn impl_typed(info: &ReflectStruct) -> TokenStream {
    let vc_reflect = &info.crate_path;

    let fields = info.fields.iter().map(|field| {
        let name = field.ident.to_string();
        let ty = field.ty;
        let embedded = field.embedded;
        let exported = field.exported;
        quote! {
            #vc_reflect::info::NamedField::new::<#ty>(#name)
                .with_embedded(#embedded)
                .with_exported(#exported)
        }
    });

    let info_tokens = quote! {
        #vc_reflect::info::TypeInfo::Struct(
            #vc_reflect::info::StructInfo::new::<Self>(&[ #(#fields),* ])
        )
    };

    if info.is_generic() {
        quote! {
            fn type_info() -> &'static #vc_reflect::info::TypeInfo {
                static CELL: #vc_reflect::info::GenericTypeInfoCell = #vc_reflect::info::GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| #info_tokens)
            }
        }
    } else {
        quote! {
            fn type_info() -> &'static #vc_reflect::info::TypeInfo {
                static CELL: #vc_reflect::info::NonGenericTypeInfoCell = #vc_reflect::info::NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| #info_tokens)
            }
        }
    }
}
