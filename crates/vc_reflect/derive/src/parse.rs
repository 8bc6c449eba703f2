use syn::{Data, DeriveInput, Fields, Ident, LitStr, Path, Type, Visibility};

use crate::REFLECT_ATTRIBUTE_NAME;

/// A field of the derived struct.
pub(crate) struct ReflectField<'a> {
    pub ident: &'a Ident,
    pub ty: &'a Type,
    pub embedded: bool,
    pub exported: bool,
}

/// The parsed input of `#[derive(Reflect)]`.
pub(crate) struct ReflectStruct<'a> {
    pub ast: &'a DeriveInput,
    pub crate_path: Path,
    pub fields: Vec<ReflectField<'a>>,
}

impl<'a> ReflectStruct<'a> {
    pub fn from_ast(ast: &'a DeriveInput) -> syn::Result<Self> {
        let mut crate_path: Path = syn::parse_quote!(::vc_reflect);

        for attr in &ast.attrs {
            if !attr.path().is_ident(REFLECT_ATTRIBUTE_NAME) {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("crate") {
                    let lit: LitStr = meta.value()?.parse()?;
                    crate_path = lit.parse()?;
                    Ok(())
                } else {
                    Err(meta.error("unsupported type-level `reflect` attribute"))
                }
            })?;
        }

        let Data::Struct(data) = &ast.data else {
            return Err(syn::Error::new_spanned(
                &ast.ident,
                "`Reflect` can only be derived for structs",
            ));
        };

        let Fields::Named(named) = &data.fields else {
            return Err(syn::Error::new_spanned(
                &ast.ident,
                "`Reflect` can only be derived for structs with named fields",
            ));
        };

        let mut fields = Vec::with_capacity(named.named.len());
        for field in &named.named {
            let Some(ident) = field.ident.as_ref() else {
                return Err(syn::Error::new_spanned(field, "expected a named field"));
            };

            let mut embedded = false;
            for attr in &field.attrs {
                if !attr.path().is_ident(REFLECT_ATTRIBUTE_NAME) {
                    continue;
                }
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("embed") {
                        embedded = true;
                        Ok(())
                    } else {
                        Err(meta.error("unsupported field-level `reflect` attribute"))
                    }
                })?;
            }

            fields.push(ReflectField {
                ident,
                ty: &field.ty,
                embedded,
                exported: matches!(field.vis, Visibility::Public(_)),
            });
        }

        Ok(Self {
            ast,
            crate_path,
            fields,
        })
    }

    #[inline]
    pub fn is_generic(&self) -> bool {
        self.ast.generics.type_params().next().is_some()
    }
}
