use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{DeriveInput, Ident};

use crate::field_helpers::{collect_fields, parse_type_attrs, FieldInfo};
use crate::type_helpers::{get_item_type, ContainerKind};

/// Generates `<Name>Builder`, the accessors on `<Name>` and `hash_code()`.
///
/// Builder storage mirrors the record: lists stay `Vec<T>`, every singular
/// field becomes `Option<T>` so a required value can be reported as missing
/// at `build()` instead of being defaulted.
pub(crate) fn generate_builder_impl(input: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let fields = collect_fields(&input.data, name.span())?;
    let type_attrs = parse_type_attrs(&input.attrs, name)?;
    let fhir_name = &type_attrs.name;
    let builder_name = format_ident!("{}Builder", name);

    let model: Vec<&FieldInfo> = fields.iter().filter(|f| !f.skip).collect();
    let skipped: Vec<&Ident> = fields.iter().filter(|f| f.skip).map(|f| &f.ident).collect();

    let builder_fields = model.iter().map(|f| {
        let ident = &f.ident;
        let item = get_item_type(&f.ty);
        match f.kind {
            ContainerKind::Vec => quote! { #ident: Vec<#item> },
            _ => quote! { #ident: Option<#item> },
        }
    });

    let setters = model.iter().map(|f| {
        let ident = &f.ident;
        let item = get_item_type(&f.ty);
        match f.kind {
            ContainerKind::Vec => {
                let add = format_ident!("add_{}", ident.unraw());
                quote! {
                    /// Appends one value to the list.
                    pub fn #add(mut self, value: impl Into<#item>) -> Self {
                        self.#ident.push(value.into());
                        self
                    }

                    /// Replaces the whole list.
                    pub fn #ident<I>(mut self, values: I) -> Self
                    where
                        I: IntoIterator,
                        I::Item: Into<#item>,
                    {
                        self.#ident = values.into_iter().map(Into::into).collect();
                        self
                    }
                }
            }
            _ => quote! {
                pub fn #ident(mut self, value: impl Into<#item>) -> Self {
                    self.#ident = Some(value.into());
                    self
                }
            },
        }
    });

    let build_fields = model.iter().map(|f| {
        let ident = &f.ident;
        match f.kind {
            ContainerKind::Plain => {
                let path = format!("{}.{}", fhir_name, f.fhir_name);
                quote! { #ident: crate::validation_support::require(self.#ident, #path)? }
            }
            _ => quote! { #ident: self.#ident },
        }
    });

    let to_builder_fields = model.iter().map(|f| {
        let ident = &f.ident;
        match f.kind {
            ContainerKind::Plain => quote! { #ident: Some(self.#ident.clone()) },
            _ => quote! { #ident: self.#ident.clone() },
        }
    });

    let getters = model.iter().map(|f| {
        let ident = &f.ident;
        let item = get_item_type(&f.ty);
        match f.kind {
            ContainerKind::Option => quote! {
                pub fn #ident(&self) -> Option<&#item> {
                    self.#ident.as_ref()
                }
            },
            ContainerKind::Vec => quote! {
                pub fn #ident(&self) -> &[#item] {
                    &self.#ident
                }
            },
            ContainerKind::Plain => quote! {
                pub fn #ident(&self) -> &#item {
                    &self.#ident
                }
            },
        }
    });

    let hash_code = fields
        .iter()
        .find(|f| f.skip && f.ident == "hash_memo")
        .map(|_| {
            quote! {
                /// Structural hash, computed on first use and cached.
                pub fn hash_code(&self) -> u64 {
                    self.hash_memo.get_or_compute(self)
                }
            }
        });

    let builder_doc = format!("Builder for [`{name}`].");

    Ok(quote! {
        #[doc = #builder_doc]
        #[derive(Debug, Clone, Default)]
        pub struct #builder_name {
            #(#builder_fields,)*
        }

        impl #builder_name {
            #(#setters)*

            /// Validates the collected values and produces the immutable record.
            pub fn build(self) -> Result<#name, crate::validation_support::ValidationError> {
                let value = #name {
                    #(#build_fields,)*
                    #(#skipped: Default::default(),)*
                };
                crate::validation_support::Validatable::validate_local(&value, #fhir_name)?;
                Ok(value)
            }
        }

        impl #name {
            pub fn builder() -> #builder_name {
                #builder_name::default()
            }

            /// A builder pre-filled with a copy of every field.
            pub fn to_builder(&self) -> #builder_name {
                #builder_name {
                    #(#to_builder_fields,)*
                }
            }

            #(#getters)*

            #hash_code
        }
    })
}
