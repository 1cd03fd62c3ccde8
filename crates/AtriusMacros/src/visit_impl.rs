use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput};

use crate::field_helpers::{collect_fields, collect_variants, parse_type_attrs};
use crate::type_helpers::ContainerKind;

/// Generates `crate::visitor::Visitable`.
///
/// Structs visit their model fields in declaration order; enums (choice
/// types and the resource union) forward to the wrapped value under the
/// caller's element name.
pub(crate) fn generate_visit_impl(input: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;

    if let Data::Enum(data) = &input.data {
        let variants = collect_variants(data)?;
        let idents: Vec<_> = variants.iter().map(|(v, _)| v).collect();
        return Ok(quote! {
            impl crate::visitor::Visitable for #name {
                fn fhir_type_name(&self) -> &'static str {
                    match self {
                        #(#name::#idents(value) => crate::visitor::Visitable::fhir_type_name(value),)*
                    }
                }

                fn as_any(&self) -> &dyn std::any::Any {
                    match self {
                        #(#name::#idents(value) => crate::visitor::Visitable::as_any(value),)*
                    }
                }

                fn accept(
                    &self,
                    element_name: &str,
                    index: Option<usize>,
                    visitor: &mut dyn crate::visitor::Visitor,
                ) {
                    match self {
                        #(#name::#idents(value) => crate::visitor::Visitable::accept(value, element_name, index, visitor),)*
                    }
                }
            }
        });
    }

    let type_attrs = parse_type_attrs(&input.attrs, name)?;
    let fhir_name = &type_attrs.name;
    let fields = collect_fields(&input.data, name.span())?;

    let children = fields.iter().filter(|f| !f.skip).map(|f| {
        let ident = &f.ident;
        let element = &f.fhir_name;
        match f.kind {
            ContainerKind::Option => quote! {
                if let Some(value) = &self.#ident {
                    crate::visitor::Visitable::accept(value, #element, None, visitor);
                }
            },
            ContainerKind::Vec => quote! {
                crate::visitor::accept_list(&self.#ident, #element, visitor);
            },
            ContainerKind::Plain => quote! {
                crate::visitor::Visitable::accept(&self.#ident, #element, None, visitor);
            },
        }
    });

    Ok(quote! {
        impl crate::visitor::Visitable for #name {
            fn fhir_type_name(&self) -> &'static str {
                #fhir_name
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }

            fn accept(
                &self,
                element_name: &str,
                index: Option<usize>,
                visitor: &mut dyn crate::visitor::Visitor,
            ) {
                if !visitor.pre_visit(self) {
                    return;
                }
                visitor.visit_start(element_name, index, self);
                if visitor.visit(element_name, index, self) {
                    #(#children)*
                }
                visitor.visit_end(element_name, index, self);
                visitor.post_visit(self);
            }
        }
    })
}
