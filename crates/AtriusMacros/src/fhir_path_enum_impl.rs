use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;

use crate::field_helpers::{collect_variants, parse_choice_base};

/// Generates `IntoEvaluationResult` for choice enums and the resource union.
///
/// Each variant forwards to its wrapped value. Enums marked with
/// `#[fhir_choice(base = "...")]` also get `ChoiceElement`, whose field names
/// are the base name followed by the variant name (`rate` + `Quantity`).
pub(crate) fn generate_fhirpath_enum_impl(
    input: &DeriveInput,
    data: &syn::DataEnum,
) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let variants = collect_variants(data)?;
    let idents: Vec<_> = variants.iter().map(|(v, _)| v).collect();

    let choice_impl = parse_choice_base(&input.attrs)?.map(|base| {
        let names = idents.iter().map(|v| format!("{base}{v}"));
        quote! {
            impl atrius_fhirpath_support::traits::ChoiceElement for #name {
                fn base_name() -> &'static str {
                    #base
                }

                fn possible_field_names() -> Vec<&'static str> {
                    vec![#(#names),*]
                }
            }
        }
    });

    Ok(quote! {
        impl atrius_fhirpath_support::traits::IntoEvaluationResult for #name {
            fn to_evaluation_result(&self) -> atrius_fhirpath_support::evaluation_result::EvaluationResult {
                match self {
                    #(#name::#idents(value) => atrius_fhirpath_support::traits::IntoEvaluationResult::to_evaluation_result(value),)*
                }
            }
        }

        #choice_impl
    })
}
