use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;

use crate::field_helpers::{collect_fields, parse_type_attrs, TypeKind};
use crate::type_helpers::{base_type_name, fhir_primitive_type_name};

/// Generates `IntoEvaluationResult` and `TypeInfo` for a model struct.
///
/// The result is an object keyed by FHIR element name. Fields that evaluate
/// to `Empty` are left out, primitive aliases are tagged with their FHIR type
/// and resources carry a `resourceType` member.
pub(crate) fn generate_fhirpath_struct_impl(input: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let type_attrs = parse_type_attrs(&input.attrs, name)?;
    let fields = collect_fields(&input.data, name.span())?;

    let field_conversions = fields.iter().filter(|f| !f.skip).map(|f| {
        let ident = &f.ident;
        let key = &f.fhir_name;
        let retag = base_type_name(&f.ty)
            .as_deref()
            .and_then(fhir_primitive_type_name)
            .map(|t| quote! { let field_result = field_result.with_fhir_type(#t); });
        quote! {
            let field_result = self.#ident.to_evaluation_result();
            #retag
            if !field_result.is_empty() {
                map.insert(#key.to_string(), field_result);
            }
        }
    });

    let (type_name, resource_type) = match type_attrs.kind {
        TypeKind::Resource => {
            let rt = &type_attrs.name;
            (
                rt.clone(),
                Some(quote! {
                    map.insert(
                        "resourceType".to_string(),
                        atrius_fhirpath_support::evaluation_result::EvaluationResult::string(#rt.to_string()),
                    );
                }),
            )
        }
        TypeKind::Backbone => ("BackboneElement".to_string(), None),
        TypeKind::Datatype => (type_attrs.name.clone(), None),
    };

    Ok(quote! {
        impl atrius_fhirpath_support::traits::IntoEvaluationResult for #name {
            fn to_evaluation_result(&self) -> atrius_fhirpath_support::evaluation_result::EvaluationResult {
                use atrius_fhirpath_support::traits::IntoEvaluationResult;

                let mut map = std::collections::HashMap::new();
                #resource_type
                #(#field_conversions)*
                atrius_fhirpath_support::evaluation_result::EvaluationResult::typed_object(map, "FHIR", #type_name)
            }
        }

        impl atrius_fhirpath_support::type_info::TypeInfo for #name {
            fn type_namespace() -> &'static str {
                "FHIR"
            }

            fn type_name() -> &'static str {
                #type_name
            }
        }
    })
}
