use heck::ToLowerCamelCase;
use proc_macro2::Span;
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{Attribute, Data, Fields, Ident, LitStr, Type};

use crate::type_helpers::{container_kind, ContainerKind};

/// What kind of FHIR structure a struct models.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum TypeKind {
    Resource,
    Backbone,
    Datatype,
}

/// Struct-level `#[fhir_type(name = "...", kind = "...")]`.
pub(crate) struct TypeAttrs {
    pub name: String,
    pub kind: TypeKind,
}

/// Field-level `#[fhir_binding(name = "...", strength = "...", value_set = "...")]`.
pub(crate) struct BindingAttr {
    pub name: LitStr,
    pub strength: String,
    pub value_set: LitStr,
}

/// Everything the derives need to know about one named field.
pub(crate) struct FieldInfo {
    pub ident: Ident,
    pub ty: Type,
    pub kind: ContainerKind,
    /// FHIR element name, `#[fhir_element(name = "...")]` or the lowerCamelCase identifier.
    pub fhir_name: String,
    pub required: bool,
    /// Allowed reference target types, `#[fhir_element(targets = "A|B")]`.
    pub targets: Vec<String>,
    /// `#[fhir_skip]`: bookkeeping fields outside the FHIR model.
    pub skip: bool,
    pub binding: Option<BindingAttr>,
}

fn string_value(meta: &syn::meta::ParseNestedMeta) -> syn::Result<LitStr> {
    meta.value()?.parse::<LitStr>()
}

pub(crate) fn parse_type_attrs(attrs: &[Attribute], ident: &Ident) -> syn::Result<TypeAttrs> {
    let mut out = TypeAttrs {
        name: ident.to_string(),
        kind: TypeKind::Datatype,
    };
    for attr in attrs.iter().filter(|a| a.path().is_ident("fhir_type")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                out.name = string_value(&meta)?.value();
            } else if meta.path.is_ident("kind") {
                let lit = string_value(&meta)?;
                out.kind = match lit.value().as_str() {
                    "resource" => TypeKind::Resource,
                    "backbone" => TypeKind::Backbone,
                    "datatype" => TypeKind::Datatype,
                    other => {
                        return Err(syn::Error::new(
                            lit.span(),
                            format!("unknown fhir_type kind `{other}`"),
                        ));
                    }
                };
            } else {
                return Err(meta.error("expected `name` or `kind`"));
            }
            Ok(())
        })?;
    }
    Ok(out)
}

/// `#[fhir_choice(base = "rate")]` on a choice enum.
pub(crate) fn parse_choice_base(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut base = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("fhir_choice")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("base") {
                base = Some(string_value(&meta)?.value());
                Ok(())
            } else {
                Err(meta.error("expected `base`"))
            }
        })?;
    }
    Ok(base)
}

fn parse_field(field: &syn::Field) -> syn::Result<FieldInfo> {
    let ident = field
        .ident
        .clone()
        .ok_or_else(|| syn::Error::new(field.span(), "expected a named field"))?;
    let mut info = FieldInfo {
        fhir_name: ident.unraw().to_string().to_lower_camel_case(),
        ident,
        ty: field.ty.clone(),
        kind: container_kind(&field.ty),
        required: false,
        targets: Vec::new(),
        skip: false,
        binding: None,
    };

    for attr in &field.attrs {
        if attr.path().is_ident("fhir_skip") {
            info.skip = true;
        } else if attr.path().is_ident("fhir_element") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    info.fhir_name = string_value(&meta)?.value();
                } else if meta.path.is_ident("required") {
                    info.required = true;
                } else if meta.path.is_ident("targets") {
                    info.targets = string_value(&meta)?
                        .value()
                        .split('|')
                        .map(|t| t.trim().to_string())
                        .filter(|t| !t.is_empty())
                        .collect();
                } else {
                    return Err(meta.error("expected `name`, `required` or `targets`"));
                }
                Ok(())
            })?;
        } else if attr.path().is_ident("fhir_binding") {
            let mut name = None;
            let mut strength = None;
            let mut value_set = None;
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    name = Some(string_value(&meta)?);
                } else if meta.path.is_ident("strength") {
                    strength = Some(string_value(&meta)?.value());
                } else if meta.path.is_ident("value_set") {
                    value_set = Some(string_value(&meta)?);
                } else {
                    return Err(meta.error("expected `name`, `strength` or `value_set`"));
                }
                Ok(())
            })?;
            let missing =
                |what: &str| syn::Error::new(attr.span(), format!("missing required fhir_binding field: {what}"));
            let strength = strength.ok_or_else(|| missing("strength"))?;
            if !matches!(strength.as_str(), "required" | "extensible" | "preferred" | "example") {
                return Err(syn::Error::new(attr.span(), format!("unknown binding strength `{strength}`")));
            }
            info.binding = Some(BindingAttr {
                name: name.ok_or_else(|| missing("name"))?,
                strength,
                value_set: value_set.ok_or_else(|| missing("value_set"))?,
            });
        }
    }
    Ok(info)
}

/// Parses every named field of a struct; errors for enums, unions and tuple structs.
pub(crate) fn collect_fields(data: &Data, span: Span) -> syn::Result<Vec<FieldInfo>> {
    let Data::Struct(ds) = data else {
        return Err(syn::Error::new(span, "expected a struct"));
    };
    let Fields::Named(fields) = &ds.fields else {
        return Err(syn::Error::new(span, "expected named fields"));
    };
    fields.named.iter().map(parse_field).collect()
}

/// Variants of a choice or resource enum; each must wrap exactly one value.
pub(crate) fn collect_variants(data: &syn::DataEnum) -> syn::Result<Vec<(Ident, Type)>> {
    data.variants
        .iter()
        .map(|v| match &v.fields {
            Fields::Unnamed(f) if f.unnamed.len() == 1 => Ok((v.ident.clone(), f.unnamed[0].ty.clone())),
            _ => Err(syn::Error::new(v.span(), "expected a single-value tuple variant")),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::{parse_quote, DeriveInput};

    #[test]
    fn element_attributes_are_parsed() {
        let input: DeriveInput = parse_quote! {
            struct AppointmentResponse {
                #[fhir_element(required, targets = "Appointment")]
                appointment: Reference,
                #[fhir_element(name = "participantType")]
                participant_type: Vec<CodeableConcept>,
                r#type: Option<CodeableConcept>,
                #[fhir_skip]
                hash_memo: HashCode,
            }
        };
        let fields = collect_fields(&input.data, Span::call_site()).unwrap();

        assert!(fields[0].required);
        assert_eq!(fields[0].targets, vec!["Appointment".to_string()]);
        assert_eq!(fields[1].fhir_name, "participantType");
        assert_eq!(fields[2].fhir_name, "type");
        assert!(fields[3].skip);
    }

    #[test]
    fn unknown_binding_strength_is_rejected() {
        let input: DeriveInput = parse_quote! {
            struct Coded {
                #[fhir_binding(name = "X", strength = "mandatory", value_set = "http://example.org")]
                code: Option<CodeableConcept>,
            }
        };
        assert!(collect_fields(&input.data, Span::call_site()).is_err());
    }

    #[test]
    fn type_attributes_default_to_datatype() {
        let input: DeriveInput = parse_quote! {
            #[fhir_type(kind = "backbone", name = "InsurancePlan.coverage")]
            struct InsurancePlanCoverage {}
        };
        let attrs = parse_type_attrs(&input.attrs, &input.ident).unwrap();
        assert!(attrs.kind == TypeKind::Backbone);
        assert_eq!(attrs.name, "InsurancePlan.coverage");
    }
}
