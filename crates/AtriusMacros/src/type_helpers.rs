//=============================================================================
// Type Analysis Helper Functions
//=============================================================================

use syn::{GenericArgument, Path, PathArguments, Type, TypePath};

fn get_wrapper_inner_type<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    if let Type::Path(TypePath {
        path: Path { segments, .. },
        ..
    }) = ty
        && let Some(segment) = segments.last()
        && segment.ident == wrapper
        && let PathArguments::AngleBracketed(args) = &segment.arguments
        && let Some(GenericArgument::Type(inner_ty)) = args.args.first()
    {
        return Some(inner_ty);
    }
    None
}

/// Extracts `T` from `Option<T>`.
///
/// ```rust,ignore
/// // Option<Reference> -> Some(Reference)
/// // Reference         -> None
/// ```
pub(crate) fn get_option_inner_type(ty: &Type) -> Option<&Type> {
    get_wrapper_inner_type(ty, "Option")
}

/// Extracts `T` from `Vec<T>`.
pub(crate) fn get_vec_inner_type(ty: &Type) -> Option<&Type> {
    get_wrapper_inner_type(ty, "Vec")
}

/// Extracts `T` from `Box<T>`. Boxes break recursive cycles such as
/// `Identifier.assigner -> Reference.identifier`.
pub(crate) fn get_box_inner_type(ty: &Type) -> Option<&Type> {
    get_wrapper_inner_type(ty, "Box")
}

/// Multiplicity of a field as seen from its Rust type.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum ContainerKind {
    Plain,
    Option,
    Vec,
}

pub(crate) fn container_kind(ty: &Type) -> ContainerKind {
    if get_option_inner_type(ty).is_some() {
        ContainerKind::Option
    } else if get_vec_inner_type(ty).is_some() {
        ContainerKind::Vec
    } else {
        ContainerKind::Plain
    }
}

/// The type a field holds once its `Option`/`Vec` wrapper is removed.
pub(crate) fn get_item_type(ty: &Type) -> &Type {
    get_option_inner_type(ty)
        .or_else(|| get_vec_inner_type(ty))
        .unwrap_or(ty)
}

/// Recursively unwraps `Option`, `Vec` and `Box` down to the base type.
pub(crate) fn get_base_type(ty: &Type) -> &Type {
    let mut current_ty = ty;
    while let Some(inner) = get_option_inner_type(current_ty)
        .or_else(|| get_vec_inner_type(current_ty))
        .or_else(|| get_box_inner_type(current_ty))
    {
        current_ty = inner;
    }
    current_ty
}

/// Last path identifier of the base type, e.g. `"PositiveInt"` for
/// `Option<PositiveInt>` or `"Reference"` for `Vec<Box<Reference>>`.
pub(crate) fn base_type_name(ty: &Type) -> Option<String> {
    if let Type::Path(TypePath { path, .. }) = get_base_type(ty) {
        return path.segments.last().map(|s| s.ident.to_string());
    }
    None
}

/// Maps a primitive alias to its FHIR type name, used to tag FHIRPath
/// results. Date and time types already carry their own tagging.
pub(crate) fn fhir_primitive_type_name(alias: &str) -> Option<&'static str> {
    Some(match alias {
        "FhirString" => "string",
        "Code" => "code",
        "Id" => "id",
        "Uri" => "uri",
        "Url" => "url",
        "Canonical" => "canonical",
        "Markdown" => "markdown",
        "Xhtml" => "xhtml",
        "Boolean" => "boolean",
        "Integer" => "integer",
        "PositiveInt" => "positiveInt",
        "UnsignedInt" => "unsignedInt",
        "Decimal" => "decimal",
        _ => return None,
    })
}

/// The validation-support checker applied to values of a primitive alias.
pub(crate) fn primitive_checker(alias: &str) -> Option<&'static str> {
    Some(match alias {
        "FhirString" | "Markdown" => "check_string",
        "Code" => "check_code",
        "Id" => "check_id",
        "Uri" | "Url" | "Canonical" => "check_uri",
        "PositiveInt" => "check_positive_int",
        "UnsignedInt" => "check_unsigned_int",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn container_kinds_are_detected() {
        let opt: Type = parse_quote!(Option<Reference>);
        let list: Type = parse_quote!(Vec<CodeableConcept>);
        let plain: Type = parse_quote!(Element<ParticipationStatus>);

        assert!(container_kind(&opt) == ContainerKind::Option);
        assert!(container_kind(&list) == ContainerKind::Vec);
        assert!(container_kind(&plain) == ContainerKind::Plain);
    }

    #[test]
    fn base_type_name_sees_through_wrappers() {
        let ty: Type = parse_quote!(Option<Box<Reference>>);
        assert_eq!(base_type_name(&ty).as_deref(), Some("Reference"));
        let ty: Type = parse_quote!(Vec<crate::r4::PositiveInt>);
        assert_eq!(base_type_name(&ty).as_deref(), Some("PositiveInt"));
    }

    #[test]
    fn primitive_lookup_tables_agree() {
        assert_eq!(primitive_checker("Canonical"), Some("check_uri"));
        assert_eq!(fhir_primitive_type_name("Canonical"), Some("canonical"));
        assert_eq!(primitive_checker("Date"), None);
    }
}
