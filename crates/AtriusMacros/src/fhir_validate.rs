use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::parse::Parser;
use syn::spanned::Spanned;
use syn::{Attribute, Data, DeriveInput, LitStr, Meta, MetaList, MetaNameValue};

use crate::field_helpers::{collect_fields, collect_variants, parse_type_attrs, FieldInfo, TypeKind};
use crate::type_helpers::{base_type_name, primitive_checker, ContainerKind};

struct InvariantLit {
    key: LitStr,
    severity: LitStr,
    human: LitStr,
    expr: LitStr,
    path: LitStr,
}

fn parse_fhir_invariant(attr: &Attribute) -> syn::Result<InvariantLit> {
    let Meta::List(MetaList { tokens, .. }) = attr.meta.clone() else {
        return Err(syn::Error::new(attr.span(), "expected #[fhir_invariant(...)]"));
    };

    let parser = syn::punctuated::Punctuated::<MetaNameValue, syn::Token![,]>::parse_terminated;
    let list = parser.parse2(tokens)?;

    let (mut key, mut severity, mut human, mut expr, mut path) = (None, None, None, None, None);
    for nv in list {
        let span = nv.span();
        let ident = nv.path.get_ident().map(|i| i.to_string()).unwrap_or_default();
        let syn::Expr::Lit(syn::ExprLit { lit: syn::Lit::Str(lit), .. }) = nv.value else {
            return Err(syn::Error::new(span, "expected string literal"));
        };
        match ident.as_str() {
            "key" => key = Some(lit),
            "severity" => severity = Some(lit),
            "human" => human = Some(lit),
            "expr" => expr = Some(lit),
            "path" => path = Some(lit),
            other => return Err(syn::Error::new(span, format!("unknown fhir_invariant field: {other}"))),
        }
    }

    let missing = |name: &str| syn::Error::new(attr.span(), format!("missing required fhir_invariant field: {name}"));

    Ok(InvariantLit {
        key: key.ok_or_else(|| missing("key"))?,
        severity: severity.ok_or_else(|| missing("severity"))?,
        human: human.ok_or_else(|| missing("human"))?,
        expr: expr.ok_or_else(|| missing("expr"))?,
        path: path.ok_or_else(|| missing("path"))?,
    })
}

fn invariant_tokens(inv: &InvariantLit) -> TokenStream {
    let InvariantLit { key, severity, human, expr, path } = inv;
    let sev = match severity.value().as_str() {
        "warning" => quote! { atrius_fhirpath_support::validate::ValidationSeverity::Warning },
        "information" => quote! { atrius_fhirpath_support::validate::ValidationSeverity::Information },
        _ => quote! { atrius_fhirpath_support::validate::ValidationSeverity::Error },
    };
    quote! {
        atrius_fhirpath_support::validate::Invariant {
            key: #key,
            severity: #sev,
            human: #human,
            expr: #expr,
            path: #path,
        }
    }
}

/// Runs `body` once per present value of a field, with `value` bound to the
/// item and `__path` to its concrete instance path.
fn for_each_value(f: &FieldInfo, base: TokenStream, body: TokenStream) -> TokenStream {
    let ident = &f.ident;
    let element = &f.fhir_name;
    match f.kind {
        ContainerKind::Option => quote! {
            if let Some(value) = &self.#ident {
                let __path = format!("{}.{}", #base, #element);
                #body
            }
        },
        ContainerKind::Vec => quote! {
            for (__index, value) in self.#ident.iter().enumerate() {
                let __path = format!("{}.{}[{}]", #base, #element, __index);
                #body
            }
        },
        ContainerKind::Plain => quote! {
            {
                let value = &self.#ident;
                let __path = format!("{}.{}", #base, #element);
                #body
            }
        },
    }
}

fn binding_checkable(f: &FieldInfo) -> bool {
    matches!(
        base_type_name(&f.ty).as_deref(),
        Some("CodeableConcept") | Some("Coding") | Some("Code")
    )
}

pub(crate) fn derive(input: &DeriveInput) -> syn::Result<TokenStream> {
    match &input.data {
        Data::Enum(data) => derive_enum(input, data),
        _ => derive_struct(input),
    }
}

fn derive_enum(input: &DeriveInput, data: &syn::DataEnum) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let variants = collect_variants(data)?;
    let idents: Vec<_> = variants.iter().map(|(v, _)| v).collect();

    Ok(quote! {
        impl atrius_fhirpath_support::validate::FhirValidate for #name {
            fn invariants() -> &'static [atrius_fhirpath_support::validate::Invariant] {
                &[]
            }

            fn collect_issues(
                &self,
                engine: &dyn atrius_fhirpath_support::validate::FhirPathEngine,
                instance_path: &str,
                issues: &mut Vec<atrius_fhirpath_support::validate::ValidationIssue>,
            ) {
                match self {
                    #(#name::#idents(value) => atrius_fhirpath_support::validate::FhirValidate::collect_issues(value, engine, instance_path, issues),)*
                }
            }
        }

        impl crate::validation_support::Validatable for #name {
            fn validate_local(&self, path: &str) -> Result<(), crate::validation_support::ValidationError> {
                match self {
                    #(#name::#idents(value) => crate::validation_support::Validatable::validate_local(value, path),)*
                }
            }

            fn validate_at(&self, path: &str) -> Result<(), crate::validation_support::ValidationError> {
                match self {
                    #(#name::#idents(value) => crate::validation_support::Validatable::validate_at(value, path),)*
                }
            }

            fn collect_binding_issues(
                &self,
                path: &str,
                service: &dyn crate::terminology::TerminologyService,
                issues: &mut Vec<atrius_fhirpath_support::validate::ValidationIssue>,
            ) {
                match self {
                    #(#name::#idents(value) => crate::validation_support::Validatable::collect_binding_issues(value, path, service, issues),)*
                }
            }
        }
    })
}

fn derive_struct(input: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let type_attrs = parse_type_attrs(&input.attrs, name)?;
    let fhir_name = &type_attrs.name;
    let fields = collect_fields(&input.data, name.span())?;
    let model: Vec<&FieldInfo> = fields.iter().filter(|f| !f.skip).collect();

    let mut type_invs = Vec::new();
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("fhir_invariant")) {
        type_invs.push(invariant_tokens(&parse_fhir_invariant(attr)?));
    }

    // Binding metadata, one static per bound field.
    let mut binding_elems = Vec::new();
    let mut binding_consts = Vec::new();
    let mut binding_checks = Vec::new();
    for f in &model {
        let Some(b) = &f.binding else { continue };
        let bname = &b.name;
        let value_set = &b.value_set;
        let decl_path = format!("{}.{}", fhir_name, f.fhir_name);
        let strength = format_ident!("{}", {
            let mut s = b.strength.clone();
            s[..1].make_ascii_uppercase();
            s
        });
        let elem = quote! {
            atrius_fhirpath_support::validate::Binding {
                name: #bname,
                strength: atrius_fhirpath_support::validate::BindingStrength::#strength,
                value_set: #value_set,
                path: #decl_path,
            }
        };
        binding_elems.push(elem.clone());

        if !binding_checkable(f) {
            continue;
        }
        let const_name = format_ident!("__FHIR_BINDING_{}", f.fhir_name.to_uppercase());
        binding_consts.push(quote! {
            const #const_name: atrius_fhirpath_support::validate::Binding = #elem;
        });
        binding_checks.push(for_each_value(
            f,
            quote! { path },
            quote! {
                crate::terminology::check_binding(&#const_name, value, &__path, service, issues);
            },
        ));
    }

    // Local rules: cardinality, reference targets, primitive formats.
    let mut local_checks = Vec::new();
    for f in &model {
        let ident = &f.ident;
        let element = &f.fhir_name;
        if f.required && f.kind == ContainerKind::Vec {
            local_checks.push(quote! {
                crate::validation_support::require_non_empty(&self.#ident, &format!("{}.{}", path, #element))?;
            });
        }
        if !f.targets.is_empty() {
            let targets = &f.targets;
            local_checks.push(for_each_value(
                f,
                quote! { path },
                quote! {
                    crate::validation_support::check_reference_type(value, &__path, &[#(#targets),*])?;
                },
            ));
        }
        if let Some(checker) = base_type_name(&f.ty).as_deref().and_then(primitive_checker) {
            let checker = format_ident!("{}", checker);
            local_checks.push(for_each_value(
                f,
                quote! { path },
                quote! {
                    crate::validation_support::#checker(value, &__path)?;
                },
            ));
        }
    }

    if type_attrs.kind != TypeKind::Resource {
        let presence = model.iter().filter(|f| f.ident != "id").map(|f| {
            let ident = &f.ident;
            match f.kind {
                ContainerKind::Option => quote! { self.#ident.is_some() },
                ContainerKind::Vec => quote! { !self.#ident.is_empty() },
                ContainerKind::Plain => quote! { true },
            }
        });
        local_checks.push(quote! {
            crate::validation_support::require_value_or_children(false, false #(|| #presence)*, path)?;
        });
    }

    let recurse_validate: Vec<_> = model
        .iter()
        .map(|f| {
            for_each_value(
                f,
                quote! { path },
                quote! {
                    crate::validation_support::Validatable::validate_at(value, &__path)?;
                },
            )
        })
        .collect();

    let recurse_bindings: Vec<_> = model
        .iter()
        .map(|f| {
            for_each_value(
                f,
                quote! { path },
                quote! {
                    crate::validation_support::Validatable::collect_binding_issues(value, &__path, service, issues);
                },
            )
        })
        .collect();

    let recurse_issues: Vec<_> = model
        .iter()
        .map(|f| {
            for_each_value(
                f,
                quote! { __base },
                quote! {
                    atrius_fhirpath_support::validate::FhirValidate::collect_issues(value, engine, &__path, issues);
                },
            )
        })
        .collect();

    let resource_impl = (type_attrs.kind == TypeKind::Resource).then(|| {
        quote! {
            impl crate::resource::FhirResource for #name {
                fn resource_type(&self) -> &'static str {
                    #fhir_name
                }
            }
        }
    });

    Ok(quote! {
        impl atrius_fhirpath_support::validate::FhirValidate for #name {
            fn invariants() -> &'static [atrius_fhirpath_support::validate::Invariant] {
                &[#(#type_invs),*]
            }

            fn bindings() -> &'static [atrius_fhirpath_support::validate::Binding] {
                &[#(#binding_elems),*]
            }

            fn collect_issues(
                &self,
                engine: &dyn atrius_fhirpath_support::validate::FhirPathEngine,
                instance_path: &str,
                issues: &mut Vec<atrius_fhirpath_support::validate::ValidationIssue>,
            ) {
                use atrius_fhirpath_support::traits::IntoEvaluationResult;

                let __base = if instance_path.is_empty() { #fhir_name } else { instance_path };
                let invariants = <Self as atrius_fhirpath_support::validate::FhirValidate>::invariants();
                if !invariants.is_empty() {
                    let focus = self.to_evaluation_result();
                    atrius_fhirpath_support::validate::evaluate_invariants(engine, &focus, invariants, __base, issues);
                }

                #(#recurse_issues)*
            }
        }

        impl crate::validation_support::Validatable for #name {
            #[allow(unused_variables)]
            fn validate_local(&self, path: &str) -> Result<(), crate::validation_support::ValidationError> {
                #(#local_checks)*
                Ok(())
            }

            fn validate_at(&self, path: &str) -> Result<(), crate::validation_support::ValidationError> {
                crate::validation_support::Validatable::validate_local(self, path)?;
                #(#recurse_validate)*
                Ok(())
            }

            #[allow(unused_variables)]
            fn collect_binding_issues(
                &self,
                path: &str,
                service: &dyn crate::terminology::TerminologyService,
                issues: &mut Vec<atrius_fhirpath_support::validate::ValidationIssue>,
            ) {
                #(#binding_consts)*
                #(#binding_checks)*
                #(#recurse_bindings)*
            }
        }

        #resource_impl
    })
}
