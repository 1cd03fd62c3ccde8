//! # Atrius Macros - Procedural Macros for the FHIR Model
//!
//! Derives that generate the repetitive parts of every FHIR model type from
//! the struct definition and a handful of attributes.
//!
//! - **`#[derive(FhirBuilder)]`** - `<Name>Builder`, `builder()`, `to_builder()`,
//!   accessors and the memoized `hash_code()`
//! - **`#[derive(FhirVisit)]`** - pre-order `accept` traversal for visitors
//! - **`#[derive(FhirValidate)]`** - invariant/binding metadata, engine-driven
//!   constraint evaluation, local cardinality/reference/format checks
//! - **`#[derive(FhirPath)]`** - conversion into a FHIRPath evaluation focus
//!
//! The generated code refers to the model crate through `crate::` paths
//! (`crate::validation_support`, `crate::visitor`, `crate::terminology`,
//! `crate::resource`), so these derives are meant for use inside the model
//! crate only.
//!
//! ## Attributes
//!
//! ```ignore
//! #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize,
//!          FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
//! #[fhir_type(name = "AppointmentResponse", kind = "resource")]
//! #[fhir_invariant(key = "apr-1", severity = "error",
//!     human = "Either the participantType or actor must be specified",
//!     expr = "participantType.exists() or actor.exists()",
//!     path = "AppointmentResponse")]
//! pub struct AppointmentResponse {
//!     #[fhir_element(required, targets = "Appointment")]
//!     appointment: Reference,
//!     #[fhir_binding(name = "ParticipantStatus", strength = "required",
//!         value_set = "http://hl7.org/fhir/ValueSet/participationstatus|4.0.1")]
//!     participant_status: Element<ParticipationStatus>,
//!     #[fhir_skip]
//!     hash_memo: HashCode,
//! }
//! ```
//!
//! - `fhir_type(name, kind)`: FHIR name (backbones use their element path)
//!   and `resource`, `backbone` or `datatype` (the default)
//! - `fhir_element(name, required, targets)`: FHIR element name when it is
//!   not the lowerCamelCase identifier, `1..` cardinality, allowed reference
//!   targets separated by `|`
//! - `fhir_binding(name, strength, value_set)`: terminology binding
//! - `fhir_invariant(key, severity, human, expr, path)`: FHIRPath constraint
//! - `fhir_skip`: bookkeeping field outside the FHIR model
//! - `fhir_choice(base)`: on a `[x]` choice enum

extern crate proc_macro;

use proc_macro::TokenStream;
use syn::{parse_macro_input, Data, DeriveInput};

use crate::builder_impl::generate_builder_impl;
use crate::fhir_path_enum_impl::generate_fhirpath_enum_impl;
use crate::fhir_path_field_struct_impl::generate_fhirpath_struct_impl;
use crate::visit_impl::generate_visit_impl;

pub(crate) mod builder_impl;
pub(crate) mod field_helpers;
pub(crate) mod fhir_path_enum_impl;
pub(crate) mod fhir_path_field_struct_impl;
pub(crate) mod fhir_validate;
pub(crate) mod type_helpers;
pub(crate) mod visit_impl;

fn into_stream(result: syn::Result<proc_macro2::TokenStream>) -> TokenStream {
    result.unwrap_or_else(syn::Error::into_compile_error).into()
}

/// Derives the builder and accessor surface of an immutable model struct.
///
/// # Generated Items
///
/// - `<Name>Builder` with one setter per field (`field(value)`), plus
///   `add_field(value)` and a replacing `field(iter)` for lists
/// - `<Name>Builder::build()`, which fails with `ValidationError` on a missing
///   required field and then runs the type's local validation
/// - `<Name>::builder()` and `<Name>::to_builder()`
/// - accessors returning `Option<&T>`, `&T` or `&[T]`
/// - `hash_code()` when the struct has a `#[fhir_skip] hash_memo: HashCode` field
#[proc_macro_derive(FhirBuilder, attributes(fhir_type, fhir_element, fhir_skip))]
pub fn fhir_builder_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    into_stream(generate_builder_impl(&input))
}

/// Derives `Visitable`: `accept(name, index, visitor)` walks fields in
/// declaration order, list items carrying their index.
#[proc_macro_derive(FhirVisit, attributes(fhir_type, fhir_element, fhir_skip))]
pub fn fhir_visit_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    into_stream(generate_visit_impl(&input))
}

/// Derives `FhirValidate` and `Validatable`, and `FhirResource` for
/// `kind = "resource"` structs.
///
/// Constraint evaluation is left to the `FhirPathEngine` passed in; the
/// generated code only decides which node each invariant is evaluated on and
/// what instance path issues are reported under.
#[proc_macro_derive(
    FhirValidate,
    attributes(fhir_type, fhir_element, fhir_skip, fhir_invariant, fhir_binding)
)]
pub fn derive_fhir_validate(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    into_stream(fhir_validate::derive(&input))
}

/// Derives `IntoEvaluationResult` (and `TypeInfo` for structs).
///
/// ```rust,ignore
/// let focus = plan.to_evaluation_result();
/// // {
/// //   "resourceType": "InsurancePlan",
/// //   "name": "Gold Plus",
/// //   "coverage": [ ... ]
/// // }
/// ```
///
/// Fields that are `None` or empty are omitted, so `exists()` in an engine
/// sees exactly what was set.
#[proc_macro_derive(FhirPath, attributes(fhir_type, fhir_element, fhir_skip, fhir_choice))]
pub fn fhir_path_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    into_stream(match &input.data {
        Data::Enum(data) => generate_fhirpath_enum_impl(&input, data),
        Data::Struct(_) => generate_fhirpath_struct_impl(&input),
        Data::Union(_) => Err(syn::Error::new(
            input.ident.span(),
            "FhirPath derive macro does not support unions",
        )),
    })
}
