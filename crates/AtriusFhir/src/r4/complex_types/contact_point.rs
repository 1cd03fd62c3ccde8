use serde::{Deserialize, Serialize};
use atrius_macros::{FhirBuilder, FhirPath, FhirValidate, FhirVisit};

use crate::element::Element;
use crate::hash_code::HashCode;
use crate::r4::{Extension, FhirString, Period, PositiveInt};
use crate::terminology::{ContactPointSystem, ContactPointUse};

/// Phone, email or other telecommunication detail.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
#[serde(rename_all = "camelCase")]
#[fhir_type(name = "ContactPoint")]
#[fhir_invariant(
    key = "cpt-2",
    severity = "error",
    human = "A system is required if a value is provided.",
    expr = "value.empty() or system.exists()",
    path = "ContactPoint"
)]
pub struct ContactPoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[fhir_binding(
        name = "ContactPointSystem",
        strength = "required",
        value_set = "http://hl7.org/fhir/ValueSet/contact-point-system|4.0.1"
    )]
    system: Option<Element<ContactPointSystem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<FhirString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[fhir_binding(
        name = "ContactPointUse",
        strength = "required",
        value_set = "http://hl7.org/fhir/ValueSet/contact-point-use|4.0.1"
    )]
    r#use: Option<Element<ContactPointUse>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rank: Option<PositiveInt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    period: Option<Period>,
    #[serde(skip)]
    #[fhir_skip]
    hash_memo: HashCode,
}
