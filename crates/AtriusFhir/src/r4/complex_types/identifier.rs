use serde::{Deserialize, Serialize};
use atrius_macros::{FhirBuilder, FhirPath, FhirValidate, FhirVisit};

use crate::element::Element;
use crate::hash_code::HashCode;
use crate::r4::{CodeableConcept, Extension, FhirString, Period, Reference, Uri};
use crate::terminology::IdentifierUse;

/// A business identifier: a value unique within `system`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
#[serde(rename_all = "camelCase")]
#[fhir_type(name = "Identifier")]
pub struct Identifier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[fhir_binding(
        name = "IdentifierUse",
        strength = "required",
        value_set = "http://hl7.org/fhir/ValueSet/identifier-use|4.0.1"
    )]
    r#use: Option<Element<IdentifierUse>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[fhir_binding(
        name = "IdentifierType",
        strength = "extensible",
        value_set = "http://hl7.org/fhir/ValueSet/identifier-type"
    )]
    r#type: Option<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    system: Option<Uri>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<FhirString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    period: Option<Period>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[fhir_element(targets = "Organization")]
    assigner: Option<Box<Reference>>,
    #[serde(skip)]
    #[fhir_skip]
    hash_memo: HashCode,
}
