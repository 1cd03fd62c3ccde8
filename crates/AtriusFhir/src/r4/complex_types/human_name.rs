use serde::{Deserialize, Serialize};
use atrius_macros::{FhirBuilder, FhirPath, FhirValidate, FhirVisit};

use crate::element::Element;
use crate::hash_code::HashCode;
use crate::r4::{Extension, FhirString, Period};
use crate::terminology::NameUse;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
#[serde(rename_all = "camelCase")]
#[fhir_type(name = "HumanName")]
pub struct HumanName {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[fhir_binding(name = "NameUse", strength = "required", value_set = "http://hl7.org/fhir/ValueSet/name-use|4.0.1")]
    r#use: Option<Element<NameUse>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<FhirString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    family: Option<FhirString>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    given: Vec<FhirString>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    prefix: Vec<FhirString>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    suffix: Vec<FhirString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    period: Option<Period>,
    #[serde(skip)]
    #[fhir_skip]
    hash_memo: HashCode,
}
