use serde::{Deserialize, Serialize};
use atrius_macros::{FhirBuilder, FhirPath, FhirValidate, FhirVisit};

use crate::hash_code::HashCode;
use crate::r4::{Extension, Quantity};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
#[serde(rename_all = "camelCase")]
#[fhir_type(name = "Ratio")]
#[fhir_invariant(
    key = "rat-1",
    severity = "error",
    human = "Numerator and denominator SHALL both be present, or both are absent. If both are absent, there SHALL be some extension present",
    expr = "(numerator.empty() xor denominator.exists()) and (numerator.exists() or extension.exists())",
    path = "Ratio"
)]
pub struct Ratio {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    numerator: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    denominator: Option<Quantity>,
    #[serde(skip)]
    #[fhir_skip]
    hash_memo: HashCode,
}
