use serde::{Deserialize, Serialize};
use atrius_macros::{FhirBuilder, FhirPath, FhirValidate, FhirVisit};

use crate::hash_code::HashCode;
use crate::r4::{Extension, Quantity};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
#[serde(rename_all = "camelCase")]
#[fhir_type(name = "Range")]
#[fhir_invariant(
    key = "rng-2",
    severity = "error",
    human = "If present, low SHALL have a lower value than high",
    expr = "low.empty() or high.empty() or (low <= high)",
    path = "Range"
)]
pub struct Range {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    low: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    high: Option<Quantity>,
    #[serde(skip)]
    #[fhir_skip]
    hash_memo: HashCode,
}
