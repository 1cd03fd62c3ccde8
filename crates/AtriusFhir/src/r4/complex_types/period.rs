use serde::{Deserialize, Serialize};
use atrius_macros::{FhirBuilder, FhirPath, FhirValidate, FhirVisit};

use crate::hash_code::HashCode;
use crate::r4::{DateTime, Extension};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
#[serde(rename_all = "camelCase")]
#[fhir_type(name = "Period")]
#[fhir_invariant(
    key = "per-1",
    severity = "error",
    human = "If present, start SHALL have a lower value than end",
    expr = "start.hasValue().not() or end.hasValue().not() or (start <= end)",
    path = "Period"
)]
pub struct Period {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start: Option<DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end: Option<DateTime>,
    #[serde(skip)]
    #[fhir_skip]
    hash_memo: HashCode,
}
