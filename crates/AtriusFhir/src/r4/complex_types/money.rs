use serde::{Deserialize, Serialize};
use atrius_macros::{FhirBuilder, FhirPath, FhirValidate, FhirVisit};

use crate::hash_code::HashCode;
use crate::r4::{Code, Decimal, Extension};

/// An amount of economic utility in some recognized currency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
#[serde(rename_all = "camelCase")]
#[fhir_type(name = "Money")]
pub struct Money {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<Decimal>,
    /// ISO 4217 currency code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[fhir_binding(
        name = "CurrencyCode",
        strength = "required",
        value_set = "http://hl7.org/fhir/ValueSet/currencies|4.0.1"
    )]
    currency: Option<Code>,
    #[serde(skip)]
    #[fhir_skip]
    hash_memo: HashCode,
}
