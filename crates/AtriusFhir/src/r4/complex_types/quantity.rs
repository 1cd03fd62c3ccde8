use serde::{Deserialize, Serialize};
use atrius_macros::{FhirBuilder, FhirPath, FhirValidate, FhirVisit};

use crate::element::Element;
use crate::hash_code::HashCode;
use crate::r4::{Code, Decimal, Extension, FhirString, Uri};
use crate::terminology::QuantityComparator;

/// A measured amount. Also used for the `SimpleQuantity` and `Duration`
/// profiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
#[serde(rename_all = "camelCase")]
#[fhir_type(name = "Quantity")]
#[fhir_invariant(
    key = "qty-3",
    severity = "error",
    human = "If a code for the unit is present, the system SHALL also be present",
    expr = "code.empty() or system.exists()",
    path = "Quantity"
)]
pub struct Quantity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[fhir_binding(
        name = "QuantityComparator",
        strength = "required",
        value_set = "http://hl7.org/fhir/ValueSet/quantity-comparator|4.0.1"
    )]
    comparator: Option<Element<QuantityComparator>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unit: Option<FhirString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    system: Option<Uri>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    code: Option<Code>,
    #[serde(skip)]
    #[fhir_skip]
    hash_memo: HashCode,
}
