use serde::{Deserialize, Serialize};
use atrius_macros::{FhirBuilder, FhirPath, FhirValidate, FhirVisit};

use crate::hash_code::HashCode;
use crate::r4::{CodeableConcept, Coding, Extension, Quantity, Range, Reference};

/// The context a definitional resource is intended for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
#[serde(rename_all = "camelCase")]
#[fhir_type(name = "UsageContext")]
pub struct UsageContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,
    #[fhir_binding(
        name = "UsageContextType",
        strength = "extensible",
        value_set = "http://hl7.org/fhir/ValueSet/usage-context-type"
    )]
    code: Coding,
    #[serde(flatten)]
    value: UsageContextValue,
    #[serde(skip)]
    #[fhir_skip]
    hash_memo: HashCode,
}

/// `UsageContext.value[x]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirVisit, FhirValidate, FhirPath)]
#[fhir_choice(base = "value")]
pub enum UsageContextValue {
    #[serde(rename = "valueCodeableConcept")]
    CodeableConcept(CodeableConcept),
    #[serde(rename = "valueQuantity")]
    Quantity(Quantity),
    #[serde(rename = "valueRange")]
    Range(Range),
    #[serde(rename = "valueReference")]
    Reference(Reference),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_and_value_are_both_required() {
        let err = UsageContext::builder()
            .value(UsageContextValue::CodeableConcept(CodeableConcept::builder().text("adults").build().unwrap()))
            .build()
            .unwrap_err();
        assert_eq!(err.path(), "UsageContext.code");

        let err = UsageContext::builder()
            .code(Coding::from_code("http://terminology.hl7.org/CodeSystem/usage-context-type", "age"))
            .build()
            .unwrap_err();
        assert_eq!(err.path(), "UsageContext.value");
    }
}
