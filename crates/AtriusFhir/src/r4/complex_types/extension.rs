use serde::{Deserialize, Serialize};
use atrius_macros::{FhirBuilder, FhirPath, FhirValidate, FhirVisit};

use crate::hash_code::HashCode;
use crate::r4::{
    Boolean, Canonical, Code, CodeableConcept, Coding, Date, DateTime, Decimal, FhirString, Id, Identifier, Instant,
    Integer, Markdown, Money, Period, PositiveInt, Quantity, Range, Ratio, Reference, Time, UnsignedInt, Uri, Url,
};

/// Additional content defined by an implementation, identified by `url`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
#[serde(rename_all = "camelCase")]
#[fhir_type(name = "Extension")]
#[fhir_invariant(
    key = "ext-1",
    severity = "error",
    human = "Must have either extensions or value[x], not both",
    expr = "extension.exists() != value.exists()",
    path = "Extension"
)]
pub struct Extension {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,
    #[fhir_element(required)]
    url: String,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    value: Option<ExtensionValue>,
    #[serde(skip)]
    #[fhir_skip]
    hash_memo: HashCode,
}

/// `Extension.value[x]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirVisit, FhirValidate, FhirPath)]
#[fhir_choice(base = "value")]
pub enum ExtensionValue {
    #[serde(rename = "valueBoolean")]
    Boolean(Boolean),
    #[serde(rename = "valueCanonical")]
    Canonical(Canonical),
    #[serde(rename = "valueCode")]
    Code(Code),
    #[serde(rename = "valueDate")]
    Date(Date),
    #[serde(rename = "valueDateTime")]
    DateTime(DateTime),
    #[serde(rename = "valueDecimal")]
    Decimal(Decimal),
    #[serde(rename = "valueId")]
    Id(Id),
    #[serde(rename = "valueInstant")]
    Instant(Instant),
    #[serde(rename = "valueInteger")]
    Integer(Integer),
    #[serde(rename = "valueMarkdown")]
    Markdown(Markdown),
    #[serde(rename = "valuePositiveInt")]
    PositiveInt(PositiveInt),
    #[serde(rename = "valueString")]
    String(FhirString),
    #[serde(rename = "valueTime")]
    Time(Time),
    #[serde(rename = "valueUnsignedInt")]
    UnsignedInt(UnsignedInt),
    #[serde(rename = "valueUri")]
    Uri(Uri),
    #[serde(rename = "valueUrl")]
    Url(Url),
    #[serde(rename = "valueCodeableConcept")]
    CodeableConcept(CodeableConcept),
    #[serde(rename = "valueCoding")]
    Coding(Coding),
    #[serde(rename = "valueIdentifier")]
    Identifier(Identifier),
    #[serde(rename = "valueMoney")]
    Money(Money),
    #[serde(rename = "valuePeriod")]
    Period(Period),
    #[serde(rename = "valueQuantity")]
    Quantity(Quantity),
    #[serde(rename = "valueRange")]
    Range(Range),
    #[serde(rename = "valueRatio")]
    Ratio(Ratio),
    #[serde(rename = "valueReference")]
    Reference(Reference),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_is_flattened_under_its_typed_name() {
        let extension = Extension::builder()
            .url("http://example.org/fhir/StructureDefinition/tier")
            .value(ExtensionValue::Code(Code::from("gold")))
            .build()
            .unwrap();

        let json = serde_json::to_value(&extension).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"url": "http://example.org/fhir/StructureDefinition/tier", "valueCode": "gold"})
        );

        let parsed: Extension = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, extension);
    }

    #[test]
    fn url_is_required() {
        let err = Extension::builder().value(ExtensionValue::Boolean(Boolean::from(true))).build().unwrap_err();
        assert_eq!(err.path(), "Extension.url");
    }
}
