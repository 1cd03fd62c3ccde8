use serde::{Deserialize, Serialize};
use atrius_macros::{FhirBuilder, FhirPath, FhirValidate, FhirVisit};

use crate::element::Element;
use crate::hash_code::HashCode;
use crate::r4::{
    Boolean, Canonical, Code, CodeableConcept, ContactDetail, Date, DateTime, Decimal, Extension, FhirString, Id,
    Identifier, Markdown, Meta, Money, Narrative, Period, Reference, Resource, Uri, UsageContext,
};
use crate::terminology::{InvoicePriceComponentType, PublicationStatus};

/// Billing rules for a chargeable item: which prices apply, and when.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
#[serde(rename_all = "camelCase")]
#[fhir_type(name = "ChargeItemDefinition", kind = "resource")]
#[fhir_invariant(
    key = "cid-0",
    severity = "warning",
    human = "Name should be usable as an identifier for the module by machine processing applications such as code generation",
    expr = "name.matches('[A-Z]([A-Za-z0-9_]){0,254}')",
    path = "ChargeItemDefinition"
)]
pub struct ChargeItemDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    meta: Option<Meta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    implicit_rules: Option<Uri>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[fhir_binding(name = "Language", strength = "preferred", value_set = "http://hl7.org/fhir/ValueSet/languages")]
    language: Option<Code>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<Narrative>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    contained: Vec<Resource>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    modifier_extension: Vec<Extension>,
    /// Canonical identifier for this definition.
    url: Uri,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    identifier: Vec<Identifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<FhirString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<FhirString>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    derived_from_uri: Vec<Uri>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    part_of: Vec<Canonical>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    replaces: Vec<Canonical>,
    #[fhir_binding(
        name = "PublicationStatus",
        strength = "required",
        value_set = "http://hl7.org/fhir/ValueSet/publication-status|4.0.1"
    )]
    status: Element<PublicationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    experimental: Option<Boolean>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date: Option<DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    publisher: Option<FhirString>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    contact: Vec<ContactDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<Markdown>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    use_context: Vec<UsageContext>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[fhir_binding(
        name = "Jurisdiction",
        strength = "extensible",
        value_set = "http://hl7.org/fhir/ValueSet/jurisdiction"
    )]
    jurisdiction: Vec<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    copyright: Option<Markdown>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    approval_date: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_review_date: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    effective_period: Option<Period>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[fhir_binding(
        name = "ChargeItemDefinitionCode",
        strength = "example",
        value_set = "http://hl7.org/fhir/ValueSet/chargeitem-billingcodes"
    )]
    code: Option<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[fhir_element(targets = "Medication|Substance|Device")]
    instance: Vec<Reference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    applicability: Vec<ChargeItemDefinitionApplicability>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    property_group: Vec<ChargeItemDefinitionPropertyGroup>,
    #[serde(skip)]
    #[fhir_skip]
    hash_memo: HashCode,
}

/// A condition under which the definition, or a property group, applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
#[serde(rename_all = "camelCase")]
#[fhir_type(name = "ChargeItemDefinition.applicability", kind = "backbone")]
pub struct ChargeItemDefinitionApplicability {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    modifier_extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<FhirString>,
    /// Language of `expression`, e.g. `text/fhirpath`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    language: Option<FhirString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expression: Option<FhirString>,
    #[serde(skip)]
    #[fhir_skip]
    hash_memo: HashCode,
}

/// Price components that apply together under shared conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
#[serde(rename_all = "camelCase")]
#[fhir_type(name = "ChargeItemDefinition.propertyGroup", kind = "backbone")]
pub struct ChargeItemDefinitionPropertyGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    modifier_extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    applicability: Vec<ChargeItemDefinitionApplicability>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    price_component: Vec<ChargeItemDefinitionPropertyGroupPriceComponent>,
    #[serde(skip)]
    #[fhir_skip]
    hash_memo: HashCode,
}

/// One component of the price: a base amount, surcharge, discount, tax, ...
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
#[serde(rename_all = "camelCase")]
#[fhir_type(name = "ChargeItemDefinition.propertyGroup.priceComponent", kind = "backbone")]
pub struct ChargeItemDefinitionPropertyGroupPriceComponent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    modifier_extension: Vec<Extension>,
    #[fhir_binding(
        name = "InvoicePriceComponentType",
        strength = "required",
        value_set = "http://hl7.org/fhir/ValueSet/invoice-priceComponentType|4.0.1"
    )]
    r#type: Element<InvoicePriceComponentType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[fhir_binding(
        name = "ChargeItemDefinitionPriceComponentCode",
        strength = "example",
        value_set = "http://hl7.org/fhir/ValueSet/chargeitem-billingcodes"
    )]
    code: Option<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    factor: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    amount: Option<Money>,
    #[serde(skip)]
    #[fhir_skip]
    hash_memo: HashCode,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn price_components_need_a_type() {
        let err = ChargeItemDefinitionPropertyGroupPriceComponent::builder()
            .factor(dec!(0.8))
            .build()
            .unwrap_err();
        assert_eq!(err.path(), "ChargeItemDefinition.propertyGroup.priceComponent.type");
    }

    #[test]
    fn instances_are_limited_to_products() {
        let definition = ChargeItemDefinition::builder()
            .url("http://example.org/fhir/ChargeItemDefinition/ebm")
            .status(PublicationStatus::Active)
            .add_instance(Reference::builder().reference("Device/12345").build().unwrap())
            .build();
        assert!(definition.is_ok());

        let definition = ChargeItemDefinition::builder()
            .url("http://example.org/fhir/ChargeItemDefinition/ebm")
            .status(PublicationStatus::Active)
            .add_instance(Reference::builder().reference("Patient/1").build().unwrap())
            .build();
        assert_eq!(definition.unwrap_err().path(), "ChargeItemDefinition.instance[0]");
    }

    #[test]
    fn canonical_url_must_not_contain_whitespace() {
        let err = ChargeItemDefinition::builder()
            .url("http://example.org/charge item")
            .status(PublicationStatus::Draft)
            .build()
            .unwrap_err();
        assert_eq!(err.path(), "ChargeItemDefinition.url");
    }
}
