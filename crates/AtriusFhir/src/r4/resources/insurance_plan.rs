use serde::{Deserialize, Serialize};
use atrius_macros::{FhirBuilder, FhirPath, FhirValidate, FhirVisit};

use crate::element::Element;
use crate::hash_code::HashCode;
use crate::r4::{
    Address, Code, CodeableConcept, ContactPoint, Extension, FhirString, HumanName, Id, Identifier, Meta,
    Money, Narrative, Period, PositiveInt, Quantity, Reference, Resource, Uri,
};
use crate::terminology::PublicationStatus;

/// A health insurance product and the plans offered under it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
#[serde(rename_all = "camelCase")]
#[fhir_type(name = "InsurancePlan", kind = "resource")]
#[fhir_invariant(
    key = "ipn-1",
    severity = "error",
    human = "The organization SHALL at least have a name or an idendtifier, and possibly more than one",
    expr = "name.exists() or identifier.exists()",
    path = "InsurancePlan"
)]
pub struct InsurancePlan {
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
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    identifier: Vec<Identifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[fhir_binding(
        name = "InsurancePlanStatus",
        strength = "required",
        value_set = "http://hl7.org/fhir/ValueSet/publication-status|4.0.1"
    )]
    status: Option<Element<PublicationStatus>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[fhir_binding(
        name = "InsurancePlanType",
        strength = "example",
        value_set = "http://hl7.org/fhir/ValueSet/insuranceplan-type"
    )]
    r#type: Vec<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<FhirString>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    alias: Vec<FhirString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    period: Option<Period>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[fhir_element(targets = "Organization")]
    owned_by: Option<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[fhir_element(targets = "Organization")]
    administered_by: Option<Reference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[fhir_element(targets = "Location")]
    coverage_area: Vec<Reference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    contact: Vec<InsurancePlanContact>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[fhir_element(targets = "Endpoint")]
    endpoint: Vec<Reference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[fhir_element(targets = "Organization")]
    network: Vec<Reference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    coverage: Vec<InsurancePlanCoverage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    plan: Vec<InsurancePlanPlan>,
    #[serde(skip)]
    #[fhir_skip]
    hash_memo: HashCode,
}

/// An official contact for the insurer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
#[serde(rename_all = "camelCase")]
#[fhir_type(name = "InsurancePlan.contact", kind = "backbone")]
pub struct InsurancePlanContact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    modifier_extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[fhir_binding(
        name = "ContactPartyType",
        strength = "extensible",
        value_set = "http://hl7.org/fhir/ValueSet/contactentity-type"
    )]
    purpose: Option<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<HumanName>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    telecom: Vec<ContactPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    address: Option<Address>,
    #[serde(skip)]
    #[fhir_skip]
    hash_memo: HashCode,
}

/// Coverage details: a kind of coverage and the benefits it includes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
#[serde(rename_all = "camelCase")]
#[fhir_type(name = "InsurancePlan.coverage", kind = "backbone")]
pub struct InsurancePlanCoverage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    modifier_extension: Vec<Extension>,
    r#type: CodeableConcept,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[fhir_element(targets = "Organization")]
    network: Vec<Reference>,
    #[serde(default)]
    #[fhir_element(required)]
    benefit: Vec<InsurancePlanCoverageBenefit>,
    #[serde(skip)]
    #[fhir_skip]
    hash_memo: HashCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
#[serde(rename_all = "camelCase")]
#[fhir_type(name = "InsurancePlan.coverage.benefit", kind = "backbone")]
pub struct InsurancePlanCoverageBenefit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    modifier_extension: Vec<Extension>,
    r#type: CodeableConcept,
    /// Referral requirements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    requirement: Option<FhirString>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    limit: Vec<InsurancePlanCoverageBenefitLimit>,
    #[serde(skip)]
    #[fhir_skip]
    hash_memo: HashCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
#[serde(rename_all = "camelCase")]
#[fhir_type(name = "InsurancePlan.coverage.benefit.limit", kind = "backbone")]
pub struct InsurancePlanCoverageBenefitLimit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    modifier_extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    code: Option<CodeableConcept>,
    #[serde(skip)]
    #[fhir_skip]
    hash_memo: HashCode,
}

/// A plan offered under the product, with its costs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
#[serde(rename_all = "camelCase")]
#[fhir_type(name = "InsurancePlan.plan", kind = "backbone")]
pub struct InsurancePlanPlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    modifier_extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    identifier: Vec<Identifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    r#type: Option<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[fhir_element(targets = "Location")]
    coverage_area: Vec<Reference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[fhir_element(targets = "Organization")]
    network: Vec<Reference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    general_cost: Vec<InsurancePlanPlanGeneralCost>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    specific_cost: Vec<InsurancePlanPlanSpecificCost>,
    #[serde(skip)]
    #[fhir_skip]
    hash_memo: HashCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
#[serde(rename_all = "camelCase")]
#[fhir_type(name = "InsurancePlan.plan.generalCost", kind = "backbone")]
pub struct InsurancePlanPlanGeneralCost {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    modifier_extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    r#type: Option<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    group_size: Option<PositiveInt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cost: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comment: Option<FhirString>,
    #[serde(skip)]
    #[fhir_skip]
    hash_memo: HashCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
#[serde(rename_all = "camelCase")]
#[fhir_type(name = "InsurancePlan.plan.specificCost", kind = "backbone")]
pub struct InsurancePlanPlanSpecificCost {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    modifier_extension: Vec<Extension>,
    category: CodeableConcept,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    benefit: Vec<InsurancePlanPlanSpecificCostBenefit>,
    #[serde(skip)]
    #[fhir_skip]
    hash_memo: HashCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
#[serde(rename_all = "camelCase")]
#[fhir_type(name = "InsurancePlan.plan.specificCost.benefit", kind = "backbone")]
pub struct InsurancePlanPlanSpecificCostBenefit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    modifier_extension: Vec<Extension>,
    r#type: CodeableConcept,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    cost: Vec<InsurancePlanPlanSpecificCostBenefitCost>,
    #[serde(skip)]
    #[fhir_skip]
    hash_memo: HashCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
#[serde(rename_all = "camelCase")]
#[fhir_type(name = "InsurancePlan.plan.specificCost.benefit.cost", kind = "backbone")]
pub struct InsurancePlanPlanSpecificCostBenefitCost {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    modifier_extension: Vec<Extension>,
    r#type: CodeableConcept,
    /// In-network, out-of-network or other.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[fhir_binding(
        name = "BenefitCostApplicability",
        strength = "required",
        value_set = "http://hl7.org/fhir/ValueSet/insuranceplan-applicability|4.0.1"
    )]
    applicability: Option<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    qualifiers: Vec<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<Quantity>,
    #[serde(skip)]
    #[fhir_skip]
    hash_memo: HashCode,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation_support::ValidationError;

    fn concept(text: &str) -> CodeableConcept {
        CodeableConcept::builder().text(text).build().unwrap()
    }

    #[test]
    fn coverage_needs_at_least_one_benefit() {
        let err = InsurancePlanCoverage::builder().r#type(concept("medical")).build().unwrap_err();
        assert_eq!(err, ValidationError::EmptyList { path: "InsurancePlan.coverage.benefit".to_string() });

        let coverage = InsurancePlanCoverage::builder()
            .r#type(concept("medical"))
            .add_benefit(InsurancePlanCoverageBenefit::builder().r#type(concept("primary care")).build().unwrap())
            .build()
            .unwrap();
        assert_eq!(coverage.benefit().len(), 1);
    }

    #[test]
    fn networks_must_be_organizations() {
        let err = InsurancePlan::builder()
            .name("Gold Plus")
            .add_network(Reference::builder().reference("Organization/n1").build().unwrap())
            .add_network(Reference::builder().reference("Location/l1").build().unwrap())
            .build()
            .unwrap_err();
        assert_eq!(err.path(), "InsurancePlan.network[1]");
    }

    #[test]
    fn plan_with_only_extensions_is_allowed_but_empty_limit_is_not() {
        assert_eq!(
            InsurancePlanCoverageBenefitLimit::builder().build().unwrap_err().path(),
            "InsurancePlan.coverage.benefit.limit"
        );
        let plan = InsurancePlanPlan::builder()
            .add_extension(
                Extension::builder()
                    .url("http://example.org/fhir/StructureDefinition/tier")
                    .value(crate::r4::ExtensionValue::Code(Code::from("gold")))
                    .build()
                    .unwrap(),
            )
            .build();
        assert!(plan.is_ok());
    }
}
