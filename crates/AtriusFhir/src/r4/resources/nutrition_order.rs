use serde::{Deserialize, Serialize};
use atrius_macros::{FhirBuilder, FhirPath, FhirValidate, FhirVisit};

use crate::element::Element;
use crate::hash_code::HashCode;
use crate::r4::{
    Annotation, Canonical, Code, CodeableConcept, DateTime, Extension, FhirString, Id, Identifier, Meta, Narrative,
    Quantity, Ratio, Reference, Resource, Timing, Uri,
};
use crate::terminology::{RequestIntent, RequestStatus};

/// A request to supply a diet, formula feeding or oral supplement to a
/// patient.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
#[serde(rename_all = "camelCase")]
#[fhir_type(name = "NutritionOrder", kind = "resource")]
#[fhir_invariant(
    key = "nor-1",
    severity = "warning",
    human = "Nutrition Order SHALL contain either Oral Diet , Supplement, or Enteral Formula class",
    expr = "oralDiet.exists() or supplement.exists() or enteralFormula.exists()",
    path = "NutritionOrder"
)]
pub struct NutritionOrder {
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
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    instantiates_canonical: Vec<Canonical>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    instantiates_uri: Vec<Uri>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    instantiates: Vec<Uri>,
    #[fhir_binding(
        name = "NutritionOrderStatus",
        strength = "required",
        value_set = "http://hl7.org/fhir/ValueSet/request-status|4.0.1"
    )]
    status: Element<RequestStatus>,
    #[fhir_binding(
        name = "NutritiionOrderIntent",
        strength = "required",
        value_set = "http://hl7.org/fhir/ValueSet/request-intent|4.0.1"
    )]
    intent: Element<RequestIntent>,
    #[fhir_element(targets = "Patient")]
    patient: Reference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[fhir_element(targets = "Encounter")]
    encounter: Option<Reference>,
    date_time: DateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[fhir_element(targets = "Practitioner|PractitionerRole")]
    orderer: Option<Reference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[fhir_element(targets = "AllergyIntolerance")]
    allergy_intolerance: Vec<Reference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    food_preference_modifier: Vec<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    exclude_food_modifier: Vec<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    oral_diet: Option<NutritionOrderOralDiet>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    supplement: Vec<NutritionOrderSupplement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    enteral_formula: Option<NutritionOrderEnteralFormula>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    note: Vec<Annotation>,
    #[serde(skip)]
    #[fhir_skip]
    hash_memo: HashCode,
}

/// A diet given by mouth.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
#[serde(rename_all = "camelCase")]
#[fhir_type(name = "NutritionOrder.oralDiet", kind = "backbone")]
pub struct NutritionOrderOralDiet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    modifier_extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    r#type: Vec<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    schedule: Vec<Timing>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    nutrient: Vec<NutritionOrderOralDietNutrient>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    texture: Vec<NutritionOrderOralDietTexture>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    fluid_consistency_type: Vec<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    instruction: Option<FhirString>,
    #[serde(skip)]
    #[fhir_skip]
    hash_memo: HashCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
#[serde(rename_all = "camelCase")]
#[fhir_type(name = "NutritionOrder.oralDiet.nutrient", kind = "backbone")]
pub struct NutritionOrderOralDietNutrient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    modifier_extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    modifier: Option<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    amount: Option<Quantity>,
    #[serde(skip)]
    #[fhir_skip]
    hash_memo: HashCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
#[serde(rename_all = "camelCase")]
#[fhir_type(name = "NutritionOrder.oralDiet.texture", kind = "backbone")]
pub struct NutritionOrderOralDietTexture {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    modifier_extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    modifier: Option<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    food_type: Option<CodeableConcept>,
    #[serde(skip)]
    #[fhir_skip]
    hash_memo: HashCode,
}

/// An oral nutritional product given in addition to the diet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
#[serde(rename_all = "camelCase")]
#[fhir_type(name = "NutritionOrder.supplement", kind = "backbone")]
pub struct NutritionOrderSupplement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    modifier_extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    r#type: Option<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    product_name: Option<FhirString>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    schedule: Vec<Timing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    quantity: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    instruction: Option<FhirString>,
    #[serde(skip)]
    #[fhir_skip]
    hash_memo: HashCode,
}

/// Formula fed through a tube (enteral feeding).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
#[serde(rename_all = "camelCase")]
#[fhir_type(name = "NutritionOrder.enteralFormula", kind = "backbone")]
pub struct NutritionOrderEnteralFormula {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    modifier_extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_formula_type: Option<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_formula_product_name: Option<FhirString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    additive_type: Option<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    additive_product_name: Option<FhirString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    caloric_density: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[fhir_binding(
        name = "EnteralRouteOfAdministration",
        strength = "extensible",
        value_set = "http://hl7.org/fhir/ValueSet/enteral-route"
    )]
    routeof_administration: Option<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    administration: Vec<NutritionOrderEnteralFormulaAdministration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_volume_to_deliver: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    administration_instruction: Option<FhirString>,
    #[serde(skip)]
    #[fhir_skip]
    hash_memo: HashCode,
}

/// One step of a feeding regimen: when, how much, and how fast.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
#[serde(rename_all = "camelCase")]
#[fhir_type(name = "NutritionOrder.enteralFormula.administration", kind = "backbone")]
pub struct NutritionOrderEnteralFormulaAdministration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    modifier_extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    schedule: Option<Timing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    quantity: Option<Quantity>,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    rate: Option<NutritionOrderEnteralFormulaAdministrationRate>,
    #[serde(skip)]
    #[fhir_skip]
    hash_memo: HashCode,
}

/// `NutritionOrder.enteralFormula.administration.rate[x]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirVisit, FhirValidate, FhirPath)]
#[fhir_choice(base = "rate")]
pub enum NutritionOrderEnteralFormulaAdministrationRate {
    #[serde(rename = "rateQuantity")]
    Quantity(Quantity),
    #[serde(rename = "rateRatio")]
    Ratio(Ratio),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_time::PrecisionDateTime;
    use rust_decimal_macros::dec;

    fn order() -> NutritionOrderBuilder {
        NutritionOrder::builder()
            .status(RequestStatus::Active)
            .intent(RequestIntent::Order)
            .patient(Reference::builder().reference("Patient/example").build().unwrap())
            .date_time(PrecisionDateTime::parse("2024-09-17T10:00:00+02:00").unwrap())
    }

    #[test]
    fn orders_build_with_required_fields() {
        let built = order()
            .oral_diet(NutritionOrderOralDiet::builder().instruction("Soft foods only").build().unwrap())
            .build()
            .unwrap();
        assert_eq!(built.intent().value(), Some(&RequestIntent::Order));
        assert!(built.oral_diet().is_some());
    }

    #[test]
    fn orderer_must_be_a_practitioner() {
        let err = order()
            .orderer(Reference::builder().reference("Patient/example").build().unwrap())
            .build()
            .unwrap_err();
        assert_eq!(err.path(), "NutritionOrder.orderer");
    }

    #[test]
    fn rate_is_written_under_its_typed_name() {
        let administration = NutritionOrderEnteralFormulaAdministration::builder()
            .rate(NutritionOrderEnteralFormulaAdministrationRate::Quantity(
                Quantity::builder().value(dec!(60)).unit("ml/h").build().unwrap(),
            ))
            .build()
            .unwrap();
        let json = serde_json::to_value(&administration).unwrap();
        assert!(json.get("rateQuantity").is_some());
        assert!(json.get("rate").is_none());
    }
}
