use atrius_fhir_lib::r4::{InsurancePlan, Resource};
use atrius_fhir_lib::terminology::PublicationStatus;
use atrius_fhir_lib::{FhirError, FhirResource, ValidationError};
use serde_json::{json, Value};

fn insurance_plan() -> Value {
    json!({
        "resourceType": "InsurancePlan",
        "id": "gold-plus",
        "status": "active",
        "name": "Gold Plus",
        "alias": ["GP", "Gold"],
        "ownedBy": {"reference": "Organization/acme"},
        "coverage": [{
            "type": {"text": "Inpatient"},
            "benefit": [{
                "type": {"text": "Room and board"},
                "limit": [{"value": {"value": 30, "unit": "d"}}]
            }]
        }],
        "plan": [{
            "generalCost": [{
                "groupSize": 2,
                "cost": {"value": 120.5, "currency": "EUR"}
            }],
            "specificCost": [{
                "category": {"text": "Inpatient"},
                "benefit": [{
                    "type": {"text": "Room and board"},
                    "cost": [{
                        "type": {"text": "copay"},
                        "applicability": {
                            "coding": [{
                                "system": "http://terminology.hl7.org/CodeSystem/applicability",
                                "code": "in-network"
                            }]
                        },
                        "value": {"value": 20, "unit": "%"}
                    }]
                }]
            }]
        }]
    })
}

fn nutrition_order() -> Value {
    json!({
        "resourceType": "NutritionOrder",
        "id": "tube-feed",
        "status": "active",
        "intent": "order",
        "patient": {"reference": "Patient/example"},
        "dateTime": "2024-09-17T08:00:00Z",
        "orderer": {"reference": "Practitioner/example"},
        "enteralFormula": {
            "baseFormulaProductName": "Acme High Protein",
            "administration": [{
                "schedule": {"repeat": {"boundsPeriod": {"start": "2024-09-17"}}},
                "rateQuantity": {"value": 60, "unit": "ml/h"}
            }],
            "administrationInstruction": "Hold feeds 1 hour before procedures"
        }
    })
}

#[test]
fn insurance_plan_survives_a_json_round_trip() {
    let parsed = Resource::from_json_value(insurance_plan()).unwrap();
    let Resource::InsurancePlan(plan) = &parsed else {
        panic!("expected an InsurancePlan, got {}", parsed.resource_type());
    };
    assert_eq!(plan.name().and_then(|n| n.value()).map(String::as_str), Some("Gold Plus"));
    assert_eq!(plan.status().and_then(|s| s.value()), Some(&PublicationStatus::Active));
    assert_eq!(plan.coverage()[0].benefit()[0].limit().len(), 1);

    let json = parsed.to_json_string().unwrap();
    let reparsed = Resource::from_json_str(&json).unwrap();
    assert_eq!(reparsed, parsed);

    let written = reparsed.to_json_value().unwrap();
    assert_eq!(written["resourceType"], "InsurancePlan");
    let cost = &written["plan"][0]["generalCost"][0]["cost"]["value"];
    assert!(cost.is_number(), "decimal written as {cost}");
    assert_eq!(cost, &json!(120.5));
    assert_eq!(written["plan"][0]["generalCost"][0]["groupSize"], json!(2));
}

#[test]
fn decimals_keep_their_written_precision() {
    let text = r#"{
        "resourceType": "ChargeItemDefinition",
        "url": "http://example.org/fhir/ChargeItemDefinition/ebm",
        "status": "active",
        "propertyGroup": [{
            "priceComponent": [{
                "type": "base",
                "factor": 1.50,
                "amount": {"value": 12345678901234.123456789, "currency": "EUR"}
            }]
        }],
        "contained": [{
            "resourceType": "InsurancePlan",
            "id": "p1",
            "name": "Basic",
            "plan": [{"generalCost": [{"cost": {"value": 0.10, "currency": "EUR"}}]}]
        }]
    }"#;
    let parsed = Resource::from_json_str(text).unwrap();
    let json = parsed.to_json_string().unwrap();

    assert!(json.contains(r#""factor":1.50"#), "{json}");
    assert!(json.contains(r#""value":12345678901234.123456789"#), "{json}");
    assert!(json.contains(r#""value":0.10"#), "{json}");
    assert_eq!(Resource::from_json_str(&json).unwrap(), parsed);
}

#[test]
fn choice_elements_keep_their_typed_member_names() {
    let parsed = Resource::from_json_value(nutrition_order()).unwrap();
    let out = parsed.to_json_value().unwrap();

    let administration = &out["enteralFormula"]["administration"][0];
    assert_eq!(administration["rateQuantity"]["unit"], "ml/h");
    assert_eq!(administration["schedule"]["repeat"]["boundsPeriod"]["start"], "2024-09-17");
    assert_eq!(out["dateTime"], "2024-09-17T08:00:00Z");
}

#[test]
fn extended_primitives_use_the_object_form() {
    let mut json = insurance_plan();
    json["name"] = json!({
        "id": "n1",
        "extension": [{"url": "http://example.org/marketing-name", "valueString": "Gold+"}],
        "value": "Gold Plus"
    });

    let parsed = Resource::from_json_value(json).unwrap();
    let Resource::InsurancePlan(plan) = &parsed else { unreachable!() };
    let name = plan.name().unwrap();
    assert_eq!(name.id(), Some("n1"));
    assert_eq!(name.extension().len(), 1);

    let out = parsed.to_json_value().unwrap();
    assert_eq!(out["name"]["value"], "Gold Plus");
    assert_eq!(out["name"]["extension"][0]["valueString"], "Gold+");
}

#[test]
fn contained_resources_are_parsed_and_validated() {
    let mut json = nutrition_order();
    json["contained"] = json!([{"resourceType": "InsurancePlan", "id": "cover", "name": "Basic"}]);
    let parsed = Resource::from_json_value(json.clone()).unwrap();
    let Resource::NutritionOrder(order) = &parsed else { unreachable!() };
    assert!(matches!(order.contained()[0], Resource::InsurancePlan(_)));

    json["contained"][0]["ownedBy"] = json!({"reference": "Patient/example"});
    let err = Resource::from_json_value(json).unwrap_err();
    assert_eq!(err.path(), Some("NutritionOrder.contained[0].ownedBy"));
}

#[test]
fn schema_errors_report_the_json_path() {
    let mut json = nutrition_order();
    json["status"] = json!("paused");
    let err = Resource::from_json_value(json).unwrap_err();

    assert!(matches!(err, FhirError::Json { .. }));
    assert_eq!(err.path(), Some("status"));
    assert!(err.to_string().contains("paused"));
}

#[test]
fn model_rules_are_enforced_on_parse() {
    let mut json = insurance_plan();
    json["coverage"][0]["benefit"] = json!([]);
    let err = Resource::from_json_value(json).unwrap_err();
    assert!(matches!(
        err,
        FhirError::Validation(ValidationError::EmptyList { ref path }) if path == "InsurancePlan.coverage[0].benefit"
    ));

    let mut json = insurance_plan();
    json["plan"][0]["generalCost"][0]["groupSize"] = json!(0);
    let err = Resource::from_json_value(json).unwrap_err();
    assert_eq!(err.path(), Some("InsurancePlan.plan[0].generalCost[0].groupSize"));
}

#[test]
fn conditional_references_are_accepted_on_parse() {
    let mut json = json!({
        "resourceType": "AppointmentResponse",
        "appointment": {"reference": "Appointment?identifier=http://x|123"},
        "actor": {"reference": "Practitioner?identifier=http://x|7"},
        "participantStatus": "accepted"
    });
    let parsed = Resource::from_json_value(json.clone()).unwrap();
    assert_eq!(
        parsed.to_json_value().unwrap()["appointment"]["reference"],
        "Appointment?identifier=http://x|123"
    );

    json["appointment"]["reference"] = json!("Patient?identifier=http://x|123");
    let err = Resource::from_json_value(json).unwrap_err();
    assert!(matches!(
        err,
        FhirError::Validation(ValidationError::ReferenceTypeNotAllowed { ref path, ref actual, .. })
            if path == "AppointmentResponse.appointment" && actual == "Patient"
    ));
}

#[test]
fn resource_type_is_required_and_must_be_modelled() {
    let err = Resource::from_json_str(r#"{"name": "Gold Plus"}"#).unwrap_err();
    assert!(matches!(err, FhirError::MissingResourceType));

    let err = Resource::from_json_str(r#"{"resourceType": "Patient"}"#).unwrap_err();
    assert!(matches!(err, FhirError::UnsupportedResourceType(ref name) if name == "Patient"));

    let err = Resource::from_json_str("{not json").unwrap_err();
    assert!(matches!(err, FhirError::Json { ref path, .. } if path.is_empty()));
}

#[test]
fn built_resources_serialize_with_their_type_tag() {
    let plan = InsurancePlan::builder().name("Bronze").build().unwrap();
    let json = Resource::from(plan).to_json_value().unwrap();
    assert_eq!(json, json!({"resourceType": "InsurancePlan", "name": "Bronze"}));
}
