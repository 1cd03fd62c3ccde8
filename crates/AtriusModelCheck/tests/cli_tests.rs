use std::fs;
use std::path::PathBuf;

use atrius_model_check::cli::{run, Args, Outcome};
use clap::Parser;
use serde_json::{json, Value};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, resource: &Value) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, serde_json::to_string_pretty(resource).unwrap()).unwrap();
    path
}

fn exec(argv: &[&str]) -> (anyhow::Result<Outcome>, String) {
    let mut full = vec!["atrius-model-check"];
    full.extend_from_slice(argv);
    let args = Args::try_parse_from(full).unwrap();
    let mut out = Vec::new();
    let outcome = run(&args, &mut out);
    (outcome, String::from_utf8(out).unwrap())
}

fn response(with_actor: bool) -> Value {
    let mut value = json!({
        "resourceType": "AppointmentResponse",
        "id": "example",
        "appointment": { "reference": "Appointment/example" },
        "participantStatus": "accepted"
    });
    if with_actor {
        value["actor"] = json!({ "reference": "Patient/example", "display": "Peter James Chalmers" });
    }
    value
}

fn order_without_diet() -> Value {
    json!({
        "resourceType": "NutritionOrder",
        "status": "active",
        "intent": "order",
        "patient": { "reference": "Patient/example" },
        "dateTime": "2024-09-17"
    })
}

#[test]
fn valid_resource_passes() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "response.json", &response(true));
    let (outcome, text) = exec(&["validate", file.to_str().unwrap()]);

    assert_eq!(outcome.unwrap(), Outcome::Passed);
    assert!(text.ends_with("AppointmentResponse: ok\n"), "{text}");
}

#[test]
fn failed_invariant_fails_the_run() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "response.json", &response(false));
    let (outcome, text) = exec(&["validate", file.to_str().unwrap()]);

    assert_eq!(outcome.unwrap(), Outcome::Failed);
    assert!(text.contains("AppointmentResponse: 1 issue(s)"), "{text}");
    assert!(text.contains("error       apr-1 at AppointmentResponse: Either the participantType or actor"));
}

#[test]
fn constraints_can_be_skipped() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "response.json", &response(false));
    let (outcome, _) = exec(&["validate", "--no-constraints", file.to_str().unwrap()]);
    assert_eq!(outcome.unwrap(), Outcome::Passed);
}

#[test]
fn warnings_fail_only_when_strict() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "order.json", &order_without_diet());
    let path = file.to_str().unwrap();

    let (lenient, text) = exec(&["validate", path]);
    assert_eq!(lenient.unwrap(), Outcome::Passed);
    assert!(text.contains("warning     nor-1 at NutritionOrder"), "{text}");

    let (strict, _) = exec(&["validate", "--strict", path]);
    assert_eq!(strict.unwrap(), Outcome::Failed);
}

#[test]
fn rejected_files_are_reported_alongside_others() {
    let dir = TempDir::new().unwrap();
    let good = write(&dir, "good.json", &response(true));
    let bad = write(&dir, "bad.json", &json!({ "resourceType": "Patient" }));
    let (outcome, text) = exec(&["validate", good.to_str().unwrap(), bad.to_str().unwrap()]);

    assert_eq!(outcome.unwrap(), Outcome::Failed);
    assert!(text.contains("good.json: AppointmentResponse: ok"));
    assert!(text.contains("bad.json: rejected: unsupported resource type 'Patient'"));
}

#[test]
fn json_report_carries_issue_paths() {
    let dir = TempDir::new().unwrap();
    let plan = json!({
        "resourceType": "InsurancePlan",
        "status": "active",
        "name": "Gold",
        "plan": [{
            "specificCost": [{
                "category": { "text": "Medical" },
                "benefit": [{
                    "type": { "text": "Primary care" },
                    "cost": [{
                        "type": { "text": "copay" },
                        "applicability": {
                            "coding": [{ "system": "http://terminology.hl7.org/CodeSystem/applicability", "code": "anywhere" }]
                        }
                    }]
                }]
            }]
        }]
    });
    let file = write(&dir, "plan.json", &plan);
    let (outcome, text) = exec(&["--format", "json", "validate", file.to_str().unwrap()]);

    assert_eq!(outcome.unwrap(), Outcome::Failed);
    let report: Value = serde_json::from_str(&text).unwrap();
    let issue = &report[0]["issues"][0];
    assert_eq!(report[0]["resourceType"], "InsurancePlan");
    assert_eq!(issue["source"], "binding");
    assert_eq!(issue["severity"], "error");
    assert_eq!(issue["instancePath"], "InsurancePlan.plan[0].specificCost[0].benefit[0].cost[0].applicability");
}

#[test]
fn unreadable_files_are_errors() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.json");
    let (outcome, _) = exec(&["validate", missing.to_str().unwrap()]);
    assert!(format!("{:#}", outcome.unwrap_err()).contains("failed to read"));
}

#[test]
fn walk_prints_paths_and_values() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "response.json", &response(true));
    let (outcome, text) = exec(&["walk", file.to_str().unwrap()]);

    assert_eq!(outcome.unwrap(), Outcome::Passed);
    assert!(text.starts_with("AppointmentResponse: AppointmentResponse\n"), "{text}");
    assert!(text.contains("AppointmentResponse.appointment.reference: string = Appointment/example\n"));
    assert!(text.contains("AppointmentResponse.actor.display: string = Peter James Chalmers\n"));
}

#[test]
fn walk_as_json() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "response.json", &response(true));
    let (_, text) = exec(&["walk", "--format", "json", file.to_str().unwrap()]);

    let nodes: Vec<Value> = serde_json::from_str(&text).unwrap();
    assert_eq!(nodes[0]["path"], "AppointmentResponse");
    assert!(nodes.iter().any(|n| n["path"] == "AppointmentResponse.id" && n["value"] == "example"));
}

#[test]
fn walk_reports_rejected_resources_as_failures() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "patient.json", &json!({ "resourceType": "Patient" }));
    let (outcome, text) = exec(&["walk", file.to_str().unwrap()]);

    assert_eq!(outcome.unwrap(), Outcome::Failed);
    assert!(text.contains("patient.json: rejected: unsupported resource type 'Patient'"), "{text}");

    let (outcome, text) = exec(&["walk", "--format", "json", file.to_str().unwrap()]);
    assert_eq!(outcome.unwrap(), Outcome::Failed);
    let rejected: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(rejected["error"], "unsupported resource type 'Patient'");
}

#[test]
fn describe_lists_rules() {
    let (outcome, text) = exec(&["describe", "NutritionOrder"]);
    assert_eq!(outcome.unwrap(), Outcome::Passed);
    assert!(text.starts_with("NutritionOrder\ninvariants:\n"));
    assert!(text.contains("nor-1 (warning) NutritionOrder:"));
    assert!(text.contains("NutritionOrder.enteralFormula.routeofAdministration (extensible) EnteralRouteOfAdministration"));

    let (_, json_text) = exec(&["--format", "json", "describe", "AppointmentResponse"]);
    let description: Value = serde_json::from_str(&json_text).unwrap();
    assert_eq!(description["invariants"][0]["key"], "apr-1");
    assert!(description["bindings"]
        .as_array()
        .unwrap()
        .iter()
        .any(|b| b["name"] == "ParticipantStatus" && b["valueSet"] == "http://hl7.org/fhir/ValueSet/participationstatus|4.0.1"));
}

#[test]
fn describe_rejects_unknown_types() {
    let (outcome, _) = exec(&["describe", "Patient"]);
    assert_eq!(outcome.unwrap_err().to_string(), "unsupported resource type 'Patient'");
}
