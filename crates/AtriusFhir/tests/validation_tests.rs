use atrius_fhir_lib::r4::{
    AppointmentResponse, CodeableConcept, Coding, InsurancePlan, InsurancePlanCoverage, InsurancePlanCoverageBenefit,
    InsurancePlanCoverageBenefitLimit, InsurancePlanPlan, InsurancePlanPlanSpecificCost,
    InsurancePlanPlanSpecificCostBenefit, InsurancePlanPlanSpecificCostBenefitCost, NutritionOrder,
    NutritionOrderSupplement, Quantity, Reference,
};
use atrius_fhir_lib::date_time::PrecisionDateTime;
use atrius_fhir_lib::terminology::{LocalTerminology, ParticipationStatus, RequestIntent, RequestStatus};
use atrius_fhir_lib::FhirResource;
use atrius_fhirpath_support::{EvaluationError, EvaluationResult, FhirPathEngine, FhirValidate, ValidationSeverity};
use rust_decimal_macros::dec;

/// Understands disjunctions of `path.exists()` / `path.empty()` over direct
/// members of the focus; everything else is reported unsupported.
struct PresenceOnly;

fn term(focus: &EvaluationResult, term: &str) -> Option<bool> {
    if let Some(name) = term.strip_suffix(".exists()") {
        return Some(!focus.get(name).is_empty());
    }
    term.strip_suffix(".empty()").map(|name| focus.get(name).is_empty())
}

impl FhirPathEngine for PresenceOnly {
    fn eval_bool(&self, focus: &EvaluationResult, expr: &str) -> Result<bool, EvaluationError> {
        let mut result = false;
        for part in expr.split(" or ") {
            result |= term(focus, part.trim()).ok_or_else(|| EvaluationError::SyntaxError(part.to_string()))?;
        }
        Ok(result)
    }

    fn supports(&self, expr: &str) -> bool {
        expr.split(" or ").all(|part| term(&EvaluationResult::Empty, part.trim()).is_some())
    }
}

fn reference(value: &str) -> Reference {
    Reference::builder().reference(value).build().unwrap()
}

#[test]
fn failing_invariants_are_reported_with_key_and_path() {
    let response = AppointmentResponse::builder()
        .appointment(reference("Appointment/a1"))
        .participant_status(ParticipationStatus::NeedsAction)
        .build()
        .unwrap();

    let issues = response.validate_constraints(&PresenceOnly);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].key, "apr-1");
    assert_eq!(issues[0].severity, ValidationSeverity::Error);
    assert_eq!(issues[0].instance_path, "AppointmentResponse");
    assert_eq!(issues[0].message, "Either the participantType or actor must be specified");

    let fixed = response.to_builder().actor(reference("Practitioner/pr1")).build().unwrap();
    assert!(fixed.validate_constraints(&PresenceOnly).is_empty());
}

#[test]
fn nutrition_orders_without_a_regimen_get_a_warning() {
    let order = NutritionOrder::builder()
        .status(RequestStatus::Draft)
        .intent(RequestIntent::Proposal)
        .patient(reference("Patient/example"))
        .date_time(PrecisionDateTime::parse("2024-09-17").unwrap())
        .build()
        .unwrap();

    let issues = order.validate_constraints(&PresenceOnly);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].key, "nor-1");
    assert_eq!(issues[0].severity, ValidationSeverity::Warning);

    let with_supplement = order
        .to_builder()
        .add_supplement(NutritionOrderSupplement::builder().product_name("Ensure").build().unwrap())
        .build()
        .unwrap();
    assert!(with_supplement.validate_constraints(&PresenceOnly).is_empty());
}

#[test]
fn nested_invariants_report_instance_paths() {
    let limit = |quantity: Quantity| InsurancePlanCoverageBenefitLimit::builder().value(quantity).build().unwrap();
    let coverage = InsurancePlanCoverage::builder()
        .r#type(CodeableConcept::builder().text("Inpatient").build().unwrap())
        .add_benefit(
            InsurancePlanCoverageBenefit::builder()
                .r#type(CodeableConcept::builder().text("Room").build().unwrap())
                .add_limit(limit(
                    Quantity::builder()
                        .value(dec!(30))
                        .code("d")
                        .system("http://unitsofmeasure.org")
                        .build()
                        .unwrap(),
                ))
                .add_limit(limit(Quantity::builder().value(dec!(2)).code("wk").build().unwrap()))
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();
    let plan = InsurancePlan::builder().name("Gold").add_coverage(coverage).build().unwrap();

    let issues = plan.validate_constraints(&PresenceOnly);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].key, "qty-3");
    assert_eq!(issues[0].path, "Quantity");
    assert_eq!(issues[0].instance_path, "InsurancePlan.coverage[0].benefit[0].limit[1].value");
    assert_eq!(InsurancePlan::invariants()[0].key, "ipn-1");
}

#[test]
fn required_bindings_are_checked_locally() {
    let cost = |code: &str| {
        InsurancePlanPlanSpecificCostBenefitCost::builder()
            .r#type(CodeableConcept::builder().text("copay").build().unwrap())
            .applicability(CodeableConcept::from_coding(Coding::from_code(
                "http://terminology.hl7.org/CodeSystem/applicability",
                code,
            )))
            .build()
            .unwrap()
    };
    let plan = |code: &str| {
        InsurancePlan::builder()
            .name("Gold")
            .add_plan(
                InsurancePlanPlan::builder()
                    .add_specific_cost(
                        InsurancePlanPlanSpecificCost::builder()
                            .category(CodeableConcept::builder().text("Inpatient").build().unwrap())
                            .add_benefit(
                                InsurancePlanPlanSpecificCostBenefit::builder()
                                    .r#type(CodeableConcept::builder().text("Room").build().unwrap())
                                    .add_cost(cost(code))
                                    .build()
                                    .unwrap(),
                            )
                            .build()
                            .unwrap(),
                    )
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap()
    };

    assert!(plan("out-of-network").validate_bindings(&LocalTerminology).is_empty());

    let issues = plan("anywhere").validate_bindings(&LocalTerminology);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].severity, ValidationSeverity::Error);
    assert_eq!(
        issues[0].instance_path,
        "InsurancePlan.plan[0].specificCost[0].benefit[0].cost[0].applicability"
    );
    assert_eq!(issues[0].path, "InsurancePlan.plan.specificCost.benefit.cost.applicability");
}

#[test]
fn hash_codes_are_stable_and_follow_equality() {
    let build = || {
        AppointmentResponse::builder()
            .appointment(reference("Appointment/a1"))
            .actor(reference("Patient/p1"))
            .participant_status(ParticipationStatus::Accepted)
            .build()
            .unwrap()
    };
    let first = build();
    let second = build();

    assert_eq!(first.hash_code(), first.hash_code());
    assert_eq!(first, second);
    assert_eq!(first.hash_code(), second.hash_code());

    let other = first.to_builder().participant_status(ParticipationStatus::Declined).build().unwrap();
    assert_ne!(first, other);
}
