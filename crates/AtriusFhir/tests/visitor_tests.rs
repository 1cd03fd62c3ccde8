use atrius_fhir_lib::r4::{
    AppointmentResponse, CodeableConcept, InsurancePlan, InsurancePlanCoverage, InsurancePlanCoverageBenefit,
    Reference, Resource,
};
use atrius_fhir_lib::terminology::ParticipationStatus;
use atrius_fhir_lib::visitor::{PathVisitor, ReferenceCollector, Visitable, Visitor};
use atrius_fhir_lib::FhirResource;

fn reference(value: &str) -> Reference {
    Reference::builder().reference(value).build().unwrap()
}

fn text(value: &str) -> CodeableConcept {
    CodeableConcept::builder().text(value).build().unwrap()
}

fn plan() -> InsurancePlan {
    let benefit = |name: &str| InsurancePlanCoverageBenefit::builder().r#type(text(name)).build().unwrap();
    InsurancePlan::builder()
        .name("Gold Plus")
        .owned_by(reference("Organization/acme"))
        .add_network(reference("Organization/net-1"))
        .add_coverage(
            InsurancePlanCoverage::builder()
                .r#type(text("Inpatient"))
                .add_network(reference("Organization/net-2"))
                .add_benefit(benefit("Room"))
                .add_benefit(benefit("Meals"))
                .build()
                .unwrap(),
        )
        .build()
        .unwrap()
}

#[test]
fn paths_follow_list_indices() {
    let mut visitor = PathVisitor::default();
    plan().walk(&mut visitor);
    let paths = visitor.paths();

    assert_eq!(paths[0], "InsurancePlan");
    assert!(paths.contains(&"InsurancePlan.coverage[0].benefit[1].type"));
    assert!(paths.contains(&"InsurancePlan.coverage[0].benefit[1].type.text"));

    let name = visitor.nodes().iter().find(|n| n.path == "InsurancePlan.name").unwrap();
    assert_eq!(name.type_name, "string");
    assert_eq!(name.value.as_deref(), Some("Gold Plus"));
}

#[test]
fn fields_are_visited_in_declaration_order() {
    let response = AppointmentResponse::builder()
        .comment("Running late")
        .participant_status(ParticipationStatus::Tentative)
        .actor(reference("Patient/p1"))
        .appointment(reference("Appointment/a1"))
        .build()
        .unwrap();

    let mut visitor = PathVisitor::default();
    response.walk(&mut visitor);
    let top_level: Vec<_> = visitor
        .paths()
        .into_iter()
        .filter(|p| p.matches('.').count() == 1)
        .collect();

    assert_eq!(
        top_level,
        vec![
            "AppointmentResponse.appointment",
            "AppointmentResponse.actor",
            "AppointmentResponse.participantStatus",
            "AppointmentResponse.comment",
        ]
    );
}

#[test]
fn references_are_collected_with_their_paths() {
    let mut outer = plan().to_builder();
    outer = outer.add_contained(Resource::from(
        InsurancePlan::builder().name("Basic").owned_by(reference("Organization/other")).build().unwrap(),
    ));
    let outer = outer.build().unwrap();

    let mut collector = ReferenceCollector::default();
    outer.walk(&mut collector);
    let found: Vec<_> = collector
        .references()
        .iter()
        .map(|(path, r)| (path.as_str(), r.reference().and_then(|v| v.value()).map(String::as_str)))
        .collect();

    assert_eq!(
        found,
        vec![
            ("InsurancePlan.contained[0].ownedBy", Some("Organization/other")),
            ("InsurancePlan.ownedBy", Some("Organization/acme")),
            ("InsurancePlan.network[0]", Some("Organization/net-1")),
            ("InsurancePlan.coverage[0].network[0]", Some("Organization/net-2")),
        ]
    );
}

/// Stops descending below backbone elements.
#[derive(Default)]
struct ShallowTypes(Vec<&'static str>);

impl Visitor for ShallowTypes {
    fn visit(&mut self, _: &str, _: Option<usize>, node: &dyn Visitable) -> bool {
        self.0.push(node.fhir_type_name());
        !node.fhir_type_name().contains('.')
    }
}

#[test]
fn visit_can_prune_subtrees() {
    let mut visitor = ShallowTypes::default();
    plan().walk(&mut visitor);
    assert!(visitor.0.contains(&"InsurancePlan.coverage"));
    assert!(!visitor.0.contains(&"InsurancePlan.coverage.benefit"));
}
