use serde::{Deserialize, Serialize};
use atrius_macros::{FhirBuilder, FhirPath, FhirValidate, FhirVisit};

use crate::element::Element;
use crate::hash_code::HashCode;
use crate::r4::{
    Code, CodeableConcept, Extension, FhirString, Id, Identifier, Instant, Meta, Narrative, Reference, Resource, Uri,
};
use crate::terminology::ParticipationStatus;

/// A reply to an appointment request from one of its participants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
#[serde(rename_all = "camelCase")]
#[fhir_type(name = "AppointmentResponse", kind = "resource")]
#[fhir_invariant(
    key = "apr-1",
    severity = "error",
    human = "Either the participantType or actor must be specified",
    expr = "participantType.exists() or actor.exists()",
    path = "AppointmentResponse"
)]
pub struct AppointmentResponse {
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
    #[fhir_element(required, targets = "Appointment")]
    appointment: Reference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start: Option<Instant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end: Option<Instant>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[fhir_binding(
        name = "ParticipantType",
        strength = "extensible",
        value_set = "http://hl7.org/fhir/ValueSet/encounter-participant-type"
    )]
    participant_type: Vec<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[fhir_element(
        targets = "Patient|Practitioner|PractitionerRole|RelatedPerson|Device|HealthcareService|Location"
    )]
    actor: Option<Reference>,
    #[fhir_element(required)]
    #[fhir_binding(
        name = "ParticipantStatus",
        strength = "required",
        value_set = "http://hl7.org/fhir/ValueSet/participationstatus|4.0.1"
    )]
    participant_status: Element<ParticipationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comment: Option<FhirString>,
    #[serde(skip)]
    #[fhir_skip]
    hash_memo: HashCode,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation_support::ValidationError;

    fn appointment() -> Reference {
        Reference::builder().reference("Appointment/example").build().unwrap()
    }

    #[test]
    fn appointment_and_status_are_required() {
        let err = AppointmentResponse::builder()
            .participant_status(ParticipationStatus::Accepted)
            .build()
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingRequired { path: "AppointmentResponse.appointment".to_string() });

        let err = AppointmentResponse::builder().appointment(appointment()).build().unwrap_err();
        assert_eq!(err.path(), "AppointmentResponse.participantStatus");
    }

    #[test]
    fn actor_must_be_an_allowed_participant() {
        let err = AppointmentResponse::builder()
            .appointment(appointment())
            .participant_status(ParticipationStatus::Declined)
            .actor(Reference::builder().reference("Organization/o1").build().unwrap())
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::ReferenceTypeNotAllowed { ref path, ref actual, .. }
                if path == "AppointmentResponse.actor" && actual == "Organization"
        ));
    }

    #[test]
    fn appointment_must_point_at_an_appointment() {
        let err = AppointmentResponse::builder()
            .appointment(Reference::builder().reference("Patient/p1").build().unwrap())
            .participant_status(ParticipationStatus::Accepted)
            .build()
            .unwrap_err();
        assert_eq!(err.path(), "AppointmentResponse.appointment");
    }

    #[test]
    fn builder_copies_compare_equal() {
        let response = AppointmentResponse::builder()
            .appointment(appointment())
            .participant_status(ParticipationStatus::Tentative)
            .add_participant_type(CodeableConcept::builder().text("interpreter").build().unwrap())
            .comment("Can only attend after 2pm")
            .build()
            .unwrap();

        let copy = response.to_builder().build().unwrap();
        assert_eq!(copy, response);
        assert_eq!(copy.hash_code(), response.hash_code());

        let changed = response.to_builder().participant_status(ParticipationStatus::Accepted).build().unwrap();
        assert_ne!(changed, response);
        assert_eq!(response.participant_status().value(), Some(&ParticipationStatus::Tentative));
    }
}
