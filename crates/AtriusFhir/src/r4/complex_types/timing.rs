use serde::{Deserialize, Serialize};
use atrius_macros::{FhirBuilder, FhirPath, FhirValidate, FhirVisit};

use crate::element::Element;
use crate::hash_code::HashCode;
use crate::r4::{CodeableConcept, DateTime, Decimal, Extension, Period, PositiveInt, Quantity, Range, Time, UnsignedInt};
use crate::terminology::{DayOfWeek, EventTiming, UnitsOfTime};

/// When an event happens: explicit times, a repeating schedule, or a code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
#[serde(rename_all = "camelCase")]
#[fhir_type(name = "Timing")]
pub struct Timing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    modifier_extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    event: Vec<DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    repeat: Option<TimingRepeat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[fhir_binding(
        name = "TimingAbbreviation",
        strength = "preferred",
        value_set = "http://hl7.org/fhir/ValueSet/timing-abbreviation"
    )]
    code: Option<CodeableConcept>,
    #[serde(skip)]
    #[fhir_skip]
    hash_memo: HashCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
#[serde(rename_all = "camelCase")]
#[fhir_type(name = "Timing.repeat", kind = "backbone")]
#[fhir_invariant(
    key = "tim-1",
    severity = "error",
    human = "if there's a duration, there needs to be duration units",
    expr = "duration.empty() or durationUnit.exists()",
    path = "Timing.repeat"
)]
#[fhir_invariant(
    key = "tim-2",
    severity = "error",
    human = "if there's a period, there needs to be period units",
    expr = "period.empty() or periodUnit.exists()",
    path = "Timing.repeat"
)]
#[fhir_invariant(
    key = "tim-4",
    severity = "error",
    human = "duration SHALL be a non-negative value",
    expr = "duration.exists() implies duration >= 0",
    path = "Timing.repeat"
)]
#[fhir_invariant(
    key = "tim-5",
    severity = "error",
    human = "period SHALL be a non-negative value",
    expr = "period.exists() implies period >= 0",
    path = "Timing.repeat"
)]
pub struct TimingRepeat {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    bounds: Option<TimingRepeatBounds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    count: Option<PositiveInt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    count_max: Option<PositiveInt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration_max: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[fhir_binding(
        name = "UnitsOfTime",
        strength = "required",
        value_set = "http://hl7.org/fhir/ValueSet/units-of-time|4.0.1"
    )]
    duration_unit: Option<Element<UnitsOfTime>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    frequency: Option<PositiveInt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    frequency_max: Option<PositiveInt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    period: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    period_max: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[fhir_binding(
        name = "UnitsOfTime",
        strength = "required",
        value_set = "http://hl7.org/fhir/ValueSet/units-of-time|4.0.1"
    )]
    period_unit: Option<Element<UnitsOfTime>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[fhir_binding(
        name = "DayOfWeek",
        strength = "required",
        value_set = "http://hl7.org/fhir/ValueSet/days-of-week|4.0.1"
    )]
    day_of_week: Vec<Element<DayOfWeek>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    time_of_day: Vec<Time>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[fhir_binding(
        name = "EventTiming",
        strength = "required",
        value_set = "http://hl7.org/fhir/ValueSet/event-timing|4.0.1"
    )]
    when: Vec<Element<EventTiming>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    offset: Option<UnsignedInt>,
    #[serde(skip)]
    #[fhir_skip]
    hash_memo: HashCode,
}

/// `Timing.repeat.bounds[x]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirVisit, FhirValidate, FhirPath)]
#[fhir_choice(base = "bounds")]
pub enum TimingRepeatBounds {
    #[serde(rename = "boundsDuration")]
    Duration(Quantity),
    #[serde(rename = "boundsRange")]
    Range(Range),
    #[serde(rename = "boundsPeriod")]
    Period(Period),
}
