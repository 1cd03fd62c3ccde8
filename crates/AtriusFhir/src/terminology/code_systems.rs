use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use atrius_fhirpath_support::evaluation_result::EvaluationResult;
use atrius_fhirpath_support::traits::IntoEvaluationResult;

use crate::r4::{CodeableConcept, Coding};
use crate::terminology::TerminologyError;
use crate::visitor::{AsPrimitive, PrimitiveValue};

/// Defines a closed code system used by a required binding.
///
/// A variant may name its own system with `in "..."` when the value set
/// draws from more than one code system.
macro_rules! code_system {
    (@system $default:literal) => { $default };
    (@system $default:literal, $own:literal) => { $own };

    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            system: $system:literal,
            value_set: $value_set:literal,
            $( $variant:ident => $code:literal $(in $variant_system:literal)? ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $code)]
                $variant,
            )+
        }

        impl $name {
            /// Canonical URL of the code system.
            pub const SYSTEM: &'static str = $system;
            /// Canonical URL of the value set holding every code.
            pub const VALUE_SET: &'static str = $value_set;
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_code(&self) -> &'static str {
                match self {
                    $($name::$variant => $code,)+
                }
            }

            pub fn system(&self) -> &'static str {
                match self {
                    $($name::$variant => code_system!(@system $system $(, $variant_system)?),)+
                }
            }

            pub fn to_coding(&self) -> Coding {
                Coding::from_code(self.system(), self.as_code())
            }

            pub fn to_codeable_concept(&self) -> CodeableConcept {
                CodeableConcept::from_coding(self.to_coding())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_code())
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TerminologyError;

            fn try_from(code: &str) -> Result<Self, Self::Error> {
                match code {
                    $($code => Ok($name::$variant),)+
                    other => Err(TerminologyError::UnknownCode {
                        system: $system,
                        code: other.to_string(),
                    }),
                }
            }
        }

        impl FromStr for $name {
            type Err = TerminologyError;

            fn from_str(code: &str) -> Result<Self, Self::Err> {
                Self::try_from(code)
            }
        }

        impl IntoEvaluationResult for $name {
            fn to_evaluation_result(&self) -> EvaluationResult {
                EvaluationResult::fhir_string(self.as_code().to_string(), "code")
            }
        }

        impl AsPrimitive for $name {
            const FHIR_TYPE: &'static str = "code";

            fn as_primitive(&self) -> PrimitiveValue<'_> {
                PrimitiveValue::Code(self.as_code())
            }
        }

        impl CodeSystemEnum for $name {
            fn value_set() -> &'static str {
                $name::VALUE_SET
            }

            fn codes() -> Vec<(&'static str, &'static str)> {
                $name::ALL.iter().map(|c| (c.system(), c.as_code())).collect()
            }
        }
    };
}

/// Access to a code-system enum's value set without naming the enum.
pub trait CodeSystemEnum {
    fn value_set() -> &'static str;

    /// Every `(system, code)` pair in the value set.
    fn codes() -> Vec<(&'static str, &'static str)>;
}

code_system! {
    /// The participation status of an appointment participant.
    pub enum ParticipationStatus {
        system: "http://hl7.org/fhir/participationstatus",
        value_set: "http://hl7.org/fhir/ValueSet/participationstatus",
        Accepted => "accepted",
        Declined => "declined",
        Tentative => "tentative",
        NeedsAction => "needs-action",
    }
}

code_system! {
    /// Lifecycle status of a definitional artifact.
    pub enum PublicationStatus {
        system: "http://hl7.org/fhir/publication-status",
        value_set: "http://hl7.org/fhir/ValueSet/publication-status",
        Draft => "draft",
        Active => "active",
        Retired => "retired",
        Unknown => "unknown",
    }
}

code_system! {
    /// How a price component contributes to a total.
    pub enum InvoicePriceComponentType {
        system: "http://hl7.org/fhir/invoice-priceComponentType",
        value_set: "http://hl7.org/fhir/ValueSet/invoice-priceComponentType",
        Base => "base",
        Surcharge => "surcharge",
        Deduction => "deduction",
        Discount => "discount",
        Tax => "tax",
        Informational => "informational",
    }
}

code_system! {
    pub enum RequestStatus {
        system: "http://hl7.org/fhir/request-status",
        value_set: "http://hl7.org/fhir/ValueSet/request-status",
        Draft => "draft",
        Active => "active",
        OnHold => "on-hold",
        Revoked => "revoked",
        Completed => "completed",
        EnteredInError => "entered-in-error",
        Unknown => "unknown",
    }
}

code_system! {
    pub enum RequestIntent {
        system: "http://hl7.org/fhir/request-intent",
        value_set: "http://hl7.org/fhir/ValueSet/request-intent",
        Proposal => "proposal",
        Plan => "plan",
        Directive => "directive",
        Order => "order",
        OriginalOrder => "original-order",
        ReflexOrder => "reflex-order",
        FillerOrder => "filler-order",
        InstanceOrder => "instance-order",
        Option => "option",
    }
}

code_system! {
    pub enum IdentifierUse {
        system: "http://hl7.org/fhir/identifier-use",
        value_set: "http://hl7.org/fhir/ValueSet/identifier-use",
        Usual => "usual",
        Official => "official",
        Temp => "temp",
        Secondary => "secondary",
        Old => "old",
    }
}

code_system! {
    /// How a measured value relates to the stated quantity.
    pub enum QuantityComparator {
        system: "http://hl7.org/fhir/quantity-comparator",
        value_set: "http://hl7.org/fhir/ValueSet/quantity-comparator",
        LessThan => "<",
        LessOrEqual => "<=",
        GreaterOrEqual => ">=",
        GreaterThan => ">",
    }
}

code_system! {
    pub enum ContactPointSystem {
        system: "http://hl7.org/fhir/contact-point-system",
        value_set: "http://hl7.org/fhir/ValueSet/contact-point-system",
        Phone => "phone",
        Fax => "fax",
        Email => "email",
        Pager => "pager",
        Url => "url",
        Sms => "sms",
        Other => "other",
    }
}

code_system! {
    pub enum ContactPointUse {
        system: "http://hl7.org/fhir/contact-point-use",
        value_set: "http://hl7.org/fhir/ValueSet/contact-point-use",
        Home => "home",
        Work => "work",
        Temp => "temp",
        Old => "old",
        Mobile => "mobile",
    }
}

code_system! {
    pub enum NameUse {
        system: "http://hl7.org/fhir/name-use",
        value_set: "http://hl7.org/fhir/ValueSet/name-use",
        Usual => "usual",
        Official => "official",
        Temp => "temp",
        Nickname => "nickname",
        Anonymous => "anonymous",
        Old => "old",
        Maiden => "maiden",
    }
}

code_system! {
    pub enum AddressUse {
        system: "http://hl7.org/fhir/address-use",
        value_set: "http://hl7.org/fhir/ValueSet/address-use",
        Home => "home",
        Work => "work",
        Temp => "temp",
        Old => "old",
        Billing => "billing",
    }
}

code_system! {
    pub enum AddressType {
        system: "http://hl7.org/fhir/address-type",
        value_set: "http://hl7.org/fhir/ValueSet/address-type",
        Postal => "postal",
        Physical => "physical",
        Both => "both",
    }
}

code_system! {
    pub enum NarrativeStatus {
        system: "http://hl7.org/fhir/narrative-status",
        value_set: "http://hl7.org/fhir/ValueSet/narrative-status",
        Generated => "generated",
        Extensions => "extensions",
        Additional => "additional",
        Empty => "empty",
    }
}

code_system! {
    /// UCUM units used by `Timing.repeat`.
    pub enum UnitsOfTime {
        system: "http://unitsofmeasure.org",
        value_set: "http://hl7.org/fhir/ValueSet/units-of-time",
        Second => "s",
        Minute => "min",
        Hour => "h",
        Day => "d",
        Week => "wk",
        Month => "mo",
        Year => "a",
    }
}

code_system! {
    pub enum DayOfWeek {
        system: "http://hl7.org/fhir/days-of-week",
        value_set: "http://hl7.org/fhir/ValueSet/days-of-week",
        Mon => "mon",
        Tue => "tue",
        Wed => "wed",
        Thu => "thu",
        Fri => "fri",
        Sat => "sat",
        Sun => "sun",
    }
}

code_system! {
    /// Real-world events a timing schedule is anchored to.
    pub enum EventTiming {
        system: "http://hl7.org/fhir/event-timing",
        value_set: "http://hl7.org/fhir/ValueSet/event-timing",
        Morning => "MORN",
        EarlyMorning => "MORN.early",
        LateMorning => "MORN.late",
        Noon => "NOON",
        Afternoon => "AFT",
        EarlyAfternoon => "AFT.early",
        LateAfternoon => "AFT.late",
        Evening => "EVE",
        EarlyEvening => "EVE.early",
        LateEvening => "EVE.late",
        Night => "NIGHT",
        AfterSleep => "PHS",
        BeforeSleep => "HS" in "http://terminology.hl7.org/CodeSystem/v3-TimingEvent",
        Wake => "WAKE" in "http://terminology.hl7.org/CodeSystem/v3-TimingEvent",
        Meal => "C" in "http://terminology.hl7.org/CodeSystem/v3-TimingEvent",
        Breakfast => "CM" in "http://terminology.hl7.org/CodeSystem/v3-TimingEvent",
        Lunch => "CD" in "http://terminology.hl7.org/CodeSystem/v3-TimingEvent",
        Dinner => "CV" in "http://terminology.hl7.org/CodeSystem/v3-TimingEvent",
        BeforeMeal => "AC" in "http://terminology.hl7.org/CodeSystem/v3-TimingEvent",
        BeforeBreakfast => "ACM" in "http://terminology.hl7.org/CodeSystem/v3-TimingEvent",
        BeforeLunch => "ACD" in "http://terminology.hl7.org/CodeSystem/v3-TimingEvent",
        BeforeDinner => "ACV" in "http://terminology.hl7.org/CodeSystem/v3-TimingEvent",
        AfterMeal => "PC" in "http://terminology.hl7.org/CodeSystem/v3-TimingEvent",
        AfterBreakfast => "PCM" in "http://terminology.hl7.org/CodeSystem/v3-TimingEvent",
        AfterLunch => "PCD" in "http://terminology.hl7.org/CodeSystem/v3-TimingEvent",
        AfterDinner => "PCV" in "http://terminology.hl7.org/CodeSystem/v3-TimingEvent",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_strings() {
        assert_eq!(RequestStatus::try_from("on-hold").unwrap(), RequestStatus::OnHold);
        assert_eq!(RequestStatus::OnHold.to_string(), "on-hold");
        assert_eq!("<=".parse::<QuantityComparator>().unwrap(), QuantityComparator::LessOrEqual);
    }

    #[test]
    fn unknown_codes_name_the_system() {
        let err = ParticipationStatus::try_from("maybe").unwrap_err();
        assert_eq!(
            err.to_string(),
            "code 'maybe' is not defined in http://hl7.org/fhir/participationstatus"
        );
    }

    #[test]
    fn serde_uses_the_code() {
        let json = serde_json::to_string(&InvoicePriceComponentType::Surcharge).unwrap();
        assert_eq!(json, "\"surcharge\"");
        let parsed: EventTiming = serde_json::from_str("\"MORN.early\"").unwrap();
        assert_eq!(parsed, EventTiming::EarlyMorning);
    }

    #[test]
    fn variants_may_come_from_another_system() {
        assert_eq!(EventTiming::Noon.system(), "http://hl7.org/fhir/event-timing");
        assert_eq!(EventTiming::BeforeMeal.system(), "http://terminology.hl7.org/CodeSystem/v3-TimingEvent");
    }

    #[test]
    fn codings_carry_system_and_code() {
        let coding = ParticipationStatus::NeedsAction.to_coding();
        assert_eq!(coding.system().and_then(|s| s.value()).map(String::as_str), Some(ParticipationStatus::SYSTEM));
        assert_eq!(coding.code().and_then(|c| c.value()).map(String::as_str), Some("needs-action"));

        let concept = ParticipationStatus::NeedsAction.to_codeable_concept();
        assert_eq!(concept.coding(), &[coding]);
    }
}
