use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use super::{
    AddressType, AddressUse, CodeSystemEnum, ContactPointSystem, ContactPointUse, DayOfWeek, EventTiming,
    IdentifierUse, InvoicePriceComponentType, NameUse, NarrativeStatus, ParticipationStatus, PublicationStatus,
    QuantityComparator, RequestIntent, RequestStatus, TerminologyError, TerminologyService, UnitsOfTime,
};

const CURRENCIES: &str = "http://hl7.org/fhir/ValueSet/currencies";
const CURRENCY_SYSTEM: &str = "urn:iso:std:iso:4217";

static CURRENCY_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{3}$").expect("currency pattern is valid"));

/// Value sets backed by a code-system enum.
fn enum_codes(value_set: &str) -> Option<Vec<(&'static str, &'static str)>> {
    fn of<E: CodeSystemEnum>(value_set: &str) -> Option<Vec<(&'static str, &'static str)>> {
        (E::value_set() == value_set).then(E::codes)
    }

    of::<ParticipationStatus>(value_set)
        .or_else(|| of::<PublicationStatus>(value_set))
        .or_else(|| of::<InvoicePriceComponentType>(value_set))
        .or_else(|| of::<RequestStatus>(value_set))
        .or_else(|| of::<RequestIntent>(value_set))
        .or_else(|| of::<IdentifierUse>(value_set))
        .or_else(|| of::<QuantityComparator>(value_set))
        .or_else(|| of::<ContactPointSystem>(value_set))
        .or_else(|| of::<ContactPointUse>(value_set))
        .or_else(|| of::<NameUse>(value_set))
        .or_else(|| of::<AddressUse>(value_set))
        .or_else(|| of::<AddressType>(value_set))
        .or_else(|| of::<NarrativeStatus>(value_set))
        .or_else(|| of::<UnitsOfTime>(value_set))
        .or_else(|| of::<DayOfWeek>(value_set))
        .or_else(|| of::<EventTiming>(value_set))
}

/// Small value sets bound by the resources in this crate, with the single
/// code system each one draws from.
const TABLES: &[(&str, &str, &[&str])] = &[
    (
        "http://hl7.org/fhir/ValueSet/encounter-participant-type",
        "http://terminology.hl7.org/CodeSystem/v3-ParticipationType",
        &["ADM", "ATND", "CALLBCK", "CON", "DIS", "ESC", "REF", "SPRF", "PPRF", "PART"],
    ),
    (
        "http://hl7.org/fhir/ValueSet/contactentity-type",
        "http://terminology.hl7.org/CodeSystem/contactentity-type",
        &["BILL", "ADMIN", "HR", "PAYOR", "PATINF", "PRESS"],
    ),
    (
        "http://hl7.org/fhir/ValueSet/insuranceplan-applicability",
        "http://terminology.hl7.org/CodeSystem/applicability",
        &["in-network", "out-of-network", "other"],
    ),
    (
        "http://hl7.org/fhir/ValueSet/enteral-route",
        "http://terminology.hl7.org/CodeSystem/v3-RouteOfAdministration",
        &["PO", "EFT", "ENTINSTL", "GT", "NGT", "OGT", "GJT", "JJTINSTL", "OJJ"],
    ),
    (
        "http://hl7.org/fhir/ValueSet/usage-context-type",
        "http://terminology.hl7.org/CodeSystem/usage-context-type",
        &["gender", "age", "focus", "user", "workflow", "task", "venue", "species", "program"],
    ),
];

/// Answers membership for the value sets used by this crate's bindings
/// without a server. Anything else is left undecided.
///
/// A code without a system is matched on the code alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTerminology;

impl TerminologyService for LocalTerminology {
    fn member_of(&self, value_set: &str, system: Option<&str>, code: &str) -> Result<Option<bool>, TerminologyError> {
        let url = value_set.split_once('|').map_or(value_set, |(url, _)| url);
        let system_matches = |expected: &str| system.is_none_or(|s| s == expected);

        let answer = if url == CURRENCIES {
            Some(system_matches(CURRENCY_SYSTEM) && CURRENCY_CODE.is_match(code))
        } else if let Some(codes) = enum_codes(url) {
            Some(codes.iter().any(|(s, c)| *c == code && system_matches(*s)))
        } else {
            TABLES
                .iter()
                .find(|(vs, _, _)| *vs == url)
                .map(|(_, cs, codes)| system_matches(*cs) && codes.contains(&code))
        };

        trace!(value_set = url, ?system, code, ?answer, "local membership lookup");
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_value_sets_are_answered() {
        let local = LocalTerminology;
        let vs = "http://hl7.org/fhir/ValueSet/request-status|4.0.1";
        assert_eq!(local.member_of(vs, None, "on-hold").unwrap(), Some(true));
        assert_eq!(local.member_of(vs, Some("http://hl7.org/fhir/request-status"), "paused").unwrap(), Some(false));
        assert_eq!(local.member_of(vs, Some("http://example.org/other"), "on-hold").unwrap(), Some(false));
    }

    #[test]
    fn currencies_follow_the_iso_shape() {
        let local = LocalTerminology;
        assert_eq!(local.member_of(CURRENCIES, None, "EUR").unwrap(), Some(true));
        assert_eq!(local.member_of(CURRENCIES, None, "euro").unwrap(), Some(false));
    }

    #[test]
    fn unknown_value_sets_are_undecided() {
        let local = LocalTerminology;
        assert_eq!(local.member_of("http://hl7.org/fhir/ValueSet/jurisdiction", None, "US").unwrap(), None);
    }
}
