//! Terminology bindings.
//!
//! Required bindings to small, closed code systems are modelled as enums
//! ([`ParticipationStatus`], [`RequestStatus`], ...), so an out-of-set code
//! cannot be built or parsed. Other bindings are checked on demand against a
//! [`TerminologyService`]; [`LocalTerminology`] answers for the value sets
//! this crate knows and leaves the rest undecided.

mod code_systems;
mod local;

pub use code_systems::*;
pub use local::LocalTerminology;

use thiserror::Error;
use tracing::warn;
use atrius_fhirpath_support::validate::{Binding, BindingStrength, ValidationIssue, ValidationSeverity};

use crate::r4::{Code, CodeableConcept, Coding};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TerminologyError {
    #[error("code '{code}' is not defined in {system}")]
    UnknownCode { system: &'static str, code: String },

    #[error("terminology service unavailable: {0}")]
    Unavailable(String),
}

/// Value-set membership, answered by a terminology server or a local table.
pub trait TerminologyService {
    /// `Some(true)`/`Some(false)` when membership is known, `None` when the
    /// service cannot decide (unknown value set, unknown system).
    ///
    /// `value_set` may carry a `|version` suffix.
    fn member_of(&self, value_set: &str, system: Option<&str>, code: &str) -> Result<Option<bool>, TerminologyError>;
}

/// Anything that carries codes to check against a binding.
pub trait Coded {
    /// `(system, code)` pairs; codes without a value are left out.
    fn codes(&self) -> Vec<(Option<&str>, &str)>;
}

impl Coded for Coding {
    fn codes(&self) -> Vec<(Option<&str>, &str)> {
        match self.code().and_then(|c| c.value()) {
            Some(code) => vec![(self.system().and_then(|s| s.value()).map(String::as_str), code.as_str())],
            None => Vec::new(),
        }
    }
}

impl Coded for CodeableConcept {
    fn codes(&self) -> Vec<(Option<&str>, &str)> {
        self.coding().iter().flat_map(|coding| coding.codes()).collect()
    }
}

impl Coded for Code {
    fn codes(&self) -> Vec<(Option<&str>, &str)> {
        self.value().map(|code| vec![(None, code.as_str())]).unwrap_or_default()
    }
}

/// Checks one coded value against a required or extensible binding.
///
/// The value passes when any of its codes is a member. When every code is
/// known not to be a member the finding is an error for required bindings
/// and a warning for extensible ones. Codes the service cannot decide give a
/// warning. Values without codes (text-only concepts) are not checked.
pub fn check_binding(
    binding: &Binding,
    value: &dyn Coded,
    path: &str,
    service: &dyn TerminologyService,
    issues: &mut Vec<ValidationIssue>,
) {
    if !binding.strength.is_checked() {
        return;
    }
    let codes = value.codes();
    if codes.is_empty() {
        return;
    }

    let mut undecided = Vec::new();
    for (system, code) in &codes {
        match service.member_of(binding.value_set, *system, code) {
            Ok(Some(true)) => return,
            Ok(Some(false)) => {}
            Ok(None) => undecided.push(code.to_string()),
            Err(err) => {
                warn!(path, value_set = binding.value_set, code, %err, "binding check failed");
                undecided.push(code.to_string());
            }
        }
    }

    let listed = codes.iter().map(|(_, c)| *c).collect::<Vec<_>>().join(", ");
    let (severity, message) = if !undecided.is_empty() {
        warn!(path, value_set = binding.value_set, codes = %undecided.join(", "), "binding could not be checked");
        (
            ValidationSeverity::Warning,
            format!("Unable to check code(s) {} against value set {}", undecided.join(", "), binding.value_set),
        )
    } else {
        let severity = match binding.strength {
            BindingStrength::Required => ValidationSeverity::Error,
            _ => ValidationSeverity::Warning,
        };
        (
            severity,
            format!("None of the codes [{listed}] are in the value set {}", binding.value_set),
        )
    };

    issues.push(ValidationIssue {
        key: binding.name,
        severity,
        path: binding.path,
        instance_path: path.to_string(),
        expression: binding.value_set,
        message,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    const APPLICABILITY: Binding = Binding {
        name: "InsurancePlanCostApplicability",
        strength: BindingStrength::Required,
        value_set: "http://hl7.org/fhir/ValueSet/insuranceplan-applicability|4.0.1",
        path: "InsurancePlan.plan.specificCost.benefit.cost.applicability",
    };

    struct Undecided;

    impl TerminologyService for Undecided {
        fn member_of(&self, _: &str, _: Option<&str>, _: &str) -> Result<Option<bool>, TerminologyError> {
            Ok(None)
        }
    }

    fn concept(system: &str, code: &str) -> CodeableConcept {
        CodeableConcept::from_coding(Coding::from_code(system, code))
    }

    #[test]
    fn members_pass() {
        let mut issues = Vec::new();
        let value = concept("http://terminology.hl7.org/CodeSystem/applicability", "in-network");
        check_binding(&APPLICABILITY, &value, "p", &LocalTerminology, &mut issues);
        assert!(issues.is_empty());
    }

    #[test]
    fn non_members_of_required_bindings_are_errors() {
        let mut issues = Vec::new();
        let value = concept("http://terminology.hl7.org/CodeSystem/applicability", "anywhere");
        check_binding(&APPLICABILITY, &value, "InsurancePlan.plan[0]", &LocalTerminology, &mut issues);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, ValidationSeverity::Error);
        assert_eq!(issues[0].key, "InsurancePlanCostApplicability");
        assert_eq!(issues[0].instance_path, "InsurancePlan.plan[0]");
    }

    #[test]
    fn undecidable_codes_are_warnings() {
        let mut issues = Vec::new();
        let value = concept("http://example.org/cs", "x");
        check_binding(&APPLICABILITY, &value, "p", &Undecided, &mut issues);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, ValidationSeverity::Warning);
    }

    #[test]
    fn weak_bindings_and_text_only_concepts_are_skipped() {
        let mut issues = Vec::new();
        let example = Binding { strength: BindingStrength::Example, ..APPLICABILITY };
        check_binding(&example, &concept("http://example.org/cs", "x"), "p", &Undecided, &mut issues);

        let text_only = CodeableConcept::builder().text("walk-in").build().unwrap();
        check_binding(&APPLICABILITY, &text_only, "p", &Undecided, &mut issues);
        assert!(issues.is_empty());
    }
}
