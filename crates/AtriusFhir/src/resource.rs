use atrius_fhirpath_support::validate::{FhirPathEngine, FhirValidate, ValidationIssue};

use crate::terminology::TerminologyService;
use crate::validation_support::{Validatable, ValidationError};
use crate::visitor::{Visitable, Visitor};

/// Behaviour shared by every top-level resource.
///
/// Implemented by the `FhirValidate` derive for structs declared with
/// `kind = "resource"`, and by [`crate::r4::Resource`].
pub trait FhirResource: Validatable + Visitable + FhirValidate {
    /// The `resourceType` name, e.g. `"InsurancePlan"`.
    fn resource_type(&self) -> &'static str;

    /// Re-runs the structural checks `build()` performs, over the whole tree.
    fn validate(&self) -> Result<(), ValidationError> {
        self.validate_at(self.resource_type())
    }

    /// Evaluates every invariant in the tree with `engine`.
    fn validate_constraints(&self, engine: &dyn FhirPathEngine) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        self.collect_issues(engine, self.resource_type(), &mut issues);
        issues
    }

    /// Checks required and extensible bindings with `service`.
    fn validate_bindings(&self, service: &dyn TerminologyService) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        self.collect_binding_issues(self.resource_type(), service, &mut issues);
        issues
    }

    /// Walks the tree pre-order, starting at the resource itself.
    fn walk(&self, visitor: &mut dyn Visitor) {
        self.accept(self.resource_type(), None, visitor);
    }
}
