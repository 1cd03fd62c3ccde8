use std::fmt;
use crate::evaluation_result::EvaluationResult;
use crate::evaluation_error::EvaluationError;
use crate::traits::IntoEvaluationResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationSeverity {
    Error,
    Warning,
    Information,
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValidationSeverity::Error => "error",
            ValidationSeverity::Warning => "warning",
            ValidationSeverity::Information => "information",
        })
    }
}

/// A single finding from constraint or binding evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    /// Constraint key (`apr-1`) or binding name.
    pub key: &'static str,
    pub severity: ValidationSeverity,
    /// Declared FHIR path (e.g. "InsurancePlan.coverage").
    pub path: &'static str,
    /// Concrete instance path (e.g. "InsurancePlan.coverage[0]").
    pub instance_path: String,
    pub expression: &'static str,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct Invariant {
    pub key: &'static str,
    pub severity: ValidationSeverity,
    pub human: &'static str,
    pub expr: &'static str,
    pub path: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingStrength {
    Required,
    Extensible,
    Preferred,
    Example,
}

impl BindingStrength {
    /// Parses the lowercase FHIR strength code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "required" => Some(BindingStrength::Required),
            "extensible" => Some(BindingStrength::Extensible),
            "preferred" => Some(BindingStrength::Preferred),
            "example" => Some(BindingStrength::Example),
            _ => None,
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            BindingStrength::Required => "required",
            BindingStrength::Extensible => "extensible",
            BindingStrength::Preferred => "preferred",
            BindingStrength::Example => "example",
        }
    }

    /// Whether a code outside the value set is a finding at all.
    pub fn is_checked(&self) -> bool {
        matches!(self, BindingStrength::Required | BindingStrength::Extensible)
    }
}

/// A terminology binding declared on a coded element.
#[derive(Debug, Clone)]
pub struct Binding {
    pub name: &'static str,
    pub strength: BindingStrength,
    /// Canonical URL of the bound value set.
    pub value_set: &'static str,
    pub path: &'static str,
}

/// Something that can evaluate a boolean FHIRPath expression over a focus node.
pub trait FhirPathEngine {
    fn eval_bool(&self, focus: &EvaluationResult, expr: &str) -> Result<bool, EvaluationError>;

    /// Whether `expr` is within what this engine can evaluate. Invariants
    /// whose expression is not supported are skipped rather than reported.
    fn supports(&self, _expr: &str) -> bool {
        true
    }
}

/// Evaluates `invariants` against `focus`, appending one issue per failed or
/// unevaluable constraint. Expressions the engine does not support are
/// skipped.
pub fn evaluate_invariants(
    engine: &dyn FhirPathEngine,
    focus: &EvaluationResult,
    invariants: &[Invariant],
    instance_path: &str,
    issues: &mut Vec<ValidationIssue>,
) {
    for inv in invariants {
        if !engine.supports(inv.expr) {
            continue;
        }
        let message = match engine.eval_bool(focus, inv.expr) {
            Ok(true) => continue,
            Ok(false) => inv.human.to_string(),
            Err(err) => format!("{} (evaluation failed: {})", inv.human, err),
        };
        issues.push(ValidationIssue {
            key: inv.key,
            severity: inv.severity,
            path: inv.path,
            instance_path: instance_path.to_string(),
            expression: inv.expr,
            message,
        });
    }
}

/// Types that can validate themselves using generated invariants.
pub trait FhirValidate: IntoEvaluationResult {
    fn invariants() -> &'static [Invariant]
    where
        Self: Sized;

    fn bindings() -> &'static [Binding]
    where
        Self: Sized,
    {
        &[]
    }

    /// Evaluates this node's invariants and recurses into its children.
    fn collect_issues(
        &self,
        engine: &dyn FhirPathEngine,
        instance_path: &str,
        issues: &mut Vec<ValidationIssue>,
    );

    fn validate_with_engine(&self, engine: &dyn FhirPathEngine) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        self.collect_issues(engine, "", &mut issues);
        issues
    }
}

impl FhirValidate for String {
    fn invariants() -> &'static [Invariant] {
        &[]
    }

    fn collect_issues(&self, _: &dyn FhirPathEngine, _: &str, _: &mut Vec<ValidationIssue>) {}
}

impl<T: FhirValidate> FhirValidate for Box<T> {
    fn invariants() -> &'static [Invariant] {
        T::invariants()
    }

    fn bindings() -> &'static [Binding] {
        T::bindings()
    }

    fn collect_issues(
        &self,
        engine: &dyn FhirPathEngine,
        instance_path: &str,
        issues: &mut Vec<ValidationIssue>,
    ) {
        (**self).collect_issues(engine, instance_path, issues)
    }
}
