//! A small [`FhirPathEngine`] for the model's own invariants.
//!
//! Evaluation follows FHIRPath collection semantics: every step yields a
//! flattened collection, `and`/`or`/`xor`/`implies` use three-valued logic
//! with the empty collection as unknown, and an empty final result counts
//! as `false`. Expressions outside [`crate::expression`]'s grammar are
//! reported as unsupported, so invariants using them are skipped.

use atrius_fhirpath_support::{EvaluationError, EvaluationResult, FhirPathEngine};
use tracing::trace;

use crate::expression::{self, Expression, Literal, FUNCTIONS};

type Collection = Vec<EvaluationResult>;

#[derive(Debug, Clone, Copy, Default)]
pub struct PresenceEngine;

impl PresenceEngine {
    pub fn new() -> Self {
        Self
    }

    /// Evaluates `expr` with `focus` as its input collection.
    pub fn evaluate(&self, focus: &EvaluationResult, expr: &str) -> Result<EvaluationResult, EvaluationError> {
        let parsed = expression::parse(expr)
            .map_err(|msg| EvaluationError::SyntaxError(format!("Invalid FHIRPath: {expr}. {msg}")))?;
        let result = evaluate(&parsed, &flatten(focus))?;
        Ok(match result.len() {
            0 => EvaluationResult::Empty,
            1 => result.into_iter().next().unwrap_or(EvaluationResult::Empty),
            _ => EvaluationResult::collection(result),
        })
    }

    fn coerce_to_bool(&self, expr: &str, result: EvaluationResult) -> Result<bool, EvaluationError> {
        match result {
            EvaluationResult::Empty => Ok(false),
            EvaluationResult::Boolean(b, _) => Ok(b),
            EvaluationResult::Collection { items, .. } => Err(EvaluationError::SingletonEvaluationError(format!(
                "FHIR invariant '{}' must evaluate to a singleton boolean, got {} items",
                expr,
                items.len()
            ))),
            other => Err(EvaluationError::NonBooleanResult(format!(
                "FHIR invariant '{}' must evaluate to boolean, got {}",
                expr,
                other.type_name()
            ))),
        }
    }
}

impl FhirPathEngine for PresenceEngine {
    fn eval_bool(&self, focus: &EvaluationResult, expr: &str) -> Result<bool, EvaluationError> {
        let result = self.evaluate(focus, expr)?;
        trace!(expr, ?result, "evaluated invariant");
        self.coerce_to_bool(expr, result)
    }

    fn supports(&self, expr: &str) -> bool {
        match expression::parse(expr) {
            Ok(parsed) => parsed.functions().iter().all(|name| FUNCTIONS.contains(name)),
            Err(_) => false,
        }
    }
}

fn flatten(value: &EvaluationResult) -> Collection {
    match value {
        EvaluationResult::Empty => Vec::new(),
        EvaluationResult::Collection { items, .. } => items.iter().flat_map(flatten).collect(),
        other => vec![other.clone()],
    }
}

fn boolean(value: bool) -> Collection {
    vec![EvaluationResult::boolean(value)]
}

/// `Some(b)` for a singleton, `None` for empty.
fn truth(input: &Collection) -> Result<Option<bool>, EvaluationError> {
    match input.as_slice() {
        [] => Ok(None),
        [EvaluationResult::Boolean(b, _)] => Ok(Some(*b)),
        [_] => Ok(Some(true)),
        items => Err(EvaluationError::SingletonEvaluationError(format!(
            "expected a single boolean, got {} items",
            items.len()
        ))),
    }
}

fn from_truth(value: Option<bool>) -> Collection {
    value.map(boolean).unwrap_or_default()
}

fn evaluate(expr: &Expression, focus: &Collection) -> Result<Collection, EvaluationError> {
    match expr {
        Expression::Literal(literal) => Ok(vec![match literal {
            Literal::Boolean(b) => EvaluationResult::boolean(*b),
            Literal::String(s) => EvaluationResult::string(s.clone()),
            Literal::Integer(i) => EvaluationResult::integer(*i),
        }]),
        Expression::Member(name) => Ok(navigate(focus, name)),
        Expression::Path(left, name) => Ok(navigate(&evaluate(left, focus)?, name)),
        Expression::Function(left, name) => call(name, evaluate(left, focus)?),
        Expression::Equality(left, negated, right) => {
            let left = evaluate(left, focus)?;
            let right = evaluate(right, focus)?;
            if left.is_empty() || right.is_empty() {
                return Ok(Vec::new());
            }
            Ok(boolean((left == right) != *negated))
        }
        Expression::And(left, right) => {
            let (l, r) = (truth(&evaluate(left, focus)?)?, truth(&evaluate(right, focus)?)?);
            Ok(from_truth(match (l, r) {
                (Some(false), _) | (_, Some(false)) => Some(false),
                (Some(true), Some(true)) => Some(true),
                _ => None,
            }))
        }
        Expression::Or(left, right) => {
            let (l, r) = (truth(&evaluate(left, focus)?)?, truth(&evaluate(right, focus)?)?);
            Ok(from_truth(match (l, r) {
                (Some(true), _) | (_, Some(true)) => Some(true),
                (Some(false), Some(false)) => Some(false),
                _ => None,
            }))
        }
        Expression::Xor(left, right) => {
            let (l, r) = (truth(&evaluate(left, focus)?)?, truth(&evaluate(right, focus)?)?);
            Ok(from_truth(match (l, r) {
                (Some(a), Some(b)) => Some(a != b),
                _ => None,
            }))
        }
        Expression::Implies(left, right) => {
            let (l, r) = (truth(&evaluate(left, focus)?)?, truth(&evaluate(right, focus)?)?);
            Ok(from_truth(match (l, r) {
                (Some(false), _) | (_, Some(true)) => Some(true),
                (Some(true), Some(false)) => Some(false),
                _ => None,
            }))
        }
    }
}

fn navigate(input: &Collection, name: &str) -> Collection {
    input.iter().flat_map(|item| flatten(item.get(name))).collect()
}

fn call(name: &str, input: Collection) -> Result<Collection, EvaluationError> {
    match name {
        "exists" => Ok(boolean(!input.is_empty())),
        "empty" => Ok(boolean(input.is_empty())),
        "count" => Ok(vec![EvaluationResult::integer(input.len() as i64)]),
        "hasValue" => Ok(boolean(matches!(
            input.as_slice(),
            [item] if !matches!(item, EvaluationResult::Object { .. })
        ))),
        "not" => Ok(from_truth(truth(&input)?.map(|b| !b))),
        other => Err(EvaluationError::UnsupportedFunction(other.to_string())),
    }
}
