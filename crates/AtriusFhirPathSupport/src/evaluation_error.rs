use thiserror::Error;

/// Errors a [`FhirPathEngine`](crate::FhirPathEngine) reports while evaluating
/// an invariant expression.
///
/// The model crate only ever receives these; it turns them into validation
/// issues against the invariant being evaluated.
///
/// ```rust
/// use atrius_fhirpath_support::EvaluationError;
///
/// let error = EvaluationError::UnsupportedFunction("memberOf".to_string());
/// assert_eq!(error.to_string(), "Unsupported Function: memberOf");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    /// The expression could not be parsed.
    #[error("Syntax Error: {0}")]
    SyntaxError(String),
    /// Mismatched types in an operation or function call.
    #[error("Type Error: {0}")]
    TypeError(String),
    /// A function the engine does not implement.
    #[error("Unsupported Function: {0}")]
    UnsupportedFunction(String),
    /// A singleton was required but the collection held more than one item.
    #[error("Singleton Evaluation Error: {0}")]
    SingletonEvaluationError(String),
    /// The expression evaluated to something other than a boolean.
    #[error("Non-boolean Result: {0}")]
    NonBooleanResult(String),
    /// Anything not covered above.
    #[error("Evaluation Error: {0}")]
    Other(String),
}
