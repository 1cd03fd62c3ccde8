//! # FHIRPath Type Information
//!
//! Namespace/name pairs attached to evaluation results so an engine can answer
//! `type()`, `is` and `as` against model values.

/// Type information carried by an [`EvaluationResult`](crate::EvaluationResult).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfoResult {
    pub namespace: String,
    pub name: String,
}

impl TypeInfoResult {
    pub fn new(namespace: &str, name: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }
}

/// Static type information for model types.
///
/// Implemented by the `FhirPath` derive for every generated struct.
pub trait TypeInfo {
    /// Returns the namespace for this type (e.g., "FHIR", "System").
    fn type_namespace() -> &'static str;

    /// Returns the name of this type within its namespace.
    fn type_name() -> &'static str;
}
