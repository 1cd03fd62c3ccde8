//! # FHIRPath Support Types
//!
//! Shared vocabulary between the FHIR model crate and whatever FHIRPath engine
//! evaluates its constraints. The model crate never evaluates an expression
//! itself: it converts a node into an [`EvaluationResult`] focus and hands the
//! invariant expression to a [`FhirPathEngine`].
//!
//! ## Core Types
//!
//! - [`EvaluationResult`] - the focus value passed to an engine
//! - [`EvaluationError`] - errors an engine may report
//! - [`IntoEvaluationResult`] - conversion of model values into a focus
//! - [`Invariant`] / [`Binding`] - declarative rule metadata attached to model types
//! - [`FhirValidate`] - walks a model tree and evaluates every invariant
//!
//! ## Usage Example
//!
//! ```rust
//! use atrius_fhirpath_support::{EvaluationResult, IntoEvaluationResult};
//!
//! let text = "Hello, FHIR!".to_string();
//! let result = text.to_evaluation_result();
//! assert_eq!(result, EvaluationResult::string("Hello, FHIR!".to_string()));
//!
//! let numbers = vec![1, 2, 3];
//! assert_eq!(numbers.to_evaluation_result().count(), 3);
//! ```

pub mod type_info;
pub mod evaluation_result;
pub mod evaluation_error;
pub mod traits;
pub mod validate;

pub use evaluation_error::EvaluationError;
pub use evaluation_result::EvaluationResult;
pub use traits::{ChoiceElement, IntoEvaluationResult};
pub use type_info::{TypeInfo, TypeInfoResult};
pub use validate::*;
