use rust_decimal::Decimal;
use crate::evaluation_result::EvaluationResult;

/// Metadata for FHIR choice elements (`[x]` fields).
///
/// Implemented by the `FhirPath` derive on choice enums so an engine can map a
/// polymorphic name such as `rateQuantity` back to `rate`.
///
/// ```rust,ignore
/// impl ChoiceElement for NutritionOrderEnteralFormulaAdministrationRate {
///     fn base_name() -> &'static str {
///         "rate"
///     }
///
///     fn possible_field_names() -> Vec<&'static str> {
///         vec!["rateQuantity", "rateRatio"]
///     }
/// }
/// ```
pub trait ChoiceElement {
    /// The element name without the `[x]` suffix.
    fn base_name() -> &'static str;

    /// Every concrete JSON name the element can appear under.
    fn possible_field_names() -> Vec<&'static str>;
}

/// Conversion of model values into a FHIRPath focus.
///
/// - `None` and empty values become [`EvaluationResult::Empty`]
/// - complex types become [`EvaluationResult::Object`] keyed by FHIR name
/// - lists become [`EvaluationResult::Collection`]
///
/// ```rust
/// use atrius_fhirpath_support::{EvaluationResult, IntoEvaluationResult};
///
/// struct Flag {
///     active: bool,
/// }
///
/// impl IntoEvaluationResult for Flag {
///     fn to_evaluation_result(&self) -> EvaluationResult {
///         let mut map = std::collections::HashMap::new();
///         map.insert("active".to_string(), self.active.to_evaluation_result());
///         EvaluationResult::object(map)
///     }
/// }
///
/// let focus = Flag { active: true }.to_evaluation_result();
/// assert_eq!(focus.get("active").as_boolean(), Some(true));
/// ```
pub trait IntoEvaluationResult {
    fn to_evaluation_result(&self) -> EvaluationResult;
}

impl IntoEvaluationResult for String {
    fn to_evaluation_result(&self) -> EvaluationResult {
        EvaluationResult::string(self.clone())
    }
}

impl IntoEvaluationResult for str {
    fn to_evaluation_result(&self) -> EvaluationResult {
        EvaluationResult::string(self.to_string())
    }
}

impl IntoEvaluationResult for bool {
    fn to_evaluation_result(&self) -> EvaluationResult {
        EvaluationResult::boolean(*self)
    }
}

impl IntoEvaluationResult for i32 {
    fn to_evaluation_result(&self) -> EvaluationResult {
        EvaluationResult::integer(*self as i64)
    }
}

impl IntoEvaluationResult for i64 {
    fn to_evaluation_result(&self) -> EvaluationResult {
        EvaluationResult::integer(*self)
    }
}

impl IntoEvaluationResult for Decimal {
    fn to_evaluation_result(&self) -> EvaluationResult {
        EvaluationResult::decimal(*self)
    }
}

impl<T> IntoEvaluationResult for Option<T>
where
    T: IntoEvaluationResult,
{
    fn to_evaluation_result(&self) -> EvaluationResult {
        match self {
            Some(value) => value.to_evaluation_result(),
            None => EvaluationResult::Empty,
        }
    }
}

/// An empty vector is `Empty` rather than an empty collection, so
/// `exists()` on an absent list behaves like an absent singleton.
impl<T> IntoEvaluationResult for Vec<T>
where
    T: IntoEvaluationResult,
{
    fn to_evaluation_result(&self) -> EvaluationResult {
        if self.is_empty() {
            return EvaluationResult::Empty;
        }
        EvaluationResult::collection(self.iter().map(|item| item.to_evaluation_result()).collect())
    }
}

impl<T> IntoEvaluationResult for Box<T>
where
    T: IntoEvaluationResult + ?Sized,
{
    fn to_evaluation_result(&self) -> EvaluationResult {
        (**self).to_evaluation_result()
    }
}

impl<T> IntoEvaluationResult for &T
where
    T: IntoEvaluationResult + ?Sized,
{
    fn to_evaluation_result(&self) -> EvaluationResult {
        (*self).to_evaluation_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn options_and_vectors_collapse_to_empty() {
        let none: Option<String> = None;
        assert_eq!(none.to_evaluation_result(), EvaluationResult::Empty);
        assert_eq!(Vec::<i32>::new().to_evaluation_result(), EvaluationResult::Empty);
    }

    #[test]
    fn scalars_keep_their_kind() {
        assert_eq!(7i32.to_evaluation_result(), EvaluationResult::integer(7));
        assert_eq!(dec!(12.5).to_evaluation_result(), EvaluationResult::decimal(dec!(12.5)));
        assert_eq!(Box::new(true).to_evaluation_result(), EvaluationResult::boolean(true));
    }
}
