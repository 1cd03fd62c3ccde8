use std::collections::HashMap;
use rust_decimal::Decimal;
use crate::type_info::TypeInfoResult;

/// Focus value handed to a FHIRPath engine.
///
/// Model types convert themselves into this shape through
/// [`IntoEvaluationResult`](crate::IntoEvaluationResult). Complex types become
/// [`EvaluationResult::Object`] keyed by FHIR element name; repeating elements
/// become [`EvaluationResult::Collection`]; absent elements are
/// [`EvaluationResult::Empty`].
///
/// # Examples
///
/// ```rust
/// use atrius_fhirpath_support::EvaluationResult;
///
/// let items = vec![
///     EvaluationResult::string("Patient".to_string()),
///     EvaluationResult::integer(42),
/// ];
/// let collection = EvaluationResult::collection(items);
///
/// assert_eq!(collection.count(), 2);
/// assert!(collection.is_collection());
/// ```
#[derive(Debug, Clone)]
pub enum EvaluationResult {
    /// No value; FHIRPath's empty collection `{}`.
    Empty,
    Boolean(bool, Option<TypeInfoResult>),
    /// Used for string, code, uri, canonical, id and the other text types.
    String(String, Option<TypeInfoResult>),
    Decimal(Decimal, Option<TypeInfoResult>),
    /// integer, positiveInt and unsignedInt.
    Integer(i64, Option<TypeInfoResult>),
    /// Date in its original textual form (`YYYY`, `YYYY-MM` or `YYYY-MM-DD`).
    Date(String, Option<TypeInfoResult>),
    /// dateTime and instant in their original textual form.
    DateTime(String, Option<TypeInfoResult>),
    Time(String, Option<TypeInfoResult>),
    /// Numeric value and unit.
    Quantity(Decimal, String, Option<TypeInfoResult>),
    Collection {
        items: Vec<EvaluationResult>,
        /// Whether the source order is not significant.
        has_undefined_order: bool,
        type_info: Option<TypeInfoResult>,
    },
    /// A complex type keyed by FHIR element name.
    Object {
        map: HashMap<String, EvaluationResult>,
        type_info: Option<TypeInfoResult>,
    },
}

impl PartialEq for EvaluationResult {
    /// Compares values only; attached type information is ignored.
    fn eq(&self, other: &Self) -> bool {
        use EvaluationResult::*;
        match (self, other) {
            (Empty, Empty) => true,
            (Boolean(a, _), Boolean(b, _)) => a == b,
            (String(a, _), String(b, _)) => a == b,
            (Decimal(a, _), Decimal(b, _)) => a == b,
            (Integer(a, _), Integer(b, _)) => a == b,
            (Date(a, _), Date(b, _)) => a == b,
            (DateTime(a, _), DateTime(b, _)) => a == b,
            (Time(a, _), Time(b, _)) => a == b,
            (Quantity(av, au, _), Quantity(bv, bu, _)) => av == bv && au == bu,
            (
                Collection { items: a, has_undefined_order: ao, .. },
                Collection { items: b, has_undefined_order: bo, .. },
            ) => ao == bo && a == b,
            (Object { map: a, .. }, Object { map: b, .. }) => a == b,
            _ => false,
        }
    }
}

impl EvaluationResult {
    pub fn boolean(value: bool) -> Self {
        EvaluationResult::Boolean(value, Some(TypeInfoResult::new("System", "Boolean")))
    }

    pub fn string(value: String) -> Self {
        EvaluationResult::String(value, Some(TypeInfoResult::new("System", "String")))
    }

    /// A string carrying a specific FHIR primitive type name (`code`, `uri`, ...).
    pub fn fhir_string(value: String, fhir_type: &str) -> Self {
        EvaluationResult::String(value, Some(TypeInfoResult::new("FHIR", fhir_type)))
    }

    pub fn integer(value: i64) -> Self {
        EvaluationResult::Integer(value, Some(TypeInfoResult::new("System", "Integer")))
    }

    pub fn fhir_integer(value: i64, fhir_type: &str) -> Self {
        EvaluationResult::Integer(value, Some(TypeInfoResult::new("FHIR", fhir_type)))
    }

    pub fn decimal(value: Decimal) -> Self {
        EvaluationResult::Decimal(value, Some(TypeInfoResult::new("System", "Decimal")))
    }

    pub fn date(value: String) -> Self {
        EvaluationResult::Date(value, Some(TypeInfoResult::new("System", "Date")))
    }

    pub fn datetime(value: String) -> Self {
        EvaluationResult::DateTime(value, Some(TypeInfoResult::new("System", "DateTime")))
    }

    pub fn time(value: String) -> Self {
        EvaluationResult::Time(value, Some(TypeInfoResult::new("System", "Time")))
    }

    pub fn quantity(value: Decimal, unit: String) -> Self {
        EvaluationResult::Quantity(value, unit, Some(TypeInfoResult::new("System", "Quantity")))
    }

    pub fn collection(items: Vec<EvaluationResult>) -> Self {
        EvaluationResult::Collection {
            items,
            has_undefined_order: false,
            type_info: None,
        }
    }

    pub fn object(map: HashMap<String, EvaluationResult>) -> Self {
        EvaluationResult::Object { map, type_info: None }
    }

    /// An object tagged with its FHIR type, e.g. `("FHIR", "InsurancePlan")`.
    pub fn typed_object(map: HashMap<String, EvaluationResult>, namespace: &str, name: &str) -> Self {
        EvaluationResult::Object {
            map,
            type_info: Some(TypeInfoResult::new(namespace, name)),
        }
    }

    /// Re-tags a primitive result with its FHIR type name (`code`,
    /// `positiveInt`, ...). Collections are re-tagged item by item; other
    /// values are returned unchanged.
    pub fn with_fhir_type(self, fhir_type: &str) -> Self {
        match self {
            EvaluationResult::String(s, _) => EvaluationResult::fhir_string(s, fhir_type),
            EvaluationResult::Integer(i, _) => EvaluationResult::fhir_integer(i, fhir_type),
            EvaluationResult::Boolean(b, _) => {
                EvaluationResult::Boolean(b, Some(TypeInfoResult::new("FHIR", fhir_type)))
            }
            EvaluationResult::Decimal(d, _) => {
                EvaluationResult::Decimal(d, Some(TypeInfoResult::new("FHIR", fhir_type)))
            }
            EvaluationResult::Collection { items, has_undefined_order, type_info } => EvaluationResult::Collection {
                items: items.into_iter().map(|item| item.with_fhir_type(fhir_type)).collect(),
                has_undefined_order,
                type_info,
            },
            other => other,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            EvaluationResult::Empty => true,
            EvaluationResult::Collection { items, .. } => items.is_empty(),
            _ => false,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, EvaluationResult::Collection { .. })
    }

    /// Number of items under FHIRPath counting rules: empty is 0, a
    /// collection is its length, anything else is 1.
    pub fn count(&self) -> usize {
        match self {
            EvaluationResult::Empty => 0,
            EvaluationResult::Collection { items, .. } => items.len(),
            _ => 1,
        }
    }

    /// Boolean conversion of a singleton boolean, `None` for anything else.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            EvaluationResult::Boolean(b, _) => Some(*b),
            EvaluationResult::Collection { items, .. } if items.len() == 1 => items[0].as_boolean(),
            _ => None,
        }
    }

    /// FHIRPath truthiness: empty is false, a singleton boolean is its value,
    /// any other non-empty value is true.
    pub fn to_boolean(&self) -> bool {
        match self {
            EvaluationResult::Empty => false,
            EvaluationResult::Boolean(b, _) => *b,
            EvaluationResult::Collection { items, .. } => match items.as_slice() {
                [] => false,
                [single] => single.to_boolean(),
                _ => true,
            },
            _ => true,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            EvaluationResult::String(s, _)
            | EvaluationResult::Date(s, _)
            | EvaluationResult::DateTime(s, _)
            | EvaluationResult::Time(s, _) => Some(s),
            _ => None,
        }
    }

    /// Member lookup on an object; `Empty` when the key is absent or
    /// `self` is not an object.
    pub fn get(&self, key: &str) -> &EvaluationResult {
        static EMPTY: EvaluationResult = EvaluationResult::Empty;
        match self {
            EvaluationResult::Object { map, .. } => map.get(key).unwrap_or(&EMPTY),
            _ => &EMPTY,
        }
    }

    pub fn type_info(&self) -> Option<&TypeInfoResult> {
        match self {
            EvaluationResult::Empty => None,
            EvaluationResult::Boolean(_, t)
            | EvaluationResult::String(_, t)
            | EvaluationResult::Decimal(_, t)
            | EvaluationResult::Integer(_, t)
            | EvaluationResult::Date(_, t)
            | EvaluationResult::DateTime(_, t)
            | EvaluationResult::Time(_, t)
            | EvaluationResult::Quantity(_, _, t) => t.as_ref(),
            EvaluationResult::Collection { type_info, .. }
            | EvaluationResult::Object { type_info, .. } => type_info.as_ref(),
        }
    }

    /// Type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            EvaluationResult::Empty => "Empty",
            EvaluationResult::Boolean(..) => "Boolean",
            EvaluationResult::String(..) => "String",
            EvaluationResult::Decimal(..) => "Decimal",
            EvaluationResult::Integer(..) => "Integer",
            EvaluationResult::Date(..) => "Date",
            EvaluationResult::DateTime(..) => "DateTime",
            EvaluationResult::Time(..) => "Time",
            EvaluationResult::Quantity(..) => "Quantity",
            EvaluationResult::Collection { .. } => "Collection",
            EvaluationResult::Object { .. } => "Object",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_type_info() {
        let a = EvaluationResult::string("x".to_string());
        let b = EvaluationResult::fhir_string("x".to_string(), "code");
        assert_eq!(a, b);
    }

    #[test]
    fn truthiness_follows_singleton_rules() {
        assert!(!EvaluationResult::Empty.to_boolean());
        assert!(!EvaluationResult::collection(vec![]).to_boolean());
        assert!(!EvaluationResult::collection(vec![EvaluationResult::boolean(false)]).to_boolean());
        assert!(EvaluationResult::integer(0).to_boolean());
    }

    #[test]
    fn object_lookup_returns_empty_for_missing_keys() {
        let mut map = HashMap::new();
        map.insert("name".to_string(), EvaluationResult::string("Gold".to_string()));
        let object = EvaluationResult::typed_object(map, "FHIR", "InsurancePlan");

        assert_eq!(object.get("name").as_str(), Some("Gold"));
        assert!(object.get("alias").is_empty());
        assert_eq!(object.type_info().map(|t| t.name.as_str()), Some("InsurancePlan"));
    }
}
