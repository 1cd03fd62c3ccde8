use serde::de::DeserializeOwned;
use serde::ser::SerializeStruct;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use atrius_fhirpath_support::evaluation_result::EvaluationResult;
use atrius_fhirpath_support::traits::IntoEvaluationResult;
use atrius_fhirpath_support::validate::{FhirPathEngine, FhirValidate, Invariant, ValidationIssue};
use crate::r4::Extension;

/// A FHIR primitive: an optional value plus the `id` and `extension` every
/// element may carry.
///
/// The primitive aliases in [`crate::r4`] (`FhirString`, `Code`, `PositiveInt`,
/// ...) are all `Element<V>` for some value type.
///
/// # Serialization Behavior
///
/// - only `value` present: the bare JSON value (`"text"`, `42`, `true`)
/// - `id` or extensions present: an object `{"id": .., "extension": [..], "value": ..}`
/// - nothing present: `null`
///
/// ```rust
/// use atrius_fhir_lib::r4::FhirString;
///
/// let plain = FhirString::from("Gold plan");
/// assert_eq!(serde_json::to_string(&plain).unwrap(), "\"Gold plan\"");
///
/// let tagged = FhirString::from("Gold plan").with_id("n1");
/// assert_eq!(
///     serde_json::to_string(&tagged).unwrap(),
///     r#"{"id":"n1","value":"Gold plan"}"#
/// );
/// ```
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Element<V> {
    id: Option<String>,
    extension: Vec<Extension>,
    value: Option<V>,
}

impl<V> Default for Element<V> {
    fn default() -> Self {
        Self {
            id: None,
            extension: Vec::new(),
            value: None,
        }
    }
}

impl<V> Element<V> {
    pub fn new(value: V) -> Self {
        Self {
            id: None,
            extension: Vec::new(),
            value: Some(value),
        }
    }

    /// An element with no value, carried only for its extensions.
    pub fn from_extensions(extension: Vec<Extension>) -> Self {
        Self {
            id: None,
            extension,
            value: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn add_extension(mut self, extension: Extension) -> Self {
        self.extension.push(extension);
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn extension(&self) -> &[Extension] {
        &self.extension
    }

    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// Returns `true` if no value, id, or extensions are present.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.id.is_none() && self.extension.is_empty()
    }
}

impl<V> From<V> for Element<V> {
    fn from(value: V) -> Self {
        Element::new(value)
    }
}

impl From<&str> for Element<String> {
    fn from(value: &str) -> Self {
        Element::new(value.to_string())
    }
}

/// Accepts either a bare primitive, the object form `{id, extension, value}`
/// (unknown members are ignored) or `null`.
///
/// The input is read as a [`serde_json::Value`] first, so JSON numbers keep
/// their exact text on the way to the primitive type.
impl<'de, V> Deserialize<'de> for Element<V>
where
    V: DeserializeOwned,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(Element::default()),
            Value::Object(members) => {
                let mut element = Element::default();
                for (key, member) in members {
                    match key.as_str() {
                        "id" => element.id = serde_json::from_value(member).map_err(de::Error::custom)?,
                        "extension" => {
                            element.extension = serde_json::from_value::<Option<Vec<Extension>>>(member)
                                .map_err(de::Error::custom)?
                                .unwrap_or_default();
                        }
                        "value" => element.value = serde_json::from_value(member).map_err(de::Error::custom)?,
                        _ => {}
                    }
                }
                Ok(element)
            }
            bare => V::deserialize(bare).map(Element::new).map_err(de::Error::custom),
        }
    }
}

impl<V> Serialize for Element<V>
where
    V: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if self.id.is_none() && self.extension.is_empty() {
            return match &self.value {
                Some(val) => val.serialize(serializer),
                None => serializer.serialize_none(),
            };
        }

        let len = self.id.is_some() as usize + !self.extension.is_empty() as usize + self.value.is_some() as usize;
        let mut state = serializer.serialize_struct("Element", len)?;
        if let Some(id) = &self.id {
            state.serialize_field("id", id)?;
        }
        if !self.extension.is_empty() {
            state.serialize_field("extension", &self.extension)?;
        }
        if let Some(value) = &self.value {
            state.serialize_field("value", value)?;
        }
        state.end()
    }
}

/// The value when present; otherwise an `Element` object holding the id and
/// extensions; otherwise `Empty`.
impl<V> IntoEvaluationResult for Element<V>
where
    V: IntoEvaluationResult,
{
    fn to_evaluation_result(&self) -> EvaluationResult {
        if let Some(v) = &self.value {
            return v.to_evaluation_result();
        }
        let mut map = std::collections::HashMap::new();
        if let Some(id) = &self.id {
            map.insert("id".to_string(), EvaluationResult::string(id.clone()));
        }
        if !self.extension.is_empty() {
            map.insert("extension".to_string(), self.extension.to_evaluation_result());
        }
        if map.is_empty() {
            EvaluationResult::Empty
        } else {
            EvaluationResult::typed_object(map, "FHIR", "Element")
        }
    }
}

/// Primitives carry no constraints of their own; their extensions may.
impl<V> FhirValidate for Element<V>
where
    V: IntoEvaluationResult,
{
    fn invariants() -> &'static [Invariant] {
        &[]
    }

    fn collect_issues(&self, engine: &dyn FhirPathEngine, instance_path: &str, issues: &mut Vec<ValidationIssue>) {
        for (index, extension) in self.extension.iter().enumerate() {
            extension.collect_issues(engine, &format!("{instance_path}.extension[{index}]"), issues);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::r4::{Boolean, Decimal, PositiveInt};
    use rust_decimal_macros::dec;

    #[test]
    fn bare_primitives_deserialize_into_values() {
        let flag: Boolean = serde_json::from_str("true").unwrap();
        assert_eq!(flag.value(), Some(&true));

        let size: PositiveInt = serde_json::from_str("3").unwrap();
        assert_eq!(size.value(), Some(&3));

        let factor: Decimal = serde_json::from_str("0.250").unwrap();
        assert_eq!(factor.value().map(|d| d.value()), Some(dec!(0.25)));
        assert_eq!(serde_json::to_string(&factor).unwrap(), "0.250");
    }

    #[test]
    fn object_form_keeps_id_and_ignores_unknown_members() {
        let parsed: Element<String> =
            serde_json::from_str(r#"{"id":"a1","value":"x","unexpected":1}"#).unwrap();
        assert_eq!(parsed.id(), Some("a1"));
        assert_eq!(parsed.value().map(String::as_str), Some("x"));
        assert!(parsed.extension().is_empty());
    }

    #[test]
    fn null_is_an_empty_element() {
        let parsed: Element<String> = serde_json::from_str("null").unwrap();
        assert!(parsed.is_empty());
        assert_eq!(parsed.to_evaluation_result(), EvaluationResult::Empty);
    }
}
