//! FHIR `decimal` values that keep the exact text they were read from.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;
use atrius_fhirpath_support::evaluation_result::EvaluationResult;
use atrius_fhirpath_support::traits::IntoEvaluationResult;

use crate::element::Element;

/// A decimal together with its JSON representation.
///
/// FHIR decimals carry their precision in their text: `1.50` and `1.5` are
/// the same number but not the same value on the wire. The parsed [`Decimal`]
/// is used for comparison and hashing; the text is written back unchanged as
/// a JSON number.
///
/// ```rust
/// use atrius_fhir_lib::PreciseDecimal;
///
/// let factor: PreciseDecimal = serde_json::from_str("1.50").unwrap();
/// assert_eq!(factor.as_str(), "1.50");
/// assert_eq!(serde_json::to_string(&factor).unwrap(), "1.50");
/// assert_eq!(factor, "1.5".parse::<PreciseDecimal>().unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct PreciseDecimal {
    value: Decimal,
    text: Arc<str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimalParseError(String);

impl fmt::Display for DecimalParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a valid FHIR decimal", self.0)
    }
}

impl std::error::Error for DecimalParseError {}

impl PreciseDecimal {
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// The text the value was read from, or the canonical text of a
    /// constructed value.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Parses plain (`12.340`) and exponent (`1.2E3`) notation.
    fn parse_decimal(text: &str) -> Option<Decimal> {
        let normalized = text.replace('E', "e");
        if normalized.contains('e') {
            Decimal::from_scientific(&normalized).ok()
        } else {
            normalized.parse::<Decimal>().ok()
        }
    }
}

impl FromStr for PreciseDecimal {
    type Err = DecimalParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let value = Self::parse_decimal(text).ok_or_else(|| DecimalParseError(text.to_string()))?;
        Ok(Self { value, text: Arc::from(text) })
    }
}

impl From<Decimal> for PreciseDecimal {
    fn from(value: Decimal) -> Self {
        Self { value, text: Arc::from(value.to_string()) }
    }
}

impl From<Decimal> for Element<PreciseDecimal> {
    fn from(value: Decimal) -> Self {
        Element::new(PreciseDecimal::from(value))
    }
}

impl fmt::Display for PreciseDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl PartialEq for PreciseDecimal {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for PreciseDecimal {}

impl Hash for PreciseDecimal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Decimal hashes its normalized form, matching `==`.
        self.value.hash(state);
    }
}

impl PartialOrd for PreciseDecimal {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PreciseDecimal {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value.cmp(&other.value)
    }
}

impl Serialize for PreciseDecimal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Text read from a JSON string may not be valid JSON number syntax.
        let raw = RawValue::from_string(self.text.to_string())
            .or_else(|_| RawValue::from_string(self.value.to_string()))
            .map_err(|err| serde::ser::Error::custom(format!("failed to serialize decimal '{}': {}", self.text, err)))?;
        raw.serialize(serializer)
    }
}

/// Reads a JSON number (keeping its text) or a numeric string.
impl<'de> Deserialize<'de> for PreciseDecimal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::String(s) => s,
            serde_json::Value::Bool(b) => {
                return Err(de::Error::invalid_type(de::Unexpected::Bool(b), &"a decimal number"));
            }
            serde_json::Value::Array(_) => {
                return Err(de::Error::invalid_type(de::Unexpected::Seq, &"a decimal number"));
            }
            serde_json::Value::Object(_) => {
                return Err(de::Error::invalid_type(de::Unexpected::Map, &"a decimal number"));
            }
            serde_json::Value::Null => {
                return Err(de::Error::invalid_type(de::Unexpected::Unit, &"a decimal number"));
            }
        };
        text.parse().map_err(de::Error::custom)
    }
}

impl IntoEvaluationResult for PreciseDecimal {
    fn to_evaluation_result(&self) -> EvaluationResult {
        EvaluationResult::decimal(self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn trailing_zeros_survive_a_round_trip() {
        let parsed: PreciseDecimal = serde_json::from_str("120.50").unwrap();
        assert_eq!(parsed.value(), dec!(120.5));
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "120.50");
    }

    #[test]
    fn digits_beyond_f64_are_kept() {
        let parsed: PreciseDecimal = serde_json::from_str("12345678901234.123456789").unwrap();
        assert_eq!(parsed.value(), dec!(12345678901234.123456789));
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "12345678901234.123456789");
    }

    #[test]
    fn exponent_notation_is_accepted() {
        let parsed: PreciseDecimal = "1.5E2".parse().unwrap();
        assert_eq!(parsed.value(), dec!(150));
        assert_eq!(parsed.as_str(), "1.5E2");
    }

    #[test]
    fn equality_and_hash_follow_the_number() {
        use std::collections::hash_map::DefaultHasher;

        let a: PreciseDecimal = "10.0".parse().unwrap();
        let b: PreciseDecimal = "10.00".parse().unwrap();
        assert_eq!(a, b);

        let hash = |d: &PreciseDecimal| {
            let mut hasher = DefaultHasher::new();
            d.hash(&mut hasher);
            hasher.finish()
        };
        assert_eq!(hash(&a), hash(&b));
    }

    #[test]
    fn numeric_strings_are_written_as_numbers() {
        let parsed: PreciseDecimal = serde_json::from_str("\"+2.50\"").unwrap();
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "2.50");
    }

    #[test]
    fn non_numbers_are_rejected() {
        assert!(serde_json::from_str::<PreciseDecimal>("true").is_err());
        assert!(serde_json::from_str::<PreciseDecimal>("\"ten\"").is_err());
    }
}
