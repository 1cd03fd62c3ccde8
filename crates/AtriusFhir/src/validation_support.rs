//! Construction-time validation.
//!
//! Builders call [`Validatable::validate_local`] on the value they are about
//! to return; parsing calls [`Validatable::validate_at`], which walks the
//! whole tree. Both fail fast with the first [`ValidationError`].

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::debug;
use atrius_fhirpath_support::validate::ValidationIssue;

use crate::element::Element;
use crate::r4::Reference;
use crate::resource_types::is_resource_type;
use crate::terminology::TerminologyService;

/// Maximum length of a FHIR `string`, in characters.
pub const MAX_STRING_LENGTH: usize = 1_048_576;

static CODE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s]+(\s[^\s]+)*$").expect("code pattern is valid"));

static ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9\-\.]{1,64}$").expect("id pattern is valid"));

static CONDITIONAL_TYPE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Za-z]+$").expect("conditional type pattern is valid"));

static REFERENCE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^((http|https)://([A-Za-z0-9\-\\\.:%\$]*/)+)?([A-Z][A-Za-z]+)/[A-Za-z0-9\-\.]{1,64}(/_history/[A-Za-z0-9\-\.]{1,64})?$",
    )
    .expect("reference pattern is valid")
});

/// A violated cardinality, reference-type or primitive rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required element: '{path}'")]
    MissingRequired { path: String },

    #[error("Missing required element: '{path}' must contain at least one item")]
    EmptyList { path: String },

    #[error("ele-1: All FHIR elements must have a @value or children: '{path}'")]
    EmptyElement { path: String },

    #[error("Resource type found in reference value: '{actual}' for element: '{path}' must be one of: {allowed:?}")]
    ReferenceTypeNotAllowed {
        path: String,
        actual: String,
        allowed: Vec<String>,
    },

    #[error("Invalid reference value or resource type not found in reference value: '{reference}' for element: '{path}'")]
    InvalidReference { path: String, reference: String },

    #[error("Resource type found in reference value: '{actual}' for element: '{path}' does not match Reference.type: {declared}")]
    ReferenceTypeMismatch {
        path: String,
        actual: String,
        declared: String,
    },

    #[error("Resource type '{value}' for element: '{path}' must be a valid resource type name")]
    UnknownResourceType { path: String, value: String },

    #[error("Invalid {kind} value for element: '{path}': {reason}")]
    InvalidPrimitive {
        path: String,
        kind: &'static str,
        reason: String,
    },
}

impl ValidationError {
    /// Path of the element that failed.
    pub fn path(&self) -> &str {
        match self {
            ValidationError::MissingRequired { path }
            | ValidationError::EmptyList { path }
            | ValidationError::EmptyElement { path }
            | ValidationError::ReferenceTypeNotAllowed { path, .. }
            | ValidationError::InvalidReference { path, .. }
            | ValidationError::ReferenceTypeMismatch { path, .. }
            | ValidationError::UnknownResourceType { path, .. }
            | ValidationError::InvalidPrimitive { path, .. } => path,
        }
    }
}

/// Model values that enforce their local rules.
///
/// Implemented by the `FhirValidate` derive for every generated struct and
/// choice enum, and by hand for [`Element`], `String` and `Box<T>`.
pub trait Validatable {
    /// Checks the rules owned by this node only: non-empty lists, reference
    /// targets, primitive formats and ele-1.
    fn validate_local(&self, path: &str) -> Result<(), ValidationError>;

    /// Checks this node and every descendant.
    fn validate_at(&self, path: &str) -> Result<(), ValidationError>;

    /// Checks coded descendants against their bindings, appending issues.
    fn collect_binding_issues(
        &self,
        path: &str,
        service: &dyn TerminologyService,
        issues: &mut Vec<ValidationIssue>,
    );
}

/// Unwraps a required singular value.
pub fn require<T>(value: Option<T>, path: &str) -> Result<T, ValidationError> {
    value.ok_or_else(|| {
        debug!(path, "missing required element");
        ValidationError::MissingRequired { path: path.to_string() }
    })
}

/// Fails if a `1..*` list is empty.
pub fn require_non_empty<T>(values: &[T], path: &str) -> Result<(), ValidationError> {
    if values.is_empty() {
        debug!(path, "required list is empty");
        return Err(ValidationError::EmptyList { path: path.to_string() });
    }
    Ok(())
}

/// ele-1: an element needs a value or at least one child.
pub fn require_value_or_children(has_value: bool, has_children: bool, path: &str) -> Result<(), ValidationError> {
    if !has_value && !has_children {
        debug!(path, "element has neither a value nor children");
        return Err(ValidationError::EmptyElement { path: path.to_string() });
    }
    Ok(())
}

/// Resource type named by a literal reference, or `None` for references
/// that are not checked (`#contained` and `urn:` references).
fn literal_reference_type<'a>(reference: &'a str, path: &str) -> Result<Option<&'a str>, ValidationError> {
    if reference.starts_with('#') || reference.starts_with("urn:") {
        return Ok(None);
    }
    // Conditional reference: `Type?search`.
    if let Some((head, _)) = reference.split_once('?') {
        return if CONDITIONAL_TYPE_PATTERN.is_match(head) {
            Ok(Some(head))
        } else {
            Err(ValidationError::InvalidReference {
                path: path.to_string(),
                reference: reference.to_string(),
            })
        };
    }
    match REFERENCE_PATTERN.captures(reference).and_then(|c| c.get(4)) {
        Some(m) => Ok(Some(m.as_str())),
        None => Err(ValidationError::InvalidReference {
            path: path.to_string(),
            reference: reference.to_string(),
        }),
    }
}

/// Checks that `reference` targets one of `allowed`.
///
/// The target type comes from `Reference.type` or from the literal
/// `reference`: `[base/]Type/id[/_history/vid]`, or `Type?search` for a
/// conditional reference.
/// Both must name a known resource type and must agree when both are
/// present. A reference with neither, such as an identifier-only
/// reference, is accepted. `allowed` containing `Resource` accepts any type.
pub fn check_reference_type(reference: &Reference, path: &str, allowed: &[&str]) -> Result<(), ValidationError> {
    let declared = reference.r#type().and_then(|t| t.value()).map(String::as_str);
    if let Some(declared) = declared
        && !is_resource_type(declared)
    {
        debug!(path, declared, "Reference.type is not a resource type");
        return Err(ValidationError::UnknownResourceType {
            path: path.to_string(),
            value: declared.to_string(),
        });
    }

    let literal = match reference.reference().and_then(|r| r.value()) {
        Some(value) => match literal_reference_type(value, path) {
            Ok(found) => found,
            // An unparseable literal can still be typed by Reference.type.
            Err(_) if declared.is_some() => None,
            Err(err) => {
                debug!(path, value, "reference value does not name a resource type");
                return Err(err);
            }
        },
        None => None,
    };

    if let Some(found) = literal {
        if !is_resource_type(found) {
            return Err(ValidationError::UnknownResourceType {
                path: path.to_string(),
                value: found.to_string(),
            });
        }
        if let Some(declared) = declared
            && declared != found
        {
            return Err(ValidationError::ReferenceTypeMismatch {
                path: path.to_string(),
                actual: found.to_string(),
                declared: declared.to_string(),
            });
        }
    }

    match literal.or(declared) {
        Some(actual) if !allowed.contains(&actual) && !allowed.contains(&"Resource") => {
            debug!(path, actual, ?allowed, "reference target type not allowed");
            Err(ValidationError::ReferenceTypeNotAllowed {
                path: path.to_string(),
                actual: actual.to_string(),
                allowed: allowed.iter().map(|t| t.to_string()).collect(),
            })
        }
        _ => Ok(()),
    }
}

fn invalid(path: &str, kind: &'static str, reason: impl Into<String>) -> ValidationError {
    let err = ValidationError::InvalidPrimitive {
        path: path.to_string(),
        kind,
        reason: reason.into(),
    };
    debug!(%err, "primitive value rejected");
    err
}

/// `string` and `markdown`: bounded length, some non-whitespace content.
pub fn check_string(element: &Element<String>, path: &str) -> Result<(), ValidationError> {
    let Some(value) = element.value() else { return Ok(()) };
    if value.chars().count() > MAX_STRING_LENGTH {
        return Err(invalid(path, "string", format!("longer than {MAX_STRING_LENGTH} characters")));
    }
    if value.trim().is_empty() {
        return Err(invalid(path, "string", "must contain non-whitespace content"));
    }
    Ok(())
}

pub fn check_code(element: &Element<String>, path: &str) -> Result<(), ValidationError> {
    match element.value() {
        Some(value) if !CODE_PATTERN.is_match(value) => Err(invalid(
            path,
            "code",
            format!("'{value}' has leading, trailing or repeated whitespace"),
        )),
        _ => Ok(()),
    }
}

pub fn check_id(element: &Element<String>, path: &str) -> Result<(), ValidationError> {
    match element.value() {
        Some(value) if !ID_PATTERN.is_match(value) => Err(invalid(
            path,
            "id",
            format!("'{value}' must be 1-64 characters of [A-Za-z0-9-.]"),
        )),
        _ => Ok(()),
    }
}

/// `uri`, `url` and `canonical`.
pub fn check_uri(element: &Element<String>, path: &str) -> Result<(), ValidationError> {
    match element.value() {
        Some(value) if value.is_empty() || value.chars().any(char::is_whitespace) => Err(invalid(
            path,
            "uri",
            format!("'{value}' must be non-empty and contain no whitespace"),
        )),
        _ => Ok(()),
    }
}

pub fn check_positive_int(element: &Element<i32>, path: &str) -> Result<(), ValidationError> {
    match element.value() {
        Some(value) if *value < 1 => Err(invalid(path, "positiveInt", format!("{value} must be greater than 0"))),
        _ => Ok(()),
    }
}

pub fn check_unsigned_int(element: &Element<i32>, path: &str) -> Result<(), ValidationError> {
    match element.value() {
        Some(value) if *value < 0 => Err(invalid(path, "unsignedInt", format!("{value} must not be negative"))),
        _ => Ok(()),
    }
}

impl<V> Validatable for Element<V> {
    fn validate_local(&self, path: &str) -> Result<(), ValidationError> {
        require_value_or_children(self.value().is_some(), !self.extension().is_empty(), path)
    }

    fn validate_at(&self, path: &str) -> Result<(), ValidationError> {
        self.validate_local(path)?;
        for (i, extension) in self.extension().iter().enumerate() {
            extension.validate_at(&format!("{path}.extension[{i}]"))?;
        }
        Ok(())
    }

    fn collect_binding_issues(
        &self,
        path: &str,
        service: &dyn TerminologyService,
        issues: &mut Vec<ValidationIssue>,
    ) {
        for (i, extension) in self.extension().iter().enumerate() {
            extension.collect_binding_issues(&format!("{path}.extension[{i}]"), service, issues);
        }
    }
}

/// Plain strings (element ids, `Extension.url`) carry no rules of their own.
impl Validatable for String {
    fn validate_local(&self, _: &str) -> Result<(), ValidationError> {
        Ok(())
    }

    fn validate_at(&self, _: &str) -> Result<(), ValidationError> {
        Ok(())
    }

    fn collect_binding_issues(&self, _: &str, _: &dyn TerminologyService, _: &mut Vec<ValidationIssue>) {}
}

impl<T: Validatable + ?Sized> Validatable for Box<T> {
    fn validate_local(&self, path: &str) -> Result<(), ValidationError> {
        (**self).validate_local(path)
    }

    fn validate_at(&self, path: &str) -> Result<(), ValidationError> {
        (**self).validate_at(path)
    }

    fn collect_binding_issues(
        &self,
        path: &str,
        service: &dyn TerminologyService,
        issues: &mut Vec<ValidationIssue>,
    ) {
        (**self).collect_binding_issues(path, service, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::r4::{Code, FhirString, Identifier, Id, PositiveInt, Uri};

    fn reference(value: &str) -> Reference {
        Reference::builder().reference(value).build().unwrap()
    }

    #[test]
    fn require_reports_the_path() {
        let err = require::<i32>(None, "NutritionOrder.status").unwrap_err();
        assert_eq!(err.path(), "NutritionOrder.status");
        assert_eq!(err.to_string(), "Missing required element: 'NutritionOrder.status'");
    }

    #[test]
    fn empty_lists_fail_non_empty_lists_pass() {
        assert!(require_non_empty::<u8>(&[], "InsurancePlan.coverage.benefit").is_err());
        assert!(require_non_empty(&[1], "InsurancePlan.coverage.benefit").is_ok());
    }

    #[test]
    fn reference_types_are_read_from_literal_references() {
        let allowed = ["Patient", "Practitioner"];
        assert!(check_reference_type(&reference("Patient/123"), "x", &allowed).is_ok());
        assert!(check_reference_type(&reference("https://example.org/fhir/Practitioner/p1/_history/2"), "x", &allowed).is_ok());
        assert!(check_reference_type(&reference("Patient?identifier=123"), "x", &allowed).is_ok());
        assert!(check_reference_type(&reference("Practitioner?identifier=http://x|123"), "x", &allowed).is_ok());

        let err = check_reference_type(&reference("Device/d1"), "AppointmentResponse.actor", &["Patient"]).unwrap_err();
        assert!(matches!(err, ValidationError::ReferenceTypeNotAllowed { ref actual, .. } if actual == "Device"));
    }

    #[test]
    fn conditional_references_are_typed_by_their_head() {
        let err = check_reference_type(&reference("Device?identifier=abc"), "x", &["Patient"]).unwrap_err();
        assert!(matches!(err, ValidationError::ReferenceTypeNotAllowed { ref actual, .. } if actual == "Device"));
        let err = check_reference_type(&reference("patient?name=x"), "x", &["Patient"]).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidReference { .. }));
    }

    #[test]
    fn local_and_urn_references_are_not_checked() {
        assert!(check_reference_type(&reference("#p1"), "x", &["Organization"]).is_ok());
        assert!(check_reference_type(&reference("urn:uuid:9f1d7cbe-4d1a-4c6e-a3c9-0c4e2d1f8e11"), "x", &["Organization"]).is_ok());
    }

    #[test]
    fn declared_type_must_agree_with_literal() {
        let r = Reference::builder().reference("Patient/1").r#type(Uri::from("Practitioner")).build().unwrap();
        let err = check_reference_type(&r, "x", &["Patient", "Practitioner"]).unwrap_err();
        assert!(matches!(err, ValidationError::ReferenceTypeMismatch { .. }));
    }

    #[test]
    fn unknown_types_are_rejected_even_when_resource_is_allowed() {
        let err = check_reference_type(&reference("Widget/1"), "x", &["Resource"]).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownResourceType { .. }));
        let err = check_reference_type(&reference("not a reference"), "x", &["Resource"]).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidReference { .. }));
    }

    #[test]
    fn identifier_only_references_pass() {
        let r = Reference::builder()
            .identifier(Identifier::builder().value("ORG-1").build().unwrap())
            .build()
            .unwrap();
        assert!(check_reference_type(&r, "x", &["Organization"]).is_ok());
    }

    #[test]
    fn primitive_checks() {
        assert!(check_string(&FhirString::from("  "), "x").is_err());
        assert!(check_string(&FhirString::from("ok"), "x").is_ok());
        assert!(check_code(&Code::from("in-network"), "x").is_ok());
        assert!(check_code(&Code::from(" padded"), "x").is_err());
        assert!(check_id(&Id::from("plan-01.a"), "x").is_ok());
        assert!(check_id(&Id::from("plan_01"), "x").is_err());
        assert!(check_uri(&Uri::from("http://example.org/a b"), "x").is_err());
        assert!(check_positive_int(&PositiveInt::from(0), "x").is_err());
        assert!(check_unsigned_int(&PositiveInt::from(0), "x").is_ok());
    }
}
