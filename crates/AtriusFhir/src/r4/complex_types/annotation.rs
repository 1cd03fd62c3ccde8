use serde::{Deserialize, Serialize};
use atrius_macros::{FhirBuilder, FhirPath, FhirValidate, FhirVisit};

use crate::hash_code::HashCode;
use crate::r4::{DateTime, Extension, FhirString, Markdown, Reference};

/// A text note with attribution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
#[serde(rename_all = "camelCase")]
#[fhir_type(name = "Annotation")]
pub struct Annotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    author: Option<AnnotationAuthor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time: Option<DateTime>,
    text: Markdown,
    #[serde(skip)]
    #[fhir_skip]
    hash_memo: HashCode,
}

/// `Annotation.author[x]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirVisit, FhirValidate, FhirPath)]
#[fhir_choice(base = "author")]
pub enum AnnotationAuthor {
    #[serde(rename = "authorReference")]
    Reference(Reference),
    #[serde(rename = "authorString")]
    String(FhirString),
}
