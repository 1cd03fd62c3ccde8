use serde::{Deserialize, Serialize};
use atrius_macros::{FhirBuilder, FhirPath, FhirValidate, FhirVisit};

use crate::hash_code::HashCode;
use crate::r4::{Coding, Extension, FhirString};

/// A concept given by codings from one or more systems and/or free text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
#[serde(rename_all = "camelCase")]
#[fhir_type(name = "CodeableConcept")]
pub struct CodeableConcept {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    coding: Vec<Coding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<FhirString>,
    #[serde(skip)]
    #[fhir_skip]
    hash_memo: HashCode,
}

impl CodeableConcept {
    pub fn from_coding(coding: Coding) -> Self {
        CodeableConcept {
            id: None,
            extension: Vec::new(),
            coding: vec![coding],
            text: None,
            hash_memo: HashCode::default(),
        }
    }

    /// Whether any coding carries `system` and `code`.
    pub fn has_coding(&self, system: &str, code: &str) -> bool {
        self.coding.iter().any(|c| {
            c.system().and_then(|s| s.value()).is_some_and(|s| s == system)
                && c.code().and_then(|v| v.value()).is_some_and(|v| v == code)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn an_empty_concept_cannot_be_built() {
        let err = CodeableConcept::builder().build().unwrap_err();
        assert_eq!(err.path(), "CodeableConcept");
    }

    #[test]
    fn codings_are_searched_by_system_and_code() {
        let concept = CodeableConcept::builder()
            .add_coding(Coding::from_code("http://snomed.info/sct", "226211001"))
            .text("Pureed diet")
            .build()
            .unwrap();
        assert!(concept.has_coding("http://snomed.info/sct", "226211001"));
        assert!(!concept.has_coding("http://loinc.org", "226211001"));
    }
}
