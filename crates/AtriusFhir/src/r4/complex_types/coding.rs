use serde::{Deserialize, Serialize};
use atrius_macros::{FhirBuilder, FhirPath, FhirValidate, FhirVisit};

use crate::element::Element;
use crate::hash_code::HashCode;
use crate::r4::{Boolean, Code, Extension, FhirString, Uri};

/// A reference to a code defined by a terminology system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
#[serde(rename_all = "camelCase")]
#[fhir_type(name = "Coding")]
pub struct Coding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    system: Option<Uri>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<FhirString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    code: Option<Code>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    display: Option<FhirString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_selected: Option<Boolean>,
    #[serde(skip)]
    #[fhir_skip]
    hash_memo: HashCode,
}

impl Coding {
    /// A coding holding just `system` and `code`.
    pub fn from_code(system: impl Into<String>, code: impl Into<String>) -> Self {
        Coding {
            id: None,
            extension: Vec::new(),
            system: Some(Element::new(system.into())),
            version: None,
            code: Some(Element::new(code.into())),
            display: None,
            user_selected: None,
            hash_memo: HashCode::default(),
        }
    }
}
