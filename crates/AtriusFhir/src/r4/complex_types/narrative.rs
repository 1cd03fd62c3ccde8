use serde::{Deserialize, Serialize};
use atrius_macros::{FhirBuilder, FhirPath, FhirValidate, FhirVisit};

use crate::element::Element;
use crate::hash_code::HashCode;
use crate::r4::{Extension, Xhtml};
use crate::terminology::NarrativeStatus;

/// Human-readable summary of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
#[serde(rename_all = "camelCase")]
#[fhir_type(name = "Narrative")]
pub struct Narrative {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,
    #[fhir_binding(
        name = "NarrativeStatus",
        strength = "required",
        value_set = "http://hl7.org/fhir/ValueSet/narrative-status|4.0.1"
    )]
    status: Element<NarrativeStatus>,
    /// Limited XHTML content.
    div: Xhtml,
    #[serde(skip)]
    #[fhir_skip]
    hash_memo: HashCode,
}
