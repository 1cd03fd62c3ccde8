use serde::{Deserialize, Serialize};
use atrius_macros::{FhirBuilder, FhirPath, FhirValidate, FhirVisit};

use crate::hash_code::HashCode;
use crate::r4::{Canonical, Coding, Extension, Id, Instant, Uri};

/// Resource metadata maintained by the infrastructure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
#[serde(rename_all = "camelCase")]
#[fhir_type(name = "Meta")]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version_id: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_updated: Option<Instant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<Uri>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    profile: Vec<Canonical>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    security: Vec<Coding>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tag: Vec<Coding>,
    #[serde(skip)]
    #[fhir_skip]
    hash_memo: HashCode,
}
