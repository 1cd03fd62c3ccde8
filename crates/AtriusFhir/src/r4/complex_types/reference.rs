use serde::{Deserialize, Serialize};
use atrius_macros::{FhirBuilder, FhirPath, FhirValidate, FhirVisit};

use crate::hash_code::HashCode;
use crate::r4::{Extension, FhirString, Identifier, Uri};

/// A reference from one resource to another.
///
/// Which resource types a field may point at is declared on the field; the
/// check runs when the containing value is built or parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
#[serde(rename_all = "camelCase")]
#[fhir_type(name = "Reference")]
pub struct Reference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,
    /// Literal reference: relative, absolute, `#contained` or `urn:`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reference: Option<FhirString>,
    /// Type the reference refers to, e.g. `Patient`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    r#type: Option<Uri>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    identifier: Option<Identifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    display: Option<FhirString>,
    #[serde(skip)]
    #[fhir_skip]
    hash_memo: HashCode,
}
