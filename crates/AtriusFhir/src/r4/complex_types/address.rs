use serde::{Deserialize, Serialize};
use atrius_macros::{FhirBuilder, FhirPath, FhirValidate, FhirVisit};

use crate::element::Element;
use crate::hash_code::HashCode;
use crate::r4::{Extension, FhirString, Period};
use crate::terminology::{AddressType, AddressUse};

/// A postal or physical address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirBuilder, FhirVisit, FhirValidate, FhirPath)]
#[serde(rename_all = "camelCase")]
#[fhir_type(name = "Address")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[fhir_binding(name = "AddressUse", strength = "required", value_set = "http://hl7.org/fhir/ValueSet/address-use|4.0.1")]
    r#use: Option<Element<AddressUse>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[fhir_binding(name = "AddressType", strength = "required", value_set = "http://hl7.org/fhir/ValueSet/address-type|4.0.1")]
    r#type: Option<Element<AddressType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<FhirString>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    line: Vec<FhirString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    city: Option<FhirString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    district: Option<FhirString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    state: Option<FhirString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    postal_code: Option<FhirString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    country: Option<FhirString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    period: Option<Period>,
    #[serde(skip)]
    #[fhir_skip]
    hash_memo: HashCode,
}
