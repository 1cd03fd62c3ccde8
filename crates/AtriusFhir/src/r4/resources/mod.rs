pub mod appointment_response;
pub use appointment_response::*;
pub mod charge_item_definition;
pub use charge_item_definition::*;
pub mod insurance_plan;
pub use insurance_plan::*;
pub mod nutrition_order;
pub use nutrition_order::*;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use atrius_macros::{FhirPath, FhirValidate, FhirVisit};

use crate::error::FhirError;
use crate::resource::FhirResource;

/// Any resource this crate models, tagged by `resourceType` in JSON.
///
/// Also the element type of `contained`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FhirVisit, FhirValidate, FhirPath)]
#[serde(tag = "resourceType")]
pub enum Resource {
    AppointmentResponse(Box<AppointmentResponse>),
    ChargeItemDefinition(Box<ChargeItemDefinition>),
    InsurancePlan(Box<InsurancePlan>),
    NutritionOrder(Box<NutritionOrder>),
}

fn parse_as<T: DeserializeOwned>(value: Value) -> Result<Box<T>, FhirError> {
    serde_path_to_error::deserialize(value)
        .map(Box::new)
        .map_err(|err| FhirError::Json { path: err.path().to_string(), source: err.into_inner() })
}

impl Resource {
    /// Parses FHIR JSON and validates the result recursively.
    ///
    /// ```rust
    /// use atrius_fhir_lib::r4::Resource;
    /// use atrius_fhir_lib::FhirResource;
    ///
    /// let json = r#"{
    ///     "resourceType": "AppointmentResponse",
    ///     "appointment": {"reference": "Appointment/example"},
    ///     "participantStatus": "accepted"
    /// }"#;
    /// let resource = Resource::from_json_str(json).unwrap();
    /// assert_eq!(resource.resource_type(), "AppointmentResponse");
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, FhirError> {
        let value: Value =
            serde_json::from_str(json).map_err(|source| FhirError::Json { path: String::new(), source })?;
        Self::from_json_value(value)
    }

    /// Like [`Resource::from_json_str`], from an already parsed JSON tree.
    pub fn from_json_value(value: Value) -> Result<Self, FhirError> {
        let resource_type = match value.get("resourceType") {
            Some(Value::String(name)) => name.clone(),
            _ => return Err(FhirError::MissingResourceType),
        };

        let resource = match resource_type.as_str() {
            "AppointmentResponse" => Resource::AppointmentResponse(parse_as(value)?),
            "ChargeItemDefinition" => Resource::ChargeItemDefinition(parse_as(value)?),
            "InsurancePlan" => Resource::InsurancePlan(parse_as(value)?),
            "NutritionOrder" => Resource::NutritionOrder(parse_as(value)?),
            _ => return Err(FhirError::UnsupportedResourceType(resource_type)),
        };

        resource.validate()?;
        debug!(resource_type = resource.resource_type(), "parsed resource");
        Ok(resource)
    }

    pub fn to_json_string(&self) -> Result<String, FhirError> {
        serde_json::to_string(self).map_err(FhirError::Serialize)
    }

    pub fn to_json_string_pretty(&self) -> Result<String, FhirError> {
        serde_json::to_string_pretty(self).map_err(FhirError::Serialize)
    }

    pub fn to_json_value(&self) -> Result<Value, FhirError> {
        serde_json::to_value(self).map_err(FhirError::Serialize)
    }

    /// The wrapped resource as a trait object.
    pub fn as_resource(&self) -> &dyn FhirResource {
        match self {
            Resource::AppointmentResponse(r) => r.as_ref(),
            Resource::ChargeItemDefinition(r) => r.as_ref(),
            Resource::InsurancePlan(r) => r.as_ref(),
            Resource::NutritionOrder(r) => r.as_ref(),
        }
    }
}

impl FhirResource for Resource {
    fn resource_type(&self) -> &'static str {
        self.as_resource().resource_type()
    }
}

macro_rules! resource_from {
    ($($name:ident),*) => {
        $(
            impl From<$name> for Resource {
                fn from(resource: $name) -> Self {
                    Resource::$name(Box::new(resource))
                }
            }
        )*
    };
}

resource_from!(AppointmentResponse, ChargeItemDefinition, InsurancePlan, NutritionOrder);
