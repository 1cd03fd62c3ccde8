//! # Atrius FHIR Library
//!
//! Immutable FHIR R4 model types for `AppointmentResponse`,
//! `ChargeItemDefinition`, `InsurancePlan` and `NutritionOrder`, together
//! with the datatypes they use.
//!
//! Every type is built through a builder that enforces cardinality,
//! reference-target and primitive-format rules at `build()`. Built values
//! compare structurally, memoize their hash, accept [`visitor::Visitor`]s and
//! carry the FHIRPath invariants and terminology bindings of their
//! definition for an external engine to evaluate.
//!
//! ```rust
//! use atrius_fhir_lib::r4::{InsurancePlan, Reference, Resource};
//! use atrius_fhir_lib::terminology::PublicationStatus;
//!
//! let plan = InsurancePlan::builder()
//!     .status(PublicationStatus::Active)
//!     .name("Gold Plus")
//!     .owned_by(Reference::builder().reference("Organization/acme").build().unwrap())
//!     .build()
//!     .unwrap();
//!
//! let json = Resource::from(plan.clone()).to_json_string().unwrap();
//! let parsed = Resource::from_json_str(&json).unwrap();
//! assert_eq!(parsed, Resource::from(plan));
//! ```
//!
//! ## Features
//!
//! - `R4` (default): the FHIR 4.0.1 model in `r4` and everything built on
//!   it; without it only the precision date/time types, [`HashCode`] and
//!   the resource type list remain

pub mod date_time;
pub mod hash_code;
pub mod resource_types;

#[cfg(feature = "R4")]
pub mod element;
#[cfg(feature = "R4")]
pub mod error;
#[cfg(feature = "R4")]
pub mod precise_decimal;
#[cfg(feature = "R4")]
pub mod r4;
#[cfg(feature = "R4")]
pub mod resource;
#[cfg(feature = "R4")]
pub mod terminology;
#[cfg(feature = "R4")]
pub mod validation_support;
#[cfg(feature = "R4")]
pub mod visitor;

pub use hash_code::HashCode;
#[cfg(feature = "R4")]
pub use element::Element;
#[cfg(feature = "R4")]
pub use error::FhirError;
#[cfg(feature = "R4")]
pub use precise_decimal::PreciseDecimal;
#[cfg(feature = "R4")]
pub use resource::FhirResource;
#[cfg(feature = "R4")]
pub use validation_support::ValidationError;
