//! Command-line checks for the Atrius FHIR R4 model.
//!
//! - [`expression`]: parser for the FHIRPath subset used by the model's invariants
//! - [`engine`]: [`engine::PresenceEngine`], a `FhirPathEngine` over that subset
//! - [`report`]: text and JSON output
//! - [`cli`]: argument parsing and the `validate`, `walk` and `describe` commands

pub mod cli;
pub mod engine;
pub mod expression;
pub mod report;
