//! FHIR R4 (4.0.1) model types.

pub mod complex_types;
pub use complex_types::*;

pub mod resources;
pub use resources::*;

use crate::date_time::{PrecisionDate, PrecisionDateTime, PrecisionInstant, PrecisionTime};
use crate::element::Element;
use crate::precise_decimal::PreciseDecimal;

pub type FhirString = Element<String>;
pub type Code = Element<String>;
pub type Id = Element<String>;
pub type Uri = Element<String>;
pub type Url = Element<String>;
pub type Canonical = Element<String>;
pub type Markdown = Element<String>;
pub type Xhtml = Element<String>;
pub type Boolean = Element<bool>;
pub type Integer = Element<i32>;
pub type PositiveInt = Element<i32>;
pub type UnsignedInt = Element<i32>;
pub type Decimal = Element<PreciseDecimal>;
pub type Date = Element<PrecisionDate>;
pub type DateTime = Element<PrecisionDateTime>;
pub type Instant = Element<PrecisionInstant>;
pub type Time = Element<PrecisionTime>;
