pub mod address;
pub use address::*;

pub mod annotation;
pub use annotation::*;

pub mod codeable_concept;
pub use codeable_concept::*;

pub mod coding;
pub use coding::*;

pub mod contact_detail;
pub use contact_detail::*;

pub mod contact_point;
pub use contact_point::*;

pub mod extension;
pub use extension::*;

pub mod human_name;
pub use human_name::*;

pub mod identifier;
pub use identifier::*;

pub mod meta;
pub use meta::*;

pub mod money;
pub use money::*;

pub mod narrative;
pub use narrative::*;

pub mod period;
pub use period::*;

pub mod quantity;
pub use quantity::*;

pub mod range;
pub use range::*;

pub mod ratio;
pub use ratio::*;

pub mod reference;
pub use reference::*;

pub mod timing;
pub use timing::*;

pub mod usage_context;
pub use usage_context::*;
