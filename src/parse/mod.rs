//! Parsers that turn raw 512-byte sectors into the structured model in
//! [`crate::model`].

pub mod attributes;
pub mod identify;
pub mod smart_status;

pub use attributes::parse_attributes;
pub use identify::parse_identify;
pub use smart_status::parse_smart_status;
