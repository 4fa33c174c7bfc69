//! Style system: stylesheet parsing, the cascade and computed values.
//!
//! This module contains:
//! - Component values and their normalized serialization
//! - Stylesheet and `@property` parsing
//! - The longhand property table and shorthand expansion
//! - The cascade, `var()` substitution and computed-value rules

mod cascade;
mod compute;
pub(crate) mod parse;
pub mod properties;
pub mod shorthand;
mod transform;
pub mod values;

pub use cascade::{Cascade, ComputedStyle, StyleEnvironment};
pub use compute::{ComputeContext, length_px};
pub use parse::{
    Color, Declaration, Origin, PropertyRegistration, StyleRule, Stylesheet, parse_style_attribute,
};
pub use transform::matrix_rotation_degrees;
pub use values::{ComponentValue, parse_value_text, to_css};
