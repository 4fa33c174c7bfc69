//! CSS parsing utilities.

mod color;
mod stylesheet;

pub use color::Color;
pub use stylesheet::{
    Declaration, Origin, PropertyRegistration, StyleRule, Stylesheet, parse_style_attribute,
};
