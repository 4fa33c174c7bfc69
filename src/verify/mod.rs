//! Requirement verification.
//!
//! A [`Requirement`] names an element by selector, a property, and the value
//! that property should have. The [`Verifier`] reads the value from a
//! [`RenderedDocument`](crate::preview::RenderedDocument), either computed
//! or as the user authored it, and compares it literally or numerically
//! after unit conversion.
//!
//! ```
//! use csskata::preview::PreviewRenderer;
//! use csskata::verify::{Comparator, Requirement, verify};
//!
//! let doc = PreviewRenderer::default().render(
//!     r#"<div class="ball"></div>"#,
//!     ".ball { width: 130px; }",
//! );
//! let wide = Requirement::unit(".ball", "width", Comparator::GreaterOrEqual, "100px");
//! assert!(verify(Some(&doc), &wide.into()));
//! ```

mod evaluate;
mod extract;
mod requirement;
mod task;

pub use evaluate::{Verifier, verify};
pub use extract::{RuleCache, authored_value, extract_value};
pub use requirement::{Comparator, Requirement, RequirementSet, Source, Target};
pub use task::{Task, VerifiedTask, percent_completed};
