//! # csskata
//!
//! Interactive CSS challenges with automated checking of the learner's
//! styles.
//!
//! ## Features
//!
//! - Render challenge markup and user styles into a preview document with a
//!   real cascade: specificity, inheritance, `var()`, `@property`, shorthands
//! - Read computed values (including `::before` / `::after`) or the values
//!   exactly as authored in the user's stylesheet
//! - Compare values literally, or numerically across units (`2.5s` against
//!   `2500ms`, `45deg` against a rotation matrix, `em` against `px`)
//! - Sequence edits, renders and verification passes so results always
//!   describe the newest edit
//!
//! ## Quick Start
//!
//! ```
//! use csskata::challenge::Catalog;
//! use csskata::preview::PreviewRenderer;
//! use csskata::verify::{Verifier, percent_completed};
//!
//! let catalog = Catalog::builtin().unwrap();
//! let snowman = catalog.get("snowman").unwrap();
//!
//! let styles = ".ball { width: 100px; aspect-ratio: 1; border-radius: 50%; }";
//! let document = PreviewRenderer::default().render(&snowman.markup, styles);
//! let tasks = Verifier::new().verify_tasks(Some(&document), &snowman.tasks);
//!
//! assert!(tasks[0].completed);
//! assert_eq!(percent_completed(&tasks), 50);
//! ```

pub mod challenge;
pub mod dom;
pub mod error;
pub mod preview;
pub mod session;
pub mod style;
pub mod units;
pub(crate) mod util;
pub mod verify;

pub use challenge::{Catalog, Challenge};
pub use error::{Error, Result};
pub use preview::{PreviewConfig, PreviewDocument, PreviewRenderer, RenderedDocument};
pub use session::{ChallengeSession, SessionEvent};
pub use verify::{Requirement, RequirementSet, Task, VerifiedTask, Verifier, verify};
