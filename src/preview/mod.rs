//! Sandboxed preview rendering.
//!
//! The preview places the challenge markup inside a container together with
//! two style elements: a reset stylesheet and the user's own styles, the
//! latter carrying a stable marker id so authored rules can be found again.
//!
//! ```
//! use csskata::preview::{PreviewRenderer, RenderedDocument};
//!
//! let renderer = PreviewRenderer::default();
//! let doc = renderer.render(r#"<div class="ball"></div>"#, ".ball { width: 130px; }");
//! let ball = doc.query_selector(".ball").unwrap();
//! assert_eq!(doc.computed_value(ball, None, "width"), "130px");
//! ```

mod document;
mod frame;

pub use document::PreviewDocument;
pub use frame::PreviewFrame;

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Deserialize;

use crate::dom::{NodeId, PseudoElement, parse_html};
use crate::style::{Origin, StyleEnvironment, Stylesheet};
use crate::units::UnitContext;

/// Read-only view of a rendered preview, as the verifier consumes it.
pub trait RenderedDocument {
    /// Identity of this rendering; never shared by two renderings.
    fn revision(&self) -> u64;

    /// First element matching `selector` in document order.
    fn query_selector(&self, selector: &str) -> Option<NodeId>;

    /// Computed value of `property` on an element or one of its
    /// pseudo-elements; `""` for unknown properties.
    fn computed_value(
        &self,
        element: NodeId,
        pseudo: Option<PseudoElement>,
        property: &str,
    ) -> String;

    /// The stylesheet holding the user's authored rules.
    fn user_stylesheet(&self) -> Option<&Stylesheet>;

    /// Bases for converting relative units of `property` on this element.
    fn unit_context(
        &self,
        element: NodeId,
        pseudo: Option<PseudoElement>,
        property: &str,
    ) -> UnitContext;
}

/// Preview settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PreviewConfig {
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub root_font_size: f64,
    /// Stylesheet placed before the user's styles.
    pub reset_styles: String,
    pub container_id: String,
    /// Id of the style element carrying the user's styles.
    pub user_styles_id: String,
}

const DEFAULT_RESET: &str = "\
*, *::before, *::after { box-sizing: border-box; }
* { margin: 0; padding: 0; }
body { line-height: 1.5; }
img, picture, video, canvas, svg { display: block; max-width: 100%; }
";

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 720.0,
            root_font_size: 16.0,
            reset_styles: DEFAULT_RESET.to_string(),
            container_id: "preview-container".to_string(),
            user_styles_id: "user-styles".to_string(),
        }
    }
}

impl PreviewConfig {
    pub fn environment(&self) -> StyleEnvironment {
        StyleEnvironment {
            viewport_width: self.viewport_width,
            viewport_height: self.viewport_height,
            root_font_size: self.root_font_size,
        }
    }
}

/// Browser defaults the preview relies on.
const USER_AGENT_STYLES: &str = "\
html, body, div, p, section, article, header, footer, main, nav, aside,
h1, h2, h3, h4, h5, h6, ul, ol, dl, dt, dd, figure, figcaption, blockquote,
form, fieldset, pre, address, hr, details, summary { display: block; }
head, style, script, title, meta, link, template { display: none; }
li { display: list-item; }
table { display: table; }
caption { display: table-caption; }
thead { display: table-header-group; }
tbody { display: table-row-group; }
tfoot { display: table-footer-group; }
tr { display: table-row; }
td, th { display: table-cell; }
body { margin: 8px; }
h1 { font-size: 2em; }
h2 { font-size: 1.5em; }
h3 { font-size: 1.17em; }
h1, h2, h3, h4, h5, h6, th, b, strong { font-weight: bold; }
em, i { font-style: italic; }
";

static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

/// Renders challenge markup and user styles into preview documents.
#[derive(Debug, Clone, Default)]
pub struct PreviewRenderer {
    config: PreviewConfig,
}

impl PreviewRenderer {
    pub fn new(config: PreviewConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    /// Render `markup` styled by `styles` into a fresh document.
    pub fn render(&self, markup: &str, styles: &str) -> PreviewDocument {
        let html = format!(
            "<!DOCTYPE html><html><head></head><body><div id=\"{container}\">\
             <style>{reset}</style><style id=\"{marker}\">{styles}</style>{markup}</div>\
             </body></html>",
            container = self.config.container_id,
            reset = self.config.reset_styles,
            marker = self.config.user_styles_id,
            styles = sanitize_styles(styles),
        );
        let dom = parse_html(&html);

        let mut sheets = vec![(Stylesheet::parse(USER_AGENT_STYLES), Origin::UserAgent)];
        let mut user_sheet = None;
        for element in dom.elements() {
            if dom.element_name(element).is_none_or(|name| &**name != "style") {
                continue;
            }
            if dom.element_id(element) == Some(self.config.user_styles_id.as_str()) {
                user_sheet = Some(sheets.len());
            }
            sheets.push((Stylesheet::parse(&dom.child_text(element)), Origin::Author));
        }

        let revision = NEXT_REVISION.fetch_add(1, Ordering::Relaxed);
        log::debug!(
            "rendered preview revision {revision} with {} stylesheets",
            sheets.len()
        );
        PreviewDocument::new(revision, dom, sheets, user_sheet, self.config.environment())
    }
}

/// Escape every `</style` so styles cannot close their style element. CSS
/// reads `\/` back as `/`, so strings and selectors keep their meaning.
pub fn sanitize_styles(styles: &str) -> String {
    const CLOSER: &str = "</style";
    let mut out = String::with_capacity(styles.len());
    let mut rest = styles;
    while let Some(start) = rest.find("</") {
        let closes = rest
            .get(start..start + CLOSER.len())
            .is_some_and(|tag| tag.eq_ignore_ascii_case(CLOSER));
        out.push_str(&rest[..=start]);
        if closes {
            out.push('\\');
        }
        rest = &rest[start + 1..];
    }
    out.push_str(rest);
    out
}
