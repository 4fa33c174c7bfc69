use std::cell::RefCell;
use std::collections::HashMap;

use super::RenderedDocument;
use crate::dom::{ArenaDom, NodeId, PseudoElement, query_selector};
use crate::style::properties::{PercentBasis, percent_basis};
use crate::style::{Cascade, ComputedStyle, Origin, StyleEnvironment, Stylesheet};
use crate::units::{UnitContext, try_parse_unit_value};

/// A rendered preview: the parsed document, its stylesheets and the
/// computed style of every element.
pub struct PreviewDocument {
    revision: u64,
    dom: ArenaDom,
    sheets: Vec<(Stylesheet, Origin)>,
    user_sheet: Option<usize>,
    env: StyleEnvironment,
    styles: HashMap<NodeId, ComputedStyle>,
    root_font_size: f64,
    /// Pseudo-element styles, computed on first request.
    pseudo_styles: RefCell<HashMap<(NodeId, PseudoElement), ComputedStyle>>,
}

impl PreviewDocument {
    pub(super) fn new(
        revision: u64,
        dom: ArenaDom,
        sheets: Vec<(Stylesheet, Origin)>,
        user_sheet: Option<usize>,
        env: StyleEnvironment,
    ) -> Self {
        let styles = Self::cascade_for(&sheets, env).compute_all(&dom);
        let root_font_size = dom
            .elements()
            .first()
            .and_then(|root| styles.get(root))
            .map_or(env.root_font_size, ComputedStyle::font_size);
        Self {
            revision,
            dom,
            sheets,
            user_sheet,
            env,
            styles,
            root_font_size,
            pseudo_styles: RefCell::new(HashMap::new()),
        }
    }

    fn cascade_for(sheets: &[(Stylesheet, Origin)], env: StyleEnvironment) -> Cascade<'_> {
        Cascade::new(sheets.iter().map(|(s, o)| (s, *o)).collect(), env)
    }

    pub fn dom(&self) -> &ArenaDom {
        &self.dom
    }

    /// Every stylesheet in cascade order, user-agent first.
    pub fn stylesheets(&self) -> impl Iterator<Item = (&Stylesheet, Origin)> {
        self.sheets.iter().map(|(s, o)| (s, *o))
    }

    pub fn element_style(&self, element: NodeId) -> Option<&ComputedStyle> {
        self.styles.get(&element)
    }

    /// Run `f` on the style of an element or one of its pseudo-elements.
    fn with_style<R>(
        &self,
        element: NodeId,
        pseudo: Option<PseudoElement>,
        f: impl FnOnce(&ComputedStyle, Option<&ComputedStyle>) -> R,
    ) -> Option<R> {
        let style = self.styles.get(&element)?;
        let Some(pseudo) = pseudo else {
            let parent = self
                .dom
                .parent_element(element)
                .and_then(|p| self.styles.get(&p));
            return Some(f(style, parent));
        };

        let mut cache = self.pseudo_styles.borrow_mut();
        let pseudo_style = cache.entry((element, pseudo)).or_insert_with(|| {
            Self::cascade_for(&self.sheets, self.env).compute_pseudo(
                &self.dom,
                element,
                pseudo,
                style,
                self.root_font_size,
            )
        });
        Some(f(pseudo_style, Some(style)))
    }
}

/// A computed value in px, when it is one.
fn px_value(style: &ComputedStyle, property: &str) -> Option<f64> {
    try_parse_unit_value(&style.get(property), Some(property))
        .filter(|v| v.unit == "px")
        .map(|v| v.value)
}

impl RenderedDocument for PreviewDocument {
    fn revision(&self) -> u64 {
        self.revision
    }

    fn query_selector(&self, selector: &str) -> Option<NodeId> {
        query_selector(&self.dom, selector)
    }

    fn computed_value(
        &self,
        element: NodeId,
        pseudo: Option<PseudoElement>,
        property: &str,
    ) -> String {
        self.with_style(element, pseudo, |style, _| style.get(property))
            .unwrap_or_default()
    }

    fn user_stylesheet(&self) -> Option<&Stylesheet> {
        self.user_sheet
            .and_then(|index| self.sheets.get(index))
            .map(|(sheet, _)| sheet)
    }

    fn unit_context(
        &self,
        element: NodeId,
        pseudo: Option<PseudoElement>,
        property: &str,
    ) -> UnitContext {
        let property = property.to_ascii_lowercase();
        let root_font_size = self.root_font_size;
        let env = self.env;
        self.with_style(element, pseudo, |style, parent| {
            let parent_font_size = parent.map_or(env.root_font_size, ComputedStyle::font_size);
            let percent_basis = percent_basis(&property).and_then(|basis| match basis {
                PercentBasis::ParentWidth => parent.and_then(|p| px_value(p, "width")),
                PercentBasis::ParentHeight => parent.and_then(|p| px_value(p, "height")),
                PercentBasis::ParentFontSize => Some(parent_font_size),
                PercentBasis::OwnFontSize => Some(style.font_size()),
                PercentBasis::OwnWidth => px_value(style, "width"),
            });
            UnitContext {
                font_size: style.font_size(),
                parent_font_size,
                root_font_size,
                viewport_width: env.viewport_width,
                viewport_height: env.viewport_height,
                percent_basis,
            }
        })
        .unwrap_or(UnitContext {
            font_size: env.root_font_size,
            parent_font_size: env.root_font_size,
            root_font_size,
            viewport_width: env.viewport_width,
            viewport_height: env.viewport_height,
            percent_basis: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::preview::{PreviewRenderer, RenderedDocument};

    #[test]
    fn test_pseudo_element_values() {
        let doc = PreviewRenderer::default().render(
            r#"<div id="card"></div>"#,
            r#"#card::before { content: ""; z-index: -1; position: absolute; }"#,
        );
        let card = doc.query_selector("#card").unwrap();
        let before = crate::dom::PseudoElement::Before;
        assert_eq!(doc.computed_value(card, Some(before), "z-index"), "-1");
        assert_eq!(doc.computed_value(card, Some(before), "position"), "absolute");
        assert_eq!(doc.computed_value(card, None, "z-index"), "auto");
    }

    #[test]
    fn test_unit_context_percent_basis() {
        let doc = PreviewRenderer::default().render(
            r#"<div id="outer"><div id="inner"></div></div>"#,
            "#outer { width: 400px; font-size: 20px; } #inner { width: 50%; }",
        );
        let inner = doc.query_selector("#inner").unwrap();
        let ctx = doc.unit_context(inner, None, "width");
        assert_eq!(ctx.percent_basis, Some(400.0));
        assert_eq!(ctx.font_size, 20.0);
        assert_eq!(ctx.parent_font_size, 20.0);
        assert_eq!(ctx.root_font_size, 16.0);

        let outer = doc.query_selector("#outer").unwrap();
        // The container's width is `auto`.
        assert_eq!(doc.unit_context(outer, None, "width").percent_basis, None);
    }

    #[test]
    fn test_unknown_element_values_are_empty() {
        let doc = PreviewRenderer::default().render("", "");
        let bogus = crate::dom::NodeId(u32::MAX - 1);
        assert_eq!(doc.computed_value(bogus, None, "width"), "");
    }
}
