//! Preview document tree.
//!
//! Markup is parsed by html5ever into an arena ([`ArenaDom`]) which the
//! selector engine can walk.
//!
//! ```
//! use csskata::dom::{parse_html, query_selector};
//!
//! let dom = parse_html(r#"<div id="card" class="tile"></div>"#);
//! let card = query_selector(&dom, ".tile").unwrap();
//! assert_eq!(dom.element_id(card), Some("card"));
//! ```

mod arena;
mod element_ref;
mod selector;
mod tree_sink;

pub use arena::{ArenaDom, Attribute, Node, NodeData, NodeId};
pub use element_ref::{ElementRef, PreviewSelectors};
pub use selector::{
    ParsedSelector, PseudoElement, normalize_selector_text, parse_selector_list, query_selector,
    split_selector_list,
};

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

use tree_sink::ArenaSink;

/// Parse an HTML document (or fragment, which html5ever wraps in
/// `html`/`head`/`body`).
pub fn parse_html(html: &str) -> ArenaDom {
    parse_document(ArenaSink::new(), ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes())
        .into_dom()
}
