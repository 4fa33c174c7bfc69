use super::PreviewDocument;

/// The single live preview of a session.
///
/// Holds at most one document; each replacement drops the previous one so
/// nothing can keep reading a superseded rendering through the frame.
#[derive(Default)]
pub struct PreviewFrame {
    document: Option<PreviewDocument>,
    replacements: u64,
}

impl PreviewFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a freshly rendered document.
    pub fn replace(&mut self, document: PreviewDocument) {
        self.document = Some(document);
        self.replacements += 1;
    }

    /// The current document, once the first render has completed.
    pub fn document(&self) -> Option<&PreviewDocument> {
        self.document.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.document.is_some()
    }

    /// How many renderings have been installed.
    pub fn replacements(&self) -> u64 {
        self.replacements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::{PreviewRenderer, RenderedDocument};

    #[test]
    fn test_replace_swaps_document() {
        let renderer = PreviewRenderer::default();
        let mut frame = PreviewFrame::new();
        assert!(!frame.is_ready());

        let first = renderer.render("", "");
        let first_revision = first.revision();
        frame.replace(first);
        frame.replace(renderer.render("", ""));

        assert_eq!(frame.replacements(), 2);
        let current = frame.document().unwrap();
        assert_ne!(current.revision(), first_revision);
    }
}
