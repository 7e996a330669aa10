//! Scroll-to-section collaborator
//!
//! Call-to-action buttons that point at an in-page anchor hand the anchor to a
//! [`SectionScroller`] instead of letting the host navigate.

use tawy_layout::Document;
use tracing::debug;

/// Height of the fixed navigation bar kept clear above a scrolled-to section
pub const DEFAULT_HEADER_OFFSET: f32 = 80.0;

/// Scrolls the page to an in-page section
pub trait SectionScroller {
    /// `selector` is the anchor as written in the slide, e.g. `#about`
    fn scroll_to_section(&self, selector: &str);
}

impl<F> SectionScroller for F
where
    F: Fn(&str),
{
    fn scroll_to_section(&self, selector: &str) {
        self(selector)
    }
}

/// Scrolls a [`Document`] so the target sits just below the navigation bar
#[derive(Debug, Clone)]
pub struct DocumentScroller {
    document: Document,
    header_offset: f32,
}

impl DocumentScroller {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            header_offset: DEFAULT_HEADER_OFFSET,
        }
    }

    pub fn header_offset(mut self, offset: f32) -> Self {
        self.header_offset = offset;
        self
    }
}

impl SectionScroller for DocumentScroller {
    fn scroll_to_section(&self, selector: &str) {
        let Some(id) = selector.strip_prefix('#').filter(|id| !id.is_empty()) else {
            debug!(%selector, "not an anchor selector, ignoring");
            return;
        };
        let Some(target) = self.document.get_element_by_id(id) else {
            debug!(%selector, "scroll target not found");
            return;
        };
        let top = self.document.offset_top(target).unwrap_or(0.0) - self.header_offset;
        self.document.scroll_to(top);
    }
}
