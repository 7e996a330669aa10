//! Tawy Layout
//!
//! Declarative view construction and the page host document.
//!
//! # Example
//!
//! ```rust
//! use tawy_layout::prelude::*;
//!
//! let doc = Document::new();
//! let container = doc.create_element("div");
//! doc.set_attr(container, "id", "hero");
//! doc.append_child(doc.body(), container).unwrap();
//!
//! let ui = section()
//!     .class("carousel-section")
//!     .child(div().class("slide active").child(h1().text("Welcome")));
//!
//! doc.mount(container, &ui).unwrap();
//! assert_eq!(doc.query_class(container, "slide").len(), 1);
//! ```

pub mod document;
pub mod element;
pub mod error;
pub mod event_handler;

pub use document::{DispatchOutcome, Document, ListenerId, NodeId, HIDDEN_CLASS};
pub use element::{button, div, el, h1, i, img, p, section, span, Element};
pub use error::{LayoutError, Result};
pub use event_handler::{EventCallback, ListenerSet, ListenerTarget};

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::document::{DispatchOutcome, Document, NodeId};
    pub use crate::element::{button, div, el, h1, i, img, p, section, span, Element};
    pub use crate::event_handler::{ListenerSet, ListenerTarget};
    pub use tawy_core::{Event, EventType, Key};
}
