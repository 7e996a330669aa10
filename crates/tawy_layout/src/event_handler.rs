//! Event handler storage for document nodes
//!
//! Components register their handlers through a [`ListenerSet`], which
//! remembers every listener it added so the whole group can be removed at
//! once when the component rebinds or is torn down.
//!
//! # Example
//!
//! ```rust
//! use tawy_layout::prelude::*;
//!
//! let doc = Document::new();
//! let mut listeners = ListenerSet::new(doc.clone());
//!
//! listeners
//!     .on(ListenerTarget::Document, EventType::KeyDown, |e| {
//!         println!("key: {:?}", e.key());
//!     })
//!     .unwrap();
//! assert_eq!(doc.listener_count(), 1);
//!
//! listeners.clear();
//! assert_eq!(doc.listener_count(), 0);
//! ```

use std::rc::Rc;

use tawy_core::{Event, EventType};

use crate::document::{Document, ListenerId, NodeId};
use crate::error::Result;

/// Callback for handling events
///
/// Uses Rc since the page is single-threaded.
pub type EventCallback = Rc<dyn Fn(&Event)>;

/// Where a listener is attached
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListenerTarget {
    /// A single node; removed together with the node
    Node(NodeId),
    /// The whole document (global key handling)
    Document,
}

/// A group of listeners owned by one component
///
/// Dropping the set removes its listeners from the document.
pub struct ListenerSet {
    document: Document,
    ids: Vec<ListenerId>,
}

impl ListenerSet {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            ids: Vec::new(),
        }
    }

    /// Register a listener and remember it for later removal
    pub fn on<F>(
        &mut self,
        target: ListenerTarget,
        kind: EventType,
        callback: F,
    ) -> Result<ListenerId>
    where
        F: Fn(&Event) + 'static,
    {
        let id = self.document.add_listener(target, kind, callback)?;
        self.ids.push(id);
        Ok(id)
    }

    /// Remove every listener in the set
    ///
    /// Listeners already removed with their node are skipped.
    pub fn clear(&mut self) -> usize {
        self.ids
            .drain(..)
            .filter(|id| self.document.remove_listener(*id))
            .count()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl Drop for ListenerSet {
    fn drop(&mut self) {
        self.clear();
    }
}

impl std::fmt::Debug for ListenerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerSet")
            .field("listeners", &self.ids.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::div;

    #[test]
    fn test_clear_skips_listeners_removed_with_nodes() {
        let doc = Document::new();
        let container = doc.create_element("div");
        doc.append_child(doc.body(), container).unwrap();
        doc.mount(container, &div().class("inner")).unwrap();
        let inner = doc.query_first_class(container, "inner").unwrap();

        let mut set = ListenerSet::new(doc.clone());
        set.on(ListenerTarget::Node(inner), EventType::Click, |_| {})
            .unwrap();
        set.on(ListenerTarget::Document, EventType::KeyDown, |_| {})
            .unwrap();
        assert_eq!(set.len(), 2);

        // Remounting drops the node listener
        doc.mount(container, &div()).unwrap();
        assert_eq!(set.clear(), 1);
        assert!(set.is_empty());
        assert_eq!(doc.listener_count(), 0);
    }

    #[test]
    fn test_drop_removes_listeners() {
        let doc = Document::new();
        {
            let mut set = ListenerSet::new(doc.clone());
            set.on(ListenerTarget::Document, EventType::KeyDown, |_| {})
                .unwrap();
            assert_eq!(doc.listener_count(), 1);
        }
        assert_eq!(doc.listener_count(), 0);
    }

    #[test]
    fn test_unknown_node_is_rejected() {
        let doc = Document::new();
        let node = doc.create_element("div");
        let container = doc.create_element("div");
        doc.append_child(container, node).unwrap();
        doc.clear_children(container);

        let mut set = ListenerSet::new(doc.clone());
        assert!(set
            .on(ListenerTarget::Node(node), EventType::Click, |_| {})
            .is_err());
        assert!(set.is_empty());
    }
}
