//! Page host document
//!
//! An in-process model of the page a component is mounted into: a node tree
//! with classes, attributes and layout offsets, plus event listeners.
//!
//! # Architecture
//!
//! ```text
//! Element builder (pure data)
//!     ↓ Document::mount(container, &element)
//! Node tree (NodeId per element, replaces the container's subtree)
//!     ↓ Document::add_listener(target, EventType, callback)
//! Listener table (per node, or document-wide for keys)
//!     ↓ Document::dispatch(node, &event)
//! Callbacks invoked, default action applied unless prevented
//! ```
//!
//! `Document` is a cheap handle; clones refer to the same page. Callbacks are
//! invoked with no internal borrow held, so a handler may freely query or
//! mutate the document (including remounting the subtree it belongs to).

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use tawy_core::{Event, EventType};
use tracing::trace;

use crate::element::Element;
use crate::error::{LayoutError, Result};
use crate::event_handler::{EventCallback, ListenerTarget};

/// Class marking a node as not displayed
pub const HIDDEN_CLASS: &str = "is-hidden";

new_key_type! {
    /// Handle to a node in a [`Document`]
    pub struct NodeId;
    /// Handle to a registered event listener
    pub struct ListenerId;
}

struct Node {
    tag: String,
    classes: SmallVec<[String; 4]>,
    attrs: IndexMap<String, String>,
    text: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    offset_top: f32,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            classes: SmallVec::new(),
            attrs: IndexMap::new(),
            text: None,
            parent: None,
            children: Vec::new(),
            offset_top: 0.0,
        }
    }
}

struct Listener {
    target: ListenerTarget,
    kind: EventType,
    seq: u64,
    callback: EventCallback,
}

struct DocumentInner {
    nodes: SlotMap<NodeId, Node>,
    body: NodeId,
    listeners: SlotMap<ListenerId, Listener>,
    next_seq: u64,
    scroll_y: f32,
    last_navigation: Option<String>,
}

impl DocumentInner {
    /// Whether `ancestor` is `node` or one of its ancestors
    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    /// Preorder descendants of `root`, excluding `root` itself
    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = match self.nodes.get(root) {
            Some(node) => node.children.iter().rev().copied().collect(),
            None => return out,
        };
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(node) = self.nodes.get(id) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    fn build(&mut self, element: &Element, parent: NodeId) -> NodeId {
        let mut node = Node::new(element.tag());
        node.classes = element.classes().iter().cloned().collect();
        node.attrs = element
            .attrs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        node.text = element.get_text().map(str::to_string);
        node.parent = Some(parent);

        let id = self.nodes.insert(node);
        if let Some(parent) = self.nodes.get_mut(parent) {
            parent.children.push(id);
        }
        for child in element.get_children() {
            self.build(child, id);
        }
        id
    }

    /// Remove every descendant of `root` together with its listeners
    fn clear_children(&mut self, root: NodeId) -> usize {
        let removed = self.descendants(root);
        for id in &removed {
            self.nodes.remove(*id);
        }
        self.listeners.retain(|_, l| match l.target {
            ListenerTarget::Node(node) => !removed.contains(&node),
            ListenerTarget::Document => true,
        });
        if let Some(node) = self.nodes.get_mut(root) {
            node.children.clear();
        }
        removed.len()
    }

    fn snapshot(&self, id: NodeId) -> Option<Element> {
        let node = self.nodes.get(id)?;
        let mut element = Element::new(node.tag.clone());
        if !node.classes.is_empty() {
            element = element.class(&node.classes.join(" "));
        }
        for (name, value) in &node.attrs {
            element = element.attr(name.clone(), value.clone());
        }
        if let Some(text) = &node.text {
            element = element.text(text.clone());
        }
        let children = node.children.iter().filter_map(|c| self.snapshot(*c));
        Some(element.children(children.collect::<Vec<_>>()))
    }

    fn callbacks_for(&self, target: ListenerTarget, kind: EventType) -> Vec<EventCallback> {
        let mut matching: Vec<&Listener> = self
            .listeners
            .values()
            .filter(|l| l.target == target && l.kind == kind)
            .collect();
        matching.sort_by_key(|l| l.seq);
        matching.into_iter().map(|l| Rc::clone(&l.callback)).collect()
    }
}

/// Result of dispatching an event
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Number of listeners invoked
    pub handled: usize,
    /// Whether a listener suppressed the default action
    pub default_prevented: bool,
}

/// Handle to a page host document
#[derive(Clone)]
pub struct Document {
    inner: Rc<RefCell<DocumentInner>>,
}

impl Document {
    /// Create an empty document containing only a `<body>`
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let body = nodes.insert(Node::new("body"));
        Self {
            inner: Rc::new(RefCell::new(DocumentInner {
                nodes,
                body,
                listeners: SlotMap::with_key(),
                next_seq: 0,
                scroll_y: 0.0,
                last_navigation: None,
            })),
        }
    }

    pub fn body(&self) -> NodeId {
        self.inner.borrow().body
    }

    // =========================================================================
    // Tree construction
    // =========================================================================

    /// Create a detached element node
    pub fn create_element(&self, tag: &str) -> NodeId {
        self.inner.borrow_mut().nodes.insert(Node::new(tag))
    }

    /// Append `child` to `parent`, detaching it from any previous parent
    ///
    /// A node cannot be appended to itself or to one of its descendants.
    pub fn append_child(&self, parent: NodeId, child: NodeId) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        if !inner.nodes.contains_key(parent) {
            return Err(LayoutError::UnknownNode(parent));
        }
        let old_parent = match inner.nodes.get(child) {
            Some(node) => node.parent,
            None => return Err(LayoutError::UnknownNode(child)),
        };
        if inner.is_inclusive_ancestor(child, parent) {
            return Err(LayoutError::HierarchyCycle { parent, child });
        }
        if let Some(old) = old_parent.and_then(|p| inner.nodes.get_mut(p)) {
            old.children.retain(|c| *c != child);
        }
        inner.nodes[child].parent = Some(parent);
        inner.nodes[parent].children.push(child);
        Ok(())
    }

    /// Replace the children of `container` with the subtree described by `element`
    ///
    /// Everything previously under the container is removed, including the
    /// listeners attached to it. Returns the id of the new subtree root.
    pub fn mount(&self, container: NodeId, element: &Element) -> Result<NodeId> {
        let mut inner = self.inner.borrow_mut();
        if !inner.nodes.contains_key(container) {
            return Err(LayoutError::UnknownNode(container));
        }
        let removed = inner.clear_children(container);
        let root = inner.build(element, container);
        trace!(?container, removed, "subtree mounted");
        Ok(root)
    }

    /// Remove every descendant of `container`; returns the number removed
    pub fn clear_children(&self, container: NodeId) -> usize {
        self.inner.borrow_mut().clear_children(container)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn contains(&self, node: NodeId) -> bool {
        self.inner.borrow().nodes.contains_key(node)
    }

    /// Find an element attached to the body by its `id` attribute
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        let body = self.body();
        self.query_id(body, id)
    }

    /// Like [`Document::get_element_by_id`], failing when absent
    pub fn require_element_by_id(&self, id: &str) -> Result<NodeId> {
        self.get_element_by_id(id)
            .ok_or_else(|| LayoutError::ContainerNotFound(id.to_string()))
    }

    /// First descendant of `root` with the given `id` attribute
    pub fn query_id(&self, root: NodeId, id: &str) -> Option<NodeId> {
        let inner = self.inner.borrow();
        inner
            .descendants(root)
            .into_iter()
            .find(|n| inner.nodes[*n].attrs.get("id").map(String::as_str) == Some(id))
    }

    /// Descendants of `root` carrying `class`, in document order
    pub fn query_class(&self, root: NodeId, class: &str) -> Vec<NodeId> {
        let inner = self.inner.borrow();
        inner
            .descendants(root)
            .into_iter()
            .filter(|n| inner.nodes[*n].classes.iter().any(|c| c == class))
            .collect()
    }

    /// First descendant of `root` carrying `class`
    pub fn query_first_class(&self, root: NodeId, class: &str) -> Option<NodeId> {
        self.query_class(root, class).into_iter().next()
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.inner
            .borrow()
            .nodes
            .get(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.inner.borrow().nodes.get(node)?.parent
    }

    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let inner = self.inner.borrow();
        let parent = inner.nodes.get(node)?.parent?;
        let siblings = &inner.nodes.get(parent)?.children;
        let index = siblings.iter().position(|c| *c == node)?;
        siblings.get(index + 1).copied()
    }

    pub fn tag(&self, node: NodeId) -> Option<String> {
        self.inner.borrow().nodes.get(node).map(|n| n.tag.clone())
    }

    // =========================================================================
    // Classes, attributes, text
    // =========================================================================

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.inner
            .borrow()
            .nodes
            .get(node)
            .is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    /// Add a class; returns `false` if the node does not exist
    pub fn add_class(&self, node: NodeId, class: &str) -> bool {
        let mut inner = self.inner.borrow_mut();
        let Some(n) = inner.nodes.get_mut(node) else {
            return false;
        };
        if !n.classes.iter().any(|c| c == class) {
            n.classes.push(class.to_string());
        }
        true
    }

    /// Remove a class; returns `false` if the node does not exist
    pub fn remove_class(&self, node: NodeId, class: &str) -> bool {
        let mut inner = self.inner.borrow_mut();
        let Some(n) = inner.nodes.get_mut(node) else {
            return false;
        };
        n.classes.retain(|c| c != class);
        true
    }

    pub fn toggle_class(&self, node: NodeId, class: &str, on: bool) -> bool {
        if on {
            self.add_class(node, class)
        } else {
            self.remove_class(node, class)
        }
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.inner.borrow().nodes.get(node)?.attrs.get(name).cloned()
    }

    pub fn set_attr(&self, node: NodeId, name: &str, value: impl Into<String>) -> bool {
        let mut inner = self.inner.borrow_mut();
        match inner.nodes.get_mut(node) {
            Some(n) => {
                n.attrs.insert(name.to_string(), value.into());
                true
            }
            None => false,
        }
    }

    /// Concatenated text of the node and its descendants
    pub fn text_content(&self, node: NodeId) -> String {
        let inner = self.inner.borrow();
        let mut out = String::new();
        if let Some(text) = inner.nodes.get(node).and_then(|n| n.text.as_deref()) {
            out.push_str(text);
        }
        for id in inner.descendants(node) {
            if let Some(text) = inner.nodes[id].text.as_deref() {
                out.push_str(text);
            }
        }
        out
    }

    /// Whether the node carries [`HIDDEN_CLASS`]
    pub fn is_hidden(&self, node: NodeId) -> bool {
        self.has_class(node, HIDDEN_CLASS)
    }

    pub fn set_hidden(&self, node: NodeId, hidden: bool) -> bool {
        self.toggle_class(node, HIDDEN_CLASS, hidden)
    }

    // =========================================================================
    // Layout metrics & scrolling
    // =========================================================================

    /// Record the vertical offset of a node, as computed by the host layout
    pub fn set_offset_top(&self, node: NodeId, offset: f32) -> bool {
        let mut inner = self.inner.borrow_mut();
        match inner.nodes.get_mut(node) {
            Some(n) => {
                n.offset_top = offset;
                true
            }
            None => false,
        }
    }

    pub fn offset_top(&self, node: NodeId) -> Option<f32> {
        self.inner.borrow().nodes.get(node).map(|n| n.offset_top)
    }

    pub fn scroll_y(&self) -> f32 {
        self.inner.borrow().scroll_y
    }

    pub fn scroll_to(&self, y: f32) {
        self.inner.borrow_mut().scroll_y = y.max(0.0);
    }

    /// Link followed by the most recent unprevented click, if any
    pub fn last_navigation(&self) -> Option<String> {
        self.inner.borrow().last_navigation.clone()
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Register a listener on a node or on the whole document
    pub fn add_listener<F>(
        &self,
        target: ListenerTarget,
        kind: EventType,
        callback: F,
    ) -> Result<ListenerId>
    where
        F: Fn(&Event) + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        if let ListenerTarget::Node(node) = target {
            if !inner.nodes.contains_key(node) {
                return Err(LayoutError::UnknownNode(node));
            }
        }
        let seq = inner.next_seq;
        inner.next_seq += 1;
        Ok(inner.listeners.insert(Listener {
            target,
            kind,
            seq,
            callback: Rc::new(callback),
        }))
    }

    /// Remove a listener; returns `false` if it was already gone
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.inner.borrow_mut().listeners.remove(id).is_some()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Number of document-wide listeners for an event type
    pub fn document_listener_count(&self, kind: EventType) -> usize {
        self.inner
            .borrow()
            .listeners
            .values()
            .filter(|l| l.target == ListenerTarget::Document && l.kind == kind)
            .count()
    }

    /// Deliver an event to the listeners registered on `node`
    ///
    /// Events do not bubble.
    pub fn dispatch(&self, node: NodeId, event: &Event) -> DispatchOutcome {
        let callbacks = self
            .inner
            .borrow()
            .callbacks_for(ListenerTarget::Node(node), event.kind());
        Self::run(callbacks, event)
    }

    /// Deliver an event to the document-wide listeners
    pub fn dispatch_document(&self, event: &Event) -> DispatchOutcome {
        let callbacks = self
            .inner
            .borrow()
            .callbacks_for(ListenerTarget::Document, event.kind());
        Self::run(callbacks, event)
    }

    /// Click a node, following its link unless a listener prevents it
    ///
    /// The link is taken from `href`, falling back to `data-link`.
    pub fn click(&self, node: NodeId) -> DispatchOutcome {
        let event = Event::click();
        let outcome = self.dispatch(node, &event);
        if !outcome.default_prevented {
            let link = self.attr(node, "href").or_else(|| self.attr(node, "data-link"));
            if let Some(link) = link {
                trace!(%link, "default navigation");
                self.inner.borrow_mut().last_navigation = Some(link);
            }
        }
        outcome
    }

    fn run(callbacks: Vec<EventCallback>, event: &Event) -> DispatchOutcome {
        for callback in &callbacks {
            callback(event);
        }
        DispatchOutcome {
            handled: callbacks.len(),
            default_prevented: event.default_prevented(),
        }
    }

    // =========================================================================
    // Serialization
    // =========================================================================

    /// Snapshot a subtree back into an [`Element`]
    pub fn snapshot(&self, node: NodeId) -> Option<Element> {
        self.inner.borrow().snapshot(node)
    }

    /// Serialize a subtree to HTML
    pub fn to_html(&self, node: NodeId) -> String {
        self.snapshot(node).map(|e| e.to_html()).unwrap_or_default()
    }

    /// Serialize the children of `node`, without the node's own tag
    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(node) {
            if let Some(element) = self.snapshot(child) {
                element.write_html(&mut out);
            }
        }
        out
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Document")
            .field("nodes", &inner.nodes.len())
            .field("listeners", &inner.listeners.len())
            .field("scroll_y", &inner.scroll_y)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{div, span};
    use std::cell::Cell;

    fn page_with_container() -> (Document, NodeId) {
        let doc = Document::new();
        let container = doc.create_element("div");
        doc.set_attr(container, "id", "root");
        doc.append_child(doc.body(), container).unwrap();
        (doc, container)
    }

    #[test]
    fn test_get_element_by_id() {
        let (doc, container) = page_with_container();
        assert_eq!(doc.get_element_by_id("root"), Some(container));
        assert_eq!(doc.get_element_by_id("missing"), None);
        assert_eq!(
            doc.require_element_by_id("missing"),
            Err(LayoutError::ContainerNotFound("missing".into()))
        );
    }

    #[test]
    fn test_detached_nodes_are_not_found_by_id() {
        let doc = Document::new();
        let orphan = doc.create_element("div");
        doc.set_attr(orphan, "id", "orphan");
        assert_eq!(doc.get_element_by_id("orphan"), None);
    }

    #[test]
    fn test_mount_replaces_subtree_and_listeners() {
        let (doc, container) = page_with_container();

        let first = doc
            .mount(container, &div().class("a").child(span().class("item")))
            .unwrap();
        let item = doc.query_first_class(container, "item").unwrap();
        doc.add_listener(ListenerTarget::Node(item), EventType::Click, |_| {})
            .unwrap();
        doc.add_listener(ListenerTarget::Document, EventType::KeyDown, |_| {})
            .unwrap();
        assert_eq!(doc.listener_count(), 2);

        let second = doc.mount(container, &div().class("b")).unwrap();
        assert!(!doc.contains(first));
        assert!(!doc.contains(item));
        assert!(doc.contains(second));
        assert_eq!(doc.children(container), vec![second]);
        // Only the document-wide listener survives
        assert_eq!(doc.listener_count(), 1);
    }

    #[test]
    fn test_query_class_document_order() {
        let (doc, container) = page_with_container();
        doc.mount(
            container,
            &div()
                .child(span().class("x").attr("n", "0"))
                .child(div().child(span().class("x").attr("n", "1")))
                .child(span().class("x").attr("n", "2")),
        )
        .unwrap();

        let found: Vec<String> = doc
            .query_class(container, "x")
            .into_iter()
            .filter_map(|n| doc.attr(n, "n"))
            .collect();
        assert_eq!(found, vec!["0", "1", "2"]);
    }

    #[test]
    fn test_next_sibling() {
        let (doc, container) = page_with_container();
        doc.mount(container, &div().child(span().class("a")).child(span().class("b")))
            .unwrap();
        let a = doc.query_first_class(container, "a").unwrap();
        let b = doc.query_first_class(container, "b").unwrap();
        assert_eq!(doc.next_sibling(a), Some(b));
        assert_eq!(doc.next_sibling(b), None);
    }

    #[test]
    fn test_append_child_rejects_cycles() {
        let (doc, container) = page_with_container();
        let inner = doc.create_element("div");
        let leaf = doc.create_element("span");
        doc.append_child(container, inner).unwrap();
        doc.append_child(inner, leaf).unwrap();

        assert_eq!(
            doc.append_child(leaf, container),
            Err(LayoutError::HierarchyCycle {
                parent: leaf,
                child: container
            })
        );
        assert!(doc.append_child(inner, inner).is_err());

        // Tree left intact and still walkable
        assert_eq!(doc.parent(container), Some(doc.body()));
        assert_eq!(doc.children(leaf), Vec::<NodeId>::new());
        assert_eq!(doc.get_element_by_id("missing"), None);

        // Moving a node to a non-descendant is fine
        doc.append_child(container, leaf).unwrap();
        assert_eq!(doc.parent(leaf), Some(container));
        assert!(doc.children(inner).is_empty());
    }

    #[test]
    fn test_class_mutation() {
        let (doc, container) = page_with_container();
        assert!(doc.add_class(container, "active"));
        assert!(doc.add_class(container, "active"));
        assert!(doc.has_class(container, "active"));
        assert!(doc.remove_class(container, "active"));
        assert!(!doc.has_class(container, "active"));

        assert!(doc.set_hidden(container, true));
        assert!(doc.is_hidden(container));
    }

    #[test]
    fn test_dispatch_in_registration_order() {
        let (doc, container) = page_with_container();
        let log = Rc::new(RefCell::new(Vec::new()));
        for n in 0..3 {
            let log = Rc::clone(&log);
            doc.add_listener(ListenerTarget::Node(container), EventType::Click, move |_| {
                log.borrow_mut().push(n)
            })
            .unwrap();
        }

        let outcome = doc.dispatch(container, &Event::click());
        assert_eq!(outcome.handled, 3);
        assert_eq!(*log.borrow(), vec![0, 1, 2]);

        // Other event types are not delivered
        assert_eq!(doc.dispatch(container, &Event::pointer_enter()).handled, 0);
    }

    #[test]
    fn test_handler_may_mutate_document() {
        let (doc, container) = page_with_container();
        let handle = doc.clone();
        doc.add_listener(ListenerTarget::Node(container), EventType::Click, move |_| {
            handle.mount(container, &div().class("rebuilt")).unwrap();
        })
        .unwrap();

        doc.dispatch(container, &Event::click());
        assert!(doc.query_first_class(container, "rebuilt").is_some());
    }

    #[test]
    fn test_click_follows_link_unless_prevented() {
        let (doc, container) = page_with_container();
        doc.set_attr(container, "data-link", "https://example.com");

        doc.click(container);
        assert_eq!(doc.last_navigation().as_deref(), Some("https://example.com"));

        let (doc, container) = page_with_container();
        doc.set_attr(container, "data-link", "#about");
        let prevented = Rc::new(Cell::new(false));
        let p = Rc::clone(&prevented);
        doc.add_listener(ListenerTarget::Node(container), EventType::Click, move |e| {
            e.prevent_default();
            p.set(true);
        })
        .unwrap();

        let outcome = doc.click(container);
        assert!(outcome.default_prevented);
        assert!(prevented.get());
        assert_eq!(doc.last_navigation(), None);
    }

    #[test]
    fn test_inner_html_roundtrips_builder_output() {
        let (doc, container) = page_with_container();
        let ui = div().class("card").child(span().text("a & b"));
        doc.mount(container, &ui).unwrap();
        assert_eq!(doc.inner_html(container), ui.to_html());
    }

    #[test]
    fn test_scroll_clamps_at_zero() {
        let doc = Document::new();
        doc.scroll_to(-20.0);
        assert_eq!(doc.scroll_y(), 0.0);
        doc.scroll_to(420.0);
        assert_eq!(doc.scroll_y(), 420.0);
    }
}
