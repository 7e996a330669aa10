//! Input events delivered by the page host
//!
//! Events are plain values. Handlers receive them by shared reference and may
//! call [`Event::prevent_default`] to suppress the host's default action
//! (for example following a link).

use std::cell::Cell;

/// Kinds of events a node can listen for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventType {
    Click,
    KeyDown,
    TouchStart,
    TouchEnd,
    PointerEnter,
    PointerLeave,
    /// A resource referenced by the node (an image source) failed to load
    ResourceError,
}

/// Logical keys the front-end reacts to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Enter,
    Escape,
    Other(char),
}

/// An input event
#[derive(Debug, Clone)]
pub struct Event {
    kind: EventType,
    key: Option<Key>,
    client_x: f32,
    default_prevented: Cell<bool>,
}

impl Event {
    /// Create an event of the given type with no payload
    pub fn new(kind: EventType) -> Self {
        Self {
            kind,
            key: None,
            client_x: 0.0,
            default_prevented: Cell::new(false),
        }
    }

    pub fn click() -> Self {
        Self::new(EventType::Click)
    }

    pub fn key_down(key: Key) -> Self {
        Self {
            key: Some(key),
            ..Self::new(EventType::KeyDown)
        }
    }

    /// Touch contact started at horizontal client position `x`
    pub fn touch_start(x: f32) -> Self {
        Self {
            client_x: x,
            ..Self::new(EventType::TouchStart)
        }
    }

    /// Touch contact ended at horizontal client position `x`
    pub fn touch_end(x: f32) -> Self {
        Self {
            client_x: x,
            ..Self::new(EventType::TouchEnd)
        }
    }

    pub fn pointer_enter() -> Self {
        Self::new(EventType::PointerEnter)
    }

    pub fn pointer_leave() -> Self {
        Self::new(EventType::PointerLeave)
    }

    pub fn resource_error() -> Self {
        Self::new(EventType::ResourceError)
    }

    pub fn kind(&self) -> EventType {
        self.kind
    }

    pub fn key(&self) -> Option<Key> {
        self.key
    }

    pub fn client_x(&self) -> f32 {
        self.client_x
    }

    /// Suppress the host's default action for this event
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_payload() {
        let start = Event::touch_start(300.0);
        assert_eq!(start.kind(), EventType::TouchStart);
        assert_eq!(start.client_x(), 300.0);
        assert_eq!(start.key(), None);
    }

    #[test]
    fn test_key_payload() {
        let event = Event::key_down(Key::ArrowLeft);
        assert_eq!(event.kind(), EventType::KeyDown);
        assert_eq!(event.key(), Some(Key::ArrowLeft));
    }

    #[test]
    fn test_prevent_default_through_shared_ref() {
        let event = Event::click();
        assert!(!event.default_prevented());

        let handler = |e: &Event| e.prevent_default();
        handler(&event);

        assert!(event.default_prevented());
    }
}
