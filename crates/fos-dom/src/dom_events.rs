//! DOM Events
//!
//! Script-visible events (keyboard, mouse, pointer, custom) and the
//! listener type stored by `Document`.

use std::rc::Rc;

use crate::{Document, NodeId};

/// Listener callback. Receives the document so handlers can read and mutate
/// the tree while the event is being dispatched.
pub type EventListener = Rc<dyn Fn(&mut Document, &mut Event)>;

/// Handle returned by `Document::add_event_listener`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u32);

/// Flags shared by every event constructor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventInit {
    pub bubbles: bool,
    pub cancelable: bool,
    pub composed: bool,
}

impl EventInit {
    /// bubbles + cancelable + composed, as user-input events are
    pub fn user_input() -> Self {
        Self { bubbles: true, cancelable: true, composed: true }
    }
}

/// Keyboard event payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardEventInit {
    pub key: String,
    pub repeat: bool,
}

/// Mouse event payload
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MouseEventInit {
    pub client_x: f64,
    pub client_y: f64,
    pub button: i16,
}

/// Pointer event payload
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEventInit {
    pub pointer_id: i32,
    pub pointer_type: String,
    pub client_x: f64,
    pub client_y: f64,
}

/// Interface-specific event data
#[derive(Debug, Clone, PartialEq)]
pub enum EventDetail {
    None,
    Keyboard(KeyboardEventInit),
    Mouse(MouseEventInit),
    Pointer(PointerEventInit),
}

/// DOM event
#[derive(Debug, Clone)]
pub struct Event {
    pub event_type: String,
    pub target: Option<NodeId>,
    pub current_target: Option<NodeId>,
    pub bubbles: bool,
    pub cancelable: bool,
    pub composed: bool,
    pub detail: EventDetail,
    default_prevented: bool,
    propagation_stopped: bool,
    immediate_propagation_stopped: bool,
}

impl Event {
    /// Create a plain event
    pub fn new(event_type: &str, init: EventInit) -> Self {
        Self::with_detail(event_type, init, EventDetail::None)
    }

    fn with_detail(event_type: &str, init: EventInit, detail: EventDetail) -> Self {
        Self {
            event_type: event_type.to_string(),
            target: None,
            current_target: None,
            bubbles: init.bubbles,
            cancelable: init.cancelable,
            composed: init.composed,
            detail,
            default_prevented: false,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
        }
    }

    /// Bubbling, non-cancelable notification (e.g. `trix-undo`)
    pub fn custom(event_type: &str) -> Self {
        Self::new(event_type, EventInit { bubbles: true, ..Default::default() })
    }

    /// Keyboard event with the given `key` value
    pub fn keyboard(event_type: &str, key: &str) -> Self {
        Self::with_detail(
            event_type,
            EventInit::user_input(),
            EventDetail::Keyboard(KeyboardEventInit { key: key.to_string(), repeat: false }),
        )
    }

    /// `keydown` for `key`
    pub fn key_down(key: &str) -> Self {
        Self::keyboard("keydown", key)
    }

    /// `keyup` for `key`
    pub fn key_up(key: &str) -> Self {
        Self::keyboard("keyup", key)
    }

    /// Mouse event
    pub fn mouse(event_type: &str, mouse: MouseEventInit, init: EventInit) -> Self {
        Self::with_detail(event_type, init, EventDetail::Mouse(mouse))
    }

    /// Pointer event
    pub fn pointer(event_type: &str, pointer: PointerEventInit, init: EventInit) -> Self {
        Self::with_detail(event_type, init, EventDetail::Pointer(pointer))
    }

    /// Keyboard `key` value, if this is a keyboard event
    pub fn key(&self) -> Option<&str> {
        match &self.detail {
            EventDetail::Keyboard(k) => Some(&k.key),
            _ => None,
        }
    }

    /// Client coordinates for mouse and pointer events
    pub fn client_point(&self) -> Option<(f64, f64)> {
        match &self.detail {
            EventDetail::Mouse(m) => Some((m.client_x, m.client_y)),
            EventDetail::Pointer(p) => Some((p.client_x, p.client_y)),
            _ => None,
        }
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Stop propagation after the current node's listeners
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Stop propagation and skip the remaining listeners on this node
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }

    /// Check if default was prevented
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub(crate) fn is_immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped
    }
}
