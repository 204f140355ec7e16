//! Activation synthesis
//!
//! Keyboard activation replays the event sequence a mouse click produces.
//! Some toolbar handlers ignore a bare `click` that arrives without the
//! preceding pointer and mouse events.

use fos_dom::{DOMRect, Document, Event, EventInit, MouseEventInit, NodeId, PointerEventInit};

/// Events dispatched for one activation, in order
pub const ACTIVATION_SEQUENCE: [&str; 5] = ["pointerdown", "mousedown", "pointerup", "mouseup", "click"];

/// Capability to activate a control as a pointing device would
pub trait Activate {
    fn activate(&self, doc: &mut Document, target: NodeId);
}

/// Dispatches the full pointer + mouse + click sequence at the control's center
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerSequence;

impl Activate for PointerSequence {
    fn activate(&self, doc: &mut Document, target: NodeId) {
        let (client_x, client_y) = activation_point(doc.bounding_client_rect(target));
        tracing::trace!("Synthesizing activation on {:?} at ({}, {})", target, client_x, client_y);

        for event_type in ACTIVATION_SEQUENCE {
            let event = if event_type.starts_with("pointer") {
                Event::pointer(event_type, PointerEventInit {
                    pointer_id: 1,
                    pointer_type: "mouse".into(),
                    client_x,
                    client_y,
                }, EventInit::user_input())
            } else {
                Event::mouse(event_type, MouseEventInit {
                    client_x,
                    client_y,
                    button: 0,
                }, EventInit::user_input())
            };
            doc.dispatch_event(target, event);
        }
    }
}

/// Center of `rect`, clamped to non-negative finite coordinates. Controls
/// that are not laid out yet still get an activation at the origin.
pub fn activation_point(rect: DOMRect) -> (f64, f64) {
    let (x, y) = rect.center();
    (clamp_coordinate(x), clamp_coordinate(y))
}

fn clamp_coordinate(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_activation_point() {
        assert_eq!(activation_point(DOMRect::from_xywh(10.0, 20.0, 36.0, 36.0)), (28.0, 38.0));
        assert_eq!(activation_point(DOMRect::from_xywh(-50.0, -10.0, 20.0, 4.0)), (0.0, 0.0));
        assert_eq!(activation_point(DOMRect::from_xywh(f64::NAN, 5.0, 0.0, 0.0)), (0.0, 5.0));
    }

    #[test]
    fn test_sequence_order_and_flags() {
        let mut doc = Document::new();
        let button = doc.create_element("button");
        doc.append_child(doc.body(), button).unwrap();
        doc.set_layout_rect(button, DOMRect::from_xywh(100.0, 40.0, 36.0, 36.0));

        let seen = Rc::new(RefCell::new(Vec::new()));
        for event_type in ACTIVATION_SEQUENCE {
            let seen = seen.clone();
            // Listen on body to prove the events bubble.
            doc.add_event_listener(doc.body(), event_type, Rc::new(move |_: &mut Document, ev: &mut Event| {
                assert!(ev.bubbles && ev.cancelable && ev.composed);
                seen.borrow_mut().push((ev.event_type.clone(), ev.client_point()));
            }));
        }

        PointerSequence.activate(&mut doc, button);

        let seen = seen.borrow();
        let types: Vec<&str> = seen.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(types, ACTIVATION_SEQUENCE);
        assert!(seen.iter().all(|(_, p)| *p == Some((118.0, 58.0))));
    }
}
