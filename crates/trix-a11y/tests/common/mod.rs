//! Shared page fixtures for retrofit tests

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use fos_dom::{Document, Event, NodeId};
use trix_a11y::{A11yConfig, A11yError, Activate, Retrofit, StatusChannel};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Create an element with `attrs` and append it to `parent`
pub fn element(doc: &mut Document, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
    let id = doc.create_element(tag);
    for (name, value) in attrs {
        doc.set_attribute(id, name, value).unwrap();
    }
    doc.append_child(parent, id).unwrap();
    id
}

pub fn format_button(doc: &mut Document, parent: NodeId, format: &str, disabled: bool) -> NodeId {
    let button = element(doc, parent, "button", &[
        ("type", "button"),
        ("class", "trix-button trix-button--icon"),
        ("data-trix-attribute", format),
    ]);
    if disabled {
        doc.set_attribute(button, "disabled", "").unwrap();
    }
    button
}

pub fn action_button(doc: &mut Document, parent: NodeId, action: &str) -> NodeId {
    element(doc, parent, "button", &[
        ("type", "button"),
        ("class", "trix-button trix-button--icon"),
        ("data-trix-action", action),
    ])
}

/// Toolbar with one format button per `(format, disabled)` pair
pub fn toolbar(doc: &mut Document, parent: NodeId, id: &str, buttons: &[(&str, bool)]) -> (NodeId, Vec<NodeId>) {
    let toolbar = element(doc, parent, "trix-toolbar", &[("id", id)]);
    let group = element(doc, toolbar, "span", &[("class", "trix-button-group")]);
    let buttons = buttons
        .iter()
        .map(|&(format, disabled)| format_button(doc, group, format, disabled))
        .collect();
    (toolbar, buttons)
}

/// Link dialog panel inside `toolbar`; returns (dialog, url input, [link, unlink])
pub fn link_dialog(doc: &mut Document, toolbar: NodeId) -> (NodeId, NodeId, [NodeId; 2]) {
    let dialogs = element(doc, toolbar, "div", &[("class", "trix-dialogs")]);
    let dialog = element(doc, dialogs, "div", &[("class", "trix-dialog trix-dialog--link"), ("data-trix-dialog", "href")]);
    let fields = element(doc, dialog, "div", &[("class", "trix-dialog__link-fields")]);
    let input = element(doc, fields, "input", &[("type", "url"), ("class", "trix-input trix-input--dialog")]);
    let group = element(doc, fields, "div", &[("class", "trix-button-group")]);
    let link = element(doc, group, "input", &[
        ("type", "button"),
        ("class", "trix-button trix-button--dialog"),
        ("value", "Link"),
        ("data-trix-method", "setAttribute"),
    ]);
    let unlink = element(doc, group, "input", &[
        ("type", "button"),
        ("class", "trix-button trix-button--dialog"),
        ("value", "Unlink"),
        ("data-trix-method", "removeAttribute"),
    ]);
    (dialog, input, [link, unlink])
}

pub fn editor(doc: &mut Document, parent: NodeId, toolbar_id: &str) -> NodeId {
    element(doc, parent, "trix-editor", &[("toolbar", toolbar_id)])
}

/// Install with the default configuration
pub fn install(doc: &mut Document) -> Rc<Retrofit> {
    init_tracing();
    trix_a11y::install(doc, A11yConfig::default()).unwrap()
}

/// Dispatch a keydown on the focused element; returns false if it was prevented
pub fn key_down_focused(doc: &mut Document, key: &str) -> bool {
    let target = doc.active_element().expect("nothing focused");
    doc.dispatch_event(target, Event::key_down(key))
}

/// Log of event types reaching `target`
pub fn record_events(doc: &mut Document, target: NodeId, types: &[&str]) -> Rc<RefCell<Vec<String>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    for event_type in types {
        let log = log.clone();
        doc.add_event_listener(target, event_type, Rc::new(move |_: &mut Document, ev: &mut Event| {
            log.borrow_mut().push(ev.event_type.clone());
        }));
    }
    log
}

#[derive(Default)]
pub struct RecordingActivator {
    pub activated: RefCell<Vec<NodeId>>,
}

impl Activate for RecordingActivator {
    fn activate(&self, _: &mut Document, target: NodeId) {
        self.activated.borrow_mut().push(target);
    }
}

/// Status channel that records messages instead of touching the DOM.
/// The first `failures` calls to `ensure` fail.
#[derive(Default)]
pub struct RecordingStatus {
    pub ensured: Cell<usize>,
    pub failures: Cell<usize>,
    pub messages: RefCell<Vec<String>>,
}

impl StatusChannel for RecordingStatus {
    fn ensure(&self, _: &mut Document) -> Result<(), A11yError> {
        if self.failures.get() > 0 {
            self.failures.set(self.failures.get() - 1);
            return Err(A11yError::NoStatusHost);
        }
        self.ensured.set(self.ensured.get() + 1);
        Ok(())
    }

    fn announce(&self, _: &mut Document, message: &str) -> Result<(), A11yError> {
        self.messages.borrow_mut().push(message.to_string());
        Ok(())
    }
}
