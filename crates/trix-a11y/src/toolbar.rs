//! Toolbar enhancement
//!
//! Toolbar role and label, button roles, mirrored disabled/pressed states,
//! keyboard activation, and the link dialog's dialog semantics.

use std::rc::Rc;

use fos_dom::{Document, DomError, DomResult, Event, MutationObserverInit, MutationRecord, NodeId};

use crate::activation::Activate;
use crate::aria::{self, ARIA_DISABLED, ARIA_LABEL, ARIA_LABELLEDBY, ARIA_MODAL, ARIA_PRESSED, AriaRole};
use crate::markers::{self, ACTIVE_CLASS, DISABLED_ATTRIBUTE};
use crate::{A11yError, Retrofit, ids};

/// What a key event on a toolbar control does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Suppress the default and activate the control
    Activate,
    /// Suppress the default only (Space keydown, so the page does not scroll)
    Suppress,
    Ignore,
}

/// Enter activates on keydown; Space activates on keyup
pub fn activation_action(event_type: &str, key: &str) -> KeyAction {
    match (event_type, key) {
        ("keydown", "Enter") => KeyAction::Activate,
        ("keydown", " " | "Spacebar") => KeyAction::Suppress,
        ("keyup", " " | "Spacebar") => KeyAction::Activate,
        _ => KeyAction::Ignore,
    }
}

/// `aria-disabled` value for a control's native `disabled` state
pub fn disabled_state(disabled: bool) -> Option<&'static str> {
    disabled.then_some("true")
}

/// `aria-pressed` value; only format toggles carry one
pub fn pressed_state(is_toggle: bool, active: bool) -> Option<&'static str> {
    is_toggle.then(|| aria::bool_value(active))
}

fn sync_disabled(doc: &mut Document, button: NodeId) -> DomResult<()> {
    let state = disabled_state(doc.has_attribute(button, DISABLED_ATTRIBUTE));
    aria::apply_state(doc, button, ARIA_DISABLED, state)
}

fn sync_pressed(doc: &mut Document, button: NodeId) -> DomResult<()> {
    let state = pressed_state(markers::is_format_toggle(doc, button), doc.has_class(button, ACTIVE_CLASS));
    aria::apply_state(doc, button, ARIA_PRESSED, state)
}

/// Observer callback applying `sync` to every mutated control
fn mirror(sync: fn(&mut Document, NodeId) -> DomResult<()>) -> Rc<dyn Fn(&mut Document, &[MutationRecord])> {
    Rc::new(move |doc: &mut Document, records: &[MutationRecord]| {
        for record in records {
            if let Err(err) = sync(doc, record.target) {
                tracing::warn!("Failed to mirror state on {:?}: {}", record.target, err);
            }
        }
    })
}

fn handle_activation_key(activator: &dyn Activate, doc: &mut Document, button: NodeId, ev: &mut Event) {
    if markers::is_disabled(doc, button) {
        return;
    }
    let Some(key) = ev.key() else {
        return;
    };

    match activation_action(&ev.event_type, key) {
        KeyAction::Activate => {
            ev.prevent_default();
            ev.stop_propagation();
            activator.activate(doc, button);
        }
        KeyAction::Suppress => {
            ev.prevent_default();
            ev.stop_propagation();
        }
        KeyAction::Ignore => {}
    }
}

impl Retrofit {
    /// Enhance a toolbar and everything in it. Returns false if it was
    /// already enhanced.
    pub fn enhance_toolbar(self: &Rc<Self>, doc: &mut Document, toolbar: NodeId) -> Result<bool, A11yError> {
        if !doc.is_element(toolbar) {
            return Err(DomError::NotAnElement(toolbar).into());
        }
        if !self.registry.borrow_mut().claim_toolbar(toolbar) {
            return Ok(false);
        }

        aria::set_role(doc, toolbar, AriaRole::Toolbar)?;
        if !aria::has_accessible_name(doc, toolbar) {
            doc.set_attribute(toolbar, ARIA_LABEL, &self.config.toolbar_label)?;
        }

        let disabled_observer = doc.create_mutation_observer(mirror(sync_disabled));
        let pressed_observer = doc.create_mutation_observer(mirror(sync_pressed));
        if let Some(record) = self.registry.borrow_mut().toolbar_mut(toolbar) {
            record.disabled_observer = Some(disabled_observer);
            record.pressed_observer = Some(pressed_observer);
        }

        for button in self.toolbar_buttons(doc, toolbar) {
            self.enhance_button(doc, toolbar, button)?;
        }
        self.enhance_link_dialog(doc, toolbar)?;
        self.install_roving(doc, toolbar)?;

        tracing::debug!("Enhanced toolbar {:?}", toolbar);
        Ok(true)
    }

    /// Enhance one control of `toolbar`; false if already enhanced
    pub(crate) fn enhance_button(self: &Rc<Self>, doc: &mut Document, toolbar: NodeId, button: NodeId) -> Result<bool, A11yError> {
        if !self.registry.borrow_mut().claim_button(button) {
            return Ok(false);
        }

        aria::set_role(doc, button, AriaRole::Button)?;
        sync_disabled(doc, button)?;
        sync_pressed(doc, button)?;

        let (disabled_observer, pressed_observer) = match self.registry.borrow().toolbar(toolbar) {
            Some(record) => (record.disabled_observer, record.pressed_observer),
            None => (None, None),
        };
        if let Some(observer) = disabled_observer {
            doc.observe(observer, button, MutationObserverInit::attribute_filter(&[DISABLED_ATTRIBUTE]))?;
        }
        if let Some(observer) = pressed_observer.filter(|_| markers::is_format_toggle(doc, button)) {
            doc.observe(observer, button, MutationObserverInit::attribute_filter(&["class"]))?;
        }

        for event_type in ["keydown", "keyup"] {
            let activator = Rc::clone(&self.activator);
            doc.add_event_listener(button, event_type, Rc::new(move |doc: &mut Document, ev: &mut Event| {
                handle_activation_key(activator.as_ref(), doc, button, ev);
            }));
        }

        tracing::trace!("Enhanced button {:?} in {:?}", button, toolbar);
        Ok(true)
    }

    /// Dialog role on the link dialog, labelled by its URL input
    fn enhance_link_dialog(&self, doc: &mut Document, toolbar: NodeId) -> Result<(), A11yError> {
        let Some(dialog) = doc.query_selector(toolbar, &self.selectors.link_dialog) else {
            return Ok(());
        };

        aria::set_role(doc, dialog, AriaRole::Dialog)?;
        aria::set_if_changed(doc, dialog, ARIA_MODAL, "true")?;

        if let Some(input) = doc.query_selector(dialog, &self.selectors.dialog_input) {
            let input_id = ids::ensure_id(doc, input, &self.config.input_id_prefix)?;
            aria::set_if_changed(doc, dialog, ARIA_LABELLEDBY, &input_id)?;
        }
        Ok(())
    }
}
