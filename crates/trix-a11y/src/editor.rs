//! Editor enhancement
//!
//! Textbox semantics, a label (borrowed from a nearby heading when the page
//! has one), status announcements for undo/redo, and toolbar association.

use std::rc::Rc;

use fos_dom::{Document, DomError, Event, NodeId};

use crate::aria::{self, ARIA_LABEL, ARIA_LABELLEDBY, ARIA_MULTILINE, AriaRole};
use crate::markers::{CHANGE_EVENT, REDO_EVENT, TOOLBAR_ATTRIBUTE, UNDO_EVENT};
use crate::status::StatusChannel;
use crate::{A11yError, Retrofit, ids};

impl Retrofit {
    /// Enhance an editor and its associated toolbar. Returns false if the
    /// editor was already enhanced.
    pub fn enhance_editor(self: &Rc<Self>, doc: &mut Document, editor: NodeId) -> Result<bool, A11yError> {
        if !doc.is_element(editor) {
            return Err(DomError::NotAnElement(editor).into());
        }
        if !self.registry.borrow_mut().claim_editor(editor) {
            return Ok(false);
        }

        aria::set_role(doc, editor, AriaRole::TextBox)?;
        aria::set_if_changed(doc, editor, ARIA_MULTILINE, "true")?;
        if !aria::has_accessible_name(doc, editor) {
            self.label_editor(doc, editor)?;
        }

        self.status.ensure(doc)?;
        let mut announcements = vec![
            (UNDO_EVENT, self.config.messages.undo.clone()),
            (REDO_EVENT, self.config.messages.redo.clone()),
        ];
        if self.config.announce_content_changes {
            announcements.push((CHANGE_EVENT, self.config.messages.content_changed.clone()));
        }
        for (event_type, message) in announcements {
            let status = Rc::clone(&self.status);
            doc.add_event_listener(editor, event_type, Rc::new(move |doc: &mut Document, _: &mut Event| {
                announce(status.as_ref(), doc, &message);
            }));
        }

        let toolbar = doc
            .get_attribute(editor, TOOLBAR_ATTRIBUTE)
            .filter(|id| !id.trim().is_empty())
            .and_then(|id| doc.get_element_by_id(id));
        if let Some(record) = self.registry.borrow_mut().editor_mut(editor) {
            record.toolbar = toolbar;
        }

        tracing::debug!("Enhanced editor {:?} (toolbar {:?})", editor, toolbar);

        match toolbar {
            Some(toolbar) => {
                if let Err(err) = self.enhance_toolbar(doc, toolbar) {
                    tracing::warn!("Failed to enhance toolbar {:?} of editor {:?}: {}", toolbar, editor, err);
                }
            }
            None => tracing::trace!("Editor {:?} has no resolvable toolbar", editor),
        }
        Ok(true)
    }

    fn label_editor(&self, doc: &mut Document, editor: NodeId) -> Result<(), A11yError> {
        if self.config.heading_label_fallback {
            if let Some(heading) = self.nearby_heading(doc, editor) {
                let heading_id = ids::ensure_id(doc, heading, &self.config.heading_id_prefix)?;
                doc.set_attribute(editor, ARIA_LABELLEDBY, &heading_id)?;
                return Ok(());
            }
        }
        doc.set_attribute(editor, ARIA_LABEL, &self.config.editor_label)?;
        Ok(())
    }

    /// Closest heading preceding the editor, searching earlier siblings of
    /// the editor and then of each ancestor below `<body>`
    pub fn nearby_heading(&self, doc: &Document, editor: NodeId) -> Option<NodeId> {
        let headings = &self.selectors.headings;
        let mut node = editor;
        loop {
            for sibling in doc.previous_siblings(node) {
                if doc.matches(sibling, headings) {
                    return Some(sibling);
                }
                if let Some(&last) = doc.query_selector_all(sibling, headings).last() {
                    return Some(last);
                }
            }

            let parent = doc.parent(node)?;
            if parent == doc.body() || !doc.is_element(parent) {
                return None;
            }
            node = parent;
        }
    }
}

fn announce(status: &dyn StatusChannel, doc: &mut Document, message: &str) {
    if let Err(err) = status.announce(doc, message) {
        tracing::warn!("Status announcement failed: {}", err);
    }
}
