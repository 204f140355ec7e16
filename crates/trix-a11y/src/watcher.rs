//! Instance watcher
//!
//! Installs the retrofit once per document, enhances the editors and
//! toolbars already present, then watches the whole document for inserted
//! ones. Each instance is enhanced in isolation: a failure is logged and
//! the scan moves on.

use std::rc::Rc;

use fos_dom::{Document, MutationObserverInit, MutationRecord, NodeId};

use crate::{A11yError, Retrofit, styles};

/// Document global marking an installed retrofit
pub const INSTALL_KEY: &str = "trix-a11y";

impl Retrofit {
    /// Install on `doc`. If a retrofit is already installed, it is returned
    /// and `self` is dropped.
    pub fn install(self, doc: &mut Document) -> Result<Rc<Self>, A11yError> {
        if let Some(existing) = doc.global::<Retrofit>(INSTALL_KEY) {
            tracing::debug!("Retrofit already installed");
            return Ok(existing);
        }

        let this = Rc::new(self);
        doc.set_global(INSTALL_KEY, this.clone());

        if this.config.inject_styles {
            if let Err(err) = styles::inject(doc, &this.config.style_element_id, &this.config.visually_hidden_class) {
                tracing::warn!("Stylesheet injection failed: {}", err);
            }
        }

        let enhanced = this.scan(doc, NodeId::ROOT);

        let watcher = Rc::clone(&this);
        let observer = doc.create_mutation_observer(Rc::new(move |doc: &mut Document, records: &[MutationRecord]| {
            watcher.on_document_mutations(doc, records);
        }));
        doc.observe(observer, NodeId::ROOT, MutationObserverInit::child_list_subtree())?;

        tracing::info!("Trix accessibility retrofit installed ({} instances enhanced)", enhanced);
        Ok(this)
    }

    /// The retrofit installed on `doc`, if any
    pub fn installed(doc: &Document) -> Option<Rc<Self>> {
        doc.global::<Retrofit>(INSTALL_KEY)
    }

    /// Enhance toolbars, then editors, in the inclusive subtree of `root`.
    /// Returns how many instances were newly enhanced.
    pub fn scan(self: &Rc<Self>, doc: &mut Document, root: NodeId) -> usize {
        let mut enhanced = 0;

        for toolbar in self.selectors.inclusive_matches(doc, root, &self.selectors.toolbar) {
            match self.enhance_toolbar(doc, toolbar) {
                Ok(true) => enhanced += 1,
                Ok(false) => {}
                Err(err) => tracing::warn!("Failed to enhance toolbar {:?}: {}", toolbar, err),
            }
        }
        for editor in self.selectors.inclusive_matches(doc, root, &self.selectors.editor) {
            match self.enhance_editor(doc, editor) {
                Ok(true) => enhanced += 1,
                Ok(false) => {}
                Err(err) => tracing::warn!("Failed to enhance editor {:?}: {}", editor, err),
            }
        }

        enhanced
    }

    fn on_document_mutations(self: &Rc<Self>, doc: &mut Document, records: &[MutationRecord]) {
        for record in records {
            for &added in &record.added_nodes {
                // Skip text nodes and nodes removed again before delivery.
                if doc.is_element(added) && doc.is_connected(added) {
                    self.scan(doc, added);
                }
            }
        }
    }
}
