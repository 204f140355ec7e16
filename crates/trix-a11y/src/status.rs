//! Status announcements
//!
//! One polite live region per page, created on first use and shared by
//! every editor. Messages replace each other; the last writer wins.

use std::cell::Cell;

use fos_dom::{Document, NodeId};

use crate::aria::{self, AriaRole};
use crate::{A11yConfig, A11yError};

/// Announcement surface shared by all editors
pub trait StatusChannel {
    /// Create the surface if it does not exist yet
    fn ensure(&self, doc: &mut Document) -> Result<(), A11yError>;

    /// Replace the current message
    fn announce(&self, doc: &mut Document, message: &str) -> Result<(), A11yError>;
}

/// Visually hidden `role="status"` element appended to `<body>`
#[derive(Debug)]
pub struct LiveRegion {
    id: String,
    hidden_class: String,
    node: Cell<Option<NodeId>>,
}

impl LiveRegion {
    pub fn new(id: &str, hidden_class: &str) -> Self {
        Self {
            id: id.to_string(),
            hidden_class: hidden_class.to_string(),
            node: Cell::new(None),
        }
    }

    pub fn from_config(config: &A11yConfig) -> Self {
        Self::new(&config.status_region_id, &config.visually_hidden_class)
    }

    /// The region element, once created or adopted
    pub fn node(&self) -> Option<NodeId> {
        self.node.get()
    }

    /// Cached node if still attached, else an existing element with our id
    fn locate(&self, doc: &Document) -> Option<NodeId> {
        self.node.get()
            .filter(|&n| doc.is_connected(n))
            .or_else(|| doc.get_element_by_id(&self.id))
    }

    fn region(&self, doc: &mut Document) -> Result<NodeId, A11yError> {
        if let Some(node) = self.locate(doc) {
            self.node.set(Some(node));
            return Ok(node);
        }

        let host = [doc.body(), doc.document_element()]
            .into_iter()
            .find(|&h| doc.is_connected(h))
            .ok_or(A11yError::NoStatusHost)?;

        let node = doc.create_element("div");
        doc.set_attribute(node, "id", &self.id)?;
        doc.set_attribute(node, "class", &self.hidden_class)?;
        aria::set_role(doc, node, AriaRole::Status)?;
        doc.set_attribute(node, aria::ARIA_LIVE, aria::LIVE_POLITE)?;
        doc.append_child(host, node)?;

        tracing::debug!("Created status region #{}", self.id);
        self.node.set(Some(node));
        Ok(node)
    }
}

impl StatusChannel for LiveRegion {
    fn ensure(&self, doc: &mut Document) -> Result<(), A11yError> {
        self.region(doc).map(|_| ())
    }

    fn announce(&self, doc: &mut Document, message: &str) -> Result<(), A11yError> {
        let node = self.region(doc)?;
        doc.set_text_content(node, message)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_created_once() {
        let mut doc = Document::new();
        let region = LiveRegion::new("status", "sr-only");

        region.ensure(&mut doc).unwrap();
        region.ensure(&mut doc).unwrap();

        let node = region.node().unwrap();
        assert_eq!(doc.children(doc.body()), &[node]);
        assert_eq!(doc.get_attribute(node, "role"), Some("status"));
        assert_eq!(doc.get_attribute(node, "aria-live"), Some("polite"));
        assert!(doc.has_class(node, "sr-only"));
    }

    #[test]
    fn test_last_writer_wins() {
        let mut doc = Document::new();
        let region = LiveRegion::new("status", "sr-only");

        region.announce(&mut doc, "Undo").unwrap();
        region.announce(&mut doc, "Redo").unwrap();
        assert_eq!(doc.text_content(region.node().unwrap()), "Redo");
    }

    #[test]
    fn test_adopts_existing_region() {
        let mut doc = Document::new();
        let existing = doc.create_element("div");
        doc.set_attribute(existing, "id", "status").unwrap();
        doc.append_child(doc.body(), existing).unwrap();

        let region = LiveRegion::new("status", "sr-only");
        region.announce(&mut doc, "Undo").unwrap();
        assert_eq!(region.node(), Some(existing));
        assert_eq!(doc.children(doc.body()).len(), 1);
    }
}
