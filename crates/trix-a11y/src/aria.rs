//! ARIA Support
//!
//! Roles, states and properties written by the retrofit.

use fos_dom::{Document, DomResult, NodeId};

pub const ROLE: &str = "role";
pub const ARIA_LABEL: &str = "aria-label";
pub const ARIA_LABELLEDBY: &str = "aria-labelledby";
pub const ARIA_PRESSED: &str = "aria-pressed";
pub const ARIA_DISABLED: &str = "aria-disabled";
pub const ARIA_MULTILINE: &str = "aria-multiline";
pub const ARIA_MODAL: &str = "aria-modal";
pub const ARIA_LIVE: &str = "aria-live";

/// ARIA role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AriaRole {
    Button,
    Dialog,
    Status,
    TextBox,
    Toolbar,
}

impl AriaRole {
    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.trim().to_ascii_lowercase().as_str() {
            "button" => Self::Button,
            "dialog" => Self::Dialog,
            "status" => Self::Status,
            "textbox" => Self::TextBox,
            "toolbar" => Self::Toolbar,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::Dialog => "dialog",
            Self::Status => "status",
            Self::TextBox => "textbox",
            Self::Toolbar => "toolbar",
        }
    }
}

/// `aria-live` politeness used by the status region
pub const LIVE_POLITE: &str = "polite";

/// `"true"`/`"false"` as ARIA spells booleans
pub fn bool_value(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Read the element's role
pub fn role(doc: &Document, id: NodeId) -> Option<AriaRole> {
    doc.get_attribute(id, ROLE).and_then(AriaRole::parse)
}

/// Set `role`, skipping the write when it is already present
pub fn set_role(doc: &mut Document, id: NodeId, role: AriaRole) -> DomResult<()> {
    set_if_changed(doc, id, ROLE, role.as_str())
}

/// Write an attribute only when its value differs
pub fn set_if_changed(doc: &mut Document, id: NodeId, name: &str, value: &str) -> DomResult<()> {
    if doc.get_attribute(id, name) != Some(value) {
        doc.set_attribute(id, name, value)?;
    }
    Ok(())
}

/// Apply a mirrored state: `Some` writes the value, `None` removes the attribute
pub fn apply_state(doc: &mut Document, id: NodeId, name: &str, state: Option<&str>) -> DomResult<()> {
    match state {
        Some(value) => set_if_changed(doc, id, name, value),
        None => doc.remove_attribute(id, name),
    }
}

/// Has the host page supplied an accessible name
pub fn has_accessible_name(doc: &Document, id: NodeId) -> bool {
    doc.get_attribute(id, ARIA_LABEL).is_some_and(|l| !l.trim().is_empty())
        || doc.has_attribute(id, ARIA_LABELLEDBY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role() {
        assert_eq!(AriaRole::parse("toolbar"), Some(AriaRole::Toolbar));
        assert_eq!(AriaRole::parse(" TextBox "), Some(AriaRole::TextBox));
        assert_eq!(AriaRole::parse("navigation"), None);
    }

    #[test]
    fn test_set_role_is_idempotent() {
        let mut doc = Document::new();
        let el = doc.create_element("trix-editor");
        doc.append_child(doc.body(), el).unwrap();

        set_role(&mut doc, el, AriaRole::TextBox).unwrap();
        set_role(&mut doc, el, AriaRole::TextBox).unwrap();
        assert_eq!(role(&doc, el), Some(AriaRole::TextBox));
        assert_eq!(doc.element(el).unwrap().attrs().len(), 1);
    }

    #[test]
    fn test_accessible_name() {
        let mut doc = Document::new();
        let el = doc.create_element("trix-toolbar");
        assert!(!has_accessible_name(&doc, el));

        doc.set_attribute(el, ARIA_LABEL, "  ").unwrap();
        assert!(!has_accessible_name(&doc, el));

        doc.set_attribute(el, ARIA_LABELLEDBY, "heading").unwrap();
        assert!(has_accessible_name(&doc, el));
    }
}
