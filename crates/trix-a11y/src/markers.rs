//! Trix DOM vocabulary
//!
//! Tags, classes, attributes and notifications the widget renders. The
//! retrofit recognizes instances and state only through these markers.

use fos_dom::{Document, DomResult, NodeId, SelectorList};

use crate::aria::ARIA_DISABLED;

pub const TOOLBAR_TAG: &str = "trix-toolbar";
pub const EDITOR_TAG: &str = "trix-editor";

pub const BUTTON_SELECTOR: &str = ".trix-button, .trix-button--dialog, input.trix-button";
/// Any dialog panel; controls inside one stay out of the roving order
pub const DIALOG_SELECTOR: &str = "[data-trix-dialog]";
pub const LINK_DIALOG_SELECTOR: &str = r#"[data-trix-dialog="href"]"#;
pub const DIALOG_INPUT_SELECTOR: &str = "input.trix-input--dialog";
pub const HEADING_SELECTOR: &str = "h1, h2, h3, h4, h5, h6";

/// Toggled state class
pub const ACTIVE_CLASS: &str = "trix-active";
/// Present on format-toggle buttons (bold, italic, ...), absent on actions
pub const FORMAT_ATTRIBUTE: &str = "data-trix-attribute";
pub const DISABLED_ATTRIBUTE: &str = "disabled";
/// Editor attribute naming its toolbar's id
pub const TOOLBAR_ATTRIBUTE: &str = "toolbar";

pub const UNDO_EVENT: &str = "trix-undo";
pub const REDO_EVENT: &str = "trix-redo";
pub const CHANGE_EVENT: &str = "trix-change";

/// Parsed selectors for the widget's markers
#[derive(Debug, Clone)]
pub struct Selectors {
    pub toolbar: SelectorList,
    pub editor: SelectorList,
    pub buttons: SelectorList,
    pub dialog: SelectorList,
    pub link_dialog: SelectorList,
    pub dialog_input: SelectorList,
    pub headings: SelectorList,
}

impl Selectors {
    pub fn trix() -> DomResult<Self> {
        Ok(Self {
            toolbar: SelectorList::parse(TOOLBAR_TAG)?,
            editor: SelectorList::parse(EDITOR_TAG)?,
            buttons: SelectorList::parse(BUTTON_SELECTOR)?,
            dialog: SelectorList::parse(DIALOG_SELECTOR)?,
            link_dialog: SelectorList::parse(LINK_DIALOG_SELECTOR)?,
            dialog_input: SelectorList::parse(DIALOG_INPUT_SELECTOR)?,
            headings: SelectorList::parse(HEADING_SELECTOR)?,
        })
    }

    /// `root` itself (if it matches) followed by matching descendants
    pub fn inclusive_matches(&self, doc: &Document, root: NodeId, selectors: &SelectorList) -> Vec<NodeId> {
        let mut found = Vec::new();
        if doc.matches(root, selectors) {
            found.push(root);
        }
        found.extend(doc.query_selector_all(root, selectors));
        found
    }

    /// Whether `id` sits inside a dialog panel below `root`
    pub fn in_dialog(&self, doc: &Document, root: NodeId, id: NodeId) -> bool {
        let mut cursor = doc.parent(id);
        while let Some(node) = cursor.filter(|&n| n != root) {
            if doc.matches(node, &self.dialog) {
                return true;
            }
            cursor = doc.parent(node);
        }
        false
    }
}

/// Disabled natively or by explicit `aria-disabled="true"`
pub fn is_disabled(doc: &Document, id: NodeId) -> bool {
    doc.has_attribute(id, DISABLED_ATTRIBUTE) || doc.get_attribute(id, ARIA_DISABLED) == Some("true")
}

/// Format-toggle buttons carry a pressed state; action buttons do not
pub fn is_format_toggle(doc: &Document, id: NodeId) -> bool {
    doc.has_attribute(id, FORMAT_ATTRIBUTE)
}
