//! Stylesheet injection
//!
//! Makes the real `<button>` the hit target instead of its decorative
//! pseudo-elements, adds a visible focus outline, and defines the visually
//! hidden utility class used by the status region.

use fos_dom::{Document, NodeId};

use crate::A11yError;

pub const STYLESHEET: &str = "\
trix-toolbar .trix-button {
  position: relative;
  display: inline-flex;
  align-items: center;
  justify-content: center;
  width: 2.25rem;
  height: 2.25rem;
  padding: 0;
  cursor: pointer;
}
trix-toolbar .trix-button::before,
trix-toolbar .trix-button-group::before,
trix-toolbar .trix-button-group::after { pointer-events: none; }
trix-toolbar .trix-button,
trix-toolbar .trix-button * { pointer-events: auto; }

trix-toolbar .trix-button:focus,
trix-toolbar .trix-button--dialog:focus,
trix-editor:focus {
  outline: 2px solid #005fcc;
  outline-offset: 2px;
}
";

/// Rules for the visually hidden utility class
pub fn visually_hidden_rules(class: &str) -> String {
    format!(
        ".{class} {{
  position: absolute !important;
  width: 1px !important;
  height: 1px !important;
  padding: 0 !important;
  margin: -1px !important;
  overflow: hidden !important;
  clip: rect(0 0 0 0) !important;
  white-space: nowrap !important;
  border: 0 !important;
}}
"
    )
}

/// Append the stylesheet to `<head>` unless an element with `id` exists.
/// Returns the new `<style>` element.
pub fn inject(doc: &mut Document, id: &str, hidden_class: &str) -> Result<Option<NodeId>, A11yError> {
    if doc.get_element_by_id(id).is_some() {
        tracing::trace!("Stylesheet #{} already present", id);
        return Ok(None);
    }

    let style = doc.create_element("style");
    doc.set_attribute(style, "id", id)?;
    doc.set_text_content(style, &format!("{}\n{}", STYLESHEET, visually_hidden_rules(hidden_class)))?;
    doc.append_child(doc.head(), style)?;

    tracing::debug!("Injected stylesheet #{}", id);
    Ok(Some(style))
}
