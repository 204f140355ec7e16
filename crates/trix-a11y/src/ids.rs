//! Generated element ids

use fos_dom::{Document, DomResult, NodeId};

const TOKEN_LEN: usize = 10;

/// `prefix` plus a random lowercase token, unused in `doc`
pub(crate) fn unique_id(doc: &Document, prefix: &str) -> String {
    loop {
        let token: String = std::iter::repeat_with(fastrand::alphanumeric)
            .take(TOKEN_LEN)
            .collect();
        let candidate = format!("{}{}", prefix, token.to_ascii_lowercase());
        if doc.get_element_by_id(&candidate).is_none() {
            return candidate;
        }
    }
}

/// The element's non-empty id, generating one with `prefix` if needed
pub(crate) fn ensure_id(doc: &mut Document, id: NodeId, prefix: &str) -> DomResult<String> {
    if let Some(existing) = doc.get_attribute(id, "id").filter(|v| !v.trim().is_empty()) {
        return Ok(existing.to_string());
    }
    let generated = unique_id(doc, prefix);
    doc.set_attribute(id, "id", &generated)?;
    Ok(generated)
}
