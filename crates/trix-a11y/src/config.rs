//! Retrofit configuration
//!
//! Every field has a default, so hosts only spell out what they change.

use serde::{Deserialize, Serialize};

/// Retrofit configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct A11yConfig {
    /// `aria-label` for toolbars the host left unnamed
    pub toolbar_label: String,
    /// `aria-label` for editors with no label and no usable heading
    pub editor_label: String,
    /// Label unnamed editors by a preceding heading before using `editor_label`
    pub heading_label_fallback: bool,
    /// Announce `trix-change` notifications. Off by default: it fires on every keystroke.
    pub announce_content_changes: bool,
    pub messages: Messages,
    /// Id of the shared status region
    pub status_region_id: String,
    /// Utility class that hides the status region visually
    pub visually_hidden_class: String,
    /// Inject the hit-area and focus-outline stylesheet
    pub inject_styles: bool,
    /// Id of the injected `<style>` element
    pub style_element_id: String,
    /// Prefix for ids generated on link dialog inputs
    pub input_id_prefix: String,
    /// Prefix for ids generated on label headings
    pub heading_id_prefix: String,
}

/// Status announcements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub undo: String,
    pub redo: String,
    pub content_changed: String,
}

impl Default for A11yConfig {
    fn default() -> Self {
        Self {
            toolbar_label: "Rich text formatting".into(),
            editor_label: "Announcement content editor".into(),
            heading_label_fallback: true,
            announce_content_changes: false,
            messages: Messages::default(),
            status_region_id: "trix-a11y-status".into(),
            visually_hidden_class: "visually-hidden-trix-a11y".into(),
            inject_styles: true,
            style_element_id: "trix-a11y-v2-styles".into(),
            input_id_prefix: "trix-url-".into(),
            heading_id_prefix: "trix-a11y-heading-".into(),
        }
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            undo: "Undo".into(),
            redo: "Redo".into(),
            content_changed: "Content updated".into(),
        }
    }
}

impl A11yConfig {
    /// Enable or disable content-change announcements
    pub fn with_content_announcements(mut self, enabled: bool) -> Self {
        self.announce_content_changes = enabled;
        self
    }

    pub fn with_styles(mut self, inject: bool) -> Self {
        self.inject_styles = inject;
        self
    }
}
