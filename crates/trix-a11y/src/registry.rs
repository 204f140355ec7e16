//! Enhancement side table
//!
//! Identity-keyed records of which toolbars, editors and buttons have been
//! enhanced, plus the shared observers and roving state kept for them. Node ids
//! are never reused, so a record stays valid until its node is dropped by
//! the host page; records are never removed.

use std::collections::{HashMap, HashSet};

use fos_dom::{MutationObserverId, NodeId};

/// Per-toolbar state
#[derive(Debug, Clone, Default)]
pub struct ToolbarRecord {
    /// Mirrors `disabled` onto `aria-disabled` for every enhanced button
    pub disabled_observer: Option<MutationObserverId>,
    /// Mirrors the active class onto `aria-pressed` for format buttons
    pub pressed_observer: Option<MutationObserverId>,
    /// Button the user last moved to with the keyboard
    pub navigated: Option<NodeId>,
}

/// Per-editor state
#[derive(Debug, Clone, Default)]
pub struct EditorRecord {
    /// Toolbar resolved through the `toolbar` attribute
    pub toolbar: Option<NodeId>,
}

/// Enhancement side table
#[derive(Debug, Default)]
pub struct EnhancementRegistry {
    toolbars: HashMap<NodeId, ToolbarRecord>,
    editors: HashMap<NodeId, EditorRecord>,
    buttons: HashSet<NodeId>,
}

impl EnhancementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a toolbar for enhancement; false if it was already claimed
    pub fn claim_toolbar(&mut self, id: NodeId) -> bool {
        if self.toolbars.contains_key(&id) {
            return false;
        }
        self.toolbars.insert(id, ToolbarRecord::default());
        true
    }

    /// Claim an editor for enhancement; false if it was already claimed
    pub fn claim_editor(&mut self, id: NodeId) -> bool {
        if self.editors.contains_key(&id) {
            return false;
        }
        self.editors.insert(id, EditorRecord::default());
        true
    }

    /// Claim a button for enhancement; false if it was already claimed
    pub fn claim_button(&mut self, id: NodeId) -> bool {
        self.buttons.insert(id)
    }

    pub fn toolbar(&self, id: NodeId) -> Option<&ToolbarRecord> {
        self.toolbars.get(&id)
    }

    pub fn toolbar_mut(&mut self, id: NodeId) -> Option<&mut ToolbarRecord> {
        self.toolbars.get_mut(&id)
    }

    pub fn editor(&self, id: NodeId) -> Option<&EditorRecord> {
        self.editors.get(&id)
    }

    pub fn editor_mut(&mut self, id: NodeId) -> Option<&mut EditorRecord> {
        self.editors.get_mut(&id)
    }

    pub fn has_button(&self, id: NodeId) -> bool {
        self.buttons.contains(&id)
    }

    pub fn toolbar_count(&self) -> usize {
        self.toolbars.len()
    }

    pub fn editor_count(&self) -> usize {
        self.editors.len()
    }
}
