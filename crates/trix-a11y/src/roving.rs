//! Roving tabindex
//!
//! Exactly one enabled toolbar control sits in the tab sequence
//! (`tabindex="0"`); every other control gets `tabindex="-1"` and is reached
//! with the arrow keys, Home and End. The control the user last moved to is
//! remembered per toolbar; any other holder, including one the host page
//! marked up, gives way to the first enabled control on recompute.

use std::rc::Rc;

use fos_dom::{Document, Event, MutationObserverInit, MutationRecord, MutationType, NodeId};

use crate::aria::ARIA_DISABLED;
use crate::markers::{self, DISABLED_ATTRIBUTE};
use crate::{A11yError, Retrofit};

/// Navigation keys handled inside a toolbar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Next,
    Previous,
    First,
    Last,
}

impl NavKey {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowRight" | "Right" => Some(Self::Next),
            "ArrowLeft" | "Left" => Some(Self::Previous),
            "Home" => Some(Self::First),
            "End" => Some(Self::Last),
            _ => None,
        }
    }
}

/// Index of the control `key` moves to from `from`, skipping disabled ones.
/// Next/Previous wrap around; `None` when nothing is enabled.
pub fn navigate(enabled: &[bool], from: usize, key: NavKey) -> Option<usize> {
    let len = enabled.len();
    if len == 0 {
        return None;
    }

    match key {
        NavKey::First => enabled.iter().position(|&e| e),
        NavKey::Last => enabled.iter().rposition(|&e| e),
        NavKey::Next => (1..=len).map(|step| (from + step) % len).find(|&i| enabled[i]),
        NavKey::Previous => (1..=len)
            .map(|step| (from + len - step % len) % len)
            .find(|&i| enabled[i]),
    }
}

/// Index of the control that should hold `tabindex="0"`
///
/// Preference order: the focused control, the control last navigated to,
/// the nearest enabled control after that one (then before it), the first
/// enabled control. Disabled controls never win.
pub fn resolve_focusable(enabled: &[bool], focused: Option<usize>, navigated: Option<usize>) -> Option<usize> {
    let is_enabled = |i: usize| enabled.get(i).copied().unwrap_or(false);

    if let Some(i) = focused.filter(|&i| is_enabled(i)) {
        return Some(i);
    }

    if let Some(last) = navigated.filter(|&i| i < enabled.len()) {
        if is_enabled(last) {
            return Some(last);
        }
        let after = (last + 1..enabled.len()).find(|&i| enabled[i]);
        let before = (0..last).rev().find(|&i| enabled[i]);
        if let Some(i) = after.or(before) {
            return Some(i);
        }
    }

    enabled.iter().position(|&e| e)
}

impl Retrofit {
    /// Every button-like control in the toolbar, dialog buttons included
    pub fn toolbar_buttons(&self, doc: &Document, toolbar: NodeId) -> Vec<NodeId> {
        doc.query_selector_all(toolbar, &self.selectors.buttons)
    }

    /// Controls participating in the roving order, in document order.
    /// Controls inside dialog panels are left out.
    pub fn roving_buttons(&self, doc: &Document, toolbar: NodeId) -> Vec<NodeId> {
        self.toolbar_buttons(doc, toolbar)
            .into_iter()
            .filter(|&b| !self.selectors.in_dialog(doc, toolbar, b))
            .collect()
    }

    /// The control currently holding `tabindex="0"`
    pub fn focusable_button(&self, doc: &Document, toolbar: NodeId) -> Option<NodeId> {
        self.roving_buttons(doc, toolbar)
            .into_iter()
            .find(|&b| doc.tab_index(b) == Some(0))
    }

    pub(crate) fn install_roving(self: &Rc<Self>, doc: &mut Document, toolbar: NodeId) -> Result<(), A11yError> {
        let this = Rc::clone(self);
        doc.add_event_listener(toolbar, "keydown", Rc::new(move |doc: &mut Document, ev: &mut Event| {
            this.handle_roving_key(doc, toolbar, ev);
        }));

        let this = Rc::clone(self);
        let observer = doc.create_mutation_observer(Rc::new(move |doc: &mut Document, records: &[MutationRecord]| {
            this.on_toolbar_mutations(doc, toolbar, records);
        }));
        doc.observe(observer, toolbar, MutationObserverInit {
            child_list: true,
            subtree: true,
            ..MutationObserverInit::attribute_filter(&[DISABLED_ATTRIBUTE, ARIA_DISABLED])
        })?;

        self.recompute_roving(doc, toolbar)?;
        Ok(())
    }

    /// Re-assign tabindex so exactly one enabled control is tabbable.
    /// Never moves focus; only attributes that differ are written.
    pub fn recompute_roving(&self, doc: &mut Document, toolbar: NodeId) -> Result<Option<NodeId>, A11yError> {
        let buttons = self.roving_buttons(doc, toolbar);
        let enabled: Vec<bool> = buttons.iter().map(|&b| !markers::is_disabled(doc, b)).collect();
        let focused = doc.active_element().and_then(|f| buttons.iter().position(|&b| b == f));
        let navigated = self
            .registry
            .borrow()
            .toolbar(toolbar)
            .and_then(|record| record.navigated)
            .and_then(|last| buttons.iter().position(|&b| b == last));

        let chosen = resolve_focusable(&enabled, focused, navigated);
        if let Some(i) = chosen.filter(|&i| Some(i) == focused) {
            self.remember_navigated(toolbar, buttons[i]);
        }
        for (i, &button) in buttons.iter().enumerate() {
            let index = if Some(i) == chosen { 0 } else { -1 };
            if doc.tab_index(button) != Some(index) {
                doc.set_tab_index(button, index)?;
            }
        }

        let holder = chosen.map(|i| buttons[i]);
        tracing::trace!("Roving holder for {:?}: {:?}", toolbar, holder);
        Ok(holder)
    }

    fn handle_roving_key(&self, doc: &mut Document, toolbar: NodeId, ev: &mut Event) {
        let Some(key) = ev.key().and_then(NavKey::from_key) else {
            return;
        };
        let Some(target) = ev.target else {
            return;
        };

        let buttons = self.roving_buttons(doc, toolbar);
        let Some(from) = buttons.iter().position(|&b| b == target) else {
            return;
        };
        let enabled: Vec<bool> = buttons.iter().map(|&b| !markers::is_disabled(doc, b)).collect();

        ev.prevent_default();
        let Some(to) = navigate(&enabled, from, key) else {
            return;
        };
        self.remember_navigated(toolbar, buttons[to]);

        let result = buttons.iter().enumerate().try_for_each(|(i, &button)| {
            let index = if i == to { 0 } else { -1 };
            if doc.tab_index(button) == Some(index) {
                Ok(())
            } else {
                doc.set_tab_index(button, index)
            }
        });
        if let Err(err) = result.and_then(|()| doc.focus(buttons[to])) {
            tracing::warn!("Roving navigation in {:?} failed: {}", toolbar, err);
        }
    }

    fn remember_navigated(&self, toolbar: NodeId, button: NodeId) {
        if let Some(record) = self.registry.borrow_mut().toolbar_mut(toolbar) {
            record.navigated = Some(button);
        }
    }

    fn on_toolbar_mutations(self: &Rc<Self>, doc: &mut Document, toolbar: NodeId, records: &[MutationRecord]) {
        for record in records {
            if record.mutation_type != MutationType::ChildList {
                continue;
            }
            for &added in &record.added_nodes {
                if !doc.is_element(added) || !doc.is_connected(added) {
                    continue;
                }
                let buttons = self.selectors.inclusive_matches(doc, added, &self.selectors.buttons);
                for button in buttons {
                    if let Err(err) = self.enhance_button(doc, toolbar, button) {
                        tracing::warn!("Failed to enhance button {:?}: {}", button, err);
                    }
                }
            }
        }

        if let Err(err) = self.recompute_roving(doc, toolbar) {
            tracing::warn!("Roving recompute for {:?} failed: {}", toolbar, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [bool; 3] = [true, true, true];
    const MIDDLE_OFF: [bool; 3] = [true, false, true];

    #[test]
    fn test_nav_key_parse() {
        assert_eq!(NavKey::from_key("ArrowRight"), Some(NavKey::Next));
        assert_eq!(NavKey::from_key("Left"), Some(NavKey::Previous));
        assert_eq!(NavKey::from_key("Home"), Some(NavKey::First));
        assert_eq!(NavKey::from_key("End"), Some(NavKey::Last));
        assert_eq!(NavKey::from_key("ArrowDown"), None);
        assert_eq!(NavKey::from_key("Tab"), None);
    }

    #[test]
    fn test_navigate_wraps() {
        assert_eq!(navigate(&ALL, 2, NavKey::Next), Some(0));
        assert_eq!(navigate(&ALL, 0, NavKey::Previous), Some(2));
        assert_eq!(navigate(&ALL, 0, NavKey::Next), Some(1));
    }

    #[test]
    fn test_navigate_skips_disabled() {
        assert_eq!(navigate(&MIDDLE_OFF, 0, NavKey::Next), Some(2));
        assert_eq!(navigate(&MIDDLE_OFF, 2, NavKey::Previous), Some(0));
        assert_eq!(navigate(&MIDDLE_OFF, 2, NavKey::Next), Some(0));
    }

    #[test]
    fn test_navigate_home_end() {
        assert_eq!(navigate(&[false, true, true, false], 2, NavKey::First), Some(1));
        assert_eq!(navigate(&[false, true, true, false], 1, NavKey::Last), Some(2));
    }

    #[test]
    fn test_navigate_single_enabled() {
        assert_eq!(navigate(&[false, true, false], 1, NavKey::Next), Some(1));
        assert_eq!(navigate(&[false, true, false], 1, NavKey::Previous), Some(1));
        assert_eq!(navigate(&[false, false], 0, NavKey::Next), None);
        assert_eq!(navigate(&[], 0, NavKey::First), None);
    }

    #[test]
    fn test_resolve_prefers_focus() {
        assert_eq!(resolve_focusable(&ALL, Some(2), Some(0)), Some(2));
        // A focused control that became disabled loses to the last navigated one.
        assert_eq!(resolve_focusable(&MIDDLE_OFF, Some(1), Some(2)), Some(2));
    }

    #[test]
    fn test_resolve_keeps_navigated() {
        assert_eq!(resolve_focusable(&ALL, None, Some(1)), Some(1));
        assert_eq!(resolve_focusable(&ALL, None, None), Some(0));
    }

    #[test]
    fn test_resolve_disabled_navigated_moves_on() {
        assert_eq!(resolve_focusable(&MIDDLE_OFF, None, Some(1)), Some(2));
        assert_eq!(resolve_focusable(&[true, true, false], None, Some(2)), Some(1));
    }

    #[test]
    fn test_resolve_defaults_to_first_enabled() {
        assert_eq!(resolve_focusable(&[false, true, true], None, None), Some(1));
        assert_eq!(resolve_focusable(&[false, false], None, None), None);
        assert_eq!(resolve_focusable(&[], None, None), None);
    }
}
