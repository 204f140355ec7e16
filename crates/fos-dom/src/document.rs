//! Document - High-level document API
//!
//! Every tree or attribute mutation made through `Document` queues mutation
//! records for interested observers. Records are delivered in batches by
//! `perform_microtask_checkpoint`, which the embedder calls after each task.

use std::any::Any;
use std::collections::HashMap;
use std::rc::Rc;

use crate::observer::ObserverRegistry;
use crate::{
    DOMRect, DOMTokenList, DomError, DomResult, DomTree, ElementData, Event, EventListener,
    ListenerId, MutationCallback, MutationObserverId, MutationObserverInit, MutationRecord, Node,
    NodeId, SelectorList,
};

/// Upper bound on observer delivery rounds within one checkpoint
const MAX_DELIVERY_ROUNDS: usize = 64;

struct RegisteredListener {
    id: ListenerId,
    event_type: String,
    callback: EventListener,
}

/// HTML Document
pub struct Document {
    tree: DomTree,
    html_element: NodeId,
    head_element: NodeId,
    body_element: NodeId,
    focused: Option<NodeId>,
    layout: HashMap<NodeId, DOMRect>,
    observers: ObserverRegistry,
    listeners: HashMap<NodeId, Vec<RegisteredListener>>,
    next_listener_id: u32,
    globals: HashMap<&'static str, Rc<dyn Any>>,
}

impl Document {
    /// Create a document with `<html>`, `<head>` and `<body>`
    pub fn new() -> Self {
        let mut tree = DomTree::new();
        let html = tree.alloc(Node::element("html"));
        let head = tree.alloc(Node::element("head"));
        let body = tree.alloc(Node::element("body"));

        // Fresh nodes under a fresh root cannot form a cycle.
        let _ = tree.append_child(NodeId::ROOT, html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        Self {
            tree,
            html_element: html,
            head_element: head,
            body_element: body,
            focused: None,
            layout: HashMap::new(),
            observers: ObserverRegistry::default(),
            listeners: HashMap::new(),
            next_listener_id: 0,
            globals: HashMap::new(),
        }
    }

    /// Read-only access to the tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    // ---------------------------------------------------------------------
    // Tree
    // ---------------------------------------------------------------------

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.tree.alloc(Node::element(tag))
    }

    /// Create a detached text node
    pub fn create_text_node(&mut self, text: &str) -> NodeId {
        self.tree.alloc(Node::text(text))
    }

    /// Append `child` to `parent`, moving it if it is already in the tree
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        if let Some(old_parent) = self.tree.append_child(parent, child)? {
            self.queue(MutationRecord::child_list(old_parent, Vec::new(), vec![child]));
        }
        self.queue(MutationRecord::child_list(parent, vec![child], Vec::new()));
        Ok(())
    }

    /// Remove `child` from `parent`
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.tree.remove_child(parent, child)?;
        if self.focused.is_some_and(|f| self.tree.is_inclusive_ancestor(child, f)) {
            self.focused = None;
        }
        self.queue(MutationRecord::child_list(parent, Vec::new(), vec![child]));
        Ok(())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.tree.parent(id)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.tree.children(id)
    }

    /// Preceding siblings, closest first
    pub fn previous_siblings(&self, id: NodeId) -> Vec<NodeId> {
        let Some(parent) = self.tree.parent(id) else {
            return Vec::new();
        };
        let siblings = self.tree.children(parent);
        let pos = siblings.iter().position(|&s| s == id).unwrap_or(0);
        siblings[..pos].iter().rev().copied().collect()
    }

    /// Descendants in document order, excluding `id`
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        self.tree.descendants(id)
    }

    /// Is the node attached to this document
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.tree.is_inclusive_ancestor(NodeId::ROOT, id)
    }

    // ---------------------------------------------------------------------
    // Elements and attributes
    // ---------------------------------------------------------------------

    /// Element data for `id`, if it is an element
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.tree.get(id)?.as_element()
    }

    fn element_mut(&mut self, id: NodeId) -> DomResult<&mut ElementData> {
        self.tree.get_mut(id)
            .ok_or(DomError::NodeNotFound(id))?
            .as_element_mut()
            .ok_or(DomError::NotAnElement(id))
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.tag())
    }

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attr(name)
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.element(id).is_some_and(|e| e.has_attr(name))
    }

    /// Set an attribute. Always queues a record, even when the value is unchanged.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        let old = self.element_mut(id)?.set_attr(name, value);
        self.queue(MutationRecord::attribute(id, name, old));
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<()> {
        if let Some(old) = self.element_mut(id)?.remove_attr(name) {
            self.queue(MutationRecord::attribute(id, name, Some(old)));
        }
        Ok(())
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|e| e.has_class(class))
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) -> DomResult<()> {
        self.toggle_class(id, class, Some(true)).map(|_| ())
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) -> DomResult<()> {
        self.toggle_class(id, class, Some(false)).map(|_| ())
    }

    /// classList.toggle; the `class` attribute is only written when it changes
    pub fn toggle_class(&mut self, id: NodeId, class: &str, force: Option<bool>) -> DomResult<bool> {
        let current = self.element(id).ok_or(DomError::NotAnElement(id))?.class_list();
        let mut list = current.clone();
        let state = list.toggle(class, force);
        if list != current {
            self.set_attribute(id, "class", &list.value())?;
        }
        Ok(state)
    }

    pub fn class_list(&self, id: NodeId) -> DOMTokenList {
        self.element(id).map(|e| e.class_list()).unwrap_or_default()
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    /// Get connected element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree.descendants(NodeId::ROOT)
            .into_iter()
            .find(|&n| self.element(n).and_then(|e| e.id()) == Some(id))
    }

    pub fn matches(&self, id: NodeId, selectors: &SelectorList) -> bool {
        self.element(id).is_some_and(|e| selectors.matches(e))
    }

    /// First matching descendant of `root`
    pub fn query_selector(&self, root: NodeId, selectors: &SelectorList) -> Option<NodeId> {
        self.tree.descendants(root)
            .into_iter()
            .find(|&n| self.matches(n, selectors))
    }

    /// All matching descendants of `root`, in document order
    pub fn query_selector_all(&self, root: NodeId, selectors: &SelectorList) -> Vec<NodeId> {
        self.tree.descendants(root)
            .into_iter()
            .filter(|&n| self.matches(n, selectors))
            .collect()
    }

    // ---------------------------------------------------------------------
    // Text
    // ---------------------------------------------------------------------

    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.tree.get(id).and_then(|n| n.as_text()) {
            return text.to_string();
        }
        self.tree.descendants(id)
            .into_iter()
            .filter_map(|n| self.tree.get(n)?.as_text())
            .collect()
    }

    /// Replace all children with a single text node (none for empty text)
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> DomResult<()> {
        let removed = self.tree.children(id).to_vec();
        for &child in &removed {
            self.tree.remove_child(id, child)?;
        }
        let mut added = Vec::new();
        if !text.is_empty() {
            let node = self.tree.alloc(Node::text(text));
            self.tree.append_child(id, node)?;
            added.push(node);
        }
        if !removed.is_empty() || !added.is_empty() {
            self.queue(MutationRecord::child_list(id, added, removed));
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Focus
    // ---------------------------------------------------------------------

    /// Move input focus. Detached nodes are ignored.
    pub fn focus(&mut self, id: NodeId) -> DomResult<()> {
        if !self.is_element(id) {
            return Err(DomError::NotAnElement(id));
        }
        if self.is_connected(id) {
            tracing::trace!("focus -> {:?}", id);
            self.focused = Some(id);
        }
        Ok(())
    }

    pub fn blur(&mut self) {
        self.focused = None;
    }

    pub fn active_element(&self) -> Option<NodeId> {
        self.focused
    }

    /// Parsed `tabindex` attribute
    pub fn tab_index(&self, id: NodeId) -> Option<i32> {
        self.get_attribute(id, "tabindex")?.trim().parse().ok()
    }

    pub fn set_tab_index(&mut self, id: NodeId, index: i32) -> DomResult<()> {
        self.set_attribute(id, "tabindex", &index.to_string())
    }

    // ---------------------------------------------------------------------
    // Geometry
    // ---------------------------------------------------------------------

    /// Record the layout box computed for an element
    pub fn set_layout_rect(&mut self, id: NodeId, rect: DOMRect) {
        self.layout.insert(id, rect);
    }

    /// getBoundingClientRect; elements without layout report a zero rect
    pub fn bounding_client_rect(&self, id: NodeId) -> DOMRect {
        self.layout.get(&id).copied().unwrap_or_default()
    }

    // ---------------------------------------------------------------------
    // Events
    // ---------------------------------------------------------------------

    pub fn add_event_listener(&mut self, target: NodeId, event_type: &str, callback: EventListener) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.entry(target).or_default().push(RegisteredListener {
            id,
            event_type: event_type.to_string(),
            callback,
        });
        id
    }

    pub fn remove_event_listener(&mut self, target: NodeId, id: ListenerId) -> bool {
        let Some(list) = self.listeners.get_mut(&target) else {
            return false;
        };
        let before = list.len();
        list.retain(|l| l.id != id);
        before != list.len()
    }

    /// Number of listeners for `event_type` on `target`
    pub fn listener_count(&self, target: NodeId, event_type: &str) -> usize {
        self.listeners.get(&target)
            .map_or(0, |list| list.iter().filter(|l| l.event_type == event_type).count())
    }

    /// Dispatch through the target and, for bubbling events, its ancestors.
    /// Returns false if a listener prevented the default action.
    pub fn dispatch_event(&mut self, target: NodeId, mut event: Event) -> bool {
        event.target = Some(target);
        let mut path = vec![target];
        if event.bubbles {
            path.extend(self.tree.ancestors(target));
        }

        for node in path {
            let callbacks: Vec<EventListener> = self.listeners.get(&node)
                .map(|list| {
                    list.iter()
                        .filter(|l| l.event_type == event.event_type)
                        .map(|l| l.callback.clone())
                        .collect()
                })
                .unwrap_or_default();

            event.current_target = Some(node);
            for callback in callbacks {
                callback(self, &mut event);
                if event.is_immediate_propagation_stopped() {
                    break;
                }
            }
            if event.is_propagation_stopped() {
                break;
            }
        }

        !event.is_default_prevented()
    }

    // ---------------------------------------------------------------------
    // Mutation observers
    // ---------------------------------------------------------------------

    pub fn create_mutation_observer(&mut self, callback: MutationCallback) -> MutationObserverId {
        self.observers.create(callback)
    }

    pub fn observe(&mut self, observer: MutationObserverId, target: NodeId, options: MutationObserverInit) -> DomResult<()> {
        self.tree.node(target)?;
        self.observers.observe(observer, target, options);
        Ok(())
    }

    pub fn disconnect(&mut self, observer: MutationObserverId) {
        self.observers.disconnect(observer);
    }

    /// Records queued but not yet delivered
    pub fn pending_mutation_count(&self) -> usize {
        self.observers.pending_count()
    }

    /// Deliver queued mutation records to their observers, in observer
    /// creation order, until no observer has pending records.
    pub fn perform_microtask_checkpoint(&mut self) {
        for _ in 0..MAX_DELIVERY_ROUNDS {
            let batch = self.observers.take_batch();
            if batch.is_empty() {
                return;
            }
            for (callback, records) in batch {
                callback(self, &records);
            }
        }
        tracing::warn!(
            "Mutation delivery did not settle after {} rounds, {} records left queued",
            MAX_DELIVERY_ROUNDS,
            self.observers.pending_count()
        );
    }

    fn queue(&mut self, record: MutationRecord) {
        self.observers.queue(&self.tree, record);
    }

    // ---------------------------------------------------------------------
    // Script globals
    // ---------------------------------------------------------------------

    /// Store page-level script state under `key`
    pub fn set_global(&mut self, key: &'static str, value: Rc<dyn Any>) {
        self.globals.insert(key, value);
    }

    /// Page-level script state stored under `key`, if it has type `T`
    pub fn global<T: 'static>(&self, key: &'static str) -> Option<Rc<T>> {
        self.globals.get(key)?.clone().downcast::<T>().ok()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.tree.len())
            .field("focused", &self.focused)
            .field("observers", &self.observers)
            .field("globals", &self.globals.keys().collect::<Vec<_>>())
            .finish()
    }
}
