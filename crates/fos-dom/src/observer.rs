//! DOM Observers
//!
//! MutationObserver registrations, record queueing and batch extraction.
//! Delivery happens in `Document::perform_microtask_checkpoint`.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::{Document, DomTree, NodeId};

/// Observer callback, invoked with every record queued since the last delivery
pub type MutationCallback = Rc<dyn Fn(&mut Document, &[MutationRecord])>;

/// Handle returned by `Document::create_mutation_observer`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MutationObserverId(pub(crate) u32);

/// Mutation observer options
#[derive(Debug, Clone, Default)]
pub struct MutationObserverInit {
    pub child_list: bool,
    pub attributes: bool,
    pub subtree: bool,
    pub attribute_old_value: bool,
    pub attribute_filter: Option<Vec<String>>,
}

impl MutationObserverInit {
    /// `{ childList: true, subtree: true }`
    pub fn child_list_subtree() -> Self {
        Self { child_list: true, subtree: true, ..Default::default() }
    }

    /// `{ attributes: true, attributeFilter: [..] }`
    pub fn attribute_filter(names: &[&str]) -> Self {
        Self {
            attributes: true,
            attribute_filter: Some(names.iter().map(|n| n.to_string()).collect()),
            ..Default::default()
        }
    }

    fn accepts(&self, tree: &DomTree, observed: NodeId, record: &MutationRecord) -> bool {
        let in_scope = record.target == observed
            || (self.subtree && tree.is_inclusive_ancestor(observed, record.target));
        if !in_scope {
            return false;
        }
        match record.mutation_type {
            MutationType::ChildList => self.child_list,
            MutationType::Attributes => {
                self.attributes
                    && self.attribute_filter.as_ref().is_none_or(|filter| {
                        record.attribute_name.as_ref().is_some_and(|name| filter.contains(name))
                    })
            }
        }
    }
}

/// Mutation record
#[derive(Debug, Clone, PartialEq)]
pub struct MutationRecord {
    pub mutation_type: MutationType,
    pub target: NodeId,
    pub added_nodes: Vec<NodeId>,
    pub removed_nodes: Vec<NodeId>,
    pub attribute_name: Option<String>,
    pub old_value: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationType {
    Attributes,
    ChildList,
}

impl MutationRecord {
    pub fn child_list(target: NodeId, added: Vec<NodeId>, removed: Vec<NodeId>) -> Self {
        Self {
            mutation_type: MutationType::ChildList,
            target,
            added_nodes: added,
            removed_nodes: removed,
            attribute_name: None,
            old_value: None,
        }
    }

    pub fn attribute(target: NodeId, name: &str, old_value: Option<String>) -> Self {
        Self {
            mutation_type: MutationType::Attributes,
            target,
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
            attribute_name: Some(name.to_string()),
            old_value,
        }
    }
}

/// Mutation observer
struct MutationObserver {
    callback: MutationCallback,
    observed: Vec<(NodeId, MutationObserverInit)>,
    records: Vec<MutationRecord>,
}

impl MutationObserver {
    fn observe(&mut self, target: NodeId, options: MutationObserverInit) {
        match self.observed.iter_mut().find(|(id, _)| *id == target) {
            Some(entry) => entry.1 = options,
            None => self.observed.push((target, options)),
        }
    }

    /// Queue `record` once if any registration is interested
    fn offer(&mut self, tree: &DomTree, record: &MutationRecord) {
        let Some((_, init)) = self.observed.iter()
            .find(|(observed, init)| init.accepts(tree, *observed, record))
        else {
            return;
        };
        let mut record = record.clone();
        if record.mutation_type == MutationType::Attributes && !init.attribute_old_value {
            record.old_value = None;
        }
        self.records.push(record);
    }
}

/// Observers owned by a document, in creation order
#[derive(Default)]
pub(crate) struct ObserverRegistry {
    observers: BTreeMap<MutationObserverId, MutationObserver>,
    next_id: u32,
}

impl ObserverRegistry {
    pub(crate) fn create(&mut self, callback: MutationCallback) -> MutationObserverId {
        let id = MutationObserverId(self.next_id);
        self.next_id += 1;
        self.observers.insert(id, MutationObserver {
            callback,
            observed: Vec::new(),
            records: Vec::new(),
        });
        id
    }

    pub(crate) fn observe(&mut self, id: MutationObserverId, target: NodeId, options: MutationObserverInit) -> bool {
        match self.observers.get_mut(&id) {
            Some(observer) => {
                observer.observe(target, options);
                true
            }
            None => false,
        }
    }

    /// Stop observing and drop any undelivered records
    pub(crate) fn disconnect(&mut self, id: MutationObserverId) {
        if let Some(observer) = self.observers.get_mut(&id) {
            observer.observed.clear();
            observer.records.clear();
        }
    }

    pub(crate) fn queue(&mut self, tree: &DomTree, record: MutationRecord) {
        for observer in self.observers.values_mut() {
            observer.offer(tree, &record);
        }
    }

    pub(crate) fn pending_count(&self) -> usize {
        self.observers.values().map(|o| o.records.len()).sum()
    }

    /// Take every non-empty record queue along with its callback
    pub(crate) fn take_batch(&mut self) -> Vec<(MutationCallback, Vec<MutationRecord>)> {
        self.observers.values_mut()
            .filter(|o| !o.records.is_empty())
            .map(|o| (o.callback.clone(), std::mem::take(&mut o.records)))
            .collect()
    }
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.observers.len())
            .field("pending", &self.pending_count())
            .finish()
    }
}
