//! fOS DOM - Document Object Model
//!
//! Arena-backed DOM tree with the scripting surface page scripts rely on:
//! attributes and class tokens, simple selector queries, focus, element
//! geometry, event listeners and mutation observers.

mod node;
mod tree;
mod document;
mod classlist;
mod element;
mod dom_events;
mod geometry;
mod observer;

pub use node::{Attribute, ElementData, Node, NodeData};
pub use tree::DomTree;
pub use document::Document;
pub use classlist::DOMTokenList;
pub use element::{CompoundSelector, SelectorList, SimpleSelector};
pub use dom_events::{
    Event, EventDetail, EventInit, EventListener, KeyboardEventInit, ListenerId,
    MouseEventInit, PointerEventInit,
};
pub use geometry::DOMRect;
pub use observer::{
    MutationCallback, MutationObserverId, MutationObserverInit, MutationRecord, MutationType,
};

/// Node identifier (index into arena)
///
/// Arena slots are never reused, so an id stays a stable identity for the
/// lifetime of its document even after the node is detached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// DOM error
#[derive(Debug, thiserror::Error)]
pub enum DomError {
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    #[error("Node is not an element: {0:?}")]
    NotAnElement(NodeId),

    #[error("Cannot insert {child:?} into {parent:?}")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
}

pub type DomResult<T> = Result<T, DomError>;
