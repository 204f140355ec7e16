//! DOM Tree (arena-based allocation)

use crate::{DomError, DomResult, Node, NodeId};

/// Arena-based DOM tree
///
/// Slot 0 always holds the document node.
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self { nodes: vec![Node::document()] }
    }

    /// Document node
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Get a node or fail with `NodeNotFound`
    pub fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::NodeNotFound(id))
    }

    /// Allocate a detached node
    pub fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Children of a node
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Is `ancestor` the same node as, or an ancestor of, `node`
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Ancestors from the parent up to the document
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&n| self.parent(n))
    }

    /// Descendants in pre-order, excluding `id` itself
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    /// Returns the previous parent, if any.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<Option<NodeId>> {
        self.node(parent)?;
        self.node(child)?;
        if child == NodeId::ROOT || self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        let old_parent = self.detach(child);
        if let Some(node) = self.get_mut(parent) {
            node.children.push(child);
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
        }
        Ok(old_parent)
    }

    /// Remove `child` from `parent`
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        if self.parent(child) != Some(parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        self.detach(child);
        Ok(())
    }

    fn detach(&mut self, child: NodeId) -> Option<NodeId> {
        let old_parent = self.get_mut(child)?.parent.take()?;
        if let Some(node) = self.get_mut(old_parent) {
            node.children.retain(|&c| c != child);
        }
        Some(old_parent)
    }

    /// Number of nodes ever allocated
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_descendants() {
        let mut tree = DomTree::new();
        let a = tree.alloc(Node::element("div"));
        let b = tree.alloc(Node::element("span"));
        let c = tree.alloc(Node::element("b"));

        tree.append_child(tree.root(), a).unwrap();
        tree.append_child(a, b).unwrap();
        tree.append_child(a, c).unwrap();

        assert_eq!(tree.descendants(tree.root()), vec![a, b, c]);
        assert!(tree.is_inclusive_ancestor(a, c));
        assert_eq!(tree.ancestors(c).collect::<Vec<_>>(), vec![a, NodeId::ROOT]);
    }

    #[test]
    fn test_reparent_and_cycle() {
        let mut tree = DomTree::new();
        let a = tree.alloc(Node::element("div"));
        let b = tree.alloc(Node::element("div"));
        tree.append_child(tree.root(), a).unwrap();
        tree.append_child(a, b).unwrap();

        assert!(matches!(tree.append_child(b, a), Err(DomError::HierarchyRequest { .. })));

        assert_eq!(tree.append_child(tree.root(), b).unwrap(), Some(a));
        assert!(tree.children(a).is_empty());
    }
}
