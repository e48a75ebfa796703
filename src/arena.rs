use generational_arena::{Arena, Index};
use std::fmt;
use std::hash::{Hash, Hasher};
use tracing::{debug, instrument};

use crate::error::{TreeError, TreeResult};
use crate::postorder::PostorderTreeIterator;
use crate::preorder::PreorderTreeIterator;

/// Handle to a node stored in a [`Tree`].
///
/// Handles are generational: once a node has been reclaimed its handle goes
/// stale and every operation taking it fails with [`TreeError::InvalidArgument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(Index);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.0.into_raw_parts();
        write!(f, "node#{}@{}", slot, generation)
    }
}

/// Tree node in the arena-based hierarchy structure.
///
/// Equality and hashing look at the element only, never at the node's
/// position in the tree.
#[derive(Debug, Clone)]
pub struct TreeNode<E> {
    element: E,
    /// Index of parent node in the arena, None for roots and detached nodes
    parent: Option<NodeId>,
    /// Indices of child nodes in the arena, in insertion order
    children: Vec<NodeId>,
}

impl<E> TreeNode<E> {
    fn new(element: E) -> Self {
        Self {
            element,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn element(&self) -> &E {
        &self.element
    }

    pub fn element_mut(&mut self) -> &mut E {
        &mut self.element
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn first_child(&self) -> Option<NodeId> {
        self.children.first().copied()
    }

    pub fn last_child(&self) -> Option<NodeId> {
        self.children.last().copied()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

impl<E: PartialEq> PartialEq for TreeNode<E> {
    fn eq(&self, other: &Self) -> bool {
        self.element == other.element
    }
}

impl<E: Eq> Eq for TreeNode<E> {}

impl<E: Hash> Hash for TreeNode<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.element.hash(state);
    }
}

impl<E: fmt::Display> fmt::Display for TreeNode<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.element)
    }
}

/// Arena-based ordered tree.
///
/// Every node is owned by the arena; the parent owns the ordering of its
/// children and each child keeps a non-owning handle back to its parent.
/// Besides the nodes reachable from the root, the arena may hold detached
/// nodes that were created or unlinked but not yet reattached or discarded.
///
/// Not thread-safe: all mutation goes through `&mut self`.
#[derive(Debug, Clone)]
pub struct Tree<E> {
    arena: Arena<TreeNode<E>>,
    /// Index of the root node, None for empty trees
    root: Option<NodeId>,
}

impl<E> Default for Tree<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Tree<E> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Creates a tree holding a single root node.
    pub fn with_root(element: E) -> Self {
        let mut tree = Self::new();
        let root = tree.create_node(element);
        tree.root = Some(root);
        tree
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Replaces the root. `None` empties the tree.
    ///
    /// The previous root stays in the arena as a detached node. A new root
    /// that still hangs below some parent is unlinked from it first.
    #[instrument(level = "trace", skip(self))]
    pub fn set_root(&mut self, root: Option<NodeId>) -> TreeResult<()> {
        if let Some(id) = root {
            self.check(id)?;
            self.unlink(id);
        }
        self.root = root;
        Ok(())
    }

    /// Creates a detached node holding `element`.
    #[instrument(level = "trace", skip(self, element))]
    pub fn create_node(&mut self, element: E) -> NodeId {
        NodeId(self.arena.insert(TreeNode::new(element)))
    }

    /// Creates a node and registers it as the last child of `parent`.
    #[instrument(level = "trace", skip(self, element))]
    pub fn create_child(&mut self, parent: NodeId, element: E) -> TreeResult<NodeId> {
        self.check(parent)?;
        let child = self.create_node(element);
        self.attach(parent, child);
        Ok(child)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id.0)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node(&self, id: NodeId) -> Option<&TreeNode<E>> {
        self.arena.get(id.0)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node_mut(&mut self, id: NodeId) -> Option<&mut TreeNode<E>> {
        self.arena.get_mut(id.0)
    }

    pub fn element(&self, id: NodeId) -> Option<&E> {
        self.get_node(id).map(TreeNode::element)
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut E> {
        self.get_node_mut(id).map(TreeNode::element_mut)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get_node(id).and_then(TreeNode::parent)
    }

    /// Children of `id` in order; empty for leaves and stale handles.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get_node(id).map(TreeNode::children).unwrap_or(&[])
    }

    /// Appends `child` to the children of `parent`.
    ///
    /// A child that already hangs below another parent is detached from it
    /// first; re-adding a child to its current parent moves it to the end.
    #[instrument(level = "trace", skip(self))]
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> TreeResult<()> {
        self.check(parent)?;
        self.check(child)?;
        self.check_adoptable(parent, child)?;
        self.unlink(child);
        self.attach(parent, child);
        Ok(())
    }

    #[instrument(level = "trace", skip(self, element))]
    pub fn add_child_element(&mut self, parent: NodeId, element: E) -> TreeResult<NodeId> {
        self.create_child(parent, element)
    }

    /// Unlinks `child` from `parent`. Returns `false` if it was not a child.
    ///
    /// The removed node keeps its own subtree and stays in the arena so it
    /// can be reattached or [discarded](Tree::discard).
    #[instrument(level = "trace", skip(self))]
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> TreeResult<bool> {
        self.check(parent)?;
        self.check(child)?;
        if self.parent(child) != Some(parent) {
            return Ok(false);
        }
        self.unlink(child);
        Ok(true)
    }

    /// Swaps `old` for `new` at the same position among the children of `parent`.
    #[instrument(level = "trace", skip(self))]
    pub fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) -> TreeResult<()> {
        self.check(parent)?;
        self.check(old)?;
        self.check(new)?;
        if self.position(parent, old).is_none() {
            return Err(TreeError::NoSuchElement(format!(
                "{} is not a child of {}",
                old, parent
            )));
        }
        if old == new {
            return Ok(());
        }
        self.check_adoptable(parent, new)?;

        // unlinking `new` may shift the position of `old` when they are siblings
        self.unlink(new);
        let pos = self.position(parent, old).ok_or_else(|| {
            TreeError::NoSuchElement(format!("{} is not a child of {}", old, parent))
        })?;
        self.node_mut(parent).children[pos] = new;
        self.node_mut(old).parent = None;
        self.node_mut(new).parent = Some(parent);
        Ok(())
    }

    /// Detaches every child of `id`. The node keeps its own parent.
    #[instrument(level = "trace", skip(self))]
    pub fn clear_children(&mut self, id: NodeId) -> TreeResult<()> {
        self.check(id)?;
        let children = std::mem::take(&mut self.node_mut(id).children);
        for child in children {
            self.node_mut(child).parent = None;
        }
        Ok(())
    }

    /// Reclaims a detached node together with its whole subtree and returns
    /// the node's element. Handles into the subtree go stale.
    #[instrument(level = "trace", skip(self))]
    pub fn discard(&mut self, id: NodeId) -> TreeResult<E> {
        self.check(id)?;
        if self.parent(id).is_some() || self.root == Some(id) {
            return Err(TreeError::InvalidArgument(format!(
                "{} is still attached; only detached nodes can be discarded",
                id
            )));
        }
        let mut pending = self.children(id).to_vec();
        while let Some(next) = pending.pop() {
            if let Some(node) = self.arena.remove(next.0) {
                pending.extend(node.children);
            }
        }
        self.arena
            .remove(id.0)
            .map(|node| node.element)
            .ok_or_else(|| TreeError::InvalidArgument(format!("{} is not part of this tree", id)))
    }

    /// Depth-first pre-order iterator whose `remove()` splices nodes out of the tree.
    #[instrument(level = "trace", skip(self))]
    pub fn preorder_iter(&mut self) -> PreorderTreeIterator<'_, E> {
        PreorderTreeIterator::new(self)
    }

    /// Depth-first post-order iterator whose `remove()` splices nodes out of the tree.
    #[instrument(level = "trace", skip(self))]
    pub fn postorder_iter(&mut self) -> PostorderTreeIterator<'_, E> {
        PostorderTreeIterator::new(self)
    }

    /// Read-only pre-order traversal of the nodes reachable from the root.
    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> TreeIterator<'_, E> {
        TreeIterator::new(self)
    }

    /// Read-only post-order traversal of the nodes reachable from the root.
    #[instrument(level = "trace", skip(self))]
    pub fn iter_postorder(&self) -> PostOrderIterator<'_, E> {
        PostOrderIterator::new(self)
    }

    /// Number of nodes reachable from the root.
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        if let Some(root) = self.root {
            self.calculate_depth(root)
        } else {
            0
        }
    }

    #[instrument(level = "trace", skip(self))]
    fn calculate_depth(&self, node_idx: NodeId) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Collects all leaf nodes (nodes with no children) in pre-order.
    ///
    /// Empty trees return an empty vector.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<NodeId> {
        self.iter()
            .filter(|(_, node)| node.is_leaf())
            .map(|(id, _)| id)
            .collect()
    }

    /// Replaces `node` by its child `promoted` at the node's position (or as
    /// root) and appends the node's other children, in order, after the
    /// promoted node's own children.
    ///
    /// Returns the reparented children. `node` is left childless and
    /// detached.
    #[instrument(level = "trace", skip(self))]
    pub(crate) fn promote_child(&mut self, node: NodeId, promoted: NodeId) -> Vec<NodeId> {
        let mut absorbed = std::mem::take(&mut self.node_mut(node).children);
        absorbed.retain(|&c| c != promoted);

        let former_parent = self.node_mut(node).parent.take();
        match former_parent {
            Some(parent) => {
                if let Some(pos) = self.position(parent, node) {
                    self.node_mut(parent).children[pos] = promoted;
                }
                self.node_mut(promoted).parent = Some(parent);
            }
            None => {
                self.node_mut(promoted).parent = None;
                if self.root == Some(node) {
                    self.root = Some(promoted);
                }
            }
        }

        for &child in &absorbed {
            self.node_mut(child).parent = Some(promoted);
        }
        self.node_mut(promoted).children.extend_from_slice(&absorbed);
        debug!(%node, %promoted, absorbed = absorbed.len(), "promoted child into removed slot");
        absorbed
    }

    /// Unlinks a childless node from the tree and frees it.
    #[instrument(level = "trace", skip(self))]
    pub(crate) fn remove_leaf(&mut self, node: NodeId) -> Option<E> {
        debug_assert!(self.children(node).is_empty());
        if self.root == Some(node) {
            self.root = None;
        }
        self.unlink(node);
        self.arena.remove(node.0).map(|n| n.element)
    }

    fn check(&self, id: NodeId) -> TreeResult<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(TreeError::InvalidArgument(format!(
                "{} is not part of this tree",
                id
            )))
        }
    }

    /// Rejects links that would break single ownership or create a cycle.
    fn check_adoptable(&self, parent: NodeId, child: NodeId) -> TreeResult<()> {
        if self.root == Some(child) {
            return Err(TreeError::InvalidArgument(format!(
                "{} is the root and cannot become a child",
                child
            )));
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(TreeError::InvalidArgument(format!(
                "adding {} below {} would create a cycle",
                child, parent
            )));
        }
        Ok(())
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.parent(id);
        }
        false
    }

    fn position(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.children(parent).iter().position(|&c| c == child)
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.node_mut(parent).children.push(child);
        self.node_mut(child).parent = Some(parent);
    }

    fn unlink(&mut self, child: NodeId) {
        if let Some(parent) = self.node_mut(child).parent.take() {
            self.node_mut(parent).children.retain(|&c| c != child);
        }
    }

    // Only called with handles validated by `check` or taken from live links.
    fn node_mut(&mut self, id: NodeId) -> &mut TreeNode<E> {
        &mut self.arena[id.0]
    }
}

impl<E: PartialEq> Tree<E> {
    /// First node in pre-order whose element equals `element`.
    #[instrument(level = "trace", skip_all)]
    pub fn find(&self, element: &E) -> Option<NodeId> {
        self.iter()
            .find(|(_, node)| node.element() == element)
            .map(|(id, _)| id)
    }

    /// Unlinks the first child of `parent` whose element equals `element`.
    #[instrument(level = "trace", skip(self, element))]
    pub fn remove_child_element(&mut self, parent: NodeId, element: &E) -> TreeResult<Option<NodeId>> {
        self.check(parent)?;
        let found = self.child_with_element(parent, element);
        if let Some(child) = found {
            self.unlink(child);
        }
        Ok(found)
    }

    /// Replaces the first child equal to `old` with a new node holding `new`.
    #[instrument(level = "trace", skip(self, old, new))]
    pub fn replace_child_element(&mut self, parent: NodeId, old: &E, new: E) -> TreeResult<NodeId> {
        self.check(parent)?;
        let old_id = self.child_with_element(parent, old).ok_or_else(|| {
            TreeError::NoSuchElement(format!("no child of {} holds the given element", parent))
        })?;
        let new_id = self.create_node(new);
        self.replace_child(parent, old_id, new_id)?;
        Ok(new_id)
    }

    fn child_with_element(&self, parent: NodeId, element: &E) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&c| self.element(c) == Some(element))
    }
}

pub struct TreeIterator<'a, E> {
    tree: &'a Tree<E>,
    stack: Vec<NodeId>,
}

impl<'a, E> TreeIterator<'a, E> {
    fn new(tree: &'a Tree<E>) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push(root);
        }
        Self { tree, stack }
    }
}

impl<'a, E> Iterator for TreeIterator<'a, E> {
    type Item = (NodeId, &'a TreeNode<E>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev());
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a, E> {
    tree: &'a Tree<E>,
    stack: Vec<(NodeId, bool)>,
}

impl<'a, E> PostOrderIterator<'a, E> {
    fn new(tree: &'a Tree<E>) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push((root, false));
        }
        Self { tree, stack }
    }
}

impl<'a, E> Iterator for PostOrderIterator<'a, E> {
    type Item = (NodeId, &'a TreeNode<E>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
