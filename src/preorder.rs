//! Pre-order traversal that tolerates removal of the node just visited.

use std::collections::VecDeque;
use std::iter::FusedIterator;

use tracing::{debug, instrument};

use crate::arena::{NodeId, Tree};
use crate::error::{TreeError, TreeResult};

/// Depth-first pre-order iterator over a [`Tree`].
///
/// The front of `stack` is always the next node to visit under the current
/// shape of the tree. [`remove`](Self::remove) patches the stack in place
/// instead of rebuilding it.
///
/// Removing an internal node promotes its first child into the freed slot;
/// the remaining children become trailing children of the promoted node,
/// which is visited next.
pub struct PreorderTreeIterator<'a, E> {
    tree: &'a mut Tree<E>,
    stack: VecDeque<NodeId>,
    current: Option<NodeId>,
}

impl<'a, E> PreorderTreeIterator<'a, E> {
    pub(crate) fn new(tree: &'a mut Tree<E>) -> Self {
        let stack = tree.root().into_iter().collect();
        Self {
            tree,
            stack,
            current: None,
        }
    }

    pub fn has_next(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Moves to the next node and returns its handle.
    #[instrument(level = "trace", skip(self))]
    pub fn advance(&mut self) -> TreeResult<NodeId> {
        let node = self.stack.pop_front().ok_or(TreeError::Exhausted)?;
        for &child in self.tree.children(node).iter().rev() {
            self.stack.push_front(child);
        }
        self.current = Some(node);
        Ok(node)
    }

    /// Moves to the next node and returns its element.
    pub fn try_next(&mut self) -> TreeResult<&E> {
        let node = self.advance()?;
        self.tree
            .element(node)
            .ok_or_else(|| TreeError::NoSuchElement(format!("{} vanished during iteration", node)))
    }

    /// Node returned by the last call to `next`, unless it was removed since.
    pub fn current(&self) -> Option<NodeId> {
        self.current
    }

    /// The tree being walked, for inspection between steps.
    pub fn tree(&self) -> &Tree<E> {
        &*self.tree
    }

    /// Removes the node returned by the last `next` from the tree.
    #[instrument(level = "trace", skip(self))]
    pub fn remove(&mut self) -> TreeResult<()> {
        let node = self.current.take().ok_or_else(TreeError::remove_without_next)?;

        if let Some(first_child) = self.tree.get_node(node).and_then(|n| n.first_child()) {
            // `advance` left the node's children at the front of the stack
            let expanded = self.stack.pop_front();
            debug_assert_eq!(expanded, Some(first_child));

            let absorbed = self.tree.promote_child(node, first_child);
            for sibling in absorbed {
                let pending = self.stack.pop_front();
                debug_assert_eq!(pending, Some(sibling));
            }
            self.stack.push_front(first_child);
        }

        self.tree.remove_leaf(node);
        debug!(%node, pending = self.stack.len(), "removed node during pre-order walk");
        Ok(())
    }
}

impl<E> Iterator for PreorderTreeIterator<'_, E> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        self.advance().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.stack.len(), None)
    }
}

impl<E> FusedIterator for PreorderTreeIterator<'_, E> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_empty_tree_when_advancing_then_exhausted() {
        let mut tree: Tree<u8> = Tree::new();
        let mut iter = tree.preorder_iter();
        assert!(!iter.has_next());
        assert_eq!(iter.advance(), Err(TreeError::Exhausted));
    }

    #[test]
    fn given_fresh_iterator_when_removing_then_illegal_state() {
        let mut tree = Tree::with_root(1);
        let mut iter = tree.preorder_iter();
        assert!(matches!(iter.remove(), Err(TreeError::IllegalState(_))));
    }

    #[test]
    fn given_visited_node_when_advancing_then_children_are_pending_in_order() {
        let mut tree = Tree::with_root(0);
        let root = tree.root().unwrap();
        let kids: Vec<_> = (1..=3).map(|i| tree.create_child(root, i).unwrap()).collect();

        let mut iter = tree.preorder_iter();
        iter.advance().unwrap();
        assert_eq!(iter.stack, VecDeque::from(kids));
    }
}
