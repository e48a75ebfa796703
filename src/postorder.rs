//! Post-order traversal that tolerates removal of the node just visited.

use std::collections::VecDeque;
use std::iter::FusedIterator;

use tracing::{debug, instrument};

use crate::arena::{NodeId, Tree};
use crate::error::{TreeError, TreeResult};

/// Depth-first post-order iterator over a [`Tree`]: children left to right,
/// then the node itself.
///
/// The whole visiting order is queued up front. By the time a node is
/// returned all of its descendants have been visited, so splicing it out
/// leaves the pending queue valid: its last child takes the freed slot and
/// adopts the other children after its own.
pub struct PostorderTreeIterator<'a, E> {
    tree: &'a mut Tree<E>,
    stack: VecDeque<NodeId>,
    current: Option<NodeId>,
}

impl<'a, E> PostorderTreeIterator<'a, E> {
    pub(crate) fn new(tree: &'a mut Tree<E>) -> Self {
        let stack = tree.iter_postorder().map(|(id, _)| id).collect();
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

    pub fn current(&self) -> Option<NodeId> {
        self.current
    }

    pub fn tree(&self) -> &Tree<E> {
        &*self.tree
    }

    /// Removes the node returned by the last `next` from the tree.
    #[instrument(level = "trace", skip(self))]
    pub fn remove(&mut self) -> TreeResult<()> {
        let node = self.current.take().ok_or_else(TreeError::remove_without_next)?;

        if let Some(last_child) = self.tree.get_node(node).and_then(|n| n.last_child()) {
            self.tree.promote_child(node, last_child);
        }

        self.tree.remove_leaf(node);
        debug!(%node, pending = self.stack.len(), "removed node during post-order walk");
        Ok(())
    }
}

impl<E> Iterator for PostorderTreeIterator<'_, E> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        self.advance().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.stack.len(), Some(self.stack.len()))
    }
}

impl<E> ExactSizeIterator for PostorderTreeIterator<'_, E> {}

impl<E> FusedIterator for PostorderTreeIterator<'_, E> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_chain_when_constructed_then_queue_runs_leaf_to_root() {
        let mut tree = Tree::with_root(1);
        let root = tree.root().unwrap();
        let mid = tree.create_child(root, 2).unwrap();
        let leaf = tree.create_child(mid, 3).unwrap();

        let iter = tree.postorder_iter();
        assert_eq!(iter.len(), 3);
        assert_eq!(iter.stack, VecDeque::from(vec![leaf, mid, root]));
    }

    #[test]
    fn given_removed_node_when_removing_again_then_illegal_state() {
        let mut tree = Tree::with_root(1);
        let mut iter = tree.postorder_iter();
        iter.advance().unwrap();
        iter.remove().unwrap();
        assert!(matches!(iter.remove(), Err(TreeError::IllegalState(_))));
        assert!(iter.tree().is_empty());
    }
}
