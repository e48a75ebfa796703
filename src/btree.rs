//! Ordered multi-way tree with an eagerly flattened in-order iterator.
//!
//! Nodes follow the classic B-tree shape (sorted entries, one more child than
//! entries when internal) but nothing is ever split, merged or rebalanced.

use std::collections::VecDeque;
use std::fmt::Debug;
use std::iter::FusedIterator;

use tracing::{debug, instrument};

use crate::error::{TreeError, TreeResult};

/// A node of a [`BTree`]. Leaves have no children; an internal node with
/// `k` entries has `k + 1` children and `children[i] < entries[i] < children[i + 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BTreeNode<V> {
    entries: Vec<V>,
    children: Vec<BTreeNode<V>>,
}

impl<V: Ord> BTreeNode<V> {
    /// Builds a leaf from strictly ascending entries.
    pub fn leaf(entries: Vec<V>) -> TreeResult<Self> {
        Self::internal(entries, Vec::new())
    }

    /// Builds a node, checking entry order and the `k + 1` children shape.
    /// An empty `children` vector makes a leaf.
    pub fn internal(entries: Vec<V>, children: Vec<BTreeNode<V>>) -> TreeResult<Self> {
        if !entries.windows(2).all(|w| w[0] < w[1]) {
            return Err(TreeError::InvalidArgument(
                "node entries must be strictly ascending".to_string(),
            ));
        }
        if !children.is_empty() {
            if children.len() != entries.len() + 1 {
                return Err(TreeError::InvalidArgument(format!(
                    "a node with {} entries needs {} children, got {}",
                    entries.len(),
                    entries.len() + 1,
                    children.len()
                )));
            }
            for (i, entry) in entries.iter().enumerate() {
                let left_ok = children[i].max().map_or(true, |m| m < entry);
                let right_ok = children[i + 1].min().map_or(true, |m| m > entry);
                if !left_ok || !right_ok {
                    return Err(TreeError::InvalidArgument(format!(
                        "subtrees around entry {} are out of order",
                        i
                    )));
                }
            }
        }
        Ok(Self { entries, children })
    }

    pub fn entries(&self) -> &[V] {
        &self.entries
    }

    pub fn children(&self) -> &[BTreeNode<V>] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of entries in this subtree.
    pub fn len(&self) -> usize {
        self.entries.len() + self.children.iter().map(BTreeNode::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn min(&self) -> Option<&V> {
        self.children
            .iter()
            .find_map(BTreeNode::min)
            .into_iter()
            .chain(self.entries.first())
            .min()
    }

    fn max(&self) -> Option<&V> {
        self.children
            .iter()
            .rev()
            .find_map(BTreeNode::max)
            .into_iter()
            .chain(self.entries.last())
            .max()
    }

    fn depth(&self) -> usize {
        1 + self.children.iter().map(BTreeNode::depth).max().unwrap_or(0)
    }

    fn contains(&self, value: &V) -> bool {
        match self.entries.binary_search(value) {
            Ok(_) => true,
            Err(i) => self.children.get(i).is_some_and(|c| c.contains(value)),
        }
    }

    fn remove(&mut self, value: &V) -> bool {
        match self.entries.binary_search(value) {
            Ok(i) => {
                if self.is_leaf() {
                    self.entries.remove(i);
                } else if let Some(predecessor) = self.children[i].pop_max() {
                    self.entries[i] = predecessor;
                } else {
                    // left subtree is empty: drop it together with the entry
                    self.entries.remove(i);
                    self.children.remove(i);
                }
                true
            }
            Err(i) => match self.children.get_mut(i) {
                Some(child) => child.remove(value),
                None => false,
            },
        }
    }

    /// Takes the largest entry out of this subtree.
    fn pop_max(&mut self) -> Option<V> {
        if self.is_leaf() {
            return self.entries.pop();
        }
        if let Some(value) = self.children.last_mut().and_then(BTreeNode::pop_max) {
            return Some(value);
        }
        let value = self.entries.pop()?;
        self.children.pop();
        Some(value)
    }
}

/// An ordered multi-way tree without balancing.
///
/// Values are kept unique. Inserts descend to the leaf covering the value
/// and insert in sorted position there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BTree<V> {
    root: Option<BTreeNode<V>>,
    len: usize,
}

impl<V> Default for BTree<V> {
    fn default() -> Self {
        Self { root: None, len: 0 }
    }
}

impl<V: Ord> BTree<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_root(root: BTreeNode<V>) -> Self {
        let len = root.len();
        Self {
            root: Some(root),
            len,
        }
    }

    pub fn root(&self) -> Option<&BTreeNode<V>> {
        self.root.as_ref()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, BTreeNode::depth)
    }

    pub fn contains(&self, value: &V) -> bool {
        self.root.as_ref().is_some_and(|r| r.contains(value))
    }

    /// Inserts `value`. Returns `false` if it was already present.
    #[instrument(level = "trace", skip_all)]
    pub fn insert(&mut self, value: V) -> bool {
        let Some(mut node) = self.root.as_mut() else {
            self.root = Some(BTreeNode {
                entries: vec![value],
                children: Vec::new(),
            });
            self.len = 1;
            return true;
        };
        loop {
            match node.entries.binary_search(&value) {
                Ok(_) => return false,
                Err(i) if node.children.is_empty() => {
                    node.entries.insert(i, value);
                    break;
                }
                Err(i) => node = &mut node.children[i],
            }
        }
        self.len += 1;
        true
    }

    /// Removes `value`. Returns `false` if it was not present.
    ///
    /// An entry of an internal node is replaced by its in-order predecessor;
    /// when the subtree to its left holds nothing, entry and subtree go
    /// together.
    #[instrument(level = "trace", skip_all)]
    pub fn remove(&mut self, value: &V) -> bool {
        let removed = self.root.as_mut().is_some_and(|r| r.remove(value));
        if removed {
            self.len -= 1;
            if self.len == 0 {
                self.root = None;
            }
        }
        removed
    }
}

impl<V: Ord + Clone + Debug> BTree<V> {
    /// In-order iterator over a snapshot of the values taken now.
    #[instrument(level = "trace", skip(self))]
    pub fn in_order_iter(&mut self) -> BTreeInOrderIterator<'_, V> {
        BTreeInOrderIterator::new(self)
    }

    /// Values in ascending order.
    pub fn to_vec(&self) -> Vec<V> {
        let mut out = VecDeque::with_capacity(self.len);
        if let Some(root) = &self.root {
            enqueue(root, &mut out);
        }
        out.into()
    }
}

fn enqueue<V: Clone>(node: &BTreeNode<V>, queue: &mut VecDeque<V>) {
    if node.children.is_empty() {
        queue.extend(node.entries.iter().cloned());
        return;
    }
    for (i, child) in node.children.iter().enumerate() {
        enqueue(child, queue);
        if let Some(entry) = node.entries.get(i) {
            queue.push_back(entry.clone());
        }
    }
}

/// In-order iterator over a [`BTree`].
///
/// The order is flattened once at construction. `remove` deletes the last
/// returned value from the tree but the queued order is not recomputed, so
/// it reflects the tree as it was when iteration started.
pub struct BTreeInOrderIterator<'a, V> {
    tree: &'a mut BTree<V>,
    queue: VecDeque<V>,
    current: Option<V>,
}

impl<'a, V: Ord + Clone + Debug> BTreeInOrderIterator<'a, V> {
    fn new(tree: &'a mut BTree<V>) -> Self {
        let mut queue = VecDeque::with_capacity(tree.len());
        if let Some(root) = &tree.root {
            enqueue(root, &mut queue);
        }
        Self {
            tree,
            queue,
            current: None,
        }
    }

    pub fn has_next(&self) -> bool {
        !self.queue.is_empty()
    }

    pub fn try_next(&mut self) -> TreeResult<V> {
        let value = self.queue.pop_front().ok_or(TreeError::Exhausted)?;
        self.current = Some(value.clone());
        Ok(value)
    }

    pub fn tree(&self) -> &BTree<V> {
        &*self.tree
    }

    /// Removes the last returned value from the tree. Returns whether the
    /// tree still held it.
    #[instrument(level = "trace", skip(self))]
    pub fn remove(&mut self) -> TreeResult<bool> {
        let value = self.current.take().ok_or_else(TreeError::remove_without_next)?;
        let removed = self.tree.remove(&value);
        debug!(?value, removed, "removed value during in-order walk");
        Ok(removed)
    }
}

impl<V: Ord + Clone + Debug> Iterator for BTreeInOrderIterator<'_, V> {
    type Item = V;

    fn next(&mut self) -> Option<V> {
        self.try_next().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.queue.len(), Some(self.queue.len()))
    }
}

impl<V: Ord + Clone + Debug> ExactSizeIterator for BTreeInOrderIterator<'_, V> {}

impl<V: Ord + Clone + Debug> FusedIterator for BTreeInOrderIterator<'_, V> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_internal_node_when_predecessor_exists_then_entry_is_replaced() {
        let left = BTreeNode::leaf(vec![1, 2]).unwrap();
        let right = BTreeNode::leaf(vec![4, 5]).unwrap();
        let mut node = BTreeNode::internal(vec![3], vec![left, right]).unwrap();

        assert!(node.remove(&3));
        assert_eq!(node.entries(), &[2]);
        assert_eq!(node.children()[0].entries(), &[1]);
    }

    #[test]
    fn given_empty_left_subtree_when_removing_entry_then_subtree_is_dropped() {
        let left = BTreeNode::leaf(vec![]).unwrap();
        let right = BTreeNode::leaf(vec![4]).unwrap();
        let mut node = BTreeNode::internal(vec![3], vec![left, right]).unwrap();

        assert!(node.remove(&3));
        assert!(node.entries().is_empty());
        assert_eq!(node.children().len(), 1);
        assert_eq!(node.children()[0].entries(), &[4]);
    }

    #[test]
    fn given_nested_subtree_when_popping_max_then_rightmost_value_leaves() {
        let mut node = BTreeNode::internal(
            vec![7],
            vec![BTreeNode::leaf(vec![6]).unwrap(), BTreeNode::leaf(vec![]).unwrap()],
        )
        .unwrap();
        assert_eq!(node.pop_max(), Some(7));
        assert_eq!(node.children().len(), 1);
        assert_eq!(node.pop_max(), Some(6));
        assert_eq!(node.pop_max(), None);
    }
}
