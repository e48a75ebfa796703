use std::fmt::Display;

use termtree::Tree as TermTree;
use tracing::instrument;

use crate::arena::{NodeId, Tree};
use crate::btree::{BTree, BTreeNode};

/// Rendering of a tree structure as a printable `termtree` tree.
pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> TermTree<String>;
}

impl<E: Display> TreeNodeConvert for Tree<E> {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> TermTree<String> {
        fn build_tree<E: Display>(tree: &Tree<E>, node_idx: NodeId) -> TermTree<String> {
            let label = tree
                .element(node_idx)
                .map(ToString::to_string)
                .unwrap_or_default();
            let leaves: Vec<_> = tree
                .children(node_idx)
                .iter()
                .map(|&child| build_tree(tree, child))
                .collect();
            TermTree::new(label).with_leaves(leaves)
        }

        match self.root() {
            Some(root) => build_tree(self, root),
            None => TermTree::new("Empty tree".to_string()),
        }
    }
}

impl<V: Display + Ord> TreeNodeConvert for BTree<V> {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> TermTree<String> {
        fn build_tree<V: Display + Ord>(node: &BTreeNode<V>) -> TermTree<String> {
            let label = node
                .entries()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            TermTree::new(format!("[{}]", label))
                .with_leaves(node.children().iter().map(build_tree))
        }

        match self.root() {
            Some(root) => build_tree(root),
            None => TermTree::new("Empty tree".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_tree_when_rendering_then_children_are_nested() {
        let mut tree = Tree::with_root("root");
        let root = tree.root().unwrap();
        let child = tree.create_child(root, "child").unwrap();
        tree.create_child(child, "grandchild").unwrap();

        let rendered = tree.to_tree_string().to_string();
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines[0], "root");
        assert!(lines[1].ends_with("child"));
        assert!(lines[2].ends_with("grandchild"));
    }

    #[test]
    fn given_empty_btree_when_rendering_then_says_empty() {
        let tree: BTree<i32> = BTree::new();
        assert_eq!(tree.to_tree_string().to_string().trim(), "Empty tree");
    }
}
