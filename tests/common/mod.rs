//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::collections::HashSet;

use jtree::{NodeId, Tree};
use rstest::fixture;

/// A -> [B, C -> [D, E]]
pub struct Sample {
    pub tree: Tree<&'static str>,
    pub a: NodeId,
    pub b: NodeId,
    pub c: NodeId,
    pub d: NodeId,
    pub e: NodeId,
}

#[fixture]
pub fn sample() -> Sample {
    jtree::util::testing::init_test_setup();
    let mut tree = Tree::with_root("A");
    let a = tree.root().unwrap();
    let b = tree.create_child(a, "B").unwrap();
    let c = tree.create_child(a, "C").unwrap();
    let d = tree.create_child(c, "D").unwrap();
    let e = tree.create_child(c, "E").unwrap();
    Sample { tree, a, b, c, d, e }
}

/// Elements of the children of `id`, in order.
pub fn child_labels<E: Copy>(tree: &Tree<E>, id: NodeId) -> Vec<E> {
    tree.children(id)
        .iter()
        .map(|&c| *tree.element(c).unwrap())
        .collect()
}

/// Elements in pre-order, read without mutating the tree.
pub fn preorder_labels<E: Copy>(tree: &Tree<E>) -> Vec<E> {
    tree.iter().map(|(_, node)| *node.element()).collect()
}

/// Every reachable child points back at its parent and no node is reached twice.
pub fn assert_consistent<E>(tree: &Tree<E>) {
    let mut seen = HashSet::new();
    if let Some(root) = tree.root() {
        assert_eq!(tree.parent(root), None, "root must not have a parent");
    }
    for (id, node) in tree.iter() {
        assert!(seen.insert(id), "{} reached twice", id);
        for &child in node.children() {
            assert_eq!(tree.parent(child), Some(id), "{} does not point back at {}", child, id);
        }
    }
}
